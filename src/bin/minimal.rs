// Minimal check that averaging and flash work without ffmpeg installed

use long_exposure::{
    exposure::{flash_overlay, ExposureCompositor, FlashMode},
    video::Frame,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📷 Testing Long-Exposure Core Functionality");

    // Test 1: Synthetic frames with a moving bright dot
    println!("\n1. Creating frames...");
    let (width, height) = (160, 90);
    let frames: Vec<Frame> = (0..16)
        .map(|i| {
            let mut frame = Frame::new_filled(width, height, [20, 24, 40]);
            let x = 10 + i * 9;
            for dy in 0..4 {
                for dx in 0..4 {
                    frame.set_pixel(x + dx, 40 + dy, [255, 230, 160]);
                }
            }
            frame
        })
        .collect();
    println!("   Created {} frames ({}x{})", frames.len(), width, height);

    // Test 2: Plain average
    println!("\n2. Averaging...");
    let compositor = ExposureCompositor::default();
    let composite = compositor.compose_frames(&frames, FlashMode::None)?;
    println!("   Background pixel: {:?}", composite.get_pixel(0, 0));
    println!("   Light trail pixel: {:?}", composite.get_pixel(12, 41));
    assert_eq!(composite.get_pixel(0, 0), [20, 24, 40]);

    // Test 3: Flash overlay
    println!("\n3. Testing flash overlay...");
    let overlay = flash_overlay(&Frame::new_filled(1, 1, [100, 200, 0]), 1.5);
    println!("   100/200/0 boosted: {:?}", overlay.get_pixel(0, 0));
    assert_eq!(overlay.get_pixel(0, 0), [150, 255, 0]);

    // Test 4: Rear curtain flash
    println!("\n4. Composing with rear curtain flash...");
    let flashed = compositor.compose_frames(&frames, FlashMode::Rear)?;
    match flashed.save_png("minimal_long_exposure.png") {
        Ok(()) => println!("   📁 Output saved to: minimal_long_exposure.png"),
        Err(e) => println!("   ⚠️  Could not save file: {}", e),
    }

    println!("\n🎉 All checks passed! Long-Exposure core is working.");
    Ok(())
}
