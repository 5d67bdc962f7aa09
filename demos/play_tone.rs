//! Audible demo: sonify an easing curve, then reverse it mid-flight

use std::thread;
use std::time::Duration;

use anyhow::Result;
use curve_sonifier::{visualize_sound, BezierCurve, CpalBackend, CurveSonifier};

fn main() -> Result<()> {
    env_logger::init();

    let mut sonifier = CurveSonifier::new(CpalBackend::new()?)?;
    let curve = BezierCurve::ease_in_out();

    println!("playing a 2s ease-in-out sweep...");
    visualize_sound(&mut sonifier, curve, 2.0)?;
    thread::sleep(Duration::from_millis(1200));

    println!("reversing mid-flight...");
    visualize_sound(&mut sonifier, curve, 2.0)?;
    thread::sleep(Duration::from_millis(1500));

    Ok(())
}
