//! Minimal example showing the essential features

use curve_sonifier::prelude::*;

fn main() {
    println!("🎵 Curve Sonifier - Essential Features\n");

    // 1. Sample a curve's slope
    sample_slopes();

    // 2. Map slope to pitch
    pitch_mapping();

    // 3. Start and reverse a playback offline
    playback_offline();
}

fn sample_slopes() {
    println!("1️⃣  Curve Slopes\n");

    let curve = BezierCurve::ease_in_out();
    for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let s = curve.sample(t);
        println!(
            "   t={t:.2}: point=({:.3}, {:.3}) slope={:.3}",
            s.x, s.y, s.slope
        );
    }
    println!();
}

fn pitch_mapping() {
    println!("2️⃣  Slope to Pitch\n");

    let mut sonifier = CurveSonifier::new(OfflineBackend::new()).unwrap();
    sonifier.start(BezierCurve::ease_in_out(), 2.0).unwrap();

    for t in [0.0, 0.5, 1.0] {
        let (frequency, time) = sonifier.map_to_audio_param(t);
        println!("   t={t:.1}: {frequency:.0} Hz at {time:.2}s");
    }
    println!();
}

fn playback_offline() {
    println!("3️⃣  Start and Reverse\n");

    let mut sonifier = CurveSonifier::new(OfflineBackend::new()).unwrap();
    let curve = BezierCurve::ease_in_out();

    visualize_sound(&mut sonifier, curve, 2.0).unwrap();
    println!(
        "   started: {} frequency ramps",
        sonifier.voice().frequency.len()
    );

    sonifier.backend_mut().advance(0.5);
    visualize_sound(&mut sonifier, curve, 2.0).unwrap();
    println!(
        "   reversed at 0.5s: window now ends at {:.2}s",
        sonifier.last_start_time() + sonifier.duration()
    );
}
