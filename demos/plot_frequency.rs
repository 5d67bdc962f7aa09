//! Generate a PNG plot of the frequency trajectories for a few curves

use curve_sonifier::prelude::*;
use plotters::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎨 Plotting frequency trajectories...\n");

    std::fs::create_dir_all("plots")?;

    plot_trajectories()?;
    println!("  ✓ Generated plots/frequency.png");

    Ok(())
}

fn plot_trajectories() -> Result<(), Box<dyn std::error::Error>> {
    let duration = 2.0;
    let root = BitMapBackend::new("plots/frequency.png", (1400, 800)).into_drawing_area();
    root.fill(&RGBColor(28, 28, 32))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..duration, 0.0..1200.0)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_axes()
        .draw()?;

    let curves = vec![
        ("Linear", BezierCurve::linear(), RGBColor(100, 180, 255)),
        (
            "Ease-in-out",
            BezierCurve::ease_in_out(),
            RGBColor(255, 100, 120),
        ),
        ("Ease-in", BezierCurve::ease_in(), RGBColor(100, 230, 140)),
    ];

    for (name, curve, color) in curves {
        let mut sonifier = CurveSonifier::new(OfflineBackend::new())?;
        sonifier.start(curve, duration)?;

        let samples: Vec<(f64, f64)> = (0..=500)
            .map(|i| {
                let (frequency, time) = sonifier.map_to_audio_param(i as f64 / 500.0);
                (time, frequency)
            })
            .collect();

        chart
            .draw_series(LineSeries::new(
                samples,
                ShapeStyle {
                    color: color.to_rgba(),
                    filled: false,
                    stroke_width: 4,
                },
            ))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 30, y)],
                    ShapeStyle {
                        color: color.to_rgba(),
                        filled: false,
                        stroke_width: 4,
                    },
                )
            });
    }

    chart
        .configure_series_labels()
        .background_style(RGBColor(38, 38, 42).mix(0.95))
        .border_style(RGBColor(80, 80, 85))
        .label_font(("sans-serif", 20, &RGBColor(220, 220, 225)))
        .draw()?;

    root.present()?;
    Ok(())
}
