//! Forecast a synthetic 30-year yield series and print the run output.
//!
//! Run with `cargo run --example synthetic_run`; set `RUST_LOG=debug` for
//! per-step detail.

use yieldcast::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    // 30 years of non-monotonic yields, reported as dated end-of-July
    // observations the way a harvest table would arrive
    let harvest_dates: Vec<_> = (0..30)
        .map(|i| {
            let year = 1990 + i as i32;
            let value = 5.0 + (i as f64 * 1.7).sin() * 2.0 + (i as f64 * 0.9).cos() * 0.3;
            (YearMonth { year, month: 7 }.end_of_month(), value)
        })
        .collect();
    let yields = YieldSeries::from_dated(&harvest_dates, 7);

    // Three monthly climate predictors; June precipitation carries a strong
    // yield signal, the rest is seasonal noise
    let variable = |name: &str, seed: f64, signal: bool| {
        let mut points = Vec::new();
        for year in 1988..2022 {
            for month in 1..=12 {
                let i = (year - 1990) as f64;
                let value = if signal && month == 6 {
                    40.0 + (5.0 + (i * 1.7).sin() * 2.0) * 6.0
                } else {
                    ((year as f64 * 0.31 + month as f64 * 1.7 + seed).sin() + 2.0) * 20.0
                };
                points.push((YearMonth { year, month }.end_of_month(), value));
            }
        }
        PredictorVariable::new(name, MonthlySeries::from_dated(&points))
    };
    let bundle = PredictorBundle::new(vec![
        variable("prcp", 0.0, true),
        variable("smos", 3.0, false),
        variable("etos", 7.0, false),
    ]);

    let output = run_forecast(&yields, &bundle, 7, &[1, 2, 3, 4], Some("demo-zone"))?;

    println!("status: {}", output.status.code());
    for (label, report) in &output.leads {
        println!(
            "{label}: lead {:2}  gerrity {:6.3}  msess {:6.3}",
            report.lead, report.gerrity, report.msess
        );
        for selection in &report.selected {
            println!(
                "      {} <- months {:?} (corr {:.3})",
                selection.variable, selection.months, selection.correlation
            );
        }
    }

    let json = serde_json::to_string_pretty(&output).expect("serializable output");
    println!("\n{json}");
    Ok(())
}
