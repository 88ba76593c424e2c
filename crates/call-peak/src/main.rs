mod bootstrap;

use anyhow::{Context, Result};
use peak_core::settings::Settings;
use peak_runtime::pipeline::PeakPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Call Peak v{} starting", env!("CARGO_PKG_VERSION"));

    let input = settings
        .input
        .clone()
        .or_else(bootstrap::discover_data_path)
        .context("no dataset given; pass --input or place one at ~/.call-peak/dataset.json")?;

    tracing::info!(
        "Input: {}, Output: {}, Mode: {}",
        input.display(),
        settings
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string()),
        if settings.parallel() { "parallel" } else { "sequential" }
    );

    let pipeline = PeakPipeline::new(input, settings.output.clone(), settings.parallel());

    // The engine has no cancellation of its own; Ctrl+C simply drops the run.
    tokio::select! {
        result = pipeline.run() => {
            let report = result?;
            tracing::info!(
                records = report.records,
                groups = report.totals.groups,
                customers = report.totals.customers,
                load_secs = report.load_time_seconds,
                analyze_secs = report.analyze_time_seconds,
                "analysis complete"
            );
            if let Some(busiest) = report.totals.busiest {
                tracing::info!(
                    "Busiest day: customer {} on {} with {} concurrent calls",
                    busiest.customer_id,
                    busiest.date,
                    report.totals.max_concurrent_calls
                );
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Ctrl+C received; abandoning run");
        }
    }

    Ok(())
}
