use std::io::{self, Write};

use analysis_core::RateSource;
use analysis_orchestrator::ReportOrchestrator;
use report_renderer::render_report;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    print!("Enter the stock name: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let ticker = input.trim();
    if ticker.is_empty() {
        anyhow::bail!("no ticker symbol entered");
    }

    let orchestrator = ReportOrchestrator::new();
    let report = orchestrator.build_report(ticker).await?;

    if report.exchange_rate.source == RateSource::Fallback {
        println!(
            "Warning: Using fallback USD to INR rate of {} due to API issues.",
            forex_client::FALLBACK_USD_INR
        );
    }

    let out_dir = std::env::current_dir()?;
    let artifacts = render_report(&report, &out_dir)?;
    tracing::info!(
        "Report artifacts: {}, {}, {}",
        artifacts.momentum_chart.display(),
        artifacts.income_chart.display(),
        artifacts.document.display()
    );

    println!("PDF report with RSI plot and analysis generated successfully.");
    Ok(())
}
