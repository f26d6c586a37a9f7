mod charts;
mod pdf;

pub use charts::{render_income_chart, render_momentum_chart};
pub use pdf::write_report_pdf;

use analysis_core::{ReportError, StockReport};
use std::path::{Path, PathBuf};

pub const MOMENTUM_CHART_FILE: &str = "rsi_plot.png";
pub const INCOME_CHART_FILE: &str = "income_statement.png";
pub const REPORT_FILE: &str = "Stock_Analysis_Report.pdf";

/// Paths of the files one render pass produced
pub struct ReportArtifacts {
    pub momentum_chart: PathBuf,
    pub income_chart: PathBuf,
    pub document: PathBuf,
}

/// Render both charts and the paginated document into `out_dir`
pub fn render_report(report: &StockReport, out_dir: &Path) -> Result<ReportArtifacts, ReportError> {
    let momentum_chart = out_dir.join(MOMENTUM_CHART_FILE);
    render_momentum_chart(&momentum_chart, report)?;
    tracing::info!("Wrote {}", momentum_chart.display());

    let income_chart = out_dir.join(INCOME_CHART_FILE);
    render_income_chart(&income_chart, report)?;
    tracing::info!("Wrote {}", income_chart.display());

    let document = out_dir.join(REPORT_FILE);
    write_report_pdf(&document, report, &momentum_chart, &income_chart)?;
    tracing::info!("Wrote {}", document.display());

    Ok(ReportArtifacts {
        momentum_chart,
        income_chart,
        document,
    })
}
