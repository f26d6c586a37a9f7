use analysis_core::{MagnitudeUnit, QuarterDisplay, ReportError, StockReport};
use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::Path;

// Rasters are sized so the PDF embeds them at a readable width without any
// transform beyond translation (the embedder assumes 300 dpi).
const CHART_WIDTH: u32 = 2125;
const MOMENTUM_CHART_HEIGHT: u32 = 1050;
const INCOME_CHART_HEIGHT: u32 = 1250;

const BAR_WIDTH: f64 = 0.2;
const BAR_GROUP_OFFSET: f64 = 0.15;

fn render_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Momentum oscillator over time with the 70/30 reference lines and an
/// annotation of the final value.
pub fn render_momentum_chart(path: &Path, report: &StockReport) -> Result<(), ReportError> {
    let values = &report.momentum.values;
    let dates = report.prices.dates();
    let n = values.len();
    if n < 2 {
        return Err(ReportError::MissingData(
            "momentum series too short to chart".to_string(),
        ));
    }

    let root = BitMapBackend::new(path, (CHART_WIDTH, MOMENTUM_CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("RSI for {}", report.symbol), ("sans-serif", 48))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(0..n - 1, 10f64..100f64)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("RSI")
        .label_style(("sans-serif", 28))
        .x_label_formatter(&|idx| date_label(&dates, *idx))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, &v)| (i, v)),
            &BLUE,
        ))
        .map_err(render_err)?
        .label("RSI")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], BLUE));

    chart
        .draw_series(LineSeries::new([(0, 70.0), (n - 1, 70.0)], RED.mix(0.5)))
        .map_err(render_err)?
        .label("Overbought (70)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], RED));

    chart
        .draw_series(LineSeries::new([(0, 30.0), (n - 1, 30.0)], GREEN.mix(0.5)))
        .map_err(render_err)?
        .label("Oversold (30)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], GREEN));

    let latest = report.momentum.latest;
    let annotation_y = (latest + 5.0).clamp(12.0, 95.0);
    chart
        .draw_series(std::iter::once(Text::new(
            format!("Final RSI: {latest:.2}"),
            (n.saturating_sub(n / 5).saturating_sub(1), annotation_y),
            ("sans-serif", 32),
        )))
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", 28))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Grouped bars of revenue, operating profit and net profit across the last
/// fiscal quarters, in their display units.
pub fn render_income_chart(path: &Path, report: &StockReport) -> Result<(), ReportError> {
    let quarters = &report.quarters;
    if quarters.is_empty() {
        return Err(ReportError::MissingData(
            "no complete fiscal quarters to chart".to_string(),
        ));
    }
    let n = quarters.len();

    let spread: Vec<f64> = quarters
        .iter()
        .flat_map(|q| {
            [
                q.revenue.value,
                q.operating_profit.value,
                q.net_profit.value,
            ]
        })
        .collect();
    let y_max = spread.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_min = spread.iter().copied().fold(0.0f64, f64::min);
    let pad = (y_max - y_min).abs() * 0.1 + f64::EPSILON;

    let root = BitMapBackend::new(path, (CHART_WIDTH, INCOME_CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Income Statement - Revenue, Operating Profit, Net Profit",
            ("sans-serif", 44),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(110)
        .build_cartesian_2d(0f64..n as f64, (y_min - pad)..(y_max + pad))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Quarters")
        .y_desc(format!("Amount in {}", unit_text(quarters[0].revenue.unit)))
        .label_style(("sans-serif", 28))
        .x_labels(n + 1)
        .x_label_formatter(&|x| quarter_label(quarters, *x))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            quarters
                .iter()
                .enumerate()
                .map(|(i, q)| bar(i, 0, q.revenue.value, BLUE)),
        )
        .map_err(render_err)?
        .label(format!("Revenue ({})", unit_text(quarters[0].revenue.unit)))
        .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], BLUE.filled()));

    chart
        .draw_series(
            quarters
                .iter()
                .enumerate()
                .map(|(i, q)| bar(i, 1, q.operating_profit.value, GREEN)),
        )
        .map_err(render_err)?
        .label(format!(
            "Operating Profit ({})",
            unit_text(quarters[0].operating_profit.unit)
        ))
        .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], GREEN.filled()));

    chart
        .draw_series(
            quarters
                .iter()
                .enumerate()
                .map(|(i, q)| bar(i, 2, q.net_profit.value, RED)),
        )
        .map_err(render_err)?
        .label(format!(
            "Net Profit ({})",
            unit_text(quarters[0].net_profit.unit)
        ))
        .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], RED.filled()));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", 28))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn bar(index: usize, slot: usize, value: f64, color: RGBColor) -> Rectangle<(f64, f64)> {
    let x0 = index as f64 + BAR_GROUP_OFFSET + slot as f64 * BAR_WIDTH;
    Rectangle::new([(x0, 0.0), (x0 + BAR_WIDTH, value)], color.filled())
}

fn date_label(dates: &[NaiveDate], idx: usize) -> String {
    dates
        .get(idx)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

fn quarter_label(quarters: &[QuarterDisplay], x: f64) -> String {
    let idx = x.round() as usize;
    if (x - idx as f64).abs() > 1e-6 {
        return String::new();
    }
    quarters
        .get(idx)
        .map(|q| q.period_end.format("%b %Y").to_string())
        .unwrap_or_default()
}

fn unit_text(unit: MagnitudeUnit) -> &'static str {
    match unit {
        MagnitudeUnit::Unscaled => "INR",
        _ => unit.label(),
    }
}
