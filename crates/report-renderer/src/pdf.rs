use analysis_core::{ReportError, StockReport};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 12.0;
const DESCRIPTION_CHARS: usize = 200;
const WRAP_CHARS: usize = 95;

fn render_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

fn red() -> Color {
    Color::Rgb(Rgb::new(1.0, 0.0, 0.0, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// Two-page A4 report: company block, drawdown block, momentum section with
/// chart, valuation section, income section with chart, final conclusion.
/// This is the only place absent metadata turns into "not available" text.
pub fn write_report_pdf(
    path: &Path,
    report: &StockReport,
    momentum_chart: &Path,
    income_chart: &Path,
) -> Result<(), ReportError> {
    let company_name = report
        .profile
        .short_name
        .clone()
        .unwrap_or_else(|| "Company Name not available".to_string());

    let (doc, page1, layer1) = PdfDocument::new(
        format!("Stock Analysis Report for {company_name}"),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_err)?;

    // ---- Page 1 ----
    let layer = doc.get_page(page1).get_layer(layer1);

    let title = format!("Stock Analysis Report for {company_name}");
    layer.set_fill_color(black());
    layer.use_text(&title, 16.0, Mm(centered_x(&title, 16.0)), Mm(282.0), &bold);
    draw_rule(&layer, MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM, 277.5);
    draw_rule(&layer, MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM, 275.5);

    section_heading(&layer, &bold, "1) COMPANY INFORMATION:", 265.0);
    layer.set_fill_color(black());
    layer.use_text(
        format!("Name: {company_name}"),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(257.0),
        &regular,
    );
    layer.use_text(
        format!(
            "Sector: {}",
            report.profile.sector.as_deref().unwrap_or("Sector not available")
        ),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(250.0),
        &regular,
    );
    layer.use_text(
        format!("Market Cap: {}", market_cap_text(report.profile.market_cap)),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(243.0),
        &regular,
    );

    let description = report
        .profile
        .long_summary
        .as_deref()
        .map(|summary| shorten(summary, DESCRIPTION_CHARS))
        .unwrap_or_else(|| "Description not available".to_string());
    let mut y = 233.0;
    for line in wrap_text(&format!("Description: {description}"), WRAP_CHARS) {
        layer.use_text(line, 10.0, Mm(MARGIN_MM + 4.0), Mm(y), &regular);
        y -= 6.0;
    }

    section_heading(&layer, &bold, "2) ALL TIME HIGH :", 202.0);
    layer.set_fill_color(black());
    layer.use_text(
        format!("(INR {:.2})", report.drawdown.all_time_high),
        12.0,
        Mm(62.0),
        Mm(202.0),
        &bold,
    );
    layer.use_text(
        format!("Current Price: INR {:.2}", report.drawdown.current_price),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(194.0),
        &regular,
    );
    layer.use_text(
        format!("Recommendation: {}", report.drawdown.advice.label()),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(187.0),
        &regular,
    );

    section_heading(&layer, &bold, "3) RELATIVE STRENGTH INDEX (RSI) :", 176.0);
    layer.set_fill_color(black());
    layer.use_text(
        format!("RSI Recommendation: {}", report.momentum.advice.label()),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(169.0),
        &regular,
    );
    embed_png(&layer, momentum_chart, 15.0, 68.0)?;

    page_footer(&layer, &regular, 1);

    // ---- Page 2 ----
    let (page2, layer2_index) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page2).get_layer(layer2_index);

    section_heading(&layer, &bold, "4) P/E RATIO :", 282.0);
    layer.set_fill_color(black());
    let multiple_text = match report.valuation.trailing_pe {
        Some(pe) => format!("( {pe:.2} )"),
        None => "( not available )".to_string(),
    };
    layer.use_text(multiple_text, 12.0, Mm(55.0), Mm(282.0), &bold);
    layer.use_text(
        format!("Recommendation: {}", report.valuation.advice.label()),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(274.0),
        &regular,
    );

    section_heading(
        &layer,
        &bold,
        "5) INCOME STATEMENT - RECENT QUARTERS (INR)",
        262.0,
    );
    layer.set_fill_color(black());
    layer.use_text(
        format!("Fundamental Recommendation: {}", report.trend.advice.label()),
        10.0,
        Mm(MARGIN_MM + 4.0),
        Mm(254.0),
        &regular,
    );
    embed_png(&layer, income_chart, 15.0, 128.0)?;

    let final_heading = "FINAL RECOMMENDATION";
    layer.set_fill_color(red());
    layer.use_text(
        final_heading,
        15.0,
        Mm(centered_x(final_heading, 15.0)),
        Mm(105.0),
        &bold,
    );
    layer.set_fill_color(black());
    let mut y = 95.0;
    for line in wrap_text(report.conclusion.label(), 80) {
        layer.use_text(&line, 12.0, Mm(centered_x(&line, 12.0)), Mm(y), &bold);
        y -= 7.0;
    }

    page_footer(&layer, &regular, 2);

    doc.save(&mut BufWriter::new(File::create(path)?))
        .map_err(render_err)?;
    Ok(())
}

/// Red underlined section label at the left margin
fn section_heading(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, y: f32) {
    layer.set_fill_color(red());
    layer.use_text(text, 12.0, Mm(MARGIN_MM), Mm(y), font);
    layer.set_outline_color(red());
    draw_rule(layer, MARGIN_MM, MARGIN_MM + text_width_mm(text, 12.0), y - 1.5);
    layer.set_outline_color(black());
}

fn page_footer(layer: &PdfLayerReference, font: &IndirectFontRef, number: u32) {
    let text = format!("Page {number}");
    layer.set_fill_color(black());
    layer.use_text(&text, 8.0, Mm(centered_x(&text, 8.0)), Mm(10.0), font);
}

fn draw_rule(layer: &PdfLayerReference, x0: f32, x1: f32, y: f32) {
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x0), Mm(y)), false),
            (Point::new(Mm(x1), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Decode a chart PNG and place it at `(x, y)` in page millimeters. The
/// rasters are produced at a width that reads correctly at the default dpi.
fn embed_png(layer: &PdfLayerReference, path: &Path, x: f32, y: f32) -> Result<(), ReportError> {
    let file = File::open(path)?;
    let decoder = PngDecoder::new(BufReader::new(file)).map_err(render_err)?;
    let image = Image::try_from(decoder).map_err(render_err)?;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            ..Default::default()
        },
    );
    Ok(())
}

/// Approximate Helvetica line width; used only to center headings
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

fn centered_x(text: &str, font_size: f32) -> f32 {
    ((PAGE_WIDTH_MM - text_width_mm(text, font_size)) / 2.0).max(MARGIN_MM)
}

/// First `max_chars` characters with a trailing ellipsis
fn shorten(text: &str, max_chars: usize) -> String {
    let mut short: String = text.chars().take(max_chars).collect();
    short.push_str("...");
    short
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn market_cap_text(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(cap) => format!("{:.2} Crores", cap / 1e7),
        None => "Market cap not available".to_string(),
    }
}
