//! PDF rendering of a readiness [`Report`].

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use readiness_core::report::{format_score, Report};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 20.0;
const SCORE_COLUMN: f32 = 150.0;

/// Render `report` as a single-page US Letter PDF.
pub fn render(report: &Report) -> anyhow::Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(report.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("pdf font: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("pdf font: {e}"))?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT - 25.0;
    layer.use_text(report.title, 20.0, Mm(MARGIN), Mm(y), &bold);
    y -= 6.0;
    rule(&layer, y);

    y -= 12.0;
    layer.use_text("Summary", 14.0, Mm(MARGIN), Mm(y), &bold);
    y -= 8.0;
    layer.use_text(
        format!("Total Score: {}", format_score(report.total_score)),
        12.0,
        Mm(MARGIN),
        Mm(y),
        &regular,
    );
    y -= 7.0;
    layer.use_text(
        format!("Readiness Level: {}", report.readiness_label()),
        12.0,
        Mm(MARGIN),
        Mm(y),
        &regular,
    );

    y -= 14.0;
    row(&layer, y, "Category", "Score", &bold);
    y -= 3.0;
    rule(&layer, y);
    for r in &report.rows {
        y -= 7.0;
        row(&layer, y, r.label, &format_score(r.score), &regular);
    }

    y -= 16.0;
    layer.use_text("Recommendations", 14.0, Mm(MARGIN), Mm(y), &bold);
    if report.recommendations.is_empty() {
        y -= 8.0;
        layer.use_text(
            "No recommendations: every category meets its target.",
            11.0,
            Mm(MARGIN),
            Mm(y),
            &regular,
        );
    }
    for rec in &report.recommendations {
        y -= 8.0;
        layer.use_text(format!("- {rec}"), 11.0, Mm(MARGIN), Mm(y), &regular);
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow::anyhow!("pdf encode: {e}"))
}

fn row(layer: &PdfLayerReference, y: f32, label: &str, score: &str, font: &IndirectFontRef) {
    layer.use_text(label, 12.0, Mm(MARGIN), Mm(y), font);
    layer.use_text(score, 12.0, Mm(SCORE_COLUMN), Mm(y), font);
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}
