use crate::errors::RenderError;
use crate::layout::{Align, Page};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const MM_PER_POINT: f32 = 25.4 / 72.0;

/// Advance width, in thousandths of an em, used for glyphs missing from
/// `HELVETICA_WIDTHS`.
const FALLBACK_WIDTH: f32 = 556.0;

/// Helvetica and Helvetica-Bold advance widths for the glyphs amounts are
/// made of. Both faces agree on these.
const HELVETICA_WIDTHS: [(char, f32); 6] = [
    (' ', 278.0),
    (',', 278.0),
    ('.', 278.0),
    ('(', 333.0),
    (')', 333.0),
    ('-', 333.0),
];

/// TrueType fonts to embed instead of the built-in Helvetica faces.
///
/// Scripts outside Latin-1, such as Thai category names, need an embedded
/// font to display.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

/// Estimated rendered width of `text` in points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: f32 = text
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                556.0
            } else {
                HELVETICA_WIDTHS
                    .iter()
                    .find(|(glyph, _)| *glyph == c)
                    .map(|(_, width)| *width)
                    .unwrap_or(FALLBACK_WIDTH)
            }
        })
        .sum();

    units * size / 1000.0
}

/// Whether the built-in Helvetica faces can encode every character of
/// `text`. Anything outside Latin-1 is written as an empty string.
pub fn builtin_can_draw(text: &str) -> bool {
    text.chars().all(|c| u32::from(c) <= 0xFF)
}

fn mm(points: f32) -> Mm {
    Mm(points * MM_PER_POINT)
}

fn load_font(
    doc: &PdfDocumentReference,
    path: Option<&Path>,
    builtin: BuiltinFont,
) -> Result<IndirectFontRef, RenderError> {
    let font = match path {
        Some(path) => {
            debug!(path = %path.display(), "embedding font");
            doc.add_external_font(File::open(path)?)
        }
        None => doc.add_builtin_font(builtin),
    };

    font.map_err(|err| RenderError::Pdf(err.to_string()))
}

/// Draws `page` into a single-page PDF document titled `title`.
pub fn render_pdf(page: &Page, title: &str, fonts: &FontConfig) -> Result<Vec<u8>, RenderError> {
    let regular_builtin = fonts.regular.is_none();
    let bold_builtin = fonts.bold.is_none() && regular_builtin;
    for item in &page.items {
        let builtin = if item.style.is_bold() {
            bold_builtin
        } else {
            regular_builtin
        };
        if builtin && !builtin_can_draw(&item.text) {
            return Err(RenderError::MissingGlyphs(item.text.clone()));
        }
    }

    let (doc, page_index, layer_index) =
        PdfDocument::new(title, mm(page.width), mm(page.height), "Report");

    let regular = load_font(&doc, fonts.regular.as_deref(), BuiltinFont::Helvetica)?;
    let bold = load_font(
        &doc,
        fonts.bold.as_deref().or(fonts.regular.as_deref()),
        BuiltinFont::HelveticaBold,
    )?;

    let layer = doc.get_page(page_index).get_layer(layer_index);
    for item in &page.items {
        let font = if item.style.is_bold() { &bold } else { &regular };
        let x = match item.align {
            Align::Left => item.x,
            Align::Right => item.x - text_width(&item.text, item.size),
        };
        layer.use_text(item.text.as_str(), item.size, mm(x), mm(item.y), font);
    }

    debug!(items = page.items.len(), title, "rendered report page");
    doc.save_to_bytes()
        .map_err(|err| RenderError::Pdf(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{LedgerEntry, TransactionType};
    use crate::layout::{layout_page, Labels, Layout};
    use crate::money::Amount;
    use crate::report::Summary;

    #[test]
    fn should_measure_amount_glyphs() {
        // Six digits, one comma and one period.
        let width = text_width("1,234.56", 10.0);
        assert!((width - (6.0 * 5.56 + 2.0 * 2.78)).abs() < 0.001);

        // Parentheses widen the comparison value.
        assert!(text_width("(40.00)", 10.0) > text_width("40.00", 10.0));
        assert_eq!(text_width("", 12.0), 0.0);
    }

    #[test]
    fn should_render_pdf_document() {
        let entries = vec![
            LedgerEntry::new(
                TransactionType::Income,
                "Donations > Roof",
                "Fair",
                Amount::from_cents(150_000),
            ),
            LedgerEntry::new(
                TransactionType::Expense,
                "Utilities",
                "Water",
                Amount::from_cents(35_050),
            ),
        ];
        let page = layout_page(
            &Summary::from_entries(&entries).unwrap(),
            &Layout::default(),
            &Labels::default(),
        );

        let bytes = render_pdf(&page, "june", &FontConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn should_fail_on_missing_font_file() {
        let page = layout_page(
            &Summary::from_entries(&[]).unwrap(),
            &Layout::default(),
            &Labels::default(),
        );
        let fonts = FontConfig {
            regular: Some(PathBuf::from("/nonexistent/font.ttf")),
            bold: None,
        };

        match render_pdf(&page, "missing", &fonts) {
            Err(RenderError::Io(_)) => {}
            other => panic!("expected an I/O error, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn should_refuse_text_the_builtin_fonts_cannot_draw() {
        assert!(builtin_can_draw("Café (1,500.00)"));
        assert!(!builtin_can_draw("กองทุนการศึกษา"));

        let entries = vec![LedgerEntry::new(
            TransactionType::Income,
            "กองทุนการศึกษา",
            "ผู้ใหญ่ใจดี",
            Amount::from_cents(100),
        )];
        let page = layout_page(
            &Summary::from_entries(&entries).unwrap(),
            &Layout::default(),
            &Labels::default(),
        );

        match render_pdf(&page, "thai", &FontConfig::default()) {
            Err(RenderError::MissingGlyphs(text)) => assert_eq!(text, "กองทุนการศึกษา"),
            other => panic!("expected missing glyphs, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn should_leave_text_to_a_configured_bold_font() {
        // Only the heading is Thai, and headings use the bold face.
        let entries = vec![LedgerEntry::new(
            TransactionType::Income,
            "กองทุน",
            "Fair",
            Amount::from_cents(100),
        )];
        let page = layout_page(
            &Summary::from_entries(&entries).unwrap(),
            &Layout::default(),
            &Labels::default(),
        );
        let fonts = FontConfig {
            regular: None,
            bold: Some(PathBuf::from("/nonexistent/bold.ttf")),
        };

        // Getting as far as opening the font file means the glyph check passed.
        match render_pdf(&page, "bold", &fonts) {
            Err(RenderError::Io(_)) => {}
            other => panic!("expected an I/O error, got {:?}", other.map(|b| b.len())),
        }
    }
}
