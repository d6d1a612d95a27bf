//! Minimal HTML rendering of the root text document.
//!
//! Only the typed text is rendered; ink is the other emitters' job. Each
//! paragraph becomes one absolutely positioned `div`, advancing by the
//! paragraph style's line height.

use crate::core::error::Result;
use crate::core::scene::{ParagraphStyle, SceneTree};
use crate::core::session::ExportReport;
use std::io::Write;

const X_OFFSET: f64 = 600.0;
/// Matches the ink exporters' vertical padding so text and ink line up when
/// both are imported into the same page.
const Y_PAD: f64 = 600.0;

/// CSS applied to each paragraph by style class.
fn paragraph_css(style: ParagraphStyle) -> &'static str {
    match style {
        ParagraphStyle::Basic | ParagraphStyle::Plain => "font-size:11pt",
        ParagraphStyle::Heading => "font-size:16pt;font-weight:bold",
        ParagraphStyle::Bold => "font-size:11pt;font-weight:bold",
        ParagraphStyle::Bullet | ParagraphStyle::Bullet2 => "font-size:11pt;margin-left:24px",
        ParagraphStyle::Checkbox | ParagraphStyle::CheckboxChecked => {
            "font-size:11pt;margin-left:24px"
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            // The note format stores soft line/paragraph separators the
            // target cannot display; translate them to breaks.
            '\u{2028}' | '\u{2029}' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

/// Exports the root text of `tree` as an HTML page written to `output`.
/// `title` names the page, typically the source document's stem.
///
/// # Errors
///
/// Returns [`crate::ExportError::Io`] if the sink fails.
pub fn export_html<W: Write>(tree: &SceneTree, title: &str, output: &mut W) -> Result<ExportReport> {
    write!(
        output,
        "<html>\n    <head>\n        <title>{}</title>\n    </head>\n    \
         <body data-absolute-enabled=\"true\" style=\"font-family:Calibri;font-size:11pt\">",
        escape(title)
    )?;

    let mut emitted = 0;
    if let Some(text) = &tree.root_text {
        let mut y_offset = Y_PAD;
        let xpos = (text.pos_x + X_OFFSET) as i64;
        let ypos = (text.pos_y / 2.0) as i64;
        for paragraph in &text.paragraphs {
            y_offset += 20.0;
            if paragraph.text.trim().is_empty() {
                continue;
            }
            write!(
                output,
                "\n                <div id=\"{id}\" style=\"position: absolute; left: {left}px; top: {top}px; width: {width}px\">\n                    <p style=\"{css}\">{content}</p>\n                </div>",
                id = paragraph.start_id,
                left = xpos,
                top = ypos + y_offset as i64,
                width = text.width as i64,
                css = paragraph_css(paragraph.style),
                content = escape(paragraph.text.trim()),
            )?;
            y_offset += paragraph.style.line_height() - 20.0;
            emitted += 1;
        }
    }

    write!(output, "\n    </body>\n</html>\n")?;
    log::debug!("finished HTML export: {emitted} paragraphs");
    Ok(ExportReport {
        emitted,
        ..ExportReport::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Group, Paragraph, Text};

    fn tree_with_text(paragraphs: Vec<Paragraph>) -> SceneTree {
        SceneTree {
            root: Group::new("root"),
            root_text: Some(Text {
                pos_x: 40.0,
                pos_y: 80.0,
                width: 400.0,
                paragraphs,
            }),
        }
    }

    fn paragraph(id: &str, text: &str, style: ParagraphStyle) -> Paragraph {
        Paragraph {
            start_id: id.to_string(),
            text: text.to_string(),
            style,
        }
    }

    #[test]
    fn test_renders_positioned_paragraphs() {
        let tree = tree_with_text(vec![
            paragraph("p1", "Shopping", ParagraphStyle::Heading),
            paragraph("p2", "milk & eggs", ParagraphStyle::Bullet),
        ]);
        let mut out = Vec::new();
        let report = export_html(&tree, "groceries", &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert_eq!(report.emitted, 2);
        assert!(html.contains("<title>groceries</title>"));
        assert!(html.contains("id=\"p1\""));
        assert!(html.contains("left: 640px"));
        assert!(html.contains("font-weight:bold"));
        assert!(html.contains("milk &amp; eggs"));
    }

    #[test]
    fn test_translates_soft_separators_to_breaks() {
        let tree = tree_with_text(vec![paragraph(
            "p1",
            "first\u{2028}second",
            ParagraphStyle::Plain,
        )]);
        let mut out = Vec::new();
        export_html(&tree, "t", &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("first<br>second"));
    }

    #[test]
    fn test_document_without_text_is_an_empty_page() {
        let tree = SceneTree::new(Group::new("root"));
        let mut out = Vec::new();
        let report = export_html(&tree, "empty", &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert_eq!(report.emitted, 0);
        assert!(html.contains("<body"));
        assert!(!html.contains("<div"));
    }
}
