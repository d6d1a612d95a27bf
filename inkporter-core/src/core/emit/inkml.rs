//! InkML export.
//!
//! Produces an InkML document: a header declaring the X/Y/F integer
//! channels, one `brush` definition per distinct pen style, then one
//! `trace` element per stroke inside a single top-level trace group.

use crate::core::error::Result;
use crate::core::geometry::{transform, AnchorTable, TransformConfig};
use crate::core::scene::{SceneTree, Stroke};
use crate::core::session::{ExportReport, ExportSession};
use crate::core::style::resolve_or_fallback;
use crate::core::traverse::{walk_tree, SceneVisitor};
use std::io::Write;

/// Pages in the consuming application have titles at the top; vertical
/// padding keeps ink clear of them.
const Y_PAD: f64 = 600.0;
const X_PAD: f64 = 0.0;
const WIDTH_CONV_CONSTANT: f64 = 10.0;
const HEIGHT_CONV_CONSTANT: f64 = 10.0;
/// The F channel is an integer; device pressure in `[0, 1]` is scaled by
/// this and truncated.
const PRESSURE_CONV_CONSTANT: f64 = 128.0;
const CONTEXT_ID: &str = "ctxCoordinatesWithPressure";

const XML_HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
    "<inkml:ink xmlns:emma=\"http://www.w3.org/2003/04/emma\" ",
    "xmlns:msink=\"http://schemas.microsoft.com/ink/2010/main\" ",
    "xmlns:inkml=\"http://www.w3.org/2003/InkML\">\n"
);

/// Exports `tree` as an InkML document written to `output`.
///
/// # Errors
///
/// A failure during the body phase surfaces as
/// [`crate::ExportError::Aborted`] carrying the count of traces already
/// written; the partial output is invalid. Per-stroke data problems are
/// recovered and counted in the returned report instead.
pub fn export_inkml<W: Write>(
    tree: &SceneTree,
    anchors: &AnchorTable,
    output: &mut W,
) -> Result<ExportReport> {
    let mut session = ExportSession::new(tree, anchors);
    log::debug!("exporting InkML with {} distinct brushes", session.styles().len());

    output.write_all(XML_HEADER.as_bytes())?;
    write_definitions(&session, output)?;

    let bbox = *session.bounding_box();
    let config = TransformConfig {
        normalize: true,
        scale_x: bbox.width() * WIDTH_CONV_CONSTANT,
        scale_y: bbox.height() * HEIGHT_CONV_CONSTANT,
        pad_x: X_PAD,
        pad_y: Y_PAD,
    };

    writeln!(output, "  <inkml:traceGroup>")?;
    let walked = {
        let mut visitor = TraceVisitor {
            session: &mut session,
            config,
            output: &mut *output,
        };
        walk_tree(tree, anchors, &mut visitor)
    };
    let stats = match walked {
        Ok(stats) => stats,
        Err(e) => return Err(e.aborted(session.emitted())),
    };
    writeln!(output, "  </inkml:traceGroup>")?;
    writeln!(output, "</inkml:ink>")?;

    let report = session.finish(stats);
    log::debug!("finished InkML export: {} traces", report.emitted);
    Ok(report)
}

/// Definitions phase: the shared ink context followed by one brush per
/// distinct style observed in the pre-scan.
fn write_definitions<W: Write>(session: &ExportSession, output: &mut W) -> Result<()> {
    write!(output, "  <inkml:definitions>")?;
    write!(
        output,
        r#"
    <inkml:context xml:id="{CONTEXT_ID}">
        <inkml:inkSource xml:id="inkSrcCoordinatesWithPressure">
            <inkml:traceFormat>
                <inkml:channel name="X" type="integer" max="32767" units="himetric" />
                <inkml:channel name="Y" type="integer" max="32767" units="himetric" />
                <inkml:channel name="F" type="integer" max="32767" units="dev" />
            </inkml:traceFormat>
            <inkml:channelProperties>
                <inkml:channelProperty channel="X" name="resolution" value="1" units="1/himetric" />
                <inkml:channelProperty channel="Y" name="resolution" value="1" units="1/himetric" />
                <inkml:channelProperty channel="F" name="resolution" value="1" units="1/dev" />
            </inkml:channelProperties>
        </inkml:inkSource>
    </inkml:context>
    "#
    )?;
    for style in session.styles() {
        write!(
            output,
            r##"
    <inkml:brush xml:id="{id}">
        <inkml:brushProperty name="width" value="{width}" units="himetric" />
        <inkml:brushProperty name="height" value="{height}" units="himetric" />
        <inkml:brushProperty name="color" value="#{r:02x}{g:02x}{b:02x}" />
        <inkml:brushProperty name="transparency" value="{transparency}" />
        <inkml:brushProperty name="tip" value="{tip}" />
        <inkml:brushProperty name="rasterOp" value="{raster_op}" />
        <inkml:brushProperty name="ignorePressure" value="false" />
        <inkml:brushProperty name="antiAliased" value="true" />
        <inkml:brushProperty name="fitToCurve" value="false" />
    </inkml:brush>"##,
            id = style.style_id(),
            width = style.width_himetric,
            height = style.height_himetric,
            r = style.rgb.0,
            g = style.rgb.1,
            b = style.rgb.2,
            transparency = style.transparency,
            tip = style.tip_shape.as_str(),
            raster_op = style.raster_op.as_str(),
        )?;
    }
    write!(output, "\n  </inkml:definitions>\n")?;
    Ok(())
}

/// Body phase: one trace element per visited stroke.
struct TraceVisitor<'a, W: Write> {
    session: &'a mut ExportSession,
    config: TransformConfig,
    output: &'a mut W,
}

impl<W: Write> SceneVisitor for TraceVisitor<'_, W> {
    fn visit_stroke(&mut self, stroke: &Stroke, offset: (f64, f64)) -> Result<()> {
        let trace_id = self.session.next_record_id();
        let (style, _) = resolve_or_fallback(stroke.tool, stroke.color, stroke.thickness_scale);
        let brush_id = style.style_id();
        let bbox = *self.session.bounding_box();

        let mut coords = String::with_capacity(stroke.points.len() * 12);
        for (i, pt) in stroke.points.iter().enumerate() {
            let (x, y) = transform(pt.x, pt.y, offset, &bbox, &self.config);
            let pressure = (pt.pressure * PRESSURE_CONV_CONSTANT) as i64;
            if i > 0 {
                coords.push(',');
            }
            coords.push_str(&format!("{} {} {}", x as i64, y as i64, pressure));
        }

        writeln!(
            self.output,
            "    <inkml:trace xml:id=\"{trace_id}\" contextRef=\"#{CONTEXT_ID}\" brushRef=\"#{brush_id}\">{coords}</inkml:trace>"
        )?;
        self.session.record_emitted();
        Ok(())
    }
}
