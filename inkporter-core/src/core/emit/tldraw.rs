//! TLDraw JSON export with fractional-index ordering.
//!
//! Produces one JSON document: file-format and schema headers, the fixed
//! document/pointer/page/instance records the format expects, then one shape
//! record per stroke and per root-text paragraph. Every shape carries an
//! order key from the key algebra, so shapes can later be reordered or
//! interleaved without renumbering.

use crate::core::error::Result;
use crate::core::geometry::{transform, AnchorTable, TransformConfig};
use crate::core::scene::{ColorId, Paragraph, SceneTree, Stroke};
use crate::core::session::{ExportReport, ExportSession};
use crate::core::traverse::{walk_tree, SceneVisitor};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use uuid::Uuid;

const FILE_FORMAT_VERSION: u32 = 1;
const SCHEMA_VERSION: u32 = 2;
const PAGE_ID: &str = "page:page";

/// Scale up for better visibility in the consuming canvas.
const SCALE_FACTOR: f64 = 2.0;
const X_OFFSET: f64 = 100.0;
const Y_OFFSET: f64 = 100.0;

const TRANSFORM: TransformConfig = TransformConfig {
    normalize: false,
    scale_x: SCALE_FACTOR,
    scale_y: SCALE_FACTOR,
    pad_x: X_OFFSET,
    pad_y: Y_OFFSET,
};

/// Canvas color name for each stroke color. Exhaustive, so a new color code
/// cannot ship without a canvas mapping.
fn color_name(color: ColorId) -> &'static str {
    match color {
        ColorId::Black => "black",
        ColorId::Gray | ColorId::GrayOverlap => "grey",
        ColorId::White => "white",
        ColorId::Yellow | ColorId::Yellow2 | ColorId::Highlight => "yellow",
        ColorId::Green => "green",
        ColorId::Green2 => "light-green",
        ColorId::Pink | ColorId::Red => "red",
        ColorId::Blue => "blue",
        ColorId::Cyan => "light-blue",
        ColorId::Magenta => "violet",
    }
}

/// Size class for a thickness scale.
fn size_class(thickness_scale: f64) -> &'static str {
    if thickness_scale <= 1.0 {
        "s"
    } else if thickness_scale <= 2.0 {
        "m"
    } else if thickness_scale <= 3.0 {
        "l"
    } else {
        "xl"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeRecord<P: Serialize> {
    x: f64,
    y: f64,
    rotation: f64,
    is_locked: bool,
    opacity: f64,
    meta: Value,
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    props: P,
    parent_id: &'static str,
    index: String,
    type_name: &'static str,
}

#[derive(Debug, Serialize)]
struct ShapePoint {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize)]
struct Segment {
    #[serde(rename = "type")]
    kind: &'static str,
    points: Vec<ShapePoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DrawProps {
    segments: Vec<Segment>,
    color: &'static str,
    fill: &'static str,
    dash: &'static str,
    size: &'static str,
    is_complete: bool,
    is_closed: bool,
    is_pen: bool,
    scale: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextProps {
    color: &'static str,
    size: &'static str,
    w: f64,
    font: &'static str,
    text_align: &'static str,
    auto_size: bool,
    scale: f64,
    rich_text: Value,
}

/// Exports `tree` as a TLDraw JSON document written to `output`.
///
/// # Errors
///
/// A failure during the body phase (key algebra, record serialization)
/// surfaces as [`crate::ExportError::Aborted`] carrying the count of shapes
/// already recorded; the partial output is invalid.
/// [`crate::ExportError::Io`] is returned if the sink fails while the
/// finished document is written out.
pub fn export_tldraw<W: Write>(
    tree: &SceneTree,
    anchors: &AnchorTable,
    output: &mut W,
) -> Result<ExportReport> {
    let mut session = ExportSession::new(tree, anchors);
    let mut records = boilerplate_records();
    log::debug!("exporting TLDraw document");

    let walked = {
        let mut visitor = ShapeVisitor {
            session: &mut session,
            records: &mut records,
        };
        walk_tree(tree, anchors, &mut visitor)
    };
    let stats = match walked {
        Ok(stats) => stats,
        Err(e) => return Err(e.aborted(session.emitted())),
    };

    let doc = json!({
        "tldrawFileFormatVersion": FILE_FORMAT_VERSION,
        "schema": {
            "schemaVersion": SCHEMA_VERSION,
            "sequences": schema_sequences(),
        },
        "records": records,
    });
    serde_json::to_writer_pretty(&mut *output, &doc)?;
    output.write_all(b"\n")?;

    let report = session.finish(stats);
    log::debug!("finished TLDraw export: {} shapes", report.emitted);
    Ok(report)
}

/// Body phase: one shape record per stroke or text paragraph.
struct ShapeVisitor<'a> {
    session: &'a mut ExportSession,
    records: &'a mut Vec<Value>,
}

impl SceneVisitor for ShapeVisitor<'_> {
    fn visit_stroke(&mut self, stroke: &Stroke, offset: (f64, f64)) -> Result<()> {
        let index = self.session.next_order_key()?;
        let bbox = *self.session.bounding_box();

        let mut shape_x = f64::INFINITY;
        let mut shape_y = f64::INFINITY;
        let mut points = Vec::with_capacity(stroke.points.len());
        for pt in &stroke.points {
            let (x, y) = transform(pt.x, pt.y, offset, &bbox, &TRANSFORM);
            shape_x = shape_x.min(x);
            shape_y = shape_y.min(y);
            points.push(ShapePoint {
                x,
                y,
                z: pt.pressure,
            });
        }
        // Points are stored relative to the shape's own origin.
        for p in &mut points {
            p.x -= shape_x;
            p.y -= shape_y;
        }

        let record = ShapeRecord {
            x: shape_x,
            y: shape_y,
            rotation: 0.0,
            is_locked: false,
            opacity: 1.0,
            meta: json!({}),
            id: format!("shape:{}", Uuid::new_v4()),
            kind: "draw",
            props: DrawProps {
                segments: vec![Segment {
                    kind: "free",
                    points,
                }],
                color: color_name(stroke.color),
                fill: "none",
                dash: "draw",
                size: size_class(stroke.thickness_scale),
                is_complete: true,
                is_closed: false,
                is_pen: false,
                scale: 1.0,
            },
            parent_id: PAGE_ID,
            index,
            type_name: "shape",
        };
        self.records.push(serde_json::to_value(record)?);
        self.session.record_emitted();
        Ok(())
    }

    fn visit_paragraph(&mut self, paragraph: &Paragraph, offset: (f64, f64)) -> Result<()> {
        let index = self.session.next_order_key()?;
        let bbox = *self.session.bounding_box();
        let (x, y) = transform(offset.0, offset.1, (0.0, 0.0), &bbox, &TRANSFORM);
        let content = paragraph.text.trim();

        let record = ShapeRecord {
            x,
            y,
            rotation: 0.0,
            is_locked: false,
            opacity: 1.0,
            meta: json!({}),
            id: format!("shape:{}", Uuid::new_v4()),
            kind: "text",
            props: TextProps {
                color: "black",
                size: "m",
                // Approximate width from the character count.
                w: content.chars().count() as f64 * 10.0,
                font: "draw",
                text_align: "start",
                auto_size: true,
                scale: 1.0,
                rich_text: json!({
                    "type": "doc",
                    "content": [{
                        "type": "paragraph",
                        "attrs": { "dir": "auto" },
                        "content": [{ "type": "text", "text": content }],
                    }],
                }),
            },
            parent_id: PAGE_ID,
            index,
            type_name: "shape",
        };
        self.records.push(serde_json::to_value(record)?);
        self.session.record_emitted();
        Ok(())
    }
}

/// The fixed records every document of this format opens with.
fn boilerplate_records() -> Vec<Value> {
    vec![
        json!({
            "gridSize": 10,
            "name": "",
            "meta": {},
            "id": "document:document",
            "typeName": "document",
        }),
        json!({
            "id": "pointer:pointer",
            "typeName": "pointer",
            "x": 0,
            "y": 0,
            "lastActivityTimestamp": chrono::Utc::now().timestamp_millis(),
            "meta": {},
        }),
        json!({
            "meta": {},
            "id": PAGE_ID,
            "name": "Page 1",
            "index": "a1",
            "typeName": "page",
        }),
        json!({
            "followingUserId": null,
            "opacityForNextShape": 1,
            "stylesForNextShape": { "tldraw:geo": "rectangle" },
            "brush": null,
            "scribbles": [],
            "cursor": { "type": "default", "rotation": 0 },
            "isFocusMode": false,
            "exportBackground": true,
            "isDebugMode": false,
            "isToolLocked": false,
            "screenBounds": { "x": 0, "y": 0, "w": 1502, "h": 809 },
            "insets": [false, false, false, false],
            "zoomBrush": null,
            "isGridMode": false,
            "isPenMode": false,
            "chatMessage": "",
            "isChatting": false,
            "highlightedUserIds": [],
            "isFocused": true,
            "devicePixelRatio": 2,
            "isCoarsePointer": false,
            "isHoveringCanvas": true,
            "openMenus": [],
            "isChangingStyle": false,
            "isReadonly": false,
            "meta": {},
            "duplicateProps": null,
            "id": "instance:instance",
            "currentPageId": PAGE_ID,
            "typeName": "instance",
        }),
        json!({
            "editingShapeId": null,
            "croppingShapeId": null,
            "selectedShapeIds": [],
            "hoveredShapeId": null,
            "erasingShapeIds": [],
            "hintingShapeIds": [],
            "focusedGroupId": null,
            "meta": {},
            "id": format!("instance_page_state:{PAGE_ID}"),
            "pageId": PAGE_ID,
            "typeName": "instance_page_state",
        }),
        json!({
            "x": 0,
            "y": 0,
            "z": 1,
            "meta": {},
            "id": format!("camera:{PAGE_ID}"),
            "typeName": "camera",
        }),
    ]
}

fn schema_sequences() -> Value {
    json!({
        "com.tldraw.store": 5,
        "com.tldraw.asset": 1,
        "com.tldraw.camera": 1,
        "com.tldraw.document": 2,
        "com.tldraw.instance": 25,
        "com.tldraw.instance_page_state": 5,
        "com.tldraw.page": 1,
        "com.tldraw.instance_presence": 6,
        "com.tldraw.pointer": 1,
        "com.tldraw.shape": 4,
        "com.tldraw.asset.bookmark": 2,
        "com.tldraw.asset.image": 5,
        "com.tldraw.asset.video": 5,
        "com.tldraw.shape.group": 0,
        "com.tldraw.shape.text": 3,
        "com.tldraw.shape.bookmark": 2,
        "com.tldraw.shape.draw": 2,
        "com.tldraw.shape.geo": 10,
        "com.tldraw.shape.note": 9,
        "com.tldraw.shape.line": 5,
        "com.tldraw.shape.frame": 1,
        "com.tldraw.shape.arrow": 7,
        "com.tldraw.shape.highlight": 1,
        "com.tldraw.shape.embed": 4,
        "com.tldraw.shape.image": 5,
        "com.tldraw.shape.video": 4,
        "com.tldraw.binding.arrow": 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order_key;
    use crate::core::scene::{Group, ParagraphStyle, PenKind, SceneNode, ScenePoint, Text};

    fn point(x: f64, y: f64, pressure: f64) -> ScenePoint {
        ScenePoint {
            x,
            y,
            pressure,
            speed: 0.0,
            direction: 0.0,
            width: 1.0,
        }
    }

    fn stroke(color: ColorId, thickness: f64, points: Vec<ScenePoint>) -> Stroke {
        Stroke {
            tool: PenKind::Marker,
            color,
            thickness_scale: thickness,
            starting_length: 0.0,
            move_id: None,
            points,
        }
    }

    fn sample_tree() -> SceneTree {
        let mut root = Group::new("root");
        root.children.push((
            "s1".to_string(),
            SceneNode::Stroke(stroke(
                ColorId::Red,
                2.0,
                vec![point(0.0, 0.0, 0.5), point(10.0, 20.0, 0.7)],
            )),
        ));
        root.children.push((
            "s2".to_string(),
            SceneNode::Stroke(stroke(ColorId::Cyan, 4.0, vec![point(5.0, 5.0, 0.5)])),
        ));
        SceneTree {
            root,
            root_text: Some(Text {
                pos_x: 30.0,
                pos_y: 40.0,
                width: 400.0,
                paragraphs: vec![Paragraph {
                    start_id: "p1".to_string(),
                    text: "  Hello ink  ".to_string(),
                    style: ParagraphStyle::Plain,
                }],
            }),
        }
    }

    fn export_to_value(tree: &SceneTree) -> (Value, ExportReport) {
        let mut out = Vec::new();
        let report = export_tldraw(tree, &AnchorTable::new(), &mut out).unwrap();
        (serde_json::from_slice(&out).unwrap(), report)
    }

    fn shapes(doc: &Value) -> Vec<&Value> {
        doc["records"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["typeName"] == "shape")
            .collect()
    }

    #[test]
    fn test_document_header_and_boilerplate() {
        let (doc, _) = export_to_value(&sample_tree());
        assert_eq!(doc["tldrawFileFormatVersion"], 1);
        assert_eq!(doc["schema"]["schemaVersion"], 2);
        assert_eq!(doc["schema"]["sequences"]["com.tldraw.shape.draw"], 2);

        let type_names: Vec<&str> = doc["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["typeName"].as_str().unwrap())
            .collect();
        for expected in ["document", "pointer", "page", "instance", "instance_page_state", "camera"] {
            assert!(type_names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_shapes_carry_increasing_valid_indexes() {
        let (doc, report) = export_to_value(&sample_tree());
        let shapes = shapes(&doc);
        // One text paragraph plus two strokes.
        assert_eq!(shapes.len(), 3);
        assert_eq!(report.emitted, 3);

        let indexes: Vec<&str> = shapes.iter().map(|s| s["index"].as_str().unwrap()).collect();
        for window in indexes.windows(2) {
            assert!(window[0] < window[1], "{window:?} out of order");
        }
        for index in indexes {
            assert!(order_key::is_valid_key(index), "{index} invalid");
        }
    }

    #[test]
    fn test_text_shape_precedes_stroke_shapes() {
        let (doc, _) = export_to_value(&sample_tree());
        let shapes = shapes(&doc);
        assert_eq!(shapes[0]["type"], "text");
        assert_eq!(
            shapes[0]["props"]["richText"]["content"][0]["content"][0]["text"],
            "Hello ink"
        );
        assert_eq!(shapes[1]["type"], "draw");
    }

    #[test]
    fn test_stroke_points_are_normalized_to_shape_origin() {
        let (doc, _) = export_to_value(&sample_tree());
        let all = shapes(&doc);
        let draw = all[1];
        // Points (0,0) and (10,20) scale to (100,100) and (120,140); the
        // shape sits at the transformed minimum.
        assert_eq!(draw["x"], 100.0);
        assert_eq!(draw["y"], 100.0);
        let points = draw["props"]["segments"][0]["points"].as_array().unwrap();
        assert_eq!(points[0]["x"], 0.0);
        assert_eq!(points[0]["z"], 0.5);
        assert_eq!(points[1]["x"], 20.0);
        assert_eq!(points[1]["y"], 40.0);
    }

    #[test]
    fn test_color_and_size_mapping() {
        let (doc, _) = export_to_value(&sample_tree());
        let all = shapes(&doc);
        assert_eq!(all[1]["props"]["color"], "red");
        assert_eq!(all[1]["props"]["size"], "m");
        assert_eq!(all[2]["props"]["color"], "light-blue");
        assert_eq!(all[2]["props"]["size"], "xl");
    }

    #[test]
    fn test_shapes_are_parented_to_the_page() {
        let (doc, _) = export_to_value(&sample_tree());
        for shape in shapes(&doc) {
            assert_eq!(shape["parentId"], PAGE_ID);
            let id = shape["id"].as_str().unwrap();
            assert!(id.starts_with("shape:"));
        }
    }

    #[test]
    fn test_sentinel_color_maps_to_yellow() {
        assert_eq!(color_name(ColorId::Highlight), "yellow");
    }
}
