//! Raw diagnostic dump.
//!
//! Preserves every per-point field (x, y, speed, direction, width, pressure)
//! and per-stroke attribute with **no coordinate transform**, for debugging
//! and round-trip verification against the source document.

use crate::core::error::Result;
use crate::core::geometry::AnchorTable;
use crate::core::scene::{ScenePoint, SceneTree, Stroke};
use crate::core::session::ExportReport;
use crate::core::traverse::{walk_tree, SceneVisitor};
use serde::{Deserialize, Serialize};
use std::io::Write;

const FORMAT_VERSION: &str = "2.0.0";
const SOURCE_TAG: &str = "inkporter-raw";

/// Top-level structure of the dump.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub version: String,
    pub source: String,
    pub strokes: Vec<RawStroke>,
    pub metadata: RawMetadata,
}

/// A tool or color carried as both symbolic name and raw numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    #[serde(rename = "type")]
    pub name: String,
    pub value: u32,
}

/// One stroke with every field the scene model carries.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStroke {
    pub id: u64,
    pub tool: RawTag,
    pub color: RawTag,
    pub thickness_scale: f64,
    pub starting_length: f64,
    pub move_id: Option<u32>,
    pub points: Vec<ScenePoint>,
}

/// Dump-level summary.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub total_strokes: usize,
    pub pen_kinds: Vec<String>,
    pub colors: Vec<String>,
}

/// Exports every stroke of `tree` untransformed as JSON written to `output`.
///
/// # Errors
///
/// Returns [`crate::ExportError::Json`] or [`crate::ExportError::Io`] if
/// serialization or the sink fails.
pub fn export_raw<W: Write>(tree: &SceneTree, output: &mut W) -> Result<ExportReport> {
    struct RawCollector {
        strokes: Vec<RawStroke>,
        pen_kinds: Vec<String>,
        colors: Vec<String>,
    }

    impl SceneVisitor for RawCollector {
        fn visit_stroke(&mut self, stroke: &Stroke, _offset: (f64, f64)) -> Result<()> {
            let tool = stroke.tool.name().to_string();
            let color = stroke.color.name().to_string();
            if !self.pen_kinds.contains(&tool) {
                self.pen_kinds.push(tool.clone());
            }
            if !self.colors.contains(&color) {
                self.colors.push(color.clone());
            }
            self.strokes.push(RawStroke {
                id: self.strokes.len() as u64,
                tool: RawTag {
                    name: tool,
                    value: stroke.tool.raw_value(),
                },
                color: RawTag {
                    name: color,
                    value: stroke.color.raw_value(),
                },
                thickness_scale: stroke.thickness_scale,
                starting_length: stroke.starting_length,
                move_id: stroke.move_id,
                points: stroke.points.clone(),
            });
            Ok(())
        }
    }

    let mut collector = RawCollector {
        strokes: Vec::new(),
        pen_kinds: Vec::new(),
        colors: Vec::new(),
    };
    // Anchors are irrelevant here: the dump is deliberately untransformed.
    let stats = walk_tree(tree, &AnchorTable::new(), &mut collector)?;

    let emitted = collector.strokes.len();
    let doc = RawDocument {
        version: FORMAT_VERSION.to_string(),
        source: SOURCE_TAG.to_string(),
        metadata: RawMetadata {
            total_strokes: emitted,
            pen_kinds: collector.pen_kinds,
            colors: collector.colors,
        },
        strokes: collector.strokes,
    };
    serde_json::to_writer_pretty(&mut *output, &doc)?;
    output.write_all(b"\n")?;
    log::debug!("finished raw export: {emitted} strokes");

    Ok(ExportReport {
        emitted,
        skipped_empty_strokes: stats.skipped_empty_strokes,
        skipped_deep_groups: stats.skipped_deep_groups,
        style_fallbacks: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{ColorId, Group, PenKind, SceneNode};

    fn sample_stroke() -> Stroke {
        Stroke {
            tool: PenKind::Pencil,
            color: ColorId::Blue,
            thickness_scale: 1.5,
            starting_length: 12.5,
            move_id: Some(3),
            points: vec![ScenePoint {
                x: -4.25,
                y: 17.0,
                pressure: 0.66,
                speed: 2.5,
                direction: 0.785,
                width: 3.125,
            }],
        }
    }

    fn sample_tree() -> SceneTree {
        let mut root = Group::new("root");
        root.children
            .push(("s1".to_string(), SceneNode::Stroke(sample_stroke())));
        SceneTree::new(root)
    }

    #[test]
    fn test_round_trips_every_field_untransformed() {
        let mut out = Vec::new();
        export_raw(&sample_tree(), &mut out).unwrap();
        let doc: RawDocument = serde_json::from_slice(&out).unwrap();

        assert_eq!(doc.strokes.len(), 1);
        let stroke = &doc.strokes[0];
        assert_eq!(stroke.id, 0);
        assert_eq!(stroke.tool, RawTag { name: "Pencil".to_string(), value: 14 });
        assert_eq!(stroke.color, RawTag { name: "Blue".to_string(), value: 6 });
        assert_eq!(stroke.thickness_scale, 1.5);
        assert_eq!(stroke.starting_length, 12.5);
        assert_eq!(stroke.move_id, Some(3));
        assert_eq!(stroke.points, sample_stroke().points);
    }

    #[test]
    fn test_metadata_summarizes_distinct_names() {
        let mut tree = sample_tree();
        tree.root
            .children
            .push(("s2".to_string(), SceneNode::Stroke(sample_stroke())));
        let mut out = Vec::new();
        let report = export_raw(&tree, &mut out).unwrap();
        let doc: RawDocument = serde_json::from_slice(&out).unwrap();

        assert_eq!(report.emitted, 2);
        assert_eq!(doc.metadata.total_strokes, 2);
        assert_eq!(doc.metadata.pen_kinds, ["Pencil"]);
        assert_eq!(doc.metadata.colors, ["Blue"]);
        assert_eq!(doc.version, FORMAT_VERSION);
    }
}
