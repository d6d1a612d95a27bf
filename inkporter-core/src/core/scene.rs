//! In-memory scene graph consumed by the export pipeline.
//!
//! The tree is produced by the upstream note parser and borrowed read-only
//! for the duration of an export run. Nothing in this module is mutated by
//! the exporters; all derived values (styles, order keys, bounding boxes)
//! live in [`ExportSession`](super::session::ExportSession).

use serde::{Deserialize, Serialize};

/// Vertical offset of the first text paragraph relative to the text block origin.
pub const TEXT_TOP_Y: f64 = -88.0;

/// One sampled pen position within a stroke.
///
/// `speed`, `direction`, and `width` are carried for the raw diagnostic dump;
/// the drawing exporters only consume `x`, `y`, and `pressure`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
    pub speed: f64,
    pub direction: f64,
    pub width: f64,
}

/// Pen tool codes as stored in the note file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PenKind {
    Paintbrush,
    Pencil,
    Ballpoint,
    Marker,
    Fineliner,
    Highlighter,
    Eraser,
    MechanicalPencil,
    EraseArea,
    Calligraphy,
    Shader,
}

impl PenKind {
    /// Raw numeric tool code as stored in the note file.
    #[must_use]
    pub fn raw_value(self) -> u32 {
        match self {
            Self::Eraser => 6,
            Self::EraseArea => 8,
            Self::Paintbrush => 12,
            Self::MechanicalPencil => 13,
            Self::Pencil => 14,
            Self::Ballpoint => 15,
            Self::Marker => 16,
            Self::Fineliner => 17,
            Self::Highlighter => 18,
            Self::Calligraphy => 21,
            Self::Shader => 23,
        }
    }

    /// Symbolic tool name used in style identifiers and the diagnostic dump.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Paintbrush => "Paintbrush",
            Self::Pencil => "Pencil",
            Self::Ballpoint => "Ballpoint",
            Self::Marker => "Marker",
            Self::Fineliner => "Fineliner",
            Self::Highlighter => "Highlighter",
            Self::Eraser => "Eraser",
            Self::MechanicalPencil => "MechanicalPencil",
            Self::EraseArea => "EraseArea",
            Self::Calligraphy => "Calligraphy",
            Self::Shader => "Shader",
        }
    }
}

/// Stroke color codes as stored in the note file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorId {
    Black,
    Gray,
    White,
    Yellow,
    Green,
    Pink,
    Blue,
    Red,
    GrayOverlap,
    /// Reserved highlight color with no palette entry of its own; the style
    /// resolver remaps it before palette lookup.
    Highlight,
    Green2,
    Cyan,
    Magenta,
    Yellow2,
}

impl ColorId {
    /// Raw numeric color code as stored in the note file.
    #[must_use]
    pub fn raw_value(self) -> u32 {
        match self {
            Self::Black => 0,
            Self::Gray => 1,
            Self::White => 2,
            Self::Yellow => 3,
            Self::Green => 4,
            Self::Pink => 5,
            Self::Blue => 6,
            Self::Red => 7,
            Self::GrayOverlap => 8,
            Self::Highlight => 9,
            Self::Green2 => 10,
            Self::Cyan => 11,
            Self::Magenta => 12,
            Self::Yellow2 => 13,
        }
    }

    /// Symbolic color name used in style identifiers and the diagnostic dump.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::Gray => "Gray",
            Self::White => "White",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Pink => "Pink",
            Self::Blue => "Blue",
            Self::Red => "Red",
            Self::GrayOverlap => "GrayOverlap",
            Self::Highlight => "Highlight",
            Self::Green2 => "Green2",
            Self::Cyan => "Cyan",
            Self::Magenta => "Magenta",
            Self::Yellow2 => "Yellow2",
        }
    }
}

/// One continuous pen gesture: an ordered sequence of sampled points plus
/// the tool attributes it was drawn with. Point order is drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub tool: PenKind,
    pub color: ColorId,
    pub thickness_scale: f64,
    pub starting_length: f64,
    pub move_id: Option<u32>,
    pub points: Vec<ScenePoint>,
}

/// A node in the scene hierarchy: either a nested group or a stroke.
///
/// This is a closed set: traversal matches exhaustively, so a new node kind
/// cannot be added without updating every handler. Text lives only at the
/// tree root, not inside groups.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Group(Group),
    Stroke(Stroke),
}

/// A scene group: an identity, ordered children, and an optional anchor.
///
/// The anchor names an entry in the externally-built
/// [`AnchorTable`](super::geometry::AnchorTable); its coordinates are a
/// relative offset applied to all descendant stroke points, composing
/// additively along the root-to-node path.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: String,
    pub anchor_id: Option<String>,
    /// Children in insertion order, keyed by child id. Order is a
    /// correctness requirement for export, not presentation.
    pub children: Vec<(String, SceneNode)>,
}

impl Group {
    /// Creates an empty group with no anchor.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            anchor_id: None,
            children: Vec::new(),
        }
    }
}

/// Typed paragraph style of the root text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParagraphStyle {
    Basic,
    Plain,
    Heading,
    Bold,
    Bullet,
    Bullet2,
    Checkbox,
    CheckboxChecked,
}

impl ParagraphStyle {
    /// Vertical advance of one paragraph of this style, in document units.
    #[must_use]
    pub fn line_height(self) -> f64 {
        match self {
            Self::Basic => 100.0,
            Self::Plain => 71.0,
            Self::Heading => 150.0,
            Self::Bold => 70.0,
            Self::Bullet | Self::Bullet2 => 35.0,
            Self::Checkbox | Self::CheckboxChecked => 100.0,
        }
    }
}

/// One paragraph of the root text document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Stable paragraph id from the note file.
    pub start_id: String,
    pub text: String,
    pub style: ParagraphStyle,
}

/// The root text document, positioned absolutely on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub pos_x: f64,
    pub pos_y: f64,
    pub width: f64,
    pub paragraphs: Vec<Paragraph>,
}

/// A parsed note page: the root group hierarchy plus an optional root text
/// document. Borrowed read-only by every exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTree {
    pub root: Group,
    pub root_text: Option<Text>,
}

impl SceneTree {
    /// Wraps a root group with no text document.
    #[must_use]
    pub fn new(root: Group) -> Self {
        Self {
            root,
            root_text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serialization_field_names() {
        let p = ScenePoint {
            x: 1.0,
            y: 2.0,
            pressure: 0.5,
            speed: 3.0,
            direction: 0.25,
            width: 2.0,
        };
        let json = serde_json::to_string(&p).unwrap();
        for field in ["\"x\"", "\"y\"", "\"pressure\"", "\"speed\"", "\"direction\"", "\"width\""] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }

    #[test]
    fn test_raw_values_round_trip_known_codes() {
        assert_eq!(PenKind::Ballpoint.raw_value(), 15);
        assert_eq!(PenKind::Eraser.raw_value(), 6);
        assert_eq!(ColorId::Black.raw_value(), 0);
        assert_eq!(ColorId::Highlight.raw_value(), 9);
    }

    #[test]
    fn test_children_preserve_insertion_order() {
        let mut g = Group::new("root");
        for id in ["first", "second", "third"] {
            g.children.push((id.to_string(), SceneNode::Group(Group::new(id))));
        }
        let ids: Vec<&str> = g.children.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_bullet_styles_share_line_height() {
        assert_eq!(
            ParagraphStyle::Bullet.line_height(),
            ParagraphStyle::Bullet2.line_height()
        );
        assert!(ParagraphStyle::Heading.line_height() > ParagraphStyle::Plain.line_height());
    }
}
