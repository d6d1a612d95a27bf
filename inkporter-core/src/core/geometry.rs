//! Bounding-box measurement, anchor resolution, and coordinate transforms.
//!
//! The bounding box is computed in a full first pass over the tree and
//! frozen before any coordinate is scaled; the transform reads it but never
//! writes it. Interleaving measurement with emission would let a late point
//! resize the box after earlier points were already scaled.

use crate::core::scene::{Group, SceneNode};
use std::collections::HashMap;

/// Axis-aligned bounds over all stroke points of a document, in
/// pre-transform coordinates with anchor offsets applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Measures the bounds of every stroke point under `root`, composing
    /// each point with its group's accumulated anchor offset. A document
    /// with no points yields the zero box.
    #[must_use]
    pub fn measure(root: &Group, anchors: &AnchorTable) -> Self {
        let mut bbox = Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        accumulate(root, anchors, (0.0, 0.0), &mut bbox);
        if bbox.min_x > bbox.max_x {
            return Self::default();
        }
        bbox
    }

    /// Horizontal extent; a degenerate axis collapses to 1 so normalization
    /// never divides by zero.
    #[must_use]
    pub fn width(&self) -> f64 {
        let w = self.max_x - self.min_x;
        if w == 0.0 {
            1.0
        } else {
            w
        }
    }

    /// Vertical extent, with the same degenerate-axis rule as [`width`](Self::width).
    #[must_use]
    pub fn height(&self) -> f64 {
        let h = self.max_y - self.min_y;
        if h == 0.0 {
            1.0
        } else {
            h
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

fn accumulate(group: &Group, anchors: &AnchorTable, offset: (f64, f64), bbox: &mut BoundingBox) {
    for (_, child) in &group.children {
        match child {
            SceneNode::Group(g) => {
                let (ax, ay) = anchors.resolve(g);
                accumulate(g, anchors, (offset.0 + ax, offset.1 + ay), bbox);
            }
            SceneNode::Stroke(s) => {
                for p in &s.points {
                    bbox.include(p.x + offset.0, p.y + offset.1);
                }
            }
        }
    }
}

/// Lookup table from a group's anchor id to its `(x, y)` offset.
///
/// The table is built by the caller from text-layout metadata the upstream
/// parser provides; this core only consumes it. Groups without a declared
/// anchor, or whose anchor is missing from the table, resolve to `(0, 0)`.
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    offsets: HashMap<String, (f64, f64)>,
}

impl AnchorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the offset for one anchor id.
    pub fn insert(&mut self, anchor_id: impl Into<String>, x: f64, y: f64) {
        self.offsets.insert(anchor_id.into(), (x, y));
    }

    /// Returns the declared anchor offset of `group`, or `(0, 0)`.
    #[must_use]
    pub fn resolve(&self, group: &Group) -> (f64, f64) {
        group
            .anchor_id
            .as_deref()
            .and_then(|id| self.offsets.get(id).copied())
            .unwrap_or((0.0, 0.0))
    }
}

/// Format-specific scale and padding applied after the optional
/// normalization step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformConfig {
    /// Normalize coordinates into `[0, 1]` against the bounding box before
    /// scaling.
    pub normalize: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub pad_x: f64,
    pub pad_y: f64,
}

/// Transforms one point: anchor-offset addition, optional normalization by
/// the frozen bounding box, then format scale and padding. Pure: identical
/// inputs always produce byte-identical output.
#[must_use]
pub fn transform(
    x: f64,
    y: f64,
    offset: (f64, f64),
    bbox: &BoundingBox,
    config: &TransformConfig,
) -> (f64, f64) {
    let mut x = x + offset.0;
    let mut y = y + offset.1;
    if config.normalize {
        x = (x - bbox.min_x) / bbox.width();
        y = (y - bbox.min_y) / bbox.height();
    }
    (x * config.scale_x + config.pad_x, y * config.scale_y + config.pad_y)
}
