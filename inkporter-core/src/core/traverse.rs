//! Depth-first scene traversal with anchor-offset accumulation.
//!
//! Children are visited in stored insertion order. That is a correctness
//! requirement, not cosmetics: order-key generation and output stroke order
//! must match input order. The walk itself is stateless; everything per-run
//! lives in the visitor and the returned [`TraversalStats`].

use crate::core::error::Result;
use crate::core::geometry::AnchorTable;
use crate::core::scene::{Group, Paragraph, SceneNode, SceneTree, Stroke, TEXT_TOP_Y};

/// Nesting depth past which a subtree is treated as a malformed (cyclic)
/// document and skipped. The source structure is a tree, so well-formed
/// documents stay far below this.
const MAX_GROUP_DEPTH: usize = 64;

/// Per-item callbacks supplied by each output format.
pub trait SceneVisitor {
    /// Called once per stroke in document order with the accumulated anchor
    /// offset of its containing groups.
    fn visit_stroke(&mut self, stroke: &Stroke, offset: (f64, f64)) -> Result<()>;

    /// Called once per non-empty root-text paragraph with the accumulated
    /// layout offset. Formats without a text concept ignore these.
    fn visit_paragraph(&mut self, paragraph: &Paragraph, offset: (f64, f64)) -> Result<()> {
        let _ = (paragraph, offset);
        Ok(())
    }
}

/// Per-item skips recorded during one walk. Malformed items are counted and
/// reported at the end rather than raised per node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Strokes with no points.
    pub skipped_empty_strokes: usize,
    /// Subtrees past the nesting limit.
    pub skipped_deep_groups: usize,
}

/// Walks the whole tree: root-text paragraphs first (when present), then the
/// group hierarchy depth-first.
///
/// # Errors
///
/// Propagates the first error a visitor callback returns; per-item data
/// problems are counted in the returned stats instead.
pub fn walk_tree(
    tree: &SceneTree,
    anchors: &AnchorTable,
    visitor: &mut dyn SceneVisitor,
) -> Result<TraversalStats> {
    let mut stats = TraversalStats::default();
    if let Some(text) = &tree.root_text {
        let mut line_y = TEXT_TOP_Y;
        for paragraph in &text.paragraphs {
            line_y += paragraph.style.line_height();
            if paragraph.text.trim().is_empty() {
                continue;
            }
            visitor.visit_paragraph(paragraph, (text.pos_x, text.pos_y + line_y))?;
        }
    }
    walk_group(&tree.root, anchors, (0.0, 0.0), 0, visitor, &mut stats)?;
    log::debug!(
        "traversal finished: {} empty strokes skipped, {} deep subtrees skipped",
        stats.skipped_empty_strokes,
        stats.skipped_deep_groups
    );
    Ok(stats)
}

fn walk_group(
    group: &Group,
    anchors: &AnchorTable,
    offset: (f64, f64),
    depth: usize,
    visitor: &mut dyn SceneVisitor,
    stats: &mut TraversalStats,
) -> Result<()> {
    if depth > MAX_GROUP_DEPTH {
        log::warn!("group {:?} exceeds the nesting limit, skipping subtree", group.id);
        stats.skipped_deep_groups += 1;
        return Ok(());
    }
    for (child_id, child) in &group.children {
        match child {
            SceneNode::Group(g) => {
                let (ax, ay) = anchors.resolve(g);
                walk_group(g, anchors, (offset.0 + ax, offset.1 + ay), depth + 1, visitor, stats)?;
            }
            SceneNode::Stroke(stroke) => {
                if stroke.points.is_empty() {
                    log::warn!("stroke {child_id:?} has no points, skipping");
                    stats.skipped_empty_strokes += 1;
                    continue;
                }
                visitor.visit_stroke(stroke, offset)?;
            }
        }
    }
    Ok(())
}
