//! Per-run export context.
//!
//! One [`ExportSession`] is created per export call and discarded at the
//! end; nothing in it survives across runs. It owns the derived state the
//! pipeline accumulates (the frozen bounding box, the style catalog, the
//! record counter, and the last issued order key) so the traversal itself
//! stays stateless.

use crate::core::error::Result;
use crate::core::geometry::{AnchorTable, BoundingBox};
use crate::core::order_key;
use crate::core::scene::{SceneTree, Stroke};
use crate::core::style::{resolve_or_fallback, PenStyle, StyleCatalog};
use crate::core::traverse::{walk_tree, SceneVisitor, TraversalStats};
use serde::Serialize;

/// Summary handed back to the caller after an export: how many records were
/// written and how many items were recovered or skipped along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    /// Records written to the sink.
    pub emitted: usize,
    /// Strokes skipped because they had no points.
    pub skipped_empty_strokes: usize,
    /// Subtrees skipped by the nesting guard.
    pub skipped_deep_groups: usize,
    /// Strokes whose style resolution fell back to the default.
    pub style_fallbacks: usize,
}

/// Derived state for one export run.
pub struct ExportSession {
    bbox: BoundingBox,
    styles: StyleCatalog,
    next_record: u64,
    last_key: Option<String>,
    emitted: usize,
    style_fallbacks: usize,
}

impl ExportSession {
    /// Runs the measurement phase: computes the bounding box and pre-scans
    /// the distinct pen styles. Both are frozen before any record is
    /// emitted, so emission cannot invalidate already-written coordinates.
    #[must_use]
    pub fn new(tree: &SceneTree, anchors: &AnchorTable) -> Self {
        let bbox = BoundingBox::measure(&tree.root, anchors);
        let (styles, style_fallbacks) = prescan_styles(tree, anchors);
        log::debug!(
            "session ready: bounds ({}, {})..({}, {}), {} distinct styles",
            bbox.min_x,
            bbox.min_y,
            bbox.max_x,
            bbox.max_y,
            styles.len()
        );
        Self {
            bbox,
            styles,
            next_record: 1,
            last_key: None,
            emitted: 0,
            style_fallbacks,
        }
    }

    /// The document bounds measured at construction.
    #[must_use]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Distinct pen styles in first-seen document order.
    #[must_use]
    pub fn styles(&self) -> &[PenStyle] {
        self.styles.styles()
    }

    /// Issues the next record id, starting from 1.
    pub fn next_record_id(&mut self) -> u64 {
        let id = self.next_record;
        self.next_record += 1;
        id
    }

    /// Issues the next order key, strictly after every key issued before it
    /// in this session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExportError::MalformedKey`] or
    /// [`crate::ExportError::OrderingViolation`] if the key algebra detects
    /// an inconsistency; both are fatal to the export.
    pub fn next_order_key(&mut self) -> Result<String> {
        let key = order_key::key_between(self.last_key.as_deref(), None)?;
        self.last_key = Some(key.clone());
        Ok(key)
    }

    /// Records one successfully written record.
    pub fn record_emitted(&mut self) {
        self.emitted += 1;
    }

    /// Records written so far, for diagnostics on abort.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Consumes the session into the caller-facing report.
    #[must_use]
    pub fn finish(self, stats: TraversalStats) -> ExportReport {
        ExportReport {
            emitted: self.emitted,
            skipped_empty_strokes: stats.skipped_empty_strokes,
            skipped_deep_groups: stats.skipped_deep_groups,
            style_fallbacks: self.style_fallbacks,
        }
    }
}

/// Collects the distinct styles of every drawable stroke, counting the ones
/// that needed the fallback.
fn prescan_styles(tree: &SceneTree, anchors: &AnchorTable) -> (StyleCatalog, usize) {
    struct StyleScan {
        catalog: StyleCatalog,
        fallbacks: usize,
    }

    impl SceneVisitor for StyleScan {
        fn visit_stroke(&mut self, stroke: &Stroke, _offset: (f64, f64)) -> Result<()> {
            let (style, fell_back) = resolve_or_fallback(stroke.tool, stroke.color, stroke.thickness_scale);
            if fell_back {
                log::warn!(
                    "no drawable style for {:?}/{:?}, using the fallback",
                    stroke.tool,
                    stroke.color
                );
                self.fallbacks += 1;
            }
            self.catalog.intern(style);
            Ok(())
        }
    }

    let mut scan = StyleScan {
        catalog: StyleCatalog::new(),
        fallbacks: 0,
    };
    // The scan visitor never fails, so the walk cannot either.
    let _ = walk_tree(tree, anchors, &mut scan);
    (scan.catalog, scan.fallbacks)
}
