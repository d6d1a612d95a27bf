//! Core library for Inkporter — converts parsed handwritten-note scene
//! trees into ink interchange formats.
//!
//! The pipeline runs in two strictly ordered phases per export call: a
//! measurement pass that freezes the document bounding box and pre-scans the
//! distinct pen styles, then an emission pass driven by a depth-first scene
//! traversal. The entry points are the `export_*` functions, one per output
//! format; each writes to a caller-supplied sink and returns an
//! [`ExportReport`].
//!
//! The scene tree itself comes from the upstream note parser and is only
//! borrowed here; shape ordering inside the structured outputs uses the
//! fractional-index keys from [`core::order_key`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    emit::raw::{RawDocument, RawMetadata, RawStroke, RawTag},
    emit::{export_html, export_inkml, export_raw, export_tldraw},
    error::{ExportError, Result},
    geometry::{transform, AnchorTable, BoundingBox, TransformConfig},
    order_key::{is_valid_key, key_between, next_key, prev_key, ALPHABET, START_KEY},
    scene::{
        ColorId, Group, Paragraph, ParagraphStyle, PenKind, SceneNode, ScenePoint, SceneTree,
        Stroke, Text,
    },
    session::{ExportReport, ExportSession},
    style::{resolve_or_fallback, PenStyle, RasterOp, StyleCatalog, TipShape, FALLBACK_COLOR, UNSUPPORTED_COLOR},
    traverse::{walk_tree, SceneVisitor, TraversalStats},
};
