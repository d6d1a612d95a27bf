//! Internal domain modules for the Inkporter core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod emit;
pub mod error;
pub mod geometry;
pub mod order_key;
pub mod scene;
pub mod session;
pub mod style;
pub mod traverse;

#[doc(inline)]
pub use emit::{export_html, export_inkml, export_raw, export_tldraw};
#[doc(inline)]
pub use error::{ExportError, Result};
#[doc(inline)]
pub use geometry::{transform, AnchorTable, BoundingBox, TransformConfig};
#[doc(inline)]
pub use scene::{
    ColorId, Group, Paragraph, ParagraphStyle, PenKind, SceneNode, ScenePoint, SceneTree, Stroke,
    Text,
};
#[doc(inline)]
pub use session::{ExportReport, ExportSession};
#[doc(inline)]
pub use style::{PenStyle, StyleCatalog};
#[doc(inline)]
pub use traverse::{walk_tree, SceneVisitor, TraversalStats};
