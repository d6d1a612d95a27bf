//! Format emitters.
//!
//! Every emitter follows the same two-phase contract: a definitions phase
//! over the pre-scanned style set, then a body phase driven by the scene
//! traverser. All output goes to a caller-supplied [`std::io::Write`] sink;
//! the core never touches the filesystem or network itself.

pub mod html;
pub mod inkml;
pub mod raw;
pub mod tldraw;

#[doc(inline)]
pub use html::export_html;
#[doc(inline)]
pub use inkml::export_inkml;
#[doc(inline)]
pub use raw::export_raw;
#[doc(inline)]
pub use tldraw::export_tldraw;
