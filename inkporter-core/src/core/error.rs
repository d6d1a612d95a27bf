//! Error types for the Inkporter core library.

use crate::core::scene::{ColorId, PenKind};
use thiserror::Error;

/// All errors that can occur within the Inkporter core library.
#[derive(Debug, Error)]
pub enum ExportError {
    /// An order key failed self-consistency validation. Fatal: the ordering
    /// guarantee cannot be trusted past this point.
    #[error("Malformed order key: {0}")]
    MalformedKey(String),

    /// `key_between` was called with `lower >= upper`. Fatal, signals a
    /// caller logic bug; keys must always be requested in increasing order.
    #[error("Order key bounds out of order: {lower:?} >= {upper:?}")]
    OrderingViolation {
        /// The lower bound as supplied by the caller.
        lower: String,
        /// The upper bound as supplied by the caller.
        upper: String,
    },

    /// A stroke references a tool/color combination with no defined style
    /// mapping. Recoverable: callers substitute the fallback style.
    #[error("No drawable style for tool {tool:?} with color {color:?}")]
    UnsupportedStyle {
        /// The tool the stroke was drawn with.
        tool: PenKind,
        /// The color the stroke was drawn with.
        color: ColorId,
    },

    /// Writing to the caller-supplied output sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A per-document failure aborted the export. The count of records
    /// already emitted is diagnostic only; the partial output is invalid
    /// and must be discarded.
    #[error("Export aborted after {emitted} records: {source}")]
    Aborted {
        /// Number of records written to the sink before the failure.
        emitted: usize,
        /// The underlying failure.
        #[source]
        source: Box<ExportError>,
    },
}

/// Convenience alias that pins the error type to [`ExportError`].
pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    /// Wraps this error as a terminal [`ExportError::Aborted`], recording how
    /// many records had already been emitted when it occurred.
    #[must_use]
    pub fn aborted(self, emitted: usize) -> Self {
        Self::Aborted {
            emitted,
            source: Box::new(self),
        }
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedKey(_) | Self::OrderingViolation { .. } => {
                "Export failed: shape ordering could not be generated".to_string()
            }
            Self::UnsupportedStyle { tool, .. } => {
                format!("A {tool:?} stroke has no exportable style")
            }
            Self::Io(e) => format!("Could not write output: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Aborted { emitted, source } => {
                format!("{} (after {emitted} records)", source.user_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_wraps_source() {
        let e = ExportError::MalformedKey("bad".to_string()).aborted(7);
        match e {
            ExportError::Aborted { emitted, source } => {
                assert_eq!(emitted, 7);
                assert!(matches!(*source, ExportError::MalformedKey(_)));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
    }

    #[test]
    fn test_user_message_mentions_record_count() {
        let e = ExportError::MalformedKey("bad".to_string()).aborted(3);
        assert!(e.user_message().contains("3 records"));
    }

    #[test]
    fn test_ordering_violation_display() {
        let e = ExportError::OrderingViolation {
            lower: "a5".to_string(),
            upper: "a1".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("a5"));
        assert!(msg.contains("a1"));
    }
}
