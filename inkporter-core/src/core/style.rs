//! Pen style resolution and deduplication.
//!
//! A stroke's `(tool, color, thickness_scale)` triple resolves to one
//! canonical [`PenStyle`]; strokes sharing a triple share a single style
//! definition in the output, referenced through [`PenStyle::style_id`].

use crate::core::error::{ExportError, Result};
use crate::core::scene::{ColorId, PenKind};
use std::collections::HashMap;

/// Himetric units per document unit for brush dimensions.
const HIMETRIC_PER_UNIT: f64 = 10.0;

/// Reserved color code with no palette entry upstream. Compatibility shim:
/// remapped to [`FALLBACK_COLOR`] before palette lookup rather than dropped.
pub const UNSUPPORTED_COLOR: ColorId = ColorId::Highlight;

/// The defined color that [`UNSUPPORTED_COLOR`] remaps to.
pub const FALLBACK_COLOR: ColorId = ColorId::Yellow;

/// Brush tip geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipShape {
    Ellipse,
}

impl TipShape {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ellipse => "ellipse",
        }
    }
}

/// Raster operation a brush is composited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOp {
    /// Opaque ink.
    CopyPen,
    /// Translucent highlighter compositing.
    MaskPen,
}

impl RasterOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CopyPen => "copyPen",
            Self::MaskPen => "maskPen",
        }
    }
}

/// Resolved visual descriptor for one `(tool, color, thickness_scale)`
/// combination. Equality is over the defining fields, so two strokes drawn
/// the same way produce interchangeable values.
#[derive(Debug, Clone, PartialEq)]
pub struct PenStyle {
    pub name: &'static str,
    pub width_himetric: i64,
    pub height_himetric: i64,
    pub rgb: (u8, u8, u8),
    /// `1.0 - opacity`, the convention ink formats use.
    pub transparency: f64,
    pub tip_shape: TipShape,
    pub raster_op: RasterOp,
}

impl PenStyle {
    /// Resolves the canonical style for a stroke's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedStyle`] for eraser-family tools,
    /// which have no drawable style; callers recover with [`Self::fallback`].
    pub fn resolve(tool: PenKind, color: ColorId, thickness_scale: f64) -> Result<Self> {
        let Some(base) = base_width(tool) else {
            return Err(ExportError::UnsupportedStyle { tool, color });
        };
        let color = if color == UNSUPPORTED_COLOR {
            FALLBACK_COLOR
        } else {
            color
        };
        let width = base * thickness_scale;
        Ok(Self {
            name: tool.name(),
            width_himetric: (width * HIMETRIC_PER_UNIT) as i64,
            height_himetric: (width * HIMETRIC_PER_UNIT) as i64,
            rgb: palette(color),
            transparency: 1.0 - base_opacity(tool),
            tip_shape: TipShape::Ellipse,
            raster_op: if tool == PenKind::Highlighter {
                RasterOp::MaskPen
            } else {
                RasterOp::CopyPen
            },
        })
    }

    /// The style substituted when [`resolve`](Self::resolve) fails: ballpoint
    /// geometry in the fallback color. Infallible by construction.
    #[must_use]
    pub fn fallback(thickness_scale: f64) -> Self {
        Self {
            name: PenKind::Ballpoint.name(),
            width_himetric: (2.0 * thickness_scale * HIMETRIC_PER_UNIT) as i64,
            height_himetric: (2.0 * thickness_scale * HIMETRIC_PER_UNIT) as i64,
            rgb: palette(ColorId::Black),
            transparency: 0.0,
            tip_shape: TipShape::Ellipse,
            raster_op: RasterOp::CopyPen,
        }
    }

    /// Stable identifier derived from the defining fields; strokes sharing a
    /// style share this id, and outputs define the style once under it.
    #[must_use]
    pub fn style_id(&self) -> String {
        format!(
            "name_{}_op_{}_w_{}_clr_{:02x}{:02x}{:02x}",
            self.name,
            (self.transparency * 100.0) as i64,
            self.width_himetric,
            self.rgb.0,
            self.rgb.1,
            self.rgb.2
        )
    }
}

/// Resolves a style, substituting the fallback for unsupported combinations.
/// The second value reports whether the fallback was used.
#[must_use]
pub fn resolve_or_fallback(tool: PenKind, color: ColorId, thickness_scale: f64) -> (PenStyle, bool) {
    match PenStyle::resolve(tool, color, thickness_scale) {
        Ok(style) => (style, false),
        Err(_) => (PenStyle::fallback(thickness_scale), true),
    }
}

/// Base stroke width per tool, in document units before `thickness_scale`.
/// `None` marks tools with no drawable style.
fn base_width(tool: PenKind) -> Option<f64> {
    match tool {
        PenKind::Eraser | PenKind::EraseArea => None,
        PenKind::Ballpoint | PenKind::Fineliner => Some(2.0),
        PenKind::Pencil | PenKind::MechanicalPencil => Some(2.0),
        PenKind::Marker => Some(4.0),
        PenKind::Paintbrush | PenKind::Calligraphy => Some(3.0),
        PenKind::Highlighter | PenKind::Shader => Some(15.0),
    }
}

/// Ink opacity per tool.
fn base_opacity(tool: PenKind) -> f64 {
    match tool {
        PenKind::Highlighter => 0.3,
        PenKind::Shader => 0.5,
        PenKind::Pencil | PenKind::Paintbrush => 0.9,
        PenKind::Ballpoint
        | PenKind::Fineliner
        | PenKind::Marker
        | PenKind::MechanicalPencil
        | PenKind::Calligraphy
        | PenKind::Eraser
        | PenKind::EraseArea => 1.0,
    }
}

/// Display palette for each color code. Exhaustive over [`ColorId`] so a new
/// code cannot be added without a palette decision.
fn palette(color: ColorId) -> (u8, u8, u8) {
    match color {
        ColorId::Black => (0, 0, 0),
        ColorId::Gray | ColorId::GrayOverlap => (125, 125, 125),
        ColorId::White => (255, 255, 255),
        ColorId::Yellow | ColorId::Yellow2 => (255, 255, 0),
        ColorId::Green => (0, 112, 0),
        ColorId::Green2 => (145, 218, 113),
        ColorId::Pink => (255, 20, 147),
        ColorId::Blue => (0, 98, 204),
        ColorId::Red => (217, 7, 7),
        ColorId::Cyan => (0, 255, 255),
        ColorId::Magenta => (255, 0, 255),
        // The sentinel never reaches lookup through resolve(); keep it
        // pinned to the fallback's entry for direct callers.
        ColorId::Highlight => palette(FALLBACK_COLOR),
    }
}

/// Insertion-ordered set of distinct pen styles observed during a pre-scan.
#[derive(Debug, Default)]
pub struct StyleCatalog {
    styles: Vec<PenStyle>,
    index: HashMap<String, usize>,
}

impl StyleCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `style`, returning its stable id. A style already present is
    /// not duplicated.
    pub fn intern(&mut self, style: PenStyle) -> String {
        let id = style.style_id();
        if !self.index.contains_key(&id) {
            self.index.insert(id.clone(), self.styles.len());
            self.styles.push(style);
        }
        id
    }

    /// Distinct styles in first-seen order.
    #[must_use]
    pub fn styles(&self) -> &[PenStyle] {
        &self.styles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_triples_share_one_definition() {
        let a = PenStyle::resolve(PenKind::Ballpoint, ColorId::Black, 2.0).unwrap();
        let b = PenStyle::resolve(PenKind::Ballpoint, ColorId::Black, 2.0).unwrap();
        assert_eq!(a, b);

        let mut catalog = StyleCatalog::new();
        let id_a = catalog.intern(a);
        let id_b = catalog.intern(b);
        assert_eq!(id_a, id_b);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_preserves_first_seen_order() {
        let mut catalog = StyleCatalog::new();
        catalog.intern(PenStyle::resolve(PenKind::Marker, ColorId::Red, 1.0).unwrap());
        catalog.intern(PenStyle::resolve(PenKind::Ballpoint, ColorId::Black, 1.0).unwrap());
        catalog.intern(PenStyle::resolve(PenKind::Marker, ColorId::Red, 1.0).unwrap());
        let names: Vec<&str> = catalog.styles().iter().map(|s| s.name).collect();
        assert_eq!(names, ["Marker", "Ballpoint"]);
    }

    #[test]
    fn test_sentinel_color_resolves_to_fallback() {
        let style = PenStyle::resolve(PenKind::Fineliner, UNSUPPORTED_COLOR, 1.0).unwrap();
        assert_eq!(style.rgb, palette(FALLBACK_COLOR));
    }

    #[test]
    fn test_eraser_has_no_drawable_style() {
        let err = PenStyle::resolve(PenKind::Eraser, ColorId::Black, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedStyle { .. }));

        let (style, fell_back) = resolve_or_fallback(PenKind::Eraser, ColorId::Black, 1.5);
        assert!(fell_back);
        assert_eq!(style, PenStyle::fallback(1.5));
    }

    #[test]
    fn test_highlighter_is_translucent_mask_pen() {
        let style = PenStyle::resolve(PenKind::Highlighter, ColorId::Yellow, 1.0).unwrap();
        assert_eq!(style.raster_op, RasterOp::MaskPen);
        assert!(style.transparency > 0.0);

        let pen = PenStyle::resolve(PenKind::Ballpoint, ColorId::Black, 1.0).unwrap();
        assert_eq!(pen.raster_op, RasterOp::CopyPen);
        assert_eq!(pen.transparency, 0.0);
    }

    #[test]
    fn test_style_id_distinguishes_thickness() {
        let thin = PenStyle::resolve(PenKind::Ballpoint, ColorId::Black, 1.0).unwrap();
        let thick = PenStyle::resolve(PenKind::Ballpoint, ColorId::Black, 2.0).unwrap();
        assert_ne!(thin.style_id(), thick.style_id());
    }
}
