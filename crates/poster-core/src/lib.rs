//! Poster Core - template compositing renderers
//!
//! This crate burns a QR code and a campaign date into poster templates
//! supplied as raster images (PNG/JPEG), PDF documents, or SVG markup.
//! Placement comes from a versioned positioning table keyed by template
//! category, not from metadata inside the templates themselves.
//!
//! # Example
//!
//! ```ignore
//! use poster_core::{RasterRenderer, TemplateCategory};
//!
//! let renderer = RasterRenderer::new();
//! let poster = renderer.render(
//!     &template_bytes,
//!     "https://example.com/booking/abc",
//!     "12. mai 2025",
//!     TemplateCategory::Booking,
//! )?;
//! ```

mod pdf;
mod raster;
mod rules;
mod svg;

pub use pdf::{render_pdf, PdfPoster};
pub use raster::RasterRenderer;
pub use rules::{
    Anchor, DatePlacement, PositioningRule, TextAlign, INTERNAL_CIRCLE_CENTER,
    INTERNAL_CIRCLE_RADIUS, INTERNAL_QR_FACTOR, RULE_TABLE_VERSION,
};
pub use svg::render_svg;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while compositing a poster
#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Failed to load template: {0}")]
    TemplateLoad(String),

    #[error("Placeholder not found: {0}")]
    PlaceholderNotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("QR encoding error: {0}")]
    Qr(#[from] qr_gen::QrError),

    #[error("Lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for poster operations
pub type Result<T> = std::result::Result<T, PosterError>;

/// File format a template is rendered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateFormat {
    /// PNG or JPEG, composited pixel by pixel
    Raster,
    /// PDF, edited through page content streams
    Pdf,
    /// SVG, edited structurally as XML
    Svg,
}

impl TemplateFormat {
    /// Infer the format from a file name's extension.
    ///
    /// Anything that is not `.pdf` or `.svg` goes through the raster path.
    pub fn from_file_name(name: &str) -> Self {
        match name.rsplit('.').next().map(str::to_ascii_lowercase) {
            Some(ext) if ext == "pdf" => Self::Pdf,
            Some(ext) if ext == "svg" => Self::Svg,
            _ => Self::Raster,
        }
    }

    /// MIME type of the rendered output for this format.
    ///
    /// Raster templates always come out as PNG regardless of input encoding.
    pub fn output_mime_type(&self) -> &'static str {
        match self {
            Self::Raster => "image/png",
            Self::Pdf => "application/pdf",
            Self::Svg => "image/svg+xml",
        }
    }

    /// File extension of the rendered output.
    pub fn output_extension(&self) -> &'static str {
        match self {
            Self::Raster => "png",
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }
}

/// Layout category a template belongs to.
///
/// Assigned once when a template catalog is built, so renderers never
/// inspect file names at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateCategory {
    /// Illustrated poster with a reserved light area for the QR
    Graphic,
    /// Field-mission poster, QR only, no date
    Mission,
    /// Booking poster, date printed top-left in black
    Booking,
    /// Standard poster layout
    #[default]
    Standard,
    /// Legacy template with coordinates baked in absolute pixels
    LegacyFixed,
}

impl TemplateCategory {
    /// Derive the category from marker substrings in a file name.
    ///
    /// `LegacyFixed` is never inferred here; it is assigned explicitly
    /// for the one template that needs it.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("mission") || lower.contains("oppdrag") {
            Self::Mission
        } else if lower.contains("booking") {
            Self::Booking
        } else if lower.contains("graphic") || lower.contains("grafisk") {
            Self::Graphic
        } else {
            Self::Standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(TemplateFormat::from_file_name("plakat.pdf"), TemplateFormat::Pdf);
        assert_eq!(TemplateFormat::from_file_name("plakat.SVG"), TemplateFormat::Svg);
        assert_eq!(TemplateFormat::from_file_name("plakat.png"), TemplateFormat::Raster);
        assert_eq!(TemplateFormat::from_file_name("plakat.jpg"), TemplateFormat::Raster);
        assert_eq!(TemplateFormat::from_file_name("noext"), TemplateFormat::Raster);
    }

    #[test]
    fn test_raster_output_is_png() {
        assert_eq!(TemplateFormat::Raster.output_mime_type(), "image/png");
        assert_eq!(TemplateFormat::Raster.output_extension(), "png");
    }

    #[test]
    fn test_category_from_file_name() {
        assert_eq!(
            TemplateCategory::from_file_name("Mission_plakat_eng.png"),
            TemplateCategory::Mission
        );
        assert_eq!(
            TemplateCategory::from_file_name("bookingplakat_v2.jpg"),
            TemplateCategory::Booking
        );
        assert_eq!(
            TemplateCategory::from_file_name("Grafisk_versjon.png"),
            TemplateCategory::Graphic
        );
        assert_eq!(
            TemplateCategory::from_file_name("Versjon_5.jpg"),
            TemplateCategory::Standard
        );
    }

    #[test]
    fn test_legacy_fixed_never_inferred() {
        assert_eq!(
            TemplateCategory::from_file_name("legacy_fixed.png"),
            TemplateCategory::Standard
        );
    }
}
