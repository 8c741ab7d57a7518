//! Table-driven placement rules
//!
//! The templates carry no coordinate metadata, so every category of
//! template gets one row here describing where the QR code and the date
//! line go. Coordinates are fractions of the template dimensions except
//! for the legacy row, which predates the fractional layout and keeps
//! its original absolute pixel values.

use crate::TemplateCategory;
use serde::{Deserialize, Serialize};

/// Bumped whenever a row changes meaning, so stored render manifests can
/// tell which table produced them.
pub const RULE_TABLE_VERSION: u32 = 2;

/// Center of the white circle on internal posters, as width/height fractions.
pub const INTERNAL_CIRCLE_CENTER: (f64, f64) = (0.85, 0.78);

/// Radius of the internal-poster circle as a fraction of template width.
pub const INTERNAL_CIRCLE_RADIUS: f64 = 0.12;

/// QR side length on internal posters, as a multiple of the circle radius.
pub const INTERNAL_QR_FACTOR: f64 = 1.6;

/// A point on the template, either relative or in absolute pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    /// Fractions of template width and height
    Frac { x: f64, y: f64 },
    /// Absolute pixels, for templates with baked-in coordinates
    Px { x: f64, y: f64 },
}

impl Anchor {
    /// Resolve to pixel coordinates on a template of the given size.
    pub fn resolve(&self, width: u32, height: u32) -> (f64, f64) {
        match *self {
            Anchor::Frac { x, y } => (x * width as f64, y * height as f64),
            Anchor::Px { x, y } => (x, y),
        }
    }
}

/// A length, either as a fraction of template width or in absolute pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    WidthFrac(f64),
    Px(f64),
}

impl Extent {
    /// Resolve to pixels on a template of the given width.
    pub fn resolve(&self, width: u32) -> f64 {
        match *self {
            Extent::WidthFrac(f) => f * width as f64,
            Extent::Px(px) => px,
        }
    }
}

/// Horizontal alignment of the date line relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

/// Where and how the date line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatePlacement {
    /// Anchor point; y is the text baseline
    pub anchor: Anchor,
    pub align: TextAlign,
    /// RGBA text color
    pub color: [u8; 4],
    /// Font size as a fraction of template width
    pub size: Extent,
}

/// One row of the placement table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositioningRule {
    pub category: TemplateCategory,
    /// Center of the QR square
    pub qr_center: Anchor,
    /// Side length of the QR square
    pub qr_size: Extent,
    /// Light modules of the QR; graphic templates use a tint matching
    /// their artwork instead of plain white
    pub qr_light: [u8; 4],
    /// None means the category never shows a date (mission posters)
    pub date: Option<DatePlacement>,
}

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

const STANDARD_DATE: DatePlacement = DatePlacement {
    anchor: Anchor::Frac { x: 0.17, y: 0.54 },
    align: TextAlign::Left,
    color: WHITE,
    size: Extent::WidthFrac(0.042),
};

const STANDARD: PositioningRule = PositioningRule {
    category: TemplateCategory::Standard,
    qr_center: Anchor::Frac { x: 0.75, y: 0.85 },
    qr_size: Extent::WidthFrac(0.4),
    qr_light: WHITE,
    date: Some(STANDARD_DATE),
};

const BOOKING: PositioningRule = PositioningRule {
    category: TemplateCategory::Booking,
    qr_center: Anchor::Frac { x: 0.75, y: 0.85 },
    qr_size: Extent::WidthFrac(0.4),
    qr_light: WHITE,
    date: Some(DatePlacement {
        anchor: Anchor::Frac { x: 0.05, y: 0.05 },
        align: TextAlign::Left,
        color: BLACK,
        size: Extent::WidthFrac(0.042),
    }),
};

const MISSION: PositioningRule = PositioningRule {
    category: TemplateCategory::Mission,
    qr_center: Anchor::Frac { x: 0.75, y: 0.85 },
    qr_size: Extent::WidthFrac(0.4),
    qr_light: WHITE,
    date: None,
};

const GRAPHIC: PositioningRule = PositioningRule {
    category: TemplateCategory::Graphic,
    qr_center: Anchor::Frac { x: 0.78, y: 0.87 },
    qr_size: Extent::WidthFrac(0.36),
    // matches the pale backdrop the illustrated templates reserve
    qr_light: [237, 242, 250, 255],
    date: Some(STANDARD_DATE),
};

const LEGACY_FIXED: PositioningRule = PositioningRule {
    category: TemplateCategory::LegacyFixed,
    qr_center: Anchor::Px { x: 810.0, y: 1377.0 },
    qr_size: Extent::Px(432.0),
    qr_light: WHITE,
    date: Some(DatePlacement {
        anchor: Anchor::Px { x: 184.0, y: 583.0 },
        align: TextAlign::Left,
        color: WHITE,
        size: Extent::Px(45.0),
    }),
};

impl PositioningRule {
    /// Look up the row for a category.
    pub fn for_category(category: TemplateCategory) -> &'static PositioningRule {
        match category {
            TemplateCategory::Graphic => &GRAPHIC,
            TemplateCategory::Mission => &MISSION,
            TemplateCategory::Booking => &BOOKING,
            TemplateCategory::Standard => &STANDARD,
            TemplateCategory::LegacyFixed => &LEGACY_FIXED,
        }
    }

    /// QR square as (left, top, side) in pixels on the given template.
    pub fn qr_rect(&self, width: u32, height: u32) -> (i64, i64, u32) {
        let (cx, cy) = self.qr_center.resolve(width, height);
        let side = self.qr_size.resolve(width).round().max(1.0) as u32;
        let left = (cx - side as f64 / 2.0).round() as i64;
        let top = (cy - side as f64 / 2.0).round() as i64;
        (left, top, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_category_has_a_row() {
        for category in [
            TemplateCategory::Graphic,
            TemplateCategory::Mission,
            TemplateCategory::Booking,
            TemplateCategory::Standard,
            TemplateCategory::LegacyFixed,
        ] {
            assert_eq!(PositioningRule::for_category(category).category, category);
        }
    }

    #[test]
    fn test_mission_has_no_date() {
        assert!(PositioningRule::for_category(TemplateCategory::Mission)
            .date
            .is_none());
    }

    #[test]
    fn test_booking_date_is_black_top_left() {
        let rule = PositioningRule::for_category(TemplateCategory::Booking);
        let date = rule.date.unwrap();
        assert_eq!(date.color, [0, 0, 0, 255]);
        assert_eq!(date.anchor, Anchor::Frac { x: 0.05, y: 0.05 });
    }

    #[test]
    fn test_standard_qr_rect_on_known_template() {
        let rule = PositioningRule::for_category(TemplateCategory::Standard);
        let (left, top, side) = rule.qr_rect(1000, 2000);
        assert_eq!(side, 400);
        assert_eq!(left, 750 - 200);
        assert_eq!(top, 1700 - 200);
    }

    #[test]
    fn test_legacy_row_ignores_template_size() {
        let rule = PositioningRule::for_category(TemplateCategory::LegacyFixed);
        let small = rule.qr_rect(100, 100);
        let large = rule.qr_rect(4000, 4000);
        assert_eq!(small, large);
        assert_eq!(small.2, 432);
    }

    #[test]
    fn test_anchor_resolution() {
        let frac = Anchor::Frac { x: 0.5, y: 0.25 };
        assert_eq!(frac.resolve(200, 400), (100.0, 100.0));

        let px = Anchor::Px { x: 13.0, y: 37.0 };
        assert_eq!(px.resolve(200, 400), (13.0, 37.0));
    }

    #[test]
    fn test_rules_serialize_round_trip() {
        let rule = PositioningRule::for_category(TemplateCategory::Graphic);
        let json = serde_json::to_string(rule).unwrap();
        let back: PositioningRule = serde_json::from_str(&json).unwrap();
        assert_eq!(*rule, back);
    }
}
