//! Raster (PNG/JPEG) template compositing

use crate::rules::{
    PositioningRule, TextAlign, INTERNAL_CIRCLE_CENTER, INTERNAL_CIRCLE_RADIUS, INTERNAL_QR_FACTOR,
};
use crate::{PosterError, Result, TemplateCategory};
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::io::Cursor;

/// Composites QR codes and date text into raster poster templates.
///
/// The renderer itself is stateless apart from an optional date font.
/// Templates that never show a date (mission posters, internal posters)
/// render fine without one.
pub struct RasterRenderer {
    date_font: Option<FontVec>,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    /// Create a renderer with no date font configured.
    pub fn new() -> Self {
        Self { date_font: None }
    }

    /// Create a renderer that draws date text with the given TTF/OTF font.
    pub fn with_font(ttf_data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(ttf_data)
            .map_err(|e| PosterError::Render(format!("Failed to parse date font: {e}")))?;
        Ok(Self {
            date_font: Some(font),
        })
    }

    /// Burn a QR code and (unless the category is Mission) a date line
    /// into a raster template.
    ///
    /// The template is decoded from PNG or JPEG bytes; placement comes
    /// from the category's positioning rule.
    pub fn render(
        &self,
        template: &[u8],
        qr_text: &str,
        date_text: &str,
        category: TemplateCategory,
    ) -> Result<RgbaImage> {
        let mut canvas = load_template(template)?;
        let (width, height) = canvas.dimensions();
        let rule = PositioningRule::for_category(category);

        let (left, top, side) = rule.qr_rect(width, height);
        let qr = qr_gen::encode(
            qr_text,
            side,
            Rgba([0, 0, 0, 255]),
            Rgba(rule.qr_light),
        )?;
        composite(&mut canvas, &qr, left, top);

        if let Some(date) = &rule.date {
            let font = self.date_font.as_ref().ok_or_else(|| {
                PosterError::Render("No date font configured for raster rendering".to_string())
            })?;
            let (x, baseline) = date.anchor.resolve(width, height);
            let px = date.size.resolve(width) as f32;
            draw_text(
                &mut canvas,
                font,
                date_text,
                x,
                baseline,
                px,
                date.color,
                date.align,
            );
        }

        Ok(canvas)
    }

    /// Render an internal poster: a white circle in the lower-right area
    /// with the QR code centered inside it, no date text.
    pub fn render_internal(&self, template: &[u8], qr_text: &str) -> Result<RgbaImage> {
        let mut canvas = load_template(template)?;
        let (width, height) = canvas.dimensions();

        let cx = INTERNAL_CIRCLE_CENTER.0 * width as f64;
        let cy = INTERNAL_CIRCLE_CENTER.1 * height as f64;
        let radius = INTERNAL_CIRCLE_RADIUS * width as f64;
        fill_circle(&mut canvas, cx, cy, radius, Rgba([255, 255, 255, 255]));

        let side = (radius * INTERNAL_QR_FACTOR).round().max(1.0) as u32;
        let qr = qr_gen::encode_default(qr_text, side)?;
        let left = (cx - side as f64 / 2.0).round() as i64;
        let top = (cy - side as f64 / 2.0).round() as i64;
        composite(&mut canvas, &qr, left, top);

        Ok(canvas)
    }

    /// Render and serialize to PNG in one step.
    pub fn render_png(
        &self,
        template: &[u8],
        qr_text: &str,
        date_text: &str,
        category: TemplateCategory,
    ) -> Result<Vec<u8>> {
        let canvas = self.render(template, qr_text, date_text, category)?;
        encode_png(&canvas)
    }

    /// Render an internal poster and serialize to PNG.
    pub fn render_internal_png(&self, template: &[u8], qr_text: &str) -> Result<Vec<u8>> {
        let canvas = self.render_internal(template, qr_text)?;
        encode_png(&canvas)
    }
}

/// Serialize a canvas as lossless PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| PosterError::Render(format!("PNG encoding failed: {e}")))?;
    Ok(buffer.into_inner())
}

fn load_template(data: &[u8]) -> Result<RgbaImage> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| PosterError::TemplateLoad(format!("Undecodable raster template: {e}")))?;
    let canvas = decoded.to_rgba8();
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(PosterError::TemplateLoad(
            "Raster template has zero dimensions".to_string(),
        ));
    }
    Ok(canvas)
}

/// Overwrite canvas pixels with the overlay, clipped to the canvas.
fn composite(canvas: &mut RgbaImage, overlay: &RgbaImage, left: i64, top: i64) {
    let (cw, ch) = canvas.dimensions();
    for (ox, oy, pixel) in overlay.enumerate_pixels() {
        let x = left + ox as i64;
        let y = top + oy as i64;
        if x >= 0 && y >= 0 && (x as u32) < cw && (y as u32) < ch {
            canvas.put_pixel(x as u32, y as u32, *pixel);
        }
    }
}

fn fill_circle(canvas: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    let (cw, ch) = canvas.dimensions();
    let min_x = ((cx - radius).floor().max(0.0)) as u32;
    let max_x = ((cx + radius).ceil().min(cw as f64 - 1.0)) as u32;
    let min_y = ((cy - radius).floor().max(0.0)) as u32;
    let max_y = ((cy + radius).ceil().min(ch as f64 - 1.0)) as u32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Draw one line of text with the anchor y as the baseline.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontVec,
    text: &str,
    anchor_x: f64,
    baseline_y: f64,
    px: f32,
    color: [u8; 4],
    align: TextAlign,
) {
    let scale = PxScale::from(px.max(1.0));
    let scaled = font.as_scaled(scale);

    let total_width = measure_text(&scaled, text);
    let start_x = match align {
        TextAlign::Left => anchor_x,
        TextAlign::Center => anchor_x - total_width / 2.0,
    };

    let mut caret = start_x as f32;
    let mut previous: Option<GlyphId> = None;
    for c in text.chars() {
        let glyph_id = font.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, baseline_y as f32));
        caret += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (cw, ch) = canvas.dimensions();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x >= 0 && y >= 0 && (x as u32) < cw && (y as u32) < ch {
                    blend_pixel(canvas, x as u32, y as u32, color, coverage);
                }
            });
        }
    }
}

fn measure_text<F: Font, S: ScaleFont<F>>(scaled: &S, text: &str) -> f64 {
    let mut width = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    for c in text.chars() {
        let glyph_id = scaled.font().glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }
    width as f64
}

fn blend_pixel(canvas: &mut RgbaImage, x: u32, y: u32, color: [u8; 4], coverage: f32) {
    let alpha = (coverage * color[3] as f32 / 255.0).clamp(0.0, 1.0);
    let dst = canvas.get_pixel_mut(x, y);
    for i in 0..3 {
        dst[i] = (color[i] as f32 * alpha + dst[i] as f32 * (1.0 - alpha)).round() as u8;
    }
    dst[3] = dst[3].max((alpha * 255.0).round() as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const QR_TEXT: &str = "https://example.com/booking/abc123";

    fn solid_template(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let canvas = RgbaImage::from_pixel(width, height, Rgba(color));
        encode_png(&canvas).unwrap()
    }

    fn bold_system_font() -> Option<Vec<u8>> {
        const CANDIDATES: &[&str] = &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        ];
        CANDIDATES.iter().find_map(|p| std::fs::read(p).ok())
    }

    #[test]
    fn test_measured_width_grows_with_text() {
        let Some(data) = bold_system_font() else {
            return;
        };
        let font = FontVec::try_from_vec(data).unwrap();
        let scaled = font.as_scaled(PxScale::from(32.0));

        let short = measure_text(&scaled, "1. mai");
        let long = measure_text(&scaled, "1. mai 2025");
        assert!(short > 0.0);
        assert!(long > short);
    }

    #[test]
    fn test_undecodable_template_is_load_error() {
        let renderer = RasterRenderer::new();
        let result = renderer.render(b"not an image", QR_TEXT, "1. mai", TemplateCategory::Mission);
        assert!(matches!(result, Err(PosterError::TemplateLoad(_))));
    }

    #[test]
    fn test_mission_needs_no_font() {
        let template = solid_template(400, 600, [10, 20, 30, 255]);
        let renderer = RasterRenderer::new();
        let out = renderer
            .render(&template, QR_TEXT, "1. mai", TemplateCategory::Mission)
            .unwrap();
        assert_eq!(out.dimensions(), (400, 600));
    }

    #[test]
    fn test_mission_leaves_pixels_outside_qr_untouched() {
        let template = solid_template(400, 600, [10, 20, 30, 255]);
        let renderer = RasterRenderer::new();
        let out = renderer
            .render(&template, QR_TEXT, "ignored", TemplateCategory::Mission)
            .unwrap();

        // Top-left corner is far from the QR rectangle.
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*out.get_pixel(50, 50), Rgba([10, 20, 30, 255]));

        // The QR rectangle itself did change.
        let rule = PositioningRule::for_category(TemplateCategory::Mission);
        let (left, top, side) = rule.qr_rect(400, 600);
        let center = out.get_pixel((left as u32) + side / 2, (top as u32) + side / 2);
        assert!(*center == Rgba([0, 0, 0, 255]) || *center == Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_date_without_font_is_render_error() {
        let template = solid_template(400, 600, [10, 20, 30, 255]);
        let renderer = RasterRenderer::new();
        let result = renderer.render(&template, QR_TEXT, "1. mai", TemplateCategory::Standard);
        assert!(matches!(result, Err(PosterError::Render(_))));
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = solid_template(300, 500, [200, 200, 200, 255]);
        let renderer = RasterRenderer::new();
        let a = renderer
            .render_png(&template, QR_TEXT, "x", TemplateCategory::Mission)
            .unwrap();
        let b = renderer
            .render_png(&template, QR_TEXT, "x", TemplateCategory::Mission)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_booking_date_drawn_in_black() {
        let Some(font) = bold_system_font() else {
            return;
        };
        let template = solid_template(1000, 1400, [255, 255, 255, 255]);
        let renderer = RasterRenderer::with_font(font).unwrap();
        let out = renderer
            .render(&template, QR_TEXT, "12. mai 2025", TemplateCategory::Booking)
            .unwrap();

        // Some pixel near the top-left anchor must have been darkened.
        let mut darkened = false;
        for y in 0..200 {
            for x in 0..400 {
                let p = out.get_pixel(x, y);
                if p[0] < 128 && p[1] < 128 && p[2] < 128 {
                    darkened = true;
                }
            }
        }
        assert!(darkened, "expected black date text near the top-left corner");
    }

    #[test]
    fn test_internal_poster_has_white_circle() {
        let template = solid_template(1000, 1400, [40, 40, 120, 255]);
        let renderer = RasterRenderer::new();
        let out = renderer.render_internal(&template, QR_TEXT).unwrap();

        // Just inside the circle edge but outside the QR square.
        let cx = 0.85 * 1000.0;
        let cy = 0.78 * 1400.0;
        let radius = 0.12 * 1000.0;
        let edge_x = (cx + radius - 4.0) as u32;
        assert_eq!(*out.get_pixel(edge_x, cy as u32), Rgba([255, 255, 255, 255]));

        // Far corner untouched.
        assert_eq!(*out.get_pixel(0, 0), Rgba([40, 40, 120, 255]));
    }

    #[test]
    fn test_qr_clipped_against_small_template() {
        // QR rect extends past the right and bottom edges; must not panic.
        let template = solid_template(60, 60, [0, 128, 0, 255]);
        let renderer = RasterRenderer::new();
        let out = renderer
            .render(&template, QR_TEXT, "x", TemplateCategory::Mission)
            .unwrap();
        assert_eq!(out.dimensions(), (60, 60));
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        assert!(RasterRenderer::with_font(vec![0, 1, 2, 3]).is_err());
    }
}
