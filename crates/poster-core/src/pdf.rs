//! PDF template compositing
//!
//! Edits the first page of an existing PDF template: appends a date line
//! as a new text object and embeds the QR code as an image XObject. Both
//! additions are purely additive, nothing in the template is masked or
//! removed.
//!
//! The date uses the Helvetica-Bold base-14 font with WinAnsi encoding,
//! which covers the Norwegian characters needed, so no font embedding is
//! required.

use crate::{PosterError, Result};
use image::RgbaImage;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

const DATE_FONT_SIZE: f64 = 28.0;
const DATE_X_FRAC: f64 = 0.5;
const DATE_Y_FRAC: f64 = 0.45;
const QR_X_FRAC: f64 = 0.82;
const QR_Y_FRAC: f64 = 0.08;
const QR_WIDTH_FRAC: f64 = 0.15;

/// Pixel resolution of the QR raster before it is scaled onto the page.
const QR_PIXELS: u32 = 400;

/// A PDF poster template being edited in place.
pub struct PdfPoster {
    doc: Document,
    /// Content operators buffered until save
    pending_ops: Vec<u8>,
}

impl PdfPoster {
    /// Parse a PDF template from bytes.
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data)
            .map_err(|e| PosterError::TemplateLoad(format!("Unparsable PDF template: {e}")))?;
        let poster = Self {
            doc,
            pending_ops: Vec::new(),
        };
        // A template without pages cannot be composited into.
        poster.first_page_id()?;
        Ok(poster)
    }

    /// Draw the date line on the first page.
    pub fn draw_date(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let (width, height) = self.page_size()?;
        let font_name = self.ensure_date_font()?;

        let x = width * DATE_X_FRAC;
        let y = height * DATE_Y_FRAC;

        let mut ops = Vec::new();
        ops.extend_from_slice(b"BT\n1 1 1 rg\n");
        ops.extend_from_slice(format!("/{font_name} {DATE_FONT_SIZE} Tf\n").as_bytes());
        ops.extend_from_slice(format!("{x} {y} Td\n").as_bytes());
        ops.push(b'(');
        ops.extend_from_slice(&encode_win_ansi(text));
        ops.extend_from_slice(b") Tj\nET\n");

        self.pending_ops.extend_from_slice(&ops);
        Ok(())
    }

    /// Embed the QR code in the lower-right corner of the first page.
    pub fn embed_qr(&mut self, qr_text: &str) -> Result<()> {
        let (width, height) = self.page_size()?;
        let qr = qr_gen::encode_default(qr_text, QR_PIXELS)?;

        let stream = image_xobject(&qr)?;
        let xobject_id = self.doc.add_object(stream);
        let resource_name = self.add_page_xobject(xobject_id)?;

        let size = width * QR_WIDTH_FRAC;
        let x = width * QR_X_FRAC;
        let y = height * QR_Y_FRAC;
        let ops = format!("q\n{size} 0 0 {size} {x} {y} cm\n/{resource_name} Do\nQ\n");
        self.pending_ops.extend_from_slice(ops.as_bytes());

        Ok(())
    }

    /// Flush pending operators and serialize the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        if !self.pending_ops.is_empty() {
            let ops = std::mem::take(&mut self.pending_ops);
            self.append_to_first_page_content(&ops)?;
        }

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PosterError::Render(format!("PDF serialization failed: {e}")))?;
        Ok(buffer)
    }

    fn first_page_id(&self) -> Result<ObjectId> {
        self.doc
            .get_pages()
            .get(&1)
            .copied()
            .ok_or_else(|| PosterError::TemplateLoad("PDF template has no pages".to_string()))
    }

    /// First-page dimensions from the MediaBox, following the parent
    /// inheritance chain.
    fn page_size(&self) -> Result<(f64, f64)> {
        let page_id = self.first_page_id()?;
        let media_box = self.inherited_media_box(page_id)?;
        if media_box.len() < 4 {
            return Err(PosterError::TemplateLoad(
                "Invalid MediaBox format".to_string(),
            ));
        }

        let coord = |obj: &Object| -> Result<f64> {
            obj.as_f32()
                .map(|v| v as f64)
                .or_else(|_| obj.as_i64().map(|v| v as f64))
                .map_err(|_| PosterError::TemplateLoad("Invalid MediaBox entry".to_string()))
        };

        let width = coord(&media_box[2])? - coord(&media_box[0])?;
        let height = coord(&media_box[3])? - coord(&media_box[1])?;
        Ok((width, height))
    }

    fn inherited_media_box(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let mut current_id = page_id;

        // Follow parent chain with a safety limit.
        for _ in 0..10 {
            let dict = self
                .doc
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PosterError::TemplateLoad("Page is not a dictionary".to_string()))?
                .clone();

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let array = match media_box {
                    Object::Array(arr) => arr.clone(),
                    Object::Reference(ref_id) => self
                        .doc
                        .get_object(*ref_id)?
                        .as_array()
                        .map_err(|_| {
                            PosterError::TemplateLoad("MediaBox is not an array".to_string())
                        })?
                        .clone(),
                    _ => {
                        return Err(PosterError::TemplateLoad(
                            "MediaBox is not an array".to_string(),
                        ))
                    }
                };
                return Ok(array);
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                current_id = *parent_id;
                continue;
            }
            break;
        }

        // Fallback: A4.
        Ok(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(595.28),
            Object::Real(841.89),
        ])
    }

    /// Register the Helvetica-Bold standard font on the first page,
    /// returning its resource name.
    fn ensure_date_font(&mut self) -> Result<String> {
        let font = dictionary! {
            "Type" => Object::Name(b"Font".to_vec()),
            "Subtype" => Object::Name(b"Type1".to_vec()),
            "BaseFont" => Object::Name(b"Helvetica-Bold".to_vec()),
            "Encoding" => Object::Name(b"WinAnsiEncoding".to_vec()),
        };
        let font_id = self.doc.add_object(font);
        self.add_page_resource(b"Font", font_id)
    }

    fn add_page_xobject(&mut self, xobject_id: ObjectId) -> Result<String> {
        self.add_page_resource(b"XObject", xobject_id)
    }

    /// Add a reference under the given category of the first page's
    /// Resources, picking a name the template does not already use.
    fn add_page_resource(&mut self, kind: &[u8], object_id: ObjectId) -> Result<String> {
        let page_id = self.first_page_id()?;
        let page_dict = self
            .doc
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PosterError::Render("Page object is not a dictionary".to_string()))?
            .clone();

        let mut resources = self.resolve_dict(page_dict.get(b"Resources").ok());
        let mut category = self.resolve_dict(resources.get(kind).ok());

        let prefix = if kind == b"Font" { "PgF" } else { "PgIm" };
        let mut n = 1;
        let name = loop {
            let candidate = format!("{prefix}{n}");
            if !category.has(candidate.as_bytes()) {
                break candidate;
            }
            n += 1;
        };

        category.set(name.as_bytes(), Object::Reference(object_id));
        resources.set(kind, Object::Dictionary(category));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Resources", Object::Dictionary(resources));
        self.doc.objects.insert(page_id, new_page_dict.into());

        Ok(name)
    }

    /// Resolve a dictionary value that may be inline, a reference, or absent.
    fn resolve_dict(&self, value: Option<&Object>) -> Dictionary {
        match value {
            Some(Object::Dictionary(dict)) => dict.clone(),
            Some(Object::Reference(ref_id)) => self
                .doc
                .get_object(*ref_id)
                .ok()
                .and_then(|obj| obj.as_dict().ok().cloned())
                .unwrap_or_default(),
            _ => Dictionary::new(),
        }
    }

    /// Append operators to the first page's content, concatenating any
    /// existing stream, reference, or stream array first.
    fn append_to_first_page_content(&mut self, content: &[u8]) -> Result<()> {
        let page_id = self.first_page_id()?;
        let page_dict = self
            .doc
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PosterError::Render("Page object is not a dictionary".to_string()))?
            .clone();

        let mut combined = match page_dict.get(b"Contents") {
            Ok(contents) => self.collect_content(contents),
            Err(_) => Vec::new(),
        };
        combined.extend_from_slice(content);

        let stream_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), combined));
        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));
        self.doc.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    fn collect_content(&self, contents: &Object) -> Vec<u8> {
        match contents {
            Object::Stream(stream) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            Object::Reference(ref_id) => match self.doc.get_object(*ref_id) {
                Ok(Object::Stream(stream)) => stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone()),
                _ => Vec::new(),
            },
            Object::Array(arr) => {
                let mut combined = Vec::new();
                for obj in arr {
                    combined.extend_from_slice(&self.collect_content(obj));
                }
                combined
            }
            _ => Vec::new(),
        }
    }
}

/// Composite a QR code and date line into a PDF template.
pub fn render_pdf(template: &[u8], qr_text: &str, date_text: &str) -> Result<Vec<u8>> {
    let mut poster = PdfPoster::open_from_bytes(template)?;
    poster.draw_date(date_text)?;
    poster.embed_qr(qr_text)?;
    poster.to_bytes()
}

/// Encode a QR canvas as a FlateDecode DeviceRGB image XObject.
fn image_xobject(canvas: &RgbaImage) -> Result<Stream> {
    let (width, height) = canvas.dimensions();

    // The QR raster is fully opaque, so alpha can be dropped.
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in canvas.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
    }

    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&rgb)?;
    let data = encoder
        .finish()
        .map_err(|e| PosterError::Render(format!("Image compression failed: {e}")))?;

    let dict = dictionary! {
        "Type" => Object::Name(b"XObject".to_vec()),
        "Subtype" => Object::Name(b"Image".to_vec()),
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => Object::Name(b"DeviceRGB".to_vec()),
        "BitsPerComponent" => 8,
        "Filter" => Object::Name(b"FlateDecode".to_vec()),
    };
    Ok(Stream::new(dict, data))
}

/// Map text to WinAnsi bytes inside a PDF literal string.
///
/// WinAnsi agrees with Latin-1 from 0xA0 upward, which covers the
/// Scandinavian letters this crate needs. The 0x80..0x9F block holds
/// typographic characters instead of C1 controls and is mapped
/// explicitly; anything unencodable degrades to '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match u32::from(c) {
            v @ (0x20..=0x7E | 0xA0..=0xFF) => v as u8,
            0x20AC => 0x80, // €
            0x201A => 0x82,
            0x0192 => 0x83,
            0x201E => 0x84,
            0x2026 => 0x85, // …
            0x2020 => 0x86,
            0x2021 => 0x87,
            0x02C6 => 0x88,
            0x2030 => 0x89,
            0x0160 => 0x8A,
            0x2039 => 0x8B,
            0x0152 => 0x8C,
            0x017D => 0x8E,
            0x2018 => 0x91,
            0x2019 => 0x92,
            0x201C => 0x93,
            0x201D => 0x94,
            0x2022 => 0x95,
            0x2013 => 0x96, // –
            0x2014 => 0x97, // —
            0x02DC => 0x98,
            0x2122 => 0x99,
            0x0161 => 0x9A,
            0x203A => 0x9B,
            0x0153 => 0x9C,
            0x017E => 0x9E,
            0x0178 => 0x9F,
            _ => b'?',
        };
        if byte == b'(' || byte == b')' || byte == b'\\' {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_win_ansi_plain_ascii() {
        assert_eq!(encode_win_ansi("12. mai 2025"), b"12. mai 2025".to_vec());
    }

    #[test]
    fn test_win_ansi_norwegian_letters() {
        // æ=0xE6 ø=0xF8 å=0xE5 in both Latin-1 and WinAnsi.
        assert_eq!(encode_win_ansi("æøå"), vec![0xE6, 0xF8, 0xE5]);
    }

    #[test]
    fn test_win_ansi_escapes_delimiters() {
        assert_eq!(encode_win_ansi("(a)\\"), b"\\(a\\)\\\\".to_vec());
    }

    #[test]
    fn test_win_ansi_typographic_block() {
        // € and the dashes live in the 0x80..0x9F block, not Latin-1.
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("\u{2013}\u{2014}"), vec![0x96, 0x97]);
        assert_eq!(encode_win_ansi("\u{201C}ok\u{201D}"), vec![0x93, b'o', b'k', 0x94]);
    }

    #[test]
    fn test_win_ansi_degrades_unencodable() {
        assert_eq!(encode_win_ansi("\u{0110}"), b"?".to_vec());
        // C1 controls have no WinAnsi slot.
        assert_eq!(encode_win_ansi("\u{0085}"), b"?".to_vec());
        assert_eq!(encode_win_ansi("\u{007F}"), b"?".to_vec());
    }

    #[test]
    fn test_image_xobject_dict() {
        let canvas = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]));
        let stream = image_xobject(&canvas).unwrap();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 8);
        assert_eq!(
            stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"FlateDecode"
        );
        assert!(!stream.content.is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_load_error() {
        let result = PdfPoster::open_from_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(PosterError::TemplateLoad(_))));
    }
}
