//! SVG template compositing
//!
//! SVG templates are edited structurally rather than textually: the tree
//! is parsed, the QR placeholder image's href is swapped for a fresh PNG
//! data URL, date text is substituted inside existing text nodes, and the
//! tree is serialized back.

use crate::{PosterError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;
use xmltree::{Element, EmitterConfig, XMLNode};

/// QR edge length in SVG units when the placeholder has no usable size.
const DEFAULT_QR_SIZE: u32 = 248;

/// Placeholder squares are preferred in this size band, matching the
/// reserved area on the designed templates.
const PREFERRED_SQUARE: std::ops::RangeInclusive<f64> = 200.0..=300.0;

const FALLBACK_DATE_X: &str = "540";
const FALLBACK_DATE_Y: &str = "462";

/// Composite a QR code and date line into SVG markup.
pub fn render_svg(markup: &str, qr_text: &str, date_text: &str) -> Result<String> {
    let mut root = Element::parse(markup.as_bytes())
        .map_err(|e| PosterError::TemplateLoad(format!("Unparsable SVG template: {e}")))?;

    replace_qr(&mut root, qr_text)?;

    if !replace_date(&mut root, date_text) {
        inject_date_node(&mut root, date_text);
    }

    serialize(&root)
}

struct ImageInfo {
    width: Option<f64>,
    height: Option<f64>,
    has_data_url: bool,
}

impl ImageInfo {
    fn square_side(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if (w - h).abs() < 0.001 => Some(w),
            _ => None,
        }
    }
}

fn replace_qr(root: &mut Element, qr_text: &str) -> Result<()> {
    let mut images = Vec::new();
    collect_images(root, &mut images);
    if images.is_empty() {
        return Err(PosterError::PlaceholderNotFound(
            "SVG template has no <image> element".to_string(),
        ));
    }

    let target = select_placeholder(&images);
    let side = images[target]
        .square_side()
        .map(|s| s.round().max(1.0) as u32)
        .unwrap_or(DEFAULT_QR_SIZE);

    let png = qr_gen::encode_png(qr_text, side)?;
    let data_url = format!("data:image/png;base64,{}", BASE64.encode(png));

    let mut index = 0usize;
    visit_nth_image(root, &mut index, target, &mut |image| {
        image.attributes.insert("href".to_string(), data_url.clone());
    });

    Ok(())
}

/// Pick the placeholder among the collected images: an exact square in
/// the preferred band wins, then any exact square among data-URL images,
/// then the last data-URL image, then the last image of any kind.
fn select_placeholder(images: &[ImageInfo]) -> usize {
    let candidates: Vec<usize> = images
        .iter()
        .enumerate()
        .filter(|(_, info)| info.has_data_url)
        .map(|(i, _)| i)
        .collect();

    let pool: &[usize] = if candidates.is_empty() {
        &[]
    } else {
        &candidates
    };

    if let Some(&i) = pool.iter().find(|&&i| {
        images[i]
            .square_side()
            .is_some_and(|s| PREFERRED_SQUARE.contains(&s))
    }) {
        return i;
    }
    if let Some(&i) = pool.iter().find(|&&i| images[i].square_side().is_some()) {
        return i;
    }
    if let Some(&i) = pool.last() {
        return i;
    }
    images.len() - 1
}

fn collect_images(el: &Element, out: &mut Vec<ImageInfo>) {
    if el.name == "image" {
        out.push(ImageInfo {
            width: dimension(el, "width"),
            height: dimension(el, "height"),
            has_data_url: el
                .attributes
                .get("href")
                .is_some_and(|href| href.starts_with("data:image")),
        });
    }
    for child in &el.children {
        if let XMLNode::Element(child_el) = child {
            collect_images(child_el, out);
        }
    }
}

fn visit_nth_image(
    el: &mut Element,
    index: &mut usize,
    target: usize,
    apply: &mut dyn FnMut(&mut Element),
) {
    if el.name == "image" {
        if *index == target {
            apply(el);
        }
        *index += 1;
    }
    for child in &mut el.children {
        if let XMLNode::Element(child_el) = child {
            visit_nth_image(child_el, index, target, apply);
        }
    }
}

/// Parse a length attribute, tolerating a unit suffix like `248px`.
fn dimension(el: &Element, attr: &str) -> Option<f64> {
    el.attributes
        .get(attr)
        .and_then(|v| v.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%').trim().parse().ok())
}

fn date_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new("(?i)DATE_PLACEHOLDER").expect("static pattern"),
            Regex::new(r"(?i)\bdate\b").expect("static pattern"),
            Regex::new(r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b").expect("static pattern"),
            Regex::new(r"\b\d{4}[./-]\d{1,2}[./-]\d{1,2}\b").expect("static pattern"),
        ]
    })
}

/// Substitute the date into text/tspan nodes, returning whether any
/// substitution happened. Each text node gets the first pattern that
/// matches it.
fn replace_date(el: &mut Element, date_text: &str) -> bool {
    let mut replaced = false;

    if el.name == "text" || el.name == "tspan" {
        for child in &mut el.children {
            if let XMLNode::Text(content) = child {
                for pattern in date_patterns() {
                    if pattern.is_match(content) {
                        *content = pattern.replace_all(content, date_text).into_owned();
                        replaced = true;
                        break;
                    }
                }
            }
        }
    }

    for child in &mut el.children {
        if let XMLNode::Element(child_el) = child {
            replaced |= replace_date(child_el, date_text);
        }
    }

    replaced
}

/// No existing text matched, so the date gets its own node at a fixed
/// position so it always appears somewhere on the poster.
fn inject_date_node(root: &mut Element, date_text: &str) {
    let mut node = Element::new("text");
    node.attributes.insert("x".to_string(), FALLBACK_DATE_X.to_string());
    node.attributes.insert("y".to_string(), FALLBACK_DATE_Y.to_string());
    node.attributes.insert("fill".to_string(), "#FFFFFF".to_string());
    node.attributes.insert(
        "font-family".to_string(),
        "Montserrat, sans-serif".to_string(),
    );
    node.attributes.insert("font-size".to_string(), "28".to_string());
    node.attributes.insert("font-weight".to_string(), "bold".to_string());
    node.children.push(XMLNode::Text(date_text.to_string()));
    root.children.push(XMLNode::Element(node));
}

fn serialize(root: &Element) -> Result<String> {
    let mut out = Vec::new();
    let config = EmitterConfig::new().write_document_declaration(false);
    root.write_with_config(&mut out, config)
        .map_err(|e| PosterError::Render(format!("SVG serialization failed: {e}")))?;
    String::from_utf8(out).map_err(|e| PosterError::Render(format!("SVG output not UTF-8: {e}")))
}
