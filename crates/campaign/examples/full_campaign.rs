//! Full Campaign Demo - renders a complete material bundle
//!
//! This example shows:
//! - Building an in-memory template catalog with tagged assets
//! - Rendering mission, internal, SVG, and PDF posters in one pass
//! - Display-name mapping and the generated cover email
//!
//! Run with: cargo run --example full_campaign -p campaign

use campaign::{email, Alternative, FormInput, Generator, MemoryCatalog};
use lopdf::dictionary;
use std::io::Cursor;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    std::fs::create_dir_all("output")?;

    let form = FormInput {
        contact_name: "Kari Nordmann".to_string(),
        company_name: "Acme AS".to_string(),
        date_no: "12. mai 2025".to_string(),
        date_en: "May 12th 2025".to_string(),
        time: "09:00-14:00".to_string(),
        include_time: true,
        booking_link: "https://example.com/booking/acme".to_string(),
        alternative: Alternative::Three,
    };

    // Stand-in templates generated on the fly; a real deployment loads
    // the designed artwork here instead.
    let mut catalog = MemoryCatalog::new();
    catalog.insert(
        Alternative::Three,
        "Mission_plakat.png",
        blank_png(1080, 1620, [30, 60, 120]),
    );
    catalog.insert(
        Alternative::Three,
        "Mission_plakat_eng.png",
        blank_png(1080, 1620, [30, 60, 120]),
    );
    catalog.insert(
        Alternative::Three,
        "Plakat_-_Til_å_ha_med_på_oppdrag_ikke_sende.png",
        blank_png(1080, 1620, [120, 30, 60]),
    );
    catalog.insert(Alternative::Three, "Versjon_3_eng_new.svg", demo_svg());
    catalog.insert(Alternative::Three, "Versjon_3.pdf", blank_pdf()?);

    let generator = Generator::new(catalog);
    let outcome = generator.generate_preview(&form)?;

    for artifact in &outcome.artifacts {
        let extension = match artifact.mime_type {
            "application/pdf" => "pdf",
            "image/svg+xml" => "svg",
            _ => "png",
        };
        let path = format!("output/{}.{extension}", artifact.display_name);
        std::fs::write(&path, &artifact.bytes)?;
        println!("wrote {path} ({} bytes)", artifact.bytes.len());
    }
    for failure in &outcome.failures {
        println!("failed: {} ({})", failure.asset_name, failure.error);
    }

    std::fs::write("output/email.txt", email::email_text(&form))?;
    std::fs::write("output/email.html", email::email_html(&form))?;
    println!("wrote output/email.txt and output/email.html");

    Ok(())
}

fn blank_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let canvas = image::RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([rgb[0], rgb[1], rgb[2], 255]),
    );
    let mut buffer = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("in-memory PNG encoding");
    buffer.into_inner()
}

fn demo_svg() -> Vec<u8> {
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="1080" height="1080">
  <rect width="1080" height="1080" fill="#223355"/>
  <text x="100" y="200" fill="#FFFFFF" font-size="48">Flu vaccination</text>
  <text x="100" y="500" fill="#FFFFFF" font-size="28">DATE_PLACEHOLDER</text>
  <image x="700" y="700" width="248" height="248" href="data:image/png;base64,AAAA"/>
</svg>"##
        .to_vec()
}

fn blank_pdf() -> anyhow::Result<Vec<u8>> {
    let mut doc = lopdf::Document::new();
    let pages_id = doc.add_object(lopdf::Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Count" => 1,
        "Kids" => vec![],
    }));
    let contents_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
        dictionary! {},
        b"0.13 0.23 0.47 rg\n0 0 595 842 re f\n".to_vec(),
    )));
    let page_id = doc.add_object(lopdf::Object::Dictionary(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
        "Resources" => dictionary! {},
        "Contents" => contents_id,
    }));
    let mut pages_dict = doc.get_object(pages_id)?.as_dict()?.clone();
    pages_dict.set("Kids", lopdf::Object::Array(vec![page_id.into()]));
    doc.objects.insert(pages_id, pages_dict.into());
    let catalog_id = doc.add_object(lopdf::Object::Dictionary(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
