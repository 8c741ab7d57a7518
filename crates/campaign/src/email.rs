//! Cover email rendering
//!
//! Plain string interpolation over the alternative's configuration row.
//! The email is one Norwegian letter to the contact person containing
//! ready-to-forward employee blurbs in Norwegian and English.

use crate::config::{AlternativeConfig, EmailModification};
use crate::form::FormInput;

fn opening_sentences(form: &FormInput, config: &AlternativeConfig) -> (String, String) {
    match config.email_modification {
        EmailModification::RemoveBoostrix => (
            format!(
                "Snart kommer vi til {} for å sette influensavaksine.",
                form.company_name
            ),
            format!(
                "Dr.Dropin will visit {} on {} to offer flu vaccinations.",
                form.company_name, form.date_en
            ),
        ),
        EmailModification::None => (
            format!(
                "Snart kommer vi til {} for å sette influensavaksine og Boostrix Polio.",
                form.company_name
            ),
            format!(
                "Dr.Dropin will visit {} on {} to offer flu vaccinations and Boostrix Polio.",
                form.company_name, form.date_en
            ),
        ),
    }
}

fn vaccine_phrase(config: &AlternativeConfig) -> &'static str {
    if config.include_boostrix {
        "influensavaksine og Boostrix Polio"
    } else {
        "influensavaksine"
    }
}

/// Plain-text rendition of the cover email.
pub fn email_text(form: &FormInput) -> String {
    let config = AlternativeConfig::get(form.alternative);
    let (opening_no, opening_en) = opening_sentences(form, config);
    let time_no = if form.include_time {
        format!("\nTid: {}", form.time)
    } else {
        String::new()
    };
    let time_en = if form.include_time {
        format!("\nTime: {}", form.time)
    } else {
        String::new()
    };

    format!(
        "Hei {contact},\n\
         \n\
         {opening_no} Her finner du alt du trenger for å dele informasjonen internt og sikre at flest mulig ansatte melder seg på. Materiell finnes på norsk og engelsk:\n\
         • Plakater\n\
         • Informasjonstekst til e-post/intranett\n\
         • Påmeldingslink\n\
         \n\
         👉 Erfaring viser at påminnelser i flere kanaler (e-post, intranett, plakater, skjermer osv.) gir best oppmøte.\n\
         \n\
         Hvorfor det lønner seg for dere at mange tar influensavaksinen:\n\
         • En sykedag koster bedriften ca. 4000 kr.\n\
         • Influensavaksinen kan redusere risikoen for influensa med opptil 60 %.\n\
         • Ansatte som likevel blir smittet av influensa får ofte kortere og mildere sykdomsforløp dersom de har tatt vaksinen.\n\
         \n\
         Eksempeltekst til ansatte (norsk):\n\
         Influensavaksinering\n\
         Dr.Dropin kommer til {company} {date_no} for å sette {vaccine}. {payment_no}{time_no}\n\
         Sted: [Møterom – fylles inn av bedriften]\n\
         👉 Meld deg på her: {link}\n\
         \n\
         Vaksinen registreres på Helsenorge. Husk å lese egenerklæringen og sette av tid i kalenderen din.\n\
         \n\
         Example text for employees (English):\n\
         Flu vaccination\n\
         {opening_en} {payment_en}{time_en}\n\
         Location: [Meeting room at your office]\n\
         👉 Sign up here: {link}\n\
         \n\
         Your vaccination will be registered on Helsenorge. Please read the self-declaration form before your appointment and add the time to your calendar.\n\
         \n\
         Vi ser frem til videre samarbeid med dere. Ta gjerne kontakt om du har noen spørsmål.",
        contact = form.contact_name,
        company = form.company_name,
        date_no = form.date_no,
        vaccine = vaccine_phrase(config),
        payment_no = config.payment_method_no,
        payment_en = config.payment_method_en,
        link = form.booking_link,
    )
}

/// HTML rendition of the cover email, for clients that take rich bodies.
pub fn email_html(form: &FormInput) -> String {
    let config = AlternativeConfig::get(form.alternative);
    let (opening_no, opening_en) = opening_sentences(form, config);
    let time_no = if form.include_time {
        format!("<br>Tid: {}", form.time)
    } else {
        String::new()
    };
    let time_en = if form.include_time {
        format!("<br>Time: {}", form.time)
    } else {
        String::new()
    };

    format!(
        r#"<div style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.5; color: #333;">
<p>Hei {contact},</p>

<p>{opening_no} Her finner du alt du trenger for å dele informasjonen internt og sikre at flest mulig ansatte melder seg på. Materiell finnes på norsk og engelsk:</p>
<ul style="margin: 0; padding-left: 20px;">
<li>Plakater</li>
<li>Informasjonstekst til e-post/intranett</li>
<li>Påmeldingslink</li>
</ul>

<p>👉 Erfaring viser at påminnelser i flere kanaler (e-post, intranett, plakater, skjermer osv.) gir best oppmøte.</p>

<p><strong>Hvorfor det lønner seg for dere at mange tar influensavaksinen:</strong></p>
<ul style="margin: 0; padding-left: 20px;">
<li>En sykedag koster bedriften ca. 4000 kr.</li>
<li>Influensavaksinen kan redusere risikoen for influensa med opptil 60 %.</li>
<li>Ansatte som likevel blir smittet av influensa får ofte kortere og mildere sykdomsforløp dersom de har tatt vaksinen.</li>
</ul>

<div style="background-color: #f8f9fa; padding: 15px; border-radius: 8px; margin: 20px 0;">
<p><strong>Eksempeltekst til ansatte (norsk):</strong></p>
<p><strong>Influensavaksinering</strong><br>
Dr.Dropin kommer til {company} {date_no} for å sette {vaccine}. {payment_no}{time_no}<br>
Sted: [Møterom – fylles inn av bedriften]<br>
👉 Meld deg på her: <a href="{link}" target="_blank" style="color: #0066cc; text-decoration: none;">{link}</a></p>

<p>Vaksinen registreres på Helsenorge. Husk å lese egenerklæringen og sette av tid i kalenderen din.</p>
</div>

<div style="background-color: #f8f9fa; padding: 15px; border-radius: 8px; margin: 20px 0;">
<p><strong>Example text for employees (English):</strong></p>
<p><strong>Flu vaccination</strong><br>
{opening_en} {payment_en}{time_en}<br>
Location: [Meeting room at your office]<br>
👉 Sign up here: <a href="{link}" target="_blank" style="color: #0066cc; text-decoration: none;">{link}</a></p>

<p>Your vaccination will be registered on Helsenorge. Please read the self-declaration form before your appointment and add the time to your calendar.</p>
</div>

<p>Vi ser frem til videre samarbeid med dere. Ta gjerne kontakt om du har noen spørsmål.</p>
</div>"#,
        contact = form.contact_name,
        company = form.company_name,
        date_no = form.date_no,
        vaccine = vaccine_phrase(config),
        payment_no = config.payment_method_no,
        payment_en = config.payment_method_en,
        link = form.booking_link,
    )
}
