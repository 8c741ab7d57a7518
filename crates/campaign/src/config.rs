//! Per-alternative configuration table

use crate::form::Alternative;

/// How the cover email's opening sentence is adjusted for an alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailModification {
    None,
    /// Drop the Boostrix Polio clause from the opening sentence
    RemoveBoostrix,
}

/// Static configuration for one campaign alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlternativeConfig {
    pub email_modification: EmailModification,
    /// Payment copy in the Norwegian employee text
    pub payment_method_no: &'static str,
    /// Payment copy in the English employee text
    pub payment_method_en: &'static str,
    pub poster_template_no: &'static str,
    pub poster_template_en: &'static str,
    /// Poster carried along on the visit, never sent to the company
    pub internal_poster_template: &'static str,
    /// Whether Boostrix Polio is named in the employee text
    pub include_boostrix: bool,
}

const ALT_1: AlternativeConfig = AlternativeConfig {
    email_modification: EmailModification::RemoveBoostrix,
    payment_method_no: "Influensavaksinen er gratis for deg, kostnaden dekkes av arbeidsgiver.",
    payment_method_en: "The flu shot is free for you, it is paid by your employer.",
    poster_template_no: "Bookingplakat_-_BedriftensNavn.png",
    poster_template_en: "Bookingplakat_-_BedriftensNavn_eng.png",
    internal_poster_template: "BedriftensNavn_Plakat_-_Til_å_ha_med_på_oppdrag_ikke_sende.png",
    include_boostrix: false,
};

const ALT_2: AlternativeConfig = AlternativeConfig {
    email_modification: EmailModification::None,
    payment_method_no:
        "Influensavaksinen og Boostrix Polio er gratis for deg, kostnaden dekkes av arbeidsgiver.",
    payment_method_en:
        "The flu shot and Boostrix Polio are free for you, they are paid by your employer.",
    poster_template_no: "Versjon_2.png",
    poster_template_en: "Versjon_2_eng.png",
    internal_poster_template:
        "BedriftensNavn_Plakat_-_Til_å_ha_med_på_oppdrag_ikke_sende_beggebedriftenbetaler.png",
    include_boostrix: true,
};

const ALT_3: AlternativeConfig = AlternativeConfig {
    email_modification: EmailModification::None,
    payment_method_no: "Influensavaksinen er gratis for deg, kostnaden dekkes av arbeidsgiver. \
         Boostrix Polio betaler du enkelt med Vipps eller kort. Pris: 495,-",
    payment_method_en: "The flu shot is free for you, it is paid by your employer. \
         Boostrix Polio can be easily paid for with Vipps or card. Price: 495,-",
    poster_template_no: "Versjon_3_from_pdf.jpg",
    poster_template_en: "Versjon_3_eng.png",
    internal_poster_template:
        "BedriftensNavn_Plakat_-_Til_å_ha_med_på_oppdrag_ikke_sende_beggebedriftenbetaleriv.png",
    include_boostrix: true,
};

const ALT_4: AlternativeConfig = AlternativeConfig {
    email_modification: EmailModification::RemoveBoostrix,
    payment_method_no: "Influensavaksinen betaler du enkelt med Vipps eller kort. Pris: 395,-",
    payment_method_en: "The flu shot can be easily paid for with Vipps or card. Price: 395,-",
    poster_template_no: "Versjon_4.png",
    poster_template_en: "Versjon_4_eng_new.svg",
    internal_poster_template:
        "BedriftensNavn_Plakat_-_Til_å_ha_med_på_oppdrag_ikke_sende_betale_selv.png",
    include_boostrix: false,
};

const ALT_5: AlternativeConfig = AlternativeConfig {
    email_modification: EmailModification::RemoveBoostrix,
    payment_method_no: "Influensavaksinen er gratis for deg, kostnaden dekkes av arbeidsgiver.",
    payment_method_en: "The flu shot is free for you, it is paid by your employer.",
    poster_template_no: "cleaned_templates/Eksisterende kunder - vaksinert.png",
    poster_template_en: "cleaned_templates/Eksisterende kunder - vaksinert (1).png",
    internal_poster_template: "cleaned_templates/Eksisterende kunder - vaksinert.png",
    include_boostrix: false,
};

const ALT_6: AlternativeConfig = AlternativeConfig {
    email_modification: EmailModification::RemoveBoostrix,
    payment_method_no: "Test alternativ for rene templates",
    payment_method_en: "Test alternative for clean templates",
    poster_template_no: "cleaned_templates/Eksisterende kunder - vaksinert (1).png",
    poster_template_en: "cleaned_templates/Eksisterende kunder - vaksinert.png",
    internal_poster_template: "cleaned_templates/Eksisterende kunder - vaksinert (1).png",
    include_boostrix: false,
};

/// One template reference from a configuration row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfiguredTemplate {
    pub name: &'static str,
    /// Forced on the internal poster even when the file name carries no
    /// internal marker (the cleaned template set reuses poster files).
    pub internal: bool,
}

impl AlternativeConfig {
    /// Configuration row for an alternative. Total over the enum, so a
    /// resolved alternative always has configuration.
    pub fn get(alternative: Alternative) -> &'static AlternativeConfig {
        match alternative {
            Alternative::One => &ALT_1,
            Alternative::Two => &ALT_2,
            Alternative::Three => &ALT_3,
            Alternative::Four => &ALT_4,
            Alternative::Five => &ALT_5,
            Alternative::Six => &ALT_6,
        }
    }

    /// Template references for this alternative: the language pair plus
    /// the internal poster.
    pub fn poster_assets(&self) -> [ConfiguredTemplate; 3] {
        [
            ConfiguredTemplate {
                name: self.poster_template_no,
                internal: false,
            },
            ConfiguredTemplate {
                name: self.poster_template_en,
                internal: false,
            },
            ConfiguredTemplate {
                name: self.internal_poster_template,
                internal: true,
            },
        ]
    }
}
