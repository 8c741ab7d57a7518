//! Campaign form input

use crate::catalog::Language;
use crate::{CampaignError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six campaign alternatives offered to companies.
///
/// Each alternative selects a template bundle, a payment arrangement,
/// and whether Boostrix Polio is part of the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Alternative {
    One,
    Two,
    Three,
    Four,
    Five,
    /// Data-only row used to exercise the cleaned template set
    Six,
}

impl Alternative {
    pub const ALL: [Alternative; 6] = [
        Alternative::One,
        Alternative::Two,
        Alternative::Three,
        Alternative::Four,
        Alternative::Five,
        Alternative::Six,
    ];

    /// The form identifier as it appears in the UI ("1" through "6").
    pub fn as_str(&self) -> &'static str {
        match self {
            Alternative::One => "1",
            Alternative::Two => "2",
            Alternative::Three => "3",
            Alternative::Four => "4",
            Alternative::Five => "5",
            Alternative::Six => "6",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Alternative::One),
            "2" => Ok(Alternative::Two),
            "3" => Ok(Alternative::Three),
            "4" => Ok(Alternative::Four),
            "5" => Ok(Alternative::Five),
            "6" => Ok(Alternative::Six),
            other => Err(CampaignError::UnknownAlternative(other.to_string())),
        }
    }
}

/// Everything the campaign form collects from the account manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInput {
    /// Contact person at the company, addressed in the email
    pub contact_name: String,
    pub company_name: String,
    /// Visit date spelled out in Norwegian, e.g. "12. mai 2025"
    pub date_no: String,
    /// Visit date spelled out in English, e.g. "May 12th 2025"
    pub date_en: String,
    /// Clock time, only shown when `include_time` is set
    pub time: String,
    pub include_time: bool,
    /// Booking link, also the QR payload
    pub booking_link: String,
    pub alternative: Alternative,
}

impl FormInput {
    /// Date string matching a template's language tag.
    pub fn date_for(&self, language: Language) -> &str {
        match language {
            Language::Norwegian => &self.date_no,
            Language::English => &self.date_en,
        }
    }

    /// Check cross-field consistency before generation.
    pub fn validate(&self) -> Result<()> {
        if self.include_time && self.time.trim().is_empty() {
            return Err(CampaignError::InvalidForm(
                "include_time is set but no time was given".to_string(),
            ));
        }
        if self.booking_link.trim().is_empty() {
            return Err(CampaignError::InvalidForm(
                "booking link is empty".to_string(),
            ));
        }
        Ok(())
    }
}
