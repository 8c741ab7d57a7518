//! Template asset catalog
//!
//! Assets are tagged once when the catalog is built. Renderers and the
//! generator only ever see the tags, never raw file name conventions.

use crate::config::AlternativeConfig;
use crate::form::Alternative;
use crate::{CampaignError, Result};
use poster_core::{TemplateCategory, TemplateFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Language of a template, inferred from the `eng` marker in file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Norwegian,
    English,
}

impl Language {
    pub fn from_file_name(name: &str) -> Self {
        if name.to_ascii_lowercase().contains("eng") {
            Language::English
        } else {
            Language::Norwegian
        }
    }

    /// Norwegian-language label used in display names.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Norwegian => "norsk",
            Language::English => "engelsk",
        }
    }
}

/// A poster template known to the catalog, with tags resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAsset {
    /// Machine-safe original file name
    pub name: String,
    pub format: TemplateFormat,
    pub category: TemplateCategory,
    pub language: Language,
    /// Internal posters are carried on the visit and never sent out;
    /// they render through the circle/QR path without any date.
    pub internal: bool,
}

impl TemplateAsset {
    /// Derive all tags from a file name.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let internal = lower.contains("ikke_sende") || lower.contains("internal");
        Self {
            name: name.to_string(),
            format: TemplateFormat::from_file_name(name),
            category: TemplateCategory::from_file_name(name),
            language: Language::from_file_name(name),
            internal,
        }
    }
}

/// Source of template bytes and per-alternative template listings
pub trait AssetCatalog {
    /// Raw bytes of a template by its original name.
    fn get(&self, name: &str) -> Result<Vec<u8>>;

    /// All templates configured for an alternative, in insertion order.
    fn list_by_alternative(&self, alternative: Alternative) -> Vec<TemplateAsset>;
}

/// In-memory catalog for tests, demos, and embedded asset bundles
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    data: HashMap<String, Vec<u8>>,
    by_alternative: BTreeMap<Alternative, Vec<TemplateAsset>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, deriving its tags from the file name.
    pub fn insert(&mut self, alternative: Alternative, name: &str, bytes: Vec<u8>) {
        self.insert_tagged(alternative, TemplateAsset::from_file_name(name), bytes);
    }

    /// Add a template with explicit tags, for assets whose names do not
    /// follow the conventions (the legacy fixed-pixel template).
    pub fn insert_tagged(
        &mut self,
        alternative: Alternative,
        asset: TemplateAsset,
        bytes: Vec<u8>,
    ) {
        self.data.insert(asset.name.clone(), bytes);
        self.by_alternative
            .entry(alternative)
            .or_default()
            .push(asset);
    }

    /// Add every template the configuration row names for an
    /// alternative, fetching bytes by file name. The internal poster is
    /// flagged internal even when its file name carries no marker.
    pub fn insert_configured<F>(&mut self, alternative: Alternative, mut load: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<Vec<u8>>,
    {
        for configured in AlternativeConfig::get(alternative).poster_assets() {
            let mut asset = TemplateAsset::from_file_name(configured.name);
            asset.internal = asset.internal || configured.internal;
            let bytes = load(configured.name)?;
            self.insert_tagged(alternative, asset, bytes);
        }
        Ok(())
    }
}

impl AssetCatalog for MemoryCatalog {
    fn get(&self, name: &str) -> Result<Vec<u8>> {
        self.data
            .get(name)
            .cloned()
            .ok_or_else(|| CampaignError::AssetNotFound(name.to_string()))
    }

    fn list_by_alternative(&self, alternative: Alternative) -> Vec<TemplateAsset> {
        self.by_alternative
            .get(&alternative)
            .cloned()
            .unwrap_or_default()
    }
}
