//! Campaign - vaccination campaign material generation
//!
//! This crate ties the renderers together: it knows which poster
//! templates belong to each campaign alternative, renders them with the
//! booking QR code and campaign dates burned in, maps machine file names
//! to human-readable display names, and produces the accompanying cover
//! email in Norwegian and English.
//!
//! # Example
//!
//! ```ignore
//! use campaign::{FormInput, Generator, MemoryCatalog};
//!
//! let generator = Generator::new(catalog);
//! let outcome = generator.generate_preview(&form)?;
//! for artifact in &outcome.artifacts {
//!     std::fs::write(format!("{}.png", artifact.display_name), &artifact.bytes)?;
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod email;
pub mod form;
pub mod generator;
pub mod names;

pub use catalog::{AssetCatalog, Language, MemoryCatalog, TemplateAsset};
pub use config::{AlternativeConfig, ConfiguredTemplate, EmailModification};
pub use form::{Alternative, FormInput};
pub use generator::{GenerationFailure, GenerationOutcome, Generator, RenderedArtifact};

use poster_core::PosterError;
use thiserror::Error;

/// Errors that can occur while generating campaign materials
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Unknown alternative: {0}")]
    UnknownAlternative(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Invalid form input: {0}")]
    InvalidForm(String),

    #[error("No assets resolved for generation")]
    EmptySelection,

    #[error(transparent)]
    Poster(#[from] PosterError),
}

/// Result type for campaign operations
pub type Result<T> = std::result::Result<T, CampaignError>;
