//! Poster generation orchestrator
//!
//! Walks the assets resolved for an alternative, renders each one with
//! the booking QR code and the right-language date, and collects the
//! results. One bad template never sinks the batch; it becomes a failure
//! entry and generation moves on.

use crate::catalog::{AssetCatalog, TemplateAsset};
use crate::form::FormInput;
use crate::names::{find_by_display_name, unique_display_names};
use crate::{CampaignError, Result};
use poster_core::{render_pdf, render_svg, PosterError, RasterRenderer, TemplateFormat};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// One successfully rendered poster
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    /// Machine-safe template name the artifact came from
    pub original_name: String,
    /// Human-readable name, unique within the batch
    pub display_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One asset that could not be rendered
#[derive(Debug)]
pub struct GenerationFailure {
    pub asset_name: String,
    pub error: CampaignError,
}

/// Result of a generation pass
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    pub artifacts: Vec<RenderedArtifact>,
    pub failures: Vec<GenerationFailure>,
    /// Set when the cancellation flag stopped the pass early
    pub cancelled: bool,
}

/// Renders campaign material batches from a template catalog.
pub struct Generator<C: AssetCatalog> {
    catalog: C,
    raster: RasterRenderer,
}

impl<C: AssetCatalog> Generator<C> {
    /// A generator without a raster date font. Mission and internal
    /// posters render fine; dated raster posters will record failures.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            raster: RasterRenderer::new(),
        }
    }

    /// A generator that draws raster dates with the given TTF font.
    pub fn with_date_font(catalog: C, ttf_data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            catalog,
            raster: RasterRenderer::with_font(ttf_data)?,
        })
    }

    /// Render every asset configured for the form's alternative.
    pub fn generate_preview(&self, form: &FormInput) -> Result<GenerationOutcome> {
        self.generate(form, &[], None)
    }

    /// Render a selection of assets, addressed by original or display
    /// name. An empty selection means everything.
    pub fn generate_selected(&self, form: &FormInput, names: &[String]) -> Result<GenerationOutcome> {
        self.generate(form, names, None)
    }

    /// Like [`Self::generate_selected`], checking the flag between
    /// assets and stopping early once it is set.
    pub fn generate_with_cancel(
        &self,
        form: &FormInput,
        names: &[String],
        cancel: &AtomicBool,
    ) -> Result<GenerationOutcome> {
        self.generate(form, names, Some(cancel))
    }

    fn generate(
        &self,
        form: &FormInput,
        names: &[String],
        cancel: Option<&AtomicBool>,
    ) -> Result<GenerationOutcome> {
        form.validate()?;

        let available = self.catalog.list_by_alternative(form.alternative);
        if available.is_empty() {
            return Err(CampaignError::EmptySelection);
        }

        let mut outcome = GenerationOutcome::default();
        let selected = if names.is_empty() {
            available.clone()
        } else {
            self.resolve_selection(&available, names, form, &mut outcome)
        };
        if selected.is_empty() {
            return Err(CampaignError::EmptySelection);
        }

        let display_names = unique_display_names(&selected, &form.company_name);

        for (asset, display_name) in selected.iter().zip(display_names) {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                info!(alternative = %form.alternative, "generation cancelled");
                outcome.cancelled = true;
                break;
            }

            debug!(
                asset = %asset.name,
                format = ?asset.format,
                category = ?asset.category,
                "rendering asset"
            );
            match self.render_asset(asset, form) {
                Ok(bytes) => {
                    info!(asset = %asset.name, display = %display_name, "rendered poster");
                    outcome.artifacts.push(RenderedArtifact {
                        original_name: asset.name.clone(),
                        display_name,
                        mime_type: asset.format.output_mime_type(),
                        bytes,
                    });
                }
                Err(error) => {
                    warn!(asset = %asset.name, %error, "failed to render poster");
                    outcome.failures.push(GenerationFailure {
                        asset_name: asset.name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Match requested names against the available assets. Names can be
    /// original file names or batch display names; misses become
    /// failure entries.
    fn resolve_selection(
        &self,
        available: &[TemplateAsset],
        names: &[String],
        form: &FormInput,
        outcome: &mut GenerationOutcome,
    ) -> Vec<TemplateAsset> {
        let mut selected = Vec::new();
        for wanted in names {
            let hit = available
                .iter()
                .find(|asset| asset.name == *wanted)
                .or_else(|| find_by_display_name(available, &form.company_name, wanted));
            match hit {
                Some(asset) => selected.push(asset.clone()),
                None => {
                    warn!(name = %wanted, "selected template not in catalog");
                    outcome.failures.push(GenerationFailure {
                        asset_name: wanted.clone(),
                        error: CampaignError::AssetNotFound(wanted.clone()),
                    });
                }
            }
        }
        selected
    }

    fn render_asset(&self, asset: &TemplateAsset, form: &FormInput) -> Result<Vec<u8>> {
        let template = self.catalog.get(&asset.name)?;
        let date = form.date_for(asset.language);
        let link = &form.booking_link;

        let bytes = match asset.format {
            TemplateFormat::Raster if asset.internal => {
                self.raster.render_internal_png(&template, link)?
            }
            TemplateFormat::Raster => {
                self.raster.render_png(&template, link, date, asset.category)?
            }
            TemplateFormat::Pdf => render_pdf(&template, link, date)?,
            TemplateFormat::Svg => {
                let markup = std::str::from_utf8(&template).map_err(|e| {
                    PosterError::TemplateLoad(format!("SVG template is not UTF-8: {e}"))
                })?;
                render_svg(markup, link, date)?.into_bytes()
            }
        };

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::form::Alternative;
    use pretty_assertions::assert_eq;

    fn form() -> FormInput {
        FormInput {
            contact_name: "Kari Nordmann".to_string(),
            company_name: "Acme AS".to_string(),
            date_no: "12. mai 2025".to_string(),
            date_en: "May 12th 2025".to_string(),
            time: String::new(),
            include_time: false,
            booking_link: "https://example.com/booking/acme".to_string(),
            alternative: Alternative::One,
        }
    }

    #[test]
    fn test_empty_catalog_aborts_generation() {
        let generator = Generator::new(MemoryCatalog::new());
        let result = generator.generate_preview(&form());
        assert!(matches!(result, Err(CampaignError::EmptySelection)));
    }

    #[test]
    fn test_invalid_form_aborts_generation() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(Alternative::One, "Mission_a.png", vec![1]);
        let generator = Generator::new(catalog);

        let mut invalid = form();
        invalid.booking_link = String::new();
        assert!(matches!(
            generator.generate_preview(&invalid),
            Err(CampaignError::InvalidForm(_))
        ));
    }

    #[test]
    fn test_unknown_selection_becomes_failure() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(Alternative::One, "Mission_a.png", vec![1]);
        let generator = Generator::new(catalog);

        let result = generator.generate_selected(&form(), &["nope.png".to_string()]);
        // Nothing resolved at all, so the request fails outright.
        assert!(matches!(result, Err(CampaignError::EmptySelection)));
    }

    #[test]
    fn test_successful_render_is_labelled() {
        let canvas = image::RgbaImage::from_pixel(120, 180, image::Rgba([10, 20, 30, 255]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        canvas.write_to(&mut buffer, image::ImageFormat::Png).unwrap();

        let mut catalog = MemoryCatalog::new();
        catalog.insert(Alternative::One, "Mission_a.png", buffer.into_inner());
        let generator = Generator::new(catalog);

        let outcome = generator.generate_preview(&form()).unwrap();
        assert_eq!(outcome.artifacts.len(), 1);
        assert_eq!(outcome.artifacts[0].original_name, "Mission_a.png");
        assert_eq!(outcome.artifacts[0].display_name, "Acme AS - Oppdrag (norsk)");
        assert_eq!(outcome.artifacts[0].mime_type, "image/png");
    }

    #[test]
    fn test_corrupt_template_recorded_not_fatal() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(Alternative::One, "Mission_a.png", b"garbage".to_vec());
        let generator = Generator::new(catalog);

        let outcome = generator.generate_preview(&form()).unwrap();
        assert_eq!(outcome.artifacts.len(), 0);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].asset_name, "Mission_a.png");
        assert!(!outcome.cancelled);
    }
}
