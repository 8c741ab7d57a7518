//! Display-name mapping
//!
//! Machine file names like `Versjon_3_eng.png` become
//! "Acme AS - Bookingplakat (engelsk)" for the people receiving the
//! material. The mapping is deterministic within a batch so a display
//! name can be traced back to its asset.

use crate::catalog::TemplateAsset;
use poster_core::TemplateCategory;

/// Human-readable name for one asset.
pub fn display_name(asset: &TemplateAsset, company: &str) -> String {
    let poster_type = if asset.internal || asset.category == TemplateCategory::Mission {
        "Oppdrag"
    } else {
        "Bookingplakat"
    };
    format!("{company} - {poster_type} ({})", asset.language.label())
}

/// Display names for a batch, disambiguated with " (2)", " (3)" and so
/// on when several assets would otherwise collide.
pub fn unique_display_names(assets: &[TemplateAsset], company: &str) -> Vec<String> {
    let mut names = Vec::with_capacity(assets.len());
    for asset in assets {
        let base = display_name(asset, company);
        let taken = names.iter().filter(|n: &&String| **n == base).count()
            + names
                .iter()
                .filter(|n: &&String| n.starts_with(&format!("{base} (")))
                .count();
        if taken == 0 {
            names.push(base);
        } else {
            names.push(format!("{base} ({})", taken + 1));
        }
    }
    names
}

/// Find the asset behind a display name from the same batch.
pub fn find_by_display_name<'a>(
    assets: &'a [TemplateAsset],
    company: &str,
    wanted: &str,
) -> Option<&'a TemplateAsset> {
    let names = unique_display_names(assets, company);
    assets
        .iter()
        .zip(names.iter())
        .find(|(_, name)| name.as_str() == wanted)
        .map(|(asset, _)| asset)
}

/// File name used when the artifact is written into an archive.
pub fn archive_file_name(display: &str, extension: &str) -> String {
    format!("{display}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn asset(name: &str) -> TemplateAsset {
        TemplateAsset::from_file_name(name)
    }

    #[test]
    fn test_booking_poster_name() {
        assert_eq!(
            display_name(&asset("Versjon_3_eng.png"), "Acme AS"),
            "Acme AS - Bookingplakat (engelsk)"
        );
        assert_eq!(
            display_name(&asset("Versjon_3_from_pdf.jpg"), "Acme AS"),
            "Acme AS - Bookingplakat (norsk)"
        );
    }

    #[test]
    fn test_mission_poster_name() {
        assert_eq!(
            display_name(&asset("Mission_plakat.png"), "Acme AS"),
            "Acme AS - Oppdrag (norsk)"
        );
    }

    #[test]
    fn test_internal_poster_counts_as_mission() {
        let internal = asset("Plakat_-_Til_å_ha_med_på_oppdrag_ikke_sende.png");
        assert_eq!(display_name(&internal, "Acme AS"), "Acme AS - Oppdrag (norsk)");
    }

    #[test]
    fn test_collisions_are_disambiguated() {
        let batch = vec![
            asset("Versjon_2.png"),
            asset("Versjon_2b.png"),
            asset("Versjon_2_eng.png"),
        ];
        let names = unique_display_names(&batch, "Acme");
        assert_eq!(names[0], "Acme - Bookingplakat (norsk)");
        assert_eq!(names[1], "Acme - Bookingplakat (norsk) (2)");
        assert_eq!(names[2], "Acme - Bookingplakat (engelsk)");
    }

    #[test]
    fn test_find_by_display_name_round_trip() {
        let batch = vec![
            asset("Versjon_2.png"),
            asset("Versjon_2b.png"),
            asset("Versjon_2_eng.png"),
        ];
        let names = unique_display_names(&batch, "Acme");
        for (i, name) in names.iter().enumerate() {
            let found = find_by_display_name(&batch, "Acme", name).unwrap();
            assert_eq!(found.name, batch[i].name);
        }
        assert!(find_by_display_name(&batch, "Acme", "missing").is_none());
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(
            archive_file_name("Acme - Oppdrag (norsk)", "png"),
            "Acme - Oppdrag (norsk).png"
        );
    }
}
