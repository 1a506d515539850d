//! Gain arithmetic and file-name labels
//!
//! A gain is given as a linear fraction of the original level (1.0 = unity).
//! The mixer applies it in decibels, and the mix file name records it so
//! that two different recipes never write to the same file.

use super::recipe::MixRecipe;
use crate::error::{Result, StemmixError};
use crate::types::{LabelStyle, Stem};

/// Decimal separator used inside labels (keeps each token a single "word")
const DECIMAL_SEPARATOR: &str = ",";

/// Convert a linear gain fraction to decibels: `20 * log10(fraction)`
pub fn fraction_to_db(fraction: f64) -> Result<f64> {
    if !fraction.is_finite() || fraction <= 0.0 {
        return Err(StemmixError::InvalidGain {
            stem: None,
            value: fraction,
        });
    }
    Ok(20.0 * fraction.log10())
}

/// Convert decibels back to a linear amplitude factor
pub fn db_to_amplitude(db: f64) -> f32 {
    10f64.powf(db / 20.0) as f32
}

/// Format one `stem_value` token.
///
/// `value` is decibels for [`LabelStyle::Db`] and a fraction for
/// [`LabelStyle::Fraction`].
pub fn format_label(stem: Stem, value: f64, style: LabelStyle) -> String {
    let number = match style {
        LabelStyle::Db => format!("{:.1}dB", value),
        LabelStyle::Fraction => format!("{:.2}", value),
    };
    format!("{}_{}", stem.name(), number.replace('.', DECIMAL_SEPARATOR))
}

/// Label for a whole recipe, one token per stem in recipe order.
///
/// Every token is preceded by a single space, including the first, so the
/// label can be appended directly to the song identifier.
pub fn build_recipe_label(recipe: &MixRecipe, style: LabelStyle) -> String {
    recipe
        .iter()
        .map(|entry| {
            let value = match style {
                LabelStyle::Db => entry.gain.db(),
                LabelStyle::Fraction => entry.gain.fraction(),
            };
            format!(" {}", format_label(entry.stem, value, style))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_recipe() -> MixRecipe {
        MixRecipe::new(vec![
            (Stem::Drums, 1.0),
            (Stem::Vocals, 0.3),
            (Stem::Bass, 0.3),
            (Stem::Other, 0.3),
        ])
        .unwrap()
    }

    #[test]
    fn test_unity_is_zero_db() {
        assert_eq!(fraction_to_db(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_fraction_to_db_matches_formula() {
        for f in [0.01, 0.3, 0.5, 2.0, 10.0] {
            let expected = 20.0 * f64::log10(f);
            assert!((fraction_to_db(f).unwrap() - expected).abs() < 1e-12);
        }
        // 0.3 is the usual "quiet" level
        let db = fraction_to_db(0.3).unwrap();
        assert_eq!((db * 100.0).round() / 100.0, -10.46);
    }

    #[test]
    fn test_fraction_to_db_rejects_non_positive() {
        assert!(fraction_to_db(0.0).is_err());
        assert!(fraction_to_db(-0.5).is_err());
        assert!(fraction_to_db(f64::NAN).is_err());
    }

    #[test]
    fn test_db_to_amplitude_inverts() {
        let db = fraction_to_db(0.3).unwrap();
        assert!((db_to_amplitude(db) - 0.3).abs() < 1e-6);
        assert!((db_to_amplitude(0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_label_styles() {
        assert_eq!(format_label(Stem::Vocals, -10.457, LabelStyle::Db), "vocals_-10,5dB");
        assert_eq!(format_label(Stem::Drums, 0.0, LabelStyle::Db), "drums_0,0dB");
        assert_eq!(format_label(Stem::Vocals, 0.3, LabelStyle::Fraction), "vocals_0,30");
        assert_eq!(format_label(Stem::Bass, 1.25, LabelStyle::Fraction), "bass_1,25");
    }

    #[test]
    fn test_recipe_label_db() {
        let label = build_recipe_label(&default_recipe(), LabelStyle::Db);
        assert_eq!(
            label,
            " drums_0,0dB vocals_-10,5dB bass_-10,5dB other_-10,5dB"
        );
    }

    #[test]
    fn test_recipe_label_fraction() {
        let label = build_recipe_label(&default_recipe(), LabelStyle::Fraction);
        assert_eq!(label, " drums_1,00 vocals_0,30 bass_0,30 other_0,30");
    }

    #[test]
    fn test_recipe_label_is_deterministic() {
        let recipe = default_recipe();
        let first = build_recipe_label(&recipe, LabelStyle::Db);
        for _ in 0..10 {
            assert_eq!(build_recipe_label(&recipe, LabelStyle::Db), first);
        }
    }

    #[test]
    fn test_recipe_label_follows_recipe_order() {
        let recipe = MixRecipe::new(vec![(Stem::Other, 0.5), (Stem::Drums, 1.0)]).unwrap();
        assert_eq!(
            build_recipe_label(&recipe, LabelStyle::Fraction),
            " other_0,50 drums_1,00"
        );
    }
}
