//! Mix recipes: which stems go into a mix, at which gain, in which order

use super::gain::fraction_to_db;
use crate::error::{Result, StemmixError};
use crate::types::Stem;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A validated linear gain fraction (always finite and > 0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain(f64);

impl Gain {
    /// Validate a gain fraction for `stem`
    pub fn new(stem: Stem, fraction: f64) -> Result<Self> {
        fraction_to_db(fraction).map_err(|_| StemmixError::InvalidGain {
            stem: Some(stem),
            value: fraction,
        })?;
        Ok(Self(fraction))
    }

    /// Unity gain (0 dB)
    pub fn unity() -> Self {
        Self(1.0)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Gain in decibels
    pub fn db(self) -> f64 {
        20.0 * self.0.log10()
    }
}

/// One recipe line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemGain {
    pub stem: Stem,
    pub gain: Gain,
}

/// Ordered stem -> gain mapping.
///
/// The order is the order the stems were given in. It drives both the overlay
/// sequence and the file-name label, so it never depends on hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct MixRecipe {
    entries: Vec<StemGain>,
}

impl MixRecipe {
    /// Build a recipe, rejecting empty recipes, repeated stems and invalid gains
    pub fn new(entries: Vec<(Stem, f64)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(StemmixError::ConfigError(
                "Mix recipe must contain at least one stem".to_string(),
            ));
        }

        let mut validated: Vec<StemGain> = Vec::with_capacity(entries.len());
        for (stem, fraction) in entries {
            if validated.iter().any(|e| e.stem == stem) {
                return Err(StemmixError::ConfigError(format!(
                    "Stem '{}' appears more than once in the mix recipe",
                    stem
                )));
            }
            validated.push(StemGain {
                stem,
                gain: Gain::new(stem, fraction)?,
            });
        }

        Ok(Self { entries: validated })
    }

    /// Every stem at unity gain, in the declared stem order
    pub fn unity() -> Self {
        Self {
            entries: Stem::ALL
                .iter()
                .map(|&stem| StemGain {
                    stem,
                    gain: Gain::unity(),
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StemGain> {
        self.entries.iter()
    }

    /// Stems in recipe order
    pub fn stems(&self) -> Vec<Stem> {
        self.entries.iter().map(|e| e.stem).collect()
    }

    /// Gain for a stem, if the recipe uses it
    pub fn gain(&self, stem: Stem) -> Option<Gain> {
        self.entries.iter().find(|e| e.stem == stem).map(|e| e.gain)
    }
}

/// Serialized as an ordered `{"drums": 1.0, ...}` map
impl Serialize for MixRecipe {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.stem.name(), &entry.gain.fraction())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_keeps_given_order() {
        let recipe = MixRecipe::new(vec![
            (Stem::Bass, 0.5),
            (Stem::Drums, 1.0),
            (Stem::Vocals, 0.1),
        ])
        .unwrap();
        assert_eq!(recipe.stems(), vec![Stem::Bass, Stem::Drums, Stem::Vocals]);
        assert_eq!(recipe.gain(Stem::Vocals).map(Gain::fraction), Some(0.1));
        assert_eq!(recipe.gain(Stem::Other), None);
    }

    #[test]
    fn test_recipe_rejects_bad_gain_at_construction() {
        let err = MixRecipe::new(vec![(Stem::Drums, 1.0), (Stem::Vocals, 0.0)]).unwrap_err();
        match err {
            StemmixError::InvalidGain { stem, value } => {
                assert_eq!(stem, Some(Stem::Vocals));
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(MixRecipe::new(vec![(Stem::Bass, -0.5)]).is_err());
    }

    #[test]
    fn test_recipe_rejects_duplicates_and_empty() {
        assert!(MixRecipe::new(vec![(Stem::Drums, 1.0), (Stem::Drums, 0.5)]).is_err());
        assert!(MixRecipe::new(Vec::new()).is_err());
    }

    #[test]
    fn test_amplifying_gain_is_allowed() {
        let gain = Gain::new(Stem::Drums, 2.0).unwrap();
        assert!(gain.db() > 6.0);
    }

    #[test]
    fn test_recipe_serializes_as_ordered_map() {
        let recipe = MixRecipe::new(vec![(Stem::Vocals, 0.3), (Stem::Drums, 1.0)]).unwrap();
        let json = serde_json::to_string(&recipe).unwrap();
        assert_eq!(json, r#"{"vocals":0.3,"drums":1.0}"#);
    }

    #[test]
    fn test_unity_recipe_covers_all_stems() {
        let recipe = MixRecipe::unity();
        assert_eq!(recipe.stems(), Stem::ALL.to_vec());
        assert!(recipe.iter().all(|e| e.gain.db() == 0.0));
    }
}
