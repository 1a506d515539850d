//! Gain arithmetic, mix recipes and stem overlay

pub mod gain;
pub mod mixer;
pub mod recipe;

pub use gain::{build_recipe_label, db_to_amplitude, format_label, fraction_to_db};
pub use mixer::{overlay, LoadedStem};
pub use recipe::{Gain, MixRecipe, StemGain};
