//! Use-Cases: Store-Mutationen, die Modi auslösen.

pub mod combine;
pub mod move_features;

pub use combine::{combine_selected, uncombine_selected, CombineOutcome};
pub use move_features::{move_coordinates, move_features};
