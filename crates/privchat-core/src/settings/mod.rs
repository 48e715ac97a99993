//! Settings domain module.
//!
//! - `model`: Persisted user settings (`Settings`, `FeatureToggles`)
//! - `theme`: Light/dark preference (`Theme`)

mod model;
mod theme;

pub use model::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, FeatureToggles, Settings,
};
pub use theme::Theme;
