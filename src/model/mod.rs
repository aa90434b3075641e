//! Model module - Application state and data types
//!
//! - `clip`: clip records and the songs page they arrive in
//! - `catalog`: HTTP client for the songs endpoint
//! - `artwork`: cover art loader and its cost-bounded cache
//! - `playback`: playback state published by the coordinator
//! - `types`: UI-facing types (catalog state, carousel, artwork state)
//! - `app_model`: main application model with state management methods

mod app_model;
mod artwork;
mod catalog;
mod clip;
mod playback;
mod types;

pub use app_model::AppModel;
pub use artwork::ArtworkLoader;
pub use catalog::CatalogClient;
pub use clip::Clip;
pub use playback::PlaybackState;
pub use types::{ArtworkState, ArtworkStatus, CatalogState, Carousel, UiState};
