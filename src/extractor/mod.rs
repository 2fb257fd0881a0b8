pub mod hybrid;
pub mod models;
pub mod native;
pub mod traits;

pub use hybrid::HybridExtractor;
pub use models::{Format, MediaInfo};
pub use native::{AudiomackExtractor, SpotifyExtractor};
pub use traits::Extractor;
