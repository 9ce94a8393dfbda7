pub mod filesystem;
pub mod ids;
pub mod traits;

pub use filesystem::FsBlobStore;
pub use ids::IdStrategy;
pub use traits::BlobStore;
