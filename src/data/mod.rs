pub mod matrix;
pub mod metadata;
pub mod ratings;
pub mod schema;

pub use matrix::{intersect, FeatureMatrix, TargetVector};
pub use metadata::{load_album_metadata, AlbumMetadata};
pub use ratings::{load_peer_ratings, load_personal_ratings};
pub use schema::{Feature, FeatureSchema};
