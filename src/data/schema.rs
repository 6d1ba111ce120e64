use std::collections::BTreeMap;

use crate::data::matrix::FeatureMatrix;
use crate::data::metadata::AlbumMetadata;
use crate::error::{Error, Result};

/// Default genre vocabulary turned into dummy features when the config
/// does not supply one.
pub const DEFAULT_GENRE_VOCABULARY: [&str; 12] = [
    "ambient",
    "electronic",
    "folk",
    "hip hop",
    "indie",
    "jazz",
    "metal",
    "pop",
    "post-rock",
    "punk",
    "rock",
    "soul",
];

/// Default release decades turned into dummy features.
pub const DEFAULT_DECADES: [u32; 7] = [1960, 1970, 1980, 1990, 2000, 2010, 2020];

/// One named numeric feature extractor.
///
/// The feature set is an explicit, ordered list decided at configuration
/// time, never discovered from whatever columns a frame happens to hold at
/// run time, so column meaning and order are testable in isolation from
/// any dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// A peer's score for the album; `NaN` when the peer never rated it.
    PeerRating(String),
    /// 0/1: the album's genre tags contain this tag.
    Genre(String),
    /// 0/1: the album was released in this decade.
    Decade(u32),
}

impl Feature {
    /// Stable column name, usable in reports and plot labels.
    pub fn name(&self) -> String {
        match self {
            Feature::PeerRating(rater) => format!("peer_{}", sanitize(rater)),
            Feature::Genre(tag) => format!("genre_{}", sanitize(tag)),
            Feature::Decade(decade) => format!("decade_{decade}s"),
        }
    }
}

fn sanitize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(|c: char| c.is_whitespace(), "_")
}

/// An ordered list of feature extractors.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    features: Vec<Feature>,
}

impl FeatureSchema {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureSchema { features }
    }

    /// The usual analysis schema: every peer, then genre dummies, then
    /// decade dummies, in the given order.
    pub fn for_analysis(
        raters: &[String],
        genre_vocabulary: &[String],
        decades: &[u32],
    ) -> Self {
        let mut features = Vec::with_capacity(raters.len() + genre_vocabulary.len() + decades.len());
        features.extend(raters.iter().map(|r| Feature::PeerRating(r.clone())));
        features.extend(
            genre_vocabulary
                .iter()
                .map(|g| Feature::Genre(g.trim().to_lowercase())),
        );
        features.extend(decades.iter().map(|&d| Feature::Decade(d)));
        FeatureSchema { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Assembles the feature matrix for every album present in BOTH the
    /// peer ratings and the metadata, in schema column order.
    ///
    /// # Errors
    /// `KeyMismatch` if the schema names a rater the peer dataset does not
    /// have — a configured rater silently producing all-missing values
    /// would be indistinguishable from a peer who rated nothing.
    pub fn build_matrix(
        &self,
        peers: &FeatureMatrix,
        metadata: &BTreeMap<String, AlbumMetadata>,
    ) -> Result<FeatureMatrix> {
        // Resolve rater names to peer columns up front.
        let mut rater_index = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            if let Feature::PeerRating(rater) = feature {
                let index = peers
                    .columns()
                    .iter()
                    .position(|c| c == rater)
                    .ok_or_else(|| Error::KeyMismatch {
                        entity: format!("rater '{rater}'"),
                    })?;
                rater_index.push(Some(index));
            } else {
                rater_index.push(None);
            }
        }

        let mut matrix = FeatureMatrix::new(self.column_names());
        for (album, meta) in metadata {
            let Some(peer_row) = peers.row(album) else {
                continue;
            };
            let row = self
                .features
                .iter()
                .zip(rater_index.iter())
                .map(|(feature, index)| match feature {
                    Feature::PeerRating(_) => peer_row[index.expect("resolved above")],
                    Feature::Genre(tag) => {
                        if meta.has_genre(tag) {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    Feature::Decade(decade) => {
                        if meta.decade() == *decade {
                            1.0
                        } else {
                            0.0
                        }
                    }
                })
                .collect();
            matrix.insert_row(album.clone(), row)?;
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::metadata::parse_genres;

    fn peers() -> FeatureMatrix {
        let mut m = FeatureMatrix::new(vec!["alice".to_string(), "bob".to_string()]);
        m.insert_row("Loveless", vec![4.0, f64::NAN]).unwrap();
        m.insert_row("Spiderland", vec![5.0, 2.0]).unwrap();
        m.insert_row("Unknown Pleasures", vec![3.0, 3.0]).unwrap();
        m
    }

    fn metadata() -> BTreeMap<String, AlbumMetadata> {
        let mut md = BTreeMap::new();
        md.insert(
            "Loveless".to_string(),
            AlbumMetadata {
                genres: parse_genres("Shoegaze, Rock"),
                year: 1991,
            },
        );
        md.insert(
            "Spiderland".to_string(),
            AlbumMetadata {
                genres: parse_genres("Post-Rock"),
                year: 1991,
            },
        );
        // No metadata for Unknown Pleasures: it must drop out.
        md
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            Feature::PeerRating("alice".to_string()),
            Feature::PeerRating("bob".to_string()),
            Feature::Genre("rock".to_string()),
            Feature::Decade(1990),
            Feature::Decade(1980),
        ])
    }

    #[test]
    fn column_names_are_stable_and_ordered() {
        assert_eq!(
            schema().column_names(),
            vec![
                "peer_alice",
                "peer_bob",
                "genre_rock",
                "decade_1990s",
                "decade_1980s"
            ]
        );
        assert_eq!(Feature::Genre("hip hop".to_string()).name(), "genre_hip_hop");
    }

    #[test]
    fn build_matrix_encodes_dummies_and_keeps_missing_peers() {
        let matrix = schema().build_matrix(&peers(), &metadata()).unwrap();

        let loveless = matrix.row("Loveless").unwrap();
        assert_eq!(loveless[0], 4.0);
        assert!(loveless[1].is_nan());
        assert_eq!(&loveless[2..], &[1.0, 1.0, 0.0]);

        let spiderland = matrix.row("Spiderland").unwrap();
        assert_eq!(&spiderland[2..], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn build_matrix_intersects_album_sets() {
        let matrix = schema().build_matrix(&peers(), &metadata()).unwrap();
        let albums: Vec<&str> = matrix.keys().collect();
        assert_eq!(albums, vec!["Loveless", "Spiderland"]);
    }

    #[test]
    fn unknown_rater_in_schema_fails_fast() {
        let schema = FeatureSchema::new(vec![Feature::PeerRating("carol".to_string())]);
        let err = schema.build_matrix(&peers(), &metadata()).unwrap_err();
        assert!(matches!(err, Error::KeyMismatch { entity } if entity.contains("carol")));
    }

    #[test]
    fn for_analysis_orders_peers_then_genres_then_decades() {
        let schema = FeatureSchema::for_analysis(
            &["alice".to_string()],
            &["Rock".to_string()],
            &[1990],
        );
        assert_eq!(
            schema.features(),
            &[
                Feature::PeerRating("alice".to_string()),
                Feature::Genre("rock".to_string()),
                Feature::Decade(1990),
            ]
        );
    }
}
