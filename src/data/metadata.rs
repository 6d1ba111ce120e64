use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::Result;

/// A single row of the metadata file: `album,genres,year`.
#[derive(Debug, Deserialize)]
struct MetadataRecord {
    album: String,
    genres: String,
    year: u32,
}

/// Cleaned metadata for one album.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumMetadata {
    /// Normalized genre tags: trimmed, lowercased, empties dropped.
    pub genres: Vec<String>,
    pub year: u32,
}

impl AlbumMetadata {
    pub fn has_genre(&self, tag: &str) -> bool {
        self.genres.iter().any(|g| g == tag)
    }

    pub fn decade(&self) -> u32 {
        decade_of(self.year)
    }
}

/// Buckets a release year into its decade (1994 -> 1990).
pub fn decade_of(year: u32) -> u32 {
    year - year % 10
}

/// Splits a free-text genre field into normalized tags.
pub fn parse_genres(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Reads the album metadata dataset from any reader.
pub fn read_album_metadata<R: Read>(reader: R) -> Result<BTreeMap<String, AlbumMetadata>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut metadata = BTreeMap::new();
    for result in rdr.deserialize() {
        let record: MetadataRecord = result?;
        metadata.insert(
            record.album,
            AlbumMetadata {
                genres: parse_genres(&record.genres),
                year: record.year,
            },
        );
    }
    Ok(metadata)
}

/// Loads the album metadata CSV from disk.
pub fn load_album_metadata(path: impl AsRef<Path>) -> Result<BTreeMap<String, AlbumMetadata>> {
    read_album_metadata(File::open(path)?)
}
