use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use crate::data::matrix::{FeatureMatrix, TargetVector};
use crate::error::{Error, Result};

/// Rating scale bounds shared by the personal and peer datasets.
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// A single row of the personal ratings file: `album,rating`.
#[derive(Debug, Deserialize)]
struct RatingRecord {
    album: String,
    rating: f64,
}

/// Reads the personal ratings dataset from any reader.
///
/// Out-of-range ratings are rejected; a rating of exactly the bounds is
/// fine.
pub fn read_personal_ratings<R: Read>(reader: R) -> Result<TargetVector> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut target = TargetVector::new();
    for result in rdr.deserialize() {
        let record: RatingRecord = result?;
        check_rating_bounds(&record.album, "rating", record.rating)?;
        target.insert(record.album, record.rating);
    }
    Ok(target)
}

/// Loads the personal ratings CSV from disk.
pub fn load_personal_ratings(path: impl AsRef<Path>) -> Result<TargetVector> {
    read_personal_ratings(File::open(path)?)
}

/// Reads the peer ratings dataset from any reader.
///
/// The header is `album,<rater>,<rater>,...` with one numeric column per
/// rater; the rater set is whatever the file declares, so rows are parsed
/// by position rather than into a fixed record type. An empty cell (or
/// `-`) means the peer never rated that album and becomes `NaN`, to be
/// replaced by the evaluator's fill value later.
pub fn read_peer_ratings<R: Read>(reader: R) -> Result<FeatureMatrix> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let raters: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

    let mut matrix = FeatureMatrix::new(raters.clone());
    for result in rdr.records() {
        let record = result?;
        let album = record.get(0).unwrap_or("").to_string();
        let mut row = Vec::with_capacity(raters.len());
        for (rater, cell) in raters.iter().zip(record.iter().skip(1)) {
            let cell = cell.trim();
            if cell.is_empty() || cell == "-" {
                row.push(f64::NAN);
                continue;
            }
            let value: f64 = cell.parse().map_err(|_| Error::InvalidValue {
                entity: album.clone(),
                column: rater.clone(),
                value: cell.to_string(),
                reason: "not a number".to_string(),
            })?;
            check_rating_bounds(&album, rater, value)?;
            row.push(value);
        }
        if row.len() != raters.len() {
            return Err(Error::FeatureCountMismatch {
                expected: raters.len(),
                found: row.len(),
            });
        }
        matrix.insert_row(album, row)?;
    }
    Ok(matrix)
}

/// Loads the peer ratings CSV from disk.
pub fn load_peer_ratings(path: impl AsRef<Path>) -> Result<FeatureMatrix> {
    read_peer_ratings(File::open(path)?)
}

fn check_rating_bounds(entity: &str, column: &str, value: f64) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(Error::InvalidValue {
            entity: entity.to_string(),
            column: column.to_string(),
            value: value.to_string(),
            reason: format!("outside the {MIN_RATING}..{MAX_RATING} rating scale"),
        });
    }
    Ok(())
}
