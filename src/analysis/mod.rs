//! The analysis run itself: load the three datasets, assemble the feature
//! matrix from the configured schema, leave-one-out evaluate, and report.

pub mod report;
pub mod visualization;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::data::matrix::{intersect, to_arrays, TargetVector};
use crate::data::metadata::{load_album_metadata, AlbumMetadata};
use crate::data::ratings::{load_peer_ratings, load_personal_ratings};
use crate::data::schema::{FeatureSchema, DEFAULT_DECADES, DEFAULT_GENRE_VOCABULARY};
use crate::data::FeatureMatrix;
use crate::error::{Error, Result};
use crate::eval::coefficients::{inspect_coefficients, ranked_by_magnitude, FeatureWeight};
use crate::eval::loo::{LooEvaluator, Predictions, DEFAULT_FILL_VALUE};
use crate::eval::metrics::{fit_quality, FitQuality};
use crate::model::{MeanBaseline, Model, Ridge};

use report::{rank_divergences, Divergence};

/// Default ridge regularization strength. A chosen hyperparameter, not a
/// tuned one.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Default number of divergent albums to report.
pub const DEFAULT_TOP_DIVERGENCES: usize = 10;

/// Everything one analysis run needs, gathered up front instead of spread
/// across module defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Personal ratings CSV (`album,rating`).
    pub ratings_csv: PathBuf,
    /// Peer ratings CSV (`album` plus one column per rater).
    pub peers_csv: PathBuf,
    /// Album metadata CSV (`album,genres,year`).
    pub metadata_csv: PathBuf,
    /// Ridge regularization strength.
    pub alpha: f64,
    /// Fill constant for missing feature entries.
    pub fill_value: f64,
    /// Genre tags turned into dummy features.
    pub genre_vocabulary: Vec<String>,
    /// Release decades turned into dummy features.
    pub decades: Vec<u32>,
    /// How many divergent albums to keep in the report.
    pub top_divergences: usize,
    /// Where to write plots; `None` skips plotting.
    pub plots_dir: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(
        ratings_csv: impl Into<PathBuf>,
        peers_csv: impl Into<PathBuf>,
        metadata_csv: impl Into<PathBuf>,
    ) -> Self {
        AnalysisConfig {
            ratings_csv: ratings_csv.into(),
            peers_csv: peers_csv.into(),
            metadata_csv: metadata_csv.into(),
            alpha: DEFAULT_ALPHA,
            fill_value: DEFAULT_FILL_VALUE,
            genre_vocabulary: DEFAULT_GENRE_VOCABULARY
                .iter()
                .map(|g| g.to_string())
                .collect(),
            decades: DEFAULT_DECADES.to_vec(),
            top_divergences: DEFAULT_TOP_DIVERGENCES,
            plots_dir: None,
        }
    }
}

/// The results of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Out-of-fold prediction per album.
    pub predictions: Predictions,
    /// Fit quality of the ridge model's out-of-fold predictions.
    pub quality: FitQuality,
    /// Fit quality of the mean baseline, as a floor for comparison.
    pub baseline_quality: FitQuality,
    /// Full-dataset fit weights, ranked by magnitude.
    pub weights: Vec<FeatureWeight>,
    /// Albums where prediction and rating diverge most.
    pub divergences: Vec<Divergence>,
    /// Number of albums that survived the key intersection.
    pub evaluated_albums: usize,
}

impl AnalysisOutcome {
    /// Prints the run summary.
    pub fn print(&self) {
        println!("Evaluated {} albums (leave-one-out)", self.evaluated_albums);
        println!(
            "  Ridge:    R-squared {:.4}, RMSE {:.4}",
            self.quality.r_squared, self.quality.rmse
        );
        println!(
            "  Baseline: R-squared {:.4}, RMSE {:.4}",
            self.baseline_quality.r_squared, self.baseline_quality.rmse
        );

        println!("Strongest feature weights:");
        for weight in self.weights.iter().take(DEFAULT_TOP_DIVERGENCES) {
            println!("  {:>8.3}  {}", weight.weight, weight.feature);
        }

        println!("Largest divergences (actual - predicted):");
        for d in &self.divergences {
            println!(
                "  {:>6.2}  {} (rated {:.1}, predicted {:.2})",
                d.residual(),
                d.album,
                d.actual,
                d.predicted
            );
        }
    }
}

/// Loads the three datasets and runs the full analysis.
pub fn run_rating_analysis(config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    log::info!("loading personal ratings from {:?}", config.ratings_csv);
    let target = load_personal_ratings(&config.ratings_csv)?;
    log::info!("loading peer ratings from {:?}", config.peers_csv);
    let peers = load_peer_ratings(&config.peers_csv)?;
    log::info!("loading album metadata from {:?}", config.metadata_csv);
    let metadata = load_album_metadata(&config.metadata_csv)?;

    run_with_inputs(&target, &peers, &metadata, config)
}

/// The analysis proper, on already-loaded inputs. Split from the file
/// loading so tests can drive it with in-memory data.
pub fn run_with_inputs(
    target: &TargetVector,
    peers: &FeatureMatrix,
    metadata: &BTreeMap<String, AlbumMetadata>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome> {
    let raters: Vec<String> = peers.columns().to_vec();
    let schema = FeatureSchema::for_analysis(&raters, &config.genre_vocabulary, &config.decades);
    let features = schema.build_matrix(peers, metadata)?;

    // Only albums present in every input take part in the evaluation.
    let (features, target) = intersect(&features, target);
    if target.is_empty() {
        return Err(Error::EmptyDataset);
    }
    log::info!(
        "{} albums, {} features after joining inputs",
        target.len(),
        features.columns().len()
    );

    let evaluator = LooEvaluator::new(config.fill_value);
    let model = Ridge::new(config.alpha);
    let predictions = evaluator.evaluate(&features, &target, &model)?;
    let quality = fit_quality(&predictions, &target)?;

    let baseline_predictions = evaluator.evaluate(&features, &target, &MeanBaseline::new())?;
    let baseline_quality = fit_quality(&baseline_predictions, &target)?;

    // Full-dataset fit for inference: which raters, genres and decades
    // pull the rating up or down.
    let filled = features.filled(config.fill_value);
    let keys: Vec<&str> = target.keys().collect();
    let (x, y) = to_arrays(&filled, &target, &keys)?;
    let fitted = model
        .fit(x.view(), y.view())
        .map_err(|e| Error::SingularFit {
            context: "full fit".to_string(),
            detail: e.to_string(),
        })?;
    let weights = ranked_by_magnitude(inspect_coefficients(&fitted, features.columns())?);

    let divergences = rank_divergences(&predictions, &target, config.top_divergences)?;

    if let Some(dir) = &config.plots_dir {
        std::fs::create_dir_all(dir)?;
        visualization::plot_predicted_vs_actual(
            &predictions,
            &target,
            &dir.join("predicted_vs_actual.png"),
        )?;
        visualization::plot_feature_weights(&weights, &dir.join("feature_weights.png"))?;
        log::info!("plots written to {dir:?}");
    }

    Ok(AnalysisOutcome {
        predictions,
        quality,
        baseline_quality,
        weights,
        divergences,
        evaluated_albums: target.len(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::metadata::parse_genres;

    /// Small synthetic collection where the rating tracks alice's score
    /// plus a rock bonus.
    fn fixture() -> (
        TargetVector,
        FeatureMatrix,
        BTreeMap<String, AlbumMetadata>,
    ) {
        let albums: &[(&str, f64, f64, &str, u32)] = &[
            // name, alice, bob, genres, year
            ("Blue Lines", 3.0, 2.0, "electronic, hip hop", 1991),
            ("Dummy", 4.0, 3.0, "electronic", 1994),
            ("Grace", 3.5, 4.0, "rock", 1994),
            ("Homogenic", 4.5, 3.0, "electronic, pop", 1997),
            ("In Rainbows", 5.0, 4.5, "rock", 2007),
            ("Kid A", 4.5, 4.0, "rock, electronic", 2000),
            ("Laughing Stock", 4.0, 2.5, "post-rock", 1991),
            ("Loveless", 5.0, 3.5, "rock", 1991),
        ];

        let mut peers = FeatureMatrix::new(vec!["alice".to_string(), "bob".to_string()]);
        let mut metadata = BTreeMap::new();
        let mut target = TargetVector::new();
        for &(name, alice, bob, genres, year) in albums {
            peers.insert_row(name, vec![alice, bob]).unwrap();
            metadata.insert(
                name.to_string(),
                AlbumMetadata {
                    genres: parse_genres(genres),
                    year,
                },
            );
            let rock_bonus = if genres.contains("rock") && !genres.contains("post-rock") {
                0.5
            } else {
                0.0
            };
            target.insert(name, (alice * 0.8 + rock_bonus + 0.5).min(5.0));
        }
        (target, peers, metadata)
    }

    fn config() -> AnalysisConfig {
        let mut config = AnalysisConfig::new("unused.csv", "unused.csv", "unused.csv");
        // A schema sized for the eight-album fixture; the full default
        // vocabulary would out-number the training rows.
        config.genre_vocabulary = vec![
            "rock".to_string(),
            "electronic".to_string(),
            "hip hop".to_string(),
        ];
        config.decades = vec![1990, 2000];
        config
    }

    #[test]
    fn end_to_end_run_produces_consistent_outcome() {
        let (target, peers, metadata) = fixture();
        let outcome = run_with_inputs(&target, &peers, &metadata, &config()).unwrap();

        assert_eq!(outcome.evaluated_albums, 8);
        assert_eq!(outcome.predictions.len(), 8);
        // Fewer albums than the report limit: everything is listed.
        assert_eq!(outcome.divergences.len(), 8);
        // The weight list covers the whole schema: 2 raters, 3 genre
        // dummies, 2 decade dummies.
        assert_eq!(outcome.weights.len(), 7);
        // The rating is mostly alice's score, so the model must beat the
        // mean baseline.
        assert!(outcome.quality.rmse < outcome.baseline_quality.rmse);
    }

    #[test]
    fn run_is_deterministic() {
        let (target, peers, metadata) = fixture();
        let first = run_with_inputs(&target, &peers, &metadata, &config()).unwrap();
        let second = run_with_inputs(&target, &peers, &metadata, &config()).unwrap();
        assert_eq!(first.predictions, second.predictions);
        assert_eq!(first.quality, second.quality);
        assert_eq!(first.weights, second.weights);
    }

    #[test]
    fn disjoint_inputs_are_an_empty_dataset() {
        let (_, peers, metadata) = fixture();
        let mut target = TargetVector::new();
        target.insert("Not In Collection", 3.0);
        let err = run_with_inputs(&target, &peers, &metadata, &config()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }
}
