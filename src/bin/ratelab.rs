use std::path::PathBuf;

use clap::Parser;

use ratelab::analysis::{run_rating_analysis, AnalysisConfig};

/// Leave-one-out analysis of a personal album-rating collection.
#[derive(Debug, Parser)]
#[command(name = "ratelab", version)]
struct Args {
    /// Personal ratings CSV (album,rating)
    ratings: PathBuf,

    /// Peer ratings CSV (album plus one column per rater)
    peers: PathBuf,

    /// Album metadata CSV (album,genres,year)
    metadata: PathBuf,

    /// Ridge regularization strength
    #[arg(long, default_value_t = ratelab::analysis::DEFAULT_ALPHA)]
    alpha: f64,

    /// Fill constant for unrated peer entries
    #[arg(long, default_value_t = ratelab::eval::DEFAULT_FILL_VALUE)]
    fill: f64,

    /// Comma-separated genre vocabulary (defaults to a built-in list)
    #[arg(long)]
    genres: Option<String>,

    /// Number of divergent albums to report
    #[arg(long, default_value_t = ratelab::analysis::DEFAULT_TOP_DIVERGENCES)]
    top: usize,

    /// Directory for output plots (omit to skip plotting)
    #[arg(long)]
    plots: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = AnalysisConfig::new(args.ratings, args.peers, args.metadata);
    config.alpha = args.alpha;
    config.fill_value = args.fill;
    config.top_divergences = args.top;
    config.plots_dir = args.plots;
    if let Some(genres) = args.genres {
        config.genre_vocabulary = genres
            .split(',')
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
    }

    match run_rating_analysis(&config) {
        Ok(outcome) => outcome.print(),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
