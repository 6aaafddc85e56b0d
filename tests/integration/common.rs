use std::fs;
use std::path::{Path, PathBuf};

use textmatch::cli::{CommonArgs, MostSimilarArgs};
use textmatch::commands::RunSettings;
use textmatch::config::Config;

pub const BUDGET: &str = "Quarterly budget review covering marketing spend, payroll projections \
                          and infrastructure costs for the northern region.";
pub const GARDEN: &str = "Planting schedule: tomatoes, basil, peppers. Water seedlings daily \
                          and fertilize fortnightly.";
pub const ROCKET: &str = "Propellant mixture ratios, combustion chamber pressure, nozzle \
                          expansion and thrust measurements.";

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn common_args() -> CommonArgs {
    CommonArgs {
        threads: Some(2),
        ..CommonArgs::default()
    }
}

pub fn settings(common: &CommonArgs) -> RunSettings {
    RunSettings::resolve(&Config::default(), common)
}

pub fn most_similar_args(dir: &Path, csv: PathBuf, dedup: Option<Option<f64>>) -> MostSimilarArgs {
    MostSimilarArgs {
        directory: dir.to_path_buf(),
        dedup,
        output: Some(csv),
        common: common_args(),
    }
}
