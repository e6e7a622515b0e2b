//! Study entry point that hides loading and wiring.

use ridestat_config::{DataConfig, StudyConfig};
use ridestat_data::{DataLoader, Dataset};
use ridestat_engine::{Experiment, ExperimentOutcome, Result, StudyReport, StudyRunner};
use tokio::sync::mpsc;
use tracing::info;

/// Resolves the experiments a study should run.
///
/// Named experiments are looked up in the study file first, then among the
/// built-ins. Without names every configured experiment runs, and a study
/// file with no experiments falls back to [`Experiment::defaults`].
pub fn experiments_for(config: &StudyConfig, names: &[String]) -> Result<Vec<Experiment>> {
    if !names.is_empty() {
        return Experiment::select(&config.experiments, names);
    }
    if config.experiments.is_empty() {
        return Ok(Experiment::defaults());
    }
    Ok(config.experiments.iter().map(Experiment::from_config).collect())
}

/// Loads the pickups described by `config`.
pub fn load_dataset(config: &DataConfig) -> Result<Dataset> {
    let dataset = DataLoader::new(&config.path).load(&config.load_options())?;
    info!(
        records = dataset.len() as u64,
        files = dataset.sources().len() as u64,
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Validates `config`, loads its data and runs the selected experiments.
///
/// # Errors
///
/// Fails on an invalid configuration, an unknown experiment name or a data
/// directory with no loadable files. Experiments that fail individually are
/// reported in [`StudyReport::failures`].
pub fn run_study(config: &StudyConfig, names: &[String]) -> Result<StudyReport> {
    let (sender, _receiver) = mpsc::unbounded_channel();
    run_study_with_channel(config, names, sender)
}

/// Like [`run_study`], also streaming each outcome as it completes.
pub fn run_study_with_channel(
    config: &StudyConfig,
    names: &[String],
    sender: mpsc::UnboundedSender<ExperimentOutcome>,
) -> Result<StudyReport> {
    #[cfg(feature = "console")]
    ridestat_console::init();

    config.validate()?;
    let experiments = experiments_for(config, names)?;
    let dataset = load_dataset(&config.data)?;

    Ok(StudyRunner::new(config.analysis.clone()).run_with_channel(&dataset, &experiments, sender))
}
