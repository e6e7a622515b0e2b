//! Subcommand implementations.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use ridestat::{
    CsvExporter, DataLoader, Experiment, JsonReport, MarkdownReport, StudyConfig, StudyReport,
};

use crate::cli::{Args, OutputFormat, RunArgs};
use crate::output::{self, Palette};

pub fn summary(data: &Path, json: bool) -> Result<()> {
    let summary = DataLoader::new(data)
        .summary()
        .with_context(|| format!("failed to read data directory {}", data.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", output::render_summary(&summary, Palette::for_stdout()));
    }
    Ok(())
}

pub fn list(config: Option<&Path>) -> Result<()> {
    let configured = match config {
        Some(path) => load_config(path)?
            .experiments
            .iter()
            .map(Experiment::from_config)
            .collect(),
        None => Vec::new(),
    };
    print!(
        "{}",
        output::render_experiments(&Experiment::defaults(), &configured, Palette::for_stdout())
    );
    Ok(())
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = study_config(&args)?;
    let report = ridestat::run_study(&config, &args.experiments).context("study failed")?;

    match &args.output {
        Some(path) => {
            let rendered = render(&report, args.format, Palette::new(false))?;
            fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
        }
        None => {
            let rendered = render(&report, args.format, Palette::for_stdout())?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    if report.outcomes.is_empty() && !report.failures.is_empty() {
        bail!("all {} experiments failed", report.failures.len());
    }
    Ok(())
}

pub fn completions(shell: Shell) {
    let mut command = Args::command();
    clap_complete::generate(shell, &mut command, "ridestat", &mut io::stdout());
}

/// Merges command-line overrides into the study file (or defaults).
pub fn study_config(args: &RunArgs) -> Result<StudyConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => StudyConfig::new(),
    };

    if let Some(data) = &args.data {
        config = config.with_data_path(data);
    }
    if !args.months.is_empty() {
        config.data.months = args.months.clone();
    }
    if let Some(n) = args.sample_size {
        config = config.with_sample_size(n);
    }
    if let Some(alpha) = args.alpha {
        config = config.with_alpha(alpha);
    }
    if let Some(correction) = args.correction {
        config = config.with_correction(correction);
    }
    if let Some(resamples) = args.bootstrap {
        let mut bootstrap = config
            .analysis
            .bootstrap
            .clone()
            .unwrap_or_default()
            .with_resamples(resamples);
        if let Some(seed) = args.seed {
            bootstrap = bootstrap.with_seed(seed);
        }
        config = config.with_bootstrap(bootstrap);
    }

    Ok(config)
}

fn load_config(path: &Path) -> Result<StudyConfig> {
    StudyConfig::load(path).with_context(|| format!("failed to load study file {}", path.display()))
}

fn render(report: &StudyReport, format: OutputFormat, palette: Palette) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => output::render_report(report, palette),
        OutputFormat::Markdown => MarkdownReport::to_string(report),
        OutputFormat::Csv => CsvExporter::to_string(report)?,
        OutputFormat::Json => JsonReport::to_string(report)? + "\n",
    })
}
