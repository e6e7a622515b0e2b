//! Report generation for study results.

use std::fmt::{self, Write as _};
use std::fs;
use std::io::Write;
use std::path::Path;

use ridestat_engine::{ExperimentOutcome, StudyReport};
use serde::Serialize;

use crate::error::Result;

/// One CSV row per evaluated experiment.
#[derive(Serialize)]
struct CsvRow<'a> {
    experiment: &'a str,
    treatment: &'a str,
    control: &'a str,
    unit: String,
    treatment_units: usize,
    control_units: usize,
    treatment_pickups: u64,
    control_pickups: u64,
    treatment_mean: f64,
    control_mean: f64,
    mean_difference: f64,
    statistic: f64,
    df: f64,
    p_value: f64,
    adjusted_p_value: Option<f64>,
    ci_lower: f64,
    ci_upper: f64,
    cohens_d: f64,
    hedges_g: f64,
    relative_lift: Option<f64>,
    power: f64,
    required_units: Option<usize>,
    significant: bool,
}

impl<'a> From<&'a ExperimentOutcome> for CsvRow<'a> {
    fn from(o: &'a ExperimentOutcome) -> Self {
        Self {
            experiment: &o.name,
            treatment: &o.treatment_label,
            control: &o.control_label,
            unit: o.unit.to_string(),
            treatment_units: o.treatment.n,
            control_units: o.control.n,
            treatment_pickups: o.treatment_pickups,
            control_pickups: o.control_pickups,
            treatment_mean: o.treatment.mean,
            control_mean: o.control.mean,
            mean_difference: o.test.mean_difference,
            statistic: o.test.statistic,
            df: o.test.df,
            p_value: o.test.p_value,
            adjusted_p_value: o.adjusted_p_value,
            ci_lower: o.test.confidence_interval.lower,
            ci_upper: o.test.confidence_interval.upper,
            cohens_d: o.effect.cohens_d,
            hedges_g: o.effect.hedges_g,
            relative_lift: o.effect.relative_lift,
            power: o.power,
            required_units: o.required_units,
            significant: o.significant,
        }
    }
}

/// CSV exporter for study results.
///
/// One row per evaluated experiment; failed experiments are omitted.
/// Missing values (no correction, zero baseline) are empty fields.
pub struct CsvExporter;

impl CsvExporter {
    /// Exports a study report to a CSV string.
    pub fn to_string(report: &StudyReport) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write(report, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Exports a study report to a CSV file.
    pub fn to_file(report: &StudyReport, path: impl AsRef<Path>) -> Result<()> {
        let file = fs::File::create(path)?;
        Self::write(report, file)
    }

    /// Writes a study report as CSV to a writer.
    pub fn write<W: Write>(report: &StudyReport, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for outcome in &report.outcomes {
            csv.serialize(CsvRow::from(outcome))?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Markdown report generator.
///
/// Generates a summary table across experiments, a detail section per
/// experiment and a list of failures.
pub struct MarkdownReport;

impl MarkdownReport {
    /// Generates a Markdown report string.
    pub fn to_string(report: &StudyReport) -> String {
        let mut output = String::new();
        // Writing to a String cannot fail.
        let _ = Self::render(report, &mut output);
        output
    }

    /// Writes a Markdown report to a file.
    pub fn to_file(report: &StudyReport, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, Self::to_string(report))?;
        Ok(())
    }

    /// Writes a Markdown report to a writer.
    pub fn write<W: Write>(report: &StudyReport, mut writer: W) -> Result<()> {
        writer.write_all(Self::to_string(report).as_bytes())?;
        Ok(())
    }

    fn render(report: &StudyReport, output: &mut String) -> fmt::Result {
        writeln!(output, "# Study Report")?;
        writeln!(output)?;

        writeln!(output, "- **Alpha**: {}", report.alpha)?;
        writeln!(output, "- **Correction**: {}", report.correction)?;
        writeln!(output, "- **Experiments**: {}", report.outcomes.len() + report.failures.len())?;
        writeln!(output, "- **Significant**: {}", report.significant_count())?;
        writeln!(output, "- **Records scanned**: {}", report.statistics.records_scanned)?;
        writeln!(output)?;

        writeln!(output, "## Summary")?;
        writeln!(output)?;
        if report.outcomes.is_empty() {
            writeln!(output, "*No experiments completed.*")?;
        } else {
            writeln!(
                output,
                "| Experiment | Treatment | Control | Difference | t | p-value | Adjusted p | Cohen's d | Significant |"
            )?;
            writeln!(
                output,
                "|------------|-----------|---------|------------|---|---------|------------|-----------|-------------|"
            )?;
            for o in &report.outcomes {
                writeln!(
                    output,
                    "| {} | {} | {} | {:.2} | {:.3} | {} | {} | {:.3} | {} |",
                    o.name,
                    o.treatment_label,
                    o.control_label,
                    o.test.mean_difference,
                    o.test.statistic,
                    format_p(o.test.p_value),
                    o.adjusted_p_value.map(format_p).unwrap_or_else(|| "-".to_string()),
                    o.effect.cohens_d,
                    if o.significant { "yes" } else { "no" },
                )?;
            }
        }
        writeln!(output)?;

        for o in &report.outcomes {
            Self::render_outcome(o, output)?;
        }

        if !report.failures.is_empty() {
            writeln!(output, "## Failures")?;
            writeln!(output)?;
            for failure in &report.failures {
                writeln!(output, "- **{}**: {}", failure.name, failure.error)?;
            }
            writeln!(output)?;
        }

        Ok(())
    }

    fn render_outcome(o: &ExperimentOutcome, output: &mut String) -> fmt::Result {
        writeln!(output, "## {}", o.name)?;
        writeln!(output)?;
        writeln!(output, "Pickups per {} unit.", o.unit)?;
        writeln!(output)?;
        writeln!(output, "| Cohort | Units | Pickups | Mean | Std Dev | Median |")?;
        writeln!(output, "|--------|-------|---------|------|---------|--------|")?;
        for (label, pickups, s) in [
            (&o.treatment_label, o.treatment_pickups, &o.treatment),
            (&o.control_label, o.control_pickups, &o.control),
        ] {
            writeln!(
                output,
                "| {} | {} | {} | {:.2} | {:.2} | {:.2} |",
                label, s.n, pickups, s.mean, s.std_dev, s.median
            )?;
        }
        writeln!(output)?;

        let ci = &o.test.confidence_interval;
        writeln!(output, "| Metric | Value |")?;
        writeln!(output, "|--------|-------|")?;
        writeln!(output, "| Test | {} ({}) |", test_name(o), o.test.alternative)?;
        writeln!(output, "| t statistic | {:.4} |", o.test.statistic)?;
        writeln!(output, "| Degrees of freedom | {:.2} |", o.test.df)?;
        writeln!(output, "| p-value | {} |", format_p(o.test.p_value))?;
        if let Some(adjusted) = o.adjusted_p_value {
            writeln!(output, "| Adjusted p-value | {} |", format_p(adjusted))?;
        }
        writeln!(
            output,
            "| {:.0}% CI | [{:.2}, {:.2}] |",
            ci.level * 100.0,
            ci.lower,
            ci.upper
        )?;
        if let Some(b) = &o.bootstrap {
            writeln!(
                output,
                "| Bootstrap {:.0}% CI | [{:.2}, {:.2}] |",
                b.confidence * 100.0,
                b.lower,
                b.upper
            )?;
        }
        writeln!(output, "| Cohen's d | {:.3} |", o.effect.cohens_d)?;
        writeln!(output, "| Hedges' g | {:.3} |", o.effect.hedges_g)?;
        match o.effect.relative_lift {
            Some(lift) => writeln!(output, "| Relative lift | {:.2}% |", lift * 100.0)?,
            None => writeln!(output, "| Relative lift | - |")?,
        }
        writeln!(output, "| Power | {:.3} |", o.power)?;
        if let Some(n) = o.required_units {
            writeln!(output, "| Units needed per group | {} |", n)?;
        }
        writeln!(output)?;
        Ok(())
    }
}

fn test_name(o: &ExperimentOutcome) -> String {
    match o.test.kind {
        Some(kind) => format!("{kind} t-test"),
        None => "t-test".to_string(),
    }
}

fn format_p(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

/// JSON export of the full study report.
///
/// For one-sided tests the open confidence bound is infinite and appears as
/// `null` in the output.
pub struct JsonReport;

impl JsonReport {
    /// Serializes a study report to pretty-printed JSON.
    pub fn to_string(report: &StudyReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Writes a JSON report to a file.
    pub fn to_file(report: &StudyReport, path: impl AsRef<Path>) -> Result<()> {
        let file = fs::File::create(path)?;
        Self::write(report, file)
    }

    /// Writes a JSON report to a writer.
    pub fn write<W: Write>(report: &StudyReport, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, report)?;
        Ok(())
    }
}
