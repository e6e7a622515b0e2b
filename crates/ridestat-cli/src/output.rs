//! Human-readable terminal output.

use std::fmt::Write as _;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use ridestat::{DatasetSummary, Experiment, ExperimentOutcome, StudyReport};

/// Applies colors only when writing to a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colors for stdout unless it is redirected or `NO_COLOR` is set.
    pub fn for_stdout() -> Self {
        use std::io::IsTerminal;
        Self::new(std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal())
    }

    fn title(&self, s: &str) -> String {
        if self.color {
            s.bright_white().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn good(&self, s: &str) -> String {
        if self.color {
            s.bright_green().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn bad(&self, s: &str) -> String {
        if self.color {
            s.bright_red().to_string()
        } else {
            s.to_string()
        }
    }

    fn number(&self, s: &str) -> String {
        if self.color {
            s.bright_yellow().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.color {
            s.bright_black().to_string()
        } else {
            s.to_string()
        }
    }
}

pub fn render_report(report: &StudyReport, palette: Palette) -> String {
    let mut out = String::new();
    let total = report.outcomes.len() + report.failures.len();

    let _ = writeln!(
        out,
        "{} │ {} experiments │ {} significant │ α = {} │ correction {}",
        palette.title("Study"),
        palette.number(&total.to_string()),
        palette.number(&report.significant_count().to_string()),
        report.alpha,
        report.correction,
    );

    for outcome in &report.outcomes {
        out.push('\n');
        render_outcome(&mut out, outcome, palette);
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "\n{}", palette.title("Failures"));
        for failure in &report.failures {
            let _ = writeln!(out, "  {}: {}", failure.name, palette.bad(&failure.error.to_string()));
        }
    }

    out
}

fn render_outcome(out: &mut String, o: &ExperimentOutcome, palette: Palette) {
    let _ = writeln!(
        out,
        "{}  {} vs {} {}",
        palette.title(&o.name),
        o.treatment_label,
        o.control_label,
        palette.dim(&format!("(per {})", o.unit)),
    );

    for (role, pickups, s) in [
        ("treatment", o.treatment_pickups, &o.treatment),
        ("control", o.control_pickups, &o.control),
    ] {
        let _ = writeln!(
            out,
            "  {:<11}{:>5} units │ {:>12} pickups │ mean {:.2} │ sd {:.2}",
            role,
            s.n,
            pickups.to_formatted_string(&Locale::en),
            s.mean,
            s.std_dev,
        );
    }

    let ci = &o.test.confidence_interval;
    let mut line = format!(
        "  {:<11}{:+.2} │ {:.0}% CI [{:.2}, {:.2}] │ t = {:.3} │ df = {:.1} │ p = {}",
        "difference",
        o.test.mean_difference,
        ci.level * 100.0,
        ci.lower,
        ci.upper,
        o.test.statistic,
        o.test.df,
        format_p(o.test.p_value),
    );
    if let Some(adjusted) = o.adjusted_p_value {
        let _ = write!(line, " (adjusted {})", format_p(adjusted));
    }
    let _ = writeln!(out, "{line}");

    if let Some(b) = &o.bootstrap {
        let _ = writeln!(
            out,
            "  {:<11}{:.0}% CI [{:.2}, {:.2}] from {} resamples",
            "bootstrap",
            b.confidence * 100.0,
            b.lower,
            b.upper,
            b.resamples.to_formatted_string(&Locale::en),
        );
    }

    let lift = o
        .effect
        .relative_lift
        .map(|l| format!("{:+.1}%", l * 100.0))
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "  {:<11}d = {:.3} │ g = {:.3} │ lift {}",
        "effect", o.effect.cohens_d, o.effect.hedges_g, lift,
    );

    let needed = o
        .required_units
        .map(|n| format!(" │ {} units per group needed", n))
        .unwrap_or_default();
    let _ = writeln!(out, "  {:<11}{:.3}{}", "power", o.power, needed);

    let verdict = if o.significant {
        palette.good("significant")
    } else {
        palette.dim("not significant")
    };
    let _ = writeln!(out, "  {:<11}{} at α = {}", "result", verdict, o.alpha);
}

pub fn render_summary(summary: &DatasetSummary, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.title("Ride files"));
    for (service, details) in &summary.file_details {
        let _ = writeln!(
            out,
            "  {:<24}{:>12} rows │ {:>8.2} MB",
            service,
            details.rows.to_formatted_string(&Locale::en),
            details.size_mb,
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{summary}");
    out
}

pub fn render_experiments(builtin: &[Experiment], configured: &[Experiment], palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.title("Built-in experiments"));
    for e in builtin {
        render_experiment_line(&mut out, e, palette);
    }
    let _ = writeln!(
        out,
        "  {:<22}{}",
        "rainy_clear",
        palette.dim("Rainy days vs Clear days (dates from a study file)")
    );

    if !configured.is_empty() {
        let _ = writeln!(out, "\n{}", palette.title("Study experiments"));
        for e in configured {
            render_experiment_line(&mut out, e, palette);
        }
    }
    out
}

fn render_experiment_line(out: &mut String, e: &Experiment, palette: Palette) {
    use ridestat::Cohort;
    let _ = writeln!(
        out,
        "  {:<22}{} vs {} {}",
        e.name,
        e.treatment.label(),
        e.control.label(),
        palette.dim(&format!("(per {})", e.unit)),
    );
}

fn format_p(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridestat::{CorrectionMethod, StudyRunner};
    use ridestat_test::april_2014;

    fn plain() -> Palette {
        Palette::new(false)
    }

    #[test]
    fn test_report_text() {
        let settings = ridestat::AnalysisConfig {
            correction: CorrectionMethod::Holm,
            ..Default::default()
        };
        let report = StudyRunner::new(settings).run(&april_2014(), &Experiment::defaults());
        let text = render_report(&report, plain());

        assert!(text.starts_with("Study │ 2 experiments │ 2 significant │ α = 0.05 │ correction holm"));
        assert!(text.contains("friday_night  Friday night vs Weekday night (per day)"));
        assert!(text.contains("treatment      4 units"));
        assert!(text.contains("(adjusted "));
        assert!(text.contains("result     significant at α = 0.05"));
        assert!(!text.contains("Failures"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_experiment_listing() {
        let text = render_experiments(&Experiment::defaults(), &[], plain());
        assert!(text.contains("friday_night"));
        assert!(text.contains("manhattan_brooklyn    Manhattan vs Brooklyn (per day)"));
        assert!(text.contains("rainy_clear"));
        assert!(!text.contains("Study experiments"));
    }

    #[test]
    fn test_p_value_format() {
        assert_eq!(format_p(0.04321), "0.0432");
        assert_eq!(format_p(2.0e-20), "2.00e-20");
    }
}
