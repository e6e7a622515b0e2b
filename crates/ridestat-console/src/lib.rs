//! Colorful console output for study runs.
//!
//! Provides a custom `tracing` layer that formats RideStat lifecycle events
//! with colors. Output goes to stderr so reports written to stdout stay
//! machine-readable.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (file loaded, study/experiment start and end)
//! - **WARN**: Skipped files, skipped rows, failed experiments
//! - **DEBUG**: Aggregation details
//!
//! The filter is read from `RIDESTAT_LOG`, falling back to `RUST_LOG`.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "RIDESTAT_LOG";

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static STUDY_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the RideStat banner and sets up tracing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(RideStatConsoleLayer)
            .try_init();
    });
}

/// Initializes tracing without the banner.
///
/// Used when the caller prints structured output that a banner would
/// clutter, such as `ridestat list`.
pub fn init_quiet() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(RideStatConsoleLayer)
            .try_init();
    });
}

fn env_filter() -> EnvFilter {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_default();

    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn mark_study_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    STUDY_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = STUDY_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{} {}",
        "RideStat".bright_cyan().bold(),
        format!("v{VERSION} - A/B testing for ride pickups").bright_white()
    );
    let _ = stderr.flush();
}

/// A tracing layer that formats RideStat events with colors.
pub struct RideStatConsoleLayer;

impl<S: Subscriber> Layer<S> for RideStatConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("ridestat") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    experiment: Option<String>,
    service: Option<String>,
    correction: Option<String>,
    error: Option<String>,
    rows: Option<u64>,
    skipped: Option<u64>,
    experiment_count: Option<u64>,
    record_count: Option<u64>,
    treatment_units: Option<u64>,
    control_units: Option<u64>,
    evaluated: Option<u64>,
    failed: Option<u64>,
    significant: Option<u64>,
    duration_ms: Option<u64>,
    alpha: Option<f64>,
    statistic: Option<f64>,
    p_value: Option<f64>,
    cohens_d: Option<f64>,
}

impl EventVisitor {
    fn set_str(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "message" => self.message = Some(value),
            "experiment" => self.experiment = Some(value),
            "service" => self.service = Some(value),
            "correction" => self.correction = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_str(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_str(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "rows" => self.rows = Some(value),
            "skipped" => self.skipped = Some(value),
            "experiment_count" => self.experiment_count = Some(value),
            "record_count" => self.record_count = Some(value),
            "treatment_units" => self.treatment_units = Some(value),
            "control_units" => self.control_units = Some(value),
            "evaluated" => self.evaluated = Some(value),
            "failed" => self.failed = Some(value),
            "significant" => self.significant = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "alpha" => self.alpha = Some(value),
            "statistic" => self.statistic = Some(value),
            "p_value" => self.p_value = Some(value),
            "cohens_d" => self.cohens_d = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "load_file" => format_load_file(v),
        "study_start" => format_study_start(v),
        "experiment_end" => format_experiment_end(v),
        "experiment_failed" => format_experiment_failed(v),
        "study_end" => format_study_end(v),
        _ if level == Level::WARN || level == Level::ERROR => format_warning(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_load_file(v: &EventVisitor) -> String {
    let service = v.service.as_deref().unwrap_or("unknown");
    let rows = v.rows.unwrap_or(0);

    let mut output = format!(
        "{} {} Loaded {} │ {} pickups",
        format_elapsed(),
        "↓".bright_blue(),
        service.white().bold(),
        rows.to_formatted_string(&Locale::en).bright_yellow()
    );

    if let Some(skipped) = v.skipped.filter(|&s| s > 0) {
        output.push_str(&format!(
            " │ {} skipped",
            skipped.to_formatted_string(&Locale::en).yellow()
        ));
    }

    output
}

fn format_study_start(v: &EventVisitor) -> String {
    mark_study_start();
    let experiments = v.experiment_count.unwrap_or(0);
    let records = v.record_count.unwrap_or(0);

    let mut output = format!(
        "{} {} Study │ {} experiments │ {} pickups",
        format_elapsed(),
        "▶".bright_green().bold(),
        experiments.to_formatted_string(&Locale::en).bright_yellow(),
        records.to_formatted_string(&Locale::en).bright_yellow(),
    );

    if let Some(alpha) = v.alpha {
        output.push_str(&format!(" │ α = {}", alpha.bright_magenta()));
    }
    if let Some(correction) = v.correction.as_deref().filter(|c| *c != "none") {
        output.push_str(&format!(" │ {} correction", correction.bright_magenta()));
    }

    output
}

fn format_experiment_end(v: &EventVisitor) -> String {
    let name = v.experiment.as_deref().unwrap_or("unknown");

    format!(
        "{} {} {} │ {} vs {} units │ t = {} │ p = {} │ d = {}",
        format_elapsed(),
        "◀".bright_blue(),
        name.white().bold(),
        v.treatment_units.unwrap_or(0).to_formatted_string(&Locale::en),
        v.control_units.unwrap_or(0).to_formatted_string(&Locale::en),
        format!("{:.3}", v.statistic.unwrap_or(f64::NAN)).bright_magenta(),
        format_p_value(v.p_value),
        format!("{:.3}", v.cohens_d.unwrap_or(f64::NAN)).bright_magenta(),
    )
}

fn format_experiment_failed(v: &EventVisitor) -> String {
    let name = v.experiment.as_deref().unwrap_or("unknown");
    let error = v.error.as_deref().unwrap_or("unknown error");

    format!(
        "{} {} {} failed │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        name.white().bold(),
        error.bright_red()
    )
}

fn format_study_end(v: &EventVisitor) -> String {
    let evaluated = v.evaluated.unwrap_or(0);
    let failed = v.failed.unwrap_or(0);
    let significant = v.significant.unwrap_or(0);

    let failed_text = if failed > 0 {
        format!("{} failed", failed).bright_red().to_string()
    } else {
        format!("{} failed", failed).white().to_string()
    };

    format!(
        "{} {} Study complete │ {} │ {} evaluated │ {} │ {} significant",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        evaluated.to_formatted_string(&Locale::en).bright_green(),
        failed_text,
        significant.to_formatted_string(&Locale::en).bright_yellow().bold(),
    )
}

fn format_warning(v: &EventVisitor, level: Level) -> String {
    let message = v.message.as_deref().unwrap_or("");
    let mut output = format!(
        "{} {} {}",
        format_elapsed(),
        if level == Level::ERROR {
            "✗".bright_red().bold().to_string()
        } else {
            "!".yellow().bold().to_string()
        },
        message
    );

    if let Some(service) = &v.service {
        output.push_str(&format!(" │ {}", service.white().bold()));
    }
    if let Some(skipped) = v.skipped {
        output.push_str(&format!(
            " │ {} rows",
            skipped.to_formatted_string(&Locale::en).yellow()
        ));
    }
    if let Some(error) = &v.error {
        output.push_str(&format!(" │ {}", error.bright_red()));
    }

    output
}

fn format_p_value(p: Option<f64>) -> String {
    let Some(p) = p else {
        return "N/A".white().to_string();
    };
    // Unadjusted; significance depends on alpha and correction, so no verdict color.
    let text = if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    };
    text.bright_magenta().to_string()
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_load_file_shows_thousands_separators() {
        let v = EventVisitor {
            service: Some("Uber_apr_14".to_string()),
            rows: Some(564_516),
            skipped: Some(0),
            ..visitor("load_file")
        };
        let out = format_event(&v, Level::INFO);
        assert!(out.contains("Uber_apr_14"));
        assert!(out.contains("564,516"));
        assert!(!out.contains("skipped"));
    }

    #[test]
    fn test_experiment_end() {
        let v = EventVisitor {
            experiment: Some("friday_night".to_string()),
            treatment_units: Some(4),
            control_units: Some(18),
            statistic: Some(62.61),
            p_value: Some(2.0e-20),
            cohens_d: Some(5.5),
            ..visitor("experiment_end")
        };
        let out = format_event(&v, Level::INFO);
        assert!(out.contains("friday_night"));
        assert!(out.contains("62.610"));
        assert!(out.contains("2.00e-20"));
    }

    #[test]
    fn test_study_end_counts() {
        let v = EventVisitor {
            evaluated: Some(2),
            failed: Some(1),
            significant: Some(1),
            duration_ms: Some(42),
            ..visitor("study_end")
        };
        let out = format_event(&v, Level::INFO);
        assert!(out.contains("Study complete"));
        assert!(out.contains("42ms"));
        assert!(out.contains("1 failed"));
    }

    #[test]
    fn test_failure_includes_error() {
        let v = EventVisitor {
            experiment: Some("overlap".to_string()),
            error: Some("12 pickups fall in both cohorts".to_string()),
            ..visitor("experiment_failed")
        };
        let out = format_event(&v, Level::WARN);
        assert!(out.contains("overlap"));
        assert!(out.contains("fall in both"));
    }

    #[test]
    fn test_untagged_events() {
        let v = EventVisitor {
            message: Some("Failed to load ride file".to_string()),
            service: Some("Uber_may_14".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&v, Level::WARN).contains("Failed to load ride file"));
        assert!(format_event(&v, Level::INFO).is_empty());
        assert!(format_event(&v, Level::DEBUG).is_empty());
    }

    #[test]
    fn test_p_value_formatting() {
        assert!(format_p_value(Some(0.3)).contains("0.3000"));
        assert!(format_p_value(None).contains("N/A"));
    }

    #[test]
    fn test_p_value_style_ignores_threshold() {
        let strip_digits = |s: String| s.replace(|c: char| c.is_ascii_digit() || c == '.', "");
        let low = format_p_value(Some(0.0100));
        let high = format_p_value(Some(0.3000));
        assert!(low.contains("0.0100"));
        assert_eq!(strip_digits(low), strip_digits(high));
    }
}
