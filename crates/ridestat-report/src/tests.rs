//! Tests for report export.

use super::*;

use chrono::Weekday;
use ridestat_config::{AggregationUnit, AnalysisConfig};
use ridestat_core::{Alternative, BootstrapConfig, CorrectionMethod};
use ridestat_data::Borough;
use ridestat_engine::{CohortSpec, Experiment, StudyReport, StudyRunner};
use ridestat_test::pickups::april_2014;

fn report(correction: CorrectionMethod) -> StudyReport {
    let settings = AnalysisConfig {
        correction,
        bootstrap: Some(BootstrapConfig::new().with_resamples(200).with_seed(9)),
        ..AnalysisConfig::default()
    };
    let overlap = Experiment::new(
        "overlap",
        CohortSpec::new("Fridays").with_weekdays([Weekday::Fri]),
        CohortSpec::new("Manhattan").with_boroughs([Borough::Manhattan]),
        AggregationUnit::Day,
    );
    let experiments = [
        Experiment::friday_night(),
        Experiment::manhattan_brooklyn(),
        overlap,
    ];
    StudyRunner::new(settings).run(&april_2014(), &experiments)
}

#[test]
fn test_csv_has_header_and_one_row_per_outcome() {
    let csv = CsvExporter::to_string(&report(CorrectionMethod::None)).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("experiment,treatment,control,unit,"));
    assert!(lines[0].ends_with(",power,required_units,significant"));
    assert!(lines[1].starts_with("friday_night,Friday night,Weekday night,day,4,18,"));
    assert!(lines[2].starts_with("manhattan_brooklyn,"));
}

#[test]
fn test_csv_leaves_missing_values_empty() {
    let csv = CsvExporter::to_string(&report(CorrectionMethod::None)).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let column = headers.iter().position(|h| h == "adjusted_p_value").unwrap();

    for record in reader.records() {
        assert_eq!(&record.unwrap()[column], "");
    }
}

#[test]
fn test_csv_includes_adjusted_p_values() {
    let csv = CsvExporter::to_string(&report(CorrectionMethod::Holm)).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let column = headers.iter().position(|h| h == "adjusted_p_value").unwrap();

    for record in reader.records() {
        let value: f64 = record.unwrap()[column].parse().unwrap();
        assert!((0.0..=1.0).contains(&value));
    }
}

#[test]
fn test_markdown_sections() {
    let md = MarkdownReport::to_string(&report(CorrectionMethod::BenjaminiHochberg));

    assert!(md.contains("# Study Report"));
    assert!(md.contains("- **Correction**: benjamini_hochberg"));
    assert!(md.contains("## Summary"));
    assert!(md.contains("| Experiment | Treatment | Control |"));
    assert!(md.contains("## friday_night"));
    assert!(md.contains("## manhattan_brooklyn"));
    assert!(md.contains("| Adjusted p-value |"));
    assert!(md.contains("| Bootstrap 95% CI |"));
    assert!(md.contains("## Failures"));
    assert!(md.contains("- **overlap**:"));
}

#[test]
fn test_markdown_without_outcomes() {
    let empty = StudyRunner::default().run(&april_2014(), &[]);
    let md = MarkdownReport::to_string(&empty);
    assert!(md.contains("*No experiments completed.*"));
    assert!(!md.contains("## Failures"));
}

#[test]
fn test_json_structure() {
    let json = JsonReport::to_string(&report(CorrectionMethod::Bonferroni)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["correction"], "bonferroni");
    assert_eq!(value["outcomes"].as_array().unwrap().len(), 2);
    assert_eq!(value["outcomes"][0]["name"], "friday_night");
    assert_eq!(value["outcomes"][0]["unit"], "day");
    assert!(value["outcomes"][0]["adjusted_p_value"].is_number());
    assert_eq!(value["failures"][0]["name"], "overlap");
    assert!(value["failures"][0]["error"]
        .as_str()
        .unwrap()
        .contains("fall in both"));
    assert_eq!(value["statistics"]["experiments_failed"], 1);
}

#[test]
fn test_json_one_sided_open_bound_is_null() {
    let settings = AnalysisConfig {
        alternative: Alternative::Greater,
        ..AnalysisConfig::default()
    };
    let report = StudyRunner::new(settings).run(&april_2014(), &[Experiment::friday_night()]);
    let value: serde_json::Value =
        serde_json::from_str(&JsonReport::to_string(&report).unwrap()).unwrap();

    let ci = &value["outcomes"][0]["test"]["confidence_interval"];
    assert!(ci["lower"].is_number());
    assert!(ci["upper"].is_null());
}

#[test]
fn test_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let report = report(CorrectionMethod::None);

    let csv_path = dir.path().join("study.csv");
    CsvExporter::to_file(&report, &csv_path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        CsvExporter::to_string(&report).unwrap()
    );

    let md_path = dir.path().join("study.md");
    MarkdownReport::to_file(&report, &md_path).unwrap();
    assert!(std::fs::read_to_string(&md_path)
        .unwrap()
        .starts_with("# Study Report"));

    let json_path = dir.path().join("study.json");
    JsonReport::to_file(&report, &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert!(value["outcomes"].is_array());
}
