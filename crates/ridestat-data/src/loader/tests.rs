use super::*;

use std::io::Write;

use chrono::NaiveDate;
use tempfile::TempDir;

const APR14: &str = "\
\"Date/Time\",\"Lat\",\"Lon\",\"Base\"
\"4/1/2014 0:11:00\",40.769,-73.9549,\"B02512\"
\"4/1/2014 0:17:00\",40.7267,-74.0345,\"B02512\"
\"4/2/2014 18:30:00\",40.65,-73.95,\"B02598\"
";

const MAY14: &str = "\
Date/Time,Lat,Lon,Base
5/3/2014 21:00:00,40.75,-73.98,B02617
5/3/2014 22:00:00,40.75,-73.98,B02617
";

const JANJUNE15: &str = "\
Dispatching_base_num,Pickup_date,Affiliated_base_num,locationID
B02617,2015-05-17 09:47:00,B02617,141
B02617,2015-05-17 09:47:00,B02617,65
";

fn write_file(dir: &TempDir, name: &str, contents: &str) {
    let mut file = File::create(dir.path().join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "uber-raw-data-apr14.csv", APR14);
    write_file(&dir, "uber-raw-data-may14.csv", MAY14);
    write_file(&dir, "other-Lyft_B02510.csv", "time_of_trip,start_lat,start_lng\n");
    write_file(&dir, "notes.txt", "ignored");
    dir
}

#[test]
fn test_service_names() {
    assert_eq!(service_name("uber-raw-data-sep14.csv"), "Uber_sep_14");
    assert_eq!(service_name("uber-raw-data-janjune-15.csv"), "Uber_JanJune_2015");
    assert_eq!(service_name("uber-raw-data.csv"), "Uber_Other");
    assert_eq!(service_name("other-FHV-services_jan-aug-2015.csv"), "FHV-services_jan-aug-2015");
    assert_eq!(service_name("weather.csv"), "weather");
}

#[test]
fn test_available_files_ignores_non_csv() {
    let dir = fixture_dir();
    let files = DataLoader::new(dir.path()).available_files().unwrap();
    let names: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Lyft_B02510", "Uber_apr_14", "Uber_may_14"]);
}

#[test]
fn test_load_only_uber_services() {
    let dir = fixture_dir();
    let dataset = DataLoader::new(dir.path()).load(&LoadOptions::new()).unwrap();

    assert_eq!(dataset.len(), 5);
    let services: Vec<&str> = dataset.sources().iter().map(|s| s.service.as_str()).collect();
    assert_eq!(services, vec!["Uber_apr_14", "Uber_may_14"]);
}

#[test]
fn test_load_parses_fields_and_features() {
    let dir = fixture_dir();
    let dataset = DataLoader::new(dir.path())
        .load(&LoadOptions::new().with_months(["apr14"]))
        .unwrap();

    let first = &dataset.pickups()[0];
    assert_eq!(
        first.pickup.timestamp,
        NaiveDate::from_ymd_opt(2014, 4, 1).unwrap().and_hms_opt(0, 11, 0).unwrap()
    );
    assert_eq!(first.pickup.base.as_deref(), Some("B02512"));
    assert_eq!(&*first.pickup.service, "Uber_apr_14");
    assert_eq!(&*first.pickup.source_file, "uber-raw-data-apr14.csv");
    assert_eq!(first.features.borough, crate::Borough::Manhattan);
    assert!(first.features.is_late_night);
}

#[test]
fn test_month_filter() {
    let dir = fixture_dir();
    let loader = DataLoader::new(dir.path());

    let may = loader.load(&LoadOptions::new().with_months(["may14"])).unwrap();
    assert_eq!(may.len(), 2);
    assert_eq!(may.sources().len(), 1);

    let none = loader.load(&LoadOptions::new().with_months(["dec14"]));
    assert!(matches!(none, Err(DataError::NoData(_))));
}

#[test]
fn test_month_tokens_ignore_case_and_underscores() {
    let dir = fixture_dir();
    let loader = DataLoader::new(dir.path());
    assert!(loader.available_files().unwrap().contains_key("Uber_apr_14"));

    for token in ["apr14", "apr_14", "APR14", "Apr_14"] {
        let dataset = loader.load(&LoadOptions::new().with_months([token])).unwrap();
        assert_eq!(dataset.sources().len(), 1, "token {token}");
        assert_eq!(&*dataset.pickups()[0].pickup.service, "Uber_apr_14");
    }
}

#[test]
fn test_sample_size_limits_each_file() {
    let dir = fixture_dir();
    let dataset = DataLoader::new(dir.path())
        .load(&LoadOptions::new().with_sample_size(1))
        .unwrap();
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_empty_directory_is_no_data() {
    let dir = TempDir::new().unwrap();
    let result = DataLoader::new(dir.path()).load(&LoadOptions::new());
    assert!(matches!(result, Err(DataError::NoData(_))));
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = DataLoader::new(dir.path().join("absent")).available_files();
    assert!(matches!(result, Err(DataError::Io(_))));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = fixture_dir();
    write_file(&dir, "uber-raw-data-jun14.csv", "foo,bar\n1,2\n");
    let dataset = DataLoader::new(dir.path()).load(&LoadOptions::new()).unwrap();
    assert_eq!(dataset.sources().len(), 2);
}

#[test]
fn test_2015_layout_has_no_location() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "uber-raw-data-janjune-15.csv", JANJUNE15);
    let dataset = DataLoader::new(dir.path()).load(&LoadOptions::new()).unwrap();

    assert_eq!(dataset.len(), 2);
    let first = &dataset.pickups()[0];
    assert_eq!(first.pickup.lat, None);
    assert_eq!(first.pickup.base.as_deref(), Some("B02617"));
    assert_eq!(first.features.borough, crate::Borough::Other);
    assert!(first.features.is_weekend);
}

#[test]
fn test_read_pickups_counts_skipped_rows() {
    let csv = "Date/Time,Lat,Lon,Base\nnot a date,40.7,-73.9,B1\n4/1/2014 0:11,abc,-73.9,\n";
    let parsed = read_pickups(csv.as_bytes(), "Uber_apr_14", "inline.csv", None).unwrap();

    assert_eq!(parsed.skipped, 1);
    assert_eq!(parsed.pickups.len(), 1);
    assert_eq!(parsed.pickups[0].lat, None);
    assert_eq!(parsed.pickups[0].base, None);
}

#[test]
fn test_read_pickups_missing_timestamp_column() {
    let result = read_pickups("a,b\n1,2\n".as_bytes(), "x", "bad.csv", None);
    assert!(matches!(
        result,
        Err(DataError::MissingColumn { column: "timestamp", .. })
    ));
}

#[test]
fn test_summary() {
    let dir = fixture_dir();
    let summary = DataLoader::new(dir.path()).summary().unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.total_records, 5);
    assert_eq!(summary.file_details["Uber_apr_14"].rows, 3);
    assert_eq!(summary.file_details["Lyft_B02510"].rows, 0);
    assert_eq!(summary.file_details["Uber_apr_14"].size_mb, 0.0);

    // The first file in service order has no timestamp column.
    assert_eq!(summary.date_range, None);
    assert!(summary.to_string().contains("Unknown"));
}

#[test]
fn test_summary_date_range_from_first_file() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "uber-raw-data-apr14.csv", APR14);
    let summary = DataLoader::new(dir.path()).summary().unwrap();

    let range = summary.date_range.unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2014, 4, 1).unwrap());
    assert_eq!(range.end, NaiveDate::from_ymd_opt(2014, 4, 2).unwrap());
    assert_eq!(summary.services, vec!["Uber_apr_14".to_string()]);
}
