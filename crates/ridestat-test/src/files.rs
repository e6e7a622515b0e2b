//! Sample ride files in the raw Uber layouts.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ridestat_data::Pickup;
use tempfile::TempDir;

use crate::pickups::april_2014;

/// 2014 layout, quoted header, five April rows.
pub const APR14_CSV: &str = "\
\"Date/Time\",\"Lat\",\"Lon\",\"Base\"
\"4/4/2014 18:05:00\",40.7521,-73.9712,\"B02512\"
\"4/4/2014 21:40:00\",40.7366,-73.9906,\"B02512\"
\"4/7/2014 19:12:00\",40.6619,-73.9558,\"B02598\"
\"4/7/2014 20:31:00\",40.7214,-73.9871,\"B02598\"
\"4/8/2014 7:45:00\",40.7615,-73.8286,\"B02617\"
";

/// 2014 layout, four May rows.
pub const MAY14_CSV: &str = "\
Date/Time,Lat,Lon,Base
5/2/2014 22:10:00,40.7401,-73.9922,B02682
5/2/2014 23:55:00,40.6891,-73.9613,B02682
5/5/2014 18:20:00,40.7555,-73.9802,B02764
5/5/2014 9:00:00,40.6502,-73.9497,B02764
";

/// 2015 layout: no coordinates.
pub const JANJUNE15_CSV: &str = "\
Dispatching_base_num,Pickup_date,Affiliated_base_num,locationID
B02617,2015-05-17 09:47:00,B02617,141
B02617,2015-05-17 09:47:00,B02617,65
B02617,2015-05-17 09:47:00,B02617,100
";

/// Non-Uber file that the loader must ignore.
pub const LYFT_CSV: &str = "\
time_of_trip,start_lat,start_lng,Unnamed: 3
9/4/2014 9:51,40.64705,-73.77988,
";

/// Temporary data directory holding every sample file.
pub fn sample_data_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (name, contents) in [
        ("uber-raw-data-apr14.csv", APR14_CSV),
        ("uber-raw-data-may14.csv", MAY14_CSV),
        ("uber-raw-data-janjune-15.csv", JANJUNE15_CSV),
        ("other-Lyft_B02510.csv", LYFT_CSV),
    ] {
        fs::write(dir.path().join(name), contents).expect("write sample file");
    }
    dir
}

/// Renders pickups in the 2014 layout (`Date/Time,Lat,Lon,Base`).
pub fn raw_csv(pickups: &[Pickup]) -> String {
    let mut out = String::from("Date/Time,Lat,Lon,Base\n");
    for p in pickups {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            p.timestamp.format("%-m/%-d/%Y %-H:%M:%S"),
            p.lat.map(|v| v.to_string()).unwrap_or_default(),
            p.lon.map(|v| v.to_string()).unwrap_or_default(),
            p.base.as_deref().unwrap_or("B02512"),
        );
    }
    out
}

/// Writes pickups to `dir/name` in the 2014 layout.
pub fn write_raw_csv(dir: &Path, name: &str, pickups: &[Pickup]) {
    fs::write(dir.join(name), raw_csv(pickups)).expect("write ride file");
}

/// Temporary data directory holding [`april_2014`] as `uber-raw-data-apr14.csv`.
pub fn april_2014_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let pickups: Vec<Pickup> = april_2014().iter().map(|p| p.pickup.clone()).collect();
    write_raw_csv(dir.path(), "uber-raw-data-apr14.csv", &pickups);
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_csv_layout() {
        let pickups = crate::PickupBuilder::new()
            .add(crate::date(2014, 4, 4), 18, 1, crate::MANHATTAN)
            .build();
        let csv = raw_csv(&pickups);
        assert_eq!(csv, "Date/Time,Lat,Lon,Base\n4/4/2014 18:00:00,40.75,-73.95,B02512\n");
    }
}
