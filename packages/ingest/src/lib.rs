#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loader for the merged, standardized NYC collision CSV.
//!
//! Reads the person-level export (crash columns joined onto each person
//! row), canonicalizes every field and returns an immutable [`Dataset`].
//! Optional columns that the file lacks are recorded on the dataset so
//! that charts depending on them can report themselves unavailable.

pub mod parsing;

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::Read,
    path::Path,
};

use collision_dash_collision_models::{
    Borough, Column, CrashRecord, PersonInjury, PersonSex, UNKNOWN,
};
use collision_dash_dataset::Dataset;
use thiserror::Error;

use crate::parsing::{
    parse_category, parse_contributing_factor, parse_coordinate, parse_count, parse_year,
};

/// Errors that can occur while loading collision data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O error opening or reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column {column} (expected header {expected})")]
    MissingColumn {
        /// The logical column.
        column: Column,
        /// Accepted header spellings.
        expected: String,
    },
}

/// Loads the collision CSV at `path`.
///
/// # Errors
///
/// * If the file cannot be opened
/// * If the CSV is malformed
/// * If a required column is missing
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset, IngestError> {
    let path = path.as_ref();
    log::info!("Loading collision data from {}", path.display());
    let file = File::open(path)?;
    load_from_reader(file)
}

/// Loads collision CSV data from any reader.
///
/// # Errors
///
/// * If the CSV is malformed
/// * If a required column is missing
pub fn load_from_reader(reader: impl Read) -> Result<Dataset, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let header_index = resolve_headers(csv_reader.headers()?)?;
    let columns: BTreeSet<Column> = header_index.keys().copied().collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let field = |column: Column| {
            header_index
                .get(&column)
                .and_then(|&i| row.get(i))
                .unwrap_or("")
        };
        records.push(CrashRecord {
            borough: Borough::from_raw(field(Column::Borough)),
            year: parse_year(field(Column::CrashDate)),
            vehicle_type: parse_category(field(Column::VehicleType)),
            contributing_factor: parse_contributing_factor(field(Column::ContributingFactor)),
            person_type: parse_category(field(Column::PersonType)),
            person_sex: PersonSex::from_raw(field(Column::PersonSex)),
            person_injury: PersonInjury::from_raw(field(Column::PersonInjury)),
            persons_injured: parse_count(field(Column::PersonsInjured)),
            persons_killed: parse_count(field(Column::PersonsKilled)),
            latitude: parse_coordinate(field(Column::Latitude)),
            longitude: parse_coordinate(field(Column::Longitude)),
        });
    }

    log_summary(&records);

    Ok(Dataset::new(records, columns))
}

/// Maps each logical column to its position in the header row.
///
/// Fails on the first required column with no matching header. Optional
/// columns without a header are simply left out.
fn resolve_headers(headers: &csv::StringRecord) -> Result<BTreeMap<Column, usize>, IngestError> {
    let mut index = BTreeMap::new();
    for &column in Column::all() {
        let position = column
            .headers()
            .iter()
            .find_map(|name| headers.iter().position(|h| h == *name));
        match position {
            Some(i) => {
                index.insert(column, i);
            }
            None if column.is_optional() => {
                log::warn!("Optional column {column} not present, related charts unavailable");
            }
            None => {
                return Err(IngestError::MissingColumn {
                    column,
                    expected: column.headers().join(" or "),
                });
            }
        }
    }
    Ok(index)
}

fn log_summary(records: &[CrashRecord]) {
    let mut by_sex: BTreeMap<PersonSex, u64> = BTreeMap::new();
    for record in records {
        *by_sex.entry(record.person_sex).or_insert(0) += 1;
    }
    let years: BTreeSet<i32> = records.iter().filter_map(|r| r.year).collect();
    let unknown_vehicles = records
        .iter()
        .filter(|r| r.vehicle_type == UNKNOWN)
        .count();

    log::info!("Loaded {} collision records", records.len());
    log::info!("Person sex distribution: {by_sex:?}");
    log::info!("Years available: {years:?}");
    log::debug!("{unknown_vehicles} records without a vehicle type");
}

#[cfg(test)]
mod tests {
    use collision_dash_collision_models::UNSPECIFIED;

    use super::*;

    const HEADER: &str = "CRASH_DATE_x,BOROUGH,NUMBER_OF_PERSONS_INJURED,NUMBER_OF_PERSONS_KILLED,\
CONTRIBUTING_FACTOR_VEHICLE_1,VEHICLE_TYPE_CODE_1,PERSON_TYPE,PERSON_INJURY,PERSON_SEX,LATITUDE,LONGITUDE";

    fn load(body: &str) -> Result<Dataset, IngestError> {
        load_from_reader(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn normalizes_a_full_row() {
        let dataset = load(
            "2021-09-11,brooklyn,2.0,0,Unspecified,Sedan,Pedestrian,Injured,Female,40.6782,-73.9442\n",
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.borough, Borough::Brooklyn);
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.persons_injured, 2);
        assert_eq!(record.contributing_factor, UNSPECIFIED);
        assert_eq!(record.vehicle_type, "SEDAN");
        assert_eq!(record.person_type, "PEDESTRIAN");
        assert_eq!(record.person_injury, PersonInjury::Injured);
        assert_eq!(record.person_sex, PersonSex::F);
        assert_eq!(record.latitude, Some(40.6782));
    }

    #[test]
    fn blanks_become_sentinels() {
        let dataset = load(",,,,,,,,U,0,0\n").unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.borough, Borough::Unknown);
        assert_eq!(record.year, None);
        assert_eq!(record.vehicle_type, UNKNOWN);
        assert_eq!(record.contributing_factor, UNKNOWN);
        assert_eq!(record.person_sex, PersonSex::Unknown);
        assert_eq!(record.person_injury, PersonInjury::Unknown);
        assert_eq!(record.persons_killed, 0);
        assert_eq!(record.latitude, None);
    }

    #[test]
    fn all_columns_present_are_recorded() {
        let dataset = load("").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.first_missing(Column::all()), None);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "CRASH_DATE,BOROUGH,NUMBER_OF_PERSONS_INJURED,NUMBER_OF_PERSONS_KILLED,\
CONTRIBUTING_FACTOR_VEHICLE_1,VEHICLE_TYPE_CODE_1,PERSON_TYPE,PERSON_SEX\n\
09/11/2021,QUEENS,0,1,Driver Inattention/Distraction,Taxi,Driver,M\n";
        let dataset = load_from_reader(csv.as_bytes()).unwrap();

        assert!(!dataset.has_column(Column::Latitude));
        assert!(!dataset.has_column(Column::PersonInjury));
        assert!(dataset.has_column(Column::CrashDate));
        let record = &dataset.records()[0];
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.persons_killed, 1);
        assert_eq!(record.person_injury, PersonInjury::Unknown);
        assert_eq!(record.longitude, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "CRASH_DATE,BOROUGH\n2021-01-01,BRONX\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                column: Column::VehicleType,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_csv("/nonexistent/collisions.csv").unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
