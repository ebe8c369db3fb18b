#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard aggregation over a filtered collision view.
//!
//! [`compute_aggregates`] turns one [`View`] into every KPI and chart the
//! dashboard renders. It never fails: empty views produce zeroed KPIs and
//! [`Section::NoData`] charts, and charts that depend on a column the
//! source never supplied report [`Section::Unavailable`].

pub mod gender;
pub mod kpis;
pub mod locations;
pub mod options;
pub mod ranking;

use collision_dash_analytics_models::{AggregateConfig, AggregateResult, Section};
use collision_dash_collision_models::{Column, CrashRecord};
use collision_dash_dataset::View;
use thiserror::Error;

pub use options::filter_options;
pub use ranking::rank_categories;

use crate::ranking::{FACTOR_SENTINELS, UNKNOWN_SENTINELS, year_counts};

/// Errors that can occur while setting up analytics.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The aggregate config could not be parsed.
    #[error("Invalid aggregate config: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses an [`AggregateConfig`] from TOML. Missing keys keep their
/// defaults.
///
/// # Errors
///
/// * If the text is not valid TOML or a value has the wrong type
pub fn load_config(toml_text: &str) -> Result<AggregateConfig, AnalyticsError> {
    toml::from_str(toml_text).map_err(|e| AnalyticsError::Config {
        message: e.to_string(),
    })
}

/// Computes every KPI and chart for `view`.
#[must_use]
pub fn compute_aggregates(view: &View<'_>, config: &AggregateConfig) -> AggregateResult {
    let rows: Vec<&CrashRecord> = view.iter().collect();
    let records = || rows.iter().copied();

    let totals = kpis::totals(records());
    log::debug!(
        "Aggregating {} rows ({} injuries, {} fatalities)",
        totals.crashes,
        totals.injuries,
        totals.fatalities
    );

    let result = AggregateResult {
        total_crashes: totals.crashes,
        total_injuries: totals.injuries,
        total_fatalities: totals.fatalities,
        most_dangerous_borough: kpis::most_dangerous_borough(records()),
        by_borough: section(view, &[Column::Borough], || {
            rank_categories(
                records(),
                |r| r.borough.as_ref(),
                config.borough_top_n,
                UNKNOWN_SENTINELS,
            )
        }),
        by_year: section(view, &[Column::CrashDate], || year_counts(records())),
        by_person_type: section(view, &[Column::PersonType], || {
            rank_categories(
                records(),
                |r| r.person_type.as_str(),
                config.person_type_top_n,
                UNKNOWN_SENTINELS,
            )
        }),
        by_contributing_factor: section(view, &[Column::ContributingFactor], || {
            rank_categories(
                records(),
                |r| r.contributing_factor.as_str(),
                config.contributing_factor_top_n,
                FACTOR_SENTINELS,
            )
        }),
        by_vehicle_type: section(view, &[Column::VehicleType], || {
            rank_categories(
                records(),
                |r| r.vehicle_type.as_str(),
                config.vehicle_type_top_n,
                UNKNOWN_SENTINELS,
            )
        }),
        by_gender: section(view, &[Column::PersonSex, Column::PersonInjury], || {
            gender::gender_breakdown(records())
        }),
        locations: match view.dataset().first_missing(&[Column::Latitude, Column::Longitude]) {
            Some(missing_column) => unavailable(missing_column),
            None => locations::location_sample(
                records(),
                &config.bounds,
                config.location_sample_size,
                config.location_sample_seed,
            )
            .map_or(Section::NoData, |data| Section::Ready { data }),
        },
    };

    if view.is_empty() {
        log::warn!("Aggregated an empty view");
    }

    result
}

/// Builds a list-valued chart, or reports the first `required` column the
/// dataset lacks.
fn section<T>(
    view: &View<'_>,
    required: &[Column],
    build: impl FnOnce() -> Vec<T>,
) -> Section<Vec<T>> {
    match view.dataset().first_missing(required) {
        Some(missing_column) => unavailable(missing_column),
        None => Section::from_rows(build()),
    }
}

fn unavailable<T>(missing_column: Column) -> Section<T> {
    log::debug!("Column {missing_column} unavailable, skipping chart");
    Section::Unavailable { missing_column }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use collision_dash_analytics_models::{CategoryCount, NOT_APPLICABLE};
    use collision_dash_collision_models::{Borough, PersonInjury, PersonSex};
    use collision_dash_dataset::Dataset;
    use collision_dash_query::{DashboardRequest, FilterSelections, apply_search};

    use super::*;

    fn crash(
        borough: Borough,
        year: i32,
        vehicle: &str,
        sex: PersonSex,
        injured: u32,
        killed: u32,
    ) -> CrashRecord {
        CrashRecord {
            borough,
            year: Some(year),
            vehicle_type: vehicle.to_string(),
            contributing_factor: "DRIVER INATTENTION/DISTRACTION".to_string(),
            person_type: "OCCUPANT".to_string(),
            person_sex: sex,
            person_injury: if killed > 0 {
                PersonInjury::Killed
            } else if injured > 0 {
                PersonInjury::Injured
            } else {
                PersonInjury::Uninjured
            },
            persons_injured: injured,
            persons_killed: killed,
            latitude: Some(40.65),
            longitude: Some(-73.95),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            crash(Borough::Brooklyn, 2022, "SEDAN", PersonSex::F, 1, 0),
            crash(Borough::Brooklyn, 2022, "TAXI", PersonSex::M, 0, 1),
            crash(Borough::Brooklyn, 2021, "SEDAN", PersonSex::F, 2, 0),
            crash(Borough::Queens, 2022, "SEDAN", PersonSex::F, 0, 2),
            crash(Borough::Unknown, 2022, "BUS", PersonSex::F, 0, 5),
        ])
    }

    fn categories(section: &Section<Vec<CategoryCount>>) -> Vec<(&str, u64)> {
        section
            .data()
            .map(|rows| rows.iter().map(|c| (c.category.as_str(), c.count)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn empty_view_degrades_to_no_data() {
        let dataset = dataset();
        let view = dataset.view().filter(|_| false);
        let result = compute_aggregates(&view, &AggregateConfig::default());

        assert_eq!(result.total_crashes, 0);
        assert_eq!(result.total_injuries, 0);
        assert_eq!(result.total_fatalities, 0);
        assert_eq!(result.most_dangerous_borough_label(), NOT_APPLICABLE);
        assert!(result.by_borough.is_no_data());
        assert!(result.by_year.is_no_data());
        assert!(result.by_person_type.is_no_data());
        assert!(result.by_contributing_factor.is_no_data());
        assert!(result.by_vehicle_type.is_no_data());
        assert!(result.by_gender.is_no_data());
        assert!(result.locations.is_no_data());
    }

    #[test]
    fn empty_dataset_degrades_to_no_data() {
        let dataset = Dataset::empty();
        let result = compute_aggregates(&dataset.view(), &AggregateConfig::default());
        assert_eq!(result.total_crashes, 0);
        assert!(result.most_dangerous_borough.is_none());
        assert!(result.by_year.is_no_data());
        assert!(result.locations.is_no_data());
    }

    #[test]
    fn brooklyn_women_2022() {
        let dataset = dataset();
        let view = apply_search("women in brooklyn 2022", dataset.view());
        let result = compute_aggregates(&view, &AggregateConfig::default());

        assert_eq!(result.total_crashes, 1);
        assert_eq!(result.total_injuries, 1);
        assert_eq!(categories(&result.by_borough), vec![("BROOKLYN", 1)]);
        assert_eq!(categories(&result.by_vehicle_type), vec![("SEDAN", 1)]);
        assert!(result.most_dangerous_borough.is_none());
    }

    #[test]
    fn full_view_kpis_and_charts() {
        let dataset = dataset();
        let result = compute_aggregates(&dataset.view(), &AggregateConfig::default());

        assert_eq!(result.total_crashes, 5);
        assert_eq!(result.total_injuries, 3);
        assert_eq!(result.total_fatalities, 8);
        assert_eq!(result.most_dangerous_borough, Some(Borough::Queens));
        assert_eq!(result.most_dangerous_borough_label(), "QUEENS");
        assert_eq!(
            categories(&result.by_borough),
            vec![("BROOKLYN", 3), ("QUEENS", 1)]
        );
        assert_eq!(
            categories(&result.by_vehicle_type),
            vec![("SEDAN", 3), ("TAXI", 1), ("BUS", 1)]
        );

        let years: Vec<i32> = result
            .by_year
            .data()
            .map(|rows| rows.iter().map(|y| y.year).collect())
            .unwrap_or_default();
        assert_eq!(years, vec![2021, 2022]);

        let gender = result.by_gender.data().cloned().unwrap_or_default();
        assert_eq!(gender.len(), 2);
        assert_eq!(gender[0].sex, PersonSex::F);
        assert_eq!(gender[0].injured, 2);
        assert_eq!(gender[0].killed, 2);

        let locations = result.locations.data().cloned();
        assert_eq!(locations.map(|l| l.points.len()), Some(5));
    }

    #[test]
    fn dropdown_filters_feed_aggregates() {
        let dataset = dataset();
        let request = DashboardRequest {
            query: None,
            filters: FilterSelections {
                vehicle_types: ["SEDAN".to_string()].into(),
                ..FilterSelections::default()
            },
        };
        let view = request.apply(&dataset);
        let result = compute_aggregates(&view, &AggregateConfig::default());
        assert_eq!(result.total_crashes, 3);
        assert_eq!(result.total_fatalities, 2);
    }

    #[test]
    fn missing_coordinates_make_only_the_map_unavailable() {
        let columns: BTreeSet<Column> = Column::all()
            .iter()
            .copied()
            .filter(|c| !matches!(c, Column::Latitude | Column::Longitude))
            .collect();
        let records = dataset().records().to_vec();
        let dataset = Dataset::new(records, columns);
        let result = compute_aggregates(&dataset.view(), &AggregateConfig::default());

        assert_eq!(
            result.locations,
            Section::Unavailable {
                missing_column: Column::Latitude
            }
        );
        assert!(result.by_borough.is_ready());
        assert!(result.by_gender.is_ready());
    }

    #[test]
    fn missing_injury_column_makes_only_the_gender_chart_unavailable() {
        let columns: BTreeSet<Column> = Column::all()
            .iter()
            .copied()
            .filter(|c| *c != Column::PersonInjury)
            .collect();
        let records = dataset().records().to_vec();
        let dataset = Dataset::new(records, columns);
        let result = compute_aggregates(&dataset.view(), &AggregateConfig::default());

        assert_eq!(
            result.by_gender,
            Section::Unavailable {
                missing_column: Column::PersonInjury
            }
        );
        assert!(result.by_borough.is_ready());
        assert!(result.locations.is_ready());
        assert_eq!(result.total_injuries, 3);
    }

    #[test]
    fn all_unknown_categories_yield_no_data_and_no_dangerous_borough() {
        let dataset = Dataset::from_records(vec![
            crash(Borough::Unknown, 2022, "Unknown", PersonSex::F, 1, 2),
            crash(Borough::Unknown, 2021, "Unknown", PersonSex::M, 0, 3),
        ]);
        let result = compute_aggregates(&dataset.view(), &AggregateConfig::default());

        assert_eq!(result.total_crashes, 2);
        assert_eq!(result.total_fatalities, 5);
        assert!(result.by_borough.is_no_data());
        assert!(result.by_vehicle_type.is_no_data());
        assert!(result.most_dangerous_borough.is_none());
        assert_eq!(result.most_dangerous_borough_label(), NOT_APPLICABLE);
        assert!(result.by_year.is_ready());
    }

    #[test]
    fn zero_sample_size_leaves_the_map_without_data() {
        let dataset = dataset();
        let config = AggregateConfig {
            location_sample_size: 0,
            ..AggregateConfig::default()
        };
        let result = compute_aggregates(&dataset.view(), &config);
        assert!(result.locations.is_no_data());
    }

    #[test]
    fn config_top_n_is_honoured() {
        let dataset = dataset();
        let config = AggregateConfig {
            vehicle_type_top_n: 1,
            ..AggregateConfig::default()
        };
        let result = compute_aggregates(&dataset.view(), &config);
        assert_eq!(categories(&result.by_vehicle_type), vec![("SEDAN", 3)]);
    }

    #[test]
    fn loads_partial_toml_config() {
        let config = load_config(
            "location_sample_size = 250\n\n[bounds]\nmin_latitude = 40.0\nmax_latitude = 41.0\nmin_longitude = -75.0\nmax_longitude = -73.0\n",
        )
        .unwrap();
        assert_eq!(config.location_sample_size, 250);
        assert_eq!(config.person_type_top_n, 6);
        assert!(config.bounds.contains(40.1, -74.9));
    }

    #[test]
    fn rejects_malformed_config() {
        let err = load_config("borough_top_n = \"ten\"").unwrap_err();
        assert!(matches!(err, AnalyticsError::Config { .. }));
    }
}
