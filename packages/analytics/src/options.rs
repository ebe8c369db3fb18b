//! Dropdown choices derived from the full dataset.

use std::collections::BTreeSet;

use collision_dash_analytics_models::{FilterOption, FilterOptions};
use collision_dash_collision_models::{Borough, Column, PersonInjury, PersonSex, is_sentinel};
use collision_dash_dataset::Dataset;

use crate::ranking::{FACTOR_SENTINELS, UNKNOWN_SENTINELS, rank_categories};

/// Number of vehicle types and contributing factors offered.
pub const OPTION_TOP_N: usize = 15;

/// Builds the choices for every filter dropdown.
///
/// Options always come from the whole dataset, never from a filtered
/// view, so picking one value never hides the others.
#[must_use]
pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    let records = dataset.records();

    let boroughs: BTreeSet<Borough> = records
        .iter()
        .map(|r| r.borough)
        .filter(|b| *b != Borough::Unknown)
        .collect();
    let years: BTreeSet<i32> = records.iter().filter_map(|r| r.year).collect();
    let person_types: BTreeSet<&str> = records
        .iter()
        .map(|r| r.person_type.as_str())
        .filter(|t| !is_sentinel(t, UNKNOWN_SENTINELS))
        .collect();
    let injury_types: BTreeSet<PersonInjury> = if dataset.has_column(Column::PersonInjury) {
        records
            .iter()
            .map(|r| r.person_injury)
            .filter(|i| *i != PersonInjury::Unknown)
            .collect()
    } else {
        BTreeSet::new()
    };

    let options = FilterOptions {
        boroughs: boroughs.into_iter().map(labelled).collect(),
        years: years.into_iter().map(labelled).collect(),
        vehicle_types: rank_categories(
            records,
            |r| r.vehicle_type.as_str(),
            OPTION_TOP_N,
            UNKNOWN_SENTINELS,
        )
        .into_iter()
        .map(|c| labelled(c.category))
        .collect(),
        person_types: person_types
            .into_iter()
            .map(|t| labelled(t.to_string()))
            .collect(),
        genders: [PersonSex::M, PersonSex::F]
            .into_iter()
            .filter(|sex| records.iter().any(|r| r.person_sex == *sex))
            .map(|sex| FilterOption {
                label: sex.label().to_string(),
                value: sex,
            })
            .collect(),
        contributing_factors: rank_categories(
            records,
            |r| r.contributing_factor.as_str(),
            OPTION_TOP_N,
            FACTOR_SENTINELS,
        )
        .into_iter()
        .map(|c| labelled(c.category))
        .collect(),
        injury_types: injury_types.into_iter().map(labelled).collect(),
    };

    log::debug!(
        "Filter options: {} boroughs, {} years, {} vehicle types, {} factors",
        options.boroughs.len(),
        options.years.len(),
        options.vehicle_types.len(),
        options.contributing_factors.len()
    );

    options
}

fn labelled<T: ToString>(value: T) -> FilterOption<T> {
    FilterOption {
        label: value.to_string(),
        value,
    }
}
