//! Multi-select filter composition.
//!
//! Each dashboard dropdown supplies a set of accepted values for one
//! [`Dimension`]. A record passes when, for every dimension with a
//! non-empty selection, its value is in that selection. All dimensions
//! are checked together per row, so the order in which selections are
//! supplied can never change the result.

use std::collections::BTreeSet;

use collision_dash_collision_models::{Borough, Column, CrashRecord, PersonInjury, PersonSex};
use collision_dash_dataset::View;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A filterable field of the collision record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    Borough,
    Year,
    VehicleType,
    PersonType,
    Gender,
    ContributingFactor,
    InjuryType,
}

impl Dimension {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Borough,
            Self::Year,
            Self::VehicleType,
            Self::PersonType,
            Self::Gender,
            Self::ContributingFactor,
            Self::InjuryType,
        ]
    }
}

/// Accepted values per dimension. An empty set places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelections {
    /// Accepted boroughs.
    pub boroughs: BTreeSet<Borough>,
    /// Accepted crash years.
    pub years: BTreeSet<i32>,
    /// Accepted vehicle types (canonical spelling).
    pub vehicle_types: BTreeSet<String>,
    /// Accepted person types (canonical spelling).
    pub person_types: BTreeSet<String>,
    /// Accepted person sexes.
    pub genders: BTreeSet<PersonSex>,
    /// Accepted contributing factors (canonical spelling).
    pub contributing_factors: BTreeSet<String>,
    /// Accepted person injury outcomes.
    pub injury_types: BTreeSet<PersonInjury>,
}

impl FilterSelections {
    /// Whether `dimension` has a non-empty selection.
    #[must_use]
    pub fn is_active(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Borough => !self.boroughs.is_empty(),
            Dimension::Year => !self.years.is_empty(),
            Dimension::VehicleType => !self.vehicle_types.is_empty(),
            Dimension::PersonType => !self.person_types.is_empty(),
            Dimension::Gender => !self.genders.is_empty(),
            Dimension::ContributingFactor => !self.contributing_factors.is_empty(),
            Dimension::InjuryType => !self.injury_types.is_empty(),
        }
    }

    /// Dimensions that restrict the view.
    #[must_use]
    pub fn active_dimensions(&self) -> Vec<Dimension> {
        Dimension::all()
            .iter()
            .copied()
            .filter(|d| self.is_active(*d))
            .collect()
    }

    /// Whether no dimension restricts the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_dimensions().is_empty()
    }

    /// Whether `record` passes the selection for a single `dimension`.
    ///
    /// Always `true` when that dimension has no selection. A record with no
    /// year never passes an active year selection.
    #[must_use]
    pub fn admits(&self, dimension: Dimension, record: &CrashRecord) -> bool {
        if !self.is_active(dimension) {
            return true;
        }
        match dimension {
            Dimension::Borough => self.boroughs.contains(&record.borough),
            Dimension::Year => record.year.is_some_and(|y| self.years.contains(&y)),
            Dimension::VehicleType => self.vehicle_types.contains(&record.vehicle_type),
            Dimension::PersonType => self.person_types.contains(&record.person_type),
            Dimension::Gender => self.genders.contains(&record.person_sex),
            Dimension::ContributingFactor => {
                self.contributing_factors.contains(&record.contributing_factor)
            }
            Dimension::InjuryType => self.injury_types.contains(&record.person_injury),
        }
    }
}

/// Narrows `view` to records admitted by every active dimension of
/// `selections`.
///
/// Values absent from the dataset simply match nothing. An injury type
/// selection is ignored when the source has no injury column. The
/// underlying dataset is never modified.
#[must_use]
pub fn apply_filters<'a>(view: View<'a>, selections: &FilterSelections) -> View<'a> {
    let mut active = selections.active_dimensions();
    if active.contains(&Dimension::InjuryType)
        && !view.dataset().has_column(Column::PersonInjury)
    {
        log::warn!("Injury type selection ignored: source has no injury column");
        active.retain(|d| *d != Dimension::InjuryType);
    }
    if active.is_empty() {
        return view;
    }

    log::debug!(
        "Applying {} filter dimension(s) {active:?} over {} rows",
        active.len(),
        view.len()
    );

    let filtered = view.filter(|record| active.iter().all(|d| selections.admits(*d, record)));

    if filtered.is_empty() {
        log::warn!("No rows remaining after filters {active:?}");
    } else {
        log::debug!("After filters: {} rows", filtered.len());
    }

    filtered
}

#[cfg(test)]
mod tests {
    use collision_dash_dataset::Dataset;

    use super::*;

    fn dataset() -> Dataset {
        let row = |borough, year, vehicle: &str, sex| CrashRecord {
            borough,
            year,
            vehicle_type: vehicle.to_string(),
            person_sex: sex,
            ..CrashRecord::default()
        };
        Dataset::from_records(vec![
            row(Borough::Brooklyn, Some(2021), "SEDAN", PersonSex::M),
            row(Borough::Brooklyn, Some(2022), "TAXI", PersonSex::F),
            row(Borough::Queens, Some(2021), "SEDAN", PersonSex::F),
            row(Borough::Manhattan, None, "BUS", PersonSex::Unknown),
            row(Borough::Queens, Some(2022), "SEDAN", PersonSex::M),
        ])
    }

    #[test]
    fn empty_selections_leave_view_untouched() {
        let dataset = dataset();
        let view = apply_filters(dataset.view(), &FilterSelections::default());
        assert_eq!(view.len(), dataset.len());
        assert!(FilterSelections::default().is_empty());
    }

    #[test]
    fn values_within_a_dimension_are_ored() {
        let dataset = dataset();
        let selections = FilterSelections {
            boroughs: [Borough::Brooklyn, Borough::Manhattan].into(),
            ..FilterSelections::default()
        };
        let view = apply_filters(dataset.view(), &selections);
        assert_eq!(view.row_ids(), &[0, 1, 3]);
    }

    #[test]
    fn dimensions_are_anded_and_rows_satisfy_every_selection() {
        let dataset = dataset();
        let selections = FilterSelections {
            boroughs: [Borough::Brooklyn, Borough::Queens].into(),
            years: [2021].into(),
            vehicle_types: ["SEDAN".to_string()].into(),
            ..FilterSelections::default()
        };
        let view = apply_filters(dataset.view(), &selections);
        assert_eq!(view.row_ids(), &[0, 2]);
        for record in view.iter() {
            assert!(selections.boroughs.contains(&record.borough));
            assert!(selections.years.contains(&record.year.unwrap_or_default()));
            assert!(selections.vehicle_types.contains(&record.vehicle_type));
        }
    }

    #[test]
    fn composition_is_order_independent() {
        let dataset = dataset();
        let first = FilterSelections {
            boroughs: [Borough::Queens].into(),
            years: [2021, 2022].into(),
            ..FilterSelections::default()
        };
        let second = FilterSelections {
            vehicle_types: ["SEDAN".to_string()].into(),
            ..FilterSelections::default()
        };

        let forward = apply_filters(apply_filters(dataset.view(), &first), &second);
        let reverse = apply_filters(apply_filters(dataset.view(), &second), &first);
        assert_eq!(forward.row_ids(), reverse.row_ids());
        assert_eq!(forward.row_ids(), &[2, 4]);
    }

    #[test]
    fn missing_year_never_matches_year_selection() {
        let dataset = dataset();
        let selections = FilterSelections {
            years: [2021, 2022].into(),
            ..FilterSelections::default()
        };
        let view = apply_filters(dataset.view(), &selections);
        assert!(!view.row_ids().contains(&3));
    }

    #[test]
    fn unknown_value_produces_empty_view() {
        let dataset = dataset();
        let selections = FilterSelections {
            vehicle_types: ["HOVERCRAFT".to_string()].into(),
            ..FilterSelections::default()
        };
        let view = apply_filters(dataset.view(), &selections);
        assert!(view.is_empty());
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn injury_selection_is_ignored_without_injury_column() {
        let columns: BTreeSet<Column> = Column::all()
            .iter()
            .copied()
            .filter(|c| *c != Column::PersonInjury)
            .collect();
        let records = vec![
            CrashRecord {
                persons_injured: 1,
                ..CrashRecord::default()
            },
            CrashRecord::default(),
        ];
        let dataset = Dataset::new(records, columns);
        let selections = FilterSelections {
            injury_types: [PersonInjury::Injured].into(),
            ..FilterSelections::default()
        };
        let view = apply_filters(dataset.view(), &selections);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn injury_selection_applies_when_injury_column_present() {
        let dataset = Dataset::from_records(vec![
            CrashRecord {
                person_injury: PersonInjury::Injured,
                ..CrashRecord::default()
            },
            CrashRecord::default(),
        ]);
        let selections = FilterSelections {
            injury_types: [PersonInjury::Injured].into(),
            ..FilterSelections::default()
        };
        let view = apply_filters(dataset.view(), &selections);
        assert_eq!(view.row_ids(), &[0]);
    }

    #[test]
    fn active_dimensions_follow_declaration_order() {
        let selections = FilterSelections {
            injury_types: [PersonInjury::Killed].into(),
            boroughs: [Borough::Bronx].into(),
            ..FilterSelections::default()
        };
        assert_eq!(
            selections.active_dimensions(),
            vec![Dimension::Borough, Dimension::InjuryType]
        );
    }
}
