#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! KPI, chart and filter-option result types for the collision dashboard.
//!
//! These are the values handed to the presentation layer. Every chart
//! payload is wrapped in a [`Section`] so that "nothing matched" and "the
//! source never had that column" are explicit states rather than empty
//! vectors the renderer has to interpret.

use collision_dash_collision_models::{Borough, Column, PersonInjury, PersonSex};
use serde::{Deserialize, Serialize};

/// Label shown when no borough qualifies as most dangerous.
pub const NOT_APPLICABLE: &str = "N/A";

/// State of one chart payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Section<T> {
    /// Data is available.
    Ready {
        /// The chart payload.
        data: T,
    },
    /// The filtered view produced nothing to show.
    NoData,
    /// The dataset lacks a column this chart needs.
    #[serde(rename_all = "camelCase")]
    Unavailable {
        /// The first missing column.
        missing_column: Column,
    },
}

impl<T> Section<T> {
    /// Returns the payload if ready.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready { data } => Some(data),
            Self::NoData | Self::Unavailable { .. } => None,
        }
    }

    /// Whether the payload is ready.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Whether this section signals "no data".
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl<T> Section<Vec<T>> {
    /// Wraps rows, mapping an empty list to [`Section::NoData`].
    #[must_use]
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Self::NoData
        } else {
            Self::Ready { data: rows }
        }
    }
}

/// Count of rows in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value as stored (e.g. `"SEDAN"`).
    pub category: String,
    /// Number of rows.
    pub count: u64,
}

/// A yearly time-series point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Crash year.
    pub year: i32,
    /// Number of rows in that year.
    pub count: u64,
}

/// Injury outcome counts for one sex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderInjuryCounts {
    /// `M` or `F`.
    pub sex: PersonSex,
    /// Display label (`"Male"` / `"Female"`).
    pub label: String,
    /// Uninjured persons.
    pub uninjured: u64,
    /// Injured persons.
    pub injured: u64,
    /// Killed persons.
    pub killed: u64,
}

/// One plotted crash location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Borough, for hover text.
    pub borough: Borough,
    /// Vehicle type, for hover text.
    pub vehicle_type: String,
}

/// A reproducible sample of in-bounds crash locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    /// Rows with valid in-bounds coordinates before sampling.
    pub valid_rows: u64,
    /// Sampled points, in dataset order.
    pub points: Vec<LocationPoint>,
}

/// Everything the dashboard shows for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Number of rows in the view.
    pub total_crashes: u64,
    /// Sum of persons injured.
    pub total_injuries: u64,
    /// Sum of persons killed.
    pub total_fatalities: u64,
    /// Borough with the most fatalities, if any borough has more than zero.
    pub most_dangerous_borough: Option<Borough>,
    /// Top boroughs by row count.
    pub by_borough: Section<Vec<CategoryCount>>,
    /// Rows per year, ascending.
    pub by_year: Section<Vec<YearCount>>,
    /// Top person types by row count.
    pub by_person_type: Section<Vec<CategoryCount>>,
    /// Top contributing factors by row count.
    pub by_contributing_factor: Section<Vec<CategoryCount>>,
    /// Top vehicle types by row count.
    pub by_vehicle_type: Section<Vec<CategoryCount>>,
    /// Injury outcomes per sex.
    pub by_gender: Section<Vec<GenderInjuryCounts>>,
    /// Sampled crash locations.
    pub locations: Section<LocationSample>,
}

impl AggregateResult {
    /// Most dangerous borough as display text, [`NOT_APPLICABLE`] when
    /// there is none.
    #[must_use]
    pub fn most_dangerous_borough_label(&self) -> &str {
        self.most_dangerous_borough
            .as_ref()
            .map_or(NOT_APPLICABLE, |borough| borough.as_ref())
    }
}

/// Inclusive latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_latitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
    /// Western edge.
    pub min_longitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
}

impl BoundingBox {
    /// The five boroughs.
    pub const NYC: Self = Self {
        min_latitude: 40.5,
        max_latitude: 40.9,
        min_longitude: -74.25,
        max_longitude: -73.7,
    };

    /// Whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::NYC
    }
}

/// Tunables for [`AggregateResult`] computation.
///
/// Field names stay `snake_case` on the wire because this is loaded from
/// TOML config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Boroughs kept before sentinel removal.
    pub borough_top_n: usize,
    /// Vehicle types kept before sentinel removal.
    pub vehicle_type_top_n: usize,
    /// Contributing factors kept before sentinel removal.
    pub contributing_factor_top_n: usize,
    /// Person types kept before sentinel removal.
    pub person_type_top_n: usize,
    /// Maximum number of plotted locations.
    pub location_sample_size: usize,
    /// Seed for the location sample.
    pub location_sample_seed: u64,
    /// Valid coordinate range.
    pub bounds: BoundingBox,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            borough_top_n: 10,
            vehicle_type_top_n: 10,
            contributing_factor_top_n: 10,
            person_type_top_n: 6,
            location_sample_size: 1000,
            location_sample_seed: 42,
            bounds: BoundingBox::NYC,
        }
    }
}

/// One dropdown choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption<T> {
    /// Display text.
    pub label: String,
    /// Value sent back in the filter selection.
    pub value: T,
}

/// Choices for every filter dropdown, derived from the full dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Boroughs present, sorted.
    pub boroughs: Vec<FilterOption<Borough>>,
    /// Years present, ascending.
    pub years: Vec<FilterOption<i32>>,
    /// Most common vehicle types.
    pub vehicle_types: Vec<FilterOption<String>>,
    /// Person types present, sorted.
    pub person_types: Vec<FilterOption<String>>,
    /// `M` and/or `F`, whichever are present.
    pub genders: Vec<FilterOption<PersonSex>>,
    /// Most common contributing factors.
    pub contributing_factors: Vec<FilterOption<String>>,
    /// Injury outcomes present, sorted. Empty when the source had no
    /// injury column.
    pub injury_types: Vec<FilterOption<PersonInjury>>,
}
