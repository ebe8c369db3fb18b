#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Collision record schema and canonical categorical values.
//!
//! This crate defines the one-row-per-person collision record that every
//! other crate in the workspace consumes. Upstream loaders normalize raw
//! NYC crash/vehicle/person columns into these types; the query and
//! analytics crates never see raw spellings.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder for a missing or unclassified categorical value.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder used by the source data for an unstated contributing factor.
pub const UNSPECIFIED: &str = "Unspecified";

/// Returns `true` if `value` equals any of `sentinels`, ignoring ASCII case.
///
/// Upstream data carries both `Unknown` and `UNKNOWN` spellings, so all
/// sentinel checks go through this helper.
#[must_use]
pub fn is_sentinel(value: &str, sentinels: &[&str]) -> bool {
    sentinels.iter().any(|s| value.eq_ignore_ascii_case(s))
}

/// NYC borough of the crash.
///
/// Variants are declared alphabetically by canonical name so the derived
/// ordering matches a sort on the displayed value.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Borough {
    /// The Bronx
    Bronx,
    /// Brooklyn (Kings County)
    Brooklyn,
    /// Manhattan (New York County)
    Manhattan,
    /// Queens
    Queens,
    /// Staten Island (Richmond County)
    #[serde(rename = "STATEN ISLAND")]
    #[strum(serialize = "STATEN ISLAND")]
    StatenIsland,
    /// Borough missing or outside the five boroughs
    #[default]
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl Borough {
    /// Returns the five real boroughs (no sentinel).
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bronx,
            Self::Brooklyn,
            Self::Manhattan,
            Self::Queens,
            Self::StatenIsland,
        ]
    }

    /// Maps a raw borough string to its canonical value, falling back to
    /// [`Borough::Unknown`] for anything outside the five boroughs.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Unknown)
    }
}

/// Sex of the person involved, normalized to three values.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(ascii_case_insensitive)]
pub enum PersonSex {
    /// Female
    F,
    /// Male
    M,
    /// Missing, `U`, or any other raw spelling
    #[default]
    Unknown,
}

impl PersonSex {
    /// Canonicalizes a raw sex value (`"Male"`, `"FEMALE"`, `"U"`, ...).
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Self::M,
            "F" | "FEMALE" => Self::F,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label used by filter dropdowns and charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::F => "Female",
            Self::M => "Male",
            Self::Unknown => UNKNOWN,
        }
    }
}

/// Per-person injury outcome.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PersonInjury {
    /// Person was injured
    Injured,
    /// Person was killed
    Killed,
    /// Person was not injured
    Uninjured,
    /// Outcome not recorded
    #[default]
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl PersonInjury {
    /// Maps a raw injury string to its canonical value.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Unknown)
    }
}

/// Logical columns of the collision table.
///
/// A dataset remembers which of these its source actually supplied so
/// that aggregates depending on an absent column can report it instead
/// of silently computing over placeholders.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Column {
    Borough,
    CrashDate,
    VehicleType,
    ContributingFactor,
    PersonType,
    PersonSex,
    PersonInjury,
    PersonsInjured,
    PersonsKilled,
    Latitude,
    Longitude,
}

impl Column {
    /// Header name(s) the column appears under in the merged CSV export.
    ///
    /// The first entry is the preferred spelling; later entries are
    /// accepted aliases (the crash date picks up a `_x` or `_CRASH` suffix
    /// when the crash and person tables are merged).
    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Borough => &["BOROUGH"],
            Self::CrashDate => &["CRASH_DATE", "CRASH_DATE_x", "CRASH_DATE_CRASH"],
            Self::VehicleType => &["VEHICLE_TYPE_CODE_1"],
            Self::ContributingFactor => &["CONTRIBUTING_FACTOR_VEHICLE_1"],
            Self::PersonType => &["PERSON_TYPE"],
            Self::PersonSex => &["PERSON_SEX"],
            Self::PersonInjury => &["PERSON_INJURY"],
            Self::PersonsInjured => &["NUMBER_OF_PERSONS_INJURED"],
            Self::PersonsKilled => &["NUMBER_OF_PERSONS_KILLED"],
            Self::Latitude => &["LATITUDE"],
            Self::Longitude => &["LONGITUDE"],
        }
    }

    /// Whether a loader may omit this column without failing.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::PersonInjury | Self::Latitude | Self::Longitude)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Borough,
            Self::CrashDate,
            Self::VehicleType,
            Self::ContributingFactor,
            Self::PersonType,
            Self::PersonSex,
            Self::PersonInjury,
            Self::PersonsInjured,
            Self::PersonsKilled,
            Self::Latitude,
            Self::Longitude,
        ]
    }
}

/// One person-level row of the merged collision dataset.
///
/// Categorical fields are already canonical: open-vocabulary strings use
/// [`UNKNOWN`] (or [`UNSPECIFIED`] for the contributing factor) instead of
/// empty values, and counts are never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecord {
    /// Borough of the crash.
    pub borough: Borough,
    /// Crash year, `None` when the crash date could not be parsed.
    pub year: Option<i32>,
    /// Vehicle type of the first vehicle (e.g. `"SEDAN"`).
    pub vehicle_type: String,
    /// Contributing factor of the first vehicle.
    pub contributing_factor: String,
    /// Person role (e.g. `"PEDESTRIAN"`, `"DRIVER"`).
    pub person_type: String,
    /// Sex of the person.
    pub person_sex: PersonSex,
    /// Injury outcome for the person.
    pub person_injury: PersonInjury,
    /// Number of persons injured in the crash.
    pub persons_injured: u32,
    /// Number of persons killed in the crash.
    pub persons_killed: u32,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
}

impl Default for CrashRecord {
    fn default() -> Self {
        Self {
            borough: Borough::Unknown,
            year: None,
            vehicle_type: UNKNOWN.to_string(),
            contributing_factor: UNKNOWN.to_string(),
            person_type: UNKNOWN.to_string(),
            person_sex: PersonSex::Unknown,
            person_injury: PersonInjury::Unknown,
            persons_injured: 0,
            persons_killed: 0,
            latitude: None,
            longitude: None,
        }
    }
}
