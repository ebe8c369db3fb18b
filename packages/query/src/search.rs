//! Free-text search parsing.
//!
//! Maps a loosely phrased query such as `"brooklyn 2022 pedestrian injured"`
//! onto a list of [`Restriction`]s. Detection is keyword based and
//! case-insensitive; anything the parser does not recognize is ignored, so
//! an unrecognized query leaves the view untouched.
//!
//! Detection runs through [`SEARCH_STAGES`] in order. Each stage inspects
//! the normalized query and yields zero or more restrictions; restrictions
//! from all stages are applied one after another, which composes as an
//! intersection.

use std::sync::LazyLock;

use collision_dash_collision_models::{Borough, CrashRecord, PersonInjury, PersonSex};
use collision_dash_dataset::View;
use regex::Regex;
use strum_macros::{AsRefStr, Display};

/// First standalone `20xx` token in the query.
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("valid regex"));

/// Borough phrases, checked in order; the first hit wins.
const BOROUGH_PHRASES: &[(&str, Borough)] = &[
    ("manhattan", Borough::Manhattan),
    ("brooklyn", Borough::Brooklyn),
    ("queens", Borough::Queens),
    ("bronx", Borough::Bronx),
    ("staten island", Borough::StatenIsland),
    ("staten", Borough::StatenIsland),
];

/// Gender keywords, checked in order; the first hit wins.
const GENDER_KEYWORDS: &[(&str, PersonSex)] = &[
    ("male", PersonSex::M),
    ("man", PersonSex::M),
    ("men", PersonSex::M),
    ("female", PersonSex::F),
    ("woman", PersonSex::F),
    ("women", PersonSex::F),
];

/// Person-type keyword groups. Every matching group applies.
const PERSON_TYPE_KEYWORDS: &[(&[&str], &str)] = &[
    (&["pedestrian"], "PEDESTRIAN"),
    (&["cyclist", "bicycle", "bike"], "BICYCLIST"),
    (&["driver"], "DRIVER"),
    (&["passenger"], "PASSENGER"),
];

/// Vehicle keywords, checked in order; the first hit wins.
const VEHICLE_KEYWORDS: &[(&str, &str)] = &[
    ("taxi", "TAXI"),
    ("sedan", "SEDAN"),
    ("suv", "SPORT UTILITY / STATION WAGON"),
    ("truck", "PICK-UP TRUCK"),
    ("van", "VAN"),
    ("bus", "BUS"),
    ("motorcycle", "MOTORCYCLE"),
    ("bicycle", "BICYCLE"),
];

/// Detection stages, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Borough,
    Gender,
    Year,
    PersonType,
    Injury,
    VehicleType,
}

/// A single predicate produced by the search parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// Exact borough.
    Borough(Borough),
    /// Exact person sex.
    Gender(PersonSex),
    /// Exact crash year. Rows without a year never match.
    Year(i32),
    /// Exact person type (canonical upper-case spelling).
    PersonType(&'static str),
    /// Anyone hurt: crash-level injured count above zero, or the person
    /// was recorded as injured.
    Injured,
    /// Person recorded as uninjured.
    Uninjured,
    /// Anyone killed: crash-level killed count above zero, or the person
    /// was recorded as killed.
    Killed,
    /// Exact vehicle type (canonical upper-case spelling).
    VehicleType(&'static str),
}

impl Restriction {
    /// Whether `record` satisfies this restriction.
    #[must_use]
    pub fn matches(&self, record: &CrashRecord) -> bool {
        match *self {
            Self::Borough(borough) => record.borough == borough,
            Self::Gender(sex) => record.person_sex == sex,
            Self::Year(year) => record.year == Some(year),
            Self::PersonType(person_type) => record.person_type == person_type,
            Self::Injured => {
                record.persons_injured > 0 || record.person_injury == PersonInjury::Injured
            }
            Self::Uninjured => record.person_injury == PersonInjury::Uninjured,
            Self::Killed => record.persons_killed > 0 || record.person_injury == PersonInjury::Killed,
            Self::VehicleType(vehicle_type) => record.vehicle_type == vehicle_type,
        }
    }
}

impl std::fmt::Display for Restriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Borough(borough) => write!(f, "borough = {borough}"),
            Self::Gender(sex) => write!(f, "person_sex = {sex}"),
            Self::Year(year) => write!(f, "year = {year}"),
            Self::PersonType(person_type) => write!(f, "person_type = {person_type}"),
            Self::Injured => write!(f, "injured"),
            Self::Uninjured => write!(f, "uninjured"),
            Self::Killed => write!(f, "killed"),
            Self::VehicleType(vehicle_type) => write!(f, "vehicle_type = {vehicle_type}"),
        }
    }
}

/// One entry of the detection table.
pub struct SearchStage {
    /// Which stage this is.
    pub stage: Stage,
    /// Inspects the normalized query and returns the restrictions it implies.
    pub detect: fn(&str) -> Vec<Restriction>,
}

/// The detection table, iterated once per query in this order.
pub const SEARCH_STAGES: &[SearchStage] = &[
    SearchStage {
        stage: Stage::Borough,
        detect: detect_borough,
    },
    SearchStage {
        stage: Stage::Gender,
        detect: detect_gender,
    },
    SearchStage {
        stage: Stage::Year,
        detect: detect_year,
    },
    SearchStage {
        stage: Stage::PersonType,
        detect: detect_person_types,
    },
    SearchStage {
        stage: Stage::Injury,
        detect: detect_injury,
    },
    SearchStage {
        stage: Stage::VehicleType,
        detect: detect_vehicle_type,
    },
];

fn detect_borough(query: &str) -> Vec<Restriction> {
    BOROUGH_PHRASES
        .iter()
        .find(|(phrase, _)| query.contains(phrase))
        .map(|(_, borough)| Restriction::Borough(*borough))
        .into_iter()
        .collect()
}

/// Gender keywords must stand alone (`"female"` contains `"male"` and
/// `"manhattan"` contains `"man"`), optionally pluralized with a trailing `s`.
fn detect_gender(query: &str) -> Vec<Restriction> {
    GENDER_KEYWORDS
        .iter()
        .find(|(keyword, _)| {
            words(query)
                .any(|word| word == *keyword || word.strip_suffix('s') == Some(*keyword))
        })
        .map(|(_, sex)| Restriction::Gender(*sex))
        .into_iter()
        .collect()
}

fn detect_year(query: &str) -> Vec<Restriction> {
    YEAR_RE
        .captures(query)
        .and_then(|caps| caps[1].parse().ok())
        .map(Restriction::Year)
        .into_iter()
        .collect()
}

fn detect_person_types(query: &str) -> Vec<Restriction> {
    PERSON_TYPE_KEYWORDS
        .iter()
        .filter(|(keywords, _)| contains_any(query, keywords))
        .map(|(_, person_type)| Restriction::PersonType(*person_type))
        .collect()
}

fn detect_injury(query: &str) -> Vec<Restriction> {
    let mut restrictions = Vec::new();
    if contains_any(query, &["injured", "injury"]) {
        restrictions.push(Restriction::Injured);
    }
    if query.contains("uninjured") {
        restrictions.push(Restriction::Uninjured);
    }
    if contains_any(query, &["killed", "fatal", "death"]) {
        restrictions.push(Restriction::Killed);
    }
    restrictions
}

fn detect_vehicle_type(query: &str) -> Vec<Restriction> {
    VEHICLE_KEYWORDS
        .iter()
        .find(|(keyword, _)| query.contains(keyword))
        .map(|(_, vehicle_type)| Restriction::VehicleType(*vehicle_type))
        .into_iter()
        .collect()
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Alphanumeric tokens of `haystack`.
fn words(haystack: &str) -> impl Iterator<Item = &str> {
    haystack.split(|c: char| !c.is_alphanumeric())
}

/// Lower-cases and trims a raw query.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Parses a free-text query into restrictions, in application order.
///
/// Returns an empty list for blank or unrecognized input.
#[must_use]
pub fn parse_search(query: &str) -> Vec<Restriction> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return Vec::new();
    }

    SEARCH_STAGES
        .iter()
        .flat_map(|stage| {
            let found = (stage.detect)(&normalized);
            for restriction in &found {
                log::trace!("Stage {}: detected {restriction}", stage.stage);
            }
            found
        })
        .collect()
}

/// Narrows `view` by every restriction found in `query`.
///
/// Never fails: a blank or unrecognized query returns `view` unchanged.
#[must_use]
pub fn apply_search<'a>(query: &str, view: View<'a>) -> View<'a> {
    let restrictions = parse_search(query);
    if restrictions.is_empty() {
        log::debug!("No search keywords recognized in {query:?}");
        return view;
    }

    log::debug!("Parsing search query {query:?} over {} rows", view.len());

    restrictions.iter().fold(view, |view, restriction| {
        let narrowed = view.filter(|record| restriction.matches(record));
        log::debug!("After {restriction} filter: {} rows", narrowed.len());
        narrowed
    })
}
