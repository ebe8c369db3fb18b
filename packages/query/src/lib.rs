#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query layer for the collision dashboard.
//!
//! Turns one dashboard request (a free-text search plus per-dimension
//! dropdown selections) into a filtered [`View`] over the shared dataset.
//! The free-text side lives in [`search`]; the dropdown side in
//! [`filters`].

pub mod filters;
pub mod search;

use collision_dash_dataset::{Dataset, View};
use serde::{Deserialize, Serialize};

pub use filters::{Dimension, FilterSelections, apply_filters};
pub use search::{Restriction, apply_search, parse_search};

/// Everything a user can submit from the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    /// Free-text search, if any.
    #[serde(default)]
    pub query: Option<String>,
    /// Dropdown selections.
    #[serde(flatten)]
    pub filters: FilterSelections,
}

impl DashboardRequest {
    /// Runs the search and then the dropdown filters over the whole
    /// dataset.
    #[must_use]
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> View<'a> {
        let view = match self.query.as_deref() {
            Some(query) => apply_search(query, dataset.view()),
            None => dataset.view(),
        };
        let view = apply_filters(view, &self.filters);
        log::debug!("Request matched {} of {} rows", view.len(), dataset.len());
        view
    }
}
