#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable in-memory collision dataset and filtered views over it.
//!
//! A [`Dataset`] is built once at startup and never mutated afterwards, so
//! it can be shared by reference (or behind an `Arc`) across any number of
//! concurrent requests. Each request narrows a [`View`], which is nothing
//! more than a list of row indices borrowing the dataset.

use std::collections::BTreeSet;

use collision_dash_collision_models::{Column, CrashRecord};

/// The loaded collision table plus the set of columns its source supplied.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CrashRecord>,
    columns: BTreeSet<Column>,
}

impl Dataset {
    /// Creates a dataset from normalized records and the columns that were
    /// actually present upstream.
    #[must_use]
    pub fn new(records: Vec<CrashRecord>, columns: BTreeSet<Column>) -> Self {
        let missing: Vec<Column> = Column::all()
            .iter()
            .copied()
            .filter(|c| !columns.contains(c))
            .collect();
        if !missing.is_empty() {
            log::debug!("Dataset built without columns: {missing:?}");
        }
        log::debug!("Dataset built with {} records", records.len());

        Self { records, columns }
    }

    /// Creates a dataset that claims every column.
    #[must_use]
    pub fn from_records(records: Vec<CrashRecord>) -> Self {
        Self::new(records, Column::all().iter().copied().collect())
    }

    /// An empty dataset with the full schema.
    ///
    /// Stands in for a failed upstream load: every aggregate over it
    /// degrades to its "no data" form.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the upstream source supplied `column`.
    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Returns the first of `required` that the source did not supply.
    #[must_use]
    pub fn first_missing(&self, required: &[Column]) -> Option<Column> {
        required.iter().copied().find(|c| !self.has_column(*c))
    }

    /// A view selecting every row.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        View {
            dataset: self,
            rows: (0..self.records.len()).collect(),
        }
    }
}

/// A read-only selection of rows over a [`Dataset`].
///
/// Views never copy records; narrowing one only drops indices.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> View<'a> {
    /// The dataset this view selects from.
    #[must_use]
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Selected row indices, ascending.
    #[must_use]
    pub fn row_ids(&self) -> &[usize] {
        &self.rows
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the selected records in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CrashRecord> + '_ {
        let records = self.dataset.records();
        self.rows.iter().map(move |&i| &records[i])
    }

    /// Keeps only the rows matching `predicate`.
    #[must_use]
    pub fn filter(mut self, predicate: impl Fn(&CrashRecord) -> bool) -> Self {
        let records = self.dataset.records();
        self.rows.retain(|&i| predicate(&records[i]));
        self
    }
}
