use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter options: the distinct values a user can pick from
// ---------------------------------------------------------------------------

/// Sorted distinct values of the four filterable columns.
///
/// Years sort numerically, the string columns lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: BTreeSet<i32>,
    pub seniorities: BTreeSet<String>,
    pub contracts: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[Record]) -> Self {
        let mut options = FilterOptions::default();
        for r in records {
            options.years.insert(r.year);
            options.seniorities.insert(r.seniority.clone());
            options.contracts.insert(r.contract_type.clone());
            options.sizes.insert(r.company_size.clone());
        }
        options
    }
}

// ---------------------------------------------------------------------------
// Filter selection: which values are currently picked per column
// ---------------------------------------------------------------------------

/// The user's picks for each filterable column.
///
/// An empty set means nothing is selected for that column, so no record
/// passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub seniorities: BTreeSet<String>,
    pub contracts: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
}

impl FilterSelection {
    /// Every distinct value selected: the identity selection shown on first load.
    pub fn all(options: &FilterOptions) -> Self {
        FilterSelection {
            years: options.years.clone(),
            seniorities: options.seniorities.clone(),
            contracts: options.contracts.clone(),
            sizes: options.sizes.clone(),
        }
    }

    /// Whether every pick is one of the offered values.
    pub fn is_within(&self, options: &FilterOptions) -> bool {
        self.years.is_subset(&options.years)
            && self.seniorities.is_subset(&options.seniorities)
            && self.contracts.is_subset(&options.contracts)
            && self.sizes.is_subset(&options.sizes)
    }

    /// Whether a record passes all four membership predicates.
    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&record.year)
            && self.seniorities.contains(&record.seniority)
            && self.contracts.contains(&record.contract_type)
            && self.sizes.contains(&record.company_size)
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The dataset restricted to the records passing a selection.
///
/// Holds indices into the borrowed dataset, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Indices of the surviving records in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Surviving records, in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Apply the conjunction of the four column predicates.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}
