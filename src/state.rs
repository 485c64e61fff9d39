use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DEFAULT_TARGET_ROLE;
use crate::data::aggregate::DashboardViews;
use crate::data::filter::{filter, FilterSelection};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One of the four filterable columns, as addressed by the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Year,
    Seniority,
    Contract,
    Size,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 4] = [
        FilterColumn::Year,
        FilterColumn::Seniority,
        FilterColumn::Contract,
        FilterColumn::Size,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterColumn::Year => "Year",
            FilterColumn::Seniority => "Seniority",
            FilterColumn::Contract => "Contract type",
            FilterColumn::Size => "Company size",
        }
    }
}

/// A filter value as shown in a widget. Years stay numeric so they sort
/// and match as integers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterValue {
    Year(i32),
    Text(String),
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Year(y) => write!(f, "{y}"),
            FilterValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The full UI state of one session, independent of rendering.
pub struct AppState {
    /// Loaded once at startup; shared read-only.
    pub dataset: Arc<Dataset>,

    /// Current picks per filterable column.
    pub selection: FilterSelection,

    /// Role whose per-country mean salary is mapped.
    pub target_role: String,

    /// Indices of records passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Metrics and chart views of the current selection.
    pub views: DashboardViews,

    /// Stable colours for the work-arrangement donut.
    pub remote_colors: ColorMap,

    /// Sorted distinct roles of the whole dataset, offered as map targets.
    pub roles: Vec<String>,
}

impl AppState {
    /// Start a session with every value selected.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let remote_colors = ColorMap::new(dataset.remote_types());
        let roles = dataset.roles().into_iter().map(str::to_string).collect();
        let mut state = Self {
            selection: FilterSelection::all(&dataset.options),
            target_role: DEFAULT_TARGET_ROLE.to_string(),
            visible_indices: Vec::new(),
            views: DashboardViews::default(),
            remote_colors,
            roles,
            dataset,
        };
        state.recompute();
        state
    }

    /// Rebuild the filtered view and every derived view from scratch.
    pub fn recompute(&mut self) {
        debug_assert!(self.selection.is_within(&self.dataset.options));
        let view = filter(&self.dataset, &self.selection);
        self.views = DashboardViews::compute(&view, &self.target_role);
        self.visible_indices = view.indices().to_vec();
        log::debug!(
            "Recomputed: {} of {} records visible ({} years, {} seniorities, {} contracts, {} sizes selected)",
            self.visible_indices.len(),
            self.dataset.len(),
            self.selection.years.len(),
            self.selection.seniorities.len(),
            self.selection.contracts.len(),
            self.selection.sizes.len(),
        );
    }

    /// Every value offered for a column, in display order.
    pub fn options(&self, column: FilterColumn) -> Vec<FilterValue> {
        let o = &self.dataset.options;
        match column {
            FilterColumn::Year => o.years.iter().map(|y| FilterValue::Year(*y)).collect(),
            FilterColumn::Seniority => text_values(&o.seniorities),
            FilterColumn::Contract => text_values(&o.contracts),
            FilterColumn::Size => text_values(&o.sizes),
        }
    }

    pub fn is_selected(&self, column: FilterColumn, value: &FilterValue) -> bool {
        let s = &self.selection;
        match (column, value) {
            (FilterColumn::Year, FilterValue::Year(y)) => s.years.contains(y),
            (FilterColumn::Seniority, FilterValue::Text(t)) => s.seniorities.contains(t),
            (FilterColumn::Contract, FilterValue::Text(t)) => s.contracts.contains(t),
            (FilterColumn::Size, FilterValue::Text(t)) => s.sizes.contains(t),
            _ => false,
        }
    }

    pub fn selected_count(&self, column: FilterColumn) -> usize {
        let s = &self.selection;
        match column {
            FilterColumn::Year => s.years.len(),
            FilterColumn::Seniority => s.seniorities.len(),
            FilterColumn::Contract => s.contracts.len(),
            FilterColumn::Size => s.sizes.len(),
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &FilterValue) {
        let s = &mut self.selection;
        match (column, value) {
            (FilterColumn::Year, FilterValue::Year(y)) => toggle(&mut s.years, *y),
            (FilterColumn::Seniority, FilterValue::Text(t)) => toggle(&mut s.seniorities, t.clone()),
            (FilterColumn::Contract, FilterValue::Text(t)) => toggle(&mut s.contracts, t.clone()),
            (FilterColumn::Size, FilterValue::Text(t)) => toggle(&mut s.sizes, t.clone()),
            _ => {
                log::warn!("Ignoring {value} for the {} filter", column.label());
                return;
            }
        }
        self.recompute();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        let all = FilterSelection::all(&self.dataset.options);
        let s = &mut self.selection;
        match column {
            FilterColumn::Year => s.years = all.years,
            FilterColumn::Seniority => s.seniorities = all.seniorities,
            FilterColumn::Contract => s.contracts = all.contracts,
            FilterColumn::Size => s.sizes = all.sizes,
        }
        self.recompute();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        let s = &mut self.selection;
        match column {
            FilterColumn::Year => s.years.clear(),
            FilterColumn::Seniority => s.seniorities.clear(),
            FilterColumn::Contract => s.contracts.clear(),
            FilterColumn::Size => s.sizes.clear(),
        }
        self.recompute();
    }

    /// Back to the default selection: everything picked.
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::all(&self.dataset.options);
        self.recompute();
    }

    pub fn set_target_role(&mut self, role: String) {
        if role != self.target_role {
            self.target_role = role;
            self.recompute();
        }
    }
}

fn text_values(values: &BTreeSet<String>) -> Vec<FilterValue> {
    values.iter().cloned().map(FilterValue::Text).collect()
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn state() -> AppState {
        let mut scientist = record(2022, "Senior", "Data Scientist", 200.0);
        scientist.residence_country_code = "BRA".to_string();
        AppState::new(Arc::new(Dataset::from_records(vec![
            record(2021, "Junior", "Analyst", 100.0),
            scientist,
            record(2022, "Junior", "Data Engineer", 300.0),
        ])))
    }

    #[test]
    fn test_new_session_shows_everything() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.views.summary.record_count, 3);
        assert_eq!(s.target_role, "Data Scientist");
        assert_eq!(s.roles, vec!["Analyst", "Data Engineer", "Data Scientist"]);
        assert!(s.selection.is_within(&s.dataset.options));
    }

    #[test]
    fn test_toggle_recomputes() {
        let mut s = state();
        s.toggle_filter_value(FilterColumn::Year, &FilterValue::Year(2021));
        assert_eq!(s.visible_indices, vec![1, 2]);
        assert_eq!(s.views.summary.record_count, 2);

        s.toggle_filter_value(FilterColumn::Year, &FilterValue::Year(2021));
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn test_mismatched_value_is_ignored() {
        let mut s = state();
        s.toggle_filter_value(FilterColumn::Year, &FilterValue::Text("2021".to_string()));
        assert_eq!(s.selected_count(FilterColumn::Year), 2);
    }

    #[test]
    fn test_select_none_then_all() {
        let mut s = state();
        s.select_none(FilterColumn::Seniority);
        assert!(s.visible_indices.is_empty());
        assert!(s.views.top_roles.is_none());
        assert_eq!(s.views.summary.most_frequent_role, "");

        s.select_all(FilterColumn::Seniority);
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn test_reset_and_target_role() {
        let mut s = state();
        s.select_none(FilterColumn::Size);
        s.reset_filters();
        assert_eq!(s.selected_count(FilterColumn::Size), 1);

        let means = s.views.country_means.clone().unwrap();
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].key, "BRA");

        s.set_target_role("Analyst".to_string());
        let means = s.views.country_means.clone().unwrap();
        assert_eq!(means[0].key, "USA");
    }

    #[test]
    fn test_options_order() {
        let s = state();
        assert_eq!(
            s.options(FilterColumn::Year),
            vec![FilterValue::Year(2021), FilterValue::Year(2022)]
        );
        assert!(s.is_selected(FilterColumn::Seniority, &FilterValue::Text("Junior".into())));
    }
}
