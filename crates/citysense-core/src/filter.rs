//! Filter composition for one dashboard refresh.

use citysense_store::ReadingFilter;

/// Build the filter every operation of a refresh shares.
///
/// A non-empty selection keeps readings whose area is one of the selected
/// values. An empty selection means "show all", not "show none", so callers
/// presenting a multi-select should default it to the full area list.
///
/// ```
/// use citysense_core::compose_filter;
///
/// assert!(compose_filter(&[] as &[&str]).selects_all_areas());
///
/// let filter = compose_filter(&["Market Area", "City Center"]);
/// assert_eq!(filter.areas.unwrap(), vec!["City Center", "Market Area"]);
/// ```
pub fn compose_filter<S: AsRef<str>>(selection: &[S]) -> ReadingFilter {
    ReadingFilter::new().areas(selection.iter().map(|s| s.as_ref().to_string()))
}
