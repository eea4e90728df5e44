//! Ranking and display ordering.
//!
//! Two orderings live here:
//!
//! - `compare_ranked`: the multi-key comparator used for ranked lists
//!   (keyed items first, key descending, then name; un-keyed items by name)
//! - `group_by_category`: the grid layout (priority categories first, the rest
//!   alphabetical, curated insertion order inside each group)
//!
//! Both return new orderings and never touch the items' values.

use std::cmp::Ordering;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::Indicator;

/// Anything that can be placed in a ranked list.
pub trait Ranked {
    /// Ranking key; `None` (or NaN) sorts after every keyed item.
    fn rank_key(&self) -> Option<f64>;
    fn rank_name(&self) -> &str;
}

impl Ranked for Indicator {
    fn rank_key(&self) -> Option<f64> {
        self.latest.as_ref().and_then(|o| o.mom_change)
    }

    fn rank_name(&self) -> &str {
        &self.series_name
    }
}

/// Locale-style name collation, in levels:
///
/// 1. base letters (accents and case folded away), so `éclair` sits with `e`
/// 2. accents, unaccented first
/// 3. case, lowercase first
/// 4. exact text, so the order stays total
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| a.nfd().flat_map(char::to_lowercase).cmp(b.nfd().flat_map(char::to_lowercase)))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

fn usable_key(key: Option<f64>) -> Option<f64> {
    key.filter(|k| !k.is_nan())
}

/// Total order over ranked items.
pub fn compare_ranked<T: Ranked + ?Sized>(a: &T, b: &T) -> Ordering {
    match (usable_key(a.rank_key()), usable_key(b.rank_key())) {
        (Some(ka), Some(kb)) => kb
            .partial_cmp(&ka)
            .unwrap_or(Ordering::Equal)
            .then_with(|| collate(a.rank_name(), b.rank_name())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate(a.rank_name(), b.rank_name()),
    }
}

/// Stable ranked copy of `items`.
pub fn rank_items<T: Ranked + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(compare_ranked);
    sorted
}

/// Order two category names for the grid.
pub fn compare_categories(a: &str, b: &str, priority: &[String]) -> Ordering {
    let pa = priority.iter().position(|p| p == a);
    let pb = priority.iter().position(|p| p == b);
    match (pa, pb) {
        (Some(ia), Some(ib)) => ia.cmp(&ib),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate(a, b),
    }
}

/// One grid section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup<T> {
    pub category: String,
    pub items: Vec<T>,
}

/// Group items by category, keeping each item's insertion position within its group.
pub fn group_by_category<T, F>(items: Vec<T>, category_of: F, priority: &[String]) -> Vec<CategoryGroup<T>>
where
    F: Fn(&T) -> &str,
{
    let mut groups: Vec<CategoryGroup<T>> = Vec::new();
    for item in items {
        let category = category_of(&item).to_string();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                category,
                items: vec![item],
            }),
        }
    }
    groups.sort_by(|a, b| compare_categories(&a.category, &b.category, priority));
    groups
}
