//! Client-side search and sort over accumulated entity lists
//!
//! Search and sort never reach the server. Server-side filters are
//! described by [`ListFilter`] and only ever travel as query parameters.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Language;

/// Entities that take part in free-text search
pub trait Searchable {
    /// Values checked against each search term
    fn search_fields(&self) -> Vec<&str>;
}

/// Value produced by a typed sort accessor
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(Decimal),
    Date(DateTime<Utc>),
    /// Present but not orderable by the list sort
    Text(String),
    Empty,
}

impl From<i64> for SortValue {
    fn from(v: i64) -> Self {
        SortValue::Number(Decimal::from(v))
    }
}

impl From<Decimal> for SortValue {
    fn from(v: Decimal) -> Self {
        SortValue::Number(v)
    }
}

impl From<f64> for SortValue {
    fn from(v: f64) -> Self {
        Decimal::from_f64_retain(v)
            .map(SortValue::Number)
            .unwrap_or(SortValue::Empty)
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(v: DateTime<Utc>) -> Self {
        SortValue::Date(v)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SortValue::Empty)
    }
}

/// Typed sort field of an entity list
pub trait SortKey: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every key offered in the sort panel, in display order
    fn all() -> &'static [Self];

    /// Stable identifier of the key
    fn value(&self) -> &'static str;

    fn label(&self, lang: Language) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.value() == value)
    }
}

/// Entities that can be ordered by a typed key
pub trait Sortable {
    type Key: SortKey;

    fn sort_value(&self, key: Self::Key) -> SortValue;
}

/// Server-side filter set of an entity list
pub trait ListFilter: Serialize + Clone + PartialEq + Default + Debug + Send + Sync {}

impl<T> ListFilter for T where T: Serialize + Clone + PartialEq + Default + Debug + Send + Sync {}

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Split a query into lowercase terms, dropping empty ones
pub fn search_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Every term must occur in at least one field
pub fn matches_terms<T: Searchable + ?Sized>(item: &T, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let fields: Vec<String> = item
        .search_fields()
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    terms
        .iter()
        .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
}

pub fn matches_search<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    matches_terms(item, &search_terms(query))
}

/// Orderable projection of a homogeneous column. Empty values sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Comparable {
    Empty,
    Number(Decimal),
    Date(DateTime<Utc>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Undetermined,
    Numeric,
    Temporal,
    Unsupported,
}

fn column_kind(values: &[SortValue]) -> ColumnKind {
    values.iter().fold(ColumnKind::Undetermined, |kind, value| {
        match (kind, value) {
            (ColumnKind::Unsupported, _) | (_, SortValue::Text(_)) => ColumnKind::Unsupported,
            (kind, SortValue::Empty) => kind,
            (ColumnKind::Undetermined | ColumnKind::Numeric, SortValue::Number(_)) => {
                ColumnKind::Numeric
            }
            (ColumnKind::Undetermined | ColumnKind::Temporal, SortValue::Date(_)) => {
                ColumnKind::Temporal
            }
            _ => ColumnKind::Unsupported,
        }
    })
}

/// Stable sort by a typed key.
///
/// Leaves the order untouched when the column mixes numbers and dates or
/// holds values that are not orderable.
pub fn sort_items<T: Sortable>(items: &mut Vec<T>, key: T::Key, order: SortOrder) {
    let values: Vec<SortValue> = items.iter().map(|item| item.sort_value(key)).collect();
    match column_kind(&values) {
        ColumnKind::Numeric | ColumnKind::Temporal => {}
        ColumnKind::Undetermined | ColumnKind::Unsupported => return,
    }

    let mut keyed: Vec<(Comparable, T)> = values
        .into_iter()
        .map(|value| match value {
            SortValue::Number(n) => Comparable::Number(n),
            SortValue::Date(d) => Comparable::Date(d),
            SortValue::Text(_) | SortValue::Empty => Comparable::Empty,
        })
        .zip(items.drain(..))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match order {
        SortOrder::Asc => a.cmp(b),
        SortOrder::Desc => b.cmp(a),
    });

    items.extend(keyed.into_iter().map(|(_, item)| item));
}

/// Search then sort, returning owned clones for display
pub fn project<T>(items: &[T], query: &str, sort: Option<(T::Key, SortOrder)>) -> Vec<T>
where
    T: Searchable + Sortable + Clone,
{
    let terms = search_terms(query);
    let mut visible: Vec<T> = items
        .iter()
        .filter(|item| matches_terms(*item, &terms))
        .cloned()
        .collect();
    if let Some((key, order)) = sort {
        sort_items(&mut visible, key, order);
    }
    visible
}
