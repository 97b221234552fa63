//! Common types used across the client, the WASM bindings and tests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Backend identifier type for every entity
pub type Id = i64;

/// Supported interface languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ukrainian,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ukrainian => "uk",
            Language::English => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "uk" | "ua" | "ukrainian" => Some(Language::Ukrainian),
            "en" | "english" => Some(Language::English),
            _ => None,
        }
    }

    /// Pick the text matching this language
    pub fn pick<'a>(&self, uk: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Ukrainian => uk,
            Language::English => en,
        }
    }
}

/// One page of a server-side paginated collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub has_next: bool,
}

/// Date range for report queries (inclusive)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, &'static str> {
        if end < start {
            return Err("Range end must not precede its start");
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
