//! Page metadata for list screens.
//!
//! Two strategies coexist. [`PaginationStrategy::CountBased`] needs the exact
//! row count and derives everything from it. [`PaginationStrategy::LengthHeuristic`]
//! is used when the exact count was not requested: it assumes another page
//! exists whenever the current one came back full, so it reports `has_next`
//! on a last page that happens to hold exactly `limit` rows.

use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStrategy {
    #[default]
    CountBased,
    LengthHeuristic,
}

impl PaginationStrategy {
    /// `total` is only read by the count based strategy, `results_len` only by
    /// the heuristic.
    pub fn describe(
        &self,
        page: usize,
        limit: usize,
        total: usize,
        results_len: usize,
    ) -> PageDescriptor {
        match self {
            PaginationStrategy::CountBased => describe(page, limit, total),
            PaginationStrategy::LengthHeuristic => describe_by_length(page, limit, results_len),
        }
    }

    pub fn needs_exact_count(&self) -> bool {
        matches!(self, PaginationStrategy::CountBased)
    }
}

impl fmt::Display for PaginationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationStrategy::CountBased => write!(f, "count_based"),
            PaginationStrategy::LengthHeuristic => write!(f, "length_heuristic"),
        }
    }
}

impl FromStr for PaginationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "count_based" | "count" => Ok(PaginationStrategy::CountBased),
            "length_heuristic" | "length" => Ok(PaginationStrategy::LengthHeuristic),
            other => Err(format!("unknown pagination strategy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub page: usize,
    pub limit: usize,
    /// Unknown under the length heuristic.
    pub total: Option<usize>,
    pub total_pages: Option<usize>,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Count based page metadata. `page` below 1 is read as 1 and `limit` below 1 as 1.
pub fn describe(page: usize, limit: usize, total: usize) -> PageDescriptor {
    let page = page.max(1);
    let limit = limit.max(1);
    let total_pages = total.div_ceil(limit);
    PageDescriptor {
        page,
        limit,
        total: Some(total),
        total_pages: Some(total_pages),
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

/// Page metadata when only the length of the fetched page is known.
pub fn describe_by_length(page: usize, limit: usize, results_len: usize) -> PageDescriptor {
    let page = page.max(1);
    let limit = limit.max(1);
    PageDescriptor {
        page,
        limit,
        total: None,
        total_pages: None,
        has_next: results_len == limit,
        has_prev: page > 1,
    }
}

/// Page and page size asked for by a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }.clamped()
    }

    /// Page at least 1, limit between 1 and [`MAX_PAGE_LIMIT`].
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Saturates for page numbers past the addressable range, which then
    /// select no rows.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.limit)
    }

    /// Inclusive row range, as the query builder's `range(from, to)` takes it.
    pub fn range(&self) -> (usize, usize) {
        let from = self.offset();
        (from, from.saturating_add(self.limit.max(1) - 1))
    }
}

/// One fetched page together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub descriptor: PageDescriptor,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            descriptor: self.descriptor,
        }
    }
}
