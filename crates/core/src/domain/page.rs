//! Paging requests and results.
//!
//! A [`PageRequest`] describes a zero-based window (`offset = page * size`,
//! `limit = size`) plus a sort order. Two result shapes exist:
//!
//! - [`Page`]: content plus the total element count, so it knows the number of
//!   pages. Costs a count query unless the total can be derived from the window.
//! - [`Slice`]: content plus a `has_next` flag derived by over-fetching one row.
//!   Never issues a count query.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown sort direction: {}",
                other
            ))),
        }
    }
}

/// Single sort criterion.
///
/// `property` is resolved against the entity's sortable columns when the query
/// runs; it never reaches the SQL text unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Parses `property` or `property,asc|desc`
impl FromStr for Order {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(2, ',');
        let property = parts.next().unwrap_or_default().trim();
        if property.is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "Sort property missing in '{}'",
                s
            )));
        }

        let direction = match parts.next() {
            Some(dir) => dir.parse()?,
            None => Direction::Asc,
        };

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// Ordered list of sort criteria (empty = unsorted)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort(Vec<Order>);

impl Sort {
    pub fn unsorted() -> Self {
        Self(Vec::new())
    }

    /// Same direction for every listed property
    pub fn by(direction: Direction, properties: &[&str]) -> Self {
        Self(
            properties
                .iter()
                .map(|p| Order {
                    property: (*p).to_string(),
                    direction,
                })
                .collect(),
        )
    }

    pub fn and(mut self, order: Order) -> Self {
        self.0.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.0
    }

    pub fn is_unsorted(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Order>> for Sort {
    fn from(orders: Vec<Order>) -> Self {
        Self(orders)
    }
}

/// Zero-based page window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
}

impl PageRequest {
    /// Unsorted request. A page size of zero is rejected.
    pub fn of(page: u32, size: u32) -> Result<Self> {
        Self::sorted(page, size, Sort::unsorted())
    }

    pub fn sorted(page: u32, size: u32, sort: Sort) -> Result<Self> {
        if size == 0 {
            return Err(AppError::InvalidArgument(
                "Page size must be at least one".to_string(),
            ));
        }
        Ok(Self { page, size, sort })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u32 {
        self.size
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    pub fn first(&self) -> Self {
        Self {
            page: 0,
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    /// Total element count when it follows from the fetched window alone.
    ///
    /// - First page shorter than `size`: the window holds everything.
    /// - Later page, non-empty but shorter than `size`: it is the last page.
    ///
    /// `None` means a count query is required.
    pub fn derive_total(&self, content_len: usize) -> Option<u64> {
        let size = self.size as usize;

        if self.offset() == 0 {
            return (content_len < size).then_some(content_len as u64);
        }

        if content_len != 0 && content_len < size {
            return Some(self.offset() + content_len as u64);
        }

        None
    }
}

/// Window of content with the total element count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
    is_first: bool,
    is_last: bool,
    has_next: bool,
    has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        let number = request.page();
        let total_pages = total_elements.div_ceil(size);
        let has_next = u64::from(number) + 1 < total_pages;

        Self {
            content,
            number,
            size: request.size(),
            total_elements,
            total_pages,
            is_first: number == 0,
            is_last: !has_next,
            has_next,
            has_previous: number > 0,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn is_first(&self) -> bool {
        self.is_first
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Convert the content, keeping all paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            is_first: self.is_first,
            is_last: self.is_last,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

/// Window of content that only knows whether a next window exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    has_next: bool,
}

impl<T> Slice<T> {
    /// Build from rows fetched with `limit = size + 1`.
    ///
    /// The extra row, if present, only proves a next window exists and is dropped.
    pub fn from_overfetch(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let size = request.size() as usize;
        let has_next = rows.len() > size;
        rows.truncate(size);

        Self {
            content: rows,
            number: request.page(),
            size: request.size(),
            has_next,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            has_next: self.has_next,
        }
    }
}
