//! Pagination utilities for the HTML listing pages
//!
//! Two lookup modes over the same arithmetic:
//! - [`Paginator::get_page`] is lenient: anything unusable lands on a valid page.
//! - [`Paginator::page`] is strict: out-of-range pages are an error.

use thiserror::Error;

/// Page lookup failures (strict mode only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPage {
    #[error("That page number is not an integer")]
    NotAnInteger,
    #[error("That page number is less than 1")]
    LessThanOne,
    #[error("That page contains no results")]
    NoResults,
}

/// Splits `count` ordered records into pages of `per_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

/// One resolved page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Current page number (1-indexed)
    pub number: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Records on a full page
    pub per_page: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
    /// Total number of records across all pages
    pub count: i64,
}

impl Paginator {
    /// `per_page` below 1 is treated as 1
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// ceil(count / per_page); zero for an empty collection
    pub fn num_pages(&self) -> i64 {
        (self.count + self.per_page - 1) / self.per_page
    }

    /// Check a page number against the page range
    ///
    /// Page 1 is always valid, even when the collection is empty.
    pub fn validate_number(&self, number: i64) -> Result<i64, InvalidPage> {
        if number < 1 {
            return Err(InvalidPage::LessThanOne);
        }
        if number > self.num_pages() && number != 1 {
            return Err(InvalidPage::NoResults);
        }
        Ok(number)
    }

    /// Strict lookup
    pub fn page(&self, number: i64) -> Result<Page, InvalidPage> {
        let number = self.validate_number(number)?;
        Ok(self.build(number))
    }

    /// Strict lookup from raw query text; accepts an integer or `last`
    pub fn parse_page(&self, raw: Option<&str>) -> Result<Page, InvalidPage> {
        let number = match raw.map(str::trim) {
            None | Some("") => 1,
            Some("last") => self.num_pages().max(1),
            Some(text) => text.parse::<i64>().map_err(|_| InvalidPage::NotAnInteger)?,
        };
        self.page(number)
    }

    /// Lenient lookup from raw query text
    ///
    /// Missing or non-integer input gives page 1; a number outside the page
    /// range gives the last page.
    pub fn get_page(&self, raw: Option<&str>) -> Page {
        let requested = raw.and_then(|text| text.trim().parse::<i64>().ok()).unwrap_or(1);
        match self.validate_number(requested) {
            Ok(number) => self.build(number),
            Err(_) => self.build(self.num_pages().max(1)),
        }
    }

    fn build(&self, number: i64) -> Page {
        Page {
            number,
            total_pages: self.num_pages(),
            per_page: self.per_page,
            offset: (number - 1) * self.per_page,
            count: self.count,
        }
    }
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// `number - 1`, not clamped: 0 on the first page
    pub fn prev_page_num(&self) -> i64 {
        self.number - 1
    }

    /// `number + 1`, not clamped: past the end on the last page
    pub fn next_page_num(&self) -> i64 {
        self.number + 1
    }

    /// Records expected on this page
    pub fn len(&self) -> i64 {
        (self.count - self.offset).clamp(0, self.per_page)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
