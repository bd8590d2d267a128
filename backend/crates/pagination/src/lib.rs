//! Page request normalisation and page envelopes for listing endpoints.
//!
//! Listing endpoints accept loosely typed `page` / `pageSize` query values.
//! [`PageRequest`] clamps those values into a usable window so adapters can
//! translate it straight into `LIMIT`/`OFFSET` without re-validating, and
//! [`Page`] wraps one window of results for serialisation.
//!
//! # Examples
//!
//! ```
//! use pagination::PageRequest;
//!
//! let request = PageRequest::new(Some(0), Some(-3));
//! assert_eq!(request.page(), 1);
//! assert_eq!(request.page_size(), PageRequest::DEFAULT_PAGE_SIZE);
//! assert_eq!(request.offset(), 0);
//! ```

use serde::{Deserialize, Serialize};

/// A normalised request for one page of an ordered result set.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Page size used when the caller omits one or supplies a non-positive
    /// value.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Largest page size a caller may request.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Normalise raw page inputs.
    ///
    /// Missing or non-positive pages become page 1; missing or non-positive
    /// sizes become [`Self::DEFAULT_PAGE_SIZE`]; oversized requests are capped
    /// at [`Self::MAX_PAGE_SIZE`].
    #[must_use]
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page
            .filter(|value| *value >= 1)
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(1);
        let page_size = match page_size {
            Some(size) if size >= 1 => {
                u32::try_from(size).map_or(Self::MAX_PAGE_SIZE, |size| size.min(Self::MAX_PAGE_SIZE))
            }
            _ => Self::DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding this page in the ordered result set.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results together with the window that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in the requested order.
    pub items: Vec<T>,
    /// One-based page number.
    pub page: u32,
    /// Requested page size; `items.len()` may be smaller on the last page.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Wrap `items` fetched for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// Transform every item while keeping the page window.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}
