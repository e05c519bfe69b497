//! Page-number pagination primitives shared by backend list endpoints.
//!
//! [`PageRequest`] captures what a client asked for and [`PageInfo`] describes
//! the page that was served. Navigation flags on [`PageInfo`] are always derived
//! from `page` and `total_pages`; they are never stored, so a deserialised
//! payload cannot carry stale flags.
//!
//! # Examples
//! ```
//! use pagination::{PageInfo, PageRequest};
//!
//! let request = PageRequest::new(0, 10).expect("valid request");
//! let info = PageInfo::for_request(request, 25);
//! assert_eq!(info.total_pages(), 3);
//! assert!(info.has_next());
//! assert!(!info.has_previous());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the client does not provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised when a page request is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The requested size was zero.
    #[error("page size must be at least 1")]
    EmptyPage,
    /// The requested size exceeded [`MAX_PAGE_SIZE`].
    #[error("page size must be at most {max}")]
    PageTooLarge {
        /// Maximum accepted size.
        max: u32,
    },
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `size` is zero or larger than
    /// [`MAX_PAGE_SIZE`].
    pub const fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 {
            return Err(PageRequestError::EmptyPage);
        }
        if size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageTooLarge { max: MAX_PAGE_SIZE });
        }
        Ok(Self { page, size })
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64) * (self.size as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Metadata describing one served page.
///
/// ## Invariants
/// - `has_next` is `page < total_pages - 1`.
/// - `has_previous` is `page > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageInfoDto", into = "PageInfoDto")]
pub struct PageInfo {
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
}

impl PageInfo {
    /// Construct page metadata from explicit values.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageInfo;
    ///
    /// let last = PageInfo::new(2, 10, 25, 3);
    /// assert!(!last.has_next());
    /// assert!(last.has_previous());
    /// ```
    #[must_use]
    pub const fn new(page: u32, size: u32, total_elements: u64, total_pages: u32) -> Self {
        Self {
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Derive page metadata for `request` given the total number of elements.
    #[must_use]
    pub fn for_request(request: PageRequest, total_elements: u64) -> Self {
        let pages = total_elements.div_ceil(u64::from(request.size()));
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        Self::new(request.page(), request.size(), total_elements, total_pages)
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of elements across all pages.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfoDto {
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
    #[serde(default)]
    has_next: bool,
    #[serde(default)]
    has_previous: bool,
}

impl From<PageInfo> for PageInfoDto {
    fn from(value: PageInfo) -> Self {
        Self {
            page: value.page,
            size: value.size,
            total_elements: value.total_elements,
            total_pages: value.total_pages,
            has_next: value.has_next(),
            has_previous: value.has_previous(),
        }
    }
}

impl From<PageInfoDto> for PageInfo {
    fn from(value: PageInfoDto) -> Self {
        // Flags sent by a client are ignored; they are recomputed on read.
        Self::new(
            value.page,
            value.size,
            value.total_elements,
            value.total_pages,
        )
    }
}
