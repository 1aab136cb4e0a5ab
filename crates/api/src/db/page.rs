//! Pagination primitives.
//!
//! Sort columns are validated against a per-repository whitelist before
//! they are interpolated into SQL; the direction is an enum, so no request
//! input ever reaches the query text unchecked. Tie-break order for equal
//! sort keys is left to `PostgreSQL`.

use serde::Serialize;

use super::RepositoryError;

/// Sort direction for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse from the wire form (`ASC` / `DESC`, case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Ascending),
            "DESC" => Some(Self::Descending),
            _ => None,
        }
    }

    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// A validated page request: zero-based page, bounded page size, and a
/// whitelisted sort column.
#[derive(Debug, Clone)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
    order_by: &'static str,
    direction: SortDirection,
}

impl PageRequest {
    /// Largest accepted page size.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Build a page request, resolving `order_by` against the repository's
    /// sortable column whitelist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the column is not
    /// sortable or the page size is out of range.
    pub fn new(
        page: u32,
        page_size: u32,
        order_by: &str,
        direction: SortDirection,
        sortable: &[&'static str],
    ) -> Result<Self, RepositoryError> {
        let Some(column) = sortable.iter().find(|c| **c == order_by) else {
            return Err(RepositoryError::Conflict(format!(
                "cannot sort by '{order_by}'"
            )));
        };
        if page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(RepositoryError::Conflict(format!(
                "page size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            )));
        }

        Ok(Self {
            page,
            page_size,
            order_by: column,
            direction,
        })
    }

    /// `ORDER BY` fragment, safe to interpolate (whitelisted column,
    /// enum direction).
    #[must_use]
    pub fn order_clause(&self) -> String {
        format!("ORDER BY {} {}", self.order_by, self.direction.as_sql())
    }

    /// `LIMIT` value.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// `OFFSET` value.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.page as i64 * self.page_size as i64
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// One page of results plus the totals clients need for paging controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalElements")]
    pub total_elements: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Assemble a page from query results and the total row count.
    #[must_use]
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        // Ceiling division; both operands are non-negative (size >= 1 is
        // enforced by PageRequest::new).
        let size = i64::from(request.page_size());
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + size - 1) / size
        };

        Self {
            content,
            page: request.page(),
            page_size: request.page_size(),
            total_elements,
            total_pages,
        }
    }

    /// Map the page content, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SORTABLE: &[&str] = &["name", "email"];

    #[test]
    fn test_rejects_unlisted_sort_column() {
        let result = PageRequest::new(0, 24, "password_hash; DROP TABLE customer", SortDirection::Ascending, SORTABLE);
        assert!(result.is_err());
    }

    #[test]
    fn test_order_clause() {
        let req = PageRequest::new(0, 24, "name", SortDirection::Descending, SORTABLE).unwrap();
        assert_eq!(req.order_clause(), "ORDER BY name DESC");
    }

    #[test]
    fn test_offset_and_limit() {
        let req = PageRequest::new(2, 10, "email", SortDirection::Ascending, SORTABLE).unwrap();
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn test_rejects_zero_and_oversized_page_size() {
        assert!(PageRequest::new(0, 0, "name", SortDirection::Ascending, SORTABLE).is_err());
        assert!(PageRequest::new(0, 101, "name", SortDirection::Ascending, SORTABLE).is_err());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("sideways"), None);
    }

    #[test]
    fn test_page_totals() {
        let req = PageRequest::new(0, 10, "name", SortDirection::Ascending, SORTABLE).unwrap();
        let page = Page::new(vec![1, 2, 3], &req, 23);
        assert_eq!(page.total_pages, 3);

        let empty: Page<i32> = Page::new(Vec::new(), &req, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_page_totals_rounding() {
        let req = PageRequest::new(0, 10, "name", SortDirection::Ascending, SORTABLE).unwrap();

        // Exact multiple must not round up an extra page.
        assert_eq!(Page::new(vec![0; 10], &req, 30).total_pages, 3);
        // A single element still fills one page.
        assert_eq!(Page::new(vec![0], &req, 1).total_pages, 1);
        // One past the boundary rounds up.
        assert_eq!(Page::new(vec![0; 10], &req, 31).total_pages, 4);
    }
}
