//! Skip/limit pagination.
//!
//! # Design Decisions
//! - `size = -1` means "everything"; the page number is then ignored
//! - Skip is `size * page`, except that page 0 always skips nothing
//! - Skip and limit apply to the raw scan order, before de-duplication and sorting

use crate::catalog::ValidationError;

/// Page size sentinel meaning "no limit".
pub const UNBOUNDED_SIZE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Unbounded,
    Limited(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    size: PageSize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::all()
    }
}

impl Pagination {
    /// No pagination: return every result.
    pub const fn all() -> Self {
        Self {
            page: 0,
            size: PageSize::Unbounded,
        }
    }

    /// Build from raw request parameters.
    pub fn from_params(page: i64, size: i64) -> Result<Self, ValidationError> {
        if size == UNBOUNDED_SIZE {
            return Ok(Self::all());
        }
        let size = usize::try_from(size).map_err(|_| ValidationError::InvalidPageSize(size))?;
        let page = usize::try_from(page).map_err(|_| ValidationError::InvalidPage(page))?;
        Ok(Self {
            page,
            size: PageSize::Limited(size),
        })
    }

    /// Number of leading results to drop.
    pub fn skip(&self) -> usize {
        match self.size {
            PageSize::Unbounded => 0,
            PageSize::Limited(_) if self.page == 0 => 0,
            PageSize::Limited(size) => size.saturating_mul(self.page),
        }
    }

    /// Maximum number of results to keep, if bounded.
    pub fn limit(&self) -> Option<usize> {
        match self.size {
            PageSize::Unbounded => None,
            PageSize::Limited(size) => Some(size),
        }
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.skip());
        match self.limit() {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}
