// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Resolves page/limit query parameters and builds count/next/previous envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Raw pagination parameters as sent by the client
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<u32>,
    /// Items per page
    pub limit: Option<u32>,
}

impl PageParams {
    /// Resolve against the default page size and upper bound
    ///
    /// Zero or missing values fall back to the first page / default size, and
    /// `limit` is clamped to `max_limit`.
    #[must_use]
    pub fn resolve(self, default_limit: u32, max_limit: u32) -> PageRequest {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(max_limit.max(1));
        PageRequest { page, limit }
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl PageRequest {
    /// First page with the default size
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }

    /// SQL `LIMIT`
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// SQL `OFFSET`
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageParams::default().resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: u64,
    /// Next page number, if any
    pub next: Option<u32>,
    /// Previous page number, if any
    pub previous: Option<u32>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page from the items on it and the total count
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, request: PageRequest) -> Self {
        let seen = u64::from(request.page) * u64::from(request.limit);
        let next = (seen < count).then(|| request.page + 1);
        let previous = (request.page > 1).then(|| request.page - 1);
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform the items while keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
