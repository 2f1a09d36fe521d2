// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for field limits, pagination, routes, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Service identity used in logs and JWT audience
pub mod service_names {
    /// Name of the HTTP server binary and log target
    pub const PANTRY_SERVER: &str = "pantry-server";
    /// JWT audience accepted by the API
    pub const API_AUDIENCE: &str = "pantry-api";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Field length and value limits mirrored by the schema
pub mod limits {
    /// Maximum length of a recipe name
    pub const RECIPE_NAME_MAX_LEN: usize = 200;
    /// Maximum length of an ingredient name
    pub const INGREDIENT_NAME_MAX_LEN: usize = 200;
    /// Maximum length of a measurement unit
    pub const MEASUREMENT_UNIT_MAX_LEN: usize = 50;
    /// Maximum length of a tag name
    pub const TAG_NAME_MAX_LEN: usize = 200;
    /// Maximum length of a tag slug
    pub const TAG_SLUG_MAX_LEN: usize = 50;
    /// Minimum cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;
    /// Minimum ingredient amount
    pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
    /// Largest accepted ingredient amount (small unsigned column)
    pub const MAX_INGREDIENT_AMOUNT: i64 = 32_767;
    /// Largest accepted cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 32_767;
}

/// Pagination defaults
pub mod pagination {
    /// Items per page when the client does not send `limit`
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Upper bound on `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Shopping list export
pub mod shopping_list {
    /// Title printed at the top of the exported document
    pub const DOCUMENT_TITLE: &str = "Shopping list";
    /// Download file name for the plain-text export
    pub const TEXT_FILE_NAME: &str = "shopping-list.txt";
    /// Leader between an entry label and its amount
    pub const LEADER: &str = "........";
}
