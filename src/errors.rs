// ABOUTME: Error handling re-exports for the server crate
// ABOUTME: All modules use the unified AppError/ErrorCode from pantry-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! # Unified Error Handling System
//!
//! The error types live in `pantry-core` so that models and services can share
//! them; this module re-exports them under the familiar `crate::errors` path.

pub use pantry_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails, FieldIssue,
};
