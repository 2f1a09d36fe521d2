// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Hosts the composite recipe writer and the shopping list aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Domain service layer
//!
//! Services own the rules that span more than one table or that should not
//! depend on HTTP: recipe validation and all-or-nothing writes, and shopping
//! list aggregation.

/// Composite recipe writes: validation plus one-transaction create/update
pub mod recipes;

/// Shopping list aggregation over a user's cart
pub mod shopping_list;
