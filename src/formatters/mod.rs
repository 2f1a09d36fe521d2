// ABOUTME: Document renderers for exporting aggregated data as downloadable files
// ABOUTME: Renderers are selected by the route and produce bytes plus content metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Output renderers
//!
//! The shopping list aggregator produces ordered entries; turning them into a
//! file is the job of a [`ShoppingListRenderer`].

pub mod shopping_list;

pub use shopping_list::{PlainTextRenderer, ShoppingListRenderer};
