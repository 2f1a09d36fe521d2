// ABOUTME: Shopping list renderers turning aggregated entries into a downloadable document
// ABOUTME: The plain-text renderer writes one "Name, unit........total" line per entry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use pantry_core::constants::shopping_list::{DOCUMENT_TITLE, LEADER, TEXT_FILE_NAME};
use pantry_core::models::ShoppingListEntry;

/// Renders an aggregated shopping list into a file
pub trait ShoppingListRenderer: Send + Sync {
    /// MIME type of the rendered document
    fn content_type(&self) -> &'static str;

    /// Suggested download file name
    fn file_name(&self) -> &'static str;

    /// Render the entries in the given order
    fn render(&self, entries: &[ShoppingListEntry]) -> Vec<u8>;
}

/// UTF-8 text document
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl ShoppingListRenderer for PlainTextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self) -> &'static str {
        TEXT_FILE_NAME
    }

    fn render(&self, entries: &[ShoppingListEntry]) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(DOCUMENT_TITLE);
        out.push_str("\n\n");

        for entry in entries {
            out.push_str(&capitalize(&entry.label()));
            out.push_str(LEADER);
            out.push_str(&entry.total.to_string());
            out.push('\n');
        }

        out.into_bytes()
    }
}

/// Upper-case the first character and lower-case the rest
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
