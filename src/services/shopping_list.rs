// ABOUTME: Shopping list aggregation over every recipe in a user's cart
// ABOUTME: Sums amounts per (ingredient name, measurement unit) and orders entries by their label
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::collections::BTreeMap;

use pantry_core::models::{ShoppingLine, ShoppingListEntry};
use tracing::debug;
use uuid::Uuid;

use crate::database::MembershipsManager;
use crate::errors::AppResult;

/// Merge ingredient lines into per-ingredient totals
///
/// Lines sharing both name and unit are summed; the same name in another
/// unit stays a separate entry. Output is sorted by the `"name, unit"` label,
/// so the order of the input lines never affects the result.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingListEntry>
where
    I: IntoIterator<Item = ShoppingLine>,
{
    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += u64::from(line.amount);
    }

    let mut entries: Vec<ShoppingListEntry> = totals
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingListEntry {
            name,
            measurement_unit,
            total,
        })
        .collect();
    // Stable: entries with equal labels keep their (name, unit) order
    entries.sort_by_cached_key(ShoppingListEntry::label);
    entries
}

/// Build the aggregated shopping list for a user's cart
///
/// An empty cart yields an empty list.
///
/// # Errors
///
/// Returns an error if the cart cannot be read
pub async fn shopping_list_for(
    memberships: &MembershipsManager,
    user_id: Uuid,
) -> AppResult<Vec<ShoppingListEntry>> {
    let lines = memberships.cart_lines(user_id).await?;
    let line_count = lines.len();
    let entries = aggregate(lines);
    debug!(user_id = %user_id, lines = line_count, entries = entries.len(), "Shopping list aggregated");
    Ok(entries)
}
