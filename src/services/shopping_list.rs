// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shopping-list export.

use crate::models::ShoppingListRow;

/// File name offered to the browser.
pub const FILE_NAME: &str = "shopping_list.csv";

/// Render aggregated rows as `name,unit,total` CSV lines.
pub fn render_csv(rows: &[ShoppingListRow]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record([
            row.name.as_str(),
            row.measurement_unit.as_str(),
            row.total.to_string().as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))
}
