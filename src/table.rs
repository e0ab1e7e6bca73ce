//! Plain-text rendering of the bucket board.

use std::fmt::Write as _;

use itertools::Itertools;

use crate::{bucket::Bucket, mapper::ColumnMapper};

const SAMPLE_LIMIT: usize = 3;

/// One row per column, grouped by bucket in card order, with a few sample
/// values for orientation.
pub fn render_buckets(mapper: &ColumnMapper) -> String {
    let headers = ["bucket", "column", "samples"].map(str::to_string);
    let mut rows = Vec::new();
    for bucket in Bucket::ALL {
        let columns = mapper.columns_in(bucket);
        if columns.is_empty() {
            rows.push(vec![bucket.title().to_string(), "-".to_string(), String::new()]);
            continue;
        }
        for column in columns {
            let samples = column
                .samples
                .iter()
                .take(SAMPLE_LIMIT)
                .map(|value| flatten(value.as_str()))
                .join(" | ");
            rows.push(vec![bucket.title().to_string(), column.name.clone(), samples]);
        }
    }
    render_table(&headers, &rows)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(3)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    for line in std::iter::once(headers)
        .chain(std::iter::once(separator.as_slice()))
        .chain(rows.iter().map(Vec::as_slice))
    {
        let rendered = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .join("  ");
        let _ = writeln!(output, "{}", rendered.trim_end());
    }
    output
}

fn flatten(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
