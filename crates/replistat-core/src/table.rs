//! The aligned human-readable table.
//!
//! The layout is an operator-facing contract that predates this tool:
//! `|`-separated cells with single-space padding, one header row per
//! embedded header line, a dashes separator, strings left-justified,
//! numbers right-justified, and `?` for a column a row does not carry.

use std::collections::BTreeMap;

use crate::row::Cell;

/// Placeholder for a column missing from a row.
const MISSING: &str = "?";

#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Wire name, used to look cells up in a row.
    pub key: &'static str,
    /// Display header; may contain embedded line breaks.
    pub header: &'static str,
}

const fn col(key: &'static str, header: &'static str) -> Column {
    Column { key, header }
}

const DATABASE_COLUMN: Column = col("DATABASE", "Database");

const SHORT_COLUMNS: [Column; 14] = [
    col("HOST", "Host"),
    col("PORT", "Port"),
    col("SERVICE_NAME", "Service Name"),
    col("VOLUME_ID", "Volume ID"),
    col("SITE_ID", "Site ID"),
    col("SITE_NAME", "Site Name"),
    col("SECONDARY_HOST", "Secondary\nHost"),
    col("SECONDARY_PORT", "Secondary\nPort"),
    col("SECONDARY_SITE_ID", "Secondary\nSite ID"),
    col("SECONDARY_SITE_NAME", "Secondary\nSite Name"),
    col("SECONDARY_ACTIVE_STATUS", "Secondary\nActive Status"),
    col("REPLICATION_MODE", "Replication\nMode"),
    col("REPLICATION_STATUS", "Replication\nStatus"),
    col("REPLICATION_STATUS_DETAILS", "Replication\nStatus Details"),
];

/// Full column list in wire order; headers are the keys themselves.
pub const FULL_COLUMN_KEYS: [&str; 45] = [
    "HOST",
    "PORT",
    "SERVICE_NAME",
    "VOLUME_ID",
    "SITE_ID",
    "SITE_NAME",
    "SECONDARY_HOST",
    "SECONDARY_PORT",
    "SECONDARY_SITE_ID",
    "SECONDARY_SITE_NAME",
    "SECONDARY_ACTIVE_STATUS",
    "SECONDARY_CONNECT_TIME",
    "SECONDARY_RECONNECT_COUNT",
    "SECONDARY_FAILOVER_COUNT",
    "REPLICATION_MODE",
    "REPLICATION_STATUS",
    "REPLICATION_STATUS_DETAILS",
    "LAST_LOG_POSITION",
    "LAST_LOG_POSITION_TIME",
    "LAST_SAVEPOINT_VERSION",
    "LAST_SAVEPOINT_LOG_POSITION",
    "LAST_SAVEPOINT_START_TIME",
    "SHIPPED_LOG_POSITION",
    "SHIPPED_LOG_POSITION_TIME",
    "SHIPPED_LOG_BUFFERS_COUNT",
    "SHIPPED_LOG_BUFFERS_SIZE",
    "SHIPPED_LOG_BUFFERS_DURATION",
    "SHIPPED_SAVEPOINT_VERSION",
    "SHIPPED_SAVEPOINT_LOG_POSITION",
    "SHIPPED_SAVEPOINT_START_TIME",
    "SHIPPED_FULL_REPLICA_COUNT",
    "SHIPPED_FULL_REPLICA_SIZE",
    "SHIPPED_FULL_REPLICA_DURATION",
    "SHIPPED_LAST_FULL_REPLICA_SIZE",
    "SHIPPED_LAST_FULL_REPLICA_START_TIME",
    "SHIPPED_LAST_FULL_REPLICA_END_TIME",
    "SHIPPED_DELTA_REPLICA_COUNT",
    "SHIPPED_DELTA_REPLICA_SIZE",
    "SHIPPED_DELTA_REPLICA_DURATION",
    "SHIPPED_LAST_DELTA_REPLICA_SIZE",
    "SHIPPED_LAST_DELTA_REPLICA_START_TIME",
    "SHIPPED_LAST_DELTA_REPLICA_END_TIME",
    "RESET_COUNT",
    "LAST_RESET_TIME",
    "CREATION_TIME",
];

/// The short column list, with the tenant column prepended on
/// multi-tenant deployments.
pub fn short_columns(multidb: bool) -> Vec<Column> {
    let mut columns = Vec::with_capacity(SHORT_COLUMNS.len() + 1);
    if multidb {
        columns.push(DATABASE_COLUMN);
    }
    columns.extend_from_slice(&SHORT_COLUMNS);
    columns
}

/// The full column list (`--all`). Headers equal the wire keys.
pub fn full_columns(multidb: bool) -> Vec<Column> {
    let mut columns = Vec::with_capacity(FULL_COLUMN_KEYS.len() + 1);
    if multidb {
        columns.push(col("DATABASE", "DATABASE"));
    }
    columns.extend(FULL_COLUMN_KEYS.iter().map(|key| col(key, key)));
    columns
}

/// Renders rows as an aligned table.
///
/// Column width is the maximum of the widest header line and the widest
/// cell, computed independently per column.
pub fn render(columns: &[Column], rows: &[BTreeMap<String, Cell>]) -> String {
    let header_lines: Vec<Vec<&str>> = columns
        .iter()
        .map(|c| c.header.split('\n').collect())
        .collect();
    let header_rows = header_lines.iter().map(Vec::len).max().unwrap_or(1);

    let mut widths: Vec<usize> = header_lines
        .iter()
        .map(|lines| lines.iter().map(|l| l.len()).max().unwrap_or(0))
        .collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            let cell_width = match row.get(column.key) {
                Some(cell) => cell.render().len(),
                None => MISSING.len(),
            };
            widths[i] = widths[i].max(cell_width);
        }
    }

    let mut out = String::new();
    for line in 0..header_rows {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let text = header_lines[i].get(line).copied().unwrap_or("");
                pad_left_justified(text, widths[i])
            })
            .collect();
        push_row(&mut out, &cells);
    }

    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &dashes);

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| match row.get(column.key) {
                Some(Cell::Text(s)) => pad_left_justified(s, widths[i]),
                Some(cell @ Cell::Int(_)) => pad_right_justified(&cell.render(), widths[i]),
                None => pad_left_justified(MISSING, widths[i]),
            })
            .collect();
        push_row(&mut out, &cells);
    }

    out
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}

fn pad_left_justified(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

fn pad_right_justified(text: &str, width: usize) -> String {
    format!("{text:>width$}")
}
