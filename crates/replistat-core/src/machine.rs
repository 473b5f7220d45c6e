//! The machine-readable key=value stream ("sapcontrol mode").
//!
//! Every line emitted here is parsed by external cluster-management
//! tooling. Keys, the sentinel lines, and the split between the
//! `overall_replication_status=` and `status=` overall keys are stable
//! contracts; do not rename them.

use crate::aggregate::SiteStatusRecord;
use crate::row::ReplicationRow;
use crate::status::ReplicationStatus;
use crate::table::FULL_COLUMN_KEYS;

/// First line of every machine-mode report.
pub const BEGIN_SENTINEL: &str = "SAPCONTROL-OK: <begin>";
/// Last line of every machine-mode report.
pub const END_SENTINEL: &str = "SAPCONTROL-OK: <end>";

/// One `service/<host>/<port>/<KEY>=<value>` line per populated field,
/// in wire-column order with the tenant database first when present.
pub fn service_lines(row: &ReplicationRow) -> Vec<String> {
    let cells = row.cells();
    let mut lines = Vec::with_capacity(cells.len());
    let keys = std::iter::once("DATABASE").chain(FULL_COLUMN_KEYS.iter().copied());
    for key in keys {
        if let Some(cell) = cells.get(key) {
            lines.push(format!(
                "service/{}/{}/{}={}",
                row.host,
                row.port,
                key,
                cell.render()
            ));
        }
    }
    lines
}

/// The `site/<id>/...` lines for one aggregated record.
///
/// `SOURCE_SITE_ID` is omitted for the `NOT MAPPED` sentinel, which has
/// no attributable source.
pub fn site_lines(record: &SiteStatusRecord) -> Vec<String> {
    let id = record.key.to_string();
    let mut lines = vec![format!("site/{id}/SITE_NAME={}", record.secondary_site_name)];
    if let Some(source) = record.source_site_id {
        lines.push(format!("site/{id}/SOURCE_SITE_ID={source}"));
    }
    lines.push(format!("site/{id}/REPLICATION_MODE={}", record.replication_mode));
    lines.push(format!(
        "site/{id}/REPLICATION_STATUS={}",
        record.status.as_text()
    ));
    lines
}

/// Overall line on the success paths.
pub fn overall_line(status: ReplicationStatus) -> String {
    format!("overall_replication_status={}", status.as_text())
}

/// Overall line on the failure and no-replication paths.
pub fn status_line(status: ReplicationStatus) -> String {
    format!("status={}", status.as_text())
}
