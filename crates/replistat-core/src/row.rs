//! The per-service replication row and its normalization rules.
//!
//! Rows arrive from the nameserver as flat records with uppercase field
//! names. They are parsed exactly once, at the client boundary, into
//! [`ReplicationRow`]; a record missing a required field is a decode
//! error there and surfaces as the `Error` outcome, never as a partial
//! row reaching the renderer.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::timefmt;

/// One replicated volume/service pair as reported by the nameserver.
///
/// The named fields are required on the wire. Everything else a row
/// carries (log positions, savepoint and replica counters, reset and
/// creation times) lands in `counters`; which of those are present
/// depends on the nameserver version and is only a display concern.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ReplicationRow {
    /// Tenant database name; absent on single-tenant deployments.
    #[serde(default)]
    pub database: Option<String>,
    pub host: String,
    pub port: u16,
    pub service_name: String,
    /// Volume id 0 marks non-replicating standby bookkeeping entries.
    pub volume_id: u64,
    pub site_id: u32,
    pub site_name: String,
    pub secondary_host: String,
    pub secondary_port: u16,
    pub secondary_site_id: u32,
    pub secondary_site_name: String,
    pub secondary_active_status: String,
    pub replication_mode: String,
    pub replication_status: String,
    #[serde(default)]
    pub replication_status_details: String,
    /// Long-format numeric counters, keyed by wire name.
    #[serde(flatten)]
    pub counters: BTreeMap<String, i64>,
}

/// A single table/machine cell value.
///
/// Strings render left-justified, numbers right-justified; the renderers
/// never need to know which row field a cell came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(i64),
}

impl Cell {
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(n) => n.to_string(),
        }
    }
}

/// True for the placeholder the nameserver reports when a secondary
/// host has no mapping, in either spelling.
pub fn is_unmapped_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("not mapped") || host.eq_ignore_ascii_case("not_mapped")
}

impl ReplicationRow {
    /// All fields of this row as display cells, keyed by wire name.
    ///
    /// Counter fields with a `_TIME` suffix hold microsecond timestamps
    /// and are formatted here; zero renders as the `-` placeholder.
    pub fn cells(&self) -> BTreeMap<String, Cell> {
        let mut cells = BTreeMap::new();
        if let Some(db) = &self.database {
            cells.insert("DATABASE".to_string(), Cell::Text(db.clone()));
        }
        cells.insert("HOST".to_string(), Cell::Text(self.host.clone()));
        cells.insert("PORT".to_string(), Cell::Int(i64::from(self.port)));
        cells.insert("SERVICE_NAME".to_string(), Cell::Text(self.service_name.clone()));
        cells.insert("VOLUME_ID".to_string(), Cell::Int(self.volume_id as i64));
        cells.insert("SITE_ID".to_string(), Cell::Int(i64::from(self.site_id)));
        cells.insert("SITE_NAME".to_string(), Cell::Text(self.site_name.clone()));
        cells.insert("SECONDARY_HOST".to_string(), Cell::Text(self.secondary_host.clone()));
        cells.insert("SECONDARY_PORT".to_string(), Cell::Int(i64::from(self.secondary_port)));
        cells.insert(
            "SECONDARY_SITE_ID".to_string(),
            Cell::Int(i64::from(self.secondary_site_id)),
        );
        cells.insert(
            "SECONDARY_SITE_NAME".to_string(),
            Cell::Text(self.secondary_site_name.clone()),
        );
        cells.insert(
            "SECONDARY_ACTIVE_STATUS".to_string(),
            Cell::Text(self.secondary_active_status.clone()),
        );
        cells.insert(
            "REPLICATION_MODE".to_string(),
            Cell::Text(self.replication_mode.clone()),
        );
        cells.insert(
            "REPLICATION_STATUS".to_string(),
            Cell::Text(self.replication_status.clone()),
        );
        cells.insert(
            "REPLICATION_STATUS_DETAILS".to_string(),
            Cell::Text(self.replication_status_details.clone()),
        );
        for (key, value) in &self.counters {
            let cell = if key.ends_with("_TIME") {
                Cell::Text(timefmt::format_micros(*value))
            } else {
                Cell::Int(*value)
            };
            cells.insert(key.clone(), cell);
        }
        cells
    }
}

/// Uniform post-processing applied to every fetched row set.
///
/// Drops standby bookkeeping rows (volume id 0), stable-sorts by local
/// site id, and applies the optional secondary-site-name filter. With a
/// filter present, rows pointing at an unmapped secondary host are
/// dropped before the name match; an empty filter keeps everything.
pub fn normalize(mut rows: Vec<ReplicationRow>, site_filter: Option<&str>) -> Vec<ReplicationRow> {
    rows.retain(|row| row.volume_id != 0);
    rows.sort_by_key(|row| row.site_id);
    if let Some(site) = site_filter {
        if !site.is_empty() {
            rows.retain(|row| !is_unmapped_host(&row.secondary_host));
            rows.retain(|row| row.secondary_site_name.eq_ignore_ascii_case(site));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(site_id: u32, volume_id: u64, secondary_site_name: &str) -> ReplicationRow {
        serde_json::from_value(json!({
            "HOST": "node1",
            "PORT": 30003,
            "SERVICE_NAME": "indexserver",
            "VOLUME_ID": volume_id,
            "SITE_ID": site_id,
            "SITE_NAME": "SITEA",
            "SECONDARY_HOST": "node2",
            "SECONDARY_PORT": 30003,
            "SECONDARY_SITE_ID": 2,
            "SECONDARY_SITE_NAME": secondary_site_name,
            "SECONDARY_ACTIVE_STATUS": "YES",
            "REPLICATION_MODE": "SYNC",
            "REPLICATION_STATUS": "ACTIVE",
            "REPLICATION_STATUS_DETAILS": "",
        }))
        .unwrap()
    }

    #[test]
    fn wire_rows_parse_with_counters() {
        let row: ReplicationRow = serde_json::from_value(json!({
            "DATABASE": "TN1",
            "HOST": "node1",
            "PORT": 30003,
            "SERVICE_NAME": "indexserver",
            "VOLUME_ID": 3,
            "SITE_ID": 1,
            "SITE_NAME": "SITEA",
            "SECONDARY_HOST": "node2",
            "SECONDARY_PORT": 30003,
            "SECONDARY_SITE_ID": 2,
            "SECONDARY_SITE_NAME": "SITEB",
            "SECONDARY_ACTIVE_STATUS": "YES",
            "REPLICATION_MODE": "SYNC",
            "REPLICATION_STATUS": "ACTIVE",
            "REPLICATION_STATUS_DETAILS": "",
            "SHIPPED_LOG_BUFFERS_COUNT": 42,
            "LAST_LOG_POSITION_TIME": 1_609_459_200_000_000i64,
        }))
        .unwrap();

        assert_eq!(row.database.as_deref(), Some("TN1"));
        assert_eq!(row.counters["SHIPPED_LOG_BUFFERS_COUNT"], 42);

        let cells = row.cells();
        assert_eq!(cells["SHIPPED_LOG_BUFFERS_COUNT"], Cell::Int(42));
        assert_eq!(
            cells["LAST_LOG_POSITION_TIME"],
            Cell::Text("2021-01-01 00:00:00.000000".to_string())
        );
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let result: Result<ReplicationRow, _> = serde_json::from_value(json!({
            "HOST": "node1",
            "PORT": 30003,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn zero_timestamps_render_placeholder() {
        let mut r = row(1, 3, "SITEB");
        r.counters.insert("LAST_RESET_TIME".to_string(), 0);
        assert_eq!(r.cells()["LAST_RESET_TIME"], Cell::Text("-".to_string()));
    }

    #[test]
    fn volume_zero_rows_are_dropped() {
        let rows = normalize(vec![row(1, 0, "SITEB"), row(1, 3, "SITEB")], None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].volume_id, 3);
    }

    #[test]
    fn sort_by_site_id_is_stable() {
        let mut a = row(2, 1, "SITEB");
        a.host = "first".to_string();
        let mut b = row(1, 2, "SITEB");
        b.host = "second".to_string();
        let mut c = row(2, 3, "SITEB");
        c.host = "third".to_string();

        let rows = normalize(vec![a, b, c], None);
        let hosts: Vec<&str> = rows.iter().map(|r| r.host.as_str()).collect();
        assert_eq!(hosts, ["second", "first", "third"]);
    }

    #[test]
    fn site_filter_is_case_insensitive() {
        let rows = normalize(
            vec![row(1, 1, "SiteB"), row(1, 2, "SITEC")],
            Some("siteb"),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].secondary_site_name, "SiteB");
    }

    #[test]
    fn site_filter_drops_unmapped_hosts_first() {
        let mut unmapped = row(1, 1, "SITEB");
        unmapped.secondary_host = "NOT_MAPPED".to_string();

        let rows = normalize(vec![unmapped.clone(), row(1, 2, "SITEB")], Some("SITEB"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].volume_id, 2);

        // Without a filter the unmapped row stays in the reported set.
        let rows = normalize(vec![unmapped, row(1, 2, "SITEB")], None);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let rows = normalize(vec![row(1, 1, "SITEB"), row(1, 2, "SITEC")], Some(""));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn unmapped_spellings() {
        assert!(is_unmapped_host("not mapped"));
        assert!(is_unmapped_host("NOT_MAPPED"));
        assert!(is_unmapped_host("Not Mapped"));
        assert!(!is_unmapped_host("node2"));
    }
}
