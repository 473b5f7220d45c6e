//! Reduction of per-service rows into one status record per secondary
//! site, plus the overall worst-of reduction.

use std::fmt;

use crate::row::{self, ReplicationRow};
use crate::status::ReplicationStatus;

/// Raw states that are transitional and carry no health signal. Rows in
/// these states contribute to no record and never worsen the overall
/// status.
const SKIPPED_RAW_STATES: [&str; 2] = ["STOPPED", "TENANTCOPY"];

/// Key of a [`SiteStatusRecord`]: a secondary site id, or the sentinel
/// for rows whose secondary host is explicitly unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKey {
    Id(u32),
    NotMapped,
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteKey::Id(id) => write!(f, "{id}"),
            SiteKey::NotMapped => f.write_str("NOT MAPPED"),
        }
    }
}

/// Aggregated replication state of one secondary site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteStatusRecord {
    pub key: SiteKey,
    pub secondary_site_name: String,
    pub replication_mode: String,
    /// Local site id the secondary replicates from. Absent for the
    /// unmapped sentinel, where no source is attributable.
    pub source_site_id: Option<u32>,
    pub status: ReplicationStatus,
}

impl SiteStatusRecord {
    fn not_mapped() -> SiteStatusRecord {
        SiteStatusRecord {
            key: SiteKey::NotMapped,
            secondary_site_name: "ERROR".to_string(),
            replication_mode: "ERROR".to_string(),
            source_site_id: None,
            status: ReplicationStatus::Error,
        }
    }
}

/// Collapses normalized rows into one record per secondary site.
///
/// Record order follows first appearance in the row order, so with rows
/// sorted by local site id the records come out in display order. Each
/// record starts at `Active` and is only ever lowered via
/// [`ReplicationStatus::worse_of`]; rows with an unmapped secondary host
/// produce (or keep) the `NOT MAPPED` sentinel at `Error` instead of a
/// per-site record.
pub fn aggregate(rows: &[ReplicationRow]) -> Vec<SiteStatusRecord> {
    let mut records: Vec<SiteStatusRecord> = Vec::new();

    for row in rows {
        if SKIPPED_RAW_STATES.contains(&row.replication_status.as_str()) {
            continue;
        }

        if row::is_unmapped_host(&row.secondary_host) {
            if !records.iter().any(|r| r.key == SiteKey::NotMapped) {
                records.push(SiteStatusRecord::not_mapped());
            }
            continue;
        }

        let key = SiteKey::Id(row.secondary_site_id);
        let position = match records.iter().position(|r| r.key == key) {
            Some(position) => position,
            None => {
                records.push(SiteStatusRecord {
                    key,
                    secondary_site_name: row.secondary_site_name.clone(),
                    replication_mode: row.replication_mode.clone(),
                    source_site_id: Some(row.site_id),
                    status: ReplicationStatus::Active,
                });
                records.len() - 1
            }
        };
        let record = &mut records[position];
        let row_status = ReplicationStatus::from_text(&row.replication_status);
        record.status = ReplicationStatus::worse_of(record.status, row_status);
    }

    records
}

/// Worst status across all records; `Active` for an empty set. The
/// empty-set role semantics (primary vs. no replication role) are the
/// report layer's decision.
pub fn overall(records: &[SiteStatusRecord]) -> ReplicationStatus {
    records
        .iter()
        .fold(ReplicationStatus::Active, |acc, record| {
            ReplicationStatus::worse_of(acc, record.status)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(
        site_id: u32,
        secondary_site_id: u32,
        secondary_host: &str,
        status: &str,
    ) -> ReplicationRow {
        serde_json::from_value(json!({
            "HOST": "node1",
            "PORT": 30003,
            "SERVICE_NAME": "indexserver",
            "VOLUME_ID": 1,
            "SITE_ID": site_id,
            "SITE_NAME": "SITEA",
            "SECONDARY_HOST": secondary_host,
            "SECONDARY_PORT": 30003,
            "SECONDARY_SITE_ID": secondary_site_id,
            "SECONDARY_SITE_NAME": format!("SITE{secondary_site_id}"),
            "SECONDARY_ACTIVE_STATUS": "YES",
            "REPLICATION_MODE": "SYNC",
            "REPLICATION_STATUS": status,
            "REPLICATION_STATUS_DETAILS": "",
        }))
        .unwrap()
    }

    #[test]
    fn keeps_worst_status_per_site() {
        let records = aggregate(&[
            row(1, 2, "node2", "ACTIVE"),
            row(1, 2, "node2", "SYNCING"),
            row(1, 2, "node2", "ACTIVE"),
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, SiteKey::Id(2));
        assert_eq!(records[0].status, ReplicationStatus::Syncing);
        assert_eq!(records[0].source_site_id, Some(1));
        assert_eq!(overall(&records), ReplicationStatus::Syncing);
    }

    #[test]
    fn status_is_never_re_raised() {
        let records = aggregate(&[
            row(1, 2, "node2", "ERROR"),
            row(1, 2, "node2", "ACTIVE"),
        ]);
        assert_eq!(records[0].status, ReplicationStatus::Error);
    }

    #[test]
    fn transitional_states_contribute_nothing() {
        let records = aggregate(&[
            row(1, 2, "node2", "STOPPED"),
            row(1, 3, "node3", "TENANTCOPY"),
        ]);
        assert!(records.is_empty());
        assert_eq!(overall(&records), ReplicationStatus::Active);
    }

    #[test]
    fn unmapped_host_strengthens_the_sentinel_only() {
        let records = aggregate(&[
            row(1, 2, "not mapped", "ACTIVE"),
            row(1, 2, "NOT_MAPPED", "ACTIVE"),
            row(1, 3, "node3", "ACTIVE"),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, SiteKey::NotMapped);
        assert_eq!(records[0].status, ReplicationStatus::Error);
        assert_eq!(records[0].secondary_site_name, "ERROR");
        assert_eq!(records[0].source_site_id, None);
        assert_eq!(records[1].key, SiteKey::Id(3));
        assert_eq!(overall(&records), ReplicationStatus::Error);
    }

    #[test]
    fn unknown_raw_text_lowers_to_error() {
        let records = aggregate(&[row(1, 2, "node2", "SOME_FUTURE_STATE")]);
        assert_eq!(records[0].status, ReplicationStatus::Error);
    }

    #[test]
    fn record_order_follows_first_appearance() {
        let records = aggregate(&[
            row(1, 3, "node3", "ACTIVE"),
            row(1, 2, "node2", "ACTIVE"),
            row(2, 3, "node3", "ACTIVE"),
        ]);
        assert_eq!(records[0].key, SiteKey::Id(3));
        assert_eq!(records[1].key, SiteKey::Id(2));
    }

    #[test]
    fn overall_of_empty_set_is_active() {
        assert_eq!(overall(&[]), ReplicationStatus::Active);
    }
}
