//! The local-identity block appended to every report.

use std::fmt::Write;

/// Replication identity of the local site.
///
/// Every field is optional: when the nameserver is unreachable the
/// renderers print what is known and drop the rest, so the fallback
/// report still carries whatever identity could be gathered.
#[derive(Debug, Clone, Default)]
pub struct LocalReplicationState {
    pub site_id: Option<u32>,
    /// Uppercased replication mode ("PRIMARY", "SYNC", ...).
    pub mode: Option<String>,
    pub site_name: Option<String>,
    /// Site this one replicates from. Meaningless on a primary.
    pub source_site_id: Option<u32>,
    /// Space-joined primary master hostnames, port suffixes stripped.
    pub primary_masters: Option<String>,
}

impl LocalReplicationState {
    pub fn is_primary(&self) -> bool {
        self.mode.as_deref() == Some("PRIMARY")
    }

    /// Human block, preceded by a blank line.
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str("Local System Replication State\n");
        out.push_str("~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~\n\n");
        if let Some(mode) = &self.mode {
            let _ = writeln!(out, "mode: {mode}");
        }
        if let Some(id) = self.site_id {
            let _ = writeln!(out, "site id: {id}");
        }
        if let Some(name) = &self.site_name {
            let _ = writeln!(out, "site name: {name}");
        }
        if !self.is_primary() {
            if let Some(source) = self.source_site_id {
                let _ = writeln!(out, "active primary site: {source}");
            }
            if let Some(masters) = &self.primary_masters {
                let _ = writeln!(out, "primary masters: {masters}");
            }
        }
        out
    }

    /// Machine lines. Site-keyed lines require a known site id; the
    /// trailing `local_site_id=` line is the block terminator.
    pub fn render_machine(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(id) = self.site_id {
            if let Some(mode) = &self.mode {
                lines.push(format!("site/{id}/REPLICATION_MODE={mode}"));
            }
            if let Some(name) = &self.site_name {
                lines.push(format!("site/{id}/SITE_NAME={name}"));
            }
            if !self.is_primary() {
                if let Some(source) = self.source_site_id {
                    lines.push(format!("site/{id}/SOURCE_SITE_ID={source}"));
                }
                if let Some(masters) = &self.primary_masters {
                    lines.push(format!("site/{id}/PRIMARY_MASTERS={masters}"));
                }
            }
            lines.push(format!("local_site_id={id}"));
        }
        lines
    }
}

/// Strips the `:port` suffix from each whitespace-separated endpoint.
pub fn strip_ports(masters: &str) -> String {
    masters
        .split_whitespace()
        .map(|endpoint| endpoint.split(':').next().unwrap_or(endpoint))
        .collect::<Vec<_>>()
        .join(" ")
}
