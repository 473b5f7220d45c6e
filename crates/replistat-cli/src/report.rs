//! The status report: top-level role decisions, row collection, and
//! assembly of the human and machine outputs.
//!
//! Every nameserver failure below is absorbed into the status taxonomy;
//! the report always completes and the caller always gets an exit
//! status. The output stream layout (sentinels, key names, line order)
//! is parsed by cluster-management tooling.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use replistat_core::aggregate::{self, SiteStatusRecord};
use replistat_core::identity::LocalReplicationState;
use replistat_core::{ReplicationRow, ReplicationStatus, machine, row, table};
use tracing::{debug, warn};

use crate::client::TopologyClient;
use crate::config::InstanceConfig;

pub struct ReportOptions {
    /// `--all`: full column list.
    pub long_format: bool,
    /// `--site`: case-insensitive secondary site name filter.
    pub site_filter: Option<String>,
    /// `--sapcontrol=1`: machine key=value output.
    pub machine: bool,
    /// Inverted `--omitSecondaryActiveStatus`.
    pub secondary_active: bool,
    /// `--localhost`: restrict to the local host's services.
    pub local_only: bool,
}

/// Result of the row-collection step. A failed fetch is not an error to
/// propagate but a sentinel the overall-status step reports as `ERROR`.
pub struct CollectOutcome {
    pub rows: Vec<ReplicationRow>,
    pub failed: bool,
}

/// Runs the full status report and returns the overall status, whose
/// numeric value is the process exit code.
pub fn run_status_report(
    client: &mut dyn TopologyClient,
    config: &InstanceConfig,
    opts: &ReportOptions,
    out: &mut dyn Write,
) -> io::Result<ReplicationStatus> {
    if let Err(err) = client.probe() {
        warn!(error = %err, "nameserver is not reachable");
        return unknown_fallback(client, config, opts, out);
    }

    let dr_mode = match client.dr_mode() {
        Ok(mode) => mode,
        Err(err) => {
            warn!(error = %err, "replication mode query failed");
            return unknown_fallback(client, config, opts, out);
        }
    };
    if dr_mode.is_empty() {
        if opts.machine {
            writeln!(out, "{}", machine::BEGIN_SENTINEL)?;
            writeln!(out, "local_site_id=0")?;
            writeln!(out, "{}", machine::END_SENTINEL)?;
        } else {
            writeln!(out, "this system is not a system replication site")?;
        }
        return Ok(ReplicationStatus::NoReplication);
    }

    let info = match client.replication_info() {
        Ok(info) => info,
        Err(err) => {
            warn!(error = %err, "replication info query failed");
            return unknown_fallback(client, config, opts, out);
        }
    };
    if !info.mode.eq_ignore_ascii_case("primary") {
        return unknown_fallback(client, config, opts, out);
    }

    if info.consumer_count == 0 {
        if opts.machine {
            writeln!(out, "{}", machine::BEGIN_SENTINEL)?;
        } else {
            writeln!(out, "there are no secondary sites attached")?;
        }
        write_identity(client, config, opts.machine, out)?;
        if opts.machine {
            writeln!(out, "{}", machine::END_SENTINEL)?;
        }
        return Ok(ReplicationStatus::NoReplication);
    }

    let outcome = collect_rows(client, opts);
    let records = aggregate::aggregate(&outcome.rows);

    if opts.machine {
        writeln!(out, "{}", machine::BEGIN_SENTINEL)?;
        for row in &outcome.rows {
            for line in machine::service_lines(row) {
                writeln!(out, "{line}")?;
            }
        }
    } else {
        let multidb = config.is_multidb();
        let columns = if opts.long_format {
            table::full_columns(multidb)
        } else {
            table::short_columns(multidb)
        };
        let cells: Vec<_> = outcome.rows.iter().map(ReplicationRow::cells).collect();
        write!(out, "{}", table::render(&columns, &cells))?;
    }

    let overall = write_overall(client, &outcome, &records, opts.machine, out)?;
    write_identity(client, config, opts.machine, out)?;
    if opts.machine {
        writeln!(out, "{}", machine::END_SENTINEL)?;
    }
    Ok(overall)
}

/// Fallback report when the local system is unreachable or not the
/// primary: only the local replication identity can be stated.
fn unknown_fallback(
    client: &mut dyn TopologyClient,
    config: &InstanceConfig,
    opts: &ReportOptions,
    out: &mut dyn Write,
) -> io::Result<ReplicationStatus> {
    if opts.machine {
        writeln!(out, "{}", machine::BEGIN_SENTINEL)?;
    } else {
        writeln!(
            out,
            "this system is either not running or not primary system replication site"
        )?;
    }
    write_identity(client, config, opts.machine, out)?;
    if opts.machine {
        writeln!(out, "{}", machine::END_SENTINEL)?;
    }
    Ok(ReplicationStatus::Unknown)
}

/// Fetches and normalizes the raw rows. Never lets a client error
/// escape: a failed fetch becomes an empty set with the failed flag.
fn collect_rows(client: &mut dyn TopologyClient, opts: &ReportOptions) -> CollectOutcome {
    let failed = CollectOutcome {
        rows: Vec::new(),
        failed: true,
    };

    let host = if opts.local_only {
        match client.service_host() {
            Ok(host) => Some(host),
            Err(err) => {
                warn!(error = %err, "service host query failed");
                return failed;
            }
        }
    } else {
        None
    };

    match client.replication_rows(opts.secondary_active, host.as_deref()) {
        Ok(raw) => {
            debug!(rows = raw.len(), "fetched replication rows");
            CollectOutcome {
                rows: row::normalize(raw, opts.site_filter.as_deref()),
                failed: false,
            }
        }
        Err(err) => {
            warn!(error = %err, "replication status query failed");
            failed
        }
    }
}

fn write_overall(
    client: &mut dyn TopologyClient,
    outcome: &CollectOutcome,
    records: &[SiteStatusRecord],
    machine_mode: bool,
    out: &mut dyn Write,
) -> io::Result<ReplicationStatus> {
    if !machine_mode {
        writeln!(out)?;
    }

    if outcome.failed {
        let status = ReplicationStatus::Error;
        if machine_mode {
            writeln!(out, "{}", machine::status_line(status))?;
        } else {
            writeln!(out, "overall system replication status: {}", paint(status))?;
        }
        return Ok(status);
    }

    if records.is_empty() {
        // --localhost on a primary standby host, or every row skipped:
        // the role probe decides between healthy-primary and no-replication.
        let primary = client
            .dr_mode()
            .map(|mode| mode.eq_ignore_ascii_case("primary"))
            .unwrap_or(false);
        let status = if primary {
            ReplicationStatus::Active
        } else {
            ReplicationStatus::NoReplication
        };
        if machine_mode {
            let line = if primary {
                machine::overall_line(status)
            } else {
                machine::status_line(status)
            };
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "overall system replication status: {}", paint(status))?;
        }
        return Ok(status);
    }

    let mut overall = ReplicationStatus::Active;
    for record in records {
        if machine_mode {
            for line in machine::site_lines(record) {
                writeln!(out, "{line}")?;
            }
        } else {
            writeln!(
                out,
                "status system replication site \"{}\": {}",
                record.key, record.status
            )?;
        }
        overall = ReplicationStatus::worse_of(overall, record.status);
    }

    if machine_mode {
        writeln!(out, "{}", machine::overall_line(overall))?;
    } else {
        writeln!(out, "overall system replication status: {}", paint(overall))?;
    }
    Ok(overall)
}

/// Gathers the local identity block, degrading field by field when the
/// nameserver cannot answer.
fn gather_identity(client: &mut dyn TopologyClient, config: &InstanceConfig) -> LocalReplicationState {
    let mode = client
        .dr_mode()
        .ok()
        .map(|mode| mode.to_uppercase())
        .filter(|mode| !mode.is_empty());
    let site_id = client.local_site_id().ok();
    let source_site_id = client.source_site_id().ok();
    let primary_masters = source_site_id.and_then(|id| config.primary_masters(id));

    LocalReplicationState {
        site_id,
        mode,
        site_name: config.site_name().map(str::to_string),
        source_site_id,
        primary_masters,
    }
}

fn write_identity(
    client: &mut dyn TopologyClient,
    config: &InstanceConfig,
    machine_mode: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    let state = gather_identity(client, config);
    if machine_mode {
        for line in state.render_machine() {
            writeln!(out, "{line}")?;
        }
    } else {
        write!(out, "{}", state.render_human())?;
    }
    Ok(())
}

fn paint(status: ReplicationStatus) -> ColoredString {
    let text = status.as_text();
    match status {
        ReplicationStatus::Active => text.green(),
        ReplicationStatus::Error | ReplicationStatus::NoReplication => text.red(),
        _ => text.yellow(),
    }
}
