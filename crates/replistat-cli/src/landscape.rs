//! The `-t` landscape report: the site hierarchy as an indented tree.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context, Result};
use replistat_core::tree::TopologyTree;

use crate::client::TopologyClient;

pub fn run_landscape_report(client: &mut dyn TopologyClient, out: &mut dyn Write) -> Result<()> {
    client.probe().context("nameserver is not reachable")?;

    writeln!(out, "System replication landscape:")?;

    let own_site_id = client.local_site_id()?.to_string();

    let names: BTreeMap<String, String> = client
        .tree("/datacenters/name")?
        .into_iter()
        .map(|entry| (entry.name, entry.value))
        .collect();
    let modes: BTreeMap<String, String> = client
        .tree("/datacenters/mode")?
        .into_iter()
        .map(|entry| (entry.name, entry.value))
        .collect();
    let mappings: BTreeMap<String, Vec<String>> = client
        .tree("/datacenters/mappings")?
        .into_iter()
        .map(|entry| (entry.name, entry.children))
        .collect();

    match TopologyTree::build(&own_site_id, &names, &modes, &mappings) {
        Some(tree) => write!(out, "{}", tree.render())?,
        None => writeln!(
            out,
            "site {own_site_id} is not part of the replication landscape"
        )?,
    }
    Ok(())
}
