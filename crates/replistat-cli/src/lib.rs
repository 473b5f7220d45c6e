//! Command-line interface of the replistat diagnostic tool.
//!
//! The binary is thin: argument parsing lives in [`cli`], the nameserver
//! boundary in [`client`], instance configuration in [`config`], and the
//! two reports (status, landscape tree) in [`report`] and [`landscape`].
//! All rendering and aggregation logic is in `replistat-core`.

pub mod cli;
pub mod client;
pub mod config;
pub mod landscape;
pub mod report;
