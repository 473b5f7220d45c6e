use clap::Parser;

/// Reports the system replication status of a clustered, multi-site
/// database deployment.
///
/// The long option spellings (`--printLandscapeTree`,
/// `--omitSecondaryActiveStatus`, `--sapcontrol=1`) are historical and
/// passed verbatim by external tooling; keep them as-is.
#[derive(Debug, Parser)]
#[command(name = "replistat", version, about, long_about = None)]
pub struct Cli {
    /// Show the full column list instead of the short one
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Restrict the query to services running on the local host
    #[arg(short = 'l', long = "localhost")]
    pub localhost: bool,

    /// Only report the secondary site with this name (case-insensitive)
    #[arg(short = 's', long = "site", value_name = "NAME")]
    pub site: Option<String>,

    /// Print the replication landscape tree and exit
    #[arg(short = 't', long = "printLandscapeTree")]
    pub print_landscape_tree: bool,

    /// Emit machine-readable key=value output when set to 1
    #[arg(long = "sapcontrol", value_name = "1")]
    pub sapcontrol: Option<String>,

    /// Skip the costlier probe of the secondary connection state
    #[arg(long = "omitSecondaryActiveStatus")]
    pub omit_secondary_active_status: bool,

    /// Path to the instance configuration file
    #[arg(long, env = "REPLISTAT_CONFIG")]
    pub config: Option<String>,

    /// Nameserver URL
    #[arg(long, env = "REPLISTAT_URL")]
    pub url: Option<String>,

    /// Master nameserver URL, tried once when the default is unreachable
    #[arg(long = "master-url", env = "REPLISTAT_MASTER_URL")]
    pub master_url: Option<String>,
}

impl Cli {
    /// Machine mode is only engaged by the exact historical spelling.
    pub fn machine_mode(&self) -> bool {
        self.sapcontrol.as_deref() == Some("1")
    }
}
