//! Shared command-line arguments.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::session::{Session, WalkMode, resolve_target};
use crate::transport::UdpTransport;
use crate::version::Version;

/// `-v` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    #[value(name = "1")]
    V1,
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Agent and session options.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Agent address: host, host:port or [v6]:port (port defaults to 161).
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// SNMP version.
    #[arg(short = 'v', long = "snmp-version", value_enum, default_value_t = SnmpVersion::V2c)]
    pub snmp_version: SnmpVersion,

    /// Community string.
    #[arg(short = 'c', long, default_value = "public")]
    pub community: String,

    /// Response timeout in seconds.
    #[arg(short = 't', long, default_value_t = 5.0)]
    pub timeout: f64,
}

impl CommonArgs {
    pub fn target_addr(&self) -> crate::Result<SocketAddr> {
        resolve_target(&self.target)
    }

    /// The timeout, or an error message for negative or non-finite input.
    pub fn timeout_duration(&self) -> Result<Duration, String> {
        Duration::try_from_secs_f64(self.timeout)
            .map_err(|e| format!("invalid timeout '{}': {}", self.timeout, e))
    }

    pub fn version(&self) -> Version {
        self.snmp_version.into()
    }

    /// Open a UDP session to the target.
    pub async fn connect(
        &self,
        timeout: Duration,
        max_repetitions: i32,
    ) -> crate::Result<Session<UdpTransport>> {
        let community = self.community.as_bytes();
        match self.snmp_version {
            SnmpVersion::V1 => {
                Session::v1(&self.target)
                    .community(community)
                    .timeout(timeout)
                    .max_repetitions(max_repetitions)
                    .connect()
                    .await
            }
            SnmpVersion::V2c => {
                Session::v2c(&self.target)
                    .community(community)
                    .timeout(timeout)
                    .max_repetitions(max_repetitions)
                    .connect()
                    .await
            }
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `OID = TYPE: value` lines.
    #[default]
    Human,
    /// Pretty-printed JSON with native values.
    Json,
    /// `OID<TAB>value` lines.
    Raw,
}

/// Output and diagnostics options.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format.
    #[arg(short = 'O', long = "output", value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Do not annotate well-known OIDs with names.
    #[arg(long)]
    pub no_hints: bool,

    /// Print elapsed time.
    #[arg(long)]
    pub timing: bool,

    /// Describe the request and response on stderr.
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug logging.
    #[arg(short = 'd', long)]
    pub debug: bool,
}

impl OutputArgs {
    /// Install the stderr log subscriber.
    ///
    /// `RUST_LOG` wins over `-d` and `--verbose`.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let default = if self.debug {
            "typed_snmp=debug"
        } else if self.verbose {
            "typed_snmp=info"
        } else {
            "warn"
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

/// Walk options.
#[derive(Debug, Args)]
pub struct WalkArgs {
    /// Use GETNEXT even on v2c.
    #[arg(long)]
    pub getnext: bool,

    /// GETBULK page size.
    #[arg(
        short = 'r',
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(i32).range(0..)
    )]
    pub max_repetitions: i32,

    /// Stop after this many bindings per subtree.
    #[arg(long)]
    pub limit: Option<usize>,
}

impl WalkArgs {
    pub fn mode(&self) -> WalkMode {
        if self.getnext {
            WalkMode::GetNext
        } else {
            WalkMode::Auto
        }
    }
}
