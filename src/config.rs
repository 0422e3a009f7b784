//! Command line options and the immutable configuration built from them.

use std::ffi::OsString;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::conn::LdapConnSettings;
use crate::outcome::EXIT_INDETERMINATE;
use crate::query::Credential;

use clap::Parser;
use thiserror::Error;
use url::{Host, Url};

pub const DEFAULT_PORT: u16 = 389;

/// Query a directory server whether a user may dial in over VPN.
///
/// Exit status: 0 access allowed, 1 access denied, 2 undetermined.
#[derive(Debug, Parser)]
#[command(name = "vpnquery", disable_version_flag = true)]
pub struct Args {
    /// Username to query
    #[arg(long, env = "VPNQUERY_USER", required_unless_present_any = ["version", "license"])]
    pub user: Option<String>,

    /// Directory servers, comma-separated, tried in order
    #[arg(
        long,
        env = "VPNQUERY_LDAPHOST",
        value_delimiter = ',',
        required_unless_present_any = ["version", "license"]
    )]
    pub ldaphost: Vec<String>,

    /// Port for servers listed without one
    #[arg(long, env = "VPNQUERY_LDAPPORT", default_value_t = DEFAULT_PORT)]
    pub ldapport: u16,

    /// DN to bind as
    #[arg(long, env = "VPNQUERY_LDAPUSER", required_unless_present_any = ["version", "license"])]
    pub ldapuser: Option<String>,

    /// Password for the bind DN
    #[arg(
        long,
        env = "VPNQUERY_LDAPPASSWD",
        hide_env_values = true,
        required_unless_present_any = ["version", "license"]
    )]
    pub ldappasswd: Option<String>,

    /// Base DN for the search
    #[arg(long, env = "VPNQUERY_LDAPBASE", required_unless_present_any = ["version", "license"])]
    pub ldapbase: Option<String>,

    /// Dump the matched entries instead of deciding
    #[arg(long)]
    pub raw: bool,

    /// Connect and per-operation timeout
    #[arg(long, env = "VPNQUERY_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the version and exit
    #[arg(long)]
    pub version: bool,

    /// Print the license and exit
    #[arg(long)]
    pub license: bool,
}

impl Args {
    /// Parse a command line, printing clap's message on failure.
    ///
    /// Every early exit, `--help` included, yields the indeterminate exit
    /// code; 0 is reserved for granted access.
    pub fn parse_cli<I, T>(itr: I) -> Result<Args, u8>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Args::try_parse_from(itr).map_err(|e| {
            let _ = e.print();
            EXIT_INDETERMINATE
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option --{0}")]
    Missing(&'static str),
    #[error("invalid server entry \"{entry}\": {reason}")]
    InvalidServer { entry: String, reason: &'static str },
    #[error("unsupported URL scheme \"{0}\", only ldap:// is available")]
    UnsupportedScheme(String),
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One candidate directory server; list order is priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerAddress {
            host: host.into(),
            port,
        }
    }

    /// Parse one server list entry: `host`, `host:port`, an IP address with or
    /// without port, or an `ldap://` URL. Entries without a port get `default_port`.
    pub fn parse(entry: &str, default_port: u16) -> Result<Self, ConfigError> {
        let entry = entry.trim();
        let invalid = |reason| ConfigError::InvalidServer {
            entry: entry.to_owned(),
            reason,
        };
        if entry.contains("://") {
            let url = Url::parse(entry)?;
            if url.scheme() != "ldap" {
                return Err(ConfigError::UnsupportedScheme(url.scheme().to_owned()));
            }
            let host = match url.host() {
                Some(Host::Domain(d)) if !d.is_empty() => d.to_owned(),
                Some(Host::Ipv4(v4)) => v4.to_string(),
                Some(Host::Ipv6(v6)) => v6.to_string(),
                _ => return Err(invalid("no host in URL")),
            };
            return Ok(ServerAddress::new(host, url.port().unwrap_or(default_port)));
        }
        if let Ok(addr) = entry.parse::<SocketAddr>() {
            return Ok(ServerAddress::new(addr.ip().to_string(), addr.port()));
        }
        if let Ok(ip) = entry.parse::<IpAddr>() {
            return Ok(ServerAddress::new(ip.to_string(), default_port));
        }
        match entry.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| invalid("bad port"))?;
                if host.is_empty() || host.contains(':') {
                    return Err(invalid("bad host"));
                }
                Ok(ServerAddress::new(host, port))
            }
            None => Ok(ServerAddress::new(entry, default_port)),
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Everything one check needs, fixed at startup.
#[derive(Clone, Debug)]
pub struct Config {
    user: String,
    servers: Vec<ServerAddress>,
    credential: Credential,
    base_dn: String,
    raw_output: bool,
    settings: LdapConnSettings,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let servers = args
            .ldaphost
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(|entry| ServerAddress::parse(entry, args.ldapport))
            .collect::<Result<Vec<_>, _>>()?;
        let mut settings = LdapConnSettings::new();
        if let Some(secs) = args.timeout {
            let timeout = Duration::from_secs(secs);
            settings = settings.set_conn_timeout(timeout).set_op_timeout(timeout);
        }
        Ok(Config {
            user: args.user.ok_or(ConfigError::Missing("user"))?,
            servers,
            credential: Credential::new(
                args.ldapuser.ok_or(ConfigError::Missing("ldapuser"))?,
                args.ldappasswd.ok_or(ConfigError::Missing("ldappasswd"))?,
            ),
            base_dn: args.ldapbase.ok_or(ConfigError::Missing("ldapbase"))?,
            raw_output: args.raw,
            settings,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn servers(&self) -> &[ServerAddress] {
        &self.servers
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn base_dn(&self) -> &str {
        &self.base_dn
    }

    pub fn raw_output(&self) -> bool {
        self.raw_output
    }

    pub fn settings(&self) -> &LdapConnSettings {
        &self.settings
    }
}
