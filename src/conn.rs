use std::time::Duration;

use crate::ldap::Ldap;
use crate::result::Result;

use tokio::net::TcpStream;
use tokio::time;

/// Additional settings for an LDAP connection.
///
/// The structure is opaque for better extensibility. An instance with
/// default values is constructed by [`new()`](#method.new), and all
/// available settings can be replaced through a builder-like interface,
/// by calling the appropriate functions.
#[derive(Clone, Debug, Default)]
pub struct LdapConnSettings {
    conn_timeout: Option<Duration>,
    op_timeout: Option<Duration>,
}

impl LdapConnSettings {
    /// Create an instance of the structure with default settings.
    pub fn new() -> LdapConnSettings {
        LdapConnSettings {
            ..Default::default()
        }
    }

    /// Set the connection timeout. If a connection to the server can't
    /// be established before the timeout expires, an error will be
    /// returned to the user. Defaulting to `None`, which means an infinite
    /// timeout.
    pub fn set_conn_timeout(mut self, timeout: Duration) -> Self {
        self.conn_timeout = Some(timeout);
        self
    }

    /// Set the timeout for each request write and response read on the
    /// established connection. Defaults to `None`.
    pub fn set_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = Some(timeout);
        self
    }

    pub fn conn_timeout(&self) -> Option<Duration> {
        self.conn_timeout
    }

    pub fn op_timeout(&self) -> Option<Duration> {
        self.op_timeout
    }
}

impl Ldap {
    /// Open a plain TCP connection to `host:port`.
    pub async fn connect(host: &str, port: u16, settings: &LdapConnSettings) -> Result<Ldap> {
        let stream = match settings.conn_timeout {
            Some(timeout) => time::timeout(timeout, TcpStream::connect((host, port))).await??,
            None => TcpStream::connect((host, port)).await?,
        };
        debug!("connected to {}:{}", host, port);
        Ok(Ldap::new(stream, settings))
    }
}
