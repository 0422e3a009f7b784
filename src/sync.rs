use crate::conn::LdapConnSettings;
use crate::ldap::Ldap;
use crate::result::{LdapResult, Result, SearchResult};
use crate::search::{Scope, SearchOptions};

use tokio::runtime::{self, Runtime};

/// Handle for blocking LDAP operations.
///
/// The handle owns a single-threaded Tokio runtime and the asynchronous
/// [`Ldap`](struct.Ldap.html) handle driven on it; every method blocks the
/// calling thread until the operation completes. Dropping the handle closes
/// the connection; [`unbind()`](#method.unbind) closes it politely first.
#[derive(Debug)]
pub struct LdapConn {
    ldap: Ldap,
    rt: Runtime,
}

impl LdapConn {
    /// Open a connection to `host:port` with the provided settings.
    pub fn with_settings(settings: LdapConnSettings, host: &str, port: u16) -> Result<Self> {
        let rt = runtime::Builder::new_current_thread().enable_all().build()?;
        let ldap = rt.block_on(async { Ldap::connect(host, port, &settings).await })?;
        Ok(LdapConn { ldap, rt })
    }

    /// See [`Ldap::simple_bind()`](struct.Ldap.html#method.simple_bind).
    pub fn simple_bind(&mut self, bind_dn: &str, bind_pw: &str) -> Result<LdapResult> {
        let rt = &self.rt;
        let ldap = &mut self.ldap;
        rt.block_on(async move { ldap.simple_bind(bind_dn, bind_pw).await })
    }

    /// See [`Ldap::with_search_options()`](struct.Ldap.html#method.with_search_options).
    pub fn with_search_options(&mut self, opts: SearchOptions) -> &mut Self {
        self.ldap.with_search_options(opts);
        self
    }

    /// See [`Ldap::search()`](struct.Ldap.html#method.search).
    pub fn search<S: AsRef<str>>(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: Vec<S>,
    ) -> Result<SearchResult> {
        let rt = &self.rt;
        let ldap = &mut self.ldap;
        rt.block_on(async move { ldap.search(base, scope, filter, attrs).await })
    }

    /// See [`Ldap::unbind()`](struct.Ldap.html#method.unbind).
    pub fn unbind(&mut self) -> Result<()> {
        let rt = &self.rt;
        let ldap = &mut self.ldap;
        rt.block_on(async move { ldap.unbind().await })
    }
}
