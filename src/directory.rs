//! The seam between the access check and the LDAP client.
//!
//! The selector and evaluator only talk to [`Connector`] and [`Session`], so
//! they can be driven by an in-memory directory in tests.

use crate::config::ServerAddress;
use crate::conn::LdapConnSettings;
use crate::query::{Credential, Query};
use crate::result::Result;
use crate::search::SearchEntry;
use crate::sync::LdapConn;

/// Opens sessions to directory servers.
pub trait Connector {
    type Session: Session;

    fn connect(&self, server: &ServerAddress) -> Result<Self::Session>;
}

/// One open connection to a directory server.
pub trait Session {
    /// Authenticate; any non-success result is an error.
    fn bind(&mut self, credential: &Credential) -> Result<()>;

    /// Run the query and return every entry found.
    fn search(&mut self, query: &Query) -> Result<Vec<SearchEntry>>;

    fn close(&mut self) -> Result<()>;
}

/// Connects over plain TCP with the blocking client.
#[derive(Clone, Debug, Default)]
pub struct LdapConnector {
    settings: LdapConnSettings,
}

impl LdapConnector {
    pub fn new(settings: LdapConnSettings) -> Self {
        LdapConnector { settings }
    }
}

impl Connector for LdapConnector {
    type Session = LdapConn;

    fn connect(&self, server: &ServerAddress) -> Result<LdapConn> {
        LdapConn::with_settings(self.settings.clone(), &server.host, server.port)
    }
}

impl Session for LdapConn {
    fn bind(&mut self, credential: &Credential) -> Result<()> {
        self.simple_bind(credential.bind_dn(), credential.password())?
            .success()?;
        Ok(())
    }

    fn search(&mut self, query: &Query) -> Result<Vec<SearchEntry>> {
        let (entries, _res) = self
            .with_search_options(query.options().clone())
            .search(query.base(), query.scope(), query.filter(), query.attrs().to_vec())?
            .success()?;
        entries.into_iter().map(SearchEntry::construct).collect()
    }

    fn close(&mut self) -> Result<()> {
        self.unbind()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::rc::Rc;

    use super::*;
    use crate::result::{LdapError, LdapResult};

    pub(crate) type Events = Rc<RefCell<Vec<String>>>;

    /// In-memory directory. Every call is recorded as `"<op> <host>"`.
    #[derive(Default)]
    pub(crate) struct FakeConnector {
        pub(crate) events: Events,
        pub(crate) unreachable: HashSet<String>,
        pub(crate) rejecting: HashSet<String>,
        pub(crate) failing_search: bool,
        pub(crate) entries: HashMap<String, Vec<SearchEntry>>,
    }

    impl FakeConnector {
        pub(crate) fn unreachable(mut self, host: &str) -> Self {
            self.unreachable.insert(host.to_owned());
            self
        }

        pub(crate) fn rejecting(mut self, host: &str) -> Self {
            self.rejecting.insert(host.to_owned());
            self
        }

        pub(crate) fn failing_search(mut self) -> Self {
            self.failing_search = true;
            self
        }

        pub(crate) fn with_entries(mut self, host: &str, entries: Vec<SearchEntry>) -> Self {
            self.entries.insert(host.to_owned(), entries);
            self
        }

        pub(crate) fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    impl Connector for FakeConnector {
        type Session = FakeSession;

        fn connect(&self, server: &ServerAddress) -> Result<FakeSession> {
            let host = server.host.clone();
            self.events.borrow_mut().push(format!("connect {}", host));
            if self.unreachable.contains(&host) {
                return Err(io::Error::from(io::ErrorKind::ConnectionRefused).into());
            }
            Ok(FakeSession {
                events: Rc::clone(&self.events),
                reject_bind: self.rejecting.contains(&host),
                fail_search: self.failing_search,
                entries: self.entries.get(&host).cloned().unwrap_or_default(),
                host,
            })
        }
    }

    pub(crate) struct FakeSession {
        events: Events,
        host: String,
        reject_bind: bool,
        fail_search: bool,
        entries: Vec<SearchEntry>,
    }

    impl Session for FakeSession {
        fn bind(&mut self, _credential: &Credential) -> Result<()> {
            self.events.borrow_mut().push(format!("bind {}", self.host));
            if self.reject_bind {
                return Err(LdapError::LdapResult {
                    result: LdapResult {
                        rc: 49,
                        matched: String::new(),
                        text: "invalid credentials".to_owned(),
                        refs: vec![],
                    },
                });
            }
            Ok(())
        }

        fn search(&mut self, _query: &Query) -> Result<Vec<SearchEntry>> {
            self.events.borrow_mut().push(format!("search {}", self.host));
            if self.fail_search {
                return Err(LdapError::EndOfStream);
            }
            Ok(self.entries.clone())
        }

        fn close(&mut self) -> Result<()> {
            self.events.borrow_mut().push(format!("close {}", self.host));
            Ok(())
        }
    }

    pub(crate) fn entry(dn: &str, attrs: &[(&str, &str)]) -> SearchEntry {
        let mut entry = SearchEntry {
            dn: dn.to_owned(),
            ..Default::default()
        };
        for (attr, val) in attrs {
            entry
                .attrs
                .entry((*attr).to_owned())
                .or_default()
                .push((*val).to_owned());
        }
        entry
    }
}
