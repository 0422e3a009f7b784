//! VPN dial-in authorization check against an Active Directory style LDAP
//! service.
//!
//! The crate contains a small LDAPv3 client (simple bind, search, unbind over
//! plain TCP) and the logic built on it: try the configured servers in order,
//! search for the user's entry and reduce its `userAccountControl` and
//! `msNPAllowDialin` attributes to an [`Outcome`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vpnquery::{LdapConnector, Credential, Query, ServerAddress, select_and_query};
//!
//! let servers = [ServerAddress::new("dc1.example.org", 389)];
//! let credential = Credential::new("cn=query,cn=Users,dc=example,dc=org", "secret");
//! let query = Query::dialin("cn=Users,dc=example,dc=org", "jdoe");
//! let outcome = select_and_query(&LdapConnector::default(), &servers, &credential, &query, None);
//! std::process::exit(i32::from(outcome.exit_code()));
//! ```
//!
//! The client itself can be used directly through the blocking [`LdapConn`]:
//!
//! ```rust,no_run
//! use vpnquery::{LdapConn, LdapConnSettings, Scope, SearchEntry};
//! use vpnquery::result::Result;
//!
//! fn main() -> Result<()> {
//!     let mut ldap = LdapConn::with_settings(LdapConnSettings::new(), "localhost", 389)?;
//!     ldap.simple_bind("cn=query,dc=example,dc=org", "secret")?.success()?;
//!     let (rs, _res) = ldap
//!         .search("dc=example,dc=org", Scope::Subtree, "(objectClass=person)", vec!["cn"])?
//!         .success()?;
//!     for entry in rs {
//!         println!("{:?}", SearchEntry::construct(entry)?);
//!     }
//!     ldap.unbind()
//! }
//! ```

#[macro_use]
extern crate log;

mod bind;
pub mod config;
mod conn;
pub mod directory;
pub mod evaluator;
mod filter;
mod ldap;
pub mod license;
pub mod outcome;
mod protocol;
pub mod query;
pub mod result;
mod search;
pub mod selector;
mod sync;
mod unbind;
mod util;

/// Message id of an LDAP request.
pub type RequestId = i32;

pub use config::{Args, Config, ConfigError, ServerAddress};
pub use conn::LdapConnSettings;
pub use directory::{Connector, LdapConnector, Session};
pub use evaluator::{decide, evaluate};
pub use ldap::Ldap;
pub use outcome::{Outcome, Reason};
pub use query::{Credential, Query};
pub use result::{LdapError, LdapResult, SearchResult};
pub use search::{DerefAliases, ResultEntry, Scope, SearchEntry, SearchOptions};
pub use selector::{authorize, select_and_query};
pub use sync::LdapConn;
pub use util::ldap_escape;
