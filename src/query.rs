use std::fmt;

use crate::search::{DerefAliases, Scope, SearchOptions};
use crate::util::ldap_escape;

/// Account state bitfield; compared as an opaque string.
pub const USER_ACCOUNT_CONTROL: &str = "userAccountControl";
/// Dial-in permission flag.
pub const ALLOW_DIALIN: &str = "msNPAllowDialin";

const ATTRIBUTES: [&str; 2] = [ALLOW_DIALIN, USER_ACCOUNT_CONTROL];

/// Bind identity, shared by every server attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    bind_dn: String,
    password: String,
}

impl Credential {
    pub fn new(bind_dn: impl Into<String>, password: impl Into<String>) -> Self {
        Credential {
            bind_dn: bind_dn.into(),
            password: password.into(),
        }
    }

    pub fn bind_dn(&self) -> &str {
        &self.bind_dn
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credential")
            .field("bind_dn", &self.bind_dn)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The one lookup this tool performs: the dial-in attributes of the entry
/// whose common name equals the username, anywhere below the base DN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    base: String,
    filter: String,
    options: SearchOptions,
}

impl Query {
    pub fn dialin(base: &str, username: &str) -> Self {
        Query {
            base: base.to_owned(),
            filter: format!("(cn={})", ldap_escape(username)),
            options: SearchOptions::new()
                .deref(DerefAliases::Never)
                .sizelimit(0)
                .timelimit(0)
                .typesonly(false),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn scope(&self) -> Scope {
        Scope::Subtree
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn attrs(&self) -> &[&'static str] {
        &ATTRIBUTES
    }
}
