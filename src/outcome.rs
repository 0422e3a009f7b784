use crate::result::LdapError;

use thiserror::Error;

/// Exit code for granted access.
pub const EXIT_ALLOWED: u8 = 0;
/// Exit code for a valid lookup whose attributes don't grant access.
pub const EXIT_DENIED: u8 = 1;
/// Exit code for every operational failure, and for the informational flags.
pub const EXIT_INDETERMINATE: u8 = 2;

/// Result of one authorization check.
#[derive(Debug)]
pub enum Outcome {
    Allowed,
    Denied,
    Indeterminate(Reason),
}

/// Why no allow/deny decision was reached.
#[derive(Debug, Error)]
pub enum Reason {
    #[error("no directory server reachable")]
    NoServerReachable,
    #[error("bind rejected by {server}: {source}")]
    BindRejected {
        server: String,
        #[source]
        source: LdapError,
    },
    #[error("search error: {0}")]
    SearchFailed(#[source] LdapError),
    #[error("user not found")]
    UserNotFound,
    #[error("raw output requested, no decision made")]
    RawOutput,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Allowed => EXIT_ALLOWED,
            Outcome::Denied => EXIT_DENIED,
            Outcome::Indeterminate(_) => EXIT_INDETERMINATE,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allowed)
    }

    /// Log the one line summarizing the check.
    pub fn log_summary(&self, user: &str) {
        match self {
            Outcome::Allowed => info!("VPN access for user {} allowed", user),
            Outcome::Denied => info!("VPN access for user {} declined", user),
            Outcome::Indeterminate(reason) => {
                error!("VPN access for user {} undetermined: {}", user, reason)
            }
        }
    }
}
