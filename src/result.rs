//! Operation result structures and helpers.
//!
//! Bind and Search both end with an [`LdapResult`](struct.LdapResult.html). This module
//! contains its definition and decoder, the wrapper for complete Search results, and
//! the crate-wide error type.

use std::fmt;
use std::io;
use std::result::Result as StdResult;

use crate::search::{parse_refs, ResultEntry};
use crate::RequestId;

use lber::common::TagClass;
use lber::parse::parse_uint;
use lber::structure::StructureTag;
use lber::universal::Types;

use thiserror::Error;
use tokio::time;

/// Type alias for the standard `Result` with the fixed `LdapError` error part.
pub type Result<T> = StdResult<T, LdapError>;

/// Error variants recognized by the library.
#[derive(Debug, Error)]
pub enum LdapError {
    /// I/O error, including failed connection attempts.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Connection or operation timeout.
    #[error("timeout: {elapsed}")]
    Timeout {
        #[from]
        elapsed: time::error::Elapsed,
    },

    /// Error parsing the string representation of a search filter.
    #[error("filter parse error")]
    FilterParsing,

    /// The server closed the connection in the middle of an exchange.
    #[error("premature end of stream")]
    EndOfStream,

    /// A protocol message couldn't be decoded.
    #[error("malformed protocol message: {0}")]
    Decoding(&'static str),

    /// The response to a request had a protocol op of the wrong kind.
    #[error("unexpected response op {op} for message {id}")]
    UnexpectedResponse { id: RequestId, op: u64 },

    /// The server sent an unsolicited notification, which always ends the session.
    #[error("unsolicited notification from server")]
    Unsolicited,

    /// LDAP operation result with an error return code.
    #[error("LDAP operation result: {result}")]
    LdapResult {
        #[from]
        result: LdapResult,
    },
}

/// Common components of an LDAP operation result.
///
/// This structure faithfully replicates the components dictated by the standard,
/// and is distinctly C-like with its reliance on numeric codes for the indication
/// of outcome. The [`success()`](#method.success) helper turns it into a `Result`
/// when simple condition checking suffices.
#[derive(Clone, Debug)]
pub struct LdapResult {
    /// Result code.
    ///
    /// Generally, the value of zero indicates successful completion.
    /// See [Section A.1 of RFC 4511](https://tools.ietf.org/html/rfc4511#appendix-A.1).
    pub rc: u32,
    /// Matched component DN, where applicable.
    pub matched: String,
    /// Additional diagnostic text.
    pub text: String,
    /// Referrals.
    ///
    /// For a Search, the URIs of all continuation references are accumulated here
    /// as well.
    pub refs: Vec<String>,
}

impl LdapResult {
    /// Decode the `LDAPResult` components of a response op.
    pub(crate) fn from_structure(t: StructureTag) -> Result<LdapResult> {
        let mut tags = t
            .expect_constructed()
            .ok_or(LdapError::Decoding("result is not constructed"))?
            .into_iter();
        let rc = tags
            .next()
            .and_then(|t| t.match_class(TagClass::Universal))
            .and_then(|t| t.match_id(Types::Enumerated as u64))
            .and_then(|t| t.expect_primitive())
            .ok_or(LdapError::Decoding("result code"))?;
        let rc = match parse_uint(&rc) {
            Ok((_, rc)) => u32::try_from(rc).map_err(|_| LdapError::Decoding("result code"))?,
            Err(_) => return Err(LdapError::Decoding("result code")),
        };
        let matched = lossy_string(tags.next()).ok_or(LdapError::Decoding("matched DN"))?;
        let text = lossy_string(tags.next()).ok_or(LdapError::Decoding("diagnostic message"))?;
        let mut refs = Vec::new();
        for tag in tags {
            if tag.class == TagClass::Context && tag.id == 3 {
                refs.extend(parse_refs(tag)?);
            }
        }
        Ok(LdapResult {
            rc,
            matched,
            text,
            refs,
        })
    }

    /// If the result code is zero, return the instance itself wrapped
    /// in `Ok()`, otherwise wrap the instance in an `LdapError`.
    pub fn success(self) -> Result<Self> {
        if self.rc == 0 {
            Ok(self)
        } else {
            Err(LdapError::from(self))
        }
    }

    /// Symbolic name of the result code.
    pub fn rc_name(&self) -> &'static str {
        match self.rc {
            0 => "success",
            1 => "operationsError",
            2 => "protocolError",
            3 => "timeLimitExceeded",
            4 => "sizeLimitExceeded",
            5 => "compareFalse",
            6 => "compareTrue",
            7 => "authMethodNotSupported",
            8 => "strongerAuthRequired",
            10 => "referral",
            11 => "adminLimitExceeded",
            12 => "unavailableCriticalExtension",
            13 => "confidentialityRequired",
            14 => "saslBindInProgress",
            16 => "noSuchAttribute",
            17 => "undefinedAttributeType",
            18 => "inappropriateMatching",
            19 => "constraintViolation",
            20 => "attributeOrValueExists",
            21 => "invalidAttributeSyntax",
            32 => "noSuchObject",
            33 => "aliasProblem",
            34 => "invalidDNSyntax",
            36 => "aliasDereferencingProblem",
            48 => "inappropriateAuthentication",
            49 => "invalidCredentials",
            50 => "insufficientAccessRights",
            51 => "busy",
            52 => "unavailable",
            53 => "unwillingToPerform",
            54 => "loopDetect",
            64 => "namingViolation",
            65 => "objectClassViolation",
            66 => "notAllowedOnNonLeaf",
            67 => "notAllowedOnRDN",
            68 => "entryAlreadyExists",
            69 => "objectClassModsProhibited",
            71 => "affectsMultipleDSAs",
            80 => "other",
            88 => "abandoned",
            _ => "unknown",
        }
    }
}

fn lossy_string(tag: Option<StructureTag>) -> Option<String> {
    tag.and_then(|t| t.expect_primitive())
        .map(|v| String::from_utf8_lossy(&v).into_owned())
}

impl std::error::Error for LdapResult {}

impl fmt::Display for LdapResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "rc={} ({}), dn: \"{}\", text: \"{}\"",
            self.rc,
            self.rc_name(),
            self.matched,
            self.text
        )
    }
}

/// Wrapper for results of a Search operation which returns all entries at once.
///
/// The wrapper exists so that [`success()`](#method.success) can be called on an
/// instance, destructuring it into an anonymous tuple.
#[derive(Clone, Debug)]
pub struct SearchResult(pub Vec<ResultEntry>, pub LdapResult);

impl SearchResult {
    /// If the result code is zero, return an anonymous tuple of component structs
    /// wrapped in `Ok()`, otherwise wrap the `LdapResult` part in an `LdapError`.
    pub fn success(self) -> Result<(Vec<ResultEntry>, LdapResult)> {
        if self.1.rc == 0 {
            Ok((self.0, self.1))
        } else {
            Err(LdapError::from(self.1))
        }
    }
}
