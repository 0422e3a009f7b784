use std::collections::HashMap;

use crate::filter::parse as parse_filter;
use crate::ldap::Ldap;
use crate::result::{LdapError, LdapResult, Result, SearchResult};

use lber::common::TagClass;
use lber::structure::StructureTag;
use lber::structures::{Boolean, Enumerated, Integer, OctetString, Sequence, Tag};

/// Possible values for search scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Base object; search only the object named in the base DN.
    Base = 0,
    /// Search the objects immediately below the base DN.
    OneLevel = 1,
    /// Search the object named in the base DN and the whole subtree below it.
    Subtree = 2,
}

/// Possible values for alias dereferencing during search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DerefAliases {
    /// Never dereference.
    #[default]
    Never = 0,
    /// Dereference while retrieving objects according to search scope.
    Searching = 1,
    /// Dereference while finding the base object.
    Finding = 2,
    /// Always dereference.
    Always = 3,
}

/// Wrapper for the internal structure of a result entry.
#[derive(Debug, Clone)]
pub struct ResultEntry(pub StructureTag);

impl ResultEntry {
    #[doc(hidden)]
    pub fn new(st: StructureTag) -> ResultEntry {
        ResultEntry(st)
    }
}

/// Additional parameters for the Search operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub(crate) deref: DerefAliases,
    pub(crate) typesonly: bool,
    pub(crate) timelimit: i32,
    pub(crate) sizelimit: i32,
}

impl SearchOptions {
    /// Create an instance of the structure with default values.
    pub fn new() -> Self {
        SearchOptions {
            ..Default::default()
        }
    }

    /// Set the method for dereferencing aliases.
    pub fn deref(mut self, d: DerefAliases) -> Self {
        self.deref = d;
        self
    }

    /// Set the indicator of returning just attribute names (`true`) vs. names and values (`false`).
    pub fn typesonly(mut self, typesonly: bool) -> Self {
        self.typesonly = typesonly;
        self
    }

    /// Set the time limit, in seconds, for the whole search operation.
    ///
    /// This is a server-side limit of the elapsed time for performing the operation, _not_ a
    /// network timeout for retrieving result entries or the result of the whole operation.
    pub fn timelimit(mut self, timelimit: i32) -> Self {
        self.timelimit = timelimit;
        self
    }

    /// Set the size limit, in entries, for the whole search operation.
    pub fn sizelimit(mut self, sizelimit: i32) -> Self {
        self.sizelimit = sizelimit;
        self
    }
}

/// Parsed search result entry.
///
/// While LDAP attributes can have a variety of syntaxes, they're all returned in
/// search results as octet strings, without any associated type information.
/// The parser tries to convert every value into a `String`. If any value of an
/// attribute isn't valid UTF-8, the attribute and all its values go into the
/// `bin_attrs` map instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEntry {
    /// Entry DN.
    pub dn: String,
    /// Attributes.
    pub attrs: HashMap<String, Vec<String>>,
    /// Binary-valued attributes.
    pub bin_attrs: HashMap<String, Vec<Vec<u8>>>,
}

impl SearchEntry {
    /// Parse raw BER data and convert it into attribute map(s).
    pub fn construct(re: ResultEntry) -> Result<SearchEntry> {
        let mut tags = re
            .0
            .match_class(TagClass::Application)
            .and_then(|t| t.match_id(4))
            .and_then(|t| t.expect_constructed())
            .ok_or(LdapError::Decoding("search result entry"))?
            .into_iter();
        let dn = tags
            .next()
            .and_then(|t| t.expect_primitive())
            .and_then(|v| String::from_utf8(v).ok())
            .ok_or(LdapError::Decoding("entry DN"))?;
        let attrs = tags
            .next()
            .and_then(|t| t.expect_constructed())
            .ok_or(LdapError::Decoding("attribute list"))?;
        let mut attr_vals = HashMap::new();
        let mut bin_attr_vals = HashMap::new();
        for a_v in attrs {
            let mut part_attr = a_v
                .expect_constructed()
                .ok_or(LdapError::Decoding("partial attribute"))?
                .into_iter();
            let a_type = part_attr
                .next()
                .and_then(|t| t.expect_primitive())
                .and_then(|v| String::from_utf8(v).ok())
                .ok_or(LdapError::Decoding("attribute type"))?;
            let values = part_attr
                .next()
                .and_then(|t| t.expect_constructed())
                .ok_or(LdapError::Decoding("attribute values"))?
                .into_iter()
                .map(|t| t.expect_primitive().ok_or(LdapError::Decoding("attribute value")))
                .collect::<Result<Vec<Vec<u8>>>>()?;
            let text = values
                .iter()
                .map(|v| std::str::from_utf8(v).ok().map(str::to_owned))
                .collect::<Option<Vec<String>>>();
            match text {
                Some(text) => {
                    attr_vals.insert(a_type, text);
                }
                None => {
                    bin_attr_vals.insert(a_type, values);
                }
            }
        }
        Ok(SearchEntry {
            dn,
            attrs: attr_vals,
            bin_attrs: bin_attr_vals,
        })
    }

    /// First string value of `attr`, if the attribute is present.
    ///
    /// Attribute names are matched exactly, as returned by the server.
    pub fn first_value(&self, attr: &str) -> Option<&str> {
        self.attrs
            .get(attr)
            .and_then(|vals| vals.first())
            .map(String::as_str)
    }
}

impl Ldap {
    /// Perform a Search with the given base DN (`base`), scope, filter, and
    /// the list of attributes to be returned (`attrs`), collecting all entries.
    ///
    /// Options set with [`with_search_options()`](#method.with_search_options)
    /// apply to this call only.
    pub async fn search<S: AsRef<str>>(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: Vec<S>,
    ) -> Result<SearchResult> {
        let opts = self.search_opts.take().unwrap_or_default();
        let req = Tag::Sequence(Sequence {
            id: 3,
            class: TagClass::Application,
            inner: vec![
                Tag::OctetString(OctetString {
                    inner: Vec::from(base.as_bytes()),
                    ..Default::default()
                }),
                Tag::Enumerated(Enumerated {
                    inner: scope as i64,
                    ..Default::default()
                }),
                Tag::Enumerated(Enumerated {
                    inner: opts.deref as i64,
                    ..Default::default()
                }),
                Tag::Integer(Integer {
                    inner: i64::from(opts.sizelimit),
                    ..Default::default()
                }),
                Tag::Integer(Integer {
                    inner: i64::from(opts.timelimit),
                    ..Default::default()
                }),
                Tag::Boolean(Boolean {
                    inner: opts.typesonly,
                    ..Default::default()
                }),
                parse_filter(filter)?,
                Tag::Sequence(Sequence {
                    inner: attrs
                        .into_iter()
                        .map(|s| {
                            Tag::OctetString(OctetString {
                                inner: Vec::from(s.as_ref()),
                                ..Default::default()
                            })
                        })
                        .collect(),
                    ..Default::default()
                }),
            ],
        });
        let id = self.send(req).await?;
        let mut entries = Vec::new();
        let mut refs = Vec::new();
        loop {
            let op = self.recv(id).await?;
            if op.class != TagClass::Application {
                return Err(LdapError::UnexpectedResponse { id, op: op.id });
            }
            match op.id {
                4 => entries.push(ResultEntry::new(op)),
                19 => refs.extend(parse_refs(op)?),
                25 => debug!("ignoring intermediate response for message {}", id),
                5 => {
                    let mut res = LdapResult::from_structure(op)?;
                    res.refs.extend(refs);
                    debug!("search {} done: {} entries, {}", filter, entries.len(), res);
                    return Ok(SearchResult(entries, res));
                }
                other => return Err(LdapError::UnexpectedResponse { id, op: other }),
            }
        }
    }
}

/// Parse the referrals from the supplied BER-encoded sequence.
pub(crate) fn parse_refs(t: StructureTag) -> Result<Vec<String>> {
    t.expect_constructed()
        .ok_or(LdapError::Decoding("referrals"))?
        .into_iter()
        .map(|t| {
            t.expect_primitive()
                .and_then(|v| String::from_utf8(v).ok())
                .ok_or(LdapError::Decoding("referral URI"))
        })
        .collect()
}
