//! Authorization evaluator: one search on an authenticated session, reduced
//! to an [`Outcome`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::directory::Session;
use crate::outcome::{Outcome, Reason};
use crate::query::{Query, ALLOW_DIALIN, USER_ACCOUNT_CONTROL};
use crate::search::SearchEntry;

/// Account enabled, no other flags set.
const ACCOUNT_NORMAL: &str = "512";
const DIALIN_ALLOWED: &str = "TRUE";

/// Run `query` on `session` and decide.
///
/// With a `dump` sink, matched entries are written there instead and no
/// decision is made.
pub fn evaluate<S: Session + ?Sized>(
    session: &mut S,
    query: &Query,
    dump: Option<&mut dyn Write>,
) -> Outcome {
    let entries = match session.search(query) {
        Ok(entries) => entries,
        Err(e) => return Outcome::Indeterminate(Reason::SearchFailed(e)),
    };
    if entries.is_empty() {
        return Outcome::Indeterminate(Reason::UserNotFound);
    }
    if let Some(out) = dump {
        info!("Search: {} -> num of entries = {}", query.filter(), entries.len());
        if let Err(e) = dump_entries(out, &entries) {
            warn!("writing entries: {}", e);
        }
        return Outcome::Indeterminate(Reason::RawOutput);
    }
    if entries.len() > 1 {
        debug!("{} entries match {}, using {}", entries.len(), query.filter(), entries[0].dn);
    }
    let entry = &entries[0];
    decide(
        entry.first_value(USER_ACCOUNT_CONTROL).unwrap_or(""),
        entry.first_value(ALLOW_DIALIN).unwrap_or(""),
    )
}

/// The access rule. Both values are compared as exact strings; the account
/// control bitfield is deliberately not decoded.
pub fn decide(account_control: &str, allow_dialin: &str) -> Outcome {
    if account_control == ACCOUNT_NORMAL && allow_dialin == DIALIN_ALLOWED {
        Outcome::Allowed
    } else {
        Outcome::Denied
    }
}

/// Write entries as `DN: <dn>` followed by one `<attr>: [<values>]` line per
/// attribute, sorted by attribute name.
pub fn dump_entries(out: &mut dyn Write, entries: &[SearchEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "DN: {}", entry.dn)?;
        let mut attrs: BTreeMap<&str, Vec<Cow<str>>> = BTreeMap::new();
        for (attr, vals) in &entry.attrs {
            attrs.insert(attr.as_str(), vals.iter().map(|v| Cow::from(v.as_str())).collect());
        }
        for (attr, vals) in &entry.bin_attrs {
            attrs.insert(attr.as_str(), vals.iter().map(|v| String::from_utf8_lossy(v)).collect());
        }
        for (attr, vals) in attrs {
            writeln!(out, "    {}: [{}]", attr, vals.join(" "))?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directory::testing::{entry, FakeConnector};
    use crate::directory::Connector;
    use crate::config::ServerAddress;

    fn session_with(entries: Vec<SearchEntry>) -> impl Session {
        FakeConnector::default()
            .with_entries("dc1", entries)
            .connect(&ServerAddress::new("dc1", 389))
            .expect("session")
    }

    fn query() -> Query {
        Query::dialin("cn=Users,dc=example,dc=org", "jdoe")
    }

    #[test]
    fn decision_rule() {
        assert!(decide("512", "TRUE").is_allowed());
        for (uac, dialin) in [
            ("514", "TRUE"),
            ("512", "FALSE"),
            ("512", "Not available"),
            ("66048", "TRUE"),
            ("512", "true"),
            (" 512", "TRUE"),
            ("", "TRUE"),
            ("512", ""),
            ("", ""),
        ] {
            assert_eq!(decide(uac, dialin).exit_code(), 1, "{:?} {:?}", uac, dialin);
        }
    }

    #[test]
    fn allowed_entry() {
        let mut s = session_with(vec![entry(
            "cn=jdoe,cn=Users,dc=example,dc=org",
            &[(USER_ACCOUNT_CONTROL, "512"), (ALLOW_DIALIN, "TRUE")],
        )]);
        assert!(evaluate(&mut s, &query(), None).is_allowed());
    }

    #[test]
    fn missing_attribute_is_denied() {
        let mut s = session_with(vec![entry(
            "cn=jdoe,cn=Users,dc=example,dc=org",
            &[(USER_ACCOUNT_CONTROL, "512")],
        )]);
        assert!(matches!(evaluate(&mut s, &query(), None), Outcome::Denied));
    }

    #[test]
    fn binary_value_is_treated_as_absent() {
        let mut e = entry(
            "cn=jdoe,cn=Users,dc=example,dc=org",
            &[(USER_ACCOUNT_CONTROL, "512")],
        );
        e.bin_attrs.insert(ALLOW_DIALIN.to_owned(), vec![vec![0xff, 0xfe]]);
        let mut s = session_with(vec![e]);
        assert!(matches!(evaluate(&mut s, &query(), None), Outcome::Denied));
    }

    #[test]
    fn only_first_entry_decides() {
        let mut s = session_with(vec![
            entry("cn=jdoe,ou=a", &[(USER_ACCOUNT_CONTROL, "514"), (ALLOW_DIALIN, "TRUE")]),
            entry("cn=jdoe,ou=b", &[(USER_ACCOUNT_CONTROL, "512"), (ALLOW_DIALIN, "TRUE")]),
        ]);
        assert!(matches!(evaluate(&mut s, &query(), None), Outcome::Denied));
    }

    #[test]
    fn no_entries_is_user_not_found() {
        let mut s = session_with(vec![]);
        assert!(matches!(
            evaluate(&mut s, &query(), None),
            Outcome::Indeterminate(Reason::UserNotFound)
        ));
    }

    #[test]
    fn search_error_is_indeterminate() {
        let mut s = FakeConnector::default()
            .failing_search()
            .connect(&ServerAddress::new("dc1", 389))
            .expect("session");
        assert!(matches!(
            evaluate(&mut s, &query(), None),
            Outcome::Indeterminate(Reason::SearchFailed(_))
        ));
    }

    #[test]
    fn raw_output_dumps_and_does_not_decide() {
        let mut s = session_with(vec![entry(
            "cn=jdoe,cn=Users,dc=example,dc=org",
            &[
                (USER_ACCOUNT_CONTROL, "512"),
                (ALLOW_DIALIN, "TRUE"),
                ("memberOf", "cn=vpn"),
                ("memberOf", "cn=staff"),
            ],
        )]);
        let mut out = Vec::new();
        let outcome = evaluate(&mut s, &query(), Some(&mut out as &mut dyn Write));
        assert!(matches!(outcome, Outcome::Indeterminate(Reason::RawOutput)));
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "DN: cn=jdoe,cn=Users,dc=example,dc=org\n\
             \x20   memberOf: [cn=vpn cn=staff]\n\
             \x20   msNPAllowDialin: [TRUE]\n\
             \x20   userAccountControl: [512]\n"
        );
    }

    #[test]
    fn raw_output_without_entries_is_user_not_found() {
        let mut s = session_with(vec![]);
        let mut out = Vec::new();
        assert!(matches!(
            evaluate(&mut s, &query(), Some(&mut out as &mut dyn Write)),
            Outcome::Indeterminate(Reason::UserNotFound)
        ));
        assert!(out.is_empty());
    }
}
