//! Server selector: try each configured server in order until one accepts a
//! connection, then bind and evaluate on that one only.

use std::io::{self, Write};

use crate::config::{Config, ServerAddress};
use crate::directory::{Connector, LdapConnector, Session};
use crate::evaluator::evaluate;
use crate::outcome::{Outcome, Reason};
use crate::query::{Credential, Query};

/// Walk `servers` in order. A connect failure moves on to the next server;
/// a bind failure ends the run. Every opened session is closed before
/// returning.
pub fn select_and_query<C: Connector>(
    connector: &C,
    servers: &[ServerAddress],
    credential: &Credential,
    query: &Query,
    dump: Option<&mut dyn Write>,
) -> Outcome {
    for server in servers {
        info!("Trying LDAP server {}", server);
        let mut session = match connector.connect(server) {
            Ok(session) => session,
            Err(e) => {
                warn!("LDAP server {} unreachable: {}", server, e);
                continue;
            }
        };
        let outcome = match session.bind(credential) {
            Ok(()) => {
                debug!("bound to {} as {}", server, credential.bind_dn());
                evaluate(&mut session, query, dump)
            }
            Err(e) => {
                error!("bind to {} as {} failed: {}", server, credential.bind_dn(), e);
                Outcome::Indeterminate(Reason::BindRejected {
                    server: server.to_string(),
                    source: e,
                })
            }
        };
        if let Err(e) = session.close() {
            debug!("closing connection to {}: {}", server, e);
        }
        return outcome;
    }
    Outcome::Indeterminate(Reason::NoServerReachable)
}

/// Run the full check described by `config` against real servers.
pub fn authorize(config: &Config) -> Outcome {
    let connector = LdapConnector::new(config.settings().clone());
    let query = Query::dialin(config.base_dn(), config.user());
    let mut stdout = io::stdout().lock();
    let dump = if config.raw_output() {
        Some(&mut stdout as &mut dyn Write)
    } else {
        None
    };
    select_and_query(&connector, config.servers(), config.credential(), &query, dump)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directory::testing::{entry, FakeConnector};
    use crate::query::{ALLOW_DIALIN, USER_ACCOUNT_CONTROL};

    fn servers(hosts: &[&str]) -> Vec<ServerAddress> {
        hosts.iter().map(|h| ServerAddress::new(*h, 389)).collect()
    }

    fn credential() -> Credential {
        Credential::new("cn=query,cn=Users,dc=example,dc=org", "secret")
    }

    fn query() -> Query {
        Query::dialin("cn=Users,dc=example,dc=org", "jdoe")
    }

    fn allowed_entry() -> Vec<crate::search::SearchEntry> {
        vec![entry(
            "cn=jdoe,cn=Users,dc=example,dc=org",
            &[(USER_ACCOUNT_CONTROL, "512"), (ALLOW_DIALIN, "TRUE")],
        )]
    }

    #[test]
    fn falls_back_past_unreachable_servers() {
        let connector = FakeConnector::default()
            .unreachable("dc1")
            .unreachable("dc2")
            .with_entries("dc3", allowed_entry());
        let outcome = select_and_query(
            &connector,
            &servers(&["dc1", "dc2", "dc3", "dc4"]),
            &credential(),
            &query(),
            None,
        );
        assert!(outcome.is_allowed());
        assert_eq!(
            connector.events(),
            ["connect dc1", "connect dc2", "connect dc3", "bind dc3", "search dc3", "close dc3"]
        );
    }

    #[test]
    fn all_unreachable() {
        let connector = FakeConnector::default().unreachable("dc1").unreachable("dc2");
        let outcome =
            select_and_query(&connector, &servers(&["dc1", "dc2"]), &credential(), &query(), None);
        assert!(matches!(outcome, Outcome::Indeterminate(Reason::NoServerReachable)));
        assert_eq!(connector.events(), ["connect dc1", "connect dc2"]);
    }

    #[test]
    fn empty_server_list() {
        let connector = FakeConnector::default();
        let outcome = select_and_query(&connector, &[], &credential(), &query(), None);
        assert!(matches!(outcome, Outcome::Indeterminate(Reason::NoServerReachable)));
        assert!(connector.events().is_empty());
    }

    #[test]
    fn bind_failure_stops_the_run() {
        let connector = FakeConnector::default()
            .rejecting("dc1")
            .with_entries("dc2", allowed_entry());
        let outcome =
            select_and_query(&connector, &servers(&["dc1", "dc2"]), &credential(), &query(), None);
        match outcome {
            Outcome::Indeterminate(Reason::BindRejected { server, .. }) => {
                assert_eq!(server, "dc1:389")
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(connector.events(), ["connect dc1", "bind dc1", "close dc1"]);
    }

    #[test]
    fn search_failure_stops_the_run() {
        let connector = FakeConnector::default().failing_search();
        let outcome =
            select_and_query(&connector, &servers(&["dc1", "dc2"]), &credential(), &query(), None);
        assert!(matches!(outcome, Outcome::Indeterminate(Reason::SearchFailed(_))));
        assert_eq!(
            connector.events(),
            ["connect dc1", "bind dc1", "search dc1", "close dc1"]
        );
    }

    #[test]
    fn user_not_found_does_not_fall_back() {
        let connector = FakeConnector::default().with_entries("dc2", allowed_entry());
        let outcome =
            select_and_query(&connector, &servers(&["dc1", "dc2"]), &credential(), &query(), None);
        assert!(matches!(outcome, Outcome::Indeterminate(Reason::UserNotFound)));
        assert!(!connector.events().contains(&"connect dc2".to_owned()));
    }

    #[test]
    fn raw_output_closes_the_session() {
        let connector = FakeConnector::default().with_entries("dc1", allowed_entry());
        let mut out = Vec::new();
        let outcome = select_and_query(
            &connector,
            &servers(&["dc1"]),
            &credential(),
            &query(),
            Some(&mut out as &mut dyn Write),
        );
        assert!(matches!(outcome, Outcome::Indeterminate(Reason::RawOutput)));
        assert!(String::from_utf8(out).expect("utf8").starts_with("DN: cn=jdoe,"));
        assert_eq!(connector.events().last().map(String::as_str), Some("close dc1"));
    }

    #[test]
    fn repeated_runs_agree() {
        let connector = FakeConnector::default()
            .unreachable("dc1")
            .with_entries("dc2", allowed_entry());
        let list = servers(&["dc1", "dc2"]);
        let first = select_and_query(&connector, &list, &credential(), &query(), None);
        let second = select_and_query(&connector, &list, &credential(), &query(), None);
        assert_eq!(first.exit_code(), second.exit_code());
        assert!(second.is_allowed());
    }
}
