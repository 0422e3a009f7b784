use crate::ldap::Ldap;
use crate::result::{LdapError, LdapResult, Result};

use lber::common::TagClass;
use lber::structures::{Integer, OctetString, Sequence, Tag};

impl Ldap {
    /// Do a simple Bind with the provided DN (`bind_dn`) and password (`bind_pw`).
    ///
    /// The returned result must be checked; a rejected bind is not an error at
    /// this level.
    pub async fn simple_bind(&mut self, bind_dn: &str, bind_pw: &str) -> Result<LdapResult> {
        let req = Tag::Sequence(Sequence {
            id: 0,
            class: TagClass::Application,
            inner: vec![
                Tag::Integer(Integer {
                    inner: 3,
                    ..Default::default()
                }),
                Tag::OctetString(OctetString {
                    inner: Vec::from(bind_dn),
                    ..Default::default()
                }),
                Tag::OctetString(OctetString {
                    id: 0,
                    class: TagClass::Context,
                    inner: Vec::from(bind_pw),
                }),
            ],
        });
        let id = self.send(req).await?;
        let resp = self.recv(id).await?;
        if resp.class != TagClass::Application || resp.id != 1 {
            return Err(LdapError::UnexpectedResponse { id, op: resp.id });
        }
        LdapResult::from_structure(resp)
    }
}
