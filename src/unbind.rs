use crate::ldap::Ldap;
use crate::result::Result;

use lber::common::TagClass;
use lber::structures::{Null, Tag};

impl Ldap {
    /// Terminate the connection to the server.
    ///
    /// There is no response to an Unbind; the request is flushed and the
    /// write side of the connection is shut down.
    pub async fn unbind(&mut self) -> Result<()> {
        let req = Tag::Null(Null {
            id: 2,
            class: TagClass::Application,
            inner: (),
        });
        self.send(req).await?;
        self.close().await
    }
}
