use std::time::Duration;

use crate::conn::LdapConnSettings;
use crate::protocol::LdapCodec;
use crate::result::{LdapError, Result};
use crate::search::SearchOptions;
use crate::RequestId;

use futures::{SinkExt, StreamExt};
use lber::structure::StructureTag;
use lber::structures::Tag;
use tokio::net::TcpStream;
use tokio::time;
use tokio_util::codec::Framed;

/// Asynchronous handle for LDAP operations.
///
/// The handle owns the connection and performs one operation at a time: a request
/// is written, and frames are read until the response carrying the same message id
/// arrives. All operations are methods on this struct; the blocking
/// [`LdapConn`](struct.LdapConn.html) drives them on its own runtime.
#[derive(Debug)]
pub struct Ldap {
    framed: Framed<TcpStream, LdapCodec>,
    last_id: RequestId,
    timeout: Option<Duration>,
    pub(crate) search_opts: Option<SearchOptions>,
}

impl Ldap {
    pub(crate) fn new(stream: TcpStream, settings: &LdapConnSettings) -> Self {
        Ldap {
            framed: Framed::new(stream, LdapCodec),
            last_id: 0,
            timeout: settings.op_timeout(),
            search_opts: None,
        }
    }

    /// Use the provided `SearchOptions` with the next Search operation, which can
    /// be invoked directly on the result of this method.
    pub fn with_search_options(&mut self, opts: SearchOptions) -> &mut Self {
        self.search_opts = Some(opts);
        self
    }

    pub(crate) async fn send(&mut self, op: Tag) -> Result<RequestId> {
        self.last_id = if self.last_id == RequestId::MAX {
            1
        } else {
            self.last_id + 1
        };
        let id = self.last_id;
        match self.timeout {
            Some(timeout) => time::timeout(timeout, self.framed.send((id, op))).await??,
            None => self.framed.send((id, op)).await?,
        }
        Ok(id)
    }

    /// Read frames until one belongs to message `id`, and return its protocol op.
    pub(crate) async fn recv(&mut self, id: RequestId) -> Result<StructureTag> {
        loop {
            let item = match self.timeout {
                Some(timeout) => time::timeout(timeout, self.framed.next()).await?,
                None => self.framed.next().await,
            };
            let (msgid, op) = match item {
                Some(item) => item?,
                None => return Err(LdapError::EndOfStream),
            };
            if msgid == id {
                return Ok(op);
            }
            if msgid == 0 {
                warn!("unsolicited notification received while waiting for message {}", id);
                return Err(LdapError::Unsolicited);
            }
            warn!("discarding op {} for unknown message id {}", op.id, msgid);
        }
    }

    pub(crate) async fn close(&mut self) -> Result<()> {
        SinkExt::<(RequestId, Tag)>::close(&mut self.framed).await
    }
}
