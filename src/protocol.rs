use crate::result::{LdapError, Result};
use crate::RequestId;

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use lber::common::TagClass;
use lber::parse::{parse_tag, parse_uint};
use lber::structure::StructureTag;
use lber::structures::{ASNTag, Integer, Sequence, Tag};
use lber::universal::Types;
use lber::write;

/// Framing of LDAPMessage envelopes.
///
/// Outgoing items are `(message id, protocol op)` pairs; incoming frames are
/// decoded into the same shape, with the op left in the generic form. Response
/// controls aren't used by anything in the crate and are dropped.
#[derive(Debug, Default)]
pub(crate) struct LdapCodec;

impl Decoder for LdapCodec {
    type Item = (RequestId, StructureTag);
    type Error = LdapError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>> {
        let (amt, tag) = match parse_tag(&buf[..]) {
            Ok((rest, tag)) => (buf.len() - rest.len(), tag),
            Err(nom::Err::Incomplete(_)) => return Ok(None),
            Err(_) => return Err(LdapError::Decoding("invalid BER data")),
        };
        buf.advance(amt);
        let mut tags = tag
            .match_class(TagClass::Universal)
            .and_then(|t| t.match_id(Types::Sequence as u64))
            .and_then(|t| t.expect_constructed())
            .ok_or(LdapError::Decoding("LDAPMessage envelope"))?
            .into_iter();
        let msgid = tags
            .next()
            .and_then(|t| t.match_class(TagClass::Universal))
            .and_then(|t| t.match_id(Types::Integer as u64))
            .and_then(|t| t.expect_primitive())
            .ok_or(LdapError::Decoding("message id"))?;
        let msgid = match parse_uint(&msgid) {
            Ok((_, id)) => RequestId::try_from(id).map_err(|_| LdapError::Decoding("message id"))?,
            Err(_) => return Err(LdapError::Decoding("message id")),
        };
        let protoop = tags.next().ok_or(LdapError::Decoding("protocol op"))?;
        trace!("received op {} for message {}", protoop.id, msgid);
        Ok(Some((msgid, protoop)))
    }
}

impl Encoder<(RequestId, Tag)> for LdapCodec {
    type Error = LdapError;

    fn encode(&mut self, msg: (RequestId, Tag), into: &mut BytesMut) -> Result<()> {
        let (id, op) = msg;
        let outstruct = Tag::Sequence(Sequence {
            inner: vec![
                Tag::Integer(Integer {
                    inner: i64::from(id),
                    ..Default::default()
                }),
                op,
            ],
            ..Default::default()
        })
        .into_structure();
        trace!("Sending packet: {:?}", &outstruct);
        write::encode_into(into, outstruct)?;
        Ok(())
    }
}
