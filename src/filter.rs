//! String representation of search filters (RFC 4515) into BER.
//!
//! Only the subset the lookup needs: and, or, not, the simple comparisons and
//! presence. Substring and extensible assertions are rejected.

use crate::result::{LdapError, Result};

use lber::common::TagClass;
use lber::structures::{ExplicitTag, OctetString, Sequence, Tag};

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1, take_while_m_n};
use nom::character::complete::{char, digit1};
use nom::character::{is_alphabetic, is_alphanumeric};
use nom::combinator::{all_consuming, map, recognize, verify};
use nom::error::{Error, ErrorKind};
use nom::multi::{many0, many1};
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;

/// Parse a filter string.
pub fn parse(input: &str) -> Result<Tag> {
    match all_consuming(filtexpr)(input.as_bytes()) {
        Ok((_, t)) => Ok(t),
        Err(_) => Err(LdapError::FilterParsing),
    }
}

fn filtexpr(i: &[u8]) -> IResult<&[u8], Tag> {
    alt((filter, item))(i)
}

fn filter(i: &[u8]) -> IResult<&[u8], Tag> {
    delimited(char('('), filtercomp, char(')'))(i)
}

fn filtercomp(i: &[u8]) -> IResult<&[u8], Tag> {
    alt((and, or, not, item))(i)
}

fn filterlist(i: &[u8]) -> IResult<&[u8], Vec<Tag>> {
    many1(filter)(i)
}

fn and(i: &[u8]) -> IResult<&[u8], Tag> {
    map(preceded(char('&'), filterlist), |inner| {
        Tag::Sequence(Sequence {
            class: TagClass::Context,
            id: 0,
            inner,
        })
    })(i)
}

fn or(i: &[u8]) -> IResult<&[u8], Tag> {
    map(preceded(char('|'), filterlist), |inner| {
        Tag::Sequence(Sequence {
            class: TagClass::Context,
            id: 1,
            inner,
        })
    })(i)
}

fn not(i: &[u8]) -> IResult<&[u8], Tag> {
    map(preceded(char('!'), filter), |tag| {
        Tag::ExplicitTag(ExplicitTag {
            class: TagClass::Context,
            id: 2,
            inner: Box::new(tag),
        })
    })(i)
}

fn item(i: &[u8]) -> IResult<&[u8], Tag> {
    let (rest, attr) = attributedescription(i)?;
    let (rest, filtertype) = filtertype(rest)?;
    let (rest, value) = assertion_value(rest)?;
    let tag = match value {
        Value::Literal(value) => simple_tag(attr, filtertype, value),
        Value::Any if filtertype == EQ_MATCH => present_tag(attr),
        // substring assertions aren't supported
        Value::Any => return Err(nom::Err::Error(Error::new(i, ErrorKind::Verify))),
    };
    Ok((rest, tag))
}

const EQ_MATCH: u64 = 3;
const GTE_MATCH: u64 = 5;
const LTE_MATCH: u64 = 6;
const PRESENT_MATCH: u64 = 7;
const APPROX_MATCH: u64 = 8;

fn filtertype(i: &[u8]) -> IResult<&[u8], u64> {
    alt((
        map(char('='), |_| EQ_MATCH),
        map(tag(">="), |_| GTE_MATCH),
        map(tag("<="), |_| LTE_MATCH),
        map(tag("~="), |_| APPROX_MATCH),
    ))(i)
}

enum Value {
    Literal(Vec<u8>),
    Any,
}

/// Assertion value with `\XX` escapes decoded. A lone `*` is a presence
/// test; an unescaped `*` anywhere else is rejected.
fn assertion_value(i: &[u8]) -> IResult<&[u8], Value> {
    if i.starts_with(b"*)") || i == b"*" {
        return Ok((&i[1..], Value::Any));
    }
    let mut value = Vec::new();
    let mut pos = 0;
    while pos < i.len() {
        match i[pos] {
            b'(' | b')' | 0 => break,
            b'*' => return Err(nom::Err::Error(Error::new(&i[pos..], ErrorKind::Verify))),
            b'\\' => {
                let octet = i
                    .get(pos + 1..pos + 3)
                    .and_then(hex_octet)
                    .ok_or_else(|| nom::Err::Error(Error::new(&i[pos..], ErrorKind::Escaped)))?;
                value.push(octet);
                pos += 3;
            }
            c => {
                value.push(c);
                pos += 1;
            }
        }
    }
    Ok((&i[pos..], Value::Literal(value)))
}

fn hex_octet(pair: &[u8]) -> Option<u8> {
    if !pair.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let pair = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(pair, 16).ok()
}

fn simple_tag(attr: &[u8], filtertype: u64, value: Vec<u8>) -> Tag {
    Tag::Sequence(Sequence {
        class: TagClass::Context,
        id: filtertype,
        inner: vec![
            Tag::OctetString(OctetString {
                inner: attr.to_vec(),
                ..Default::default()
            }),
            Tag::OctetString(OctetString {
                inner: value,
                ..Default::default()
            }),
        ],
    })
}

fn present_tag(attr: &[u8]) -> Tag {
    Tag::OctetString(OctetString {
        class: TagClass::Context,
        id: PRESENT_MATCH,
        inner: attr.to_vec(),
    })
}

fn attributedescription(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((
        attributetype,
        many0(preceded(char(';'), take_while1(is_alnum_hyphen))),
    )))(i)
}

fn attributetype(i: &[u8]) -> IResult<&[u8], &[u8]> {
    alt((numericoid, descr))(i)
}

fn numericoid(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((number, many0(preceded(char('.'), number)))))(i)
}

fn number(i: &[u8]) -> IResult<&[u8], &[u8]> {
    verify(digit1, |d: &[u8]| d.len() == 1 || d[0] != b'0')(i)
}

fn descr(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((
        take_while_m_n(1, 1, is_alphabetic),
        take_while(is_alnum_hyphen),
    )))(i)
}

fn is_alnum_hyphen(c: u8) -> bool {
    is_alphanumeric(c) || c == b'-'
}
