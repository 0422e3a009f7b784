use crate::common::{TagClass, TagStructure};
use crate::structure::{StructureTag, PL};

use nom::bytes::streaming::take;
use nom::error::{Error, ErrorKind};
use nom::number::streaming::be_u8;
use nom::IResult;

fn fail(i: &[u8], kind: ErrorKind) -> nom::Err<Error<&[u8]>> {
    nom::Err::Error(Error::new(i, kind))
}

fn octet(i: &[u8]) -> IResult<&[u8], u8> {
    be_u8(i)
}

fn octets(i: &[u8], n: usize) -> IResult<&[u8], &[u8]> {
    take(n)(i)
}

/// Parse the identifier octet(s): class, primitive/constructed bit and tag number.
pub fn parse_type_header(i: &[u8]) -> IResult<&[u8], (TagClass, TagStructure, u64)> {
    let (mut i, lead) = octet(i)?;
    let class = TagClass::from_u8(lead >> 6).ok_or_else(|| fail(i, ErrorKind::MapOpt))?;
    let structure =
        TagStructure::from_u8((lead >> 5) & 1).ok_or_else(|| fail(i, ErrorKind::MapOpt))?;
    let mut id = u64::from(lead & 0x1f);
    if id == 0x1f {
        // High tag number form, base 128 with the top bit as continuation.
        id = 0;
        loop {
            let (rest, b) = octet(i)?;
            i = rest;
            if id > u64::MAX >> 7 {
                return Err(fail(i, ErrorKind::TooLarge));
            }
            id = (id << 7) | u64::from(b & 0x7f);
            if b & 0x80 == 0 {
                break;
            }
        }
    }
    Ok((i, (class, structure, id)))
}

/// Parse a definite length, in either the short or the long form.
pub fn parse_length(i: &[u8]) -> IResult<&[u8], u64> {
    let (i, lead) = octet(i)?;
    if lead & 0x80 == 0 {
        return Ok((i, u64::from(lead)));
    }
    // Zero is the indefinite form, which LDAP forbids.
    let count = usize::from(lead & 0x7f);
    if count == 0 || count > 8 {
        return Err(fail(i, ErrorKind::LengthValue));
    }
    let (i, len_octets) = octets(i, count)?;
    let (_, len) = parse_uint(len_octets)?;
    Ok((i, len))
}

/// Extract an unsigned integer value from BER data.
pub fn parse_uint(i: &[u8]) -> IResult<&[u8], u64> {
    Ok((
        &i[i.len()..],
        i.iter().fold(0, |res, &byte| (res << 8) | u64::from(byte)),
    ))
}

/// Parse raw BER data into a serializable structure.
///
/// Returns `Err(nom::Err::Incomplete(_))` if the buffer holds only part of
/// the outermost tag, so the caller can wait for more data.
pub fn parse_tag(i: &[u8]) -> IResult<&[u8], StructureTag> {
    let (i, (class, structure, id)) = parse_type_header(i)?;
    let (i, len) = parse_length(i)?;
    let len = usize::try_from(len).map_err(|_| fail(i, ErrorKind::TooLarge))?;
    let (i, content) = octets(i, len)?;

    let payload = match structure {
        TagStructure::Primitive => PL::P(content.to_vec()),
        TagStructure::Constructed => {
            let mut content = content;
            let mut tv: Vec<StructureTag> = Vec::new();
            while !content.is_empty() {
                let (rest, tag) = match parse_tag(content) {
                    Ok(res) => res,
                    // The enclosing length covers all of the content, so running
                    // out of data here means the encoding is corrupt.
                    Err(nom::Err::Incomplete(_)) => return Err(fail(content, ErrorKind::Eof)),
                    Err(e) => return Err(e),
                };
                content = rest;
                tv.push(tag);
            }
            PL::C(tv)
        }
    };

    Ok((i, StructureTag { class, id, payload }))
}
