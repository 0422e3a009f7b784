use std::io;

use crate::common::{TagClass, TagStructure};
use crate::structure::{StructureTag, PL};

use bytes::{BufMut, BytesMut};

/// Write the identifier octet(s) of a tag.
pub fn write_type(w: &mut BytesMut, class: TagClass, structure: TagStructure, id: u64) {
    let lead = ((class as u8) << 6) | ((structure as u8) << 5);
    if id < 0x1f {
        w.put_u8(lead | id as u8);
        return;
    }
    w.put_u8(lead | 0x1f);
    let mut groups = Vec::new();
    let mut rem = id;
    loop {
        groups.push((rem & 0x7f) as u8);
        rem >>= 7;
        if rem == 0 {
            break;
        }
    }
    let last = groups.len() - 1;
    for (n, group) in groups.into_iter().rev().enumerate() {
        w.put_u8(if n < last { group | 0x80 } else { group });
    }
}

/// Write a definite length, using the short form where possible.
pub fn write_length(w: &mut BytesMut, len: usize) {
    if len < 128 {
        w.put_u8(len as u8);
        return;
    }
    let octets = (len as u64).to_be_bytes();
    let skip = octets.iter().take_while(|&&b| b == 0).count();
    w.put_u8(0x80 | (octets.len() - skip) as u8);
    w.put_slice(&octets[skip..]);
}

/// Serialize a tag and everything below it into the buffer.
pub fn encode_into(buf: &mut BytesMut, tag: StructureTag) -> io::Result<()> {
    match tag.payload {
        PL::P(content) => {
            write_type(buf, tag.class, TagStructure::Primitive, tag.id);
            write_length(buf, content.len());
            buf.put_slice(&content);
        }
        PL::C(tags) => {
            let mut content = BytesMut::new();
            for inner in tags {
                encode_into(&mut content, inner)?;
            }
            write_type(buf, tag.class, TagStructure::Constructed, tag.id);
            write_length(buf, content.len());
            buf.put_slice(&content);
        }
    }
    Ok(())
}
