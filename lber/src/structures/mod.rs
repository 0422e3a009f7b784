use crate::structure;

pub mod boolean;
pub mod explicit;
pub mod integer;
pub mod null;
pub mod octetstring;
pub mod sequence;

pub use self::boolean::Boolean;
pub use self::explicit::ExplicitTag;
pub use self::integer::{Enumerated, Integer};
pub use self::null::Null;
pub use self::octetstring::OctetString;
pub use self::sequence::Sequence;

pub trait ASNTag {
    /// Encode yourself into a generic Tag format.
    ///
    /// Only the payload encoding differs between types; class and id are written
    /// the same way for all of them once the tag is in the generic form.
    fn into_structure(self) -> structure::StructureTag;
}

/// The ASN.1 types needed for LDAPv3, plus an escape hatch for already
/// encoded tags.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Integer(Integer),
    Enumerated(Enumerated),
    Sequence(Sequence),
    OctetString(OctetString),
    Boolean(Boolean),
    Null(Null),
    ExplicitTag(ExplicitTag),
    StructureTag(structure::StructureTag),
}

impl ASNTag for Tag {
    fn into_structure(self) -> structure::StructureTag {
        match self {
            Tag::Integer(i) => i.into_structure(),
            Tag::Enumerated(i) => i.into_structure(),
            Tag::Sequence(i) => i.into_structure(),
            Tag::OctetString(i) => i.into_structure(),
            Tag::Boolean(i) => i.into_structure(),
            Tag::Null(i) => i.into_structure(),
            Tag::ExplicitTag(i) => i.into_structure(),
            Tag::StructureTag(s) => s,
        }
    }
}
