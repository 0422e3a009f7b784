use crate::common::TagClass;

/// Payload of a generic tag: primitive bytes or constructed children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PL {
    P(Vec<u8>),
    C(Vec<StructureTag>),
}

/// A tag with its payload already encoded into the generic form.
///
/// Incoming messages are parsed into this shape; the accessor methods consume the
/// tag and return `None` when it doesn't have the expected class, id or structure,
/// which lets decoders chain them with `and_then()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureTag {
    pub class: TagClass,
    pub id: u64,
    pub payload: PL,
}

impl StructureTag {
    pub fn match_class(self, class: TagClass) -> Option<Self> {
        if self.class == class {
            Some(self)
        } else {
            None
        }
    }

    pub fn match_id(self, id: u64) -> Option<Self> {
        if self.id == id {
            Some(self)
        } else {
            None
        }
    }

    pub fn is_constructed(&self) -> bool {
        matches!(self.payload, PL::C(_))
    }

    pub fn expect_constructed(self) -> Option<Vec<StructureTag>> {
        match self.payload {
            PL::C(i) => Some(i),
            PL::P(_) => None,
        }
    }

    pub fn expect_primitive(self) -> Option<Vec<u8>> {
        match self.payload {
            PL::P(i) => Some(i),
            PL::C(_) => None,
        }
    }
}
