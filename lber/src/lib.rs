//! Basic Encoding Rules for the subset of ASN.1 needed by LDAPv3.
//!
//! Values are built from the typed wrappers in [`structures`], flattened into the
//! generic [`structure::StructureTag`] tree, and serialized with [`write::encode_into`].
//! Incoming data goes the other way through [`parse::parse_tag`].

pub mod common;
pub mod parse;
pub mod structure;
pub mod structures;
pub mod universal;
pub mod write;

pub use nom::IResult;
