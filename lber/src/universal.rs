/// Universal tag numbers used by LDAPv3.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Types {
    Boolean = 1,
    Integer = 2,
    OctetString = 4,
    Null = 5,
    Enumerated = 10,
    Sequence = 16,
    Set = 17,
}
