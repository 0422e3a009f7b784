use std::borrow::Cow;

/// Escape a filter literal.
///
/// Literal values appearing in an LDAP filter can contain any character,
/// but some characters (parentheses, asterisk, backslash, NUL) must be
/// escaped in the filter's string representation. This function does the
/// escaping.
///
/// The argument, `lit`, can be owned or borrowed. The function doesn't
/// allocate the return value unless there's need to escape the input.
pub fn ldap_escape<'a, S: Into<Cow<'a, str>>>(lit: S) -> Cow<'a, str> {
    #[inline]
    fn needs_escape(c: char) -> bool {
        c == '\\' || c == '*' || c == '(' || c == ')' || c == '\0'
    }

    #[inline]
    fn xdigit(c: u8) -> char {
        char::from(c + if c < 10 { b'0' } else { b'a' - 10 })
    }

    let lit = lit.into();
    if !lit.chars().any(needs_escape) {
        return lit;
    }
    let mut output = String::with_capacity(lit.len() + 12); // guess: up to 4 escaped chars
    for c in lit.chars() {
        if needs_escape(c) {
            let c = c as u8;
            output.push('\\');
            output.push(xdigit(c >> 4));
            output.push(xdigit(c & 0xF));
        } else {
            output.push(c);
        }
    }
    Cow::Owned(output)
}
