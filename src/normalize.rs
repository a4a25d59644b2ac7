//! Filename repair for archives whose tools stored ISO-8859-1 names
//! without setting the UTF-8 flag. Those names were decoded as CP437,
//! so re-encoding them as CP437 recovers the original bytes, which are
//! then read as ISO-8859-1.

use std::borrow::Cow;

use crate::zip::cp437;

/// Reinterpret a CP437-decoded name as ISO-8859-1.
///
/// Names that contain characters outside CP437 come through unchanged,
/// as do names the reinterpretation leaves identical (plain ASCII).
pub fn normalize(name: &str) -> Cow<'_, str> {
    if name.is_ascii() {
        return Cow::Borrowed(name);
    }
    let Some(bytes) = cp437::encode(name) else {
        return Cow::Borrowed(name);
    };
    // ISO-8859-1 maps every byte to the code point of the same value.
    let latin1: String = bytes.into_iter().map(char::from).collect();
    if latin1 == name {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(latin1)
    }
}
