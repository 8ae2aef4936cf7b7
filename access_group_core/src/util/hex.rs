//! Helpers for working with hexadecimal

use std::iter::Iterator;

/// Write some bytes as lowercase hexadecimal.
///
/// The `0x` prefix is only written in alternate (`{:#x}`) mode. Mainly
/// helpful in implementing [`std::fmt::LowerHex`] on the way to
/// [`std::fmt::Display`].
pub(crate) fn bytes_as_hex<'a, I: Iterator<Item = &'a u8>>(
    mut byte_iter: I,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    if f.alternate() {
        write!(f, "0x")?;
    }

    byte_iter.try_fold((), |_, byte| write!(f, "{:02x}", byte))
}
