//! Byte classification and formatting helpers

use std::io::{self, Write};

/// Key which ends the `rawkeys` echo loop
pub const QUIT_KEY: u8 = b'q';

const DEL: u8 = 0x7f;
const CTRL_MASK: u8 = 0x1f;

/// Classification of a single input byte
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ByteClass {
    /// Non-printable control byte (`0x00` ... `0x1f` and `0x7f`)
    Control,
    /// Any other byte
    Printable,
}

/// Classifies a byte as a control byte or a printable byte.
///
/// Only the C0 control range and `DEL` are control bytes.
/// Bytes above `0x7f` are reported as printable.
///
/// # Examples
///
/// ```
/// # use rawkeys::util::{classify, ByteClass};
/// assert_eq!(classify(b'A'), ByteClass::Printable);
/// assert_eq!(classify(b'\r'), ByteClass::Control);
/// ```
#[inline]
pub fn classify(byte: u8) -> ByteClass {
    if is_ctrl(byte) {
        ByteClass::Control
    } else {
        ByteClass::Printable
    }
}

/// Returns whether the given byte is a control byte.
#[inline]
pub fn is_ctrl(byte: u8) -> bool {
    byte & CTRL_MASK == byte || byte == DEL
}

/// Writes the echo line for a single byte.
///
/// Control bytes are written as `<n>\r\n`; other bytes are written as
/// `<n> ('<byte>')\r\n`, with the byte itself placed between the quotes.
///
/// A carriage return precedes each line feed because output processing
/// is disabled while the terminal is in raw mode.
pub fn write_byte_line<W: Write>(w: &mut W, byte: u8) -> io::Result<()> {
    match classify(byte) {
        ByteClass::Control => write!(w, "{}\r\n", byte),
        ByteClass::Printable => {
            write!(w, "{} ('", byte)?;
            w.write_all(&[byte])?;
            w.write_all(b"')\r\n")
        }
    }
}
