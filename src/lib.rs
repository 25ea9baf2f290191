//! Scoped raw mode sessions for Unix terminal devices
//!
//! A [`Session`] places a terminal device into raw mode: input is delivered
//! byte by byte, without line buffering, local echo, or signals generated by
//! control characters. The device's previous configuration is captured on
//! entry and restored when the session ends.
//!
//! Restoration happens on every exit path:
//!
//! * explicitly, through [`Session::exit`] or [`exit_raw_mode`];
//! * when the `Session` is dropped, e.g. on early return or panic unwind;
//! * from an `atexit` hook, if the process exits while a session is active.
//!
//! ```no_run
//! # fn example() -> Result<(), rawkeys::Error> {
//! let session = rawkeys::enter_raw_mode()?;
//!
//! loop {
//!     // `None` means no key was pressed within `READ_TIMEOUT`
//!     if session.read_byte()? == Some(b'q') {
//!         break;
//!     }
//! }
//!
//! rawkeys::exit_raw_mode(session)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform support
//!
//! Only Unix terminals are supported. Terminal attributes are process-wide
//! state; see [`Session`] for the single-session rule.
//!
//! [`Session`]: terminal/struct.Session.html
//! [`Session::exit`]: terminal/struct.Session.html#method.exit
//! [`exit_raw_mode`]: terminal/fn.exit_raw_mode.html

#![deny(missing_docs)]

#[cfg(unix)] extern crate libc;
#[cfg(unix)] extern crate nix;

#[cfg(not(unix))]
compile_error!("rawkeys requires Unix terminal attribute APIs (termios)");

pub use crate::error::{Error, Operation};
pub use crate::terminal::{
    enter_raw_mode, exit_raw_mode,
    Attributes, RawConfig, Session, READ_TIMEOUT,
};
pub use crate::util::{classify, ByteClass};

pub mod error;
pub mod terminal;
pub mod util;

#[cfg(unix)]
#[path = "unix/mod.rs"]
mod sys;
