//! Error type reported by terminal session operations

use std::fmt;
use std::io;

/// Low-level operation that failed while managing a terminal session
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    /// Querying the current device attributes (`tcgetattr`)
    GetAttributes,
    /// Applying device attributes (`tcsetattr`)
    SetAttributes,
    /// Reading input bytes from the device (`read`)
    Read,
    /// Registering the process-exit restoration hook (`atexit`)
    RegisterExitHook,
    /// Writing output (`write`)
    Write,
}

impl Operation {
    /// Returns the name of the underlying system call.
    pub fn name(&self) -> &'static str {
        match *self {
            Operation::GetAttributes => "tcgetattr",
            Operation::SetAttributes => "tcsetattr",
            Operation::Read => "read",
            Operation::RegisterExitHook => "atexit",
            Operation::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned from terminal session operations
///
/// All errors are considered fatal. A caller holding a terminal in a
/// partially configured state should report the error and terminate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation on the terminal device failed
    #[error("{op}: {source}")]
    Io {
        /// Operation which failed
        op: Operation,
        /// Error reported by the operating system
        #[source]
        source: io::Error,
    },
    /// A raw mode session is already active in this process
    #[error("raw mode is already active in this process")]
    AlreadyActive,
}

impl Error {
    pub(crate) fn io(op: Operation, source: io::Error) -> Error {
        Error::Io{op, source}
    }

    /// Returns the failed operation, if this is an I/O error.
    pub fn operation(&self) -> Option<Operation> {
        match *self {
            Error::Io{op, ..} => Some(op),
            Error::AlreadyActive => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use super::{Error, Operation};

    #[test]
    fn test_display_names_operation() {
        let err = Error::io(Operation::GetAttributes,
            io::Error::from_raw_os_error(libc::ENOTTY));

        let msg = err.to_string();

        assert!(msg.starts_with("tcgetattr: "), "{}", msg);
        assert_eq!(err.operation(), Some(Operation::GetAttributes));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::SetAttributes.to_string(), "tcsetattr");
        assert_eq!(Operation::Read.to_string(), "read");
        assert_eq!(Operation::RegisterExitHook.to_string(), "atexit");
        assert_eq!(Operation::Write.to_string(), "write");
        assert_eq!(Error::AlreadyActive.operation(), None);
    }
}
