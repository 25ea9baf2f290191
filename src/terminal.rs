//! Provides scoped raw mode sessions on terminal devices

use std::fmt;
use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::error::Error;
use crate::sys;

/// Maximum time a [`Session`] read waits for input before returning
/// zero bytes.
///
/// [`Session`]: struct.Session.html
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Selects which line discipline behaviors remain enabled while a
/// [`Session`] is active.
///
/// Each field states whether the corresponding behavior is enabled during
/// the session. The [`Default`] value is raw mode: every behavior is
/// disabled and the character size is forced to 8 bits.
///
/// To override only some options while using the remaining default values,
/// one may use the following construct:
///
/// ```no_run
/// # fn example() -> Result<(), rawkeys::Error> {
/// use rawkeys::{RawConfig, Session};
///
/// let session = Session::enter_stdin(RawConfig{
///     signals: true,
///     .. RawConfig::default()
/// })?;
///
/// // ...
///
/// session.exit()?;
/// # Ok(())
/// # }
/// ```
///
/// [`Default`]: https://doc.rust-lang.org/std/default/trait.Default.html
/// [`Session`]: struct.Session.html
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RawConfig {
    /// Line-buffered input with line editing (`ICANON`)
    pub canonical: bool,
    /// Echo of typed characters (`ECHO`)
    pub echo: bool,
    /// Interrupt and suspend characters generating signals (`ISIG`)
    pub signals: bool,
    /// Implementation-defined input processing, e.g. Ctrl-V (`IEXTEN`)
    pub extended_input: bool,
    /// Output post-processing such as newline translation (`OPOST`)
    pub output_processing: bool,
    /// Ctrl-S and Ctrl-Q pausing and resuming output (`IXON`)
    pub flow_control: bool,
    /// Translation of carriage return to newline on input (`ICRNL`)
    pub cr_to_nl: bool,
    /// Input parity checking (`INPCK`)
    pub parity_check: bool,
    /// Break condition sending an interrupt (`BRKINT`)
    pub break_interrupt: bool,
    /// Stripping of the eighth bit of each input byte (`ISTRIP`)
    pub strip_high_bit: bool,
    /// Whether to force an 8-bit character size (`CS8`).
    ///
    /// If `false`, the character size is left unchanged.
    pub eight_bit: bool,
}

impl Default for RawConfig {
    fn default() -> RawConfig {
        RawConfig{
            canonical: false,
            echo: false,
            signals: false,
            extended_input: false,
            output_processing: false,
            flow_control: false,
            cr_to_nl: false,
            parity_check: false,
            break_interrupt: false,
            strip_high_bit: false,
            eight_bit: true,
        }
    }
}

/// Snapshot of a terminal device's line discipline configuration
///
/// Two snapshots compare equal only if every flag, control character,
/// and line speed is identical.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Attributes(sys::Attributes);

impl Attributes {
    /// Captures the current attributes of the terminal device `fd`.
    ///
    /// Fails with an [`Operation::GetAttributes`] error if `fd` does not
    /// refer to a terminal.
    ///
    /// [`Operation::GetAttributes`]: ../error/enum.Operation.html
    pub fn of(fd: RawFd) -> Result<Attributes, Error> {
        sys::Attributes::of(fd).map(Attributes)
    }

    /// Returns which of the behaviors named by [`RawConfig`] are enabled
    /// in this snapshot.
    ///
    /// [`RawConfig`]: struct.RawConfig.html
    pub fn behaviors(&self) -> RawConfig {
        self.0.behaviors()
    }
}

/// Represents raw mode being active on a terminal device
///
/// While a `Session` exists, its device is configured according to the
/// [`RawConfig`] it was entered with. The attributes captured on entry are
/// restored when the session is ended by [`exit`], or, failing that, when
/// the value is dropped.
///
/// Should the process exit while a session is still active, e.g. through
/// `std::process::exit`, a hook registered with `atexit` restores the
/// terminal instead. A process killed by a signal it cannot handle leaves
/// the terminal in raw mode.
///
/// # Concurrency
///
/// Terminal attributes are process-wide state. At most one `Session` may
/// exist in a process at a time; attempts to enter a second session fail
/// with [`Error::AlreadyActive`]. Managing terminal modes from several
/// threads at once is not supported.
///
/// [`RawConfig`]: struct.RawConfig.html
/// [`exit`]: #method.exit
/// [`Error::AlreadyActive`]: ../error/enum.Error.html
#[must_use = "dropping a `Session` immediately restores the terminal"]
pub struct Session(sys::Session);

impl Session {
    /// Enters raw mode on standard input using the given configuration.
    pub fn enter_stdin(config: RawConfig) -> Result<Session, Error> {
        sys::Session::stdin(config).map(Session)
    }

    /// Enters raw mode on the terminal device `fd`.
    ///
    /// The current attributes of `fd` are captured before any change is
    /// made. If they cannot be read, the device is left untouched.
    ///
    /// `fd` must remain open until the session has ended.
    pub fn enter(fd: RawFd, config: RawConfig) -> Result<Session, Error> {
        sys::Session::enter(fd, config).map(Session)
    }

    /// Returns the attributes captured when the session was entered.
    #[inline]
    pub fn original(&self) -> Attributes {
        Attributes(self.0.original())
    }

    /// Reads available input into `buf`, returning the number of bytes read.
    ///
    /// If no input arrives within [`READ_TIMEOUT`], `Ok(0)` is returned.
    ///
    /// [`READ_TIMEOUT`]: constant.READ_TIMEOUT.html
    #[inline]
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.0.read(buf)
    }

    /// Reads a single byte of input.
    ///
    /// If no input arrives within [`READ_TIMEOUT`], `Ok(None)` is returned.
    ///
    /// [`READ_TIMEOUT`]: constant.READ_TIMEOUT.html
    #[inline]
    pub fn read_byte(&self) -> Result<Option<u8>, Error> {
        self.0.read_byte()
    }

    /// Ends the session, restoring the attributes captured on entry.
    ///
    /// Pending input which has not been read is discarded.
    pub fn exit(mut self) -> Result<(), Error> {
        self.0.exit()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Session")
            .field("original", &self.original())
            .finish()
    }
}

/// Enters raw mode on standard input with the default [`RawConfig`].
///
/// [`RawConfig`]: struct.RawConfig.html
pub fn enter_raw_mode() -> Result<Session, Error> {
    Session::enter_stdin(RawConfig::default())
}

/// Ends a raw mode session, restoring the terminal's original attributes.
///
/// Equivalent to [`Session::exit`].
///
/// [`Session::exit`]: struct.Session.html#method.exit
pub fn exit_raw_mode(session: Session) -> Result<(), Error> {
    session.exit()
}

#[cfg(test)]
mod test {
    use super::{RawConfig, READ_TIMEOUT};

    #[test]
    fn test_default_config_is_raw() {
        let config = RawConfig::default();

        assert!(!config.canonical);
        assert!(!config.echo);
        assert!(!config.signals);
        assert!(!config.extended_input);
        assert!(!config.output_processing);
        assert!(!config.flow_control);
        assert!(!config.cr_to_nl);
        assert!(!config.parity_check);
        assert!(!config.break_interrupt);
        assert!(!config.strip_high_bit);
        assert!(config.eight_bit);
    }

    #[test]
    fn test_read_timeout() {
        assert_eq!(READ_TIMEOUT.as_millis(), 100);
    }
}
