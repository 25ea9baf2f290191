use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use libc::{atexit, cc_t, termios, STDIN_FILENO};

use nix::errno::Errno;
use nix::sys::termios::{
    tcgetattr, tcsetattr,
    SetArg, ControlFlags, InputFlags, LocalFlags, OutputFlags, Termios,
};
use nix::unistd::read;

use tracing::{debug, error, warn};

use crate::error::{Error, Operation};
use crate::terminal::{RawConfig, READ_TIMEOUT};

// VTIME is measured in deciseconds
const READ_TIMEOUT_DECISECONDS: cc_t = (READ_TIMEOUT.as_millis() / 100) as cc_t;

/// Attributes of the terminal holding the active session.
///
/// Shared with the process-exit hook, which restores them if the
/// owning `Session` never got the chance to.
static ACTIVE: Mutex<Option<Saved>> = Mutex::new(None);

static EXIT_HOOK_REGISTERED: AtomicBool = AtomicBool::new(false);

struct Saved {
    fd: RawFd,
    tio: termios,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Attributes(termios);

impl Attributes {
    pub fn of(fd: RawFd) -> Result<Attributes, Error> {
        let tio = tcgetattr(fd)
            .map_err(|e| Error::io(Operation::GetAttributes, nix_to_io(e)))?;

        Ok(Attributes(tio.into()))
    }

    pub fn behaviors(&self) -> RawConfig {
        let tio = Termios::from(self.0);

        RawConfig{
            canonical: tio.local_flags.contains(LocalFlags::ICANON),
            echo: tio.local_flags.contains(LocalFlags::ECHO),
            signals: tio.local_flags.contains(LocalFlags::ISIG),
            extended_input: tio.local_flags.contains(LocalFlags::IEXTEN),
            output_processing: tio.output_flags.contains(OutputFlags::OPOST),
            flow_control: tio.input_flags.contains(InputFlags::IXON),
            cr_to_nl: tio.input_flags.contains(InputFlags::ICRNL),
            parity_check: tio.input_flags.contains(InputFlags::INPCK),
            break_interrupt: tio.input_flags.contains(InputFlags::BRKINT),
            strip_high_bit: tio.input_flags.contains(InputFlags::ISTRIP),
            eight_bit: tio.control_flags & ControlFlags::CSIZE == ControlFlags::CS8,
        }
    }
}

pub struct Session {
    fd: RawFd,
    original: Attributes,
    active: bool,
}

impl Session {
    pub fn stdin(config: RawConfig) -> Result<Session, Error> {
        Session::enter(STDIN_FILENO, config)
    }

    pub fn enter(fd: RawFd, config: RawConfig) -> Result<Session, Error> {
        let mut active = lock_active();

        if let Some(ref saved) = *active {
            warn!(fd, active_fd = saved.fd, "refusing to enter raw mode twice");
            return Err(Error::AlreadyActive);
        }

        let old_tio = tcgetattr(fd)
            .map_err(|e| Error::io(Operation::GetAttributes, nix_to_io(e)))?;

        register_exit_hook()?;

        let mut tio = old_tio.clone();
        apply_config(&mut tio, &config);

        tcsetattr(fd, SetArg::TCSAFLUSH, &tio)
            .map_err(|e| Error::io(Operation::SetAttributes, nix_to_io(e)))?;

        let original = Attributes(old_tio.into());

        *active = Some(Saved{fd, tio: original.0});

        debug!(fd, ?config, "entered raw mode");

        Ok(Session{
            fd,
            original,
            active: true,
        })
    }

    pub fn original(&self) -> Attributes {
        self.original
    }

    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Error> {
        match read(self.fd, buf) {
            Ok(n) => Ok(n),
            // Treated as a read that timed out with no input
            Err(Errno::EAGAIN) | Err(Errno::EINTR) => Ok(0),
            Err(e) => Err(Error::io(Operation::Read, nix_to_io(e)))
        }
    }

    pub fn read_byte(&self) -> Result<Option<u8>, Error> {
        let mut buf = [0; 1];

        match self.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0]))
        }
    }

    pub fn exit(&mut self) -> Result<(), Error> {
        self.active = false;

        let res = tcsetattr(self.fd, SetArg::TCSAFLUSH, &self.original.0.into())
            .map_err(|e| Error::io(Operation::SetAttributes, nix_to_io(e)));

        // Restoration is attempted exactly once; a failure here is not
        // retried by the exit hook.
        lock_active().take();

        debug!(fd = self.fd, ok = res.is_ok(), "left raw mode");

        res
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.exit() {
                error!(fd = self.fd, "failed to restore terminal: {}", e);
            }
        }
    }
}

fn apply_config(tio: &mut Termios, config: &RawConfig) {
    use nix::sys::termios::SpecialCharacterIndices::*;

    tio.input_flags.set(InputFlags::BRKINT, config.break_interrupt);
    tio.input_flags.set(InputFlags::ICRNL, config.cr_to_nl);
    tio.input_flags.set(InputFlags::INPCK, config.parity_check);
    tio.input_flags.set(InputFlags::ISTRIP, config.strip_high_bit);
    tio.input_flags.set(InputFlags::IXON, config.flow_control);

    tio.output_flags.set(OutputFlags::OPOST, config.output_processing);

    tio.local_flags.set(LocalFlags::ICANON, config.canonical);
    tio.local_flags.set(LocalFlags::ECHO, config.echo);
    tio.local_flags.set(LocalFlags::IEXTEN, config.extended_input);
    tio.local_flags.set(LocalFlags::ISIG, config.signals);

    if config.eight_bit {
        tio.control_flags.remove(ControlFlags::CSIZE);
        tio.control_flags.insert(ControlFlags::CS8);
    }

    // Allow a read to return with 0 characters ready
    tio.control_chars[VMIN as usize] = 0;
    // ... but only after waiting up to READ_TIMEOUT for one to arrive
    tio.control_chars[VTIME as usize] = READ_TIMEOUT_DECISECONDS;
}

// Called with `ACTIVE` held
fn register_exit_hook() -> Result<(), Error> {
    if EXIT_HOOK_REGISTERED.load(Ordering::Relaxed) {
        return Ok(());
    }

    if unsafe { atexit(restore_at_exit) } != 0 {
        return Err(Error::io(Operation::RegisterExitHook,
            io::Error::new(io::ErrorKind::Other, "failed to register exit hook")));
    }

    EXIT_HOOK_REGISTERED.store(true, Ordering::Relaxed);
    Ok(())
}

// Runs during process teardown. Must not panic and must not touch
// thread-local state, which includes the tracing dispatcher.
extern "C" fn restore_at_exit() {
    let saved = match ACTIVE.try_lock() {
        Ok(mut active) => active.take(),
        Err(TryLockError::Poisoned(p)) => p.into_inner().take(),
        Err(TryLockError::WouldBlock) => return,
    };

    if let Some(saved) = saved {
        if let Err(e) = tcsetattr(saved.fd, SetArg::TCSAFLUSH, &saved.tio.into()) {
            let _ = writeln!(io::stderr(), "tcsetattr: {}", nix_to_io(e));
        }
    }
}

fn lock_active() -> MutexGuard<'static, Option<Saved>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn nix_to_io(e: nix::Error) -> io::Error {
    io::Error::from_raw_os_error(e as i32)
}
