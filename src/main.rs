//! Echoes the code of each key pressed until `q` is pressed.

use std::io::{self, Write};
use std::process::exit;

use tracing::Level;

use rawkeys::util::{write_byte_line, QUIT_KEY};
use rawkeys::{enter_raw_mode, exit_raw_mode, Error, Operation};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::WARN)
        .init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run() -> Result<(), Error> {
    let session = enter_raw_mode()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let b = match session.read_byte()? {
            Some(b) => b,
            None => continue,
        };

        write_byte_line(&mut out, b)
            .and_then(|_| out.flush())
            .map_err(|e| Error::Io{op: Operation::Write, source: e})?;

        if b == QUIT_KEY {
            break;
        }
    }

    exit_raw_mode(session)
}
