//! Wires the Input Reader, Input Window, Decoder Adapter and Output Writer
//! together per a `Config` and runs the Resync Driver to completion. This is
//! the only module that knows about all four collaborators at once; `main`
//! just calls in here.

use std::io::{self, Read};

use tracing::info;

use crate::config::Config;
use crate::decoder::GzipDecoder;
use crate::driver::{self, RunStats};
use crate::error::RecoverError;
use crate::output::OutputWriter;
use crate::util::open_with_backoff;
use crate::window::InputWindow;

/// Open the configured input (a named file, or standard input when
/// `cfg.input_path` is `None`) and run recovery end to end.
pub fn recover(cfg: &Config) -> Result<RunStats, RecoverError> {
    let mut input: Box<dyn Read> = match &cfg.input_path {
        Some(path) => {
            let file = open_with_backoff(path, 5, 20)
                .map_err(|e| RecoverError::io("open", path.display().to_string(), e))?;
            if cfg.verbose {
                eprintln!("Opened input file for reading: {}", path.display());
            }
            Box::new(file)
        }
        None => {
            if cfg.verbose {
                eprintln!("Opened input file for reading: stdin");
            }
            Box::new(io::stdin())
        }
    };

    // Open the output artifact before the first read: an empty input still
    // produces an empty output file.
    let mut output = OutputWriter::open(cfg)?;

    let mut window = InputWindow::new(cfg.inbuf_size);
    let n = window
        .refill(&mut input)
        .map_err(|e| RecoverError::io("read", input_label(cfg), to_io_error(e)))?;
    if n == 0 {
        if cfg.verbose {
            eprintln!("File is empty");
        }
        return Ok(RunStats::default());
    }

    let mut decoder = GzipDecoder::new();

    info!(path = %input_label(cfg), "starting recovery");
    let stats =
        driver::run(&mut input, &mut window, &mut decoder, &mut output, cfg.outbuf_size, cfg.verbose)?;
    info!(bytes_written = stats.bytes_written, "recovery finished");
    Ok(stats)
}

fn input_label(cfg: &Config) -> String {
    match &cfg.input_path {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    }
}

fn to_io_error(e: anyhow::Error) -> io::Error {
    for cause in e.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return io::Error::new(io_err.kind(), io_err.to_string());
        }
    }
    io::Error::new(io::ErrorKind::Other, e.to_string())
}
