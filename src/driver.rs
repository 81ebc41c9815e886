//! The Resync Driver: the recovery state machine itself.
//!
//! It owns no I/O — it is handed an Input Window (already holding the first
//! chunk), an Input Reader to refill it, a `Decoder`, and an `OutputWriter`,
//! and drives them against each other until the reader reports end of file.

use std::io::Read;

use crate::decoder::{Decoder, StepOutcome};
use crate::error::RecoverError;
use crate::output::OutputWriter;
use crate::window::InputWindow;

/// How far back of a fault to restart decoding. Two bytes is enough to step
/// behind a stray gzip magic (`\x1f\x8b\x08`) that a corruption happened to
/// land just past, without re-trying every single byte from scratch.
const BACKSTEP_BYTES: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub bytes_written: u64,
}

/// Run the recovery loop to completion.
///
/// `window` may already hold data (the caller is expected to have done the
/// first refill itself so it can report "File is empty" before any decoder
/// exists); if it's empty, this returns immediately with zero bytes written.
pub fn run(
    reader: &mut dyn Read,
    window: &mut InputWindow,
    decoder: &mut dyn Decoder,
    output: &mut OutputWriter,
    outbuf_size: usize,
    verbose: bool,
) -> Result<RunStats, RecoverError> {
    if window.len() == 0 {
        return Ok(RunStats::default());
    }

    decoder.reset();
    let mut window_fed: usize = 0;

    let mut founderr = false;
    let mut foundgood = false;
    let mut err_pos: usize = 0;
    let mut err_inc: usize = 0;
    let mut bytes_written: u64 = 0;

    let mut outbuf = vec![0u8; outbuf_size.max(1)];

    loop {
        let (consumed, outcome) = decoder.step(&window.filled()[window_fed..], &mut outbuf);
        window_fed += consumed;

        if outcome == StepOutcome::Err {
            foundgood = false;

            if !founderr {
                founderr = true;
                err_pos = window_fed;
                let abs = window.read_cursor() - (window.len() as u64 - err_pos as u64);
                if verbose {
                    eprintln!("Found error at byte {abs} in input stream");
                }
                tracing::warn!(offset = abs, "fault entry");
                if window_fed == window.len() {
                    let got = refill(reader, window)?;
                    if got == 0 {
                        break;
                    }
                    err_inc = 0;
                    decoder.reset();
                    window_fed = 0;
                    continue;
                }
            }

            err_inc += 1;
            if window.len() > err_pos + err_inc {
                let start = (err_pos + err_inc).saturating_sub(BACKSTEP_BYTES);
                tracing::debug!(from = window_fed, to = start, "probe advance");
                decoder.reset();
                window_fed = start;
            } else {
                let got = refill(reader, window)?;
                if got == 0 {
                    break;
                }
                decoder.reset();
                window_fed = 0;
                err_pos = 0;
                err_inc = 0;
            }
            continue;
        }

        if founderr && !foundgood {
            foundgood = true;
            founderr = false;
            err_inc = 0;
            let abs = window.read_cursor() - window_fed as u64;
            if verbose {
                eprintln!("Found good data at byte {abs} in input stream");
            }
            tracing::debug!(offset = abs, "recovery edge: found good data");
            output.rotate()?;
        }

        if let StepOutcome::Produced(n) = outcome {
            if n > 0 {
                output.write_all(&outbuf[..n])?;
                bytes_written += n as u64;
            }
        }

        if window_fed == window.len() {
            let got = refill(reader, window)?;
            if got == 0 {
                break;
            }
            // Unlike the error-handling refills above, the decoder session
            // is left running: this is an ordinary continuation of the same
            // member, so tearing it down would lose its in-flight state.
            err_inc = 0;
            window_fed = 0;
        }

        if outcome == StepOutcome::End {
            decoder.reset();
            if window_fed != 0 && window_fed < window.len() {
                // False end of stream: skip one byte past the reported
                // boundary and keep trying with whatever remains buffered.
                window_fed += 1;
            }
            continue;
        }
    }

    if verbose {
        eprintln!("Total decompressed output = {bytes_written} bytes");
    }
    Ok(RunStats { bytes_written })
}

fn refill(reader: &mut dyn Read, window: &mut InputWindow) -> Result<usize, RecoverError> {
    let n = window.refill(reader).map_err(|e| RecoverError::io("read", "input", to_io_error(e)))?;
    tracing::debug!(bytes = n, "refill");
    Ok(n)
}

fn to_io_error(e: anyhow::Error) -> std::io::Error {
    for cause in e.chain() {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            return std::io::Error::new(io_err.kind(), io_err.to_string());
        }
    }
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}
