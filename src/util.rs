//! Small ambient-stack helpers: structured logging bootstrap and
//! retry-with-backoff wrappers around file open/create, reused by the
//! Output Writer and Orchestrator for the first I/O operation on each path
//! (not to be confused with the per-`read()`-call EINTR/EAGAIN retry the
//! Input Reader does — see `window::InputWindow::refill`).

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Initialize the `tracing` subscriber from `RUST_LOG` (default `info`).
/// Safe to call repeatedly; only the first call has any effect.
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

use std::fs::File;
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

/// Return true for transient/retriable I/O errors seen when filter drivers
/// (AV/backup), USB/NAS volumes, or sharing violations hold a file briefly.
fn is_retriable_io_error(e: &io::Error) -> bool {
    match e.raw_os_error() {
        // Common Windows transient codes:
        //   5   = Access is denied (often AV/share)
        //   32  = Sharing violation
        //   33  = Lock violation
        //   225 = AV/PUA blocked file
        //   433 = A device which does not exist was specified
        //   1006= Volume externally altered; handle invalid
        //   1117= I/O device error
        //   1224= The requested operation cannot be performed on a file with a user-mapped section open
        //   21  = Device not ready
        Some(5) | Some(32) | Some(33) | Some(225) | Some(433) | Some(1006) | Some(1117)
        | Some(1224) | Some(21) => true,
        _ => false,
    }
}

/// Open a file for reading with retries/backoff for transient errors.
pub fn open_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    let mut last_err: Option<io::Error> = None;
    for i in 0..tries.max(1) {
        match File::open(path) {
            Ok(f) => return Ok(f),
            Err(e) if is_retriable_io_error(&e) => {
                last_err = Some(e);
                sleep(Duration::from_millis(delay_ms.saturating_mul((i + 1) as u64)));
                continue;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "open failed")))
}

/// Create (or truncate) a file for writing with retries/backoff for
/// transient errors. On Unix the file is created `0o600` rather than
/// inheriting the process umask.
pub fn create_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    let mut last_err: Option<io::Error> = None;
    for i in 0..tries.max(1) {
        match open_for_create(path) {
            Ok(f) => return Ok(f),
            Err(e) if is_retriable_io_error(&e) => {
                last_err = Some(e);
                sleep(Duration::from_millis(delay_ms.saturating_mul((i + 1) as u64)));
                continue;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "create failed")))
}

#[cfg(unix)]
fn open_for_create(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    File::options().write(true).create(true).truncate(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_for_create(path: &Path) -> io::Result<File> {
    File::create(path)
}
