//! Run configuration. A single value assembled once by the CLI layer and
//! passed into the Orchestrator — never global mutable flags.

use std::path::PathBuf;

use crate::window::DEFAULT_INBUF_SIZE;

/// Default output buffer capacity (64 KiB).
pub const DEFAULT_OUTBUF_SIZE: usize = 64 * 1024;

/// Where salvaged plaintext is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// `-p`: write to standard output, never rotated across a filename.
    Stdout,
    /// `-o NAME`: use `NAME` as the output filename base.
    Named(String),
    /// Neither `-p` nor `-o`: derive `<stem>.recovered` from the input name.
    Derived,
}

/// Fully resolved run configuration, built once by `cli::parse` and
/// thereafter immutable for the duration of the run.
#[derive(Clone, Debug)]
pub struct Config {
    /// `None` means read from standard input.
    pub input_path: Option<PathBuf>,
    pub output: OutputTarget,
    /// `-s`: rotate output at every recovery edge.
    pub split: bool,
    /// `-v`: verbose diagnostics to standard error.
    pub verbose: bool,
    /// `-V`: print the version banner before running.
    pub print_version_banner: bool,
    pub inbuf_size: usize,
    pub outbuf_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: None,
            output: OutputTarget::Derived,
            split: false,
            verbose: false,
            print_version_banner: false,
            inbuf_size: DEFAULT_INBUF_SIZE,
            outbuf_size: DEFAULT_OUTBUF_SIZE,
        }
    }
}

impl Config {
    pub fn with_input_path(mut self, path: Option<PathBuf>) -> Self {
        self.input_path = path;
        self
    }
    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }
    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
