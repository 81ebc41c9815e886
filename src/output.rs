//! The Output Writer: an append-only sink with split-mode rotation and the
//! naming policy wired in.

use std::io::{self, Write};
use std::path::Path;

use crate::config::{Config, OutputTarget};
use crate::error::RecoverError;
use crate::paths::{artifact_name, derived_base};
use crate::util::create_with_backoff;

pub struct OutputWriter {
    sink: Box<dyn Write>,
    /// `None` for the stdout target, which is never rotated onto a new path.
    base: Option<String>,
    split: bool,
    index: u32,
    verbose: bool,
    current_path: String,
}

impl OutputWriter {
    /// Open the first output artifact per the naming policy in `paths`.
    pub fn open(cfg: &Config) -> Result<Self, RecoverError> {
        match &cfg.output {
            OutputTarget::Stdout => Ok(Self {
                sink: Box::new(io::stdout()),
                base: None,
                split: cfg.split,
                index: 1,
                verbose: cfg.verbose,
                current_path: "stdout".to_string(),
            }),
            OutputTarget::Named(name) => Self::open_file_based(cfg, name.clone()),
            OutputTarget::Derived => {
                let base = derived_base(cfg.input_path.as_deref(), None);
                Self::open_file_based(cfg, base)
            }
        }
    }

    fn open_file_based(cfg: &Config, base: String) -> Result<Self, RecoverError> {
        let path = artifact_name(&base, cfg.split, 1);
        let file = create_with_backoff(Path::new(&path), 5, 20)
            .map_err(|e| RecoverError::io("open", path.clone(), e))?;
        if cfg.verbose {
            eprintln!("Opened output file for writing: {path}");
        }
        Ok(Self {
            sink: Box::new(file),
            base: Some(base),
            split: cfg.split,
            index: 1,
            verbose: cfg.verbose,
            current_path: path,
        })
    }

    /// Append `bytes`, looping internally so a short write is never mistaken
    /// for an error.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), RecoverError> {
        self.sink
            .write_all(bytes)
            .map_err(|e| RecoverError::io("write", self.current_path.clone(), e))
    }

    /// Close the current sink and open the next one. A no-op outside split
    /// mode and for the stdout target.
    pub fn rotate(&mut self) -> Result<(), RecoverError> {
        if !self.split {
            return Ok(());
        }
        let Some(base) = self.base.clone() else { return Ok(()) };
        self.index += 1;
        let path = artifact_name(&base, true, self.index);
        let file = create_with_backoff(Path::new(&path), 5, 20)
            .map_err(|e| RecoverError::io("open", path.clone(), e))?;
        self.sink = Box::new(file);
        self.current_path = path.clone();
        if self.verbose {
            eprintln!("Opened output file for writing: {path}");
        }
        Ok(())
    }
}
