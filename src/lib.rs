mod cli;
mod config;
mod decoder;
mod driver;
mod error;
mod orchestrator;
mod output;
mod paths;
mod util;
mod window;

pub use crate::cli::{parse, CliAction, USAGE, VERSION};
pub use crate::config::{Config, OutputTarget};
pub use crate::decoder::{Decoder, GzipDecoder, StepOutcome};
pub use crate::driver::RunStats;
pub use crate::error::RecoverError;
pub use crate::orchestrator::recover;
pub use crate::util::init_tracing_once;
