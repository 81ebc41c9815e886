use std::process::ExitCode;

use gzrecover::{parse, CliAction, RecoverError, USAGE, VERSION};

fn main() -> ExitCode {
    gzrecover::init_tracing_once();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run() -> Result<ExitCode, RecoverError> {
    let action = parse(std::env::args().skip(1))?;
    let cfg = match action {
        CliAction::Help => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        CliAction::Run(cfg) => cfg,
    };

    if cfg.print_version_banner {
        eprintln!("gzrecover {VERSION}");
    }

    gzrecover::recover(&cfg)?;
    Ok(ExitCode::SUCCESS)
}
