mod cli;
#[cfg(target_os = "linux")]
mod daemon;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.syslog) {
        eprintln!("audiomon: {}", e);
        return ExitCode::FAILURE;
    }
    run()
}

#[cfg(target_os = "linux")]
fn run() -> ExitCode {
    match daemon::run(audiomon_core::DaemonConfig::default()) {
        Ok(()) => {
            log::info!("audiomon stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn run() -> ExitCode {
    log::error!("audiomon only supports Linux");
    ExitCode::FAILURE
}
