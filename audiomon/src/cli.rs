use clap::Parser;

/// Keeps the default audio sink pointed at the most recently connected
/// Bluetooth A2DP peer or USB DAC.
#[derive(Debug, Parser)]
#[command(name = "audiomon", version, about)]
pub struct Cli {
    /// Log to the system log instead of the console
    #[arg(short = 's', long)]
    pub syslog: bool,
}
