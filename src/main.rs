use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use felt::{Controller, DeviceCapture, HttpDetector, LogLevel, TerminalDisplay};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "felt", about = "Live emotion readings from a detection service")]
struct Cli {
    /// Base URL of the detection service
    #[arg(long, env = "FELT_URL", default_value = "http://localhost:5000")]
    url: String,

    /// Path of the detection endpoint
    #[arg(long, default_value = "/detect")]
    path: String,

    /// Milliseconds between two readings
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Give up on a detection request after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Video device requested at startup
    #[arg(long, default_value = "/dev/video0")]
    device: PathBuf,

    /// Width of a full bar in terminal cells
    #[arg(long, default_value_t = 40)]
    bar_width: usize,

    /// Start detecting without waiting for a command
    #[arg(long)]
    autostart: bool,

    /// Logging verbosity level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    felt::logging::init(cli.log_level);

    let timeout = cli.timeout_ms.map(Duration::from_millis);
    let detector = HttpDetector::new(&cli.url, &cli.path, timeout)?;
    tracing::info!(url = %detector.url(), "using detection service");
    let display = TerminalDisplay::new(std::io::stdout(), cli.bar_width);
    let mut controller =
        Controller::new(detector, display).with_period(Duration::from_millis(cli.interval_ms));

    controller.init(&DeviceCapture::new(cli.device)).await;
    if cli.autostart {
        controller.start().await;
    }
    felt::drive(&mut controller, BufReader::new(tokio::io::stdin())).await
}
