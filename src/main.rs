use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use logtail::{InteractiveViewer, StartMode, ingest, logging};

#[derive(Parser)]
#[command(
    name = "logtail",
    version,
    about = "Interactive viewer for growing log files",
    long_about = None
)]
struct Cli {
    /// Path to the log file to follow
    file: PathBuf,

    /// Replay the whole file before following new lines
    #[arg(long, conflicts_with = "lines")]
    from_beginning: bool,

    /// Number of trailing lines to replay before following
    #[arg(short = 'n', long, default_value_t = 100)]
    lines: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();

    let mode = if cli.from_beginning {
        StartMode::FromBeginning
    } else {
        StartMode::LastLines(cli.lines)
    };
    let tail_rx = ingest::spawn(cli.file, mode);

    InteractiveViewer::new(tail_rx).run()
}
