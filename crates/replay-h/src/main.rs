use clap::Parser as ClapParser;
use replay_engine::backend::Backend;
use replay_engine::cli::{self, EventFormat, OutputHandlers, PanelOptions, SessionOptions};
use replay_h::backend::HeadlessBackend;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Replay recorded browser scripts in Chromium", long_about = None)]
struct Args {
    /// Recorded script (JSON) to replay. Without it an interactive panel opens.
    #[arg(short, long)]
    script: Option<String>,

    /// Launch browser in visible mode (not headless)
    #[arg(long)]
    visible: bool,

    /// Config file (defaults to ./replay.yaml, then ~/.replay/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page to open before replaying
    #[arg(long)]
    start_url: Option<String>,

    /// Run event output: text or json
    #[arg(long, default_value = "text")]
    events: EventFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut backend = HeadlessBackend::new_with_visibility(args.visible);
    if let Err(e) = backend.launch().await {
        error!("Failed to launch: {}", e);
        return Err(e.into());
    }
    info!("Chromium ready.");

    let output = OutputHandlers {
        out: |msg| println!("{}", msg),
        err: |msg| eprintln!("{}", msg),
    };
    let options = SessionOptions {
        script: args.script.as_deref(),
        config_path: args.config.as_deref(),
        start_url: args.start_url.as_deref(),
        events: args.events,
        panel: PanelOptions {
            banner_lines: &[
                "Chromium ready. Commands: play <script.json>, pause, resume, stop.",
                "Type 'exit' or 'quit' to close.",
            ],
            prompt: "replay> ",
            exit_commands: &["exit", "quit"],
            handle_ctrl_c: true,
            ctrl_c_message: Some("\nShutdown signal received."),
            default_script: None,
        },
    };

    let result = cli::run_session(&mut backend, output, options).await;
    backend.close().await?;
    result
}
