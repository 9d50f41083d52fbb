use clap::Parser as ClapParser;
use replay_e::backend::WebDriverBackend;
use replay_engine::backend::Backend;
use replay_engine::cli::{self, EventFormat, OutputHandlers, PanelOptions, SessionOptions};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Replay recorded browser scripts over WebDriver", long_about = None)]
struct Args {
    /// URL of the WebDriver server (e.g. http://localhost:4444)
    #[arg(short = 'u', long)]
    webdriver_url: String,

    /// Recorded script (JSON) to replay. Without it an interactive panel opens.
    #[arg(short, long)]
    script: Option<String>,

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

    let mut backend = WebDriverBackend::with_url(args.webdriver_url.clone());
    match backend.launch().await {
        Ok(_) => info!("Session ready at {}.", args.webdriver_url),
        Err(e) => {
            error!("Failed to launch: {}", e);
            std::process::exit(1);
        }
    }

    let output = OutputHandlers {
        out: |msg| println!("{}", msg),
        err: |msg| error!("{}", msg),
    };
    let options = SessionOptions {
        script: args.script.as_deref(),
        config_path: args.config.as_deref(),
        start_url: args.start_url.as_deref(),
        events: args.events,
        panel: PanelOptions {
            banner_lines: &[
                "Session ready. Commands: play <script.json>, pause, resume, stop. Type 'exit' to quit or Ctrl+C to shutdown.",
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
