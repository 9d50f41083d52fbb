use anyhow::anyhow;
use clap::{Parser, Subcommand};
use replay_e::backend::WebDriverBackend;
use replay_engine::backend::Backend;
use replay_engine::cli::{self, EventFormat, OutputHandlers, PanelOptions, SessionOptions};
use replay_h::backend::HeadlessBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "replay", version, about = "Replay recorded browser form-filling scripts")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Recorded script (JSON) to replay. Without it an interactive panel opens.
    #[arg(long, global = true)]
    script: Option<String>,

    /// Config file (defaults to ./replay.yaml, then ~/.replay/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page to open before replaying
    #[arg(long, global = true)]
    start_url: Option<String>,

    /// Run event output: text or json
    #[arg(long, global = true, default_value = "text")]
    events: EventFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Use headless browser (Chromium) via CDP
    Headless {
        /// Launch browser in visible mode (not headless)
        #[arg(long)]
        visible: bool,
    },
    /// Use any W3C WebDriver server
    Webdriver {
        /// WebDriver server URL (e.g. http://localhost:4444)
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries run events and reports.
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut backend: Box<dyn Backend> = match args.mode {
        Mode::Headless { visible } => Box::new(HeadlessBackend::new_with_visibility(visible)),
        Mode::Webdriver { url } => Box::new(WebDriverBackend::with_url(url)),
    };

    if let Err(e) = backend.launch().await {
        eprintln!("Failed to launch backend: {}", e);
        return Err(e.into());
    }

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
                "Backend launched. Commands: play <script.json>, pause, resume, stop.",
                "Type 'exit' or 'quit' to close.",
            ],
            prompt: "replay> ",
            exit_commands: &["exit", "quit"],
            handle_ctrl_c: true,
            ctrl_c_message: Some("\nStopping."),
            default_script: None,
        },
    };

    let result = cli::run_session(&mut *backend, output, options).await;
    backend.close().await?;
    result.map_err(|e| anyhow!("{}", e))
}
