use crate::backend::Backend;
use crate::config::ConfigLoader;
use crate::controller::Controller;
use crate::diagnostics::{Diagnostics, RunEvent};
use crate::executor::RunReport;
use crate::formatter::{format_event, format_report};
use crate::script::Script;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

/// How run events are echoed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    Text,
    Json,
}

impl FromStr for EventFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(EventFormat::Text),
            "json" => Ok(EventFormat::Json),
            other => Err(format!("unknown event format '{}' (expected text or json)", other)),
        }
    }
}

pub struct FileOptions {
    pub handle_ctrl_c: bool,
}

pub struct PanelOptions<'a> {
    pub banner_lines: &'a [&'a str],
    pub prompt: &'a str,
    pub exit_commands: &'a [&'a str],
    pub handle_ctrl_c: bool,
    pub ctrl_c_message: Option<&'a str>,
    /// Script used by a bare `play`.
    pub default_script: Option<&'a str>,
}

/// Everything a driver binary needs after its backend is launched.
pub struct SessionOptions<'a> {
    /// Replay this file once; `None` opens the control panel.
    pub script: Option<&'a str>,
    /// Explicit config file; `None` searches the default locations.
    pub config_path: Option<&'a Path>,
    /// Navigate here before anything runs.
    pub start_url: Option<&'a str>,
    pub events: EventFormat,
    pub panel: PanelOptions<'a>,
}

/// Load config, wire run events to `output`, then replay one file or open the panel.
pub async fn run_session<B: Backend + ?Sized>(
    backend: &mut B,
    output: OutputHandlers,
    options: SessionOptions<'_>,
) -> Result<(), Box<dyn Error>> {
    let config = ConfigLoader::load(options.config_path).await?;

    if let Some(url) = options.start_url {
        let navigation = backend.navigate(url).await?;
        info!("Opened {} ({})", navigation.url, navigation.title);
    }

    let (diagnostics, events) = Diagnostics::channel();
    let printer = spawn_event_printer(events, options.events, output);
    let controller = Controller::new(config)
        .with_diagnostics(diagnostics)
        .on_start(|script| {
            info!(
                "Starting {} ({} command(s))",
                script.name.as_deref().unwrap_or("unnamed script"),
                script.len()
            );
        });

    let result = match options.script {
        Some(path) => run_file(
            backend,
            &controller,
            output,
            path,
            FileOptions {
                handle_ctrl_c: options.panel.handle_ctrl_c,
            },
        )
        .await
        .map(drop),
        None => run_panel(backend, &controller, output, options.panel).await,
    };

    // Closing the last sender lets the printer drain and finish.
    drop(controller);
    printer.await.ok();
    result
}

/// Print every run event as it arrives.
pub fn spawn_event_printer(
    mut events: mpsc::UnboundedReceiver<RunEvent>,
    format: EventFormat,
    output: OutputHandlers,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match format {
                EventFormat::Text => (output.out)(&format_event(&event)),
                EventFormat::Json => match serde_json::to_string(&event) {
                    Ok(line) => (output.out)(&line),
                    Err(e) => (output.err)(&format!("Failed to encode event: {}", e)),
                },
            }
        }
    })
}

async fn ctrl_c(enabled: bool) {
    if !enabled {
        return std::future::pending().await;
    }
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Load `path` and run it once. A script that fails to load aborts before any command runs.
pub async fn run_file<B: Backend + ?Sized>(
    backend: &mut B,
    controller: &Controller,
    output: OutputHandlers,
    path: &str,
    options: FileOptions,
) -> Result<RunReport, Box<dyn Error>> {
    let script = Script::load(Path::new(path)).await?;

    let run = controller.start(backend, &script);
    tokio::pin!(run);

    let mut stop_requested = false;
    let report = loop {
        tokio::select! {
            result = &mut run => break result?,
            _ = ctrl_c(options.handle_ctrl_c && !stop_requested) => {
                (output.out)("Stopping after the current command...");
                controller.stop();
                stop_requested = true;
            }
        }
    };

    (output.out)(&format_report(
        &report,
        controller.config().logging.mask_sensitive,
    ));
    Ok(report)
}

#[derive(Debug, PartialEq, Eq)]
enum PanelCommand {
    Play(Option<String>),
    Pause,
    Resume,
    Stop,
    Unknown(String),
}

fn parse_panel_command(line: &str) -> PanelCommand {
    let mut parts = line.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());
    match verb {
        "play" | "start" => PanelCommand::Play(arg.map(str::to_string)),
        "pause" => PanelCommand::Pause,
        "resume" => PanelCommand::Resume,
        "stop" => PanelCommand::Stop,
        _ => PanelCommand::Unknown(line.to_string()),
    }
}

/// Possible outcomes from reading a single panel line.
enum ReadLineResult {
    /// A non-empty input line to process.
    Input(String),
    /// Empty line or no input yet -- skip and re-prompt.
    Skip,
    /// EOF or exit command -- terminate the loop.
    Exit,
    /// I/O error while reading.
    Error(io::Error),
}

fn classify_line(
    result: Result<Option<String>, io::Error>,
    exit_commands: &[&str],
) -> ReadLineResult {
    match result {
        Ok(Some(input)) => {
            let trimmed = input.trim().to_string();
            if trimmed.is_empty() {
                ReadLineResult::Skip
            } else if exit_commands.contains(&trimmed.as_str()) {
                ReadLineResult::Exit
            } else {
                ReadLineResult::Input(trimmed)
            }
        }
        Ok(None) => ReadLineResult::Exit,
        Err(e) => ReadLineResult::Error(e),
    }
}

/// Interactive control panel: `play [file]`, `pause`, `resume`, `stop`.
pub async fn run_panel<B: Backend + ?Sized>(
    backend: &mut B,
    controller: &Controller,
    output: OutputHandlers,
    options: PanelOptions<'_>,
) -> Result<(), Box<dyn Error>> {
    for line in options.banner_lines {
        (output.out)(line);
    }

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    loop {
        print!("{}", options.prompt);
        stdout.flush()?;

        let line = tokio::select! {
            line = reader.next_line() => classify_line(line, options.exit_commands),
            _ = ctrl_c(options.handle_ctrl_c) => {
                if let Some(message) = options.ctrl_c_message {
                    (output.out)(message);
                }
                ReadLineResult::Exit
            }
        };

        let command = match line {
            ReadLineResult::Input(line) => parse_panel_command(&line),
            ReadLineResult::Skip => continue,
            ReadLineResult::Exit => break,
            ReadLineResult::Error(e) => return Err(e.into()),
        };

        match command {
            PanelCommand::Play(path) => {
                let Some(path) = path.or_else(|| options.default_script.map(str::to_string))
                else {
                    (output.err)("Usage: play <script.json>");
                    continue;
                };
                let script = match Script::load(Path::new(&path)).await {
                    Ok(script) => script,
                    Err(e) => {
                        (output.err)(&format!("Error: {}", e));
                        continue;
                    }
                };
                let exit = drive_run(backend, controller, output, &options, &mut reader, &script)
                    .await?;
                if exit {
                    break;
                }
            }
            PanelCommand::Pause | PanelCommand::Resume | PanelCommand::Stop => {
                (output.out)("No run in progress.");
            }
            PanelCommand::Unknown(line) => {
                (output.err)(&format!("Unknown command: {}", line));
            }
        }
    }
    Ok(())
}

/// Run `script` while still accepting panel input. Returns true if the user asked to exit.
async fn drive_run<B: Backend + ?Sized>(
    backend: &mut B,
    controller: &Controller,
    output: OutputHandlers,
    options: &PanelOptions<'_>,
    reader: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
    script: &Script,
) -> Result<bool, Box<dyn Error>> {
    let run = controller.start(backend, script);
    tokio::pin!(run);

    let mut exit_after = false;
    let mut input_open = true;
    loop {
        tokio::select! {
            result = &mut run => {
                match result {
                    Ok(report) => (output.out)(&format_report(
                        &report,
                        controller.config().logging.mask_sensitive,
                    )),
                    Err(e) => (output.err)(&format!("Error: {}", e)),
                }
                return Ok(exit_after);
            }
            line = reader.next_line(), if input_open => {
                match classify_line(line, options.exit_commands) {
                    ReadLineResult::Input(line) => match parse_panel_command(&line) {
                        PanelCommand::Pause => {
                            if controller.pause() {
                                (output.out)("Pausing after the current command.");
                            }
                        }
                        PanelCommand::Resume => {
                            if controller.resume() {
                                (output.out)("Resuming.");
                            }
                        }
                        PanelCommand::Stop => {
                            controller.stop();
                            (output.out)("Stopping after the current command.");
                        }
                        PanelCommand::Play(_) => (output.err)("A run is already in progress."),
                        PanelCommand::Unknown(line) => {
                            (output.err)(&format!("Unknown command: {}", line))
                        }
                    },
                    ReadLineResult::Skip => {}
                    ReadLineResult::Exit => {
                        controller.stop();
                        exit_after = true;
                        input_open = false;
                    }
                    ReadLineResult::Error(e) => return Err(e.into()),
                }
            }
            _ = ctrl_c(options.handle_ctrl_c && !exit_after) => {
                if let Some(message) = options.ctrl_c_message {
                    (output.out)(message);
                }
                controller.stop();
                exit_after = true;
            }
        }
    }
}
