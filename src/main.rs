use anyhow::{bail, Context, Result};
use recpanel::{
    logging::{self, LogTarget},
    service, ui, HttpControlApi, Panel, PanelConfig, PanelError, RecordAction,
};
use std::{process::ExitCode, sync::Arc};

const USAGE: &str = "Usage: recpanel [--config <path>] [--url <base>] [command]\n\
    --config <path>   Path to TOML configuration (default: config/recpanel.toml)\n\
    --url <base>      Recorder base URL, overrides the configuration\n\
\n\
Commands:\n\
    ui                Interactive control panel (default)\n\
    start             Start recording\n\
    stop              Stop recording\n\
    delete <days>     Delete recordings older than <days> days\n\
    stats             Print disk statistics and uptimes\n\
    watch             Poll statistics and log them until Ctrl-C";

#[derive(Debug, PartialEq)]
enum Command {
    Ui,
    Record(RecordAction),
    Delete(String),
    Stats,
    Watch,
}

#[derive(Debug)]
struct Cli {
    config_path: Option<String>,
    url: Option<String>,
    command: Command,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let mut config_path: Option<String> = None;
        let mut url: Option<String> = None;
        let mut command: Option<Command> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                    config_path = Some(value);
                }
                "--url" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--url requires a base URL"))?;
                    url = Some(value);
                }
                "--help" | "-h" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                other if command.is_none() => {
                    command = Some(match other {
                        "ui" => Command::Ui,
                        "start" => Command::Record(RecordAction::Start),
                        "stop" => Command::Record(RecordAction::Stop),
                        // Validation happens in the panel so a missing value gets the usual message.
                        "delete" => Command::Delete(args.next().unwrap_or_default()),
                        "stats" => Command::Stats,
                        "watch" => Command::Watch,
                        unknown => bail!("unknown command '{unknown}'\n{USAGE}"),
                    });
                }
                other => bail!("unknown argument '{other}'"),
            }
        }

        Ok(Self {
            config_path,
            url,
            command: command.unwrap_or(Command::Ui),
        })
    }
}

/// Non-zero when a one-shot command ended in an error state; the status line
/// has already been printed.
fn exit_code(result: Result<(), PanelError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse()?;

    let mut config = match &cli.config_path {
        Some(path) => PanelConfig::load(path)
            .with_context(|| format!("unable to load configuration from {path}"))?,
        None => PanelConfig::load_or_default()?,
    };
    if let Some(url) = cli.url {
        config.base_url = url;
    }

    let target = if cli.command == Command::Ui {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    let _log_guard = logging::init(&config, target)?;

    let api = HttpControlApi::new(&config.base_url, config.request_timeout())?;
    let panel = Arc::new(Panel::new(Arc::new(api)));

    match cli.command {
        Command::Ui => ui::run(panel, config).await.map(|_| ExitCode::SUCCESS),
        Command::Watch => service::run_watch(panel, config)
            .await
            .map(|_| ExitCode::SUCCESS),
        Command::Record(action) => {
            let result = panel.send_action(action).await;
            println!("{}", panel.snapshot().recording_status);
            Ok(exit_code(result))
        }
        Command::Delete(days) => {
            let result = panel.send_delete_command(&days).await;
            println!("{}", panel.snapshot().cleanup_status);
            Ok(exit_code(result))
        }
        Command::Stats => {
            let result = panel.fetch_disk_statistics().await;
            panel.update_uptimes_display(service::now_millis());
            let view = panel.snapshot();
            for line in view.disk_stats.lines() {
                println!("{line}");
            }
            println!("Server Uptime: {}", view.server_uptime);
            println!("Recording Uptime: {}", view.recording_uptime);
            println!("{}", view.recording_indicator);
            Ok(exit_code(result.map(|_| ())))
        }
    }
}
