use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use time_slider::config::Configuration;
use time_slider::controller::SlideshowController;
use time_slider::events::SlideshowCommand;
use time_slider::items;
use time_slider::layout::HostMetrics;
use time_slider::registry::Registry;
use time_slider::render::TracingRenderer;

#[derive(Debug, Parser)]
#[command(
    name = "time-slider",
    version,
    about = "image slideshow with a timeline bar"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Name of the container the slideshow is attached to (shown in logs)
    #[arg(long, default_value = "main")]
    container: String,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// One line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Toggle,
    View(usize),
    Click(usize),
}

fn parse_control(line: &str) -> Option<Control> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let control = match first {
        "p" | "pause" => Control::Pause,
        "r" | "resume" => Control::Resume,
        "t" | "toggle" => Control::Toggle,
        "c" | "click" => Control::Click(words.next()?.parse().ok()?),
        "v" | "view" => Control::View(words.next()?.parse().ok()?),
        n => Control::View(n.parse().ok()?),
    };
    if words.next().is_some() {
        return None;
    }
    Some(control)
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "time_slider=debug,info",
        _ => "time_slider=trace,info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        container,
        verbose,
    } = Args::parse();
    init_tracing(verbose);

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    let items = items::from_configuration(&cfg).context("failed to collect items")?;
    let settings = cfg.settings();
    tracing::info!(
        items = items.len(),
        delay = %humantime::format_duration(settings.delay),
        speed = %humantime::format_duration(settings.speed),
        "starting slideshow"
    );

    let metrics = HostMetrics::resolve(&cfg.layout, &items);
    let mut registry = Registry::new();
    let handle = registry.attach(container.as_str(), || {
        SlideshowController::new(
            items,
            settings,
            &metrics,
            &cfg.border,
            TracingRenderer::new(container.clone()),
        )
    })?;

    let cancel = CancellationToken::new();

    // stdin drives the controls; EOF shuts down. A plain thread, so a
    // pending read never holds up runtime shutdown.
    {
        let cancel = cancel.clone();
        let commands = handle.command_sender();
        std::thread::spawn(move || watch_controls(io::stdin().lock(), commands, cancel));
    }

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    cancel.cancelled().await;
    registry
        .dispose_all()
        .await
        .context("slideshow task failed")?;
    Ok(())
}

/// Feed `input` to the slideshow until it ends, then request shutdown.
fn watch_controls(
    input: impl BufRead,
    commands: Sender<SlideshowCommand>,
    cancel: CancellationToken,
) {
    read_controls(input, &commands);
    tracing::info!("stdin closed; initiating shutdown");
    cancel.cancel();
}

fn read_controls(input: impl BufRead, commands: &Sender<SlideshowCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("stdin read failed: {err}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(control) = parse_control(&line) else {
            tracing::warn!(input = line.trim(), "unrecognized control (p, r, t, <n>, c <n>)");
            continue;
        };
        if let Err(err) = dispatch(commands, control) {
            tracing::warn!("{err:#}");
            return;
        }
    }
}

fn dispatch(commands: &Sender<SlideshowCommand>, control: Control) -> Result<()> {
    fn send<T>(
        commands: &Sender<SlideshowCommand>,
        make: impl FnOnce(oneshot::Sender<T>) -> SlideshowCommand,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        commands
            .blocking_send(make(tx))
            .map_err(|_| anyhow::anyhow!("slideshow is no longer running"))?;
        rx.blocking_recv()
            .context("slideshow stopped before replying")
    }

    match control {
        Control::Pause => {
            send(commands, SlideshowCommand::Pause)?;
        }
        Control::Resume => {
            send(commands, SlideshowCommand::Resume)?;
        }
        Control::Toggle => {
            let mode = send(commands, SlideshowCommand::Toggle)?;
            tracing::info!(?mode, "controls");
        }
        Control::View(index) => {
            let state = send(commands, |reply| SlideshowCommand::View(index, reply))?;
            tracing::debug!(current_time = state.current_time, "view applied");
        }
        Control::Click(index) => {
            match send(commands, |reply| SlideshowCommand::ClickItem(index, reply))? {
                Ok(outcome) => tracing::debug!(?outcome, "item clicked"),
                Err(err) => tracing::warn!("click ignored: {err}"),
            }
        }
    }
    Ok(())
}
