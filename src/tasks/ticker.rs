use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::controller::{ClickOutcome, Mode, SlideshowController};
use crate::error::Error;
use crate::events::SlideshowCommand;
use crate::render::Renderer;
use crate::timeline::TimelineState;

const COMMAND_BUFFER: usize = 16;

/// Owns a controller and drives it from a repeating timer.
///
/// Rules:
/// - The timer fires every `speed`; late ticks are delayed, never bursted.
/// - Commands and ticks are applied one at a time, in arrival order.
/// - After every applied command or advancing tick the new state is
///   published on `state_tx`; commands publish before they reply.
/// - The loop ends on cancellation or once every command sender is gone.
#[instrument(skip_all, fields(container = %container))]
pub async fn run<R: Renderer>(
    container: String,
    mut controller: SlideshowController<R>,
    mut commands: Receiver<SlideshowCommand>,
    state_tx: watch::Sender<TimelineState>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut ticker = interval(controller.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; a repeating timer fires only
    // after one full period.
    ticker.tick().await;

    loop {
        select! {
            _ = cancel.cancelled() => {
                info!("cancel received; stopping slideshow");
                break;
            }

            maybe_cmd = commands.recv() => match maybe_cmd {
                Some(cmd) => {
                    debug!(command = cmd.name(), "command");
                    apply(&mut controller, cmd, &state_tx);
                }
                None => {
                    debug!("all handles dropped; stopping slideshow");
                    break;
                }
            },

            _ = ticker.tick() => {
                if controller.on_tick() {
                    state_tx.send_replace(controller.snapshot());
                }
            }
        }
    }

    Ok(())
}

/// Apply one command, publish the resulting state, then reply. Callers that
/// read the snapshot after their reply always see their own change.
fn apply<R: Renderer>(
    controller: &mut SlideshowController<R>,
    cmd: SlideshowCommand,
    state_tx: &watch::Sender<TimelineState>,
) {
    // A dropped reply receiver only means the caller stopped waiting.
    match cmd {
        SlideshowCommand::Pause(reply) => {
            let state = controller.pause().snapshot();
            state_tx.send_replace(state);
            let _ = reply.send(state);
        }
        SlideshowCommand::Resume(reply) => {
            let state = controller.resume().snapshot();
            state_tx.send_replace(state);
            let _ = reply.send(state);
        }
        SlideshowCommand::Toggle(reply) => {
            let mode = controller.toggle();
            info!(?mode, "controls toggled");
            state_tx.send_replace(controller.snapshot());
            let _ = reply.send(mode);
        }
        SlideshowCommand::View(index, reply) => {
            if index >= controller.items().len() {
                warn!(
                    index,
                    count = controller.items().len(),
                    "view past the last item; time wraps on the next tick"
                );
            }
            let state = controller.view(index).snapshot();
            state_tx.send_replace(state);
            let _ = reply.send(state);
        }
        SlideshowCommand::ClickItem(index, reply) => {
            let outcome = controller.click_item(index);
            state_tx.send_replace(controller.snapshot());
            let _ = reply.send(outcome);
        }
    }
}

/// Start `controller` on the current tokio runtime.
pub fn spawn<R>(container: impl Into<String>, controller: SlideshowController<R>) -> SlideshowHandle
where
    R: Renderer + Send + 'static,
{
    let container = container.into();
    let (cmd_tx, cmd_rx) = mpsc::channel::<SlideshowCommand>(COMMAND_BUFFER);
    let (state_tx, state_rx) = watch::channel(controller.snapshot());
    let cancel = CancellationToken::new();

    let task = tokio::spawn(run(
        container.clone(),
        controller,
        cmd_rx,
        state_tx,
        cancel.clone(),
    ));

    SlideshowHandle {
        container,
        commands: cmd_tx,
        state: state_rx,
        cancel,
        task: Some(task),
    }
}

/// Control surface of a running slideshow.
#[derive(Debug)]
pub struct SlideshowHandle {
    container: String,
    commands: Sender<SlideshowCommand>,
    state: watch::Receiver<TimelineState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<Result<()>>>,
}

impl SlideshowHandle {
    pub fn container(&self) -> &str {
        &self.container
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SlideshowCommand,
    ) -> Result<T, Error> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| Error::Disposed)?;
        rx.await.map_err(|_| Error::Disposed)
    }

    pub async fn pause(&self) -> Result<&Self, Error> {
        self.request(SlideshowCommand::Pause).await?;
        Ok(self)
    }

    pub async fn resume(&self) -> Result<&Self, Error> {
        self.request(SlideshowCommand::Resume).await?;
        Ok(self)
    }

    /// Activate the controls: pause when running, resume when paused.
    pub async fn toggle(&self) -> Result<Mode, Error> {
        self.request(SlideshowCommand::Toggle).await
    }

    pub async fn view(&self, index: usize) -> Result<&Self, Error> {
        self.request(|reply| SlideshowCommand::View(index, reply))
            .await?;
        Ok(self)
    }

    pub async fn click_item(&self, index: usize) -> Result<ClickOutcome, Error> {
        self.request(|reply| SlideshowCommand::ClickItem(index, reply))
            .await?
    }

    /// Latest published state.
    pub fn snapshot(&self) -> TimelineState {
        *self.state.borrow()
    }

    /// Wait until the published state satisfies `pred`.
    pub async fn wait_for(
        &mut self,
        pred: impl FnMut(&TimelineState) -> bool,
    ) -> Result<TimelineState, Error> {
        let state = self.state.wait_for(pred).await.map_err(|_| Error::Disposed)?;
        Ok(*state)
    }

    /// A sender usable from blocking code (stdin readers and the like).
    pub fn command_sender(&self) -> Sender<SlideshowCommand> {
        self.commands.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.task.is_none()
    }

    /// Stop the timer and wait for the task to finish. Safe to call twice.
    pub async fn dispose(&mut self) -> anyhow::Result<()> {
        self.cancel.cancel();
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        match task.await {
            Ok(res) => res,
            Err(err) if err.is_cancelled() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for SlideshowHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
