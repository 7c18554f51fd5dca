//! # Shell Driver
//!
//! Runs a [`DualPaneShell`] on tokio. The loop waits on two things: the
//! next host command and the shell's earliest timer deadline. Commands are
//! applied in arrival order, timers fire at their deadline, and nothing
//! else touches the shell, so every state change is one synchronous step.

use crate::errors::EditorError;
use crate::shell::{DualPaneShell, LayoutMode, ShellStatus};
use crate::surface::{PaneSide, PreviewSurface, ScrollEvent, ScrollPane};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use vitae_document::{Mutation, MutationResult, SectionId};

/// Work sent to a running driver
#[derive(Debug)]
pub enum ShellCommand {
    /// A pane raised a scroll event
    Scroll(ScrollEvent),

    /// Move a pane as the user would
    ScrollTo { pane: PaneSide, top: f64 },

    /// The form's expanded section changed
    Activate(SectionId),

    Apply {
        mutation: Mutation,
        reply: oneshot::Sender<Result<MutationResult, EditorError>>,
    },

    SetLayout(LayoutMode),
    SetSyncEnabled(bool),
    SetFocusMode(bool),
    Resize(f64),
    Reset,
    MarkSaved,
    Status(oneshot::Sender<ShellStatus>),
    Shutdown,
}

/// Cloneable sender side of a driver
#[derive(Debug, Clone)]
pub struct ShellHandle {
    commands: mpsc::UnboundedSender<ShellCommand>,
}

impl ShellHandle {
    pub fn send(&self, command: ShellCommand) -> Result<(), EditorError> {
        self.commands.send(command).map_err(|_| EditorError::DriverClosed)
    }

    pub fn scroll(&self, event: ScrollEvent) -> Result<(), EditorError> {
        self.send(ShellCommand::Scroll(event))
    }

    pub fn scroll_to(&self, pane: PaneSide, top: f64) -> Result<(), EditorError> {
        self.send(ShellCommand::ScrollTo { pane, top })
    }

    pub fn activate(&self, section: SectionId) -> Result<(), EditorError> {
        self.send(ShellCommand::Activate(section))
    }

    pub async fn apply(&self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(ShellCommand::Apply { mutation, reply })?;
        response.await.map_err(|_| EditorError::DriverClosed)?
    }

    pub fn set_layout(&self, layout: LayoutMode) -> Result<(), EditorError> {
        self.send(ShellCommand::SetLayout(layout))
    }

    pub fn set_sync_enabled(&self, enabled: bool) -> Result<(), EditorError> {
        self.send(ShellCommand::SetSyncEnabled(enabled))
    }

    pub fn set_focus_mode(&self, enabled: bool) -> Result<(), EditorError> {
        self.send(ShellCommand::SetFocusMode(enabled))
    }

    pub fn resize(&self, fraction: f64) -> Result<(), EditorError> {
        self.send(ShellCommand::Resize(fraction))
    }

    pub fn reset(&self) -> Result<(), EditorError> {
        self.send(ShellCommand::Reset)
    }

    pub fn mark_saved(&self) -> Result<(), EditorError> {
        self.send(ShellCommand::MarkSaved)
    }

    pub async fn status(&self) -> Result<ShellStatus, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(ShellCommand::Status(reply))?;
        response.await.map_err(|_| EditorError::DriverClosed)
    }

    pub fn shutdown(&self) -> Result<(), EditorError> {
        self.send(ShellCommand::Shutdown)
    }
}

pub struct ShellDriver<E: ScrollPane, P: PreviewSurface> {
    shell: DualPaneShell<E, P>,
    commands: mpsc::UnboundedReceiver<ShellCommand>,
}

impl<E: ScrollPane, P: PreviewSurface> ShellDriver<E, P> {
    pub fn new(shell: DualPaneShell<E, P>) -> (Self, ShellHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { shell, commands: rx }, ShellHandle { commands: tx })
    }

    /// Run until shut down or every handle is dropped; returns the shell
    /// torn down, with no timers left
    pub async fn run(mut self) -> DualPaneShell<E, P> {
        info!("Shell driver started");

        loop {
            let deadline = self.shell.next_deadline();

            let wake = tokio::select! {
                biased;
                command = self.commands.recv() => Wake::Command(command),
                _ = wait_for(deadline) => Wake::Deadline,
            };

            match wake {
                Wake::Command(Some(ShellCommand::Shutdown)) | Wake::Command(None) => break,
                Wake::Command(Some(command)) => self.handle(command),
                Wake::Deadline => {
                    let fired = self.shell.fire_due(Instant::now());
                    debug!(fired, "Timers fired");
                }
            }
        }

        self.shell.teardown();
        info!("Shell driver stopped");
        self.shell
    }

    fn handle(&mut self, command: ShellCommand) {
        let now = Instant::now();

        match command {
            ShellCommand::Scroll(event) => {
                self.shell.on_scroll(event, now);
            }
            ShellCommand::ScrollTo { pane, top } => {
                self.shell.scroll_pane_to(pane, top, now);
            }
            ShellCommand::Activate(section) => {
                self.shell.activate_section(section, now);
            }
            ShellCommand::Apply { mutation, reply } => {
                let result = self.shell.apply(mutation, now);
                if let Err(err) = &result {
                    warn!(error = %err, "Mutation rejected");
                }
                // Caller may have stopped waiting
                let _ = reply.send(result);
            }
            ShellCommand::SetLayout(layout) => self.shell.set_layout(layout),
            ShellCommand::SetSyncEnabled(enabled) => {
                self.shell.set_sync_enabled(enabled);
            }
            ShellCommand::SetFocusMode(enabled) => self.shell.set_focus_mode(enabled),
            ShellCommand::Resize(fraction) => {
                self.shell.set_split_fraction(fraction);
            }
            ShellCommand::Reset => {
                self.shell.reset();
            }
            ShellCommand::MarkSaved => {
                self.shell.mark_saved();
            }
            ShellCommand::Status(reply) => {
                let _ = reply.send(self.shell.status());
            }
            ShellCommand::Shutdown => {}
        }
    }
}

enum Wake {
    Command(Option<ShellCommand>),
    Deadline,
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
