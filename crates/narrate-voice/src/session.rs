//! Event loop that owns a controller.
//!
//! User commands and engine signals are handled strictly one at a time, each
//! running to completion before the next is taken. That ordering is what
//! keeps the controller single-writer without any locking.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::controller::{NarrationController, NarrationSnapshot};
use crate::error::NarrationError;
use crate::surface::{self, Intent};

/// Commands accepted by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// A user intent from the control surface.
    Intent(Intent),

    /// Replace the narrated text. The previous text is torn down first.
    Load(Arc<str>),

    /// Tear down and end the session.
    Close,
}

/// Cloneable handle for sending commands into a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshots: watch::Receiver<NarrationSnapshot>,
}

impl SessionHandle {
    pub fn send(&self, intent: Intent) -> Result<(), NarrationError> {
        self.command(SessionCommand::Intent(intent))
    }

    pub fn load(&self, text: impl Into<Arc<str>>) -> Result<(), NarrationError> {
        self.command(SessionCommand::Load(text.into()))
    }

    pub fn close(&self) -> Result<(), NarrationError> {
        self.command(SessionCommand::Close)
    }

    /// Latest controller snapshot published by the session.
    pub fn snapshot(&self) -> NarrationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified whenever the snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<NarrationSnapshot> {
        self.snapshots.clone()
    }

    fn command(&self, command: SessionCommand) -> Result<(), NarrationError> {
        self.commands
            .send(command)
            .map_err(|_| NarrationError::SessionClosed)
    }
}

/// Event loop around a [`NarrationController`].
pub struct NarrationSession {
    controller: NarrationController,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    snapshots: watch::Sender<NarrationSnapshot>,
}

impl NarrationSession {
    /// Wrap `controller`. Returns the session and a handle to drive it.
    pub fn new(controller: NarrationController) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let session = Self {
            controller,
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };

        (session, handle)
    }

    /// Run until [`SessionCommand::Close`] arrives or every handle is dropped.
    ///
    /// The controller is torn down before it is handed back, so no narration
    /// outlives the session.
    pub async fn run(mut self) -> NarrationController {
        tracing::debug!("Narration session started");

        loop {
            tokio::select! {
                // User commands first: a stop must win over a queued end signal.
                biased;

                command = self.commands.recv() => match command {
                    Some(SessionCommand::Intent(intent)) => {
                        surface::dispatch(&mut self.controller, intent);
                    }
                    Some(SessionCommand::Load(text)) => self.controller.initialize(text),
                    Some(SessionCommand::Close) | None => break,
                },

                Some(signal) = self.controller.next_signal() => {
                    self.controller.handle_signal(signal);
                }
            }

            self.publish();
        }

        if self.controller.is_loaded() {
            self.controller.teardown();
        }
        self.publish();

        tracing::debug!("Narration session closed");
        self.controller
    }

    fn publish(&self) {
        let snapshot = self.controller.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}
