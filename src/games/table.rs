//! Roulette table: a single task that owns a [`GameSession`] and serialises
//! every operation through one command queue.
//!
//! An accepted spin arms a resolution deadline inside the same loop, so a
//! round can never resolve concurrently with a bet mutation. Once a spin is
//! accepted it resolves, even if every handle is dropped in the meantime.

use crate::errors::{RoyaleResult, TableError};
use crate::games::session::{GameSession, PendingSpin};
use crate::games::types::{Bet, BetCategory, BetTarget, SessionState};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Commands accepted by the table task
#[derive(Debug)]
pub enum TableCommand {
    PlaceBet {
        bet: Bet,
        reply: oneshot::Sender<SessionState>,
    },
    ClearBets {
        reply: oneshot::Sender<SessionState>,
    },
    Spin {
        reply: oneshot::Sender<Option<PendingSpin>>,
    },
    State {
        reply: oneshot::Sender<SessionState>,
    },
    /// Stop after any round in flight has resolved
    Shutdown,
}

pub struct RouletteTable {
    session: GameSession,
    commands: mpsc::UnboundedReceiver<TableCommand>,
    publisher: watch::Sender<SessionState>,
    resolve_delay: Duration,
    pending: Option<(Instant, u64)>,
    closing: bool,
}

impl RouletteTable {
    /// Start the table task and return a handle to it
    pub fn spawn(session: GameSession, resolve_delay: Duration) -> (TableHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (publisher, state_rx) = watch::channel(session.state());

        let table = Self {
            session,
            commands: command_rx,
            publisher,
            resolve_delay,
            pending: None,
            closing: false,
        };

        let task = tokio::spawn(table.run());
        let handle = TableHandle {
            commands: command_tx,
            state: state_rx,
        };

        (handle, task)
    }

    async fn run(mut self) {
        info!(delay_ms = self.resolve_delay.as_millis() as u64, "table open");

        loop {
            if self.closing && self.pending.is_none() {
                break;
            }

            let deadline = self.pending.map(|(at, _)| at);

            tokio::select! {
                command = self.commands.recv(), if !self.closing => match command {
                    Some(command) => self.handle(command),
                    None => self.closing = true,
                },
                _ = wait_for_deadline(deadline) => self.resolve_pending(),
            }
        }

        info!(balance = self.session.balance(), "table closed");
    }

    fn handle(&mut self, command: TableCommand) {
        match command {
            TableCommand::PlaceBet { bet, reply } => {
                let state = self.session.place_bet(bet.category, bet.target, bet.amount);
                self.publish();
                let _ = reply.send(state);
            }
            TableCommand::ClearBets { reply } => {
                let state = self.session.clear_bets();
                self.publish();
                let _ = reply.send(state);
            }
            TableCommand::Spin { reply } => {
                let ticket = self.session.spin();
                if let Some(ticket) = ticket {
                    self.pending = Some((Instant::now() + self.resolve_delay, ticket.round_id));
                    debug!(round_id = ticket.round_id, "resolution scheduled");
                }
                self.publish();
                let _ = reply.send(ticket);
            }
            TableCommand::State { reply } => {
                let _ = reply.send(self.session.state());
            }
            TableCommand::Shutdown => {
                self.closing = true;
            }
        }
    }

    fn resolve_pending(&mut self) {
        if let Some((_, round_id)) = self.pending.take() {
            self.session.complete_spin(round_id);
            self.publish();
        }
    }

    fn publish(&self) {
        // No subscribers is fine; the table keeps running for command callers.
        self.publisher.send_replace(self.session.state());
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Cloneable handle used by the presentation layer
#[derive(Clone)]
pub struct TableHandle {
    commands: mpsc::UnboundedSender<TableCommand>,
    state: watch::Receiver<SessionState>,
}

impl TableHandle {
    pub async fn place_bet(&self, category: BetCategory, target: BetTarget, amount: u64) -> RoyaleResult<SessionState> {
        let bet = Bet::new(category, target, amount);
        self.request(|reply| TableCommand::PlaceBet { bet, reply }).await
    }

    pub async fn clear_bets(&self) -> RoyaleResult<SessionState> {
        self.request(|reply| TableCommand::ClearBets { reply }).await
    }

    /// Request a spin. `None` means the table refused it; the reason is in
    /// the status message.
    pub async fn spin(&self) -> RoyaleResult<Option<PendingSpin>> {
        self.request(|reply| TableCommand::Spin { reply }).await
    }

    pub async fn state(&self) -> RoyaleResult<SessionState> {
        self.request(|reply| TableCommand::State { reply }).await
    }

    /// Receiver updated after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Wait until no round is in flight
    pub async fn wait_until_idle(&self) -> RoyaleResult<SessionState> {
        let mut receiver = self.state.clone();
        let state = receiver
            .wait_for(|state| !state.is_spinning)
            .await
            .map_err(|_| TableError::Closed)?;
        Ok(state.clone())
    }

    pub fn shutdown(&self) -> RoyaleResult<()> {
        self.commands
            .send(TableCommand::Shutdown)
            .map_err(|_| TableError::Closed.into())
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> TableCommand) -> RoyaleResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands.send(build(reply)).map_err(|_| TableError::Closed)?;
        response.await.map_err(|_| TableError::NoReply.into())
    }
}
