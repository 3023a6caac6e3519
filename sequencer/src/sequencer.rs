//! Single-writer task that owns a session
//!
//! Every instruction is applied by one task in arrival order, so no two
//! operations on the instrument ever interleave. Callers talk to it through
//! a cloneable handle backed by a bounded channel.

use optvault_common::{AssetId, Identity, Number, VaultResult};
use optvault_options::{Instruction, Outcome};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::report::Snapshot;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("sequencer task has stopped")]
    Closed,
}

enum Command {
    Execute {
        caller: Identity,
        instruction: Instruction,
        reply: oneshot::Sender<VaultResult<Outcome>>,
    },
    AdvanceTime {
        seconds: u64,
        reply: oneshot::Sender<u64>,
    },
    SetPrice {
        asset: AssetId,
        price: Number,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
}

#[derive(Clone)]
pub struct SequencerHandle {
    tx: mpsc::Sender<Command>,
}

impl SequencerHandle {
    pub async fn execute(&self, caller: Identity, instruction: Instruction) -> Result<VaultResult<Outcome>, SequencerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Execute { caller, instruction, reply }).await?;
        rx.await.map_err(|_| SequencerError::Closed)
    }

    /// Move the clock forward, returning the new time
    pub async fn advance_time(&self, seconds: u64) -> Result<u64, SequencerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::AdvanceTime { seconds, reply }).await?;
        rx.await.map_err(|_| SequencerError::Closed)
    }

    pub async fn set_price(&self, asset: AssetId, price: Number) -> Result<(), SequencerError> {
        self.send(Command::SetPrice { asset, price }).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, SequencerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| SequencerError::Closed)
    }

    async fn send(&self, command: Command) -> Result<(), SequencerError> {
        self.tx.send(command).await.map_err(|_| SequencerError::Closed)
    }
}

/// Start the sequencer task
///
/// The task runs until every handle is dropped and then hands the session
/// back through the join handle.
pub fn spawn(session: Session, queue_depth: usize) -> (SequencerHandle, JoinHandle<Session>) {
    let (tx, rx) = mpsc::channel(queue_depth.max(1));
    let task = tokio::spawn(run(session, rx));
    (SequencerHandle { tx }, task)
}

async fn run(mut session: Session, mut rx: mpsc::Receiver<Command>) -> Session {
    log::info!("Sequencer started for {}", session.instrument.terms().name);

    while let Some(command) = rx.recv().await {
        match command {
            Command::Execute { caller, instruction, reply } => {
                let result = session.execute(caller, instruction);
                // Receiver may have given up waiting; the instruction stands
                let _ = reply.send(result);
            }
            Command::AdvanceTime { seconds, reply } => {
                let now = session.advance_time(seconds);
                log::debug!("Clock advanced to {}", now);
                let _ = reply.send(now);
            }
            Command::SetPrice { asset, price } => {
                log::debug!("Price for {} set to {}", asset, price);
                session.set_price(asset, price);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(session.snapshot());
            }
        }
    }

    log::info!("Sequencer stopped");
    session
}
