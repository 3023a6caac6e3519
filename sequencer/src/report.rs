//! Serializable views of a session

use optvault_common::{VaultError, VaultResult};
use optvault_options::{Clock, Outcome, Parameters, Vault};
use serde::Serialize;

use crate::health::VaultHealth;
use crate::session::Session;

/// Ledger state at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub now: u64,
    pub expired: bool,
    pub exercise_window: bool,
    pub parameters: Parameters,
    pub parameters_version: u64,
    pub vaults: Vec<Vault>,
    #[serde(with = "fixed_math::serde_amount")]
    pub claim_supply: u128,
    #[serde(with = "fixed_math::serde_amount")]
    pub fees_collected: u128,
    /// Underlying owed back to holders after failed exercises
    #[serde(with = "fixed_math::serde_amount")]
    pub refunds_outstanding: u128,
    /// Collateral held by the instrument
    #[serde(with = "fixed_math::serde_amount")]
    pub collateral_custody: u128,
    /// Underlying held by the instrument
    #[serde(with = "fixed_math::serde_amount")]
    pub underlying_custody: u128,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        let instrument = &session.instrument;
        let now = session.clock.now();
        let assets = instrument.assets();
        Self {
            now,
            expired: instrument.is_expired(now),
            exercise_window: instrument.is_exercise_window(now),
            parameters: instrument.parameters(),
            parameters_version: instrument.parameters_version(),
            vaults: instrument.vaults().iter().copied().collect(),
            claim_supply: instrument.claims().total_supply(),
            fees_collected: instrument.fees_collected(),
            refunds_outstanding: instrument.refunds_outstanding(),
            collateral_custody: session.bank.custody(assets.collateral().id),
            underlying_custody: session.bank.custody(assets.underlying().id),
        }
    }
}

/// One executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub caller: String,
    pub op: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

impl StepRecord {
    pub fn from_result(index: usize, caller: &str, op: &str, result: &VaultResult<Outcome>) -> Self {
        let (outcome, error) = match result {
            Ok(outcome) => (Some(outcome.clone()), None),
            Err(e) => (None, Some(*e)),
        };
        Self {
            index,
            caller: caller.to_string(),
            op: op.to_string(),
            outcome,
            error: error.map(|e: VaultError| e.to_string()),
            code: error.map(|e| e.code()),
        }
    }

    /// Record for a session control that produced no outcome
    pub fn control(index: usize, caller: &str, op: &str) -> Self {
        Self {
            index,
            caller: caller.to_string(),
            op: op.to_string(),
            outcome: None,
            error: None,
            code: None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything a session run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    pub symbol: String,
    pub steps: Vec<StepRecord>,
    pub rejected: usize,
    pub snapshot: Snapshot,
    pub health: Vec<VaultHealth>,
}

impl Report {
    pub fn new(name: String, symbol: String, steps: Vec<StepRecord>, snapshot: Snapshot, health: Vec<VaultHealth>) -> Self {
        let rejected = steps.iter().filter(|s| s.is_rejected()).count();
        Self { name, symbol, steps, rejected, snapshot, health }
    }
}
