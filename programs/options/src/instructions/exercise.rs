//! Exercise claim tokens against a caller-ordered list of vaults
//!
//! Settlement is computed in full on working copies of the listed vaults
//! before any asset moves. The ledger is written only after the underlying
//! pull and the collateral payout have both succeeded, so a failure at any
//! step leaves vaults, claim balances and fees exactly as they were.
//!
//! The vault list is taken as given: it is never sorted, deduplicated or
//! extended by the engine.

use std::collections::HashMap;

use fixed_math::{add_u128, min_u128, sub_u128, Number};
use optvault_common::{Identity, VaultError, VaultResult};
use serde::{Deserialize, Serialize};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;
use crate::pricing::{underlying_share, Pricing};
use crate::state::{Vault, VaultHandle};

/// What one listed vault contributed to an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub owner: Identity,
    /// Claim tokens settled against this vault
    #[serde(with = "fixed_math::serde_amount")]
    pub share: u128,
    /// Collateral paid to the holder
    #[serde(with = "fixed_math::serde_amount")]
    pub payout: u128,
    /// Collateral retained as transaction fee
    #[serde(with = "fixed_math::serde_amount")]
    pub fee: u128,
    /// Underlying credited to the vault
    #[serde(with = "fixed_math::serde_amount")]
    pub underlying: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseReport {
    #[serde(with = "fixed_math::serde_amount")]
    pub amount: u128,
    #[serde(with = "fixed_math::serde_amount")]
    pub underlying_paid: u128,
    #[serde(with = "fixed_math::serde_amount")]
    pub collateral_paid: u128,
    #[serde(with = "fixed_math::serde_amount")]
    pub fees: u128,
    pub settlements: Vec<Settlement>,
}

/// Fully computed exercise, ready to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExercisePlan {
    pub report: ExerciseReport,
    /// Final state of every touched vault
    pub vaults: Vec<(VaultHandle, Vault)>,
}

/// Compute the settlement of `amount` claim tokens against `vault_list`
///
/// Walks the list in order and settles `min(remaining, issued)` against each
/// vault until nothing remains. Vaults with nothing issued are skipped, an
/// owner without a vault fails the plan, and a vault listed twice settles
/// against what its earlier entries left. Underlying owed is rounded up once
/// for the whole amount and split by share, the last settled vault taking the
/// rounding remainder.
pub fn plan_exercise(
    instrument: &OptionsInstrument,
    pricing: &Pricing,
    transaction_fee: Number,
    ratio: Number,
    amount: u128,
    vault_list: &[Identity],
) -> VaultResult<ExercisePlan> {
    let underlying_owed = pricing.underlying_required(amount)?;

    let mut working: HashMap<VaultHandle, Vault> = HashMap::new();
    let mut touched: Vec<VaultHandle> = Vec::new();
    let mut settled: Vec<(VaultHandle, Settlement)> = Vec::new();
    let mut remaining = amount;

    for owner in vault_list {
        if remaining == 0 {
            break;
        }
        let (handle, stored) = instrument.vaults.checkout(owner)?;
        let vault = working.entry(handle).or_insert_with(|| {
            touched.push(handle);
            stored
        });
        if vault.issued == 0 {
            continue;
        }

        let share = min_u128(remaining, vault.issued);
        let payout = pricing.collateral_to_pay(share, Number::ONE)?;
        let fee = pricing.collateral_to_pay(share, transaction_fee)?;

        let was_safe = pricing.is_safe(vault.collateral, vault.issued, ratio)?;
        vault.withdraw(add_u128(payout, fee)?)?;
        vault.retire(share)?;
        if was_safe && !pricing.is_safe(vault.collateral, vault.issued, ratio)? {
            log::debug!("Exercise: fee would leave {} undercollateralized", owner);
            return Err(VaultError::InsufficientCollateral);
        }

        remaining = sub_u128(remaining, share)?;
        settled.push((handle, Settlement { owner: *owner, share, payout, fee, underlying: 0 }));
    }

    if remaining > 0 {
        log::debug!("Exercise: list covers {} of {}", amount - remaining, amount);
        return Err(VaultError::InsufficientVaultCoverage);
    }

    let mut credited = 0u128;
    let last = settled.len().saturating_sub(1);
    for (i, (handle, s)) in settled.iter_mut().enumerate() {
        s.underlying = if i == last {
            sub_u128(underlying_owed, credited)?
        } else {
            underlying_share(underlying_owed, s.share, amount)?
        };
        credited = add_u128(credited, s.underlying)?;
        if let Some(vault) = working.get_mut(&*handle) {
            vault.credit_underlying(s.underlying)?;
        }
    }

    let mut report = ExerciseReport {
        amount,
        underlying_paid: underlying_owed,
        ..ExerciseReport::default()
    };
    for (_, s) in &settled {
        report.collateral_paid = add_u128(report.collateral_paid, s.payout)?;
        report.fees = add_u128(report.fees, s.fee)?;
    }
    report.settlements = settled.into_iter().map(|(_, s)| s).collect();

    let vaults = touched
        .into_iter()
        .filter_map(|h| working.get(&h).map(|v| (h, *v)))
        .collect();

    Ok(ExercisePlan { report, vaults })
}

/// Process exercise instruction
///
/// # Arguments
/// * `holder` - Claim token holder; pays underlying, receives collateral
/// * `amount` - Claim tokens to exercise
/// * `vault_list` - Owners of the vaults to settle against, in payout order
///
/// # Errors
/// * `InstrumentExpired` / `OutsideExerciseWindow` - not within the window
/// * `InsufficientClaimTokenBalance` - holder holds fewer than `amount`
/// * `NoSuchVault` - a listed owner has no vault
/// * `InsufficientVaultCoverage` - the list cannot absorb `amount`
/// * `UnderlyingTransferFailed` - the underlying pull failed
/// * `CollateralTransferFailed` - the payout failed; the underlying is returned
/// * `UnderlyingRefundFailed` - the payout and the return both failed; the
///   underlying is recorded as owed to the holder, see `process_claim_refund`
pub fn process_exercise(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    holder: Identity,
    amount: u128,
    vault_list: &[Identity],
) -> VaultResult<ExerciseReport> {
    log::debug!("Exercise: {} exercises {} across {} vaults", holder, amount, vault_list.len());

    let now = ctx.clock.now();
    instrument.ensure_live(now)?;
    if !instrument.is_exercise_window(now) {
        return Err(VaultError::OutsideExerciseWindow);
    }
    if amount == 0 {
        return Ok(ExerciseReport::default());
    }
    if instrument.claims.balance_of(&holder) < amount {
        return Err(VaultError::InsufficientClaimTokenBalance);
    }

    let params = instrument.params.snapshot();
    let pricing = instrument.pricing(ctx.oracle)?;
    let plan = plan_exercise(
        instrument,
        &pricing,
        params.transaction_fee,
        params.min_collateralization_ratio,
        amount,
        vault_list,
    )?;
    let fees_after = add_u128(instrument.fees_collected, plan.report.fees)?;

    let underlying = instrument.assets.underlying().id;
    let collateral = instrument.assets.collateral().id;
    let owed = plan.report.underlying_paid;
    let refund_after = add_u128(instrument.refund_owed(&holder), owed)?;

    ctx.bank.transfer_in(underlying, holder, owed).map_err(|e| {
        log::debug!("Exercise: underlying pull failed: {}", e);
        VaultError::UnderlyingTransferFailed
    })?;

    if let Err(e) = ctx.bank.transfer_out(collateral, holder, plan.report.collateral_paid) {
        log::debug!("Exercise: collateral payout failed: {}", e);
        if let Err(refund) = ctx.bank.transfer_out(underlying, holder, owed) {
            log::error!("Exercise: refund of {} underlying to {} failed: {}", owed, holder, refund);
            instrument.refunds_owed.insert(holder, refund_after);
            return Err(VaultError::UnderlyingRefundFailed);
        }
        return Err(VaultError::CollateralTransferFailed);
    }

    instrument.claims.burn(holder, amount)?;
    for (handle, vault) in &plan.vaults {
        instrument.vaults.store(*handle, *vault);
    }
    instrument.fees_collected = fees_after;

    log::info!(
        "Exercise: {} settled {} against {} vaults, paid {} collateral",
        holder,
        amount,
        plan.report.settlements.len(),
        plan.report.collateral_paid
    );
    Ok(plan.report)
}
