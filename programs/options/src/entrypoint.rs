//! Instrument entrypoint: one typed instruction in, one outcome out

use optvault_common::{Identity, VaultResult};
use serde::{Deserialize, Serialize};

use crate::instructions::*;
use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Every state-changing operation on an instrument
///
/// The acting identity is supplied alongside the instruction: it is the vault
/// owner for vault operations, the holder for exercise, transfer and refund
/// claims, and the configurer for parameter updates and fee sweeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    OpenVault,
    AddCollateral {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    RemoveCollateral {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    Mint {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
        recipient: Identity,
    },
    Burn {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    Transfer {
        to: Identity,
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    Exercise {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
        vaults: Vec<Identity>,
    },
    UpdateParameters {
        liquidation_incentive: u64,
        liquidation_factor: u64,
        transaction_fee: u64,
        min_collateralization_ratio: u64,
    },
    RemoveUnderlying,
    WithdrawFees,
    ClaimRefund,
    CreateCollateralOption {
        #[serde(with = "fixed_math::serde_amount")]
        collateral: u128,
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
        recipient: Identity,
    },
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::OpenVault => "OpenVault",
            Instruction::AddCollateral { .. } => "AddCollateral",
            Instruction::RemoveCollateral { .. } => "RemoveCollateral",
            Instruction::Mint { .. } => "Mint",
            Instruction::Burn { .. } => "Burn",
            Instruction::Transfer { .. } => "Transfer",
            Instruction::Exercise { .. } => "Exercise",
            Instruction::UpdateParameters { .. } => "UpdateParameters",
            Instruction::RemoveUnderlying => "RemoveUnderlying",
            Instruction::WithdrawFees => "WithdrawFees",
            Instruction::ClaimRefund => "ClaimRefund",
            Instruction::CreateCollateralOption { .. } => "CreateCollateralOption",
        }
    }
}

/// Result of a committed instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    VaultOpened {
        index: usize,
    },
    Collateral {
        #[serde(with = "fixed_math::serde_amount")]
        collateral: u128,
    },
    Issued {
        #[serde(with = "fixed_math::serde_amount")]
        issued: u128,
    },
    Transferred,
    Exercised(ExerciseReport),
    ParametersUpdated {
        version: u64,
    },
    Paid {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    OptionCreated {
        index: usize,
        #[serde(with = "fixed_math::serde_amount")]
        issued: u128,
    },
}

/// Execute `instruction` on behalf of `caller`
///
/// Rejections are logged here and returned unchanged; no state is written
/// for a rejected instruction.
pub fn process_instruction(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    caller: Identity,
    instruction: Instruction,
) -> VaultResult<Outcome> {
    let name = instruction.name();
    log::debug!("Instruction: {}", name);

    let result = match instruction {
        Instruction::OpenVault => {
            process_open_vault(instrument, ctx, caller).map(|h| Outcome::VaultOpened { index: h.index() })
        }
        Instruction::AddCollateral { amount } => {
            process_add_collateral(instrument, ctx, caller, amount).map(|collateral| Outcome::Collateral { collateral })
        }
        Instruction::RemoveCollateral { amount } => process_remove_collateral(instrument, ctx, caller, amount)
            .map(|collateral| Outcome::Collateral { collateral }),
        Instruction::Mint { amount, recipient } => {
            process_mint(instrument, ctx, caller, amount, recipient).map(|issued| Outcome::Issued { issued })
        }
        Instruction::Burn { amount } => process_burn(instrument, caller, amount).map(|issued| Outcome::Issued { issued }),
        Instruction::Transfer { to, amount } => {
            process_transfer(instrument, caller, to, amount).map(|()| Outcome::Transferred)
        }
        Instruction::Exercise { amount, vaults } => {
            process_exercise(instrument, ctx, caller, amount, &vaults).map(Outcome::Exercised)
        }
        Instruction::UpdateParameters {
            liquidation_incentive,
            liquidation_factor,
            transaction_fee,
            min_collateralization_ratio,
        } => {
            let update = ParameterUpdate {
                liquidation_incentive: u128::from(liquidation_incentive),
                liquidation_factor: u128::from(liquidation_factor),
                transaction_fee: u128::from(transaction_fee),
                min_collateralization_ratio: u128::from(min_collateralization_ratio),
            };
            process_update_parameters(instrument, ctx, caller, update)
                .map(|version| Outcome::ParametersUpdated { version })
        }
        Instruction::RemoveUnderlying => {
            process_remove_underlying(instrument, ctx, caller).map(|amount| Outcome::Paid { amount })
        }
        Instruction::WithdrawFees => process_withdraw_fees(instrument, ctx, caller).map(|amount| Outcome::Paid { amount }),
        Instruction::ClaimRefund => process_claim_refund(instrument, ctx, caller).map(|amount| Outcome::Paid { amount }),
        Instruction::CreateCollateralOption { collateral, amount, recipient } => {
            process_create_collateral_option(instrument, ctx, caller, collateral, amount, recipient)
                .map(|(h, issued)| Outcome::OptionCreated { index: h.index(), issued })
        }
    };

    if let Err(e) = &result {
        log::debug!("Instruction: {} rejected: {} (code {})", name, e, e.code());
    }
    result
}
