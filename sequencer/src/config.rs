//! Sequencer session configuration

use anyhow::{Context, Result};
use optvault_common::{Identity, Number};
use optvault_options::Instruction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Instrument name
    pub name: String,

    /// Claim token symbol
    pub symbol: String,

    /// Label of the identity allowed to update parameters and sweep fees
    pub configurer: String,

    /// Expiry, unix seconds
    pub expiry: u64,

    /// Seconds before expiry during which exercise is open
    pub exercise_window: u64,

    /// Clock value when the session starts
    pub start_time: u64,

    /// Depth of the command channel in front of the sequencer task
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    pub collateral: AssetConfig,
    pub underlying: AssetConfig,
    pub strike: AssetConfig,

    /// Strike-asset canonical units per claim-token base unit
    pub strike_price: Number,

    /// Underlying canonical units per claim-token base unit
    pub claim_exchange_rate: Number,

    #[serde(default)]
    pub parameters: ParametersConfig,

    /// Oracle quotes; only read when collateral and strike differ
    #[serde(default)]
    pub prices: Vec<PriceConfig>,

    /// Starting balances (approved to the instrument unless `approve = false`)
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_queue_depth() -> usize {
    64
}

fn default_approve() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub label: String,
    pub exponent: i32,
}

/// Raw parameter values; exponents are fixed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParametersConfig {
    pub liquidation_incentive: u64,
    pub liquidation_factor: u64,
    pub transaction_fee: u64,
    pub min_collateralization_ratio: u64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            liquidation_incentive: 0,
            liquidation_factor: 0,
            transaction_fee: 0,
            min_collateralization_ratio: 10, // 1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub asset: String,
    pub price: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub owner: String,
    pub asset: String,
    #[serde(with = "fixed_math::serde_amount")]
    pub amount: u128,
    #[serde(default = "default_approve")]
    pub approve: bool,
}

/// One scripted action, performed as `caller`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub caller: String,
    #[serde(flatten)]
    pub action: Action,
}

/// Instrument instructions addressed by label, plus session controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
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
        recipient: String,
    },
    Burn {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    Transfer {
        to: String,
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
    },
    Exercise {
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
        vaults: Vec<String>,
    },
    UpdateParameters(ParametersConfig),
    RemoveUnderlying,
    WithdrawFees,
    ClaimRefund,
    CreateCollateralOption {
        #[serde(with = "fixed_math::serde_amount")]
        collateral: u128,
        #[serde(with = "fixed_math::serde_amount")]
        amount: u128,
        recipient: String,
    },
    /// Move the session clock forward
    AdvanceTime { seconds: u64 },
    /// Replace an oracle quote
    SetPrice { asset: String, price: Number },
}

/// Identity for a configured label
pub fn identity(label: &str) -> Identity {
    Identity::from_label(label)
}

impl Action {
    /// The instrument instruction for this action, `None` for session controls
    pub fn to_instruction(&self) -> Option<Instruction> {
        let ix = match self {
            Action::OpenVault => Instruction::OpenVault,
            Action::AddCollateral { amount } => Instruction::AddCollateral { amount: *amount },
            Action::RemoveCollateral { amount } => Instruction::RemoveCollateral { amount: *amount },
            Action::Mint { amount, recipient } => Instruction::Mint { amount: *amount, recipient: identity(recipient) },
            Action::Burn { amount } => Instruction::Burn { amount: *amount },
            Action::Transfer { to, amount } => Instruction::Transfer { to: identity(to), amount: *amount },
            Action::Exercise { amount, vaults } => Instruction::Exercise {
                amount: *amount,
                vaults: vaults.iter().map(|v| identity(v)).collect(),
            },
            Action::UpdateParameters(p) => Instruction::UpdateParameters {
                liquidation_incentive: p.liquidation_incentive,
                liquidation_factor: p.liquidation_factor,
                transaction_fee: p.transaction_fee,
                min_collateralization_ratio: p.min_collateralization_ratio,
            },
            Action::RemoveUnderlying => Instruction::RemoveUnderlying,
            Action::WithdrawFees => Instruction::WithdrawFees,
            Action::ClaimRefund => Instruction::ClaimRefund,
            Action::CreateCollateralOption { collateral, amount, recipient } => Instruction::CreateCollateralOption {
                collateral: *collateral,
                amount: *amount,
                recipient: identity(recipient),
            },
            Action::AdvanceTime { .. } | Action::SetPrice { .. } => return None,
        };
        Some(ix)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SEQUENCER_CONFIG").unwrap_or_else(|_| "sequencer.toml".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let expanded_path = shellexpand::tilde(path);
        let config_str = std::fs::read_to_string(expanded_path.as_ref())
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Put on SNX struck at 375 USDC: one writer, one holder, one exercise
    pub fn default_demo() -> Self {
        let expiry = 1_767_225_600; // 2026-01-01T00:00:00Z
        let day = 86_400;
        let step = |caller: &str, action: Action| Step { caller: caller.to_string(), action };

        Self {
            name: "SNX put 375 USDC".to_string(),
            symbol: "oSNXp".to_string(),
            configurer: "admin".to_string(),
            expiry,
            exercise_window: day,
            start_time: expiry - 2 * day,
            queue_depth: default_queue_depth(),
            collateral: AssetConfig { label: "USDC".to_string(), exponent: -6 },
            underlying: AssetConfig { label: "SNX".to_string(), exponent: -18 },
            strike: AssetConfig { label: "USDC".to_string(), exponent: -6 },
            strike_price: Number::new(375, -9),
            claim_exchange_rate: Number::new(1, -7),
            parameters: ParametersConfig::default(),
            prices: Vec::new(),
            accounts: vec![
                AccountConfig {
                    owner: "writer".to_string(),
                    asset: "USDC".to_string(),
                    amount: 3_750_000_000,
                    approve: true,
                },
                AccountConfig {
                    owner: "holder".to_string(),
                    asset: "SNX".to_string(),
                    amount: 500_000_000_000_000_000_000,
                    approve: true,
                },
            ],
            steps: vec![
                step("writer", Action::OpenVault),
                step("writer", Action::AddCollateral { amount: 3_750_000_000 }),
                step("writer", Action::Mint { amount: 10_000_000_000, recipient: "holder".to_string() }),
                step("holder", Action::AdvanceTime { seconds: day }),
                step("holder", Action::Exercise { amount: 5_000_000_000, vaults: vec!["writer".to_string()] }),
                step("writer", Action::RemoveUnderlying),
            ],
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_demo();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}
