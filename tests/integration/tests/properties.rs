//! Property tests over random operation sequences

use optvault_common::Identity;
use optvault_integration_tests::{units, who, Market};
use optvault_options::{AssetBank, Instruction, Outcome};
use proptest::prelude::*;

const USDC: u32 = 6;
const SNX: u32 = 18;
const CLAIM: u32 = 7;

#[derive(Debug, Clone)]
enum Op {
    Open(usize),
    Deposit(usize, u128),
    Withdraw(usize, u128),
    Mint(usize, u128),
    Burn(usize, u128),
    Sell(usize, u128),
    Exercise(u128, Vec<usize>),
}

fn op() -> impl Strategy<Value = Op> {
    let writer = 0..3usize;
    prop_oneof![
        writer.clone().prop_map(Op::Open),
        (writer.clone(), 0..=units(5_000, USDC)).prop_map(|(w, a)| Op::Deposit(w, a)),
        (writer.clone(), 0..=units(2_000, USDC)).prop_map(|(w, a)| Op::Withdraw(w, a)),
        (writer.clone(), 0..=units(1_000, CLAIM)).prop_map(|(w, a)| Op::Mint(w, a)),
        (writer.clone(), 0..=units(500, CLAIM)).prop_map(|(w, a)| Op::Burn(w, a)),
        (writer, 0..=units(1_000, CLAIM)).prop_map(|(w, a)| Op::Sell(w, a)),
        (0..=units(800, CLAIM), prop::collection::vec(0..3usize, 1..5)).prop_map(|(a, v)| Op::Exercise(a, v)),
    ]
}

fn writers() -> [Identity; 3] {
    [who("w0"), who("w1"), who("w2")]
}

fn setup(fee: u64) -> Market {
    let mut m = Market::snx_put();
    let (usdc_id, snx_id) = (m.collateral, m.underlying);
    for w in writers() {
        m.fund(usdc_id, w, units(1_000_000, USDC));
    }
    m.fund(snx_id, who("holder"), units(1_000_000, SNX));
    let admin = m.admin;
    m.exec(
        admin,
        Instruction::UpdateParameters {
            liquidation_incentive: 0,
            liquidation_factor: 0,
            transaction_fee: fee,
            min_collateralization_ratio: 10,
        },
    )
    .unwrap();
    m.open_window();
    m
}

fn to_instruction(op: &Op) -> (Identity, Instruction) {
    let ws = writers();
    match op {
        Op::Open(w) => (ws[*w], Instruction::OpenVault),
        Op::Deposit(w, amount) => (ws[*w], Instruction::AddCollateral { amount: *amount }),
        Op::Withdraw(w, amount) => (ws[*w], Instruction::RemoveCollateral { amount: *amount }),
        Op::Mint(w, amount) => (ws[*w], Instruction::Mint { amount: *amount, recipient: ws[*w] }),
        Op::Burn(w, amount) => (ws[*w], Instruction::Burn { amount: *amount }),
        Op::Sell(w, amount) => (ws[*w], Instruction::Transfer { to: who("holder"), amount: *amount }),
        Op::Exercise(amount, list) => (
            who("holder"),
            Instruction::Exercise { amount: *amount, vaults: list.iter().map(|i| ws[*i]).collect() },
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_sequences_preserve_ledger(fee in 0u64..=100, ops in prop::collection::vec(op(), 1..40)) {
        let mut m = setup(fee);
        let (usdc_id, snx_id) = (m.collateral, m.underlying);

        for op in &ops {
            let before = m.instrument.clone();
            let vaults_before: Vec<_> = before.vaults().iter().copied().collect();
            let (caller, instruction) = to_instruction(op);

            match m.exec(caller, instruction) {
                Err(_) => prop_assert!(m.instrument == before),
                Ok(Outcome::Exercised(report)) => {
                    let collateral_out: u128 = vaults_before.iter().map(|v| v.collateral).sum::<u128>()
                        - m.instrument.vaults().iter().map(|v| v.collateral).sum::<u128>();
                    let underlying_in: u128 = m.instrument.vaults().iter().map(|v| v.underlying).sum::<u128>()
                        - vaults_before.iter().map(|v| v.underlying).sum::<u128>();
                    prop_assert_eq!(collateral_out, report.collateral_paid + report.fees);
                    prop_assert_eq!(underlying_in, report.underlying_paid);
                    prop_assert_eq!(report.settlements.iter().map(|s| s.share).sum::<u128>(), report.amount);
                }
                Ok(_) => {
                    let before_underlying: Vec<u128> = vaults_before.iter().map(|v| v.underlying).collect();
                    let after_underlying: Vec<u128> =
                        m.instrument.vaults().iter().take(vaults_before.len()).map(|v| v.underlying).collect();
                    prop_assert_eq!(before_underlying, after_underlying);
                }
            }

            prop_assert_eq!(m.invariants(), Ok(()));
            let held: u128 = m.instrument.vaults().iter().map(|v| v.collateral).sum();
            prop_assert_eq!(m.bank.custody(usdc_id), held + m.instrument.fees_collected());
            let owed: u128 = m.instrument.vaults().iter().map(|v| v.underlying).sum();
            prop_assert_eq!(m.bank.custody(snx_id), owed + m.instrument.refunds_outstanding());
        }
    }

    #[test]
    fn prop_exercise_pays_strike_value(options in 1u128..=1_000, exercised in 1u128..=1_000) {
        let exercised = exercised.min(options);
        let mut m = setup(0);
        let writer = writers()[0];
        let holder = who("holder");
        let usdc_id = m.collateral;

        m.exec(writer, Instruction::OpenVault).unwrap();
        m.exec(writer, Instruction::AddCollateral { amount: units(375 * options, USDC) / 100 }).unwrap();
        m.exec(writer, Instruction::Mint { amount: units(options, CLAIM), recipient: holder }).unwrap();
        m.exec(holder, Instruction::Exercise { amount: units(exercised, CLAIM), vaults: vec![writer] }).unwrap();

        prop_assert_eq!(m.bank.balance_of(usdc_id, holder), units(375 * exercised, USDC) / 100);
        let vault = m.instrument.get_vault(&writer).unwrap();
        prop_assert_eq!(vault.issued, units(options - exercised, CLAIM));
        prop_assert_eq!(vault.underlying, units(exercised, SNX));
    }

    #[test]
    fn prop_deposit_then_withdraw_restores_vault(seed in 0..=units(10_000, USDC), amount in 0..=units(10_000, USDC)) {
        let mut m = setup(0);
        let writer = writers()[1];
        m.exec(writer, Instruction::OpenVault).unwrap();
        m.exec(writer, Instruction::AddCollateral { amount: seed }).unwrap();
        let before = *m.instrument.get_vault(&writer).unwrap();

        m.exec(writer, Instruction::AddCollateral { amount }).unwrap();
        m.exec(writer, Instruction::RemoveCollateral { amount }).unwrap();
        prop_assert_eq!(*m.instrument.get_vault(&writer).unwrap(), before);
    }
}
