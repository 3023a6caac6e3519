//! End-to-end vault and exercise scenarios through the public entrypoint

use optvault_common::{Number, VaultError};
use optvault_integration_tests::{units, who, Market, EXPIRY};
use optvault_options::{AssetBank, Instruction, Outcome};

const ETH: u32 = 18;
const USDC: u32 = 6;
const SNX: u32 = 18;
const CLAIM_PUT: u32 = 7;
const CLAIM_QUOTED: u32 = 3;

#[test]
fn test_eth_call_mints_exactly_to_the_limit() {
    let mut m = Market::eth_call();
    let writer = who("writer");

    assert_eq!(
        m.write(writer, units(1, ETH), 200_000_000),
        Ok(Outcome::OptionCreated { index: 0, issued: 200_000_000 })
    );
    assert_eq!(m.instrument.max_issuable(&writer, &m.oracle), Ok(200_000_000));
    assert_eq!(
        m.exec(writer, Instruction::Mint { amount: 1, recipient: writer }),
        Err(VaultError::ExceedsCollateralizationLimit)
    );
    assert_eq!(m.instrument.claims().total_supply(), 200_000_000);
    assert_eq!(m.invariants(), Ok(()));
}

#[test]
fn test_snx_put_exercise_settles_proportionally() {
    let mut m = Market::snx_put();
    let writer = who("writer");
    let holder = who("holder");
    let (usdc_id, snx_id) = (m.collateral, m.underlying);

    m.write(writer, units(3750, USDC), units(1000, CLAIM_PUT)).unwrap();
    m.exec(writer, Instruction::Transfer { to: holder, amount: units(1000, CLAIM_PUT) }).unwrap();
    m.fund(snx_id, holder, units(500, SNX));
    assert_eq!(m.instrument.underlying_required_to_exercise(units(500, CLAIM_PUT)), Ok(units(500, SNX)));

    // Too early
    assert_eq!(
        m.exec(holder, Instruction::Exercise { amount: units(500, CLAIM_PUT), vaults: vec![writer] }),
        Err(VaultError::OutsideExerciseWindow)
    );

    m.open_window();
    let outcome = m
        .exec(holder, Instruction::Exercise { amount: units(500, CLAIM_PUT), vaults: vec![writer] })
        .unwrap();
    let Outcome::Exercised(report) = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };
    assert_eq!(report.underlying_paid, units(500, SNX));
    assert_eq!(report.collateral_paid, units(1875, USDC));
    assert_eq!(report.fees, 0);

    let vault = m.instrument.get_vault(&writer).unwrap();
    assert_eq!(vault.issued, units(500, CLAIM_PUT));
    assert_eq!(vault.collateral, units(1875, USDC));
    assert_eq!(vault.underlying, units(500, SNX));
    assert_eq!(m.bank.balance_of(usdc_id, holder), units(1875, USDC));
    assert_eq!(m.bank.balance_of(snx_id, holder), 0);
    assert_eq!(m.instrument.claim_balance_of(&holder), units(500, CLAIM_PUT));

    assert_eq!(m.exec(writer, Instruction::RemoveUnderlying), Ok(Outcome::Paid { amount: units(500, SNX) }));
    assert_eq!(m.bank.balance_of(snx_id, writer), units(500, SNX));
    assert_eq!(m.invariants(), Ok(()));
}

#[test]
fn test_short_coverage_leaves_ledger_unchanged() {
    let mut m = Market::snx_put();
    let (a, b, c) = (who("a"), who("b"), who("c"));
    let holder = who("holder");
    let snx_id = m.underlying;

    for (owner, options) in [(a, 300), (b, 200), (c, 500)] {
        m.write(owner, units(375 * options, USDC) / 100, units(options, CLAIM_PUT)).unwrap();
        m.exec(owner, Instruction::Transfer { to: holder, amount: units(options, CLAIM_PUT) }).unwrap();
    }
    m.fund(snx_id, holder, units(800, SNX));
    m.open_window();

    let before = m.instrument.clone();
    let custody_before = m.bank.custody(m.collateral);

    // c alone could cover it, but it is not listed
    assert_eq!(
        m.exec(holder, Instruction::Exercise { amount: units(800, CLAIM_PUT), vaults: vec![a, b] }),
        Err(VaultError::InsufficientVaultCoverage)
    );
    assert!(m.instrument == before);
    assert_eq!(m.bank.custody(m.collateral), custody_before);
    assert_eq!(m.bank.balance_of(snx_id, holder), units(800, SNX));

    // Listing c as well settles a and b in full and the rest against c
    let Outcome::Exercised(report) = m
        .exec(holder, Instruction::Exercise { amount: units(800, CLAIM_PUT), vaults: vec![a, b, c] })
        .unwrap()
    else {
        panic!("expected an exercise report");
    };
    let shares: Vec<u128> = report.settlements.iter().map(|s| s.share).collect();
    assert_eq!(shares, vec![units(300, CLAIM_PUT), units(200, CLAIM_PUT), units(300, CLAIM_PUT)]);
    assert_eq!(m.instrument.get_vault(&c).unwrap().issued, units(200, CLAIM_PUT));
    assert_eq!(m.invariants(), Ok(()));
}

#[test]
fn test_fee_is_retained_and_swept_by_configurer() {
    let mut m = Market::snx_put();
    let writer = who("writer");
    let holder = who("holder");
    let (usdc_id, snx_id) = (m.collateral, m.underlying);
    let admin = m.admin;

    m.write(writer, units(4000, USDC), units(1000, CLAIM_PUT)).unwrap();
    m.exec(writer, Instruction::Transfer { to: holder, amount: units(500, CLAIM_PUT) }).unwrap();

    let one_percent = Instruction::UpdateParameters {
        liquidation_incentive: 0,
        liquidation_factor: 0,
        transaction_fee: 10,
        min_collateralization_ratio: 10,
    };
    assert_eq!(m.exec(holder, one_percent.clone()), Err(VaultError::Unauthorized));
    assert_eq!(m.exec(admin, one_percent), Ok(Outcome::ParametersUpdated { version: 1 }));

    m.fund(snx_id, holder, units(500, SNX));
    m.open_window();
    m.exec(holder, Instruction::Exercise { amount: units(500, CLAIM_PUT), vaults: vec![writer] })
        .unwrap();

    let fee = 18_750_000;
    assert_eq!(m.instrument.fees_collected(), fee);
    assert_eq!(m.instrument.get_vault(&writer).unwrap().collateral, units(4000 - 1875, USDC) - fee);
    assert_eq!(m.bank.balance_of(usdc_id, holder), units(1875, USDC));

    assert_eq!(m.exec(holder, Instruction::WithdrawFees), Err(VaultError::Unauthorized));
    assert_eq!(m.exec(admin, Instruction::WithdrawFees), Ok(Outcome::Paid { amount: fee }));
    assert_eq!(m.bank.balance_of(usdc_id, admin), fee);
    assert_eq!(m.instrument.fees_collected(), 0);
    assert_eq!(m.invariants(), Ok(()));
}

#[test]
fn test_fee_raise_refused_for_vault_at_limit() {
    let mut m = Market::snx_put();
    let writer = who("writer");
    let holder = who("holder");
    let snx_id = m.underlying;
    let admin = m.admin;

    // Exactly at the limit: there is no collateral left for any fee
    m.write(writer, units(3750, USDC), units(1000, CLAIM_PUT)).unwrap();
    m.exec(writer, Instruction::Transfer { to: holder, amount: units(1000, CLAIM_PUT) }).unwrap();
    let before = m.instrument.clone();
    assert_eq!(
        m.exec(
            admin,
            Instruction::UpdateParameters {
                liquidation_incentive: 0,
                liquidation_factor: 0,
                transaction_fee: 1,
                min_collateralization_ratio: 10,
            },
        ),
        Err(VaultError::ParametersUnsafeForVaults)
    );
    assert!(m.instrument == before);

    // The whole issued supply still settles
    m.fund(snx_id, holder, units(1000, SNX));
    m.open_window();
    let Outcome::Exercised(report) = m
        .exec(holder, Instruction::Exercise { amount: units(1000, CLAIM_PUT), vaults: vec![writer] })
        .unwrap()
    else {
        panic!("expected an exercise report");
    };
    assert_eq!(report.collateral_paid, units(3750, USDC));
    assert_eq!(m.instrument.get_vault(&writer).unwrap().collateral, 0);
    assert_eq!(m.invariants(), Ok(()));
}

#[test]
fn test_failed_payout_refunds_underlying() {
    let mut m = Market::snx_put();
    let writer = who("writer");
    let holder = who("holder");
    let (usdc_id, snx_id) = (m.collateral, m.underlying);

    m.write(writer, units(3750, USDC), units(1000, CLAIM_PUT)).unwrap();
    m.exec(writer, Instruction::Transfer { to: holder, amount: units(100, CLAIM_PUT) }).unwrap();
    m.fund(snx_id, holder, units(100, SNX));
    m.open_window();
    m.bank.reject_transfers(usdc_id, holder);

    let before = m.instrument.clone();
    assert_eq!(
        m.exec(holder, Instruction::Exercise { amount: units(100, CLAIM_PUT), vaults: vec![writer] }),
        Err(VaultError::CollateralTransferFailed)
    );
    assert!(m.instrument == before);
    assert_eq!(m.bank.balance_of(snx_id, holder), units(100, SNX));
    assert_eq!(m.bank.custody(snx_id), 0);

    m.bank.accept_transfers(usdc_id, holder);
    m.bank.approve(snx_id, holder, units(100, SNX));
    assert!(m
        .exec(holder, Instruction::Exercise { amount: units(100, CLAIM_PUT), vaults: vec![writer] })
        .is_ok());
}

#[test]
fn test_quoted_collateral_mints_and_settles_at_oracle_prices() {
    let mut m = Market::eth_backed_usdc_strike();
    let writer = who("writer");
    let holder = who("holder");
    let (eth_id, usdc_id) = (m.collateral, m.underlying);

    // 1 ETH at 2000 backs 2000 USDC of strike value
    assert_eq!(m.instrument.max_issuable_for(units(1, ETH), &m.oracle), Ok(units(2_000, CLAIM_QUOTED)));
    m.write(writer, units(1, ETH), units(2_000, CLAIM_QUOTED)).unwrap();
    assert_eq!(
        m.exec(writer, Instruction::Mint { amount: 1, recipient: writer }),
        Err(VaultError::ExceedsCollateralizationLimit)
    );

    m.exec(writer, Instruction::Transfer { to: holder, amount: units(1_000, CLAIM_QUOTED) }).unwrap();
    m.fund(usdc_id, holder, units(1_000, USDC));
    m.open_window();
    let Outcome::Exercised(report) = m
        .exec(holder, Instruction::Exercise { amount: units(1_000, CLAIM_QUOTED), vaults: vec![writer] })
        .unwrap()
    else {
        panic!("expected an exercise report");
    };
    assert_eq!(report.underlying_paid, units(1_000, USDC));
    assert_eq!(report.collateral_paid, units(1, ETH) / 2);
    assert_eq!(m.bank.balance_of(eth_id, holder), units(1, ETH) / 2);
    assert_eq!(m.invariants(), Ok(()));

    // Without a usable quote nothing priced can proceed
    let before = m.instrument.clone();
    m.oracle.remove(&eth_id);
    assert_eq!(
        m.exec(writer, Instruction::Mint { amount: 1, recipient: writer }),
        Err(VaultError::PriceUnavailable)
    );
    assert_eq!(m.instrument.max_issuable(&writer, &m.oracle), Err(VaultError::PriceUnavailable));
    m.oracle.set(eth_id, Number::new(0, 0));
    assert_eq!(
        m.exec(writer, Instruction::RemoveCollateral { amount: 1 }),
        Err(VaultError::PriceUnavailable)
    );
    assert!(m.instrument == before);
}

#[test]
fn test_overflowing_deposit_is_rejected_without_change() {
    let mut m = Market::snx_put();
    let writer = who("writer");
    let usdc_id = m.collateral;

    m.write(writer, units(3750, USDC), units(1000, CLAIM_PUT)).unwrap();
    m.fund(usdc_id, writer, u128::MAX);
    let before = m.instrument.clone();
    let custody = m.bank.custody(usdc_id);

    assert_eq!(
        m.exec(writer, Instruction::AddCollateral { amount: u128::MAX }),
        Err(VaultError::ArithmeticOverflow)
    );
    assert!(m.instrument == before);
    assert_eq!(m.bank.custody(usdc_id), custody);
    assert_eq!(m.invariants(), Ok(()));
}

#[test]
fn test_expiry_closes_issuance_but_not_withdrawals() {
    let mut m = Market::snx_put();
    let writer = who("writer");
    let holder = who("holder");

    m.write(writer, units(7500, USDC), units(1000, CLAIM_PUT)).unwrap();
    m.exec(writer, Instruction::Transfer { to: holder, amount: units(10, CLAIM_PUT) }).unwrap();
    m.expire();
    assert!(m.instrument.is_expired(EXPIRY));

    assert_eq!(
        m.exec(writer, Instruction::Mint { amount: 1, recipient: writer }),
        Err(VaultError::InstrumentExpired)
    );
    assert_eq!(m.exec(who("late"), Instruction::OpenVault), Err(VaultError::InstrumentExpired));
    assert_eq!(
        m.exec(holder, Instruction::Exercise { amount: 1, vaults: vec![writer] }),
        Err(VaultError::InstrumentExpired)
    );

    assert_eq!(
        m.exec(writer, Instruction::RemoveCollateral { amount: units(3750, USDC) }),
        Ok(Outcome::Collateral { collateral: units(3750, USDC) })
    );
    assert_eq!(
        m.exec(writer, Instruction::RemoveCollateral { amount: 1 }),
        Err(VaultError::UndercollateralizedWithdrawal)
    );
    assert_eq!(
        m.exec(writer, Instruction::Burn { amount: units(990, CLAIM_PUT) }),
        Ok(Outcome::Issued { issued: units(10, CLAIM_PUT) })
    );
    assert_eq!(m.exec(holder, Instruction::Transfer { to: writer, amount: units(10, CLAIM_PUT) }), Ok(Outcome::Transferred));
    assert_eq!(m.invariants(), Ok(()));
}
