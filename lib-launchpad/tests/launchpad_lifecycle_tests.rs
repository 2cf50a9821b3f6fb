//! Launchpad Lifecycle Integration Tests
//!
//! End-to-end runs against the in-memory host:
//! 1. Create a token for the exact creation fee
//! 2. Buy from the curve (tax routing, refunds)
//! 3. Sell back to the curve (escrow-funded platform tax)
//! 4. Cross the LP cap and seed the AMM position
//! 5. Withdraw residual escrow, persist, and index events

use lib_launchpad::config::DEFAULT_CREATION_FEE_WEI;
use lib_launchpad::pricing::{curve_integral, INITIAL_PRICE_WEI, LP_CAP_INITIAL, PRICE_STEP_WEI};
use lib_launchpad::testing::MemoryHost;
use lib_launchpad::{
    Address, CallContext, EventIndexer, Launchpad, LaunchpadConfig, LaunchpadError, LaunchpadEvent, NativeBank,
    SledEventIndexer, SledLedgerStore, TokenFactory, TransferError, Wei, WAD,
};

const OWNER: u8 = 0xaa;
const FEE_COLLECTOR: u8 = 0xfc;
const LP_COLLECTOR: u8 = 0x1c;
const LAUNCHPAD: u8 = 0xee;
const USER: u8 = 1;
const OTHER: u8 = 2;

const ETHER: Wei = 1_000_000_000_000_000_000;

fn addr(id: u8) -> Address {
    Address::new([id; 32])
}

fn ctx(caller: u8, value: Wei) -> CallContext {
    CallContext::new(addr(caller), 100, 1_700_000_000).with_value(value)
}

fn config() -> LaunchpadConfig {
    LaunchpadConfig::new(addr(OWNER), addr(FEE_COLLECTOR), addr(LP_COLLECTOR))
}

fn deploy() -> Launchpad<MemoryHost> {
    deploy_with(&config())
}

fn deploy_with(config: &LaunchpadConfig) -> Launchpad<MemoryHost> {
    let mut host = MemoryHost::new();
    for id in [OWNER, USER, OTHER] {
        host.fund(&addr(id), 1_000_000 * ETHER).unwrap();
    }
    Launchpad::new(addr(LAUNCHPAD), config, host).unwrap()
}

fn create_simple_token(lp: &mut Launchpad<MemoryHost>, creator: u8) -> Address {
    let fee = lp.creation_fee_wei();
    lp.create_token(&ctx(creator, fee), "TestToken", "TEST").unwrap()
}

fn balance(lp: &Launchpad<MemoryHost>, id: u8) -> Wei {
    lp.host().native_balance(&addr(id))
}

fn contract_balance(lp: &Launchpad<MemoryHost>) -> Wei {
    lp.host().native_balance(lp.address())
}

/// Everything a rejected trade must leave untouched
#[derive(Debug, PartialEq, Eq)]
struct TradeState {
    supply: u64,
    funds: Wei,
    escrow: Wei,
    total_escrow: Wei,
    holder_tokens: u128,
    holder_native: Wei,
    contract: Wei,
    events: usize,
}

fn trade_state(lp: &Launchpad<MemoryHost>, token: &Address, holder: u8) -> TradeState {
    TradeState {
        supply: lp.token_total_supply(token).unwrap(),
        funds: lp.token_funds(token).unwrap(),
        escrow: lp.platform_escrow(token).unwrap(),
        total_escrow: lp.total_escrow(),
        holder_tokens: lp.host().token_balance(token, &addr(holder)).unwrap(),
        holder_native: balance(lp, holder),
        contract: contract_balance(lp),
        events: lp.pending_events().len(),
    }
}

fn approve_sale(lp: &mut Launchpad<MemoryHost>, token: &Address, seller: u8, amount: u64) {
    let launchpad = *lp.address();
    lp.host_mut()
        .approve(token, &addr(seller), &launchpad, amount as u128 * WAD)
        .unwrap();
}

#[test]
fn test_create_rejects_wrong_fee() {
    let mut lp = deploy();
    let fee = lp.creation_fee_wei();

    assert_eq!(
        lp.create_token(&ctx(USER, 0), "Foo", "FOO"),
        Err(LaunchpadError::WrongCreationFee { expected: fee, sent: 0 })
    );
    assert_eq!(
        lp.create_token(&ctx(USER, fee + 1), "Foo", "FOO"),
        Err(LaunchpadError::WrongCreationFee {
            expected: fee,
            sent: fee + 1
        })
    );
    assert!(lp.user_tokens(&addr(USER)).is_empty());
    assert_eq!(contract_balance(&lp), 0);
}

#[test]
fn test_create_initializes_state() {
    let mut lp = deploy();
    let fee = lp.creation_fee_wei();
    assert_eq!(fee, DEFAULT_CREATION_FEE_WEI);

    let token = lp.create_token(&ctx(USER, fee), "TestToken", "TEST").unwrap();

    assert_eq!(
        lp.pending_events()[0].event,
        LaunchpadEvent::TokenCreated {
            creator: addr(USER),
            token
        }
    );
    assert_eq!(lp.token_creator(&token).unwrap(), addr(USER));
    assert_eq!(lp.token_start_price(&token).unwrap(), INITIAL_PRICE_WEI as Wei);
    assert_eq!(lp.platform_escrow(&token).unwrap(), fee);
    assert_eq!(lp.total_escrow(), fee);
    assert_eq!(lp.token_total_supply(&token).unwrap(), 0);
    assert!(!lp.lp_created(&token).unwrap());
    assert_eq!(lp.host().decimals(&token).unwrap(), 18);
    assert_eq!(lp.user_tokens(&addr(USER)), vec![token]);
}

#[test]
fn test_buy_mints_and_sends_tax_to_fee_collector() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let amount = 1_000;

    let quote = lp.calculate_cost(&token, amount).unwrap();
    let tax = quote.total_cost - quote.cost;
    let fee_before = balance(&lp, FEE_COLLECTOR);
    let contract_before = contract_balance(&lp);

    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, amount)
        .unwrap();

    assert_eq!(
        lp.pending_events().last().unwrap().event,
        LaunchpadEvent::TokensPurchased {
            buyer: addr(USER),
            token,
            amount,
            cost: quote.cost,
            tax
        }
    );
    assert_eq!(balance(&lp, FEE_COLLECTOR) - fee_before, tax);
    assert_eq!(contract_balance(&lp) - contract_before, quote.cost);
    assert_eq!(lp.token_total_supply(&token).unwrap(), amount);
    assert_eq!(
        lp.host().token_balance(&token, &addr(USER)).unwrap(),
        amount as u128 * WAD
    );
    assert_eq!(lp.token_funds(&token).unwrap(), quote.cost);
}

#[test]
fn test_buy_refunds_extra_value() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);

    let quote = lp.calculate_cost(&token, 500).unwrap();
    let contract_before = contract_balance(&lp);
    let user_before = balance(&lp, USER);

    lp.buy_tokens(&ctx(USER, quote.total_cost + ETHER), &token, 500)
        .unwrap();

    assert_eq!(contract_balance(&lp) - contract_before, quote.cost);
    assert_eq!(user_before - balance(&lp, USER), quote.total_cost);
}

#[test]
fn test_buy_rejects_underpayment() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let quote = lp.calculate_cost(&token, 10).unwrap();

    assert_eq!(
        lp.buy_tokens(&ctx(USER, quote.total_cost - 1), &token, 10),
        Err(LaunchpadError::InsufficientPayment {
            required: quote.total_cost,
            sent: quote.total_cost - 1
        })
    );
    assert_eq!(lp.token_total_supply(&token).unwrap(), 0);
}

#[test]
fn test_sell_burns_pays_and_uses_escrow() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);

    let buy = lp.calculate_cost(&token, 1_000).unwrap();
    lp.buy_tokens(&ctx(USER, buy.total_cost), &token, 1_000)
        .unwrap();

    let sell = lp.calculate_revenue(&token, 100).unwrap();
    let launchpad = *lp.address();
    lp.host_mut()
        .approve(&token, &addr(USER), &launchpad, 100 * WAD)
        .unwrap();

    let fee_before = balance(&lp, FEE_COLLECTOR);
    let user_before = balance(&lp, USER);
    let escrow_before = lp.platform_escrow(&token).unwrap();
    let total_escrow_before = lp.total_escrow();

    lp.sell_tokens(&ctx(USER, 0), &token, 100).unwrap();

    assert_eq!(lp.pending_events().last().unwrap().event_type(), "tokens_sold");
    assert_eq!(escrow_before - lp.platform_escrow(&token).unwrap(), sell.platform_tax);
    assert_eq!(total_escrow_before - lp.total_escrow(), sell.platform_tax);
    assert_eq!(
        balance(&lp, FEE_COLLECTOR) - fee_before,
        sell.tax + sell.platform_tax
    );
    assert_eq!(balance(&lp, USER) - user_before, sell.revenue - sell.tax);
    assert_eq!(lp.token_total_supply(&token).unwrap(), 900);
    assert_eq!(lp.token_funds(&token).unwrap(), buy.cost - sell.revenue);
    assert_eq!(
        lp.host().token_balance(&token, &addr(USER)).unwrap(),
        900 * WAD
    );
}

#[test]
fn test_sell_more_than_supply_rejected() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let buy = lp.calculate_cost(&token, 10).unwrap();
    lp.buy_tokens(&ctx(USER, buy.total_cost), &token, 10).unwrap();

    assert_eq!(
        lp.sell_tokens(&ctx(USER, 0), &token, 11),
        Err(LaunchpadError::InsufficientSupply {
            requested: 11,
            available: 10
        })
    );
}

#[test]
fn test_sell_beyond_escrow_rejected() {
    let mut lp = deploy();
    lp.set_creation_fee_wei(&ctx(OWNER, 0), 1_000).unwrap();
    let token = create_simple_token(&mut lp, USER);
    let buy = lp.calculate_cost(&token, 100).unwrap();
    lp.buy_tokens(&ctx(USER, buy.total_cost), &token, 100).unwrap();
    approve_sale(&mut lp, &token, USER, 100);

    let sell = lp.calculate_revenue(&token, 100).unwrap();
    assert_eq!(sell.platform_tax, 500_247_500_000);
    let before = trade_state(&lp, &token, USER);

    assert_eq!(
        lp.sell_tokens(&ctx(USER, 0), &token, 100),
        Err(LaunchpadError::InsufficientEscrow {
            required: sell.platform_tax,
            available: 1_000
        })
    );
    assert_eq!(trade_state(&lp, &token, USER), before);
    assert!(lp.verify_invariants().is_empty());
}

#[test]
fn test_zero_amount_trades_rejected() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let buy = lp.calculate_cost(&token, 10).unwrap();
    lp.buy_tokens(&ctx(USER, buy.total_cost), &token, 10).unwrap();
    approve_sale(&mut lp, &token, USER, 10);
    let before = trade_state(&lp, &token, USER);

    assert_eq!(
        lp.buy_tokens(&ctx(USER, ETHER), &token, 0),
        Err(LaunchpadError::InvalidAmount)
    );
    assert_eq!(trade_state(&lp, &token, USER), before);

    assert_eq!(
        lp.sell_tokens(&ctx(USER, 0), &token, 0),
        Err(LaunchpadError::InvalidAmount)
    );
    assert_eq!(trade_state(&lp, &token, USER), before);
}

#[test]
fn test_trades_on_unknown_token_rejected() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let buy = lp.calculate_cost(&token, 10).unwrap();
    lp.buy_tokens(&ctx(USER, buy.total_cost), &token, 10).unwrap();
    let unknown = addr(0x77);
    let ledger = lp.ledger().clone();
    let before = trade_state(&lp, &token, USER);

    assert_eq!(
        lp.buy_tokens(&ctx(USER, ETHER), &unknown, 10),
        Err(LaunchpadError::UnknownToken(unknown))
    );
    assert_eq!(
        lp.sell_tokens(&ctx(USER, 0), &unknown, 10),
        Err(LaunchpadError::UnknownToken(unknown))
    );
    assert_eq!(lp.ledger(), &ledger);
    assert_eq!(trade_state(&lp, &token, USER), before);
}

#[test]
fn test_top_up_increases_token_and_global_escrow() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let top_up = 2 * ETHER;

    let total_before = lp.total_escrow();
    let token_before = lp.platform_escrow(&token).unwrap();

    let escrow = lp.top_up_escrow(&ctx(OTHER, top_up), &token).unwrap();

    assert_eq!(
        lp.pending_events().last().unwrap().event,
        LaunchpadEvent::EscrowTopped {
            token,
            from: addr(OTHER),
            amount: top_up
        }
    );
    assert_eq!(escrow, token_before + top_up);
    assert_eq!(lp.total_escrow() - total_before, top_up);
    assert_eq!(lp.platform_escrow(&token).unwrap() - token_before, top_up);
}

#[test]
fn test_top_ups_compose() {
    let mut split = deploy();
    let mut single = deploy();
    let a = create_simple_token(&mut split, USER);
    let b = create_simple_token(&mut single, USER);

    split.top_up_escrow(&ctx(OTHER, 3 * ETHER), &a).unwrap();
    split.top_up_escrow(&ctx(OTHER, 4 * ETHER), &a).unwrap();
    single.top_up_escrow(&ctx(OTHER, 7 * ETHER), &b).unwrap();

    assert_eq!(split.platform_escrow(&a).unwrap(), single.platform_escrow(&b).unwrap());
    assert_eq!(split.total_escrow(), single.total_escrow());
}

#[test]
fn test_top_up_unknown_token_rejected() {
    let mut lp = deploy();
    assert_eq!(
        lp.top_up_escrow(&ctx(OTHER, ETHER), &addr(0x55)),
        Err(LaunchpadError::UnknownToken(addr(0x55)))
    );
    assert_eq!(balance(&lp, OTHER), 1_000_000 * ETHER);
}

#[test]
fn test_withdraw_residual_before_seeding_rejected() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);

    assert_eq!(
        lp.withdraw_residual_after_bonding(&ctx(OWNER, 0), &token, &addr(OWNER)),
        Err(LaunchpadError::LpNotSeeded)
    );
}

#[test]
fn test_crossing_cap_seeds_and_allows_withdrawal() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    lp.top_up_escrow(&ctx(OTHER, ETHER), &token).unwrap();

    let cap = lp.lp_cap();
    assert_eq!(cap, LP_CAP_INITIAL);
    let quote = lp.calculate_cost(&token, cap).unwrap();
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, cap)
        .unwrap();

    assert!(lp.lp_created(&token).unwrap());
    assert!(lp.lp_seeded(&token).unwrap());
    assert!(lp.token_pool(&token).unwrap().is_some());
    assert_eq!(lp.token_funds(&token).unwrap(), 0);
    assert!(matches!(
        lp.pending_events().last().unwrap().event,
        LaunchpadEvent::LiquiditySeeded { native_amount, .. } if native_amount == quote.cost
    ));

    let escrow_before = lp.platform_escrow(&token).unwrap();
    let total_before = lp.total_escrow();
    let to_before = balance(&lp, OTHER);

    let withdrawn = lp
        .withdraw_residual_after_bonding(&ctx(OWNER, 0), &token, &addr(OTHER))
        .unwrap();

    assert_eq!(withdrawn, escrow_before);
    assert_eq!(
        lp.pending_events().last().unwrap().event,
        LaunchpadEvent::EscrowWithdrawn {
            token,
            to: addr(OTHER),
            amount: escrow_before
        }
    );
    assert_eq!(lp.platform_escrow(&token).unwrap(), 0);
    assert_eq!(total_before - lp.total_escrow(), escrow_before);
    assert_eq!(balance(&lp, OTHER) - to_before, escrow_before);
    assert!(lp.verify_invariants().is_empty());
}

#[test]
fn test_curve_retired_after_seeding() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let cap = lp.lp_cap();
    let quote = lp.calculate_cost(&token, cap).unwrap();
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, cap)
        .unwrap();

    let next = lp.calculate_cost(&token, 1).unwrap();
    assert_eq!(
        next.cost,
        curve_integral(INITIAL_PRICE_WEI as Wei, PRICE_STEP_WEI as Wei, cap, 1).unwrap()
    );
    assert_eq!(
        lp.buy_tokens(&ctx(USER, next.total_cost), &token, 1),
        Err(LaunchpadError::CurveRetired)
    );

    let launchpad = *lp.address();
    lp.host_mut()
        .approve(&token, &addr(USER), &launchpad, WAD)
        .unwrap();
    assert_eq!(
        lp.sell_tokens(&ctx(USER, 0), &token, 1),
        Err(LaunchpadError::CurveRetired)
    );

    // Escrow stays open after seeding
    assert!(lp.top_up_escrow(&ctx(OTHER, 5), &token).is_ok());
}

#[test]
fn test_admin_setters_and_ownership() {
    let mut lp = deploy();

    lp.set_fee_collector(&ctx(OWNER, 0), addr(OTHER)).unwrap();
    assert_eq!(lp.fee_collector(), addr(OTHER));

    lp.set_lp_collector(&ctx(OWNER, 0), addr(USER)).unwrap();
    assert_eq!(lp.lp_collector(), addr(USER));

    let old_fee = lp.creation_fee_wei();
    lp.set_creation_fee_wei(&ctx(OWNER, 0), old_fee * 2).unwrap();
    assert_eq!(
        lp.pending_events().last().unwrap().event,
        LaunchpadEvent::CreationFeeUpdated {
            old: old_fee,
            new: old_fee * 2
        }
    );
    assert_eq!(lp.creation_fee_wei(), old_fee * 2);

    lp.transfer_ownership(&ctx(OWNER, 0), addr(USER)).unwrap();
    assert_eq!(
        lp.pending_events().last().unwrap().event,
        LaunchpadEvent::OwnershipTransferred {
            old: addr(OWNER),
            new: addr(USER)
        }
    );
    assert_eq!(lp.owner(), addr(USER));
}

#[test]
fn test_failed_fee_payout_rolls_back_buy() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let quote = lp.calculate_cost(&token, 50).unwrap();
    let events = lp.pending_events().len();
    let user_before = balance(&lp, USER);

    lp.host_mut().reject_native_to(addr(FEE_COLLECTOR));
    assert_eq!(
        lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 50),
        Err(LaunchpadError::Transfer(TransferError::Rejected(addr(FEE_COLLECTOR))))
    );

    assert_eq!(lp.token_total_supply(&token).unwrap(), 0);
    assert_eq!(lp.token_funds(&token).unwrap(), 0);
    assert_eq!(lp.host().token_balance(&token, &addr(USER)).unwrap(), 0);
    assert_eq!(balance(&lp, USER), user_before);
    assert_eq!(lp.pending_events().len(), events);

    lp.host_mut().accept_native_to(&addr(FEE_COLLECTOR));
    assert!(lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 50).is_ok());
}

#[test]
fn test_failed_fee_payout_rolls_back_sell() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let buy = lp.calculate_cost(&token, 100).unwrap();
    lp.buy_tokens(&ctx(USER, buy.total_cost), &token, 100).unwrap();
    let launchpad = *lp.address();
    lp.host_mut()
        .approve(&token, &addr(USER), &launchpad, 40 * WAD)
        .unwrap();
    let escrow_before = lp.platform_escrow(&token).unwrap();

    lp.host_mut().reject_native_to(addr(FEE_COLLECTOR));
    assert!(matches!(
        lp.sell_tokens(&ctx(USER, 0), &token, 40),
        Err(LaunchpadError::Transfer(_))
    ));

    assert_eq!(lp.token_total_supply(&token).unwrap(), 100);
    assert_eq!(lp.platform_escrow(&token).unwrap(), escrow_before);
    assert_eq!(
        lp.host().token_balance(&token, &addr(USER)).unwrap(),
        100 * WAD
    );
    assert!(lp.verify_invariants().is_empty());
}

#[test]
fn test_ledger_survives_restart() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let quote = lp.calculate_cost(&token, 250)?;
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 250)?;

    {
        let store = SledLedgerStore::open(dir.path())?;
        store.save_ledger(lp.ledger())?;
    }

    let store = SledLedgerStore::open(dir.path())?;
    let ledger = store
        .load_ledger()?
        .ok_or_else(|| anyhow::anyhow!("ledger missing after save"))?;
    let host = lp.host().clone();
    let resumed = Launchpad::with_ledger(addr(LAUNCHPAD), &config(), ledger, host)?;

    assert_eq!(resumed.ledger(), lp.ledger());
    assert_eq!(resumed.token_total_supply(&token)?, 250);
    assert_eq!(resumed.calculate_cost(&token, 10)?, lp.calculate_cost(&token, 10)?);
    assert!(resumed.verify_invariants().is_empty());
    Ok(())
}

#[test]
fn test_resume_with_new_curve_keeps_existing_tokens() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let quote = lp.calculate_cost(&token, 1_000)?;
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 1_000)?;
    let sell_quote = lp.calculate_revenue(&token, 1_000)?;

    {
        let store = SledLedgerStore::open(dir.path())?;
        store.save_ledger(lp.ledger())?;
    }

    let mut steeper = config();
    steeper.curve.price_step_wei *= 100;
    steeper.curve.lp_cap = 5_000;
    let ledger = SledLedgerStore::open(dir.path())?
        .load_ledger()?
        .ok_or_else(|| anyhow::anyhow!("ledger missing after save"))?;
    let mut resumed = Launchpad::with_ledger(addr(LAUNCHPAD), &steeper, ledger, lp.host().clone())?;

    assert!(resumed.verify_invariants().is_empty());
    assert_eq!(resumed.calculate_revenue(&token, 1_000)?, sell_quote);
    assert_eq!(resumed.current_price(&token)?, lp.current_price(&token)?);
    assert_eq!(resumed.token_lp_cap(&token)?, LP_CAP_INITIAL);

    approve_sale(&mut resumed, &token, USER, 1_000);
    resumed.sell_tokens(&ctx(USER, 0), &token, 1_000)?;
    assert_eq!(resumed.token_total_supply(&token)?, 0);
    assert_eq!(resumed.token_funds(&token)?, 0);
    assert!(resumed.verify_invariants().is_empty());

    let fresh = create_simple_token(&mut resumed, OTHER);
    assert_eq!(resumed.token_lp_cap(&fresh)?, 5_000);
    assert_eq!(
        resumed.calculate_cost(&fresh, 10)?.cost,
        curve_integral(INITIAL_PRICE_WEI as Wei, 100 * PRICE_STEP_WEI as Wei, 0, 10)?
    );
    Ok(())
}

#[test]
fn test_resume_rejects_ledger_the_host_cannot_back() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);
    let quote = lp.calculate_cost(&token, 100).unwrap();
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 100).unwrap();

    let backed = lp.host().clone();
    let drained = MemoryHost::new();

    assert!(Launchpad::with_ledger(addr(LAUNCHPAD), &config(), lp.ledger().clone(), backed).is_ok());
    assert!(matches!(
        Launchpad::with_ledger(addr(LAUNCHPAD), &config(), lp.ledger().clone(), drained),
        Err(LaunchpadError::InvalidParameters(_))
    ));
}

#[test]
fn test_large_cap_seeds_in_one_buy() {
    let mut large = config();
    large.curve.lp_cap = 100_000_000;
    let mut lp = deploy_with(&large);
    let token = create_simple_token(&mut lp, USER);

    let quote = lp.calculate_cost(&token, 100_000_000).unwrap();
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 100_000_000)
        .unwrap();

    assert!(lp.lp_seeded(&token).unwrap());
    assert_eq!(lp.token_funds(&token).unwrap(), 0);
    assert!(lp.token_pool(&token).unwrap().is_some());
    assert_eq!(lp.stats().seeded, 1);
    assert!(lp.verify_invariants().is_empty());
}

#[test]
fn test_large_cap_seeds_on_final_unit() {
    let mut large = config();
    large.curve.lp_cap = 100_000_000;
    let mut lp = deploy_with(&large);
    let token = create_simple_token(&mut lp, USER);

    let quote = lp.calculate_cost(&token, 99_999_999).unwrap();
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 99_999_999)
        .unwrap();
    assert!(!lp.lp_created(&token).unwrap());

    let last = lp.calculate_cost(&token, 1).unwrap();
    lp.buy_tokens(&ctx(OTHER, last.total_cost), &token, 1).unwrap();

    assert!(lp.lp_seeded(&token).unwrap());
    assert_eq!(lp.token_funds(&token).unwrap(), 0);
    assert!(lp.verify_invariants().is_empty());
}

#[test]
fn test_overshooting_default_cap_seeds() {
    let mut lp = deploy();
    let token = create_simple_token(&mut lp, USER);

    let quote = lp.calculate_cost(&token, 100_000_000).unwrap();
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 100_000_000)
        .unwrap();

    assert_eq!(lp.token_total_supply(&token).unwrap(), 100_000_000);
    assert!(lp.lp_seeded(&token).unwrap());
    assert_eq!(lp.token_funds(&token).unwrap(), 0);
    assert!(lp.verify_invariants().is_empty());
}

#[test]
fn test_published_events_are_queryable() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut indexer = SledEventIndexer::open(dir.path())?;
    let mut lp = deploy();

    let token = create_simple_token(&mut lp, USER);
    let quote = lp.calculate_cost(&token, 20)?;
    lp.buy_tokens(&ctx(USER, quote.total_cost), &token, 20)?;
    let launchpad = *lp.address();
    lp.host_mut().approve(&token, &addr(USER), &launchpad, 5 * WAD)?;
    lp.sell_tokens(&ctx(USER, 0), &token, 5)?;

    assert_eq!(lp.publish_events(&mut indexer), 3);
    assert!(lp.pending_events().is_empty());
    assert_eq!(indexer.event_count(), 3);
    assert_eq!(indexer.get_token_events(&token).len(), 3);
    assert_eq!(indexer.get_purchase_events(&token).len(), 1);
    assert_eq!(indexer.get_sale_events(&token).len(), 1);
    assert_eq!(indexer.get_events_in_range(100, 100).len(), 3);
    assert_eq!(
        indexer.get_latest_event(&token).map(|r| r.event_type()),
        Some("tokens_sold")
    );
    Ok(())
}
