//! Conservation properties over random trade sequences
//!
//! Whatever mix of buys, sells and escrow top-ups runs against a token, the
//! ledger must stay reconciled with the launchpad's native balance and the
//! curve funds must equal the integral over the issued supply.

use proptest::prelude::*;

use lib_launchpad::pricing::{curve_integral, INITIAL_PRICE_WEI, PRICE_STEP_WEI};
use lib_launchpad::testing::MemoryHost;
use lib_launchpad::{Address, CallContext, Launchpad, LaunchpadConfig, NativeBank, Wei, WAD};

const TRADER: u8 = 1;
const BACKER: u8 = 2;

#[derive(Debug, Clone)]
enum Op {
    Buy(u64),
    Sell(u64),
    TopUp(Wei),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u64..400).prop_map(Op::Buy),
        2 => (1u64..400).prop_map(Op::Sell),
        1 => (1u128..1_000_000_000_000_000_000).prop_map(Op::TopUp),
    ]
}

fn addr(id: u8) -> Address {
    Address::new([id; 32])
}

fn ctx(caller: u8, value: Wei) -> CallContext {
    CallContext::new(addr(caller), 7, 1_700_000_000).with_value(value)
}

fn deploy(lp_cap: u64) -> (Launchpad<MemoryHost>, Address) {
    let mut config = LaunchpadConfig::new(addr(0xaa), addr(0xfc), addr(0x1c));
    config.curve.lp_cap = lp_cap;

    let mut host = MemoryHost::new();
    host.fund(&addr(TRADER), 10u128.pow(30)).unwrap();
    host.fund(&addr(BACKER), 10u128.pow(30)).unwrap();
    let mut lp = Launchpad::new(addr(0xee), &config, host).unwrap();

    let fee = lp.creation_fee_wei();
    let token = lp.create_token(&ctx(TRADER, fee), "Prop", "PROP").unwrap();
    (lp, token)
}

fn apply(lp: &mut Launchpad<MemoryHost>, token: &Address, op: &Op) -> bool {
    match *op {
        Op::Buy(amount) => match lp.calculate_cost(token, amount) {
            Ok(quote) => lp
                .buy_tokens(&ctx(TRADER, quote.total_cost), token, amount)
                .is_ok(),
            Err(_) => false,
        },
        Op::Sell(amount) => {
            let supply = lp.token_total_supply(token).unwrap();
            if supply == 0 {
                return false;
            }
            let amount = amount.min(supply);
            let launchpad = *lp.address();
            lp.host_mut()
                .approve(token, &addr(TRADER), &launchpad, amount as u128 * WAD)
                .unwrap();
            lp.sell_tokens(&ctx(TRADER, 0), token, amount).is_ok()
        }
        Op::TopUp(value) => lp.top_up_escrow(&ctx(BACKER, value), token).is_ok(),
    }
}

proptest! {
    #[test]
    fn funds_track_curve_integral(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (mut lp, token) = deploy(1_000_000);

        for op in &ops {
            apply(&mut lp, &token, op);

            let supply = lp.token_total_supply(&token).unwrap();
            let expected = curve_integral(INITIAL_PRICE_WEI as Wei, PRICE_STEP_WEI as Wei, 0, supply).unwrap();
            prop_assert_eq!(lp.token_funds(&token).unwrap(), expected);
            prop_assert!(lp.verify_invariants().is_empty(), "{:?}", lp.verify_invariants());
        }
    }

    #[test]
    fn balance_reconciles_through_seeding(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (mut lp, token) = deploy(600);

        for op in &ops {
            let before = lp.ledger().clone();
            let balance_before = lp.host().native_balance(lp.address());

            if !apply(&mut lp, &token, op) {
                prop_assert_eq!(lp.ledger(), &before);
                prop_assert_eq!(lp.host().native_balance(lp.address()), balance_before);
            }

            let snapshot = lp.accounting_snapshot(&token).unwrap();
            prop_assert_eq!(snapshot.total_escrow, snapshot.token_escrow);
            prop_assert_eq!(snapshot.contract_balance, snapshot.total_escrow + snapshot.token_funds);
            prop_assert!(lp.verify_invariants().is_empty(), "{:?}", lp.verify_invariants());
        }

        if lp.token_total_supply(&token).unwrap() >= 600 {
            prop_assert!(lp.lp_seeded(&token).unwrap());
            prop_assert_eq!(lp.token_funds(&token).unwrap(), 0);
        }
    }
}
