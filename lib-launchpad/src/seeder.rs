//! Liquidity Seeder
//!
//! One-shot migration of a token's curve funds into a permanent AMM
//! position, plus the owner-only withdrawal of residual escrow it unlocks.
//!
//! ```text
//!   ┌────────────┐  buy ends with supply >= LP cap   ┌────────────┐
//!   │ NotSeeded  │ ────────────────────────────────▶ │   Seeded   │
//!   └────────────┘                                   └────────────┘
//!        │                                                 │
//!   buy / sell / top-up                           top-up / withdraw residual
//! ```
//!
//! Seeding runs inside the buy that crossed the cap. Any failure here aborts
//! and rolls back that buy.

use tracing::info;

use crate::context::CallContext;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::events::LaunchpadEvent;
use crate::host::{Host, PositionAmounts, StartingPrice};
use crate::launchpad::Launchpad;
use crate::pricing::seeding_token_amount;
use crate::types::{Address, Wei};

impl<H: Host> Launchpad<H> {
    /// Convert `token`'s funds into an AMM position owned by the LP collector
    ///
    /// The pool is initialized at the curve's marginal price for the current
    /// supply, and the token side is minted at that same price so the
    /// position opens balanced.
    pub(crate) fn seed_liquidity(&mut self, ctx: &CallContext, token: &Address) -> LaunchpadResult<()> {
        let record = self.ledger.record(token)?;
        let price = self
            .pricing
            .current_price(&record.curve(), record.total_supply)?;
        let supply = record.total_supply;

        let native_amount = self.ledger.begin_seeding(token)?;
        let token_amount = seeding_token_amount(native_amount, price)?;
        let lp_collector = self.ledger.global().lp_collector;
        let launchpad = self.address;

        let wrapped_native = self.host.wrapped_native();
        let pool = self
            .host
            .create_pool(token, &wrapped_native, self.pool_fee_tier)?;
        self.host.initialize_pool(
            &pool,
            StartingPrice {
                wei_per_token: price,
            },
        )?;
        self.host.mint(token, &launchpad, &launchpad, token_amount)?;
        let receipt = self.host.mint_position(
            &pool,
            &launchpad,
            PositionAmounts {
                token_amount,
                native_amount,
            },
            &lp_collector,
        )?;

        self.ledger.complete_seeding(token, pool)?;

        self.emit(
            ctx,
            LaunchpadEvent::LiquiditySeeded {
                token: *token,
                pool,
                native_amount,
                token_amount,
                position_id: receipt.position_id,
            },
        );
        info!(
            "Liquidity seeded for {} at supply {}: pool {}, {} native + {} tokens, position {} → {}",
            token, supply, pool, native_amount, token_amount, receipt.position_id, lp_collector
        );
        Ok(())
    }

    /// Send a seeded token's entire remaining escrow to `to` (owner only)
    pub fn withdraw_residual_after_bonding(
        &mut self,
        ctx: &CallContext,
        token: &Address,
        to: &Address,
    ) -> LaunchpadResult<Wei> {
        self.transact(ctx, "withdraw_residual_after_bonding", |lp| {
            ctx.require_non_payable()?;
            lp.require_owner(ctx)?;
            if to.is_zero() {
                return Err(LaunchpadError::ZeroAddress);
            }
            lp.ledger.record(token)?.require_seeded()?;

            let amount = lp.ledger.drain_escrow(token)?;
            let launchpad = lp.address;
            lp.host.transfer_native(&launchpad, to, amount)?;

            lp.emit(
                ctx,
                LaunchpadEvent::EscrowWithdrawn {
                    token: *token,
                    to: *to,
                    amount,
                },
            );
            info!("Residual escrow {} of {} withdrawn to {}", amount, token, to);
            Ok(amount)
        })
    }
}
