//! Launchpad Trade Controller
//!
//! Entry point for every public operation. Each call runs inside
//! [`Launchpad::transact`], which snapshots the ledger, the pending event log
//! and the host before the operation and restores all three on error.
//!
//! # Call Ordering
//!
//! ```text
//!   checks ──▶ collect value ──▶ ledger effects ──▶ interactions ──▶ events
//!                                                   (mint/burn, native
//!                                                    payouts, AMM calls)
//! ```
//!
//! Ledger mutations are committed before any native currency leaves the
//! launchpad account, so anything observing state from inside a payout sees
//! the post-trade ledger.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LaunchpadConfig;
use crate::context::CallContext;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::events::{EventIndexer, EventRecord, LaunchpadEvent};
use crate::host::Host;
use crate::invariants::{check_ledger_invariants, InvariantViolation};
use crate::ledger::record::validate_metadata;
use crate::ledger::{GlobalState, Ledger, LedgerStats, TokenRecord};
use crate::pricing::{BuyQuote, CurveParams, PricingEngine, SellQuote, WAD};
use crate::types::{Address, Amount, PoolId, Wei};

/// Native balances relevant to one token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingSnapshot {
    /// Launchpad account's native balance
    pub contract_balance: Wei,
    pub total_escrow: Wei,
    pub token_escrow: Wei,
    pub token_funds: Wei,
    pub lp_seeded: bool,
}

/// Bonding-curve launchpad bound to a host environment
#[derive(Debug)]
pub struct Launchpad<H: Host> {
    /// Launchpad's own account: holds funds and escrow, mints tokens
    pub(crate) address: Address,
    pub(crate) curve: CurveParams,
    pub(crate) pricing: PricingEngine,
    pub(crate) pool_fee_tier: u32,
    pub(crate) ledger: Ledger,
    pub(crate) host: H,
    /// Committed events not yet published
    pub(crate) events: Vec<EventRecord>,
}

impl<H: Host> Launchpad<H> {
    /// Deploy a launchpad at `address` with an empty ledger
    pub fn new(address: Address, config: &LaunchpadConfig, host: H) -> LaunchpadResult<Self> {
        let global = GlobalState::new(
            config.owner,
            config.fee_collector,
            config.lp_collector,
            config.creation_fee(),
        );
        Self::with_ledger(address, config, Ledger::new(global), host)
    }

    /// Resume a launchpad from a persisted ledger
    ///
    /// `config.curve` only applies to tokens created from now on; existing
    /// tokens keep the curve frozen into their records. The ledger must
    /// reconcile with the host's balance for `address`.
    pub fn with_ledger(address: Address, config: &LaunchpadConfig, ledger: Ledger, host: H) -> LaunchpadResult<Self> {
        config
            .validate()
            .map_err(|e| LaunchpadError::InvalidParameters(e.to_string()))?;
        if address.is_zero() {
            return Err(LaunchpadError::ZeroAddress);
        }

        let violations = check_ledger_invariants(&ledger, host.native_balance(&address));
        if let Some(first) = violations.first() {
            return Err(LaunchpadError::InvalidParameters(format!(
                "ledger inconsistent ({} violations): {}",
                violations.len(),
                first
            )));
        }

        let stats = ledger.stats();
        info!(
            "Launchpad {} ready: {} tokens ({} seeded), creation fee {}",
            address, stats.total_tokens, stats.seeded, ledger.global().creation_fee_wei
        );

        Ok(Self {
            address,
            curve: config.curve,
            pricing: PricingEngine::new(config.fees),
            pool_fee_tier: config.pool_fee_tier,
            ledger,
            host,
            events: Vec::new(),
        })
    }

    /// Run `op` atomically
    pub(crate) fn transact<T>(
        &mut self,
        ctx: &CallContext,
        op: &'static str,
        f: impl FnOnce(&mut Self) -> LaunchpadResult<T>,
    ) -> LaunchpadResult<T> {
        let ledger = self.ledger.clone();
        let events_len = self.events.len();
        let checkpoint = self.host.checkpoint();

        match f(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.ledger = ledger;
                self.events.truncate(events_len);
                self.host.rollback(checkpoint);
                warn!("{} by {} rolled back: {}", op, ctx.caller, e);
                Err(e)
            }
        }
    }

    pub(crate) fn emit(&mut self, ctx: &CallContext, event: LaunchpadEvent) {
        self.events.push(EventRecord {
            block_height: ctx.block_height,
            timestamp: ctx.timestamp,
            event,
        });
    }

    /// Move the call's attached value into the launchpad account
    fn collect_value(&mut self, ctx: &CallContext) -> LaunchpadResult<()> {
        self.host
            .transfer_native(&ctx.caller, &self.address, ctx.value)?;
        Ok(())
    }

    fn pay(&mut self, to: &Address, amount: Wei) -> LaunchpadResult<()> {
        self.host.transfer_native(&self.address, to, amount)?;
        Ok(())
    }

    // =========================================================================
    // TRADING
    // =========================================================================

    /// Deploy a new curve token; `ctx.value` must equal the creation fee
    pub fn create_token(&mut self, ctx: &CallContext, name: &str, symbol: &str) -> LaunchpadResult<Address> {
        self.transact(ctx, "create_token", |lp| {
            let expected = lp.ledger.global().creation_fee_wei;
            if ctx.value != expected {
                return Err(LaunchpadError::WrongCreationFee {
                    expected,
                    sent: ctx.value,
                });
            }
            validate_metadata(name, symbol)?;

            lp.collect_value(ctx)?;
            let token = lp.host.deploy_token(name, symbol, &lp.address)?;

            let record = TokenRecord::new(
                token,
                name.to_string(),
                symbol.to_string(),
                ctx.caller,
                &lp.curve,
                expected,
                ctx.block_height,
                ctx.timestamp,
            );
            lp.ledger.register(record)?;

            lp.emit(
                ctx,
                LaunchpadEvent::TokenCreated {
                    creator: ctx.caller,
                    token,
                },
            );
            info!("Token {} ({}) created by {} at {}", name, symbol, ctx.caller, token);
            Ok(token)
        })
    }

    /// Buy `amount` curve units; any value above the total cost is refunded
    ///
    /// Reaching the LP cap seeds liquidity inside the same transaction.
    pub fn buy_tokens(&mut self, ctx: &CallContext, token: &Address, amount: u64) -> LaunchpadResult<BuyQuote> {
        self.transact(ctx, "buy_tokens", |lp| {
            let record = lp.ledger.record(token)?;
            if amount == 0 {
                return Err(LaunchpadError::InvalidAmount);
            }
            record.require_curve_active()?;
            let quote = lp
                .pricing
                .quote_buy(&record.curve(), record.total_supply, amount)?;
            debug!("buy quote token={} amount={} {:?}", token, amount, quote);
            if ctx.value < quote.total_cost {
                return Err(LaunchpadError::InsufficientPayment {
                    required: quote.total_cost,
                    sent: ctx.value,
                });
            }
            let minted = to_base_units(amount)?;
            let refund = ctx.value - quote.total_cost;
            let fee_collector = lp.ledger.global().fee_collector;

            lp.collect_value(ctx)?;
            lp.ledger.record_buy(token, amount, quote.cost)?;

            let launchpad = lp.address;
            lp.host.mint(token, &launchpad, &ctx.caller, minted)?;
            lp.pay(&ctx.caller, refund)?;
            lp.pay(&fee_collector, quote.buy_tax)?;

            lp.emit(
                ctx,
                LaunchpadEvent::TokensPurchased {
                    buyer: ctx.caller,
                    token: *token,
                    amount,
                    cost: quote.cost,
                    tax: quote.buy_tax,
                },
            );
            info!(
                "{} bought {} units of {} for {} (+{} tax)",
                ctx.caller, amount, token, quote.cost, quote.buy_tax
            );

            if lp.ledger.record(token)?.should_seed() {
                lp.seed_liquidity(ctx, token)?;
            }
            Ok(quote)
        })
    }

    /// Sell `amount` curve units back to the curve
    ///
    /// The caller must have approved the launchpad to burn `amount × 10^18`
    /// base units.
    pub fn sell_tokens(&mut self, ctx: &CallContext, token: &Address, amount: u64) -> LaunchpadResult<SellQuote> {
        self.transact(ctx, "sell_tokens", |lp| {
            ctx.require_non_payable()?;
            let record = lp.ledger.record(token)?;
            if amount == 0 {
                return Err(LaunchpadError::InvalidAmount);
            }
            if amount > record.total_supply {
                return Err(LaunchpadError::InsufficientSupply {
                    requested: amount,
                    available: record.total_supply,
                });
            }
            record.require_curve_active()?;

            let quote = lp
                .pricing
                .quote_sell(&record.curve(), record.total_supply, amount)?;
            debug!("sell quote token={} amount={} {:?}", token, amount, quote);
            if record.platform_escrow < quote.platform_tax {
                return Err(LaunchpadError::InsufficientEscrow {
                    required: quote.platform_tax,
                    available: record.platform_escrow,
                });
            }
            let burned = to_base_units(amount)?;
            let fee_payout = quote.fee_collector_payout()?;
            let fee_collector = lp.ledger.global().fee_collector;

            lp.ledger
                .record_sell(token, amount, quote.revenue, quote.platform_tax)?;

            let launchpad = lp.address;
            lp.host.burn_from(token, &launchpad, &ctx.caller, burned)?;
            lp.pay(&ctx.caller, quote.seller_payout())?;
            lp.pay(&fee_collector, fee_payout)?;

            lp.emit(
                ctx,
                LaunchpadEvent::TokensSold {
                    seller: ctx.caller,
                    token: *token,
                    amount,
                    revenue: quote.revenue,
                    tax: quote.tax,
                    platform_tax: quote.platform_tax,
                },
            );
            info!(
                "{} sold {} units of {} for {} (-{} tax, {} platform tax from escrow)",
                ctx.caller, amount, token, quote.revenue, quote.tax, quote.platform_tax
            );
            Ok(quote)
        })
    }

    /// Add `ctx.value` to a token's escrow; returns the new escrow balance
    pub fn top_up_escrow(&mut self, ctx: &CallContext, token: &Address) -> LaunchpadResult<Wei> {
        self.transact(ctx, "top_up_escrow", |lp| {
            lp.ledger.record(token)?;
            if ctx.value == 0 {
                return Err(LaunchpadError::InvalidAmount);
            }

            lp.collect_value(ctx)?;
            let escrow = lp.ledger.credit_escrow(token, ctx.value)?;

            lp.emit(
                ctx,
                LaunchpadEvent::EscrowTopped {
                    token: *token,
                    from: ctx.caller,
                    amount: ctx.value,
                },
            );
            info!("Escrow for {} topped up by {} to {}", token, ctx.value, escrow);
            Ok(escrow)
        })
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Quote buying `amount` units at the current supply
    pub fn calculate_cost(&self, token: &Address, amount: u64) -> LaunchpadResult<BuyQuote> {
        let record = self.ledger.record(token)?;
        self.pricing
            .quote_buy(&record.curve(), record.total_supply, amount)
    }

    /// Quote selling the top `amount` units of current supply
    pub fn calculate_revenue(&self, token: &Address, amount: u64) -> LaunchpadResult<SellQuote> {
        let record = self.ledger.record(token)?;
        self.pricing
            .quote_sell(&record.curve(), record.total_supply, amount)
    }

    /// Marginal price of the next unit
    pub fn current_price(&self, token: &Address) -> LaunchpadResult<Wei> {
        let record = self.ledger.record(token)?;
        self.pricing
            .current_price(&record.curve(), record.total_supply)
    }

    pub fn user_tokens(&self, creator: &Address) -> Vec<Address> {
        self.ledger.user_tokens(creator).to_vec()
    }

    pub fn token_record(&self, token: &Address) -> LaunchpadResult<&TokenRecord> {
        self.ledger.record(token)
    }

    pub fn token_creator(&self, token: &Address) -> LaunchpadResult<Address> {
        Ok(self.ledger.record(token)?.creator)
    }

    pub fn token_start_price(&self, token: &Address) -> LaunchpadResult<Wei> {
        Ok(self.ledger.record(token)?.start_price)
    }

    /// Supply at which `token` seeds liquidity
    pub fn token_lp_cap(&self, token: &Address) -> LaunchpadResult<u64> {
        Ok(self.ledger.record(token)?.lp_cap)
    }

    pub fn token_total_supply(&self, token: &Address) -> LaunchpadResult<u64> {
        Ok(self.ledger.record(token)?.total_supply)
    }

    pub fn token_funds(&self, token: &Address) -> LaunchpadResult<Wei> {
        Ok(self.ledger.record(token)?.token_funds)
    }

    pub fn platform_escrow(&self, token: &Address) -> LaunchpadResult<Wei> {
        Ok(self.ledger.record(token)?.platform_escrow)
    }

    pub fn lp_created(&self, token: &Address) -> LaunchpadResult<bool> {
        Ok(self.ledger.record(token)?.lp_created)
    }

    pub fn lp_seeded(&self, token: &Address) -> LaunchpadResult<bool> {
        Ok(self.ledger.record(token)?.lp_seeded)
    }

    pub fn token_pool(&self, token: &Address) -> LaunchpadResult<Option<PoolId>> {
        Ok(self.ledger.record(token)?.v3_pool)
    }

    pub fn total_escrow(&self) -> Wei {
        self.ledger.global().total_escrow
    }

    pub fn creation_fee_wei(&self) -> Wei {
        self.ledger.global().creation_fee_wei
    }

    pub fn owner(&self) -> Address {
        self.ledger.global().owner
    }

    pub fn fee_collector(&self) -> Address {
        self.ledger.global().fee_collector
    }

    pub fn lp_collector(&self) -> Address {
        self.ledger.global().lp_collector
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// LP cap frozen into tokens created from now on
    pub fn lp_cap(&self) -> u64 {
        self.curve.lp_cap
    }

    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    pub fn accounting_snapshot(&self, token: &Address) -> LaunchpadResult<AccountingSnapshot> {
        let record = self.ledger.record(token)?;
        Ok(AccountingSnapshot {
            contract_balance: self.host.native_balance(&self.address),
            total_escrow: self.ledger.global().total_escrow,
            token_escrow: record.platform_escrow,
            token_funds: record.token_funds,
            lp_seeded: record.lp_seeded,
        })
    }

    /// Check every ledger invariant against the host's native balance
    pub fn verify_invariants(&self) -> Vec<InvariantViolation> {
        check_ledger_invariants(&self.ledger, self.host.native_balance(&self.address))
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access for funding accounts and approvals
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Committed events not yet published
    pub fn pending_events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Drain committed events into `indexer`; returns how many were published
    pub fn publish_events<I: EventIndexer>(&mut self, indexer: &mut I) -> usize {
        let count = self.events.len();
        for record in self.events.drain(..) {
            indexer.index_event(record);
        }
        debug!("published {} launchpad events", count);
        count
    }
}

/// Curve units → token base units
pub(crate) fn to_base_units(amount: u64) -> LaunchpadResult<Amount> {
    (amount as u128)
        .checked_mul(WAD)
        .ok_or(LaunchpadError::ArithmeticOverflow)
}
