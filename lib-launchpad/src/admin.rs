//! Admin Surface
//!
//! Owner-gated configuration. Every setter is non-payable, rejects the zero
//! address, and emits an event carrying the old and new values.

use tracing::info;

use crate::context::CallContext;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::events::LaunchpadEvent;
use crate::host::Host;
use crate::launchpad::Launchpad;
use crate::types::{Address, Wei};

impl<H: Host> Launchpad<H> {
    pub(crate) fn require_owner(&self, ctx: &CallContext) -> LaunchpadResult<()> {
        if ctx.caller != self.ledger.global().owner {
            return Err(LaunchpadError::NotOwner);
        }
        Ok(())
    }

    fn admin_call<T>(
        &mut self,
        ctx: &CallContext,
        op: &'static str,
        f: impl FnOnce(&mut Self) -> LaunchpadResult<T>,
    ) -> LaunchpadResult<T> {
        self.transact(ctx, op, |lp| {
            ctx.require_non_payable()?;
            lp.require_owner(ctx)?;
            f(lp)
        })
    }

    pub fn set_fee_collector(&mut self, ctx: &CallContext, collector: Address) -> LaunchpadResult<()> {
        self.admin_call(ctx, "set_fee_collector", |lp| {
            if collector.is_zero() {
                return Err(LaunchpadError::ZeroAddress);
            }
            let old = lp.ledger.set_fee_collector(collector);
            lp.emit(ctx, LaunchpadEvent::FeeCollectorUpdated { old, new: collector });
            info!("Fee collector changed {} → {}", old, collector);
            Ok(())
        })
    }

    pub fn set_lp_collector(&mut self, ctx: &CallContext, collector: Address) -> LaunchpadResult<()> {
        self.admin_call(ctx, "set_lp_collector", |lp| {
            if collector.is_zero() {
                return Err(LaunchpadError::ZeroAddress);
            }
            let old = lp.ledger.set_lp_collector(collector);
            lp.emit(ctx, LaunchpadEvent::LpCollectorUpdated { old, new: collector });
            info!("LP collector changed {} → {}", old, collector);
            Ok(())
        })
    }

    /// Change the fee charged by future `create_token` calls
    pub fn set_creation_fee_wei(&mut self, ctx: &CallContext, fee: Wei) -> LaunchpadResult<()> {
        self.admin_call(ctx, "set_creation_fee_wei", |lp| {
            let old = lp.ledger.set_creation_fee(fee);
            lp.emit(ctx, LaunchpadEvent::CreationFeeUpdated { old, new: fee });
            info!("Creation fee changed {} → {}", old, fee);
            Ok(())
        })
    }

    /// Single-step ownership transfer
    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> LaunchpadResult<()> {
        self.admin_call(ctx, "transfer_ownership", |lp| {
            if new_owner.is_zero() {
                return Err(LaunchpadError::ZeroAddress);
            }
            let old = lp.ledger.set_owner(new_owner);
            lp.emit(ctx, LaunchpadEvent::OwnershipTransferred { old, new: new_owner });
            info!("Ownership transferred {} → {}", old, new_owner);
            Ok(())
        })
    }
}
