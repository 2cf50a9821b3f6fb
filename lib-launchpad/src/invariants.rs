//! Ledger conservation invariants.
//!
//! Checks run over a committed ledger and the launchpad's native balance.
//! They report violations instead of panicking so callers (tests,
//! monitoring, restore-from-disk) decide how to react.
//!
//! # Accounting Invariants
//!
//! - **EscrowConservation**: `total_escrow == Σ platform_escrow`
//! - **CurveBacking**: before seeding, `token_funds == cost(0, total_supply)`
//! - **FundsDrained**: once seeding started, `token_funds == 0`
//! - **SeedingFlags**: `lp_seeded ⇒ lp_created`, and `v3_pool` is set iff seeded
//! - **BalanceReconciliation**: native balance `>= total_escrow + Σ token_funds`

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::types::{Address, Wei};

/// Accounting property that must hold between transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerInvariant {
    EscrowConservation,
    CurveBacking,
    FundsDrained,
    SeedingFlags,
    BalanceReconciliation,
}

impl LedgerInvariant {
    pub fn description(&self) -> &'static str {
        match self {
            Self::EscrowConservation => "total escrow must equal the sum of per-token escrow",
            Self::CurveBacking => "token funds must equal the curve cost of issued supply",
            Self::FundsDrained => "token funds must be zero once seeding started",
            Self::SeedingFlags => "seeding flags and pool must be consistent",
            Self::BalanceReconciliation => "native balance must cover escrow plus token funds",
        }
    }
}

/// A failed invariant check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantViolation {
    pub invariant: LedgerInvariant,
    /// Offending token, for per-token invariants
    pub token: Option<Address>,
    pub detail: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{:?} violated for {}: {}", self.invariant, token, self.detail),
            None => write!(f, "{:?} violated: {}", self.invariant, self.detail),
        }
    }
}

/// Check every accounting invariant
///
/// `contract_balance` is the launchpad account's native balance as reported
/// by the host.
pub fn check_ledger_invariants(ledger: &Ledger, contract_balance: Wei) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let total_escrow = ledger.global().total_escrow;

    match ledger.escrow_sum() {
        Ok(sum) if sum == total_escrow => {}
        Ok(sum) => violations.push(InvariantViolation {
            invariant: LedgerInvariant::EscrowConservation,
            token: None,
            detail: format!("total {} != sum {}", total_escrow, sum),
        }),
        Err(e) => violations.push(InvariantViolation {
            invariant: LedgerInvariant::EscrowConservation,
            token: None,
            detail: e.to_string(),
        }),
    }

    for record in ledger.records() {
        let token = Some(record.token);

        if record.lp_created {
            if record.token_funds != 0 {
                violations.push(InvariantViolation {
                    invariant: LedgerInvariant::FundsDrained,
                    token,
                    detail: format!("funds {} after seeding", record.token_funds),
                });
            }
        } else {
            match record.curve().cost(0, record.total_supply) {
                Ok(expected) if expected == record.token_funds => {}
                Ok(expected) => violations.push(InvariantViolation {
                    invariant: LedgerInvariant::CurveBacking,
                    token,
                    detail: format!("funds {} != curve cost {}", record.token_funds, expected),
                }),
                Err(e) => violations.push(InvariantViolation {
                    invariant: LedgerInvariant::CurveBacking,
                    token,
                    detail: e.to_string(),
                }),
            }
        }

        if (record.lp_seeded && !record.lp_created) || (record.lp_seeded != record.v3_pool.is_some()) {
            violations.push(InvariantViolation {
                invariant: LedgerInvariant::SeedingFlags,
                token,
                detail: format!(
                    "lp_created={} lp_seeded={} pool={}",
                    record.lp_created,
                    record.lp_seeded,
                    record.v3_pool.is_some()
                ),
            });
        }
    }

    let required = ledger
        .funds_sum()
        .ok()
        .and_then(|funds| funds.checked_add(total_escrow));
    match required {
        Some(required) if contract_balance >= required => {}
        Some(required) => violations.push(InvariantViolation {
            invariant: LedgerInvariant::BalanceReconciliation,
            token: None,
            detail: format!("balance {} < required {}", contract_balance, required),
        }),
        None => violations.push(InvariantViolation {
            invariant: LedgerInvariant::BalanceReconciliation,
            token: None,
            detail: "required balance overflows".to_string(),
        }),
    }

    violations
}
