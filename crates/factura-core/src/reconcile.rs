//! Subtotal reconciliation with an ordered list of repair strategies.
//!
//! A mismatch between the declared sub-total and the sum of line item totals
//! is first handed to each repair strategy in turn; only when every strategy
//! fails is the invoice flagged and excluded from the clean output.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::invoice::{Invoice, LineItem};

/// A candidate fix for a known extraction artifact.
pub trait RepairStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns a repaired copy of the items, or `None` when the strategy
    /// does not apply to this invoice.
    fn apply(&self, items: &[LineItem]) -> Option<Vec<LineItem>>;
}

/// Removes rows duplicated by the extraction when a source line is read
/// twice, keeping the first occurrence of each product code.
pub struct DedupByProductCode;

impl RepairStrategy for DedupByProductCode {
    fn name(&self) -> &'static str {
        "dedup-by-product-code"
    }

    fn apply(&self, items: &[LineItem]) -> Option<Vec<LineItem>> {
        let mut seen = HashSet::new();
        let deduped: Vec<LineItem> = items
            .iter()
            .filter(|item| seen.insert(item.product_code.clone()))
            .cloned()
            .collect();

        (deduped.len() < items.len()).then_some(deduped)
    }
}

/// Result of reconciling one invoice.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Sums matched on the first comparison.
    Clean,
    /// A repair strategy made the sums match; the repaired items were kept.
    Repaired { strategy: &'static str },
    /// No strategy applied; the invoice is flagged.
    Flagged {
        expected: Option<Decimal>,
        computed: Decimal,
    },
}

/// Reconciliation engine shared across the run.
pub struct Reconciler {
    strategies: Vec<Box<dyn RepairStrategy>>,
    precision: u32,
}

impl Reconciler {
    /// Default engine: the single known duplication repair.
    pub fn new(precision: u32) -> Self {
        Self {
            strategies: vec![Box::new(DedupByProductCode)],
            precision,
        }
    }

    /// Appends a repair strategy to the list tried on mismatch.
    pub fn with_strategy(mut self, strategy: Box<dyn RepairStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Compares the sum of line item totals against the declared sub-total
    /// with exact decimal equality, repairing or flagging on mismatch.
    pub fn reconcile(&self, invoice: &mut Invoice) -> Outcome {
        let computed = total_of(&invoice.line_items, self.precision);

        let Some(expected) = invoice.sub_total_amount else {
            invoice.flag = true;
            invoice
                .warnings
                .push("no sub-total amount extracted; cannot reconcile".to_string());
            return Outcome::Flagged {
                expected: None,
                computed,
            };
        };
        let expected = expected.round_dp(self.precision);

        if computed == expected {
            return Outcome::Clean;
        }

        for strategy in &self.strategies {
            let Some(repaired) = strategy.apply(&invoice.line_items) else {
                continue;
            };
            if total_of(&repaired, self.precision) == expected {
                debug!(
                    "invoice {} repaired by {}",
                    invoice.invoice_number,
                    strategy.name()
                );
                invoice.line_items = repaired;
                return Outcome::Repaired {
                    strategy: strategy.name(),
                };
            }
        }

        invoice.flag = true;
        info!(
            "sub-total amount {expected} is different than the sum of products {computed} ({})",
            invoice.invoice_number
        );
        Outcome::Flagged {
            expected: Some(expected),
            computed,
        }
    }
}

fn total_of(items: &[LineItem], precision: u32) -> Decimal {
    items
        .iter()
        .map(|item| item.total_price)
        .sum::<Decimal>()
        .round_dp(precision)
}
