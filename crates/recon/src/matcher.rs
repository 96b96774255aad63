use crate::config::ToleranceConfig;
use crate::extract::{days_between, Extracted};

/// Pair predicate handed to a strategy: `(sale, bank) -> eligible`.
pub type Eligibility<'p> = dyn Fn(&Extracted, &Extracted) -> bool + 'p;

/// Picks which eligible (sale, bank) pairs to commit within one pass.
///
/// Implementations return `(sale_index, bank_index)` pairs in discovery order,
/// using each index at most once. The pass structure around the strategy
/// (exact before fuzzy, residuals only) is fixed by the engine.
pub trait MatchStrategy {
    fn assign(
        &self,
        sales: &[Extracted],
        bank: &[Extracted],
        eligible: &Eligibility<'_>,
    ) -> Vec<(usize, usize)>;
}

/// Visits sales from last to first and commits each to the first eligible
/// bank record not yet taken. Never backtracks.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyFirstMatch;

impl MatchStrategy for GreedyFirstMatch {
    fn assign(
        &self,
        sales: &[Extracted],
        bank: &[Extracted],
        eligible: &Eligibility<'_>,
    ) -> Vec<(usize, usize)> {
        let mut bank_used = vec![false; bank.len()];
        let mut pairs = Vec::new();

        for (si, sale) in sales.iter().enumerate().rev() {
            let found = bank
                .iter()
                .enumerate()
                .find(|(bi, candidate)| !bank_used[*bi] && eligible(sale, *candidate))
                .map(|(bi, _)| bi);

            if let Some(bi) = found {
                bank_used[bi] = true;
                pairs.push((si, bi));
            }
        }

        pairs
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Amount and date both present and inside the tolerance window.
pub fn within_amount_and_window(
    sale: &Extracted,
    bank: &Extracted,
    tolerance: &ToleranceConfig,
) -> bool {
    let (Some(sale_amount), Some(bank_amount)) = (sale.amount, bank.amount) else {
        return false;
    };
    let (Some(sale_date), Some(bank_date)) = (sale.date, bank.date) else {
        return false;
    };
    // NaN from inf - inf fails the comparison, which is what we want.
    (bank_amount - sale_amount).abs() <= tolerance.amount
        && days_between(bank_date, sale_date) <= f64::from(tolerance.days)
}

/// Both references non-empty and one contains the other.
pub fn references_overlap(sale: &Extracted, bank: &Extracted) -> bool {
    let (s, b) = (&sale.reference, &bank.reference);
    !s.is_empty() && !b.is_empty() && (s.contains(b.as_str()) || b.contains(s.as_str()))
}
