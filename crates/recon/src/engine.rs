use crate::config::{ColumnMapping, ReconConfig, ToleranceConfig};
use crate::evidence::compute_summary;
use crate::extract::Extracted;
use crate::matcher::{references_overlap, within_amount_and_window, GreedyFirstMatch, MatchStrategy};
use crate::model::{MatchType, MatchedPair, ReconResult, Record};

/// One side's working set: records still pending plus their extracted fields,
/// index-aligned.
struct Pending<'a> {
    records: Vec<&'a Record>,
    fields: Vec<Extracted>,
}

impl<'a> Pending<'a> {
    fn new(records: &'a [Record], columns: &ColumnMapping) -> Self {
        Self {
            records: records.iter().collect(),
            fields: records
                .iter()
                .map(|r| Extracted::from_record(r, columns))
                .collect(),
        }
    }

    /// Drop the consumed indices, keeping the survivors in their original order.
    fn retain_unconsumed(&mut self, consumed: &[bool]) {
        let records = std::mem::take(&mut self.records);
        let fields = std::mem::take(&mut self.fields);
        let (records, fields): (Vec<_>, Vec<_>) = records
            .into_iter()
            .zip(fields)
            .zip(consumed)
            .filter(|(_, taken)| !**taken)
            .map(|(entry, _)| entry)
            .unzip();
        self.records = records;
        self.fields = fields;
    }
}

/// The matching passes, in the order they run.
const PASSES: [MatchType; 2] = [MatchType::ExactRefAmount, MatchType::AmountDate];

fn eligible(pass: MatchType, sale: &Extracted, bank: &Extracted, tolerance: &ToleranceConfig) -> bool {
    match pass {
        MatchType::ExactRefAmount => {
            within_amount_and_window(sale, bank, tolerance) && references_overlap(sale, bank)
        }
        MatchType::AmountDate => within_amount_and_window(sale, bank, tolerance),
    }
}

/// Reconcile bank against sales with the default greedy first-match strategy.
pub fn reconcile<'a>(
    bank: &'a [Record],
    sales: &'a [Record],
    config: &ReconConfig,
) -> ReconResult<'a> {
    reconcile_with(bank, sales, config, &GreedyFirstMatch)
}

/// Reconcile with a caller-chosen selection strategy. Pass order and
/// residual handling are the same for every strategy.
pub fn reconcile_with<'a, S: MatchStrategy + ?Sized>(
    bank: &'a [Record],
    sales: &'a [Record],
    config: &ReconConfig,
    strategy: &S,
) -> ReconResult<'a> {
    let mut bank_pending = Pending::new(bank, &config.bank);
    let mut sales_pending = Pending::new(sales, &config.sales);
    let mut matched = Vec::new();

    for pass in PASSES {
        let tolerance = &config.tolerance;
        let predicate = |s: &Extracted, b: &Extracted| eligible(pass, s, b, tolerance);
        let pairs = strategy.assign(&sales_pending.fields, &bank_pending.fields, &predicate);

        let mut sale_consumed = vec![false; sales_pending.records.len()];
        let mut bank_consumed = vec![false; bank_pending.records.len()];

        for (si, bi) in pairs {
            let in_range = si < sale_consumed.len() && bi < bank_consumed.len();
            if !in_range || sale_consumed[si] || bank_consumed[bi] {
                log::warn!("{pass}: strategy returned unusable pair ({si}, {bi}); skipped");
                continue;
            }
            sale_consumed[si] = true;
            bank_consumed[bi] = true;
            matched.push(MatchedPair {
                match_type: pass,
                sale: sales_pending.records[si],
                bank: bank_pending.records[bi],
            });
        }

        sales_pending.retain_unconsumed(&sale_consumed);
        bank_pending.retain_unconsumed(&bank_consumed);

        log::debug!(
            "{pass}: {} matched so far, {} sales and {} bank pending",
            matched.len(),
            sales_pending.records.len(),
            bank_pending.records.len()
        );
    }

    let summary = compute_summary(
        sales.len(),
        bank.len(),
        matched.len(),
        sales_pending.records.len(),
        bank_pending.records.len(),
    );

    ReconResult {
        matched,
        bank_pending: bank_pending.records,
        sales_pending: sales_pending.records,
        summary,
    }
}
