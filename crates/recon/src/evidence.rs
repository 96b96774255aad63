use crate::model::ReconSummary;

/// Compute summary counts from the sizes of the inputs and the final sets.
pub fn compute_summary(
    total_sales: usize,
    total_bank: usize,
    matched_count: usize,
    sales_pending_count: usize,
    bank_pending_count: usize,
) -> ReconSummary {
    let summary = ReconSummary {
        total_sales,
        total_bank,
        matched_count,
        sales_pending_count,
        bank_pending_count,
    };
    debug_assert!(summary.is_balanced(), "unbalanced summary: {summary:?}");
    summary
}

impl ReconSummary {
    /// Every input record is accounted for exactly once on both sides.
    pub fn is_balanced(&self) -> bool {
        self.matched_count + self.sales_pending_count == self.total_sales
            && self.matched_count + self.bank_pending_count == self.total_bank
    }

    /// Share of sales records that found a bank counterpart, 0.0 for no sales.
    pub fn sales_match_rate(&self) -> f64 {
        if self.total_sales == 0 {
            0.0
        } else {
            self.matched_count as f64 / self.total_sales as f64
        }
    }
}
