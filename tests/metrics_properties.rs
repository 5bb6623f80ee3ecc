//! Property tests for the financial-health calculator.

use dealdesk::domain::deal::FinancialInputs;
use dealdesk::domain::metrics::{
    survival_probability, DerivedMetrics, GrowthStatus, MarketingEfficiency, ProfitabilityHealth,
};
use proptest::prelude::*;

fn inputs() -> impl Strategy<Value = FinancialInputs> {
    (
        -1e7..1e7f64,
        0.0..1e7f64,
        -1e5..1e5f64,
        0.0..1e7f64,
        0.0..1e5f64,
        proptest::option::of(0.0..100.0f64),
        proptest::option::of(-1e4..1e4f64),
        proptest::option::of(0.0..1e5f64),
        proptest::option::of(-10.0..1e4f64),
    )
        .prop_map(
            |(
                revenue,
                expenses,
                burn_rate,
                cash,
                customers,
                churn_rate,
                acquisition_cost,
                lifetime_value,
                initial_customers,
            )| FinancialInputs {
                revenue,
                expenses,
                burn_rate,
                cash,
                customers,
                churn_rate,
                acquisition_cost,
                lifetime_value,
                initial_customers,
            },
        )
}

proptest! {
    #[test]
    fn net_profit_is_revenue_minus_expenses(i in inputs()) {
        let m = DerivedMetrics::compute(&i);
        prop_assert_eq!(m.net_profit_loss, i.revenue - i.expenses);
        prop_assert_eq!(m.avg_monthly_revenue, i.revenue);
        prop_assert_eq!(m.avg_monthly_expenses, i.expenses);
    }

    #[test]
    fn no_revenue_means_no_margin(i in inputs()) {
        let m = DerivedMetrics::compute(&FinancialInputs { revenue: 0.0, ..i });
        prop_assert_eq!(m.profit_margin, None);
        prop_assert_eq!(m.expense_ratio, None);
        prop_assert_eq!(m.profitability_health, ProfitabilityHealth::NotEnoughData);
    }

    #[test]
    fn no_burn_means_no_runway(i in inputs(), burn in -1e5..=0.0f64) {
        let m = DerivedMetrics::compute(&FinancialInputs { burn_rate: burn, ..i });
        prop_assert_eq!(m.runway_months, None);
        prop_assert_eq!(m.survival_probability, None);
    }

    #[test]
    fn survival_present_exactly_when_runway_present(i in inputs()) {
        let m = DerivedMetrics::compute(&i);
        prop_assert_eq!(m.runway_months.is_some(), m.survival_probability.is_some());
        if let Some(runway) = m.runway_months {
            prop_assert_eq!(m.survival_probability, Some(survival_probability(runway)));
        }
    }

    #[test]
    fn margin_falls_as_expenses_rise(
        revenue in 1.0..1e7f64,
        low in 0.0..1e7f64,
        extra in 0.0..1e7f64,
    ) {
        let base = FinancialInputs { revenue, expenses: low, ..FinancialInputs::default() };
        let costly = FinancialInputs { expenses: low + extra, ..base };
        let a = DerivedMetrics::compute(&base).profit_margin.unwrap();
        let b = DerivedMetrics::compute(&costly).profit_margin.unwrap();
        prop_assert!(b <= a, "margin rose from {} to {}", a, b);
    }

    #[test]
    fn margin_never_falls_as_revenue_rises(
        revenue in 1.0..1e7f64,
        extra in 0.0..1e7f64,
        expenses in 0.0..1e7f64,
    ) {
        let base = FinancialInputs { revenue, expenses, ..FinancialInputs::default() };
        let richer = FinancialInputs { revenue: revenue + extra, ..base };
        let a = DerivedMetrics::compute(&base).profit_margin.unwrap();
        let b = DerivedMetrics::compute(&richer).profit_margin.unwrap();
        prop_assert!(b >= a, "margin fell from {} to {}", a, b);
    }

    #[test]
    fn survival_is_monotone_in_runway(a in 0.0..100.0f64, b in 0.0..100.0f64) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(survival_probability(short) <= survival_probability(long));
    }

    #[test]
    fn non_positive_cac_means_no_ratio(i in inputs(), cac in -1e4..=0.0f64) {
        let with_cac =
            DerivedMetrics::compute(&FinancialInputs { acquisition_cost: Some(cac), ..i });
        prop_assert_eq!(with_cac.ltv_cac_ratio, None);
        prop_assert_eq!(with_cac.marketing_efficiency, MarketingEfficiency::NotEnoughData);

        let absent = DerivedMetrics::compute(&FinancialInputs { acquisition_cost: None, ..i });
        prop_assert_eq!(absent.ltv_cac_ratio, None);
    }

    #[test]
    fn growth_needs_positive_baseline(i in inputs(), initial in -10.0..=0.0f64) {
        let m = DerivedMetrics::compute(&FinancialInputs { initial_customers: Some(initial), ..i });
        prop_assert_eq!(m.customer_growth_rate, None);
        prop_assert_eq!(m.growth_status, GrowthStatus::NotEnoughData);
    }
}
