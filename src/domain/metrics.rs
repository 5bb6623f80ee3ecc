//! Financial-health metrics for a deal.
//!
//! A stateless calculator: [`DerivedMetrics::compute`] maps normalized
//! [`FinancialInputs`] to numeric indicators and qualitative labels. Ratios
//! whose denominator is missing or not positive are `None` ("no data") rather
//! than an error, so a partially filled deal still produces a full record.

use std::fmt;

use serde::{Serialize, Serializer};

use super::deal::{Deal, FinancialInputs};
use super::rounding::{finite, round_to};

pub const NOT_ENOUGH_DATA: &str = "Not enough data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit_loss: f64,
    pub profit_margin: Option<f64>,
    pub expense_ratio: Option<f64>,
    pub avg_monthly_revenue: f64,
    pub avg_monthly_expenses: f64,
    pub runway_months: Option<f64>,
    pub survival_probability: Option<u32>,
    pub profitability_health: ProfitabilityHealth,
    pub ltv_cac_ratio: Option<f64>,
    pub marketing_efficiency: MarketingEfficiency,
    pub customer_growth_rate: Option<f64>,
    pub growth_status: GrowthStatus,
    pub avg_churn_rate: Option<f64>,
    pub retention_health: RetentionHealth,
}

impl DerivedMetrics {
    pub fn compute(inputs: &FinancialInputs) -> Self {
        let FinancialInputs {
            revenue,
            expenses,
            burn_rate,
            cash,
            customers,
            churn_rate,
            acquisition_cost,
            lifetime_value,
            initial_customers,
        } = *inputs;

        let raw_net = revenue - expenses;
        // Saturates at the f64 range when the difference overflows.
        let net_profit_loss = raw_net.clamp(f64::MIN, f64::MAX);

        let (profit_margin, expense_ratio) = if revenue > 0.0 {
            let margin = if raw_net.is_finite() {
                raw_net / revenue * 100.0
            } else {
                (1.0 - expenses / revenue) * 100.0
            };
            (
                finite(round_to(margin, 1)),
                finite(round_to(expenses / revenue * 100.0, 1)),
            )
        } else {
            (None, None)
        };

        let runway_months = if burn_rate > 0.0 {
            finite(round_to(cash / burn_rate, 1))
        } else {
            None
        };

        let ltv_cac_ratio = match (acquisition_cost, lifetime_value) {
            (Some(cac), Some(ltv)) if cac > 0.0 => finite(round_to(ltv / cac, 2)),
            _ => None,
        };

        let customer_growth_rate = match initial_customers {
            Some(initial) if initial > 0.0 => {
                finite(round_to((customers - initial) / initial * 100.0, 1))
            }
            _ => None,
        };

        let avg_churn_rate = churn_rate.and_then(|rate| finite(round_to(rate, 1)));

        DerivedMetrics {
            total_revenue: revenue,
            total_expenses: expenses,
            net_profit_loss,
            profit_margin,
            expense_ratio,
            avg_monthly_revenue: revenue,
            avg_monthly_expenses: expenses,
            runway_months,
            survival_probability: runway_months.map(survival_probability),
            profitability_health: ProfitabilityHealth::from_margin(profit_margin),
            ltv_cac_ratio,
            marketing_efficiency: MarketingEfficiency::from_ratio(ltv_cac_ratio),
            customer_growth_rate,
            growth_status: GrowthStatus::from_rate(customer_growth_rate),
            avg_churn_rate,
            retention_health: RetentionHealth::from_churn(avg_churn_rate),
        }
    }
}

/// Derived metrics straight from a raw deal record.
pub fn compute_financial_metrics(deal: &Deal) -> DerivedMetrics {
    DerivedMetrics::compute(&FinancialInputs::from_deal(deal))
}

/// Survival probability (percent) for a runway in months. Thresholds are
/// inclusive lower bounds.
pub fn survival_probability(runway_months: f64) -> u32 {
    if runway_months >= 18.0 {
        85
    } else if runway_months >= 12.0 {
        70
    } else if runway_months >= 6.0 {
        50
    } else if runway_months >= 3.0 {
        30
    } else {
        15
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitabilityHealth {
    Excellent,
    Good,
    BreakEven,
    LossMaking,
    NotEnoughData,
}

impl ProfitabilityHealth {
    pub fn from_margin(margin: Option<f64>) -> Self {
        match margin {
            None => Self::NotEnoughData,
            Some(m) if m > 20.0 => Self::Excellent,
            Some(m) if m > 10.0 => Self::Good,
            Some(m) if m > 0.0 => Self::BreakEven,
            Some(_) => Self::LossMaking,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::BreakEven => "Break-even",
            Self::LossMaking => "Loss-making",
            Self::NotEnoughData => NOT_ENOUGH_DATA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketingEfficiency {
    Excellent,
    Good,
    BreakEven,
    Poor,
    NotEnoughData,
}

impl MarketingEfficiency {
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            None => Self::NotEnoughData,
            Some(r) if r >= 3.0 => Self::Excellent,
            Some(r) if r >= 2.0 => Self::Good,
            Some(r) if r >= 1.0 => Self::BreakEven,
            Some(_) => Self::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - Scale up marketing",
            Self::Good => "Good - Room for growth",
            Self::BreakEven => "Break-even - Optimize campaigns",
            Self::Poor => "Poor - Reduce acquisition costs",
            Self::NotEnoughData => NOT_ENOUGH_DATA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStatus {
    High,
    Moderate,
    Slow,
    Declining,
    NotEnoughData,
}

impl GrowthStatus {
    pub fn from_rate(rate: Option<f64>) -> Self {
        match rate {
            None => Self::NotEnoughData,
            Some(r) if r > 20.0 => Self::High,
            Some(r) if r > 10.0 => Self::Moderate,
            Some(r) if r > 0.0 => Self::Slow,
            Some(_) => Self::Declining,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High growth - Strong market fit",
            Self::Moderate => "Moderate growth",
            Self::Slow => "Slow growth",
            Self::Declining => "Declining - Urgent action needed",
            Self::NotEnoughData => NOT_ENOUGH_DATA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionHealth {
    Excellent,
    Good,
    NeedsImprovement,
    Critical,
    NotEnoughData,
}

impl RetentionHealth {
    pub fn from_churn(churn: Option<f64>) -> Self {
        match churn {
            None => Self::NotEnoughData,
            Some(c) if c < 5.0 => Self::Excellent,
            Some(c) if c < 10.0 => Self::Good,
            Some(c) if c < 15.0 => Self::NeedsImprovement,
            Some(_) => Self::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent retention",
            Self::Good => "Good retention",
            Self::NeedsImprovement => "Needs improvement",
            Self::Critical => "Critical - Focus on retention",
            Self::NotEnoughData => NOT_ENOUGH_DATA,
        }
    }
}

macro_rules! label_as_string {
    ($($label:ty),+) => {$(
        impl fmt::Display for $label {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $label {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    )+};
}

label_as_string!(
    ProfitabilityHealth,
    MarketingEfficiency,
    GrowthStatus,
    RetentionHealth
);
