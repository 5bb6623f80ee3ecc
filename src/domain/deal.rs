//! Deal records as exported by the marketplace backend.
//!
//! [`Deal`] mirrors the exported JSON document and keeps every field optional.
//! [`FinancialInputs`] is the normalized view the metrics engine works from;
//! defaults are applied once, in [`FinancialInputs::from_deal`].

use serde::Deserialize;

use crate::domain::lenient::{self, Loose};

pub const DEFAULT_TENOR_MONTHS: u32 = 6;
pub const DEFAULT_LOCATION: &str = "Location pending";
pub const DEFAULT_RISK_LABEL: &str = "On track";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deal {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    #[serde(rename = "registeredAddress", default, deserialize_with = "lenient::text")]
    pub registered_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub risk: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub href: Option<String>,

    #[serde(rename = "facilitySize", default, deserialize_with = "lenient::loose")]
    pub facility_size: Option<Loose>,
    #[serde(rename = "utilizedAmount", default, deserialize_with = "lenient::loose")]
    pub utilized_amount: Option<Loose>,
    #[serde(rename = "targetYield", default, deserialize_with = "lenient::loose")]
    pub target_yield: Option<Loose>,
    #[serde(rename = "yieldPct", default, deserialize_with = "lenient::loose")]
    pub yield_pct: Option<Loose>,
    #[serde(rename = "tenorMonths", default, deserialize_with = "lenient::loose")]
    pub tenor_months: Option<Loose>,
    /// Legacy tenor field, also in months.
    #[serde(default, deserialize_with = "lenient::loose")]
    pub tenor: Option<Loose>,
    #[serde(rename = "repaymentCadence", default, deserialize_with = "lenient::text")]
    pub repayment_cadence: Option<String>,

    #[serde(default, deserialize_with = "lenient::record")]
    pub performance: Option<Performance>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub dso: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub delinquency: Option<Loose>,
    #[serde(rename = "realizedMoic", default, deserialize_with = "lenient::loose")]
    pub realized_moic: Option<Loose>,

    #[serde(default, deserialize_with = "lenient::records")]
    pub cashflows: Vec<CashflowEntry>,

    #[serde(rename = "kycVerified", default, deserialize_with = "lenient::flag")]
    pub kyc_verified: Option<bool>,
    #[serde(rename = "payoutMonitoring", default, deserialize_with = "lenient::flag")]
    pub payout_monitoring: Option<bool>,
    #[serde(
        rename = "diversificationGuardrails",
        default,
        deserialize_with = "lenient::flag"
    )]
    pub diversification_guardrails: Option<bool>,

    #[serde(default, deserialize_with = "lenient::loose")]
    pub revenue: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub expenses: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub burn_rate: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub cash: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub customers: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub churn_rate: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub acquisition_cost: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub lifetime_value: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub initial_customers: Option<Loose>,
}

/// Servicing figures reported for a live facility.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Performance {
    #[serde(rename = "utilizationPct", default, deserialize_with = "lenient::loose")]
    pub utilization_pct: Option<Loose>,
    #[serde(rename = "dsoDays", default, deserialize_with = "lenient::loose")]
    pub dso_days: Option<Loose>,
    #[serde(rename = "delinquencyRate", default, deserialize_with = "lenient::loose")]
    pub delinquency_rate: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub moic: Option<Loose>,
}

/// One scheduled or recorded repayment on a deal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CashflowEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub cycle: Option<String>,
    #[serde(rename = "dueDate", default, deserialize_with = "lenient::text")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub amount: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl CashflowEntry {
    /// Due date, then the recorded repayment date, then the creation timestamp.
    pub fn effective_date(&self) -> Option<&str> {
        self.due_date
            .as_deref()
            .or(self.date.as_deref())
            .or(self.created_at.as_deref())
    }
}

impl Deal {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// `location`, then `country`, then `registeredAddress`.
    pub fn location(&self) -> &str {
        self.location
            .as_deref()
            .or(self.country.as_deref())
            .or(self.registered_address.as_deref())
            .unwrap_or(DEFAULT_LOCATION)
    }

    pub fn risk_label(&self) -> &str {
        self.risk.as_deref().unwrap_or(DEFAULT_RISK_LABEL)
    }

    /// Tenor in whole months. `tenorMonths` wins over the legacy `tenor`
    /// whenever it is present, even if unreadable; `fallback` applies unless
    /// the chosen value is a positive finite number.
    pub fn tenor_months_or(&self, fallback: u32) -> u32 {
        let raw = self.tenor_months.as_ref().or(self.tenor.as_ref());
        match lenient::number(raw) {
            Some(months) if months > 0.0 => months.round() as u32,
            _ => fallback,
        }
    }

    pub fn tenor_months(&self) -> u32 {
        self.tenor_months_or(DEFAULT_TENOR_MONTHS)
    }

    /// Target yield in percent for ranking and filtering. Text such as
    /// `"14.5%"` is read money-style; missing is 0.
    pub fn yield_value(&self) -> f64 {
        self.target_yield
            .as_ref()
            .or(self.yield_pct.as_ref())
            .map(Loose::money)
            .unwrap_or(0.0)
    }

    /// Drawn amount for ranking. Text such as `"$4,000"` is read money-style.
    pub fn utilized_value(&self) -> f64 {
        self.utilized_amount
            .as_ref()
            .map(Loose::money)
            .unwrap_or(0.0)
    }
}

/// Financial fields of a deal after boundary defaulting.
///
/// Accumulation fields default to 0; ratio inputs stay `None` when missing so
/// the dependent metrics can report "no data".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialInputs {
    pub revenue: f64,
    pub expenses: f64,
    pub burn_rate: f64,
    pub cash: f64,
    pub customers: f64,
    pub churn_rate: Option<f64>,
    pub acquisition_cost: Option<f64>,
    pub lifetime_value: Option<f64>,
    pub initial_customers: Option<f64>,
}

impl FinancialInputs {
    pub fn from_deal(deal: &Deal) -> Self {
        let amount = |field: &Option<Loose>| lenient::number(field.as_ref()).unwrap_or(0.0);
        let ratio_input = |field: &Option<Loose>| lenient::number(field.as_ref());

        Self {
            revenue: amount(&deal.revenue),
            expenses: amount(&deal.expenses),
            burn_rate: amount(&deal.burn_rate),
            cash: amount(&deal.cash),
            customers: amount(&deal.customers),
            churn_rate: ratio_input(&deal.churn_rate),
            acquisition_cost: ratio_input(&deal.acquisition_cost),
            lifetime_value: ratio_input(&deal.lifetime_value),
            initial_customers: ratio_input(&deal.initial_customers),
        }
    }
}
