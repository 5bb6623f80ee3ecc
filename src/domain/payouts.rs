//! Payout (cashflow) history for a single deal.

use serde::{Deserialize, Serialize};

use crate::domain::deal_profile::DEFAULT_CASHFLOW_STATUS;
use crate::domain::format::{format_currency, format_date_short};
use crate::domain::lenient::{self, Loose};

/// Cashflow history document as exported for one deal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayoutHistory {
    #[serde(default, deserialize_with = "lenient::record")]
    pub deal: Option<DealRef>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub payouts: Vec<Payout>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub totals: Option<PayoutTotals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealRef {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payout {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cycle: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub principal: Option<Loose>,
    #[serde(rename = "yield", default, deserialize_with = "lenient::loose")]
    pub yield_amount: Option<Loose>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl Payout {
    pub fn principal_value(&self) -> f64 {
        lenient::number(self.principal.as_ref()).unwrap_or(0.0)
    }

    pub fn yield_value(&self) -> f64 {
        lenient::number(self.yield_amount.as_ref()).unwrap_or(0.0)
    }

    pub fn cycle_label(&self, idx: usize) -> String {
        self.cycle
            .clone()
            .unwrap_or_else(|| format!("Cycle {}", idx + 1))
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_CASHFLOW_STATUS)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayoutTotals {
    #[serde(default, deserialize_with = "lenient::loose")]
    pub principal: Option<Loose>,
    #[serde(rename = "yield", default, deserialize_with = "lenient::loose")]
    pub yield_amount: Option<Loose>,
}

impl PayoutHistory {
    /// Principal and yield totals. Totals reported with the history win;
    /// otherwise they are summed from the payouts.
    pub fn totals(&self) -> (f64, f64) {
        match &self.totals {
            Some(totals) => (
                lenient::number(totals.principal.as_ref()).unwrap_or(0.0),
                lenient::number(totals.yield_amount.as_ref()).unwrap_or(0.0),
            ),
            None => self.payouts.iter().fold((0.0, 0.0), |(principal, yld), p| {
                (principal + p.principal_value(), yld + p.yield_value())
            }),
        }
    }

    pub fn deal_name(&self) -> &str {
        self.deal
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or("Deal")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutRow {
    pub key: String,
    pub cycle: String,
    pub date: String,
    pub principal: String,
    #[serde(rename = "yield")]
    pub yield_amount: String,
    pub status: String,
    pub settled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutStatement {
    pub title: String,
    pub total_principal: String,
    pub total_yield: String,
    pub payout_count: usize,
    pub rows: Vec<PayoutRow>,
}

pub fn summarize_payouts(history: &PayoutHistory) -> PayoutStatement {
    let (principal, yld) = history.totals();
    let rows = history
        .payouts
        .iter()
        .enumerate()
        .map(|(idx, payout)| {
            let cycle = payout.cycle_label(idx);
            let status = payout.status_label().to_string();
            PayoutRow {
                key: payout.id.clone().unwrap_or_else(|| cycle.clone()),
                date: format_date_short(payout.date.as_deref()),
                principal: format_currency(payout.principal_value()),
                yield_amount: format_currency(payout.yield_value()),
                settled: status == DEFAULT_CASHFLOW_STATUS,
                cycle,
                status,
            }
        })
        .collect();

    PayoutStatement {
        title: format!("{} · Cashflow History", history.deal_name()),
        total_principal: format_currency(principal),
        total_yield: format_currency(yld),
        payout_count: history.payouts.len(),
        rows,
    }
}
