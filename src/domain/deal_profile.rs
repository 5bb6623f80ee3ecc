//! Display-ready deal profile.
//!
//! [`build_deal_profile`] resolves defaults for every descriptive field of a
//! deal and routes all money and percentage values through
//! [`crate::domain::format`].

use serde::Serialize;

use crate::domain::deal::{CashflowEntry, Deal};
use crate::domain::format::{
    format_currency, format_date_short, format_moic, format_percent, PLACEHOLDER,
};
use crate::domain::lenient::{self, Loose};
use crate::domain::rounding::round_to;

pub const DEFAULT_FACILITY_SIZE: f64 = 10_000.0;
pub const DEFAULT_DEAL_NAME: &str = "MSME Deal";
pub const DEFAULT_SECTOR: &str = "Working capital";
pub const DEFAULT_REPAYMENT_CADENCE: &str = "Monthly";
pub const DEFAULT_CASHFLOW_STATUS: &str = "Settled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Active,
    Pending,
    Offline,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMeta {
    pub label: String,
    pub tone: StatusTone,
}

/// Trimmed, lowercased status; empty when missing.
pub fn normalize_status(status: Option<&str>) -> String {
    status.map(|s| s.trim().to_lowercase()).unwrap_or_default()
}

pub fn status_meta(status: Option<&str>) -> StatusMeta {
    let normalized = normalize_status(status);
    let (label, tone) = match normalized.as_str() {
        "active" => ("Active".to_string(), StatusTone::Active),
        "pending" | "review" => ("Pending".to_string(), StatusTone::Pending),
        "offline" => ("Offline".to_string(), StatusTone::Offline),
        "" => ("Offline".to_string(), StatusTone::Neutral),
        other => (capitalize(other), StatusTone::Neutral),
    };
    StatusMeta { label, tone }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowRow {
    pub cycle: String,
    pub date: String,
    pub amount: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub dso: String,
    pub delinquency: String,
    pub realized_moic: String,
    pub utilization: String,
    pub tenor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskControls {
    pub kyc: bool,
    pub payout_monitoring: bool,
    pub diversification: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealProfile {
    pub name: String,
    pub sector: String,
    pub location: String,
    pub status_meta: StatusMeta,
    pub risk_label: String,
    pub facility_size_value: f64,
    pub facility_size: String,
    pub utilized_value: f64,
    pub utilized_label: Option<String>,
    pub remaining_capacity_value: f64,
    pub remaining_capacity_label: String,
    pub utilization_pct: Option<f64>,
    pub target_yield: String,
    pub repayment_cadence: String,
    pub tenor_months: u32,
    pub tenor_display: String,
    pub performance: PerformanceSummary,
    pub cashflows: Vec<CashflowRow>,
    pub risk_controls: RiskControls,
}

pub fn build_deal_profile(deal: &Deal) -> DealProfile {
    let facility_size_value =
        lenient::number(deal.facility_size.as_ref()).unwrap_or(DEFAULT_FACILITY_SIZE);
    let utilized_value = lenient::number(deal.utilized_amount.as_ref()).unwrap_or(0.0);
    let remaining_capacity_value = (facility_size_value - utilized_value).max(0.0);

    let tenor_months = deal.tenor_months();
    let tenor_display = format!("{tenor_months} months");

    let performance = deal.performance.as_ref();
    let supplied_utilization = performance.and_then(|p| p.utilization_pct.as_ref());
    let utilization_pct = match supplied_utilization {
        Some(value) => value.as_number(),
        None => derive_utilization_pct(facility_size_value, utilized_value),
    };
    let utilization = match supplied_utilization {
        Some(Loose::Number(n)) => format!("{n}%"),
        Some(Loose::Text(s)) => format!("{s}%"),
        None => utilization_pct
            .map(|pct| format!("{pct}%"))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    };

    let dso = performance
        .and_then(|p| p.dso_days.as_ref())
        .or(deal.dso.as_ref());
    let delinquency = performance
        .and_then(|p| p.delinquency_rate.as_ref())
        .or(deal.delinquency.as_ref());
    let moic = performance
        .and_then(|p| p.moic.as_ref())
        .or(deal.realized_moic.as_ref());

    let target_yield = lenient::number(deal.target_yield.as_ref().or(deal.yield_pct.as_ref()))
        .unwrap_or(0.0);

    DealProfile {
        name: deal.name.clone().unwrap_or_else(|| DEFAULT_DEAL_NAME.to_string()),
        sector: deal.sector.clone().unwrap_or_else(|| DEFAULT_SECTOR.to_string()),
        location: deal.location().to_string(),
        status_meta: status_meta(deal.status.as_deref()),
        risk_label: deal.risk_label().to_string(),
        facility_size_value,
        facility_size: format_currency(facility_size_value),
        utilized_value,
        utilized_label: (utilized_value != 0.0).then(|| format_currency(utilized_value)),
        remaining_capacity_value,
        remaining_capacity_label: format_currency(remaining_capacity_value),
        utilization_pct,
        target_yield: format_percent(target_yield, 1),
        repayment_cadence: deal
            .repayment_cadence
            .clone()
            .unwrap_or_else(|| DEFAULT_REPAYMENT_CADENCE.to_string()),
        tenor_months,
        tenor_display: tenor_display.clone(),
        performance: PerformanceSummary {
            dso: match dso {
                Some(Loose::Number(n)) => format!("{:.1}", round_to(*n, 1)),
                Some(Loose::Text(s)) => s.clone(),
                None => PLACEHOLDER.to_string(),
            },
            delinquency: match delinquency {
                Some(Loose::Number(n)) => format_percent(*n, 1),
                Some(Loose::Text(s)) => s.clone(),
                None => PLACEHOLDER.to_string(),
            },
            realized_moic: format_moic(lenient::number(moic)),
            utilization,
            tenor: tenor_display,
        },
        cashflows: deal
            .cashflows
            .iter()
            .enumerate()
            .map(|(idx, entry)| cashflow_row(idx, entry))
            .collect(),
        risk_controls: RiskControls {
            kyc: deal.kyc_verified.unwrap_or(true),
            payout_monitoring: deal.payout_monitoring.unwrap_or(true),
            diversification: deal.diversification_guardrails.unwrap_or(true),
        },
    }
}

/// Drawn share of the facility in whole percent, capped at 100.
fn derive_utilization_pct(facility_size: f64, utilized: f64) -> Option<f64> {
    if facility_size == 0.0 {
        return None;
    }
    let pct = (utilized / facility_size * 100.0).round().min(100.0);
    // Adding 0.0 folds -0.0 into 0.0 so it never renders as "-0%".
    Some(pct + 0.0)
}

fn cashflow_row(idx: usize, entry: &CashflowEntry) -> CashflowRow {
    CashflowRow {
        cycle: entry
            .cycle
            .clone()
            .unwrap_or_else(|| format!("Cycle {}", idx + 1)),
        date: format_date_short(entry.effective_date()),
        amount: match &entry.amount {
            Some(Loose::Number(n)) => format_currency(*n),
            Some(Loose::Text(s)) => s.clone(),
            None => PLACEHOLDER.to_string(),
        },
        status: entry
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_CASHFLOW_STATUS.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Deal {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn remaining_capacity_never_negative() {
        let profile =
            build_deal_profile(&parse(r#"{"facilitySize": 10000, "utilizedAmount": 12000}"#));
        assert_eq!(profile.remaining_capacity_value, 0.0);
        assert_eq!(profile.remaining_capacity_label, "$0.00");
        assert_eq!(profile.utilization_pct, Some(100.0));
        assert_eq!(profile.performance.utilization, "100%");
    }

    #[test]
    fn remaining_capacity_and_utilization() {
        let profile =
            build_deal_profile(&parse(r#"{"facilitySize": 50000, "utilizedAmount": 12500}"#));
        assert_eq!(profile.remaining_capacity_value, 37_500.0);
        assert_eq!(profile.remaining_capacity_label, "$37,500.0");
        assert_eq!(profile.facility_size, "$50,000.0");
        assert_eq!(profile.utilized_label.as_deref(), Some("$12,500.0"));
        assert_eq!(profile.utilization_pct, Some(25.0));
        assert_eq!(profile.performance.utilization, "25%");
    }

    #[test]
    fn defaults_for_empty_deal() {
        let profile = build_deal_profile(&Deal::default());
        assert_eq!(profile.name, DEFAULT_DEAL_NAME);
        assert_eq!(profile.sector, DEFAULT_SECTOR);
        assert_eq!(profile.location, "Location pending");
        assert_eq!(profile.status_meta.label, "Offline");
        assert_eq!(profile.risk_label, "On track");
        assert_eq!(profile.facility_size_value, DEFAULT_FACILITY_SIZE);
        assert_eq!(profile.utilized_label, None);
        assert_eq!(profile.remaining_capacity_value, DEFAULT_FACILITY_SIZE);
        assert_eq!(profile.target_yield, "0.0%");
        assert_eq!(profile.repayment_cadence, DEFAULT_REPAYMENT_CADENCE);
        assert_eq!(profile.tenor_months, 6);
        assert_eq!(profile.tenor_display, "6 months");
        assert_eq!(profile.performance.dso, PLACEHOLDER);
        assert_eq!(profile.performance.delinquency, PLACEHOLDER);
        assert_eq!(profile.performance.realized_moic, PLACEHOLDER);
        assert_eq!(profile.performance.utilization, "0%");
        assert!(profile.cashflows.is_empty());
        assert_eq!(
            profile.risk_controls,
            RiskControls {
                kyc: true,
                payout_monitoring: true,
                diversification: true
            }
        );
    }

    #[test]
    fn zero_facility_has_no_utilization() {
        let profile = build_deal_profile(&parse(r#"{"facilitySize": 0, "utilizedAmount": 500}"#));
        assert_eq!(profile.utilization_pct, None);
        assert_eq!(profile.performance.utilization, PLACEHOLDER);
    }

    #[test]
    fn negative_facility_with_nothing_drawn_is_zero_percent() {
        let profile =
            build_deal_profile(&parse(r#"{"facilitySize": -5000, "utilizedAmount": 0}"#));
        let pct = profile.utilization_pct.unwrap();
        assert_eq!(pct, 0.0);
        assert!(pct.is_sign_positive());
        assert_eq!(profile.performance.utilization, "0%");
    }

    #[test]
    fn supplied_utilization_wins() {
        let profile = build_deal_profile(&parse(
            r#"{"facilitySize": 10000, "utilizedAmount": 9000, "performance": {"utilizationPct": 42.5}}"#,
        ));
        assert_eq!(profile.utilization_pct, Some(42.5));
        assert_eq!(profile.performance.utilization, "42.5%");
    }

    #[test]
    fn tenor_prefers_canonical_then_legacy() {
        let profile = build_deal_profile(&parse(r#"{"tenorMonths": 12, "tenor": 3}"#));
        assert_eq!(profile.tenor_months, 12);
        assert_eq!(build_deal_profile(&parse(r#"{"tenor": 9}"#)).tenor_display, "9 months");
        assert_eq!(build_deal_profile(&parse(r#"{"tenorMonths": -1}"#)).tenor_months, 6);
    }

    #[test]
    fn status_meta_variants() {
        assert_eq!(status_meta(Some(" ACTIVE ")).label, "Active");
        assert_eq!(status_meta(Some("active")).tone, StatusTone::Active);
        assert_eq!(status_meta(Some("review")).label, "Pending");
        assert_eq!(status_meta(Some("pending")).tone, StatusTone::Pending);
        assert_eq!(status_meta(Some("offline")).tone, StatusTone::Offline);
        assert_eq!(status_meta(Some("funded")).label, "Funded");
        assert_eq!(status_meta(Some("funded")).tone, StatusTone::Neutral);
        assert_eq!(status_meta(None).label, "Offline");
        assert_eq!(status_meta(None).tone, StatusTone::Neutral);
    }

    #[test]
    fn performance_block_formatting() {
        let profile = build_deal_profile(&parse(
            r#"{"performance": {"dsoDays": 41.25, "delinquencyRate": 2.345, "moic": 1.126}}"#,
        ));
        assert_eq!(profile.performance.dso, "41.3");
        assert_eq!(profile.performance.delinquency, "2.3%");
        assert_eq!(profile.performance.realized_moic, "1.13x");
    }

    #[test]
    fn performance_falls_back_to_top_level_fields() {
        let profile = build_deal_profile(&parse(
            r#"{"dso": "45 days", "delinquency": "low", "realizedMoic": "1.2"}"#,
        ));
        assert_eq!(profile.performance.dso, "45 days");
        assert_eq!(profile.performance.delinquency, "low");
        assert_eq!(profile.performance.realized_moic, "1.20x");
    }

    #[test]
    fn target_yield_prefers_target_then_yield_pct() {
        assert_eq!(build_deal_profile(&parse(r#"{"targetYield": 14.5}"#)).target_yield, "14.5%");
        assert_eq!(build_deal_profile(&parse(r#"{"yieldPct": "12"}"#)).target_yield, "12.0%");
    }

    #[test]
    fn cashflows_map_independently() {
        let profile = build_deal_profile(&parse(
            r#"{"cashflows": [
                {"dueDate": "2024-02-01", "date": "2024-02-03", "amount": 1250.5, "status": "Due"},
                null,
                {"cycle": "Final", "createdAt": "2024-03-01T09:00:00Z", "amount": "pending"},
                {"date": "garbage"}
            ]}"#,
        ));
        assert_eq!(profile.cashflows.len(), 3);

        let first = &profile.cashflows[0];
        assert_eq!(first.cycle, "Cycle 1");
        assert_eq!(first.date, "Feb 1, 2024");
        assert_eq!(first.amount, "$1,250.5");
        assert_eq!(first.status, "Due");

        let second = &profile.cashflows[1];
        assert_eq!(second.cycle, "Final");
        assert_eq!(second.date, "Mar 1, 2024");
        assert_eq!(second.amount, "pending");
        assert_eq!(second.status, DEFAULT_CASHFLOW_STATUS);

        let third = &profile.cashflows[2];
        assert_eq!(third.cycle, "Cycle 3");
        assert_eq!(third.date, PLACEHOLDER);
        assert_eq!(third.amount, PLACEHOLDER);
    }

    #[test]
    fn risk_controls_respect_explicit_flags() {
        let profile = build_deal_profile(&parse(r#"{"kycVerified": false}"#));
        assert!(!profile.risk_controls.kyc);
        assert!(profile.risk_controls.payout_monitoring);
    }
}
