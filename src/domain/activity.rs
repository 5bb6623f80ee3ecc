//! Investor activity log presentation.

use serde::{Deserialize, Serialize};

use crate::domain::format::{format_currency, format_date_short};
use crate::domain::lenient::{self, Loose};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityLog {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    #[serde(rename = "dealName", default, deserialize_with = "lenient::text")]
    pub deal_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::loose")]
    pub amount: Option<Loose>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Repayment,
    Refund,
    Allocation,
}

impl ActivityKind {
    /// Anything other than a repayment or refund is an allocation.
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("repayment") => ActivityKind::Repayment,
            Some("refund") => ActivityKind::Refund,
            _ => ActivityKind::Allocation,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActivityKind::Repayment => "Payout processed",
            ActivityKind::Refund => "Allocation refunded",
            ActivityKind::Allocation => "Allocation placed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub id: Option<String>,
    pub title: String,
    pub detail: String,
    pub date: String,
    pub direction: String,
}

impl ActivityLog {
    pub fn kind(&self) -> ActivityKind {
        ActivityKind::from_type(self.kind.as_deref())
    }

    pub fn direction_label(&self) -> &'static str {
        if self.direction.as_deref() == Some("outgoing") {
            "Debit"
        } else {
            "Credit"
        }
    }

    pub fn to_row(&self) -> ActivityRow {
        let amount = lenient::number(self.amount.as_ref()).unwrap_or(0.0);
        ActivityRow {
            id: self.id.clone(),
            title: self.kind().title().to_string(),
            detail: format!(
                "{} · {}",
                self.deal_name.as_deref().unwrap_or("Deal"),
                format_currency(amount)
            ),
            date: format_date_short(self.created_at.as_deref()),
            direction: self.direction_label().to_string(),
        }
    }
}

pub fn present_activity(logs: &[ActivityLog]) -> Vec<ActivityRow> {
    logs.iter().map(ActivityLog::to_row).collect()
}

pub fn activity_heading(holder_name: Option<&str>) -> String {
    format!("{} · Activity Logs", holder_name.unwrap_or("Investor"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logs(json: &str) -> Vec<ActivityLog> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn titles_by_type() {
        assert_eq!(ActivityKind::from_type(Some("repayment")).title(), "Payout processed");
        assert_eq!(ActivityKind::from_type(Some("refund")).title(), "Allocation refunded");
        assert_eq!(ActivityKind::from_type(Some("allocation")).title(), "Allocation placed");
        assert_eq!(ActivityKind::from_type(None), ActivityKind::Allocation);
    }

    #[test]
    fn rows_from_exported_logs() {
        let rows = present_activity(&logs(
            r#"[
                {"id": "t1", "type": "repayment", "dealName": "Kigali Solar", "amount": 1250,
                 "createdAt": "2024-05-02T08:00:00Z", "direction": "incoming"},
                {"id": "t2", "type": "allocation", "amount": "5000", "direction": "outgoing"}
            ]"#,
        ));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Payout processed");
        assert_eq!(rows[0].detail, "Kigali Solar · $1,250.0");
        assert_eq!(rows[0].date, "May 2, 2024");
        assert_eq!(rows[0].direction, "Credit");

        assert_eq!(rows[1].detail, "Deal · $5,000.0");
        assert_eq!(rows[1].date, "—");
        assert_eq!(rows[1].direction, "Debit");
    }

    #[test]
    fn missing_amount_reads_as_zero() {
        let row = ActivityLog::default().to_row();
        assert_eq!(row.detail, "Deal · $0.00");
        assert_eq!(row.direction, "Credit");
    }

    #[test]
    fn heading_defaults_to_investor() {
        assert_eq!(activity_heading(Some("Ada")), "Ada · Activity Logs");
        assert_eq!(activity_heading(None), "Investor · Activity Logs");
    }
}
