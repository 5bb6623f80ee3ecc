#![allow(dead_code)]

use dealdesk::domain::activity::ActivityLog;
use dealdesk::domain::deal::Deal;
use dealdesk::domain::error::DealdeskError;
use dealdesk::domain::payouts::PayoutHistory;
use dealdesk::ports::deal_source::DealSource;
use std::collections::HashMap;

pub struct MockDealSource {
    pub deals: Vec<Deal>,
    pub payouts: HashMap<String, PayoutHistory>,
    pub activity: Vec<ActivityLog>,
    pub error: Option<String>,
}

impl MockDealSource {
    pub fn new() -> Self {
        Self {
            deals: Vec::new(),
            payouts: HashMap::new(),
            activity: Vec::new(),
            error: None,
        }
    }

    pub fn with_deal(mut self, json: &str) -> Self {
        self.deals.push(serde_json::from_str(json).unwrap());
        self
    }

    pub fn with_payouts(mut self, deal_id: &str, json: &str) -> Self {
        self.payouts
            .insert(deal_id.to_string(), serde_json::from_str(json).unwrap());
        self
    }

    pub fn with_activity(mut self, json: &str) -> Self {
        self.activity = serde_json::from_str(json).unwrap();
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn check(&self) -> Result<(), DealdeskError> {
        match &self.error {
            Some(reason) => Err(DealdeskError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DealSource for MockDealSource {
    fn list_deals(&self) -> Result<Vec<Deal>, DealdeskError> {
        self.check()?;
        Ok(self.deals.clone())
    }

    fn fetch_payouts(&self, deal_id: &str) -> Result<PayoutHistory, DealdeskError> {
        self.check()?;
        Ok(self.payouts.get(deal_id).cloned().unwrap_or_default())
    }

    fn fetch_activity(&self) -> Result<Vec<ActivityLog>, DealdeskError> {
        self.check()?;
        Ok(self.activity.clone())
    }
}

/// A deal with every financial field filled in.
pub const LAGOS_COLD_CHAIN: &str = r#"{
    "_id": "d-1",
    "name": "Lagos Cold Chain",
    "sector": "Logistics",
    "status": "active",
    "country": "Nigeria",
    "facilitySize": 50000,
    "utilizedAmount": 32000,
    "targetYield": 14,
    "tenorMonths": 12,
    "revenue": 120000,
    "expenses": 90000,
    "burn_rate": 5000,
    "cash": 60000,
    "customers": 320,
    "churn_rate": 4.2,
    "acquisition_cost": 150,
    "lifetime_value": 600
}"#;

/// A deal with no financial data at all.
pub const BARE_DEAL: &str =
    r#"{"_id": "d-2", "name": "Kigali Solar", "status": "review", "location": "Rwanda"}"#;

pub fn standard_source() -> MockDealSource {
    MockDealSource::new()
        .with_deal(LAGOS_COLD_CHAIN)
        .with_deal(BARE_DEAL)
        .with_deal(
            r#"{"_id": "d-3", "name": "Accra Textiles", "status": "Active", "country": "Ghana",
                "targetYield": "11.5", "tenorMonths": 6, "utilizedAmount": "$4,500"}"#,
        )
}
