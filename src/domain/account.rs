//! Marketplace account record.

use serde::Deserialize;

use crate::domain::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountType {
    Msme,
    Investor,
    #[default]
    Unknown,
}

impl AccountType {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("msme") => AccountType::Msme,
            Some("investor") => AccountType::Investor,
            _ => AccountType::Unknown,
        }
    }
}

/// The signed-in account. `deal_id` is set once the MSME has listed a deal;
/// it is the only record of a previous submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(rename = "accountType", default, deserialize_with = "lenient::text")]
    account_type: Option<String>,
    #[serde(rename = "dealId", default, deserialize_with = "lenient::text")]
    pub deal_id: Option<String>,
}

impl Account {
    pub fn account_type(&self) -> AccountType {
        AccountType::parse(self.account_type.as_deref())
    }

    pub fn has_listed_deal(&self) -> bool {
        self.deal_id.is_some()
    }

    pub fn record_listed_deal(&mut self, deal_id: impl Into<String>) {
        self.deal_id = Some(deal_id.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_export() {
        let account: Account = serde_json::from_str(
            r#"{"_id": "u1", "name": "Ada", "accountType": "MSME", "dealId": "d-9"}"#,
        )
        .unwrap();
        assert_eq!(account.id.as_deref(), Some("u1"));
        assert_eq!(account.account_type(), AccountType::Msme);
        assert!(account.has_listed_deal());
    }

    #[test]
    fn blank_deal_id_is_not_a_listing() {
        let account: Account =
            serde_json::from_str(r#"{"accountType": "investor", "dealId": ""}"#).unwrap();
        assert_eq!(account.account_type(), AccountType::Investor);
        assert!(!account.has_listed_deal());
    }

    #[test]
    fn record_listed_deal_sets_flag() {
        let mut account = Account::default();
        assert_eq!(account.account_type(), AccountType::Unknown);
        account.record_listed_deal("d-1");
        assert_eq!(account.deal_id.as_deref(), Some("d-1"));
    }
}
