//! MSME deal-submission wizard: steps, form validation and the payload sent
//! for review.

use serde::Serialize;

use crate::domain::account::{Account, AccountType};
use crate::domain::deal::Deal;
use crate::domain::lenient::Loose;
use crate::domain::rounding::finite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    BusinessProfile = 1,
    FinancialInfo = 2,
    Documents = 3,
    ReviewAndSubmit = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::BusinessProfile,
        WizardStep::FinancialInfo,
        WizardStep::Documents,
        WizardStep::ReviewAndSubmit,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::BusinessProfile => "Business profile",
            WizardStep::FinancialInfo => "Financial info",
            WizardStep::Documents => "Documents",
            WizardStep::ReviewAndSubmit => "Review & submit",
        }
    }

    /// Next step, staying on the last one.
    pub fn next(self) -> Self {
        let idx = self.number() as usize;
        WizardStep::ALL[idx.min(WizardStep::ALL.len() - 1)]
    }

    /// Previous step, staying on the first one.
    pub fn prev(self) -> Self {
        let idx = self.number() as usize;
        WizardStep::ALL[idx.saturating_sub(2)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialField {
    Revenue,
    Expenses,
    BurnRate,
    Cash,
    Customers,
    ChurnRate,
    AcquisitionCost,
    LifetimeValue,
}

impl FinancialField {
    pub const ALL: [FinancialField; 8] = [
        FinancialField::Revenue,
        FinancialField::Expenses,
        FinancialField::BurnRate,
        FinancialField::Cash,
        FinancialField::Customers,
        FinancialField::ChurnRate,
        FinancialField::AcquisitionCost,
        FinancialField::LifetimeValue,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FinancialField::Revenue => "revenue",
            FinancialField::Expenses => "expenses",
            FinancialField::BurnRate => "burn_rate",
            FinancialField::Cash => "cash",
            FinancialField::Customers => "customers",
            FinancialField::ChurnRate => "churn_rate",
            FinancialField::AcquisitionCost => "acquisition_cost",
            FinancialField::LifetimeValue => "lifetime_value",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FinancialField::Revenue => "revenue",
            FinancialField::Expenses => "expenses",
            FinancialField::BurnRate => "burn rate",
            FinancialField::Cash => "cash",
            FinancialField::Customers => "customers",
            FinancialField::ChurnRate => "churn rate",
            FinancialField::AcquisitionCost => "acquisition cost",
            FinancialField::LifetimeValue => "lifetime value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Only MSME accounts can list a deal.")]
    InvestorAccount,

    #[error("You already listed a deal. Please manage it from your dashboard.")]
    AlreadyListed,

    #[error("Please enter your target yield (percentage).")]
    TargetYield,

    #[error("Please enter tenor in months (positive number).")]
    Tenor,

    #[error("Please enter your facility size.")]
    FacilitySize,

    #[error("Please enter a valid {} (must be ≥ 0).", .0.label())]
    InvalidFinancial(FinancialField),
}

/// Wizard form state. Every field holds the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    pub business_name: String,
    pub registered_address: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub country: String,
    pub repayment_cadence: String,
    pub target_yield: String,
    pub tenor_months: String,
    pub facility_size: String,
    pub revenue: String,
    pub expenses: String,
    pub burn_rate: String,
    pub cash: String,
    pub customers: String,
    pub churn_rate: String,
    pub acquisition_cost: String,
    pub lifetime_value: String,
    pub doc1: String,
    pub doc2: String,
    pub doc3_director_id: String,
    pub doc3_address_proof: String,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            registered_address: String::new(),
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            website: "https://".to_string(),
            country: String::new(),
            repayment_cadence: "Monthly".to_string(),
            target_yield: String::new(),
            tenor_months: String::new(),
            facility_size: String::new(),
            revenue: String::new(),
            expenses: String::new(),
            burn_rate: String::new(),
            cash: String::new(),
            customers: String::new(),
            churn_rate: String::new(),
            acquisition_cost: String::new(),
            lifetime_value: String::new(),
            doc1: String::new(),
            doc2: String::new(),
            doc3_director_id: String::new(),
            doc3_address_proof: String::new(),
        }
    }
}

/// Numeric reading of a form input; blank or non-numeric input is `None`.
fn parse_input(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().and_then(finite)
}

impl SubmissionForm {
    /// Form pre-filled with the signed-in account's email.
    pub fn for_account(account: &Account) -> Self {
        Self {
            contact_email: account.email.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn financial(&self, field: FinancialField) -> &str {
        match field {
            FinancialField::Revenue => &self.revenue,
            FinancialField::Expenses => &self.expenses,
            FinancialField::BurnRate => &self.burn_rate,
            FinancialField::Cash => &self.cash,
            FinancialField::Customers => &self.customers,
            FinancialField::ChurnRate => &self.churn_rate,
            FinancialField::AcquisitionCost => &self.acquisition_cost,
            FinancialField::LifetimeValue => &self.lifetime_value,
        }
    }

    pub fn set_financial(&mut self, field: FinancialField, value: impl Into<String>) {
        let slot = match field {
            FinancialField::Revenue => &mut self.revenue,
            FinancialField::Expenses => &mut self.expenses,
            FinancialField::BurnRate => &mut self.burn_rate,
            FinancialField::Cash => &mut self.cash,
            FinancialField::Customers => &mut self.customers,
            FinancialField::ChurnRate => &mut self.churn_rate,
            FinancialField::AcquisitionCost => &mut self.acquisition_cost,
            FinancialField::LifetimeValue => &mut self.lifetime_value,
        };
        *slot = value.into();
    }

    fn financial_value(&self, field: FinancialField) -> Option<f64> {
        parse_input(self.financial(field)).filter(|v| *v >= 0.0)
    }

    /// Every financial field holds a number ≥ 0.
    pub fn financial_step_complete(&self) -> bool {
        FinancialField::ALL
            .iter()
            .all(|field| self.financial_value(*field).is_some())
    }

    /// Whether "next" is enabled on `step`; only the financial step gates.
    pub fn can_advance(&self, step: WizardStep) -> bool {
        step != WizardStep::FinancialInfo || self.financial_step_complete()
    }

    /// Uploaded documents, or "Docs pending" when none are attached.
    pub fn doc_summary(&self) -> String {
        let attached: Vec<&str> = [
            (&self.doc1, "Incorporation"),
            (&self.doc2, "Bank statements"),
            (&self.doc3_director_id, "Director ID"),
            (&self.doc3_address_proof, "Address proof"),
        ]
        .into_iter()
        .filter(|(value, _)| !value.trim().is_empty())
        .map(|(_, label)| label)
        .collect();

        if attached.is_empty() {
            "Docs pending".to_string()
        } else {
            attached.join(", ")
        }
    }

    pub fn location_summary(&self) -> &str {
        [&self.country, &self.registered_address]
            .into_iter()
            .find(|v| !v.trim().is_empty())
            .map(String::as_str)
            .unwrap_or("Not provided")
    }

    pub fn contact_summary(&self) -> String {
        [&self.contact_name, &self.contact_email]
            .into_iter()
            .filter(|v| !v.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Validated payload sent for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealSubmission {
    #[serde(rename = "businessName")]
    pub business_name: String,
    #[serde(rename = "registeredAddress")]
    pub registered_address: String,
    #[serde(rename = "contactName")]
    pub contact_name: String,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
    pub website: String,
    pub country: String,
    #[serde(rename = "repaymentCadence")]
    pub repayment_cadence: String,
    #[serde(rename = "targetYield")]
    pub target_yield: f64,
    #[serde(rename = "tenorMonths")]
    pub tenor_months: f64,
    #[serde(rename = "facilitySize")]
    pub facility_size: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub burn_rate: f64,
    pub cash: f64,
    pub customers: f64,
    pub churn_rate: f64,
    pub acquisition_cost: f64,
    pub lifetime_value: f64,
    pub doc1: String,
    pub doc2: String,
    #[serde(rename = "doc3DirectorId")]
    pub doc3_director_id: String,
    #[serde(rename = "doc3AddressProof")]
    pub doc3_address_proof: String,
}

/// Validate the wizard form for submission.
///
/// Checks run in a fixed order and the first failure is returned: an account
/// that already listed a deal, then target yield, tenor and facility size
/// (each must be positive), then every financial field (must be ≥ 0).
pub fn validate_submission(
    form: &SubmissionForm,
    account: &Account,
) -> Result<DealSubmission, SubmissionError> {
    if account.account_type() == AccountType::Investor {
        return Err(SubmissionError::InvestorAccount);
    }
    if account.has_listed_deal() {
        return Err(SubmissionError::AlreadyListed);
    }

    let positive = |raw: &str| parse_input(raw).filter(|v| *v > 0.0);
    let target_yield = positive(&form.target_yield).ok_or(SubmissionError::TargetYield)?;
    let tenor_months = positive(&form.tenor_months).ok_or(SubmissionError::Tenor)?;
    let facility_size = positive(&form.facility_size).ok_or(SubmissionError::FacilitySize)?;

    let financial = |field: FinancialField| {
        form.financial_value(field)
            .ok_or(SubmissionError::InvalidFinancial(field))
    };

    Ok(DealSubmission {
        business_name: form.business_name.clone(),
        registered_address: form.registered_address.clone(),
        contact_name: form.contact_name.clone(),
        contact_email: form.contact_email.clone(),
        contact_phone: form.contact_phone.clone(),
        website: form.website.clone(),
        country: form.country.clone(),
        repayment_cadence: form.repayment_cadence.clone(),
        target_yield,
        tenor_months,
        facility_size,
        revenue: financial(FinancialField::Revenue)?,
        expenses: financial(FinancialField::Expenses)?,
        burn_rate: financial(FinancialField::BurnRate)?,
        cash: financial(FinancialField::Cash)?,
        customers: financial(FinancialField::Customers)?,
        churn_rate: financial(FinancialField::ChurnRate)?,
        acquisition_cost: financial(FinancialField::AcquisitionCost)?,
        lifetime_value: financial(FinancialField::LifetimeValue)?,
        doc1: form.doc1.clone(),
        doc2: form.doc2.clone(),
        doc3_director_id: form.doc3_director_id.clone(),
        doc3_address_proof: form.doc3_address_proof.clone(),
    })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<&DealSubmission> for Deal {
    /// The deal record a submission becomes once listed, used to preview its
    /// metrics and profile before review.
    fn from(s: &DealSubmission) -> Self {
        Deal {
            name: non_blank(&s.business_name),
            country: non_blank(&s.country),
            registered_address: non_blank(&s.registered_address),
            status: Some("pending".to_string()),
            repayment_cadence: non_blank(&s.repayment_cadence),
            target_yield: Some(Loose::Number(s.target_yield)),
            tenor_months: Some(Loose::Number(s.tenor_months)),
            facility_size: Some(Loose::Number(s.facility_size)),
            revenue: Some(Loose::Number(s.revenue)),
            expenses: Some(Loose::Number(s.expenses)),
            burn_rate: Some(Loose::Number(s.burn_rate)),
            cash: Some(Loose::Number(s.cash)),
            customers: Some(Loose::Number(s.customers)),
            churn_rate: Some(Loose::Number(s.churn_rate)),
            acquisition_cost: Some(Loose::Number(s.acquisition_cost)),
            lifetime_value: Some(Loose::Number(s.lifetime_value)),
            ..Deal::default()
        }
    }
}
