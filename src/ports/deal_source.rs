//! Deal data access port trait.

use crate::domain::activity::ActivityLog;
use crate::domain::deal::Deal;
use crate::domain::error::DealdeskError;
use crate::domain::payouts::PayoutHistory;

pub trait DealSource {
    /// Every deal in the marketplace export, in listing order.
    fn list_deals(&self) -> Result<Vec<Deal>, DealdeskError>;

    /// A single deal by id. The default scans [`DealSource::list_deals`].
    fn fetch_deal(&self, id: &str) -> Result<Deal, DealdeskError> {
        self.list_deals()?
            .into_iter()
            .find(|deal| deal.id.as_deref() == Some(id))
            .ok_or_else(|| DealdeskError::DealNotFound { id: id.to_string() })
    }

    fn fetch_payouts(&self, deal_id: &str) -> Result<PayoutHistory, DealdeskError>;

    fn fetch_activity(&self) -> Result<Vec<ActivityLog>, DealdeskError>;
}
