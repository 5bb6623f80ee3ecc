//! Deal browsing: filtering, ordering and card rendering for the deal list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::deal::Deal;
use crate::domain::deal_profile::{normalize_status, status_meta, DEFAULT_DEAL_NAME};
use crate::domain::format::{format_currency, format_percent};

/// Filter value meaning "no restriction" for status and region.
pub const ALL: &str = "All";

/// Status filter choices. Matching is case-insensitive.
pub const STATUS_OPTIONS: [&str; 5] = [ALL, "Active", "Pending", "Review", "Offline"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealFilter {
    pub status: Option<String>,
    pub region: Option<String>,
    pub min_yield: Option<f64>,
    pub max_tenor: Option<f64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Input order.
    #[default]
    Featured,
    YieldDesc,
    YieldAsc,
    TenorAsc,
    TenorDesc,
    UtilizedDesc,
    UtilizedAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 7] = [
        SortOrder::Featured,
        SortOrder::YieldDesc,
        SortOrder::YieldAsc,
        SortOrder::TenorAsc,
        SortOrder::TenorDesc,
        SortOrder::UtilizedDesc,
        SortOrder::UtilizedAsc,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortOrder::Featured => "featured",
            SortOrder::YieldDesc => "yield-desc",
            SortOrder::YieldAsc => "yield-asc",
            SortOrder::TenorAsc => "tenor-asc",
            SortOrder::TenorDesc => "tenor-desc",
            SortOrder::UtilizedDesc => "utilized-desc",
            SortOrder::UtilizedAsc => "utilized-asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Featured => "Featured",
            SortOrder::YieldDesc => "Yield ↓",
            SortOrder::YieldAsc => "Yield ↑",
            SortOrder::TenorAsc => "Tenor ↑",
            SortOrder::TenorDesc => "Tenor ↓",
            SortOrder::UtilizedDesc => "Utilized ↓",
            SortOrder::UtilizedAsc => "Utilized ↑",
        }
    }

    fn compare(self, a: &Deal, b: &Deal) -> Ordering {
        match self {
            SortOrder::Featured => Ordering::Equal,
            SortOrder::YieldDesc => b.yield_value().total_cmp(&a.yield_value()),
            SortOrder::YieldAsc => a.yield_value().total_cmp(&b.yield_value()),
            SortOrder::TenorAsc => a.tenor_months().cmp(&b.tenor_months()),
            SortOrder::TenorDesc => b.tenor_months().cmp(&a.tenor_months()),
            SortOrder::UtilizedDesc => b.utilized_value().total_cmp(&a.utilized_value()),
            SortOrder::UtilizedAsc => a.utilized_value().total_cmp(&b.utilized_value()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}' (expected one of: featured, yield-desc, yield-asc, tenor-asc, tenor-desc, utilized-desc, utilized-asc)")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortOrder::ALL
            .into_iter()
            .find(|order| order.key() == wanted)
            .ok_or_else(|| UnknownSortOrder(s.to_string()))
    }
}

/// Card shown for one deal in the browse list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealCard {
    pub id: Option<String>,
    pub name: String,
    pub sector: Option<String>,
    pub location: String,
    pub status: String,
    pub risk: String,
    pub amount_display: String,
    pub yield_display: String,
    pub tenor_display: String,
    pub href: String,
}

impl DealCard {
    pub fn from_deal(deal: &Deal) -> Self {
        DealCard {
            id: deal.id.clone(),
            name: deal
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_DEAL_NAME.to_string()),
            sector: deal.sector.clone(),
            location: deal.location().to_string(),
            status: status_meta(deal.status.as_deref()).label,
            risk: deal.risk_label().to_string(),
            amount_display: format_currency(deal.utilized_value()),
            yield_display: format_percent(deal.yield_value(), 1),
            tenor_display: format!("{} months", deal.tenor_months()),
            href: deal.href.clone().unwrap_or_else(|| match &deal.id {
                Some(id) => format!("/deals/{id}"),
                None => "/deals".to_string(),
            }),
        }
    }
}

/// Region choices for the current deal list: `All`, then each distinct
/// location in first-seen order.
pub fn region_options(deals: &[Deal]) -> Vec<String> {
    let mut regions = vec![ALL.to_string()];
    for deal in deals {
        let location = deal.location();
        if !regions.iter().any(|r| r == location) {
            regions.push(location.to_string());
        }
    }
    regions
}

/// Apply `filter` and `sort` to `deals`.
///
/// A status outside [`STATUS_OPTIONS`] and a region that is not among
/// [`region_options`] for this list are ignored.
/// Sorting is stable, so ties keep their input order.
pub fn select_deals<'a>(deals: &'a [Deal], filter: &DealFilter, sort: SortOrder) -> Vec<&'a Deal> {
    let status = filter
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| {
            !s.eq_ignore_ascii_case(ALL)
                && STATUS_OPTIONS.iter().any(|known| known.eq_ignore_ascii_case(s))
        })
        .map(|s| normalize_status(Some(s)));

    let regions = region_options(deals);
    let region = filter
        .region
        .as_deref()
        .filter(|r| *r != ALL && regions.iter().any(|known| known == r))
        .map(str::to_lowercase);

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<&Deal> = deals
        .iter()
        .filter(|d| {
            status
                .as_ref()
                .is_none_or(|s| normalize_status(d.status.as_deref()) == *s)
        })
        .filter(|d| {
            region
                .as_ref()
                .is_none_or(|r| d.location().to_lowercase() == *r)
        })
        .filter(|d| filter.min_yield.is_none_or(|min| d.yield_value() >= min))
        .filter(|d| filter.max_tenor.is_none_or(|max| f64::from(d.tenor_months()) <= max))
        .filter(|d| search.as_ref().is_none_or(|q| matches_search(d, q)))
        .collect();

    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}

fn matches_search(deal: &Deal, query: &str) -> bool {
    deal.display_name().to_lowercase().contains(query)
        || deal
            .sector
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(query)
        || deal.location().to_lowercase().contains(query)
}

pub fn browse_deals(deals: &[Deal], filter: &DealFilter, sort: SortOrder) -> Vec<DealCard> {
    select_deals(deals, filter, sort)
        .into_iter()
        .map(DealCard::from_deal)
        .collect()
}
