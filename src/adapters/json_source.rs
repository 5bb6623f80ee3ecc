//! JSON export directory adapter.
//!
//! Layout of the data directory:
//!
//! ```text
//! deals.json              array of deals, or {"deals": [...]}
//! payouts/<deal_id>.json  {"deal": {...}, "payouts": [...], "totals": {...}}
//! activity.json           array of logs, or {"logs": [...]}
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::activity::ActivityLog;
use crate::domain::deal::Deal;
use crate::domain::error::DealdeskError;
use crate::domain::payouts::PayoutHistory;
use crate::ports::deal_source::DealSource;

pub struct JsonDirSource {
    base_path: PathBuf,
}

impl JsonDirSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn payouts_path(&self, deal_id: &str) -> Result<PathBuf, DealdeskError> {
        let id = deal_id.trim();
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(DealdeskError::DataSource {
                reason: format!("invalid deal id '{deal_id}'"),
            });
        }
        Ok(self.base_path.join("payouts").join(format!("{id}.json")))
    }

    /// Parsed JSON document at `path`, or `None` when the file does not exist.
    fn read_document(&self, path: &Path) -> Result<Option<Value>, DealdeskError> {
        debug!("reading {}", path.display());
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DealdeskError::DataSource {
                    reason: format!("failed to read {}: {}", path.display(), e),
                })
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| DealdeskError::DataSource {
                reason: format!("invalid JSON in {}: {}", path.display(), e),
            })
    }
}

/// Records from a document that is either a bare array or an object wrapping
/// the array under `key`. Entries that are not objects are skipped.
fn collect_records<T: DeserializeOwned>(
    document: Value,
    key: &str,
    path: &Path,
) -> Result<Vec<T>, DealdeskError> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(DealdeskError::DataSource {
                    reason: format!("'{}' in {} is not an array", key, path.display()),
                })
            }
        },
        _ => {
            return Err(DealdeskError::DataSource {
                reason: format!("{} must hold an array or an object", path.display()),
            })
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!("skipping {} entry {}: not an object", path.display(), idx);
            continue;
        }
        match serde_json::from_value(entry) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping {} entry {}: {}", path.display(), idx, e),
        }
    }
    Ok(records)
}

impl DealSource for JsonDirSource {
    fn list_deals(&self) -> Result<Vec<Deal>, DealdeskError> {
        let path = self.base_path.join("deals.json");
        let document = self
            .read_document(&path)?
            .ok_or_else(|| DealdeskError::DataSource {
                reason: format!("{} not found", path.display()),
            })?;
        let deals: Vec<Deal> = collect_records(document, "deals", &path)?;
        debug!("loaded {} deals", deals.len());
        Ok(deals)
    }

    fn fetch_payouts(&self, deal_id: &str) -> Result<PayoutHistory, DealdeskError> {
        let path = self.payouts_path(deal_id)?;
        match self.read_document(&path)? {
            Some(document @ Value::Object(_)) => {
                serde_json::from_value(document).map_err(|e| DealdeskError::DataSource {
                    reason: format!("invalid payout history in {}: {}", path.display(), e),
                })
            }
            Some(document @ Value::Array(_)) => Ok(PayoutHistory {
                payouts: collect_records(document, "payouts", &path)?,
                ..PayoutHistory::default()
            }),
            Some(_) => Err(DealdeskError::DataSource {
                reason: format!("{} must hold an array or an object", path.display()),
            }),
            None => {
                debug!("no payout history for {}", deal_id);
                Ok(PayoutHistory::default())
            }
        }
    }

    fn fetch_activity(&self) -> Result<Vec<ActivityLog>, DealdeskError> {
        let path = self.base_path.join("activity.json");
        match self.read_document(&path)? {
            Some(document) => collect_records(document, "logs", &path),
            None => {
                debug!("no activity log at {}", path.display());
                Ok(Vec::new())
            }
        }
    }
}
