//! Payout history CSV export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::error::DealdeskError;
use crate::domain::payouts::PayoutHistory;

#[derive(Debug, Serialize)]
struct PayoutRecord<'a> {
    cycle: String,
    date: &'a str,
    principal: f64,
    #[serde(rename = "yield")]
    yield_amount: f64,
    status: &'a str,
}

/// Write one CSV row per payout, with a header, to `writer`. Amounts are
/// written as plain numbers and dates as exported.
pub fn write_payouts<W: Write>(history: &PayoutHistory, writer: W) -> Result<(), DealdeskError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if history.payouts.is_empty() {
        wtr.write_record(["cycle", "date", "principal", "yield", "status"])?;
    }
    for (idx, payout) in history.payouts.iter().enumerate() {
        wtr.serialize(PayoutRecord {
            cycle: payout.cycle_label(idx),
            date: payout.date.as_deref().unwrap_or(""),
            principal: payout.principal_value(),
            yield_amount: payout.yield_value(),
            status: payout.status_label(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_payouts(history: &PayoutHistory, path: &Path) -> Result<(), DealdeskError> {
    let file = File::create(path)?;
    write_payouts(history, file)?;
    info!(
        "wrote {} payouts to {}",
        history.payouts.len(),
        path.display()
    );
    Ok(())
}
