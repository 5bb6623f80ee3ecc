//! CLI definition and dispatch.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use crate::adapters::csv_export::export_payouts;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_source::JsonDirSource;
use crate::domain::account::Account;
use crate::domain::activity::{activity_heading, present_activity};
use crate::domain::browse::{browse_deals, DealFilter, SortOrder};
use crate::domain::config_validation::validate_config;
use crate::domain::deal::Deal;
use crate::domain::deal_profile::{build_deal_profile, DEFAULT_DEAL_NAME};
use crate::domain::error::DealdeskError;
use crate::domain::format::{format_metric_value, MetricKind, PLACEHOLDER};
use crate::domain::metrics::{compute_financial_metrics, DerivedMetrics};
use crate::domain::payouts::summarize_payouts;
use crate::domain::submission::{validate_submission, FinancialField, SubmissionForm, WizardStep};
use crate::logging::init_logger;
use crate::ports::config_port::ConfigPort;
use crate::ports::deal_source::DealSource;

#[derive(Parser, Debug)]
#[command(name = "dealdesk", about = "Deal analytics for an MSME lending marketplace")]
pub struct Cli {
    /// Increase log verbosity
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// INI config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding deals.json, payouts/ and activity.json
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show financial-health metrics for a deal
    Metrics {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the display profile of a deal
    Profile {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// List deals with filters and ordering
    Browse {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        min_yield: Option<f64>,
        #[arg(long)]
        max_tenor: Option<f64>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<SortOrder>,
        #[arg(long)]
        json: bool,
    },
    /// Show the payout history of a deal
    Payouts {
        deal_id: String,
        /// Also write the history as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show investor activity logs
    Activity {
        /// Account holder shown in the heading
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Validate a deal submission form
    CheckSubmission {
        /// INI file with [business], [contact], [terms], [financials] and [documents]
        form: PathBuf,
        /// Account JSON export of the submitting user
        #[arg(long)]
        account: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(config) => config,
        Err(e) => {
            init_logger(cli.verbose > 0, None);
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let filter = config
        .as_ref()
        .and_then(|c| c.get_string("logging", "filter"));
    init_logger(cli.verbose > 0, filter.as_deref());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(&cli, config.as_ref().map(|c| c as &dyn ConfigPort), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DealdeskError> {
    FileConfigAdapter::from_file(path).map_err(|e| DealdeskError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Data directory: `--data`, then `[data] dir`, then the working directory.
pub fn resolve_data_dir(cli_data: Option<&Path>, config: Option<&dyn ConfigPort>) -> PathBuf {
    cli_data
        .map(Path::to_path_buf)
        .or_else(|| {
            config
                .and_then(|c| c.get_string("data", "dir"))
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn execute(
    cli: &Cli,
    config: Option<&dyn ConfigPort>,
    out: &mut dyn Write,
) -> Result<(), DealdeskError> {
    if let Some(config) = config {
        validate_config(config)?;
    }
    let source = JsonDirSource::new(resolve_data_dir(cli.data.as_deref(), config));
    debug!("data directory {}", source.base_path().display());
    run_command(&cli.command, &source, config, out)
}

/// Dispatch one subcommand against `source`, writing its report to `out`.
pub fn run_command(
    command: &Command,
    source: &dyn DealSource,
    config: Option<&dyn ConfigPort>,
    out: &mut dyn Write,
) -> Result<(), DealdeskError> {
    let json_default = config.is_some_and(|c| c.get_bool("output", "json", false));

    match command {
        Command::Metrics { id, json } => {
            let deal = source.fetch_deal(id)?;
            let metrics = compute_financial_metrics(&deal);
            if *json || json_default {
                write_json(out, &metrics)
            } else {
                write_metrics(out, &deal, &metrics)
            }
        }
        Command::Profile { id, json } => {
            let profile = build_deal_profile(&source.fetch_deal(id)?);
            if *json || json_default {
                return write_json(out, &profile);
            }
            writeln!(out, "{} [{}]", profile.name, profile.status_meta.label)?;
            writeln!(out, "{} · {}", profile.sector, profile.location)?;
            line(out, "Risk", &profile.risk_label)?;
            line(out, "Facility size", &profile.facility_size)?;
            line(
                out,
                "Utilized",
                profile.utilized_label.as_deref().unwrap_or(PLACEHOLDER),
            )?;
            line(out, "Remaining capacity", &profile.remaining_capacity_label)?;
            line(out, "Target yield", &profile.target_yield)?;
            line(out, "Tenor", &profile.tenor_display)?;
            line(out, "Repayment cadence", &profile.repayment_cadence)?;
            line(out, "DSO", &profile.performance.dso)?;
            line(out, "Delinquency", &profile.performance.delinquency)?;
            line(out, "Realized MOIC", &profile.performance.realized_moic)?;
            line(out, "Utilization", &profile.performance.utilization)?;
            let controls = profile.risk_controls;
            line(out, "KYC verified", yes_no(controls.kyc))?;
            line(out, "Payout monitoring", yes_no(controls.payout_monitoring))?;
            line(out, "Diversification", yes_no(controls.diversification))?;
            if !profile.cashflows.is_empty() {
                writeln!(out, "Cashflows")?;
                for row in &profile.cashflows {
                    writeln!(
                        out,
                        "  {:<10} {:<14} {:>12}  {}",
                        row.cycle, row.date, row.amount, row.status
                    )?;
                }
            }
            Ok(())
        }
        Command::Browse {
            status,
            region,
            min_yield,
            max_tenor,
            search,
            sort,
            json,
        } => {
            let filter = DealFilter {
                status: status.clone(),
                region: region.clone(),
                min_yield: min_yield.or_else(|| config_number(config, "min_yield")),
                max_tenor: max_tenor.or_else(|| config_number(config, "max_tenor")),
                search: search.clone(),
            };
            let sort = match sort {
                Some(sort) => *sort,
                None => config_sort(config)?,
            };
            let deals = source.list_deals()?;
            let cards = browse_deals(&deals, &filter, sort);
            info!("{} of {} deals match", cards.len(), deals.len());
            if *json || json_default {
                return write_json(out, &cards);
            }
            writeln!(out, "{} deals ({})", cards.len(), sort.label())?;
            for card in &cards {
                writeln!(
                    out,
                    "  {:<28} {:<8} {:>7} {:>10} {:>12}  {}",
                    card.name,
                    card.status,
                    card.yield_display,
                    card.tenor_display,
                    card.amount_display,
                    card.location
                )?;
            }
            Ok(())
        }
        Command::Payouts { deal_id, csv, json } => {
            let history = source.fetch_payouts(deal_id)?;
            if let Some(path) = csv {
                export_payouts(&history, path)?;
            }
            let statement = summarize_payouts(&history);
            if *json || json_default {
                return write_json(out, &statement);
            }
            writeln!(out, "{}", statement.title)?;
            line(out, "Total principal", &statement.total_principal)?;
            line(out, "Total yield", &statement.total_yield)?;
            line(out, "Payouts", &statement.payout_count.to_string())?;
            for row in &statement.rows {
                writeln!(
                    out,
                    "  {:<10} {:<14} {:>12} {:>12}  {}",
                    row.cycle, row.date, row.principal, row.yield_amount, row.status
                )?;
            }
            Ok(())
        }
        Command::Activity { name, json } => {
            let rows = present_activity(&source.fetch_activity()?);
            if *json || json_default {
                return write_json(out, &rows);
            }
            writeln!(out, "{}", activity_heading(name.as_deref()))?;
            for row in &rows {
                writeln!(
                    out,
                    "  {:<14} {:<20} {:<6}  {}",
                    row.date, row.title, row.direction, row.detail
                )?;
            }
            Ok(())
        }
        Command::CheckSubmission {
            form,
            account,
            json,
        } => {
            let account = match account {
                Some(path) => load_account(path)?,
                None => Account::default(),
            };
            let form_config = load_config(form)?;
            let form = build_submission_form(&form_config, &account);

            for step in WizardStep::ALL {
                if !form.can_advance(step) {
                    debug!("step {} ({}) incomplete", step.number(), step.title());
                }
            }
            let submission = validate_submission(&form, &account)?;
            info!("submission for '{}' is valid", submission.business_name);

            if *json || json_default {
                return write_json(out, &submission);
            }
            writeln!(out, "Submission ready for review")?;
            line(out, "Business", &submission.business_name)?;
            line(out, "Location", form.location_summary())?;
            line(out, "Contact", &form.contact_summary())?;
            line(out, "Documents", &form.doc_summary())?;
            let preview = Deal::from(&submission);
            write_metrics(out, &preview, &compute_financial_metrics(&preview))
        }
    }
}

/// Wizard form from an INI file. Missing keys keep the form defaults.
pub fn build_submission_form(config: &dyn ConfigPort, account: &Account) -> SubmissionForm {
    let mut form = SubmissionForm::for_account(account);
    let set = |slot: &mut String, section: &str, key: &str| {
        if let Some(value) = config.get_string(section, key) {
            *slot = value;
        }
    };

    set(&mut form.business_name, "business", "name");
    set(&mut form.registered_address, "business", "registered_address");
    set(&mut form.country, "business", "country");
    set(&mut form.website, "business", "website");
    set(&mut form.contact_name, "contact", "name");
    set(&mut form.contact_email, "contact", "email");
    set(&mut form.contact_phone, "contact", "phone");
    set(&mut form.target_yield, "terms", "target_yield");
    set(&mut form.tenor_months, "terms", "tenor_months");
    set(&mut form.facility_size, "terms", "facility_size");
    set(&mut form.repayment_cadence, "terms", "repayment_cadence");
    set(&mut form.doc1, "documents", "incorporation");
    set(&mut form.doc2, "documents", "bank_statements");
    set(&mut form.doc3_director_id, "documents", "director_id");
    set(&mut form.doc3_address_proof, "documents", "address_proof");

    for field in FinancialField::ALL {
        if let Some(value) = config.get_string("financials", field.key()) {
            form.set_financial(field, value);
        }
    }
    form
}

fn load_account(path: &Path) -> Result<Account, DealdeskError> {
    debug!("reading account {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn config_number(config: Option<&dyn ConfigPort>, key: &str) -> Option<f64> {
    config
        .and_then(|c| c.get_string("browse", key))
        .and_then(|raw| raw.trim().parse::<f64>().ok())
}

fn config_sort(config: Option<&dyn ConfigPort>) -> Result<SortOrder, DealdeskError> {
    match config.and_then(|c| c.get_string("browse", "sort")) {
        Some(raw) => raw
            .parse::<SortOrder>()
            .map_err(|e| DealdeskError::ConfigInvalid {
                section: "browse".to_string(),
                key: "sort".to_string(),
                reason: e.to_string(),
            }),
        None => Ok(SortOrder::default()),
    }
}

fn write_metrics(
    out: &mut dyn Write,
    deal: &Deal,
    m: &DerivedMetrics,
) -> Result<(), DealdeskError> {
    use MetricKind::{Currency, Months, Percent, Ratio};

    writeln!(
        out,
        "{} · Financial health",
        deal.name.as_deref().unwrap_or(DEFAULT_DEAL_NAME)
    )?;
    metric(out, "Total revenue", Some(m.total_revenue), Currency)?;
    metric(out, "Total expenses", Some(m.total_expenses), Currency)?;
    metric(out, "Net profit/loss", Some(m.net_profit_loss), Currency)?;
    metric(out, "Profit margin", m.profit_margin, Percent)?;
    metric(out, "Expense ratio", m.expense_ratio, Percent)?;
    metric(out, "Runway", m.runway_months, Months)?;
    line(
        out,
        "Survival probability",
        &m.survival_probability
            .map(|p| format!("{p}%"))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    )?;
    line(out, "Profitability", m.profitability_health.label())?;
    metric(out, "LTV/CAC", m.ltv_cac_ratio, Ratio)?;
    line(out, "Marketing efficiency", m.marketing_efficiency.label())?;
    metric(out, "Customer growth", m.customer_growth_rate, Percent)?;
    line(out, "Growth status", m.growth_status.label())?;
    metric(out, "Average churn", m.avg_churn_rate, Percent)?;
    line(out, "Retention", m.retention_health.label())?;
    Ok(())
}

fn metric(
    out: &mut dyn Write,
    label: &str,
    value: Option<f64>,
    kind: MetricKind,
) -> io::Result<()> {
    line(out, label, &format_metric_value(value, kind))
}

fn line(out: &mut dyn Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {label:<22} {value}")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), DealdeskError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
