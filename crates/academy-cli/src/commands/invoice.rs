//! The `academy invoice` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;

use academy_core::config::load_config_from;
use academy_core::invoice::{BillingPeriod, Invoice, InvoiceHeader, LineItem};

pub struct InvoiceArgs {
    pub number: String,
    pub date: Option<NaiveDate>,
    pub billed_to: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub coaching_sessions: Option<u32>,
    pub rate: Option<f64>,
    pub tournament: Option<f64>,
    pub items: Vec<String>,
    pub notes: String,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: InvoiceArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let invoice_date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let header = InvoiceHeader {
        invoice_number: args.number,
        invoice_date,
        billed_to: args.billed_to,
        billing_period: BillingPeriod {
            from: args.from.unwrap_or(invoice_date),
            to: args.to.unwrap_or(invoice_date),
        },
        notes: args.notes,
    };

    let invoice = if args.items.is_empty() {
        Invoice::coaching(
            header,
            args.coaching_sessions.unwrap_or(0),
            args.rate.unwrap_or(0.0),
            args.tournament.unwrap_or(0.0),
            &config,
        )?
    } else {
        let mut items = Vec::new();
        if args.coaching_sessions.is_some() || args.rate.is_some() {
            items.push(LineItem::per_session(
                &config.coaching_description,
                args.coaching_sessions.unwrap_or(0),
                args.rate.unwrap_or(0.0),
            ));
        }
        if let Some(amount) = args.tournament {
            items.push(LineItem::flat(&config.tournament_description, amount));
        }
        for raw in &args.items {
            items.push(LineItem::parse(raw)?);
        }
        Invoice::new(header, items)?
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&invoice)?),
        "text" => print!("{}", invoice.to_text(&config.organisation)),
        other => bail!("unknown format '{other}' (expected text or json)"),
    }

    if let Some(path) = args.output {
        invoice.save_json(&path)?;
        eprintln!("Invoice saved to: {}", path.display());
    }

    Ok(())
}
