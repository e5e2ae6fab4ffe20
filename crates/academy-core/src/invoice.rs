//! Billing invoices.
//!
//! Two shapes are supported: the coaching invoice (sessions × rate plus a
//! tournament fee) and the free-form invoice with arbitrary line items.
//! Both carry the total in figures and in words.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AcademyConfig, Organisation};
use crate::error::AcademyError;
use crate::words::amount_in_words;

/// One billed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Number of sessions, for per-session lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u32>,
    /// Rate per session, for per-session lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    pub amount: f64,
}

impl LineItem {
    /// A per-session line: `amount = sessions × rate`.
    pub fn per_session(description: impl Into<String>, sessions: u32, rate: f64) -> Self {
        Self {
            description: description.into(),
            sessions: Some(sessions),
            rate: Some(rate),
            amount: f64::from(sessions) * rate,
        }
    }

    /// A fixed-amount line.
    pub fn flat(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            sessions: None,
            rate: None,
            amount,
        }
    }

    /// Parse `"description=amount"`, splitting on the last `=`.
    pub fn parse(raw: &str) -> Result<Self, AcademyError> {
        let invalid = || AcademyError::InvalidLineItem(raw.to_string());
        let (description, amount) = raw.rsplit_once('=').ok_or_else(invalid)?;
        let amount: f64 = amount.trim().parse().map_err(|_| invalid())?;
        if !amount.is_finite() {
            return Err(invalid());
        }
        Ok(Self::flat(description.trim(), amount))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// A complete invoice, serialized in the payload shape the print view uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billed_to: Option<String>,
    pub billing_period: BillingPeriod,
    pub line_items: Vec<LineItem>,
    pub total_amount: f64,
    pub amount_in_words: String,
    #[serde(default)]
    pub notes: String,
}

/// Header fields shared by both invoice shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub billed_to: Option<String>,
    pub billing_period: BillingPeriod,
    pub notes: String,
}

impl InvoiceHeader {
    /// Header dated `today` with a one-day billing period.
    pub fn dated(today: NaiveDate) -> Self {
        Self {
            invoice_number: String::new(),
            invoice_date: today,
            billed_to: None,
            billing_period: BillingPeriod {
                from: today,
                to: today,
            },
            notes: String::new(),
        }
    }
}

impl Invoice {
    /// Build an invoice from free-form line items.
    pub fn new(header: InvoiceHeader, line_items: Vec<LineItem>) -> Result<Self, AcademyError> {
        let sum: f64 = line_items.iter().map(|i| i.amount).sum();
        // Paise precision, so the figure and the words agree.
        let total_amount = (sum * 100.0).round() / 100.0;
        let amount_in_words = amount_in_words(total_amount)?;
        tracing::debug!(
            number = %header.invoice_number,
            total = total_amount,
            items = line_items.len(),
            "invoice assembled"
        );
        Ok(Self {
            id: Uuid::new_v4(),
            invoice_number: header.invoice_number,
            invoice_date: header.invoice_date,
            billed_to: header.billed_to,
            billing_period: header.billing_period,
            line_items,
            total_amount,
            amount_in_words,
            notes: header.notes,
        })
    }

    /// Coaching invoice: `sessions × rate` coaching plus a tournament fee.
    pub fn coaching(
        header: InvoiceHeader,
        sessions: u32,
        rate: f64,
        tournament_amount: f64,
        config: &AcademyConfig,
    ) -> Result<Self, AcademyError> {
        let items = vec![
            LineItem::per_session(&config.coaching_description, sessions, rate),
            LineItem::flat(&config.tournament_description, tournament_amount),
        ];
        Self::new(header, items)
    }

    /// Plain-text rendering for the console and for printing.
    pub fn to_text(&self, organisation: &Organisation) -> String {
        let mut out = String::new();
        out.push_str(&organisation.name);
        out.push('\n');
        for line in &organisation.address {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');

        out.push_str(&format!("Invoice No: {}\n", self.invoice_number));
        out.push_str(&format!("Invoice Date: {}\n", self.invoice_date));
        if let Some(billed_to) = &self.billed_to {
            out.push_str(&format!("Billed To: {billed_to}\n"));
        }
        out.push_str(&format!(
            "Billing Period: {} to {}\n\n",
            self.billing_period.from, self.billing_period.to
        ));

        for item in &self.line_items {
            match (item.sessions, item.rate) {
                (Some(sessions), Some(rate)) => out.push_str(&format!(
                    "  {} ({} x {}): {}\n",
                    item.description,
                    sessions,
                    format_amount(rate),
                    format_amount(item.amount)
                )),
                _ => out.push_str(&format!(
                    "  {}: {}\n",
                    item.description,
                    format_amount(item.amount)
                )),
            }
        }

        out.push_str(&format!("\nTotal: {}\n", format_amount(self.total_amount)));
        out.push_str(&format!("Amount in words: {}\n", self.amount_in_words));
        if !self.notes.is_empty() {
            out.push_str(&format!("\nNotes: {}\n", self.notes));
        }
        out
    }

    /// Save the invoice payload as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize invoice")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write invoice to {}", path.display()))?;
        Ok(())
    }
}

/// Format an amount with Indian digit grouping, e.g. `12,34,567` or
/// `1,500.50`.
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let grouped = if whole.len() <= 3 {
        whole
    } else {
        let (head, last3) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{last3}", groups.join(","))
    };

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction:02}")
    }
}
