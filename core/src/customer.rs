//! Customer data model.
//!
//! `Customer` is the full directory entry. `CustomerRecord` is the
//! four-field projection the risk scorer reads; nothing else about a
//! customer influences the score.

use crate::{
    error::{ChurnError, ChurnResult},
    types::CustomerId,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// ── Contract ─────────────────────────────────────────────────────────────────

/// Billing commitment period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    Monthly,
    Yearly,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Monthly => "Monthly",
            ContractType::Yearly  => "Yearly",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = ChurnError;

    fn from_str(s: &str) -> ChurnResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(ContractType::Monthly),
            "yearly"  => Ok(ContractType::Yearly),
            other => Err(ChurnError::invalid(
                "contract_type",
                format!("expected Monthly or Yearly, got '{other}'"),
            )),
        }
    }
}

// ── Scoring input ────────────────────────────────────────────────────────────

/// The fields the risk scorer evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub contract_type:     ContractType,
    pub has_payment_issue: bool,
    pub tenure_months:     i64,
    pub monthly_bill:      f64,
}

impl CustomerRecord {
    pub fn new(
        contract_type: ContractType,
        has_payment_issue: bool,
        tenure_months: i64,
        monthly_bill: f64,
    ) -> Self {
        Self { contract_type, has_payment_issue, tenure_months, monthly_bill }
    }

    /// Range check for records entering from outside the crate.
    ///
    /// The scorer never calls this: it accepts any record and scores
    /// negative tenure as low tenure.
    pub fn validate(&self) -> ChurnResult<()> {
        if self.tenure_months < 0 {
            return Err(ChurnError::invalid(
                "tenure_months",
                format!("must be non-negative, got {}", self.tenure_months),
            ));
        }
        if !self.monthly_bill.is_finite() {
            return Err(ChurnError::invalid("monthly_bill", "must be a finite number"));
        }
        if self.monthly_bill < 0.0 {
            return Err(ChurnError::invalid(
                "monthly_bill",
                format!("must be non-negative, got {}", self.monthly_bill),
            ));
        }
        Ok(())
    }
}

// ── Directory entry ──────────────────────────────────────────────────────────

/// Plan tier, derived from the monthly bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanTier {
    Basic,
    Standard,
    Premium,
}

impl PlanTier {
    pub fn for_bill(monthly_bill: f64) -> Self {
        if monthly_bill > 90.0 {
            PlanTier::Premium
        } else if monthly_bill > 50.0 {
            PlanTier::Standard
        } else {
            PlanTier::Basic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Basic    => "Basic",
            PlanTier::Standard => "Standard",
            PlanTier::Premium  => "Premium",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw row of customer data, as embedded or read from a customer file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id:       CustomerId,
    pub tenure:   i64,
    pub monthly:  f64,
    pub contract: ContractType,
    pub issue:    bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id:            CustomerId,
    pub name:          String,
    pub email:         String,
    pub plan:          PlanTier,
    pub monthly_bill:  f64,
    pub tenure_months: i64,
    pub contract:      ContractType,
    pub payment_issue: bool,
    pub total_spend:   f64,
}

impl Customer {
    pub fn from_row(row: CustomerRow, name: &str) -> Self {
        Self {
            email:         format!("user{}@example.com", row.id),
            name:          name.to_string(),
            plan:          PlanTier::for_bill(row.monthly),
            monthly_bill:  row.monthly,
            tenure_months: row.tenure,
            contract:      row.contract,
            payment_issue: row.issue,
            total_spend:   row.monthly * row.tenure as f64,
            id:            row.id,
        }
    }

    pub fn record(&self) -> CustomerRecord {
        CustomerRecord {
            contract_type:     self.contract,
            has_payment_issue: self.payment_issue,
            tenure_months:     self.tenure_months,
            monthly_bill:      self.monthly_bill,
        }
    }
}
