//! Heuristic churn risk scorer.
//!
//! A fixed base score plus point deltas from four threshold checks,
//! upper-clamped and bucketed into a risk level. Pure: no I/O, no RNG,
//! no shared state. Safe to call from any thread.
//!
//! Factor order is part of the contract. Callers display the list in
//! return order, so rules are evaluated contract → payment → tenure → bill.

use crate::customer::{ContractType, CustomerRecord};
use crate::error::{ChurnError, ChurnResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const BASE_SCORE: i32 = 10;
pub const MAX_PROBABILITY: i32 = 99;

pub const LOW_TENURE_MONTHS: i64 = 6;
pub const LOYAL_TENURE_MONTHS: i64 = 24;
pub const HIGH_BILL_THRESHOLD: f64 = 100.0;

pub const FACTOR_MONTHLY_CONTRACT: &str = "Month-to-Month Contract";
pub const FACTOR_PAYMENT_ISSUES: &str = "History of Payment Issues";
pub const FACTOR_LOW_TENURE: &str = "Low Tenure (< 6 months)";
pub const FACTOR_HIGH_BILL: &str = "High Monthly Cost";

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Bucket a probability. Thresholds are strict, so a boundary value
    /// (80, 60, 30) lands in the next lower bucket.
    pub fn from_probability(probability: i32) -> Self {
        if probability > 80 {
            RiskLevel::Critical
        } else if probability > 60 {
            RiskLevel::High
        } else if probability > 30 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low      => "Low",
            RiskLevel::Medium   => "Medium",
            RiskLevel::High     => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ChurnError;

    fn from_str(s: &str) -> ChurnResult<Self> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChurnError::invalid("risk_level", format!("unknown level '{s}'")))
    }
}

/// A labeled reason contributing to the churn probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor:       String,
    /// 1–10, higher is more influential.
    pub impact_score: u8,
}

impl RiskFactor {
    pub fn new(factor: &str, impact_score: u8) -> Self {
        Self { factor: factor.to_string(), impact_score }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnAssessment {
    pub churn_probability: i32,
    pub risk_level:        RiskLevel,
    pub risk_factors:      Vec<RiskFactor>,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Score one customer record.
pub fn assess(customer: &CustomerRecord) -> ChurnAssessment {
    let mut score = BASE_SCORE;
    let mut risk_factors = Vec::new();

    // Contract type
    if customer.contract_type == ContractType::Monthly {
        score += 40;
        risk_factors.push(RiskFactor::new(FACTOR_MONTHLY_CONTRACT, 8));
    }

    // Payment history
    if customer.has_payment_issue {
        score += 30;
        risk_factors.push(RiskFactor::new(FACTOR_PAYMENT_ISSUES, 9));
    }

    // Tenure. The loyalty discount carries no factor label.
    if customer.tenure_months < LOW_TENURE_MONTHS {
        score += 15;
        risk_factors.push(RiskFactor::new(FACTOR_LOW_TENURE, 6));
    } else if customer.tenure_months > LOYAL_TENURE_MONTHS {
        score -= 10;
    }

    // Monthly bill
    if customer.monthly_bill > HIGH_BILL_THRESHOLD {
        score += 10;
        risk_factors.push(RiskFactor::new(FACTOR_HIGH_BILL, 5));
    }

    // Upper clamp only; a loyal yearly customer legitimately scores 0.
    let churn_probability = score.min(MAX_PROBABILITY);

    ChurnAssessment {
        churn_probability,
        risk_level: RiskLevel::from_probability(churn_probability),
        risk_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds_are_strict_greater() {
        assert_eq!(RiskLevel::from_probability(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(30), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(31), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(61), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(80), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(81), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_probability(99), RiskLevel::Critical);
    }

    #[test]
    fn risk_level_round_trips_through_str() {
        for level in RiskLevel::ALL {
            assert_eq!(level.as_str().parse::<RiskLevel>().unwrap(), level);
        }
        assert_eq!("critical".parse::<RiskLevel>().unwrap(), RiskLevel::Critical);
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn negative_tenure_scores_as_low_tenure() {
        let record = CustomerRecord::new(ContractType::Yearly, false, -4, 20.0);
        let a = assess(&record);
        assert_eq!(a.churn_probability, 25);
        assert_eq!(a.risk_factors, vec![RiskFactor::new(FACTOR_LOW_TENURE, 6)]);
    }

    #[test]
    fn tenure_boundaries_trigger_nothing() {
        for tenure in [6, 24] {
            let a = assess(&CustomerRecord::new(ContractType::Yearly, false, tenure, 50.0));
            assert_eq!(a.churn_probability, BASE_SCORE, "tenure={tenure}");
            assert!(a.risk_factors.is_empty());
        }
    }

    #[test]
    fn bill_of_exactly_100_is_not_high() {
        let a = assess(&CustomerRecord::new(ContractType::Yearly, false, 12, 100.0));
        assert!(a.risk_factors.is_empty());
    }
}
