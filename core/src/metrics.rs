//! Portfolio-level dashboard metrics.
//!
//! Every figure is derived by scoring each customer with the risk scorer;
//! nothing here is hardcoded.

use crate::{
    customer::Customer,
    scorer::{self, ChurnAssessment, RiskLevel},
};
use serde::{Deserialize, Serialize};

pub const BUCKET_RETAINED: &str = "Retained";
pub const BUCKET_AT_RISK: &str = "At Risk";
pub const BUCKET_HIGH_RISK: &str = "High Risk";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub low:      usize,
    pub medium:   usize,
    pub high:     usize,
    pub critical: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: RiskLevel) {
        *self.slot(level) += 1;
    }

    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low      => self.low,
            RiskLevel::Medium   => self.medium,
            RiskLevel::High     => self.high,
            RiskLevel::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }

    fn slot(&mut self, level: RiskLevel) -> &mut usize {
        match level {
            RiskLevel::Low      => &mut self.low,
            RiskLevel::Medium   => &mut self.medium,
            RiskLevel::High     => &mut self.high,
            RiskLevel::Critical => &mut self.critical,
        }
    }
}

impl FromIterator<RiskLevel> for LevelCounts {
    fn from_iter<I: IntoIterator<Item = RiskLevel>>(iter: I) -> Self {
        let mut counts = LevelCounts::default();
        for level in iter {
            counts.record(level);
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBucket {
    pub name:  String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub active_subscribers: usize,
    /// Mean churn probability in percent, one decimal.
    pub current_churn_rate: f64,
    pub revenue_at_risk:    f64,
    pub risk_distribution:  Vec<RiskBucket>,
    pub level_counts:       LevelCounts,
}

impl PortfolioMetrics {
    /// `high_risk_levels` selects whose monthly bill counts toward
    /// revenue at risk.
    pub fn compute(customers: &[Customer], high_risk_levels: &[RiskLevel]) -> Self {
        let scored: Vec<(f64, ChurnAssessment)> = customers
            .iter()
            .map(|c| (c.monthly_bill, scorer::assess(&c.record())))
            .collect();
        Self::from_assessments(scored.iter().map(|(bill, a)| (*bill, a)), high_risk_levels)
    }

    /// Aggregate already-scored `(monthly_bill, assessment)` pairs.
    pub fn from_assessments<'a>(
        scored: impl IntoIterator<Item = (f64, &'a ChurnAssessment)>,
        high_risk_levels: &[RiskLevel],
    ) -> Self {
        let mut level_counts = LevelCounts::default();
        let mut probability_sum: i64 = 0;
        let mut revenue_at_risk = 0.0;
        let mut count = 0usize;

        for (monthly_bill, assessment) in scored {
            count += 1;
            level_counts.record(assessment.risk_level);
            probability_sum += i64::from(assessment.churn_probability);
            if high_risk_levels.contains(&assessment.risk_level) {
                revenue_at_risk += monthly_bill;
            }
        }

        let current_churn_rate = if count == 0 {
            0.0
        } else {
            let mean = probability_sum as f64 / count as f64;
            (mean * 10.0).round() / 10.0
        };

        let risk_distribution = vec![
            RiskBucket { name: BUCKET_RETAINED.into(),  value: level_counts.low },
            RiskBucket { name: BUCKET_AT_RISK.into(),   value: level_counts.medium },
            RiskBucket {
                name:  BUCKET_HIGH_RISK.into(),
                value: level_counts.high + level_counts.critical,
            },
        ];

        Self {
            active_subscribers: count,
            current_churn_rate,
            revenue_at_risk,
            risk_distribution,
            level_counts,
        }
    }
}
