//! Portfolio scoring runs.
//!
//! A run scores every directory customer once and persists one
//! assessment per customer under a fresh run id. A run is written in one
//! transaction: it is stored whole or not at all.

use crate::{
    directory::CustomerDirectory,
    error::ChurnResult,
    metrics::{LevelCounts, PortfolioMetrics},
    scorer::{self, ChurnAssessment, RiskLevel},
    store::ChurnStore,
    types::{CustomerId, RunId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCustomer {
    pub customer_id:  CustomerId,
    pub name:         String,
    pub monthly_bill: f64,
    pub assessment:   ChurnAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRunSummary {
    pub run_id:       RunId,
    pub started_at:   DateTime<Utc>,
    pub scored:       usize,
    pub level_counts: LevelCounts,
}

#[derive(Debug, Clone)]
pub struct ScoringRun {
    pub summary: ScoringRunSummary,
    /// In directory order.
    pub results: Vec<ScoredCustomer>,
}

impl ScoringRun {
    /// The `n` riskiest customers, ties broken by customer id.
    pub fn top_risks(&self, n: usize) -> Vec<&ScoredCustomer> {
        let mut ranked: Vec<&ScoredCustomer> = self.results.iter().collect();
        ranked.sort_by(|a, b| {
            b.assessment
                .churn_probability
                .cmp(&a.assessment.churn_probability)
                .then_with(|| a.customer_id.cmp(&b.customer_id))
        });
        ranked.truncate(n);
        ranked
    }

    /// Dashboard metrics over this run's assessments.
    pub fn metrics(&self, high_risk_levels: &[RiskLevel]) -> PortfolioMetrics {
        PortfolioMetrics::from_assessments(
            self.results.iter().map(|r| (r.monthly_bill, &r.assessment)),
            high_risk_levels,
        )
    }
}

pub fn score_portfolio(
    store: &ChurnStore,
    directory: &CustomerDirectory,
) -> ChurnResult<ScoringRun> {
    store.with_transaction(|store| score_into(store, directory))
}

/// Score and persist without opening a transaction. The caller owns it.
pub(crate) fn score_into(
    store: &ChurnStore,
    directory: &CustomerDirectory,
) -> ChurnResult<ScoringRun> {
    let run_id = uuid::Uuid::new_v4().to_string();
    let started_at = Utc::now();
    store.insert_scoring_run(&run_id, &started_at)?;

    let mut level_counts = LevelCounts::default();
    let mut results = Vec::with_capacity(directory.len());

    for customer in directory.all() {
        let assessment = scorer::assess(&customer.record());
        store.insert_assessment(&run_id, &customer.id, &assessment, &started_at)?;
        level_counts.record(assessment.risk_level);

        results.push(ScoredCustomer {
            customer_id:  customer.id.clone(),
            name:         customer.name.clone(),
            monthly_bill: customer.monthly_bill,
            assessment,
        });
    }

    store.set_run_customer_count(&run_id, results.len())?;

    log::info!(
        "run={run_id} score: {} customers (critical={}, high={}, medium={}, low={})",
        results.len(),
        level_counts.critical,
        level_counts.high,
        level_counts.medium,
        level_counts.low,
    );

    Ok(ScoringRun {
        summary: ScoringRunSummary {
            run_id,
            started_at,
            scored: results.len(),
            level_counts,
        },
        results,
    })
}
