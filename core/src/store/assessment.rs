use super::{parse_timestamp, ChurnStore};
use crate::{
    error::ChurnResult,
    scorer::{ChurnAssessment, RiskFactor},
    types::{CustomerId, RunId},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

/// An assessment as persisted by a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAssessment {
    pub run_id:      RunId,
    pub customer_id: CustomerId,
    pub assessed_at: DateTime<Utc>,
    pub assessment:  ChurnAssessment,
}

type RawRow = (String, String, i32, String, String, String);

fn decode(raw: RawRow) -> ChurnResult<StoredAssessment> {
    let (run_id, customer_id, churn_probability, level, factors, assessed_at) = raw;
    let risk_factors: Vec<RiskFactor> = serde_json::from_str(&factors)?;
    Ok(StoredAssessment {
        run_id,
        customer_id,
        assessed_at: parse_timestamp("assessed_at", &assessed_at)?,
        assessment: ChurnAssessment {
            churn_probability,
            risk_level: level.parse()?,
            risk_factors,
        },
    })
}

impl ChurnStore {
    // ── Scoring run ───────────────────────────────────────────────

    pub fn insert_scoring_run(&self, run_id: &str, started_at: &DateTime<Utc>) -> ChurnResult<()> {
        self.conn.execute(
            "INSERT INTO scoring_run (run_id, started_at) VALUES (?1, ?2)",
            params![run_id, started_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn set_run_customer_count(&self, run_id: &str, count: usize) -> ChurnResult<()> {
        self.conn.execute(
            "UPDATE scoring_run SET customer_count = ?1 WHERE run_id = ?2",
            params![count as i64, run_id],
        )?;
        Ok(())
    }

    pub fn scoring_run_count(&self) -> ChurnResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM scoring_run", [], |row| row.get(0))?;
        Ok(n)
    }

    // ── Assessment ────────────────────────────────────────────────

    pub fn insert_assessment(
        &self,
        run_id: &str,
        customer_id: &str,
        assessment: &ChurnAssessment,
        assessed_at: &DateTime<Utc>,
    ) -> ChurnResult<()> {
        self.conn.execute(
            "INSERT INTO assessment (
                run_id, customer_id, churn_probability, risk_level, risk_factors, assessed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                customer_id,
                assessment.churn_probability,
                assessment.risk_level.as_str(),
                serde_json::to_string(&assessment.risk_factors)?,
                assessed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn assessment_count(&self, run_id: &str) -> ChurnResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM assessment WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// All assessments of a run, riskiest first, ties by customer id.
    pub fn assessments_for_run(&self, run_id: &str) -> ChurnResult<Vec<StoredAssessment>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, customer_id, churn_probability, risk_level, risk_factors, assessed_at
             FROM assessment WHERE run_id = ?1
             ORDER BY churn_probability DESC, customer_id ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
            })?
            .collect::<Result<Vec<RawRow>, _>>()?;
        rows.into_iter().map(decode).collect()
    }

    pub fn latest_assessment(&self, customer_id: &str) -> ChurnResult<Option<StoredAssessment>> {
        let raw: Option<RawRow> = self
            .conn
            .query_row(
                "SELECT run_id, customer_id, churn_probability, risk_level, risk_factors, assessed_at
                 FROM assessment WHERE customer_id = ?1
                 ORDER BY assessed_at DESC, rowid DESC LIMIT 1",
                params![customer_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?)),
            )
            .optional()?;
        raw.map(decode).transpose()
    }
}
