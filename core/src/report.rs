//! Intelligence report registry.
//!
//! The catalog is seeded by migration. On-demand risk reports run a fresh
//! portfolio scoring pass and store its summary as the report body.
//! A report is inserted as Generating and flipped to Ready once its body
//! is written. Generation runs in one transaction with its scoring run, so
//! a failure leaves neither a report row nor a run behind.

use crate::{
    config::ChurnConfig,
    directory::CustomerDirectory,
    error::{ChurnError, ChurnResult},
    metrics::PortfolioMetrics,
    portfolio::{self, ScoredCustomer, ScoringRun},
    scorer::RiskLevel,
    store::ChurnStore,
    types::{ReportId, RunId},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const RISK_REPORT_TITLE: &str = "On-Demand Risk Assessment";
pub const TOP_RISK_ENTRIES: usize = 10;

const FIRST_REPORT_NUMBER: i64 = 1000;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Executive,
    #[serde(rename = "Risk Analysis")]
    RiskAnalysis,
    #[serde(rename = "Campaign ROI")]
    CampaignRoi,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Executive    => "Executive",
            ReportKind::RiskAnalysis => "Risk Analysis",
            ReportKind::CampaignRoi  => "Campaign ROI",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ChurnError;

    fn from_str(s: &str) -> ChurnResult<Self> {
        match s {
            "Executive"     => Ok(ReportKind::Executive),
            "Risk Analysis" => Ok(ReportKind::RiskAnalysis),
            "Campaign ROI"  => Ok(ReportKind::CampaignRoi),
            other => Err(ChurnError::invalid("report_kind", format!("unknown kind '{other}'"))),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Generating,
    Ready,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Generating => "Generating",
            ReportStatus::Ready      => "Ready",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = ChurnError;

    fn from_str(s: &str) -> ChurnResult<Self> {
        match s {
            "Generating" => Ok(ReportStatus::Generating),
            "Ready"      => Ok(ReportStatus::Ready),
            other => Err(ChurnError::invalid("report_status", format!("unknown status '{other}'"))),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id:     ReportId,
    pub title:  String,
    pub kind:   ReportKind,
    pub date:   NaiveDate,
    pub status: ReportStatus,
    pub size:   String,
    /// Scoring run behind an on-demand report.
    pub run_id: Option<RunId>,
}

impl Report {
    pub fn id_for(number: i64) -> ReportId {
        format!("R-{number}")
    }

    /// `"R-1024"` → 1024.
    pub fn parse_id(id: &str) -> ChurnResult<i64> {
        id.trim()
            .strip_prefix("R-")
            .and_then(|n| n.parse::<i64>().ok())
            .ok_or_else(|| ChurnError::invalid("report_id", format!("expected R-<number>, got '{id}'")))
    }

    /// e.g. `Oct 01, 2024`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %d, %Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReportEntry {
    pub customer_id:       String,
    pub name:              String,
    pub churn_probability: i32,
    pub risk_level:        RiskLevel,
    pub monthly_bill:      f64,
}

impl From<&ScoredCustomer> for RiskReportEntry {
    fn from(s: &ScoredCustomer) -> Self {
        Self {
            customer_id:       s.customer_id.clone(),
            name:              s.name.clone(),
            churn_probability: s.assessment.churn_probability,
            risk_level:        s.assessment.risk_level,
            monthly_bill:      s.monthly_bill,
        }
    }
}

/// JSON body stored with an on-demand risk report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReportBody {
    pub run_id:       RunId,
    pub generated_at: DateTime<Utc>,
    pub metrics:      PortfolioMetrics,
    pub top_risks:    Vec<RiskReportEntry>,
}

/// `"<x.y> KB"` for a body of `bytes` bytes.
pub fn format_size(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

// ── Registry ─────────────────────────────────────────────────────────────────

pub struct ReportRegistry<'a> {
    store: &'a ChurnStore,
}

impl<'a> ReportRegistry<'a> {
    pub fn new(store: &'a ChurnStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> ChurnResult<Vec<Report>> {
        self.store.list_reports()
    }

    pub fn get(&self, id: &str) -> ChurnResult<Report> {
        let number = Report::parse_id(id)?;
        self.store
            .get_report(number)?
            .ok_or_else(|| ChurnError::ReportNotFound { id: id.to_string() })
    }

    pub fn body(&self, id: &str) -> ChurnResult<Option<RiskReportBody>> {
        let number = Report::parse_id(id)?;
        if self.store.get_report(number)?.is_none() {
            return Err(ChurnError::ReportNotFound { id: id.to_string() });
        }
        match self.store.report_body(number)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Score the portfolio and file the result as a new Risk Analysis report.
    pub fn generate_risk_report(
        &self,
        directory: &CustomerDirectory,
        config: &ChurnConfig,
    ) -> ChurnResult<Report> {
        let result = self
            .store
            .with_transaction(|store| Self::generate_in(store, directory, config));

        match result {
            Ok(report) => {
                log::info!("report={} ready ({})", report.id, report.size);
                Ok(report)
            }
            Err(e) => {
                log::warn!("risk report generation failed, rolled back: {e}");
                Err(e)
            }
        }
    }

    fn generate_in(
        store: &ChurnStore,
        directory: &CustomerDirectory,
        config: &ChurnConfig,
    ) -> ChurnResult<Report> {
        let number = store.max_report_number()?.unwrap_or(FIRST_REPORT_NUMBER) + 1;
        let today = Utc::now().date_naive();

        store.insert_report(
            number,
            RISK_REPORT_TITLE,
            ReportKind::RiskAnalysis,
            today,
            ReportStatus::Generating,
            "...",
        )?;
        log::debug!("report={} status=Generating", Report::id_for(number));

        let run = portfolio::score_into(store, directory)?;
        let json = serde_json::to_string_pretty(&risk_report_body(&run, config))?;
        store.finish_report(number, &format_size(json.len()), &json, &run.summary.run_id)?;

        store
            .get_report(number)?
            .ok_or_else(|| ChurnError::ReportNotFound { id: Report::id_for(number) })
    }
}

/// Report body for a finished run. Metrics come from the run's own
/// assessments.
pub fn risk_report_body(run: &ScoringRun, config: &ChurnConfig) -> RiskReportBody {
    RiskReportBody {
        run_id:       run.summary.run_id.clone(),
        generated_at: run.summary.started_at,
        metrics:      run.metrics(&config.high_risk_levels),
        top_risks:    run
            .top_risks(TOP_RISK_ENTRIES)
            .into_iter()
            .map(RiskReportEntry::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ids_round_trip() {
        assert_eq!(Report::id_for(1024), "R-1024");
        assert_eq!(Report::parse_id("R-1024").unwrap(), 1024);
        assert!(Report::parse_id("1024").is_err());
        assert!(Report::parse_id("R-abc").is_err());
    }

    #[test]
    fn size_is_formatted_in_kilobytes() {
        assert_eq!(format_size(0), "0.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn kind_names_match_catalog_labels() {
        for kind in [ReportKind::Executive, ReportKind::RiskAnalysis, ReportKind::CampaignRoi] {
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
        }
        assert_eq!(
            serde_json::to_string(&ReportKind::CampaignRoi).unwrap(),
            "\"Campaign ROI\""
        );
    }

    #[test]
    fn kind_displays_catalog_label_and_pads() {
        assert_eq!(ReportKind::RiskAnalysis.to_string(), "Risk Analysis");
        assert_eq!(format!("{:<10}|", ReportKind::Executive), "Executive |");
        assert_eq!(format!("{:<7}|", ReportStatus::Ready), "Ready  |");
    }
}
