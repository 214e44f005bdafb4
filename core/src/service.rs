//! ChurnService: the entry point for callers.
//!
//! Owns the customer directory, the store and the config, and exposes
//! every operation the CLI needs. Nothing here sleeps: simulated
//! latency belongs to the caller.

use crate::{
    config::ChurnConfig,
    customer::{Customer, CustomerRecord},
    directory::CustomerDirectory,
    error::ChurnResult,
    metrics::PortfolioMetrics,
    portfolio::{self, ScoringRun},
    prediction::{self, ChurnPrediction},
    report::{Report, ReportRegistry, RiskReportBody},
    scorer::{self, ChurnAssessment},
    store::{ChurnStore, StoredAssessment},
};

pub struct ChurnService {
    config:    ChurnConfig,
    directory: CustomerDirectory,
    store:     ChurnStore,
}

impl ChurnService {
    /// Open the configured database, migrate it, and load customers.
    pub fn open(config: ChurnConfig) -> ChurnResult<Self> {
        let store = ChurnStore::open(&config.database)?;
        store.migrate()?;

        let directory = match &config.customers_file {
            Some(path) => CustomerDirectory::from_json_file(path)?,
            None => CustomerDirectory::embedded(),
        };

        log::info!(
            "service: {} customers, database={}",
            directory.len(),
            config.database,
        );
        Ok(Self::from_parts(config, directory, store))
    }

    /// Assemble from pre-built parts. The store must already be migrated.
    pub fn from_parts(config: ChurnConfig, directory: CustomerDirectory, store: ChurnStore) -> Self {
        Self { config, directory, store }
    }

    /// Test service: in-memory store, embedded customers.
    pub fn open_test() -> ChurnResult<Self> {
        Self::open(ChurnConfig::default_test())
    }

    pub fn config(&self) -> &ChurnConfig {
        &self.config
    }

    pub fn directory(&self) -> &CustomerDirectory {
        &self.directory
    }

    pub fn store(&self) -> &ChurnStore {
        &self.store
    }

    // ── Customers ─────────────────────────────────────────────────

    pub fn customers(&self) -> &[Customer] {
        self.directory.all()
    }

    pub fn search(&self, query: &str) -> Vec<&Customer> {
        self.directory.search(query)
    }

    // ── Scoring ───────────────────────────────────────────────────

    /// Score an arbitrary record. No validation is applied.
    pub fn assess(&self, record: &CustomerRecord) -> ChurnAssessment {
        scorer::assess(record)
    }

    pub fn predict(&self, customer_id: &str) -> ChurnResult<ChurnPrediction> {
        prediction::predict(&self.directory, customer_id)
    }

    pub fn metrics(&self) -> PortfolioMetrics {
        PortfolioMetrics::compute(self.directory.all(), &self.config.high_risk_levels)
    }

    pub fn score_portfolio(&self) -> ChurnResult<ScoringRun> {
        portfolio::score_portfolio(&self.store, &self.directory)
    }

    /// Most recent persisted assessment for a customer, if any run covered it.
    pub fn latest_assessment(&self, customer_id: &str) -> ChurnResult<Option<StoredAssessment>> {
        self.directory.find(customer_id)?;
        self.store.latest_assessment(customer_id)
    }

    // ── Reports ───────────────────────────────────────────────────

    pub fn reports(&self) -> ReportRegistry<'_> {
        ReportRegistry::new(&self.store)
    }

    pub fn list_reports(&self) -> ChurnResult<Vec<Report>> {
        self.reports().list()
    }

    pub fn generate_risk_report(&self) -> ChurnResult<Report> {
        self.reports().generate_risk_report(&self.directory, &self.config)
    }

    pub fn report_body(&self, id: &str) -> ChurnResult<Option<RiskReportBody>> {
        self.reports().body(id)
    }
}
