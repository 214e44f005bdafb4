//! churnlens: headless runner for the churn risk toolkit.
//!
//! Usage:
//!   churnlens assess --contract Monthly --tenure 3 --bill 120 [--payment-issue]
//!   churnlens predict C00004
//!   churnlens search "stark"
//!   churnlens customers
//!   churnlens metrics
//!   churnlens score-all
//!   churnlens reports
//!   churnlens generate-report
//!   churnlens report R-1025
//!
//! Global flags:
//!   --config <file.json>   load a config file
//!   --db <path>            override the database path
//!   --customers <file>     override the customer file
//!   --simulate-latency     sleep before responding, as a remote backend would
//!   --json                 print JSON instead of text

use anyhow::{bail, Context, Result};
use churnlens_core::{
    config::ChurnConfig,
    customer::{ContractType, Customer, CustomerRecord},
    scorer::ChurnAssessment,
    service::ChurnService,
};
use serde::Serialize;
use std::{env, thread, time::Duration};

const USAGE: &str = "usage: churnlens <assess|predict|search|customers|metrics|score-all|reports|generate-report|report> [args] [--json]";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!(USAGE);
    };
    let json = has_flag(&args, "--json");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => ChurnConfig::load(path)?,
        None => ChurnConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.database = db.to_string();
    }
    if let Some(file) = flag_value(&args, "--customers") {
        config.customers_file = Some(file.to_string());
    }
    if has_flag(&args, "--simulate-latency") {
        config.latency.enabled = true;
    }

    let service = ChurnService::open(config)?;
    let latency = service.config().latency.clone();
    let delay = |ms: u64| {
        if latency.enabled && ms > 0 {
            log::debug!("simulated latency: {ms}ms");
            thread::sleep(Duration::from_millis(ms));
        }
    };

    match command {
        "assess" => {
            let record = parse_record(&args)?;
            record.validate()?;
            let assessment = service.assess(&record);
            emit(json, &assessment, || print_assessment(&assessment))?;
        }
        "predict" => {
            let id = positional(&args).context("predict needs a customer id")?;
            delay(latency.predict);
            let prediction = service.predict(id)?;
            emit(json, &prediction, || {
                println!("customer:  {}", prediction.customer_id);
                print_assessment(&prediction.assessment);
                println!("actions:");
                for a in &prediction.recommended_actions {
                    println!("  - {}: {}", a.title, a.description);
                }
            })?;
        }
        "search" => {
            let query = positional(&args).unwrap_or("");
            delay(latency.search);
            let hits = service.search(query);
            emit(json, &hits, || print_customers(&hits))?;
        }
        "customers" => {
            delay(latency.customers);
            let all: Vec<&Customer> = service.customers().iter().collect();
            emit(json, &all, || print_customers(&all))?;
        }
        "metrics" => {
            delay(latency.metrics);
            let m = service.metrics();
            emit(json, &m, || {
                println!("=== PORTFOLIO ===");
                println!("  subscribers:     {}", m.active_subscribers);
                println!("  churn rate:      {:.1}%", m.current_churn_rate);
                println!("  revenue at risk: {:.2}", m.revenue_at_risk);
                for bucket in &m.risk_distribution {
                    println!("  {:<16} {}", format!("{}:", bucket.name), bucket.value);
                }
            })?;
        }
        "score-all" => {
            let run = service.score_portfolio()?;
            emit(json, &run.summary, || {
                let s = &run.summary;
                println!("=== SCORING RUN ===");
                println!("  run_id:   {}", s.run_id);
                println!("  scored:   {}", s.scored);
                println!("  critical: {}", s.level_counts.critical);
                println!("  high:     {}", s.level_counts.high);
                println!("  medium:   {}", s.level_counts.medium);
                println!("  low:      {}", s.level_counts.low);
            })?;
        }
        "reports" => {
            let reports = service.list_reports()?;
            emit(json, &reports, || {
                for r in &reports {
                    println!(
                        "{:<8} {:<40} {:<14} {:<13} {:<10} {}",
                        r.id, r.title, r.kind, r.display_date(), r.status, r.size
                    );
                }
            })?;
        }
        "generate-report" => {
            delay(latency.report);
            let report = service.generate_risk_report()?;
            emit(json, &report, || {
                println!("{} {} ({}, {})", report.id, report.title, report.status, report.size);
            })?;
        }
        "report" => {
            let id = positional(&args).context("report needs a report id")?;
            let body = service.report_body(id)?;
            match body {
                Some(body) => emit(json, &body, || {
                    println!("run:       {}", body.run_id);
                    println!("generated: {}", body.generated_at.to_rfc3339());
                    println!("churn:     {:.1}%", body.metrics.current_churn_rate);
                    for e in &body.top_risks {
                        println!(
                            "  {:<7} {:<20} {:>3}% {}",
                            e.customer_id, e.name, e.churn_probability, e.risk_level
                        );
                    }
                })?,
                None => println!("{id} has no stored body"),
            }
        }
        other => {
            log::warn!("Unknown command: {other}");
            bail!(USAGE);
        }
    }

    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn print_assessment(a: &ChurnAssessment) {
    println!("churn:     {}% ({})", a.churn_probability, a.risk_level);
    if a.risk_factors.is_empty() {
        println!("factors:   none");
    } else {
        println!("factors:");
        for f in &a.risk_factors {
            println!("  - {} (impact {})", f.factor, f.impact_score);
        }
    }
}

fn print_customers(customers: &[&Customer]) {
    for c in customers {
        println!(
            "{:<7} {:<20} {:<9} {:<8} {:>4}mo {:>7.2} {}",
            c.id,
            c.name,
            c.plan.as_str(),
            c.contract.as_str(),
            c.tenure_months,
            c.monthly_bill,
            if c.payment_issue { "payment-issue" } else { "" },
        );
    }
    println!("({} customers)", customers.len());
}

fn parse_record(args: &[String]) -> Result<CustomerRecord> {
    let contract: ContractType = flag_value(args, "--contract")
        .context("--contract is required")?
        .parse()?;
    let tenure: i64 = flag_value(args, "--tenure")
        .context("--tenure is required")?
        .parse()
        .context("--tenure must be an integer")?;
    let bill: f64 = flag_value(args, "--bill")
        .context("--bill is required")?
        .parse()
        .context("--bill must be a number")?;
    Ok(CustomerRecord::new(
        contract,
        has_flag(args, "--payment-issue"),
        tenure,
        bill,
    ))
}

const VALUE_FLAGS: &[&str] = &["--config", "--db", "--customers", "--contract", "--tenure", "--bill"];

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// First argument after the subcommand that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(arg.as_str());
        }
    }
    None
}
