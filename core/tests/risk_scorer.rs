//! Risk scorer: concrete scenarios and properties over the whole input grid.

use churnlens_core::{
    customer::{ContractType, CustomerRecord},
    scorer::{
        assess, RiskFactor, RiskLevel, FACTOR_HIGH_BILL, FACTOR_LOW_TENURE,
        FACTOR_MONTHLY_CONTRACT, FACTOR_PAYMENT_ISSUES,
    },
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn record(contract: ContractType, issue: bool, tenure: i64, bill: f64) -> CustomerRecord {
    CustomerRecord::new(contract, issue, tenure, bill)
}

fn labels(r: &CustomerRecord) -> Vec<String> {
    assess(r).risk_factors.into_iter().map(|f| f.factor).collect()
}

/// Every combination of rule outcomes, including the boundary values.
fn input_grid() -> Vec<CustomerRecord> {
    let mut grid = Vec::new();
    for contract in [ContractType::Monthly, ContractType::Yearly] {
        for issue in [false, true] {
            for tenure in [0, 1, 5, 6, 12, 24, 25, 72] {
                for bill in [0.0, 50.0, 100.0, 100.01, 250.0] {
                    grid.push(record(contract, issue, tenure, bill));
                }
            }
        }
    }
    grid
}

// ── Scenarios ────────────────────────────────────────────────────────────────

/// Loyal yearly customer with no risk: base 10 minus the tenure discount.
/// Zero is valid and must not be raised to a floor.
#[test]
fn loyal_yearly_customer_scores_zero() {
    let a = assess(&record(ContractType::Yearly, false, 30, 50.0));
    assert_eq!(a.churn_probability, 0);
    assert_eq!(a.risk_level, RiskLevel::Low);
    assert!(a.risk_factors.is_empty());
}

#[test]
fn monthly_contract_alone_is_medium() {
    let a = assess(&record(ContractType::Monthly, false, 12, 50.0));
    assert_eq!(a.churn_probability, 50);
    assert_eq!(a.risk_level, RiskLevel::Medium);
    assert_eq!(a.risk_factors, vec![RiskFactor::new(FACTOR_MONTHLY_CONTRACT, 8)]);
}

/// 10 + 40 + 30 + 15 + 10 = 105, clamped to 99.
#[test]
fn every_factor_firing_clamps_to_99() {
    let a = assess(&record(ContractType::Monthly, true, 3, 120.0));
    assert_eq!(a.churn_probability, 99);
    assert_eq!(a.risk_level, RiskLevel::Critical);
    assert_eq!(
        a.risk_factors,
        vec![
            RiskFactor::new(FACTOR_MONTHLY_CONTRACT, 8),
            RiskFactor::new(FACTOR_PAYMENT_ISSUES, 9),
            RiskFactor::new(FACTOR_LOW_TENURE, 6),
            RiskFactor::new(FACTOR_HIGH_BILL, 5),
        ]
    );
}

#[test]
fn payment_issue_alone_is_medium() {
    let a = assess(&record(ContractType::Yearly, true, 10, 80.0));
    assert_eq!(a.churn_probability, 40);
    assert_eq!(a.risk_level, RiskLevel::Medium);
    assert_eq!(a.risk_factors, vec![RiskFactor::new(FACTOR_PAYMENT_ISSUES, 9)]);
}

/// 10 + 40 + 30 = 80. Strict `>` keeps it out of Critical; 80 > 60 makes it High.
#[test]
fn score_of_exactly_80_is_not_critical() {
    let a = assess(&record(ContractType::Monthly, true, 12, 50.0));
    assert_eq!(a.churn_probability, 80);
    assert_ne!(a.risk_level, RiskLevel::Critical);
    assert_eq!(a.risk_level, RiskLevel::High);
}

/// 10 + 40 + 10 = 60 lands in Medium, not High.
#[test]
fn score_of_exactly_60_is_medium() {
    let a = assess(&record(ContractType::Monthly, false, 12, 120.0));
    assert_eq!(a.churn_probability, 60);
    assert_eq!(a.risk_level, RiskLevel::Medium);
}

/// 10 + 30 − 10 = 30 lands in Low, not Medium.
#[test]
fn score_of_exactly_30_is_low() {
    let a = assess(&record(ContractType::Yearly, true, 30, 50.0));
    assert_eq!(a.churn_probability, 30);
    assert_eq!(a.risk_level, RiskLevel::Low);
}

/// The loyalty discount lowers the score but never appears as a factor.
#[test]
fn tenure_discount_has_no_factor_entry() {
    let a = assess(&record(ContractType::Monthly, true, 36, 50.0));
    assert_eq!(a.churn_probability, 70);
    assert_eq!(
        labels(&record(ContractType::Monthly, true, 36, 50.0)),
        vec![FACTOR_MONTHLY_CONTRACT, FACTOR_PAYMENT_ISSUES]
    );
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn probability_stays_within_0_and_99() {
    for r in input_grid() {
        let p = assess(&r).churn_probability;
        assert!((0..=99).contains(&p), "p={p} out of range for {r:?}");
    }
}

#[test]
fn level_depends_only_on_probability() {
    let assessments: Vec<_> = input_grid().iter().map(assess).collect();
    for a in &assessments {
        for b in &assessments {
            if a.churn_probability == b.churn_probability {
                assert_eq!(
                    a.risk_level, b.risk_level,
                    "same probability {} gave different levels",
                    a.churn_probability
                );
            }
        }
        assert_eq!(a.risk_level, RiskLevel::from_probability(a.churn_probability));
    }
}

#[test]
fn factors_always_follow_contract_payment_tenure_bill_order() {
    let canonical = [
        FACTOR_MONTHLY_CONTRACT,
        FACTOR_PAYMENT_ISSUES,
        FACTOR_LOW_TENURE,
        FACTOR_HIGH_BILL,
    ];
    for r in input_grid() {
        let positions: Vec<usize> = labels(&r)
            .iter()
            .map(|l| {
                canonical
                    .iter()
                    .position(|c| c == l)
                    .unwrap_or_else(|| panic!("unknown factor label '{l}'"))
            })
            .collect();
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "factors out of order for {r:?}: {positions:?}"
        );
    }
}

#[test]
fn impact_scores_are_between_1_and_10() {
    for r in input_grid() {
        for f in assess(&r).risk_factors {
            assert!((1..=10).contains(&f.impact_score), "{f:?}");
        }
    }
}

#[test]
fn assess_is_idempotent() {
    for r in input_grid() {
        assert_eq!(assess(&r), assess(&r), "non-deterministic for {r:?}");
    }
}

#[test]
fn assess_is_safe_across_threads() {
    let grid = input_grid();
    let expected: Vec<_> = grid.iter().map(assess).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let grid = grid.clone();
            std::thread::spawn(move || grid.iter().map(assess).collect::<Vec<_>>())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
