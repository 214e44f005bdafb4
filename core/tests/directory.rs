use churnlens_core::{
    customer::{ContractType, PlanTier},
    directory::CustomerDirectory,
    error::ChurnError,
};

#[test]
fn find_returns_the_matching_customer() {
    let dir = CustomerDirectory::embedded();
    let c = dir.find("C00004").unwrap();

    assert_eq!(c.name, "Diana Prince");
    assert_eq!(c.tenure_months, 1);
    assert_eq!(c.monthly_bill, 44.0);
    assert_eq!(c.contract, ContractType::Monthly);
    assert!(c.payment_issue);
    assert_eq!(c.plan, PlanTier::Basic);
}

#[test]
fn find_unknown_id_is_customer_not_found() {
    let dir = CustomerDirectory::embedded();
    match dir.find("C99999") {
        Err(ChurnError::CustomerNotFound { id }) => assert_eq!(id, "C99999"),
        other => panic!("expected CustomerNotFound, got {other:?}"),
    }
}

#[test]
fn blank_query_returns_everyone() {
    let dir = CustomerDirectory::embedded();
    assert_eq!(dir.search("").len(), 50);
    assert_eq!(dir.search("   ").len(), 50);
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let dir = CustomerDirectory::embedded();

    // name
    let starks: Vec<_> = dir.search("STARK").iter().map(|c| c.id.clone()).collect();
    assert_eq!(starks, vec!["C00007", "C00025"]);

    // id
    let by_id = dir.search("c0001");
    assert_eq!(by_id.len(), 10, "C00010..C00019");

    // email
    let by_email = dir.search("userC00050@");
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].id, "C00050");
}

#[test]
fn search_with_no_match_is_empty() {
    let dir = CustomerDirectory::embedded();
    assert!(dir.search("nobody-by-this-name").is_empty());
}

#[test]
fn json_customer_file_replaces_embedded_table() {
    let path = std::env::temp_dir().join(format!("churnlens-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        r#"{"customers": [
            {"id": "K1", "tenure": 2,  "monthly": 130.0, "contract": "Monthly", "issue": true},
            {"id": "K2", "tenure": 40, "monthly": 20.0,  "contract": "Yearly",  "issue": false}
        ]}"#,
    )
    .unwrap();

    let dir = CustomerDirectory::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(dir.len(), 2);
    assert_eq!(dir.find("K1").unwrap().plan, PlanTier::Premium);
    assert_eq!(dir.find("K2").unwrap().name, "Sarah Connor");
}

#[test]
fn missing_customer_file_is_io_error() {
    let err = CustomerDirectory::from_json_file("/nonexistent/churnlens/customers.json").unwrap_err();
    assert!(matches!(err, ChurnError::Io(_)), "got {err:?}");
}

#[test]
fn duplicate_customer_ids_are_rejected() {
    let err = CustomerDirectory::from_json_str(
        r#"{"customers": [
            {"id": "K1", "tenure": 2,  "monthly": 130.0, "contract": "Monthly", "issue": true},
            {"id": "K2", "tenure": 40, "monthly": 20.0,  "contract": "Yearly",  "issue": false},
            {"id": "K1", "tenure": 12, "monthly": 60.0,  "contract": "Yearly",  "issue": false}
        ]}"#,
    )
    .unwrap_err();

    match err {
        ChurnError::InvalidInput { field, reason } => {
            assert_eq!(field, "id");
            assert!(reason.contains("K1"), "reason should name the id: {reason}");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}
