//! Per-customer churn prediction: directory lookup, scoring, and the
//! retention playbook shown next to the assessment.

use crate::{
    directory::CustomerDirectory,
    error::ChurnResult,
    scorer::{self, ChurnAssessment},
    types::CustomerId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Email,
    Discount,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionAction {
    pub id:          String,
    pub action_type: ActionType,
    pub title:       String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPrediction {
    pub customer_id:             CustomerId,
    pub assessment:              ChurnAssessment,
    pub recommended_actions:     Vec<RetentionAction>,
    pub content_recommendations: Vec<String>,
}

/// The standing retention playbook. It does not vary with the assessment.
pub fn retention_playbook() -> Vec<RetentionAction> {
    let action = |id: &str, action_type, title: &str, description: &str| RetentionAction {
        id: id.to_string(),
        action_type,
        title: title.to_string(),
        description: description.to_string(),
    };
    vec![
        action(
            "act-1",
            ActionType::Email,
            "Send \"Miss You\" Campaign",
            "Personalized re-engagement email.",
        ),
        action(
            "act-2",
            ActionType::Discount,
            "Offer 20% Discount",
            "Apply 20% off next 3 months.",
        ),
        action(
            "act-3",
            ActionType::Content,
            "Suggest New Sci-Fi",
            "Recommend \"Stranger Things\" or similar.",
        ),
    ]
}

pub fn content_recommendations() -> Vec<String> {
    ["Stranger Things", "Black Mirror", "Dark", "Altered Carbon"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Resolve `customer_id` and score it.
pub fn predict(directory: &CustomerDirectory, customer_id: &str) -> ChurnResult<ChurnPrediction> {
    let customer = directory.find(customer_id)?;
    let assessment = scorer::assess(&customer.record());

    log::debug!(
        "predict: {} p={} level={} factors={}",
        customer.id,
        assessment.churn_probability,
        assessment.risk_level,
        assessment.risk_factors.len(),
    );

    Ok(ChurnPrediction {
        customer_id: customer.id.clone(),
        assessment,
        recommended_actions: retention_playbook(),
        content_recommendations: content_recommendations(),
    })
}
