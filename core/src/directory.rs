//! Customer directory, the read-only source of customer profiles.
//!
//! Ships with an embedded 50-row table. A JSON file with the same row
//! shape can replace it (`{"customers": [{"id", "tenure", "monthly",
//! "contract", "issue"}]}`). Names are assigned by row index from a
//! fixed list, so the same file always yields the same directory.

use crate::{
    customer::{ContractType, Customer, CustomerRow},
    error::{ChurnError, ChurnResult},
};
use serde::Deserialize;
use std::{collections::HashSet, path::Path};

use crate::customer::ContractType::{Monthly, Yearly};

/// (id, tenure months, monthly bill, contract, payment issue)
const EMBEDDED_ROWS: &[(&str, i64, f64, ContractType, bool)] = &[
    ("C00001", 20, 107.0, Yearly,  false),
    ("C00002", 30,  25.0, Yearly,  false),
    ("C00003",  7, 105.0, Monthly, false),
    ("C00004",  1,  44.0, Monthly, true),
    ("C00005", 56,  20.0, Monthly, false),
    ("C00006", 49, 109.0, Yearly,  false),
    ("C00007", 38,  48.0, Yearly,  true),
    ("C00008", 58,  83.0, Yearly,  true),
    ("C00009", 21,  55.0, Yearly,  false),
    ("C00010", 45,  23.0, Monthly, true),
    ("C00011", 57,  22.0, Yearly,  false),
    ("C00012", 47,  56.0, Yearly,  true),
    ("C00013", 37,  64.0, Yearly,  true),
    ("C00014", 45,  42.0, Yearly,  true),
    ("C00015", 38,  57.0, Yearly,  false),
    ("C00016", 36,  44.0, Monthly, false),
    ("C00017", 22, 102.0, Monthly, false),
    ("C00018", 47, 114.0, Yearly,  false),
    ("C00019", 43,  54.0, Yearly,  false),
    ("C00020", 11,  97.0, Monthly, true),
    ("C00021", 49,  81.0, Monthly, false),
    ("C00022", 60,  62.0, Yearly,  false),
    ("C00023",  4,  91.0, Monthly, false),
    ("C00024", 19,  66.0, Monthly, false),
    ("C00025", 19, 100.0, Monthly, false),
    ("C00026", 53,  63.0, Monthly, false),
    ("C00027", 21,  66.0, Yearly,  true),
    ("C00028", 60, 100.0, Monthly, false),
    ("C00029", 43,  85.0, Monthly, false),
    ("C00030",  6,  36.0, Yearly,  false),
    ("C00031", 48,  23.0, Yearly,  false),
    ("C00032",  9,  63.0, Yearly,  true),
    ("C00033", 27,  20.0, Yearly,  true),
    ("C00034",  6,  61.0, Yearly,  false),
    ("C00035", 36, 106.0, Yearly,  false),
    ("C00036", 14,  95.0, Monthly, true),
    ("C00037", 50,  21.0, Yearly,  true),
    ("C00038", 37,  32.0, Yearly,  false),
    ("C00039",  5,  29.0, Monthly, true),
    ("C00040", 47,  84.0, Yearly,  true),
    ("C00041", 22,  97.0, Monthly, false),
    ("C00042", 52,  97.0, Monthly, true),
    ("C00043", 49,  48.0, Yearly,  false),
    ("C00044", 51,  46.0, Yearly,  true),
    ("C00045", 50,  69.0, Monthly, true),
    ("C00046", 20,  66.0, Yearly,  true),
    ("C00047", 32, 118.0, Yearly,  false),
    ("C00048", 29,  39.0, Monthly, true),
    ("C00049", 55,  58.0, Yearly,  true),
    ("C00050", 24,  92.0, Yearly,  true),
];

const NAMES: &[&str] = &[
    "Alex Dran", "Sarah Connor", "John Snow", "Diana Prince", "Bruce Wayne",
    "Clark Kent", "Tony Stark", "Steve Rogers", "Natasha Romanoff",
    "Clint Barton", "Wanda Maximoff", "Vision", "Sam Wilson", "Bucky Barnes",
    "Peter Parker", "Strange", "TChalla", "Scott Lang", "Hope Pym",
    "Carol Danvers", "Nick Fury", "Maria Hill", "Phil Coulson", "Peggy Carter",
    "Howard Stark", "Thor Odinson", "Loki Laufeyson", "Jane Foster",
    "Odin Borson", "Frigga", "Heimdall", "Sif", "Hogun", "Fandral", "Volstagg",
    "Bruce Banner", "Betty Ross", "Emil Blonsky", "Thaddeus Ross",
    "Jennifer Walters", "Matt Murdock", "Foggy Nelson", "Karen Page",
    "Frank Castle", "Jessica Jones", "Luke Cage", "Danny Rand", "Colleen Wing",
    "Misty Knight", "Claire Temple",
];

#[derive(Debug, Clone, Deserialize)]
struct CustomerFile {
    customers: Vec<CustomerRow>,
}

#[derive(Debug, Clone)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    /// The built-in customer table.
    pub fn embedded() -> Self {
        let rows = EMBEDDED_ROWS
            .iter()
            .map(|&(id, tenure, monthly, contract, issue)| CustomerRow {
                id: id.to_string(),
                tenure,
                monthly,
                contract,
                issue,
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Build a directory from raw rows. Rows are not validated here.
    pub fn from_rows(rows: Vec<CustomerRow>) -> Self {
        let customers = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Customer::from_row(row, NAMES[i % NAMES.len()]))
            .collect();
        Self { customers }
    }

    /// Load a customer file. Every row must pass record validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> ChurnResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ChurnResult<Self> {
        let file: CustomerFile = serde_json::from_str(content)?;
        let directory = Self::from_rows(file.customers);
        let mut seen = HashSet::with_capacity(directory.len());
        for c in &directory.customers {
            if !seen.insert(c.id.as_str()) {
                return Err(ChurnError::invalid("id", format!("duplicate customer id '{}'", c.id)));
            }
            c.record().validate().map_err(|e| match e {
                ChurnError::InvalidInput { field, reason } => ChurnError::InvalidInput {
                    field,
                    reason: format!("customer {}: {reason}", c.id),
                },
                other => other,
            })?;
        }
        log::debug!("directory: loaded {} customers from file", directory.len());
        Ok(directory)
    }

    pub fn all(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn find(&self, id: &str) -> ChurnResult<&Customer> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ChurnError::CustomerNotFound { id: id.to_string() })
    }

    /// Case-insensitive substring match on name, email or id.
    /// A blank query returns every customer.
    pub fn search(&self, query: &str) -> Vec<&Customer> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.customers.iter().collect();
        }
        self.customers
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
                    || c.id.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl Default for CustomerDirectory {
    fn default() -> Self {
        Self::embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_has_fifty_unique_ids() {
        let dir = CustomerDirectory::embedded();
        assert_eq!(dir.len(), 50);

        let mut ids: Vec<_> = dir.all().iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn names_follow_row_order() {
        let dir = CustomerDirectory::embedded();
        assert_eq!(dir.all()[0].name, "Alex Dran");
        assert_eq!(dir.all()[49].name, "Claire Temple");
    }

    #[test]
    fn json_rows_with_negative_tenure_are_rejected() {
        let json = r#"{"customers": [
            {"id": "X1", "tenure": -2, "monthly": 10.0, "contract": "Monthly", "issue": false}
        ]}"#;
        let err = CustomerDirectory::from_json_str(json).unwrap_err();
        assert!(
            err.to_string().contains("X1"),
            "error should name the offending customer: {err}"
        );
    }
}
