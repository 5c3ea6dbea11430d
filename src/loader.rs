//! Reading transaction exports and account metadata from JSON files.

use crate::error::Result;
use crate::types::{AccountMetadata, TransactionDataset, TransactionRecord};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load and validate a JSON array of transaction records.
pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<TransactionDataset> {
    let raw = fs::read_to_string(path.as_ref())?;
    let dataset = parse_transactions(&raw)?;
    debug!(
        path = %path.as_ref().display(),
        rows = dataset.len(),
        columns = ?dataset.columns().collect::<Vec<_>>(),
        "Loaded transactions"
    );
    Ok(dataset)
}

/// Parse and validate transaction records from a JSON string.
pub fn parse_transactions(json: &str) -> Result<TransactionDataset> {
    let records: Vec<TransactionRecord> = serde_json::from_str(json)?;
    TransactionDataset::from_records(records)
}

/// Load a flat JSON object of account metadata.
pub fn load_account_metadata<P: AsRef<Path>>(path: P) -> Result<AccountMetadata> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectionError;
    use crate::types::Column;
    use std::io::Write;

    #[test]
    fn test_parse_transactions() {
        let dataset = parse_transactions(
            r#"[
                {"date": "2024-01-31", "amount": 9500.0, "description": "Consulting", "type": "deposit"},
                {"date": "2024-02-01 14:30:00", "amount": 120.5, "counterparty": "XYZ Services"}
            ]"#,
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert!(dataset.has_columns(&[
            Column::Date,
            Column::Amount,
            Column::Description,
            Column::Counterparty,
            Column::TransactionType,
        ]));
        assert_eq!(
            dataset.transactions()[0].transaction_type.as_deref(),
            Some("deposit")
        );
    }

    #[test]
    fn test_bad_date_names_column_and_value() {
        let err = parse_transactions(r#"[{"date": "not-a-date", "amount": 1.0}]"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value in column 'date': \"not-a-date\""
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_transactions("{").unwrap_err();
        assert!(matches!(err, DetectionError::Json(_)));
    }

    #[test]
    fn test_load_files() {
        let mut transactions = tempfile::NamedTempFile::new().unwrap();
        write!(transactions, r#"[{{"amount": 100.0}}, {{"amount": 50.0}}]"#).unwrap();
        let mut account = tempfile::NamedTempFile::new().unwrap();
        write!(
            account,
            r#"{{"account_id": "ACC-12345", "account_type": "Business Checking"}}"#
        )
        .unwrap();

        let dataset = load_transactions(transactions.path()).unwrap();
        assert_eq!(dataset.total_amount(), 150.0);

        let meta = load_account_metadata(account.path()).unwrap();
        assert_eq!(meta.account_id(), "ACC-12345");
        assert_eq!(
            meta.get("account_type").and_then(|v| v.as_str()),
            Some("Business Checking")
        );
    }

    #[test]
    fn test_account_metadata_with_mixed_values() {
        let mut account = tempfile::NamedTempFile::new().unwrap();
        write!(
            account,
            r#"{{"account_id": 12345, "customer_id": 67890, "flags": ["pep"], "active": true}}"#
        )
        .unwrap();

        let meta = load_account_metadata(account.path()).unwrap();
        assert_eq!(meta.account_id(), "12345");
        assert_eq!(meta.get("customer_id").and_then(|v| v.as_u64()), Some(67890));
    }

    #[test]
    fn test_numeric_date_names_column_and_value() {
        let err = parse_transactions(r#"[{"date": 20240131, "amount": 1.0}]"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid value in column 'date': \"20240131\"");
    }

    #[test]
    fn test_missing_file() {
        let err = load_transactions("/nonexistent/transactions.json").unwrap_err();
        assert!(matches!(err, DetectionError::Io(_)));
    }
}
