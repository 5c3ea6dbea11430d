//! Transaction data structures for a single account's history

use crate::error::{DetectionError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Placeholder used when account metadata carries no `account_id`.
pub const UNKNOWN_ACCOUNT_ID: &str = "unknown";

/// Logical columns of a transaction dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    Amount,
    Description,
    Counterparty,
    TransactionType,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Amount => "amount",
            Column::Description => "description",
            Column::Counterparty => "counterparty",
            Column::TransactionType => "transaction_type",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an account's transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Option<NaiveDateTime>,
    pub amount: f64,
    pub description: Option<String>,
    pub counterparty: Option<String>,
    pub transaction_type: Option<String>,
}

impl Transaction {
    /// Create a transaction carrying only an amount
    pub fn new(amount: f64) -> Self {
        Self {
            date: None,
            amount,
            description: None,
            counterparty: None,
            transaction_type: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_counterparty(mut self, counterparty: impl Into<String>) -> Self {
        self.counterparty = Some(counterparty.into());
        self
    }

    pub fn with_transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }
}

/// Raw, unvalidated record as it arrives from an export file.
///
/// `date` is kept as a raw JSON value so a non-string date is reported as an
/// invalid `date` value rather than a generic decoding error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default, alias = "type")]
    pub transaction_type: Option<String>,
}

/// Immutable, validated view of one account's transactions.
///
/// Column presence is tracked for the whole dataset; detectors consult
/// [`TransactionDataset::has_column`] and skip when a column they need is
/// absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDataset {
    transactions: Vec<Transaction>,
    columns: BTreeSet<Column>,
}

impl TransactionDataset {
    /// Dataset with no rows and no columns
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from already-typed transactions.
    ///
    /// `amount` is always present. `date` must be set on every row or on none.
    /// Text columns are present when at least one row carries a value.
    pub fn new(transactions: Vec<Transaction>) -> Result<Self> {
        let mut columns = BTreeSet::new();
        if transactions.is_empty() {
            return Ok(Self {
                transactions,
                columns,
            });
        }

        for (row, tx) in transactions.iter().enumerate() {
            validate_amount(tx.amount, row)?;
        }
        columns.insert(Column::Amount);

        let dated = transactions.iter().filter(|tx| tx.date.is_some()).count();
        if dated > 0 {
            if let Some(row) = transactions.iter().position(|tx| tx.date.is_none()) {
                return Err(DetectionError::MissingValue {
                    column: Column::Date,
                    row,
                });
            }
            columns.insert(Column::Date);
        }

        if transactions.iter().any(|tx| tx.description.is_some()) {
            columns.insert(Column::Description);
        }
        if transactions.iter().any(|tx| tx.counterparty.is_some()) {
            columns.insert(Column::Counterparty);
        }
        if transactions.iter().any(|tx| tx.transaction_type.is_some()) {
            columns.insert(Column::TransactionType);
        }

        Ok(Self {
            transactions,
            columns,
        })
    }

    /// Validate raw records, parsing dates and checking amounts.
    ///
    /// When no record carries an amount the dataset has no `amount` column and
    /// amount-based detectors are skipped.
    pub fn from_records(records: Vec<TransactionRecord>) -> Result<Self> {
        let with_amount = records.iter().filter(|r| r.amount.is_some()).count();
        let has_amount = with_amount > 0;
        if has_amount && with_amount < records.len() {
            let row = records
                .iter()
                .position(|r| r.amount.is_none())
                .unwrap_or_default();
            return Err(DetectionError::MissingValue {
                column: Column::Amount,
                row,
            });
        }

        let transactions = records
            .into_iter()
            .map(|record| -> Result<Transaction> {
                let date = record.date.as_ref().map(parse_date_value).transpose()?.flatten();
                Ok(Transaction {
                    date,
                    amount: record.amount.unwrap_or(0.0),
                    description: record.description,
                    counterparty: record.counterparty,
                    transaction_type: record.transaction_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut dataset = Self::new(transactions)?;
        if !has_amount {
            dataset.columns.remove(&Column::Amount);
        }
        Ok(dataset)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn has_columns(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.has_column(*c))
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Sum of all amounts, or 0 when the column is absent
    pub fn total_amount(&self) -> f64 {
        if !self.has_column(Column::Amount) {
            return 0.0;
        }
        self.transactions.iter().map(|tx| tx.amount).sum()
    }

}

fn validate_amount(amount: f64, row: usize) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DetectionError::InvalidValue {
            column: Column::Amount,
            value: format!("{} (row {})", amount, row),
        });
    }
    Ok(())
}

/// Parse a raw JSON date. `null` counts as no date; anything other than a
/// string is an invalid `date` value.
fn parse_date_value(value: &Value) -> Result<Option<NaiveDateTime>> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => parse_date(raw).map(Some),
        other => Err(DetectionError::InvalidValue {
            column: Column::Date,
            value: other.to_string(),
        }),
    }
}

/// Parse a date column value.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }

    Err(DetectionError::InvalidValue {
        column: Column::Date,
        value: value.to_string(),
    })
}

/// Key/value account metadata. Values may be any JSON value; only
/// `account_id` is consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountMetadata(HashMap<String, Value>);

impl AccountMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata carrying just an account id
    pub fn with_account_id(account_id: impl Into<String>) -> Self {
        let mut meta = Self::new();
        meta.insert("account_id", account_id.into());
        meta
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The account id, or `"unknown"` when absent.
    ///
    /// String and numeric ids are rendered verbatim; any other value counts
    /// as absent.
    pub fn account_id(&self) -> Cow<'_, str> {
        match self.get("account_id") {
            Some(Value::String(id)) => Cow::Borrowed(id.as_str()),
            Some(Value::Number(id)) => Cow::Owned(id.to_string()),
            _ => Cow::Borrowed(UNKNOWN_ACCOUNT_ID),
        }
    }
}
