use crate::model::{ClassRef, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("transaction {id} has a negative amount")]
    NegativeAmount { id: String },

    #[error("transaction amounts add up past the supported range (at {id})")]
    AmountOverflow { id: String },

    #[error("duplicate class id: {id}")]
    DuplicateClassId { id: String },

    #[error("duplicate transaction id: {id}")]
    DuplicateTransactionId { id: String },
}

impl DatasetError {
    pub fn code(&self) -> &'static str {
        match self {
            DatasetError::Read { .. } => "read_failed",
            DatasetError::Parse(_) => "parse_failed",
            DatasetError::NegativeAmount { .. } => "negative_amount",
            DatasetError::AmountOverflow { .. } => "amount_overflow",
            DatasetError::DuplicateClassId { .. } | DatasetError::DuplicateTransactionId { .. } => {
                "duplicate_id"
            }
        }
    }
}

/// Read-only snapshot of what the dashboard's data layer would hand us.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub classes: Vec<ClassRef>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Dataset::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Dataset, DatasetError> {
        let ds: Dataset = serde_json::from_str(raw)?;
        ds.validate()?;
        Ok(ds)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for c in &self.classes {
            if !seen.insert(c.id.as_str()) {
                return Err(DatasetError::DuplicateClassId { id: c.id.clone() });
            }
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for t in &self.transactions {
            if !seen.insert(t.id.as_str()) {
                return Err(DatasetError::DuplicateTransactionId { id: t.id.clone() });
            }
        }
        validate_transactions(&self.transactions)
    }
}

/// Amounts are non-negative; direction comes from the transaction kind.
/// The grand total must fit in a `Decimal`, so no aggregate over the list
/// (each a sum over a subset of it) can overflow.
pub fn validate_transactions(transactions: &[Transaction]) -> Result<(), DatasetError> {
    let mut total = Decimal::ZERO;
    for t in transactions {
        if t.amount.is_sign_negative() && !t.amount.is_zero() {
            return Err(DatasetError::NegativeAmount { id: t.id.clone() });
        }
        total = total
            .checked_add(t.amount)
            .ok_or_else(|| DatasetError::AmountOverflow { id: t.id.clone() })?;
    }
    Ok(())
}
