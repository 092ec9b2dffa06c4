//! Shared data models used across modules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::error::StoreError;

/// A stash-box instance record from the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StashBoxInstance {
    pub id: i64,
    pub endpoint: String,
    pub api_key: String,
}

/// Store-assigned identifier of a stash-box instance.
///
/// Always positive; parsing rejects anything else instead of defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(i64);

impl InstanceId {
    pub fn new(id: i64) -> Result<Self, StoreError> {
        if id <= 0 {
            return Err(StoreError::InvalidArgument(format!(
                "instance id must be positive, got {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for InstanceId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| StoreError::InvalidArgument(format!("invalid instance id: {s:?}")))?;
        Self::new(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate row for insertion; the id is assigned by the store
#[derive(Debug, Clone, Deserialize)]
pub struct NewStashBoxInstance {
    pub endpoint: String,
    pub api_key: String,
}

/// Partial update keyed by id. `None` or empty fields are left untouched.
#[derive(Debug, Clone)]
pub struct StashBoxInstanceUpdate {
    pub id: InstanceId,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}
