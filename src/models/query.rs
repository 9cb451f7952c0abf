// src/models/query.rs
//! Verification query model.
//!
//! A raw [`VerifyQuery`] arrives straight from the query string. It becomes a
//! [`NormalizedQuery`] only after both parameters are present and the folded
//! serial passes the format check.

use crate::error::VerifyError;
use crate::utils::normalize::{is_valid_serial_format, normalize_name, normalize_serial};

/// Raw query parameters for `GET /api/verify`.
#[derive(Debug, Default, Clone)]
pub struct VerifyQuery {
    /// Claimed certificate holder name
    pub name: Option<String>,
    /// Claimed serial code
    pub serial: Option<String>,
}

impl VerifyQuery {
    /// Collects the parameters from decoded query string pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "serial" => &mut query.serial,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Query folded into the comparison form used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub name: String,
    pub serial: String,
}

impl NormalizedQuery {
    /// Validates and normalizes a raw query.
    ///
    /// # Errors
    /// - `MissingParams` if either parameter is absent or empty
    /// - `InvalidSerial` if the normalized serial fails the format check
    ///
    /// # Note
    /// Presence is judged on the raw value, so a whitespace-only name counts as
    /// present and normalizes to the empty string.
    pub fn parse(query: &VerifyQuery) -> Result<Self, VerifyError> {
        let name = query.name.as_deref().unwrap_or_default();
        let serial = query.serial.as_deref().unwrap_or_default();

        if name.is_empty() || serial.is_empty() {
            return Err(VerifyError::MissingParams);
        }

        let serial = normalize_serial(serial);
        if !is_valid_serial_format(&serial) {
            return Err(VerifyError::InvalidSerial);
        }

        Ok(Self {
            name: normalize_name(name),
            serial,
        })
    }
}
