// src/models/certificate.rs
//! Certificate record data model.
//!
//! Items in the Framer collection come in two shapes: fields at the top level
//! of the item, or grouped under a `"fields"` object. [`CertificateRecord::from_item`]
//! resolves that once, right after fetch, so matching only ever sees the
//! canonical form.

use crate::utils::normalize::{normalize_name, normalize_serial};
use crate::utils::serialization::first_populated;
use serde::Serialize;
use serde_json::{Map, Value};

/// Canonical certificate record, with every field coerced to a string.
///
/// Absent or falsy source values become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateRecord {
    /// `studentName` as stored; the only name ever returned to callers
    pub student_name: String,
    /// Name used for matching (`studentName`, falling back to `name`)
    pub holder_name: String,
    /// Serial code as stored (`serialNumber`, falling back to `serial`)
    pub serial_number: String,
    pub course_title: String,
    pub issue_date: String,
    pub certificate_url: String,
}

impl CertificateRecord {
    /// Builds a canonical record from one raw collection item.
    pub fn from_item(item: &Value) -> Self {
        let empty = Map::new();
        let fields = match item.get("fields") {
            Some(Value::Object(nested)) => nested,
            _ => item.as_object().unwrap_or(&empty),
        };

        let pick = |keys: &[&str]| first_populated(fields, keys).unwrap_or_default();

        Self {
            student_name: pick(&["studentName"]),
            holder_name: pick(&["studentName", "name"]),
            serial_number: pick(&["serialNumber", "serial"]),
            course_title: pick(&["courseTitle"]),
            issue_date: pick(&["issueDate"]),
            certificate_url: pick(&["certificateURL"]),
        }
    }

    /// True if this record's normalized name and serial equal the query's.
    pub fn matches(&self, name: &str, serial: &str) -> bool {
        normalize_name(&self.holder_name) == name && normalize_serial(&self.serial_number) == serial
    }

    /// Reduces the record to the fields exposed to callers.
    pub fn project(&self) -> CertificateProjection {
        CertificateProjection {
            student_name: self.student_name.clone(),
            course_title: self.course_title.clone(),
            issue_date: self.issue_date.clone(),
            certificate_url: self.certificate_url.clone(),
        }
    }
}

/// Public subset of a certificate record returned on a match.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateProjection {
    pub student_name: String,
    pub course_title: String,
    pub issue_date: String,
    #[serde(rename = "certificateURL")]
    pub certificate_url: String,
}

/// Response envelope shared by every outcome. `matched` is always present.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<CertificateProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    /// A successful match.
    pub fn found(record: &CertificateRecord) -> Self {
        Self {
            matched: true,
            item: Some(record.project()),
            error: None,
        }
    }

    /// No record matched. This is not an error.
    pub fn not_found() -> Self {
        Self {
            matched: false,
            item: None,
            error: None,
        }
    }

    /// Verification could not be completed.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            matched: false,
            item: None,
            error: Some(message.into()),
        }
    }
}
