// src/services/verifier.rs
//! Certificate verification service.
//!
//! Looks a normalized (name, serial) pair up in the Framer collection by
//! fetching the collection once and scanning it linearly.

use crate::error::VerifyError;
use crate::models::certificate::CertificateRecord;
use crate::models::query::NormalizedQuery;
use crate::storage::framer_client::FramerClient;

/// Certificate verifier backed by a Framer collection.
///
/// The Verifier provides:
/// - One collection fetch per lookup, no caching between lookups
/// - Shape-tolerant record decoding before matching
/// - First-match-wins selection
#[derive(Clone, Debug)]
pub struct Verifier {
    /// Client for the collection holding certificate records
    store: FramerClient,
}

impl Verifier {
    /// Constructs a new Verifier over the given collection client.
    pub fn new(store: FramerClient) -> Self {
        Self { store }
    }

    /// Finds the certificate matching `query`.
    ///
    /// # Returns
    /// - `Ok(Some(record))` for the first item whose normalized name and serial
    ///   equal the query's
    /// - `Ok(None)` if no item matches
    /// - `Err` if the collection could not be fetched or decoded
    ///
    /// # Note
    /// Serials are assumed unique, so later duplicates are never considered.
    pub async fn find_certificate(
        &self,
        query: &NormalizedQuery,
    ) -> Result<Option<CertificateRecord>, VerifyError> {
        let items = self.store.list_items().await?;
        log::debug!("scanning {} collection items", items.len());

        Ok(items
            .iter()
            .map(CertificateRecord::from_item)
            .find(|record| record.matches(&query.name, &query.serial)))
    }
}
