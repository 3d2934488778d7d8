//! Artist Identity Service
//!
//! Resolves an artist record and reconciles the identifiers it carries with
//! the one that was requested. A record returned for one id may describe the
//! artist under a different id; when that happens the record is re-fetched by
//! its own id and accepted only if both records name the same artist.

use serde_json::{json, Value};
use soundpulse_core::{
    ArtistIdShape, ArtistIdentity, CatalogProvider, ProviderOperation, ReturnedIds,
    ValidationError,
};

use crate::error::{ApiError, ApiResult};
use crate::providers::observed;

/// Result of resolving one artist id.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArtist {
    /// The record that will be returned, before id rewriting. Always a
    /// non-empty JSON object.
    pub record: Value,
    pub identity: ArtistIdentity,
}

impl ResolvedArtist {
    /// Final response payload.
    ///
    /// `browseId`, `channelId` and `id` all carry the resolved id, and the
    /// provenance is attached under `_debug`. Records that failed
    /// corroboration also carry `_inconsistentId`, `_requestedId` and
    /// `_returnedId`.
    pub fn into_payload(self) -> ApiResult<Value> {
        let Self {
            mut record,
            identity,
        } = self;
        let debug = serde_json::to_value(&identity)?;

        let Some(record_map) = record.as_object_mut() else {
            return Err(ApiError::not_found());
        };

        if !identity.consistent {
            record_map.insert("_inconsistentId".into(), Value::Bool(true));
            record_map.insert("_requestedId".into(), json!(identity.requested_id));
            record_map.insert("_returnedId".into(), json!(identity.primary_id));
        }

        let id = json!(identity.primary_id);
        record_map.insert("browseId".into(), id.clone());
        record_map.insert("channelId".into(), id.clone());
        record_map.insert("id".into(), id);
        record_map.insert("_debug".into(), debug);

        Ok(record)
    }
}

/// Resolves artist ids against a catalog provider.
pub struct ArtistIdentityResolver<'a> {
    provider: &'a dyn CatalogProvider,
}

impl<'a> ArtistIdentityResolver<'a> {
    pub fn new(provider: &'a dyn CatalogProvider) -> Self {
        Self { provider }
    }

    /// Fetch and reconcile the artist record for `requested_id`.
    ///
    /// # Errors
    /// - `INVALID_INPUT` for an empty or blank id
    /// - the translated provider failure when the first fetch fails
    /// - `NOT_FOUND` when the provider returns no usable record
    ///
    /// A failed or disagreeing corroboration fetch is not an error; the first
    /// record is kept and marked inconsistent.
    pub async fn resolve(&self, requested_id: &str) -> ApiResult<ResolvedArtist> {
        if requested_id.trim().is_empty() {
            return Err(ValidationError::InvalidParameter {
                name: "id".to_string(),
                reason: "artist id must not be empty".to_string(),
            }
            .into());
        }

        let id_shape = ArtistIdShape::classify(requested_id);
        if !id_shape.is_recognized() {
            tracing::warn!(
                requested_id = %requested_id,
                "Artist id matches no known shape, passing through"
            );
        }

        let first = self.fetch(requested_id).await?.ok_or_else(ApiError::not_found)?;
        let returned = ReturnedIds::from_record(&first);
        let name = first.get("name").and_then(Value::as_str).map(str::to_string);

        let mut identity = ArtistIdentity {
            requested_id: requested_id.to_string(),
            id_shape,
            returned_browse_id: returned.browse_id.clone(),
            returned_channel_id: returned.channel_id.clone(),
            returned_record_id: returned.record_id.clone(),
            primary_id: returned.primary().unwrap_or(requested_id).to_string(),
            name,
            consistent: true,
        };

        if !identity.drifted() {
            return Ok(ResolvedArtist {
                record: first,
                identity,
            });
        }

        tracing::info!(
            requested_id = %identity.requested_id,
            returned_id = %identity.primary_id,
            "Artist record returned under a different id, corroborating"
        );

        match self.corroborate(&first, &identity.primary_id).await {
            Some(second) => {
                if let Some(primary) = ReturnedIds::from_record(&second).primary() {
                    identity.primary_id = primary.to_string();
                }
                tracing::info!(
                    requested_id = %identity.requested_id,
                    primary_id = %identity.primary_id,
                    "Artist id corroborated"
                );
                Ok(ResolvedArtist {
                    record: second,
                    identity,
                })
            }
            None => {
                identity.consistent = false;
                tracing::warn!(
                    requested_id = %identity.requested_id,
                    returned_id = %identity.primary_id,
                    "Artist id could not be corroborated, keeping first record"
                );
                Ok(ResolvedArtist {
                    record: first,
                    identity,
                })
            }
        }
    }

    /// Fetch one record. `Ok(None)` means the provider answered with nothing
    /// usable (null, a non-object, or an empty object).
    async fn fetch(&self, id: &str) -> ApiResult<Option<Value>> {
        let value = observed(ProviderOperation::Artist, self.provider.artist(id)).await?;
        let usable = value.as_object().is_some_and(|map| !map.is_empty());
        Ok(usable.then_some(value))
    }

    /// Re-fetch by `primary_id` and keep the result only if its name equals
    /// the name in `first`.
    async fn corroborate(&self, first: &Value, primary_id: &str) -> Option<Value> {
        let second = match self.fetch(primary_id).await {
            Ok(Some(second)) => second,
            Ok(None) => {
                tracing::debug!(primary_id = %primary_id, "Corroboration returned no record");
                return None;
            }
            Err(e) => {
                tracing::debug!(primary_id = %primary_id, error = %e, "Corroboration fetch failed");
                return None;
            }
        };

        // Absent and null names compare equal.
        let name = |record: &Value| record.get("name").filter(|v| !v.is_null()).cloned();
        match (name(first), name(&second)) {
            (a, b) if a == b => Some(second),
            (a, b) => {
                tracing::debug!(
                    primary_id = %primary_id,
                    first_name = ?a,
                    second_name = ?b,
                    "Corroboration record names a different artist"
                );
                None
            }
        }
    }
}
