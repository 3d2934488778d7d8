//! Property tests for cache keying and artist resolution.

use std::sync::Arc;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use serde_json::Value;
use soundpulse_api::{ApiCache, ArtistIdentityResolver, CatalogQuery, Dispatcher, PayloadSource};
use soundpulse_core::{CacheTtlConfig, CatalogProvider, ProviderOperation};
use soundpulse_test_utils::fixtures;
use soundpulse_test_utils::generators::{
    arb_browse_id, arb_channel_id, arb_limit, arb_query, arb_unrecognized_id,
};
use soundpulse_test_utils::MockCatalogProvider;
use tokio::runtime::Runtime;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn search(query: &str, limit: u32) -> CatalogQuery {
    CatalogQuery::Search {
        q: Some(query.to_string()),
        filter: None,
        limit: Some(limit.to_string()),
    }
}

fn fail(e: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(e.to_string())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Identical parameters share one entry; any differing limit gets its own.
    #[test]
    fn prop_search_key_tracks_every_parameter(
        query in arb_query(),
        limit in arb_limit(),
        other_limit in arb_limit(),
    ) {
        let key = search(&query, limit).validate().map_err(fail)?.cache_key();
        let same = search(&query, limit).validate().map_err(fail)?.cache_key();
        let other = search(&query, other_limit).validate().map_err(fail)?.cache_key();

        prop_assert_eq!(&key, &same);
        prop_assert_eq!(key == other, limit == other_limit);
    }

    /// A repeated search is served from the cache with the same payload.
    #[test]
    fn prop_repeated_search_hits_cache(query in arb_query(), limit in arb_limit()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let provider = Arc::new(
                MockCatalogProvider::new()
                    .with_default(ProviderOperation::Search, Ok(fixtures::search_results(2))),
            );
            let dispatcher = Dispatcher::new(
                Some(provider.clone() as Arc<dyn CatalogProvider>),
                ApiCache::in_memory(),
                CacheTtlConfig::default(),
            );

            let first = dispatcher.dispatch(search(&query, limit)).await.map_err(fail)?;
            let second = dispatcher.dispatch(search(&query, limit)).await.map_err(fail)?;

            prop_assert_eq!(first.source, PayloadSource::Provider);
            prop_assert_eq!(second.source, PayloadSource::Cache);
            prop_assert!(Arc::ptr_eq(&first.payload, &second.payload));
            prop_assert_eq!(provider.call_count(ProviderOperation::Search), 1);
            Ok(())
        })?;
    }

    /// A record echoing the requested id is always consistent, whatever its shape.
    #[test]
    fn prop_echoed_id_is_consistent(
        id in prop_oneof![arb_channel_id(), arb_browse_id(), arb_unrecognized_id()],
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let provider = MockCatalogProvider::new().with_response(
                ProviderOperation::Artist,
                id.clone(),
                fixtures::artist("Artist", Some(id.as_str()), Some(id.as_str()), None),
            );

            let resolved = ArtistIdentityResolver::new(&provider)
                .resolve(&id)
                .await
                .map_err(fail)?;
            prop_assert!(resolved.identity.consistent);
            prop_assert_eq!(&resolved.identity.primary_id, &id);
            prop_assert_eq!(provider.total_calls(), 1);

            let payload: Value = resolved.into_payload().map_err(fail)?;
            prop_assert!(payload.get("_inconsistentId").is_none());
            prop_assert_eq!(payload["id"].as_str(), Some(id.as_str()));
            Ok(())
        })?;
    }
}
