//! Storage Module Tests
//!
//! Validates the reference backend against the storage contract.
//!
//! ## Test Scopes
//! - **Status mapping**: error taxonomy to HTTP status and message.
//! - **MapStorage**: CRUD semantics, collection administration and concurrent creates.

#[cfg(test)]
mod tests {
    use crate::storage::memory::MapStorage;
    use crate::storage::protocol::{
        COLLECTION_NOT_FOUND, RESOURCE_NOT_FOUND, StatusResponse, Storage, StorageError,
    };
    use crate::types::{QueryParams, Resource};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn resource(value: serde_json::Value) -> Resource {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("test resource must be an object, got {}", other),
        }
    }

    fn gorillaz() -> Resource {
        resource(json!({"name": "Gorillaz", "albums": []}))
    }

    // ============================================================
    // STATUS RESPONSE TESTS
    // ============================================================

    #[test]
    fn test_storage_error_status_codes() {
        assert_eq!(
            StorageError::CollectionNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StorageError::ResourceNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(StorageError::ResourceExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            StorageError::InvalidResource("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StorageError::Internal("db down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_variants_differ_only_by_message() {
        let collection: StatusResponse = StorageError::CollectionNotFound.into();
        let resource: StatusResponse = StorageError::ResourceNotFound.into();

        assert_eq!(collection.status, resource.status);
        assert_eq!(collection.error.as_deref(), Some(COLLECTION_NOT_FOUND));
        assert_eq!(resource.error.as_deref(), Some(RESOURCE_NOT_FOUND));
    }

    #[test]
    fn test_status_response_empty_error_is_none() {
        let status = StatusResponse::new(StatusCode::OK, "");
        assert!(status.error.is_none());
        assert!(status.is_success());
    }

    // ============================================================
    // MAP STORAGE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_unknown_collection_is_not_found_for_every_operation() {
        let storage = MapStorage::new();
        let params = QueryParams::new();

        let (id, status) = storage.create("artists", gorillaz(), &params).await;
        assert!(id.is_none());
        assert_eq!(status.error.as_deref(), Some(COLLECTION_NOT_FOUND));

        let (found, status) = storage.get("artists", "1", &params).await;
        assert!(found.is_none());
        assert_eq!(status.status, StatusCode::NOT_FOUND);
        assert_eq!(status.error.as_deref(), Some(COLLECTION_NOT_FOUND));

        let (all, status) = storage.get_all("artists", &params).await;
        assert!(all.is_empty());
        assert_eq!(status.error.as_deref(), Some(COLLECTION_NOT_FOUND));

        let status = storage.update("artists", "1", gorillaz(), &params).await;
        assert_eq!(status.error.as_deref(), Some(COLLECTION_NOT_FOUND));

        let status = storage.delete("artists", "1", &params).await;
        assert_eq!(status.error.as_deref(), Some(COLLECTION_NOT_FOUND));

        let status = storage.delete_all("artists", &params).await;
        assert_eq!(status.status, StatusCode::NOT_FOUND);
        assert_eq!(status.error.as_deref(), Some(COLLECTION_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_resource() {
        let storage = MapStorage::with_collections(["artists"]);
        let params = QueryParams::new();

        let (id, status) = storage.create("artists", gorillaz(), &params).await;
        assert_eq!(status.status, StatusCode::CREATED);
        let id = id.expect("backend should assign an id");
        assert!(!id.is_empty());

        let (found, status) = storage.get("artists", &id, &params).await;
        assert_eq!(status, StatusResponse::ok());
        assert_eq!(found, Some(gorillaz()));
    }

    #[tokio::test]
    async fn test_update_replaces_whole_resource() {
        let storage = MapStorage::with_collections(["artists"]);
        let params = QueryParams::new();

        let (id, _) = storage
            .create(
                "artists",
                resource(json!({"name": "Gorillaz", "formed": 1998})),
                &params,
            )
            .await;
        let id = id.unwrap();

        let replacement = resource(json!({"name": "Gorillaz", "albums": ["x"]}));
        let status = storage
            .update("artists", &id, replacement.clone(), &params)
            .await;
        assert_eq!(status.status, StatusCode::OK);

        let (found, _) = storage.get("artists", &id, &params).await;
        let found = found.unwrap();
        assert_eq!(found, replacement);
        assert!(!found.contains_key("formed"), "update must not merge");
    }

    #[tokio::test]
    async fn test_update_unknown_resource_is_not_found() {
        let storage = MapStorage::with_collections(["artists"]);
        let status = storage
            .update("artists", "missing", gorillaz(), &QueryParams::new())
            .await;

        assert_eq!(status.status, StatusCode::NOT_FOUND);
        assert_eq!(status.error.as_deref(), Some(RESOURCE_NOT_FOUND));
        assert_eq!(storage.resource_count("artists"), Some(0));
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent_for_resources() {
        let storage = MapStorage::with_collections(["artists"]);
        let params = QueryParams::new();
        let (id, _) = storage.create("artists", gorillaz(), &params).await;
        let id = id.unwrap();

        let status = storage.delete("artists", &id, &params).await;
        assert_eq!(status.status, StatusCode::OK);

        let (found, status) = storage.get("artists", &id, &params).await;
        assert!(found.is_none());
        assert_eq!(status.error.as_deref(), Some(RESOURCE_NOT_FOUND));

        let status = storage.delete("artists", &id, &params).await;
        assert_eq!(status.status, StatusCode::NOT_FOUND);
        assert_eq!(status.error.as_deref(), Some(RESOURCE_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_delete_all_clears_but_keeps_collection() {
        let storage = MapStorage::with_collections(["albums"]);
        let params = QueryParams::new();

        for i in 0..5 {
            storage
                .create("albums", resource(json!({"title": format!("Album {}", i)})), &params)
                .await;
        }
        let (all, _) = storage.get_all("albums", &params).await;
        assert_eq!(all.len(), 5);

        assert_eq!(storage.delete_all("albums", &params).await.status, StatusCode::OK);
        assert_eq!(storage.delete_all("albums", &params).await.status, StatusCode::OK);

        let (all, status) = storage.get_all("albums", &params).await;
        assert!(all.is_empty());
        assert_eq!(status.status, StatusCode::OK);
        assert_eq!(storage.collections(), vec!["albums".to_string()]);
    }

    #[tokio::test]
    async fn test_collection_administration() {
        let storage = MapStorage::new();

        assert!(storage.add_collection("artists").is_ok());
        assert_eq!(
            storage.add_collection("artists"),
            Err(StorageError::CollectionExists)
        );
        assert!(storage.add_collection("albums").is_ok());
        assert_eq!(
            storage.collections(),
            vec!["albums".to_string(), "artists".to_string()]
        );

        assert!(storage.remove_collection("artists").is_ok());
        assert_eq!(
            storage.remove_collection("artists"),
            Err(StorageError::CollectionNotFound)
        );
        assert_eq!(storage.resource_count("artists"), None);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let storage = Arc::new(MapStorage::with_collections(["artists"]));

        let mut handles = Vec::new();
        for i in 0..64 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                let (id, status) = storage
                    .create(
                        "artists",
                        resource(json!({"name": format!("Artist {}", i)})),
                        &QueryParams::new(),
                    )
                    .await;
                assert_eq!(status.status, StatusCode::CREATED);
                id.unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 64, "Every concurrent create should get its own id");
        assert_eq!(storage.resource_count("artists"), Some(64));
    }
}
