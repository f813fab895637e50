use super::Guard;
use super::types::{Action, Client, Denied};
use crate::types::QueryParams;

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Query parameter carrying the API key checked by [`MapGuard`].
pub const API_KEY_PARAM: &str = "key";

/// Allows everyone to do everything. Used when no guard is configured.
///
/// This is a placeholder, not a security feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGuard;

#[async_trait]
impl Guard for DefaultGuard {
    async fn authenticate(&self, _params: &QueryParams) -> Result<Client, Denied> {
        Ok(Client::anonymous())
    }

    async fn authorize(
        &self,
        _client: &Client,
        _action: Action,
        _collection: &str,
    ) -> Result<(), Denied> {
        Ok(())
    }
}

/// Allow-list guard: every collection lists the actions permitted on it.
///
/// Without API keys every request authenticates as the anonymous client.
/// Once a key is registered, requests must carry a known `key` parameter.
#[derive(Debug, Clone, Default)]
pub struct MapGuard {
    allowed: HashMap<String, HashSet<Action>>,
    api_keys: HashMap<String, Client>,
}

impl MapGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow<I>(mut self, collection: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        self.allowed
            .entry(collection.to_string())
            .or_default()
            .extend(actions);
        self
    }

    pub fn with_api_key(mut self, key: &str, client: &str) -> Self {
        self.api_keys
            .insert(key.to_string(), Client(client.to_string()));
        self
    }

    pub fn is_allowed(&self, action: Action, collection: &str) -> bool {
        self.allowed
            .get(collection)
            .map(|actions| actions.contains(&action))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Guard for MapGuard {
    async fn authenticate(&self, params: &QueryParams) -> Result<Client, Denied> {
        if self.api_keys.is_empty() {
            return Ok(Client::anonymous());
        }

        let key = params
            .get(API_KEY_PARAM)
            .ok_or_else(|| Denied::new("missing api key"))?;

        self.api_keys
            .get(key)
            .cloned()
            .ok_or_else(|| Denied::new("invalid api key"))
    }

    async fn authorize(
        &self,
        _client: &Client,
        action: Action,
        collection: &str,
    ) -> Result<(), Denied> {
        if self.is_allowed(action, collection) {
            Ok(())
        } else {
            Err(Denied::new("action not allowed for this collection"))
        }
    }
}
