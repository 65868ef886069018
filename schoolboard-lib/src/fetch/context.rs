//! Collaborators shared by fetch lifecycles.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::FetchConfig;
use crate::navigation::{Navigator, NoopNavigator};
use crate::storage::LocalStorage;

/// The environment a fetch lifecycle runs in: HTTP client, credential
/// storage, navigation boundary and settings.
///
/// Cheap to clone; one context usually serves every lifecycle of an app.
#[derive(Clone)]
pub struct FetchContext {
    pub(crate) client: ApiClient,
    pub(crate) storage: Arc<dyn LocalStorage>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) config: FetchConfig,
}

impl FetchContext {
    /// Creates a context with a logging-only navigator and default config.
    pub fn new(client: ApiClient, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            client,
            storage,
            navigator: Arc::new(NoopNavigator),
            config: FetchConfig::default(),
        }
    }

    /// Sets the navigator receiving login redirects.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Sets the fetch configuration.
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn storage(&self) -> &Arc<dyn LocalStorage> {
        &self.storage
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("client", &self.client)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
