use std::sync::Arc;

use infra::store::Store;

use crate::auth::{AuthConfig, JwtService};
use crate::notify::{LogNotifier, Notifier};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    jwt_service: JwtService,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        Ok(Self::with_config(store, auth_config))
    }

    pub fn with_config(store: Arc<dyn Store>, config: AuthConfig) -> Self {
        let jwt_service = JwtService::new(&config);
        Self {
            store,
            jwt_service,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }
}
