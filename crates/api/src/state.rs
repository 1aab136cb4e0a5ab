//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::services::mailer::OrderMailer;
use crate::services::storage::ObjectStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenService,
    storage: Arc<dyn ObjectStorage>,
    mailer: Arc<dyn OrderMailer>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    /// * `storage` - object storage for uploads
    /// * `mailer` - order confirmation sender
    #[must_use]
    pub fn new(
        config: ApiConfig,
        pool: PgPool,
        storage: Arc<dyn ObjectStorage>,
        mailer: Arc<dyn OrderMailer>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiration_secs);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                storage,
                mailer,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the object storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn ObjectStorage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the order mailer.
    #[must_use]
    pub fn mailer(&self) -> &dyn OrderMailer {
        self.inner.mailer.as_ref()
    }
}
