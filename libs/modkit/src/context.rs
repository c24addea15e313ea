use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

impl ConfigProvider for std::collections::HashMap<String, serde_json::Value> {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.get(module_name)
    }
}

/// Everything a module may use while wiring itself.
#[derive(Clone)]
pub struct ModuleCtx {
    db: Option<sea_orm::DatabaseConnection>,
    config_provider: Option<Arc<dyn ConfigProvider>>,
    cancellation_token: CancellationToken,
    module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                db: None,
                config_provider: None,
                cancellation_token: token,
                module_name: None,
            },
        }
    }

    pub fn with_db(mut self, db: sea_orm::DatabaseConnection) -> Self {
        self.inner.db = Some(db);
        self
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope the context to one module so config lookups resolve its section.
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    /// Cheap clone of the pooled connection handle.
    pub fn db(&self) -> Option<sea_orm::DatabaseConnection> {
        self.db.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Deserialize the module's config into `T`.
    ///
    /// A missing section yields `T::default()`; a present but invalid section is an error.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let raw = match (&self.module_name, &self.config_provider) {
            (Some(name), Some(p)) => p.get_module_config(name),
            _ => None,
        };
        match raw {
            Some(v) => serde_json::from_value::<T>(v.clone()).map_err(|e| {
                anyhow::anyhow!(
                    "invalid {} config: {}",
                    self.current_module().unwrap_or("?"),
                    e
                )
            }),
            None => Ok(T::default()),
        }
    }
}
