use crate::auth::repo::UserRepo;
use crate::blogs::repo::BlogRepo;
use crate::config::AppConfig;
use crate::db::MongoStore;
use crate::memory::MemoryStore;
use mongodb::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub blogs: Arc<dyn BlogRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect to MongoDB and build the shared state. The returned client is
    /// kept by the caller so it can be shut down after the server stops.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, Client)> {
        let client = crate::db::connect(&config.mongo).await?;
        let store = Arc::new(MongoStore::new(&client.database(&config.mongo.database)).await?);
        let state = Self {
            users: store.clone(),
            blogs: store,
            config: Arc::new(config),
        };
        Ok((state, client))
    }

    pub fn from_parts(
        users: Arc<dyn UserRepo>,
        blogs: Arc<dyn BlogRepo>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            blogs,
            config,
        }
    }

    /// State backed by a fresh [`MemoryStore`], returned alongside so callers
    /// can inspect what was persisted.
    pub fn in_memory(config: AppConfig) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = Self::from_parts(store.clone(), store.clone(), Arc::new(config));
        (state, store)
    }
}
