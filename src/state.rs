use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::CachePolicy,
    services::{
        entity_service::EntityService,
        search_cache::SearchCache,
        session_service::{SessionOptions, SessionService},
    },
    storage::KeyValueStorage,
    store::OrmStore,
};

/// Services shared by every handler; built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub store: OrmStore,
    pub entities: EntityService<OrmStore>,
    pub session: SessionService<OrmStore>,
    pub search: Arc<SearchCache>,
}

impl AppState {
    pub fn new(
        orm: DatabaseConnection,
        storage: Arc<dyn KeyValueStorage>,
        session_options: SessionOptions,
        cache_policy: CachePolicy,
    ) -> Self {
        let search = Arc::new(SearchCache::new(storage.clone(), cache_policy));
        let store = OrmStore::new(orm.clone()).with_write_hook(search.clone());
        Self {
            orm,
            entities: EntityService::new(store.clone()),
            session: SessionService::new(store.clone(), storage, session_options),
            store,
            search,
        }
    }
}
