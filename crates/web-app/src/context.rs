use chrono::NaiveDate;
use liftbook_domain as domain;
use liftbook_storage as storage;
use log::info;

/// Services shared by all pages.
pub struct Context<S, C> {
    pub workouts: S,
    pub catalog: domain::FallbackCatalog<C>,
    /// Exercise picked in the library, waiting to be added to the next new workout.
    pub handoff: domain::Handoff<domain::Exercise>,
}

impl<S, C: domain::CatalogRepository> Context<S, C> {
    pub fn new(workouts: S, catalog: C) -> Self {
        Self {
            workouts,
            catalog: domain::FallbackCatalog::new(catalog),
            handoff: domain::Handoff::new(),
        }
    }
}

pub type RestContext = Context<
    domain::Service<storage::REST<storage::ReqwestSendRequest>>,
    storage::ExerciseDB<storage::ReqwestSendRequest>,
>;

pub type DocumentContext = Context<
    domain::Service<storage::DocumentStore<storage::ReqwestSendRequest>>,
    storage::ExerciseDB<storage::ReqwestSendRequest>,
>;

impl RestContext {
    #[must_use]
    pub fn from_config(config: &storage::Config) -> Self {
        info!("using workout API at {}", config.api_url);
        Context::new(
            domain::Service::new(storage::REST::new(config.api_url.clone())),
            storage::ExerciseDB::new(config.catalog.clone()),
        )
    }
}

impl DocumentContext {
    /// Returns `None` if no document store is configured.
    #[must_use]
    pub fn from_config(config: &storage::Config) -> Option<Self> {
        let document_store = config.document_store.clone()?;
        info!("using document store at {}", document_store.url);
        Some(Context::new(
            domain::Service::new(storage::DocumentStore::new(document_store)),
            storage::ExerciseDB::new(config.catalog.clone()),
        ))
    }
}

#[must_use]
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
