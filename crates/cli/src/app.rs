use crate::auth::AdminSet;
use crate::config::Config;
use anyhow::{Context, Result};
use termbot_analytics::{Analytics, AnalyticsConfig};
use termbot_store::{IdMapper, TermStore};
use tokio::time::Duration;

/// Composition root: every process-wide collaborator is built exactly
/// once here and passed around by reference. There is no hidden global
/// state anywhere below this point.
pub struct App {
    pub config: Config,
    pub store: TermStore,
    pub mapper: IdMapper,
    pub analytics: Analytics,
    pub admins: AdminSet,
}

impl App {
    pub fn init(config: Config) -> Result<App> {
        // Catalog load fails soft: an empty store serves empty results.
        let store = TermStore::load(&config.catalog.terms_file);
        if store.is_empty() {
            log::warn!(
                "Term catalog {} is empty; all lookups will return nothing",
                config.catalog.terms_file.display()
            );
        }

        // Walk the catalog in listing order so IDs are stable across
        // restarts.
        let mapper = IdMapper::new();
        mapper.prime_from_store(&store);

        let analytics = Analytics::start(
            &config.catalog.data_dir,
            AnalyticsConfig {
                batch_size: config.analytics.batch_size,
                flush_timeout: Duration::from_millis(config.analytics.flush_timeout_ms),
                queue_capacity: config.analytics.queue_capacity,
            },
        )
        .context("failed to start the analytics writer")?;

        let admins = AdminSet::new(config.admin.user_ids.iter().copied());

        Ok(App {
            config,
            store,
            mapper,
            analytics,
            admins,
        })
    }
}
