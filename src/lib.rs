pub mod analysis;
pub mod catalog;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod orchestrator;
pub mod profile;
pub mod synthesis;
pub mod taxonomy;
pub mod units;

use std::sync::Arc;

use catalog::StaticCatalog;
use config::Config;
use error::Result;
use orchestrator::Orchestrator;
use taxonomy::TaxonomyRegistry;

/// Load the taxonomy and catalog named by `config` and register every default unit.
pub fn build_orchestrator(config: &Config) -> Result<(TaxonomyRegistry, Orchestrator)> {
    let registry = TaxonomyRegistry::load(config.taxonomy.frameworks_path.as_deref())?;
    let catalog = StaticCatalog::load(config.catalog.path.as_deref())?;
    let orchestrator = Orchestrator::with_default_units(config, &registry, Arc::new(catalog))?;
    Ok((registry, orchestrator))
}
