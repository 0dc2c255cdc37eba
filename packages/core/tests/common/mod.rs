//! Shared helpers for integration tests

#![allow(dead_code)]

use contentgraph_core::config::ContentTypeOptions;
use contentgraph_core::services::ContentStore;
use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to warnings so duplicate-path skips show up in
/// failing test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Store with the given content types registered under default options
pub fn store_with_types(type_names: &[&str]) -> anyhow::Result<ContentStore> {
    init_tracing();

    let mut store = ContentStore::new();
    for type_name in type_names {
        store.add_content_type(ContentTypeOptions::new(*type_name))?;
    }
    Ok(store)
}
