#![doc(test(attr(deny(warnings))))]

//! mywill drafts a UK will through a step-by-step terminal wizard.
//!
//! The wizard logic lives in the `will-*` crates; this package wires them to
//! configuration, JSON storage and the `mywill_cli` front-end.

pub mod cli;
pub mod utils;

pub use will_config as config;
pub use will_core as core;
pub use will_domain as domain;
pub use will_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, adding `filter` (e.g. from config) to the
/// default directives. Only the first call has any effect.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("mywill tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init_with_filter(Some("will_core=debug"));
    }
}
