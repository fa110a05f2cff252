pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "mywill=info";

/// Installs the global stderr subscriber. Invalid extra directives are
/// reported and skipped.
pub fn init_tracing(extra: Option<&str>) {
    let mut filter = EnvFilter::from_default_env();
    let extras = extra
        .into_iter()
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|directive| !directive.is_empty());
    for directive in std::iter::once(DEFAULT_DIRECTIVE).chain(extras) {
        match directive.parse() {
            Ok(parsed) => filter = filter.add_directive(parsed),
            Err(err) => eprintln!("ignoring log directive `{directive}`: {err}"),
        }
    }

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
