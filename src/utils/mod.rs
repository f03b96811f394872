use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` adds or overrides directives.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        for directive in ["account_manager=info", "money_core=warn"] {
            if let Ok(parsed) = directive.parse::<Directive>() {
                filter = filter.add_directive(parsed);
            }
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
