use tracing_subscriber::EnvFilter;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once per process. `RUST_LOG` wins when set;
/// otherwise `default_level` applies. Logs go to stderr so stdout only carries
/// the report echo.
pub fn init_tracing_with(default_level: &str) {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(env_filter))
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn init_tracing_once() {
    init_tracing_with("info");
}
