use std::env;
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Install the global tracing subscriber. `RUST_LOG` wins, otherwise `info`.
///
/// Safe to call repeatedly, which lets every test call it.
pub fn init() {
    INIT.call_once(|| {
        let filter = match env::var("RUST_LOG") {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) => EnvFilter::new("info"),
        };

        let result = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init();

        if result.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    });
}
