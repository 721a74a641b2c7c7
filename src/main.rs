mod run;

use std::sync::Once;

use anyhow::Result;

static TRACING_INIT: Once = Once::new();

fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    match args.len() {
        0 | 1 => {
            run::print_usage();
            Ok(())
        }
        _ => run::as_cli(&args),
    }
}

/// Logs go to stderr so reports on stdout stay clean. `RUST_LOG` overrides
/// the default `fintrack=warn`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("fintrack=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
