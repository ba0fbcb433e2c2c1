//! # confbind demo application
//!
//! A sample program that binds [`DemoConfig`](config::DemoConfig) to flags
//! and environment variables, then logs a redacted copy of the result. It
//! exists to demonstrate and manually verify confbind's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example confbind_demo -- --help
//! cargo run --example confbind_demo -- --server-port 9090
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                                           |
//! |-----------------------|------------------------------------------------------------------------------|
//! | Field defaults        | `cargo run --example confbind_demo`                                          |
//! | Env var override      | `CONFBIND_DEMO_SERVER_PORT=9999 cargo run --example confbind_demo`           |
//! | Flag beats env var    | `CONFBIND_DEMO_SERVER_PORT=9999 cargo run --example confbind_demo -- --server-port 1` |
//! | Bad env var value     | `CONFBIND_DEMO_SERVER_PORT=abc cargo run --example confbind_demo`            |
//! | Redaction             | `cargo run --example confbind_demo -- --database-password hunter2`           |
//! | JSON listing          | `cargo run --example confbind_demo -- --json`                                |
//! | Binder debug logs     | `RUST_LOG=confbind=debug cargo run --example confbind_demo`                  |

mod config;

use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use confbind::FlagSet;

use config::DemoConfig;

fn main() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .try_init();

    let mut config = DemoConfig::default();
    let mut flags = FlagSet::from_process().about("confbind demo: a sample app for confbind");
    if let Err(err) = confbind::load_into(&mut flags, &mut config) {
        err.exit();
    }

    let listing = confbind::list_redacted(&config).unwrap_or_else(|err| err.exit());
    if config.verbose {
        for flag in flags.iter().filter(|f| f.value != f.default) {
            info!(flag = %flag.name, "overridden");
        }
    }

    if config.json {
        match serde_json::to_string_pretty(&listing) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    info!(name = %config.name, labels = ?config.labels, "starting");
    println!("{listing}");
}
