//! Configuration structs for the confbind demo application.
//!
//! A two-level hierarchy: the root [`DemoConfig`] holds a few scalars plus
//! the nested [`ServerConfig`] and [`DatabaseConfig`]. Field values set in
//! the `Default` impls are the flag defaults.
//!
//! # Flag and env var mapping
//!
//! Run as `confbind_demo`, the fields bind to:
//!
//! | Flag                       | Env var                              |
//! |----------------------------|--------------------------------------|
//! | `--name`                   | `CONFBIND_DEMO_NAME`                 |
//! | `--verbose`                | `CONFBIND_DEMO_VERBOSE`              |
//! | `--json`                   | `CONFBIND_DEMO_JSON`                 |
//! | `--server-host`            | `CONFBIND_DEMO_SERVER_HOST`          |
//! | `--server-port`            | `CONFBIND_DEMO_SERVER_PORT`          |
//! | `--server-read-timeout`    | `CONFBIND_DEMO_SERVER_READ_TIMEOUT`  |
//! | `--database-url`           | `CONFBIND_DEMO_DATABASE_URL`         |
//! | `--database-user`          | `CONFBIND_DEMO_DATABASE_USER`        |
//! | `--database-password`      | `CONFBIND_DEMO_DATABASE_PASSWORD`    |
//! | `--database-max-conns`     | `CONFBIND_DEMO_DATABASE_MAX_CONNS`   |

use std::time::Duration;

use confbind::Conf;

#[derive(Conf, Debug, Clone)]
pub struct DemoConfig {
    #[conf(usage = "Application name shown in the banner")]
    pub name: String,

    #[conf(usage = "Log at debug level")]
    pub verbose: bool,

    #[conf(usage = "Print the redacted config as JSON")]
    pub json: bool,

    #[conf(nested)]
    pub server: ServerConfig,

    #[conf(nested)]
    pub database: DatabaseConfig,

    /// Not a flag kind, so not bound; still copied into redacted output.
    pub labels: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: "confbind-demo".into(),
            verbose: false,
            json: false,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            labels: vec!["demo".into()],
        }
    }
}

#[derive(Conf, Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    #[conf(usage = "Port to listen on")]
    pub port: u32,
    #[conf(name = "read-timeout", usage = "Per-request read timeout")]
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            read_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Conf, Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: String,
    #[conf(redact, usage = "Database password")]
    pub password: String,
    #[conf(name = "max-conns")]
    pub max_conns: i32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/demo".into(),
            user: "demo".into(),
            password: String::new(),
            max_conns: 10,
        }
    }
}
