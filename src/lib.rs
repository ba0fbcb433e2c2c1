//! Bind a config struct to command-line flags and environment variables, and
//! produce redacted copies of it for logging.
//!
//! Define a struct, derive [`Conf`](macro@Conf), and hand an instance to [`load`]:
//!
//! ```ignore
//! use std::time::Duration;
//! use confbind::Conf;
//!
//! #[derive(Conf, Debug, Clone, Default)]
//! pub struct Config {
//!     #[conf(usage = "Address to listen on")]
//!     pub addr: String,
//!     pub timeout: Duration,
//!     #[conf(nested)]
//!     pub db: Db,
//! }
//!
//! #[derive(Conf, Debug, Clone, Default)]
//! pub struct Db {
//!     pub user: String,
//!     #[conf(redact)]
//!     pub password: String,
//! }
//!
//! let mut config = Config::default();
//! confbind::load(&mut config).unwrap_or_else(|e| e.exit());
//! tracing::info!(config = %confbind::list_redacted(&config)?, "starting");
//! ```
//!
//! Running that program as `server` gives it the flags `--addr`,
//! `--timeout`, `--db-user` and `--db-password`, bound to the env vars
//! `SERVER_ADDR`, `SERVER_TIMEOUT`, `SERVER_DB_USER` and
//! `SERVER_DB_PASSWORD`.
//!
//! # Design: struct as source of truth
//!
//! The struct is the schema. Every public field of a flag kind becomes one
//! flag; its current value is the flag's default; public fields whose type
//! is itself a config struct (and private ones marked `#[conf(nested)]`)
//! contribute their fields under a `parent-` prefix. There is no separate
//! registry to keep in sync.
//!
//! Flag kinds are a closed set ([`Kind`]): `bool`, `i32`, `i64`, `u32`,
//! `u64`, `f64`, `String` and `std::time::Duration`. Fields of any other
//! type are ignored by the binder but still take part in redaction.
//!
//! # Field attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `name = "x"` | flag path segment `x` instead of the field name |
//! | `name = "-"` / `skip` | no flag or env var for the field or its subtree |
//! | `usage = "..."` | help text for the flag |
//! | `redact` / `redact = "t"` | reset to `Default` in [`redact`] copies |
//! | `nested` | the field is another `Conf` struct; needed only on private fields |
//!
//! Flag attributes and the redact attribute are independent: a skipped field
//! is still redacted if tagged, and a redacted field still gets a flag.
//!
//! `#[derive(Conf)]` needs `Default` on every field type, plus `Clone` (or
//! `Conf`) on public ones. Structs holding function pointers, channels or
//! other types without `Default` derive [`Fields`](macro@Fields) instead: they bind to flags
//! the same way but cannot be redacted.
//!
//! Only structs with named fields can derive either trait:
//!
//! ```compile_fail
//! #[derive(confbind::Conf)]
//! enum Mode {
//!     Fast,
//!     Slow,
//! }
//! ```
//!
//! ```compile_fail
//! #[derive(confbind::Fields)]
//! struct Pair(pub u32, pub u32);
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Field values          the struct as passed in
//!        ↑ overridden by
//! Environment vars      <PROGRAM>_<FLAG_PATH>, SCREAMING_SNAKE_CASE
//!        ↑ overridden by
//! Command line          --<flag-path>
//! ```
//!
//! # Environment variables
//!
//! Names are `SCREAMING_SNAKE(<program base name>_<flag path>)`. Word
//! boundaries are runs of non-alphanumeric characters, lower-to-upper case
//! changes, and the end of an acronym (`HTTPServer` → `HTTP_SERVER`).
//!
//! | Program | Flag | Env var |
//! |---------|------|---------|
//! | `/usr/bin/myapp` | `port` | `MYAPP_PORT` |
//! | `my-app` | `db-max_conns` | `MY_APP_DB_MAX_CONNS` |
//!
//! Env values use the same grammar as the command line. The first value
//! that fails to parse aborts binding with [`ConfError::EnvValue`].
//!
//! # Redaction
//!
//! [`redact`] returns a new value in which every field tagged with a truthy
//! `redact` (`1`, `t`, `true`, any case) and every private field is
//! `Default::default()`. A redacted nested struct is reset as a whole. The
//! input is not modified.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfError`]. Every error is meant to end
//! the program; [`ConfError::exit`] prints it (argument errors through clap,
//! with usage) and exits.

extern crate self as confbind;

pub mod error;
pub mod redact;
pub mod types;
pub mod walk;

#[cfg(feature = "clap")]
mod bind;
mod duration;
mod env;
#[cfg(feature = "clap")]
mod flagset;
mod listing;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use bind::{bind, load, load_into};
#[cfg(feature = "derive")]
pub use confbind_derive::{Conf, Fields};
pub use env::{envify, var_name as env_var_name};
pub use error::{ConfError, ParseError};
#[cfg(feature = "clap")]
pub use flagset::{Flag, FlagSet};
pub use listing::{Listing, list, list_redacted};
pub use redact::{Conf, redact};
pub use types::{FieldMeta, Kind, Leaf, SKIP, Slot, Value, parse_bool};
pub use walk::Fields;
