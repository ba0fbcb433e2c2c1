//! Bind a config struct to command-line flags and environment variables.
//!
//! Operates on injected environment pairs and arguments, so the whole
//! pipeline is testable without touching the process. Steps:
//!
//! 1. Walk the struct and register one flag per public leaf field of a flag
//!    kind, defaulting to the field's current value
//! 2. Derive each flag's env var name and note it in the usage text
//! 3. Apply env overrides in flag-name order; the first bad (or non-UTF-8)
//!    value aborts
//! 4. Parse the command line with clap; given flags overwrite env values
//!
//! Precedence, lowest to highest:
//!
//! ```text
//! Field values          whatever the struct held before bind()
//!        ↑ overridden by
//! Environment vars      MYAPP_SERVER_PORT=9090
//!        ↑ overridden by
//! Command line          --server-port 9090
//! ```

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;

use tracing::debug;

use crate::env;
use crate::error::{ConfError, ParseError};
use crate::flagset::{Flag, FlagSet};
use crate::types::{Kind, Slot, Value};
use crate::walk::{Fields, walk_mut};

/// Register `config`'s fields in `flags`, then apply `env` and `args` to it.
///
/// `args` starts with the program name, as `std::env::args_os()` does. On
/// error, values applied before the failure stay applied.
pub fn bind<C, E, K, V, A, T>(
    flags: &mut FlagSet,
    config: &mut C,
    env: E,
    args: A,
) -> Result<(), ConfError>
where
    C: Fields,
    E: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
    A: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut slots = register(flags, config)?;
    flags.bind_env_names();
    apply_env(flags, &mut slots, &env::collect(env))?;

    for (name, value) in flags.parse_args(args)? {
        debug!(flag = %name, value = %value, "applying command-line value");
        set(flags, &mut slots, &name, value);
    }
    Ok(())
}

/// [`bind`] against the running process: `argv[0]` names the registry,
/// arguments come from `std::env::args_os()`, overrides from
/// `std::env::vars_os()`.
///
/// A bad environment value prints the usage text to stderr before the error
/// is returned.
pub fn load<C: Fields>(config: &mut C) -> Result<FlagSet, ConfError> {
    let mut flags = FlagSet::from_process();
    load_into(&mut flags, config)?;
    Ok(flags)
}

/// Like [`load`], with a caller-built registry (e.g. one with an `about`
/// text).
pub fn load_into<C: Fields>(flags: &mut FlagSet, config: &mut C) -> Result<(), ConfError> {
    match bind(flags, config, std::env::vars_os(), std::env::args_os()) {
        Err(err @ ConfError::EnvValue { .. }) => {
            eprint!("{}", flags.usage());
            Err(err)
        }
        other => other,
    }
}

fn register<'a, C: Fields>(
    flags: &mut FlagSet,
    config: &'a mut C,
) -> Result<BTreeMap<String, Slot<'a>>, ConfError> {
    let mut slots = BTreeMap::new();
    for field in walk_mut(config, "") {
        let Some(slot) = field.slot else {
            continue;
        };
        let usage = field.meta.usage.unwrap_or_default();
        flags.add(Flag::new(&field.path, slot.get(), usage))?;
        debug!(flag = %field.path, kind = %slot.kind(), "registered flag");
        slots.insert(field.path, slot);
    }
    Ok(slots)
}

fn apply_env(
    flags: &mut FlagSet,
    slots: &mut BTreeMap<String, Slot<'_>>,
    vars: &HashMap<String, OsString>,
) -> Result<(), ConfError> {
    let bound: Vec<(String, String, Kind)> = flags
        .iter()
        .filter_map(|flag| {
            let var = flag.env_var()?;
            Some((flag.name.clone(), var.to_string(), flag.kind))
        })
        .collect();

    for (name, var, kind) in bound {
        let Some(raw) = vars.get(&var) else {
            continue;
        };
        let value = match raw.to_str() {
            Some(text) => kind.parse(text),
            None => Err(ParseError::new(&raw.to_string_lossy(), kind, "invalid UTF-8")),
        }
        .map_err(|source| ConfError::EnvValue {
            value: source.value.clone(),
            var: var.clone(),
            source,
        })?;
        debug!(flag = %name, env = %var, "applying env value");
        set(flags, slots, &name, value);
    }
    Ok(())
}

fn set(flags: &mut FlagSet, slots: &mut BTreeMap<String, Slot<'_>>, name: &str, value: Value) {
    if let Some(slot) = slots.get_mut(name) {
        slot.set(value.clone());
    }
    if let Some(flag) = flags.get_mut(name) {
        flag.value = value;
    }
}
