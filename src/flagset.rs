//! Flag registry and its clap adapter.
//!
//! A [`FlagSet`] is the explicit registry the binder writes into: one
//! [`Flag`] per bound config field, keyed by path. It is created once at
//! process entry, handed to [`bind`](crate::bind), and afterwards can render
//! usage or be inspected. Iteration is in lexicographic flag-name order,
//! which is also the order environment overrides are applied in.
//!
//! Argument syntax, help output and argument errors belong to clap:
//! [`FlagSet::command`] builds a runtime `clap::Command` with one `--<path>`
//! option per flag. Values are parsed with [`Kind::parse`], so the command
//! line accepts exactly what the environment does. A non-bool flag always
//! takes the next argument as its value, even when it starts with `-`. Zero
//! defaults are left out of the help text.

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::env;
use crate::error::ConfError;
use crate::types::{Kind, Value};

/// One registered flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    pub name: String,
    pub kind: Kind,
    /// Value the field held when the flag was registered.
    pub default: Value,
    /// Current value: the default, then env, then command line.
    pub value: Value,
    pub usage: String,
    env_var: Option<String>,
}

impl Flag {
    pub fn new(name: &str, default: Value, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: default.kind(),
            value: default.clone(),
            default,
            usage: usage.to_string(),
            env_var: None,
        }
    }

    /// The environment variable bound to this flag, once
    /// [`FlagSet::bind_env_names`] has run.
    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    fn arg(&self) -> Arg {
        let kind = self.kind;
        let mut arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.usage.clone())
            .action(ArgAction::Set)
            .value_parser(move |text: &str| kind.parse(text));

        if kind == Kind::Bool {
            arg = arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_name("BOOL");
        } else {
            arg = arg
                .value_name(kind.name().to_uppercase())
                .allow_hyphen_values(true);
        }

        if !self.default.is_zero() {
            arg = arg.default_value(self.default.to_string());
        }
        arg
    }
}

/// Registry of flags bound to a config struct.
#[derive(Debug, Clone)]
pub struct FlagSet {
    name: String,
    about: Option<String>,
    flags: BTreeMap<String, Flag>,
}

impl FlagSet {
    /// `name` is the program's invocation name; its last path component
    /// prefixes every environment variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            flags: BTreeMap::new(),
        }
    }

    /// A registry named after `argv[0]` of the running process.
    pub fn from_process() -> Self {
        let name = std::env::args_os()
            .next()
            .map(|arg| arg.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name)
    }

    /// Description shown at the top of `--help`.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a flag. Registering the same name twice is an error.
    pub fn add(&mut self, flag: Flag) -> Result<(), ConfError> {
        if self.flags.contains_key(&flag.name) {
            return Err(ConfError::FlagRedefined(flag.name));
        }
        self.flags.insert(flag.name.clone(), flag);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Flag> {
        self.flags.get_mut(name)
    }

    /// Flags in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Derive each flag's environment variable and append
    /// `(env var NAME)` to its usage. Flags that already have one are left
    /// alone.
    pub fn bind_env_names(&mut self) {
        let program = self.name.clone();
        for flag in self.flags.values_mut() {
            if flag.env_var.is_some() {
                continue;
            }
            let var = env::var_name(&program, &flag.name);
            if !flag.usage.is_empty() {
                flag.usage.push(' ');
            }
            flag.usage.push_str(&format!("(env var {var})"));
            flag.env_var = Some(var);
        }
    }

    /// Build the clap command for this registry.
    ///
    /// A registered flag named `help` replaces clap's own `--help`/`-h`.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env::base_name(&self.name).to_string())
            .args_override_self(true)
            .disable_help_flag(self.flags.contains_key("help"))
            .args(self.flags.values().map(Flag::arg));
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        command
    }

    /// Rendered `--help` text.
    pub fn usage(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Parse `args` (program name first) with clap and return the flags that
    /// were given on the command line, with their parsed values.
    pub fn parse_args<I, T>(&self, args: I) -> Result<Vec<(String, Value)>, ConfError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        Ok(self.from_command_line(&matches))
    }

    fn from_command_line(&self, matches: &ArgMatches) -> Vec<(String, Value)> {
        self.flags
            .keys()
            .filter(|name| matches.value_source(name.as_str()) == Some(ValueSource::CommandLine))
            .filter_map(|name| {
                let value = matches.get_one::<Value>(name.as_str())?;
                Some((name.clone(), value.clone()))
            })
            .collect()
    }
}
