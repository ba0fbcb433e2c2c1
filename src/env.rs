#[cfg(feature = "clap")]
use std::collections::HashMap;
#[cfg(feature = "clap")]
use std::ffi::OsString;
use std::path::Path;

/// Environment variable name for a flag: `SCREAMING_SNAKE(<base>_<flag>)`,
/// where `<base>` is the last path component of the program name.
///
/// `("/usr/bin/my-app", "server-max_conns")` → `MY_APP_SERVER_MAX_CONNS`
pub fn var_name(program: &str, flag: &str) -> String {
    envify(&format!("{}_{flag}", base_name(program)))
}

/// Last path component of `program`, or `program` itself if it has none.
pub fn base_name(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
}

/// Convert an identifier to `SCREAMING_SNAKE_CASE`.
///
/// Word boundaries are:
/// - any run of non-alphanumeric characters (collapsed to one `_`),
/// - an uppercase letter after a lowercase letter or digit (`fooBar`),
/// - the last capital of an acronym followed by a lowercase letter
///   (`HTTPServer` → `HTTP`, `Server`).
///
/// Words are joined with `_` and uppercased. Leading and trailing separators
/// are dropped.
pub fn envify(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_").to_uppercase()
}

/// Collect environment pairs into a lookup map. Names that are not valid
/// UTF-8 can never match a flag's variable and are dropped; values are kept
/// as-is so the binder can report the ones it cannot read.
///
/// Takes an iterator so tests can pass synthetic data instead of
/// `std::env::vars_os()`.
#[cfg(feature = "clap")]
pub fn collect<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> HashMap<String, OsString>
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into().into_string().ok()?, v.into())))
        .collect()
}
