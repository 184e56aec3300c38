//! Environment-variable placeholder resolution.
//!
//! Leaf values read from a configuration file pass through an [`EnvironmentLoader`]
//! before they are written into the typed record. The bundled
//! [`BraceEnvironmentLoader`] replaces every `${NAME}` with the value of `NAME`.

use regex_lite::Regex;
use std::collections::HashMap;
use std::num::ParseIntError;
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"));

/// Failure to resolve a raw value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("value is empty")]
    Empty,

    #[error("environment variable '{0}' is not set")]
    MissingVariable(String),

    #[error("environment variable '{0}' is not valid unicode")]
    NotUnicode(String),

    #[error("invalid environment variable name '{0}'")]
    InvalidName(String),

    #[error("unterminated placeholder in '{0}'")]
    Unterminated(String),

    #[error("'{value}' is not a valid integer: {source}")]
    NotAnInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Resolves raw configuration values into final strings or integers.
pub trait EnvironmentLoader {
    /// Resolve every placeholder in `raw`.
    fn load_string(&self, raw: &str) -> Result<String, EnvError>;

    /// Resolve `raw` and parse the result as an integer.
    fn load_int(&self, raw: &str) -> Result<i64, EnvError> {
        let value = self.load_string(raw)?;
        value
            .trim()
            .parse::<i64>()
            .map_err(|source| EnvError::NotAnInteger { value, source })
    }
}

impl<E: EnvironmentLoader + ?Sized> EnvironmentLoader for &E {
    fn load_string(&self, raw: &str) -> Result<String, EnvError> {
        (**self).load_string(raw)
    }

    fn load_int(&self, raw: &str) -> Result<i64, EnvError> {
        (**self).load_int(raw)
    }
}

/// Where variable values come from.
#[derive(Debug, Clone, Default)]
enum VarSource {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

/// Loader for `${NAME}` placeholders.
///
/// Text outside placeholders is kept as-is. Substituted values are not scanned
/// again. A blank raw value never resolves.
#[derive(Debug, Clone, Default)]
pub struct BraceEnvironmentLoader {
    vars: VarSource,
}

impl BraceEnvironmentLoader {
    /// Loader reading the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader reading a fixed set of variables instead of the process environment.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: VarSource::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        match &self.vars {
            VarSource::Process => std::env::var(name).map_err(|e| match e {
                std::env::VarError::NotPresent => EnvError::MissingVariable(name.to_string()),
                std::env::VarError::NotUnicode(_) => EnvError::NotUnicode(name.to_string()),
            }),
            VarSource::Fixed(map) => map
                .get(name)
                .cloned()
                .ok_or_else(|| EnvError::MissingVariable(name.to_string())),
        }
    }
}

impl EnvironmentLoader for BraceEnvironmentLoader {
    fn load_string(&self, raw: &str) -> Result<String, EnvError> {
        if raw.trim().is_empty() {
            return Err(EnvError::Empty);
        }

        let mut resolved = String::with_capacity(raw.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let literal = &raw[last..whole.start()];
            if literal.contains("${") {
                return Err(EnvError::Unterminated(raw.to_string()));
            }
            resolved.push_str(literal);

            let name = name.as_str();
            if !is_valid_name(name) {
                return Err(EnvError::InvalidName(name.to_string()));
            }
            resolved.push_str(&self.lookup(name)?);
            last = whole.end();
        }

        let tail = &raw[last..];
        if tail.contains("${") {
            return Err(EnvError::Unterminated(raw.to_string()));
        }
        resolved.push_str(tail);
        Ok(resolved)
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> BraceEnvironmentLoader {
        BraceEnvironmentLoader::with_vars([
            ("PORT", "8080"),
            ("HOST", "db.internal"),
            ("SCHEME", "postgres"),
            ("WORD", "eighty"),
        ])
    }

    #[test]
    fn test_plain_string_is_unchanged() {
        assert_eq!(loader().load_string("localhost").unwrap(), "localhost");
    }

    #[test]
    fn test_single_placeholder() {
        assert_eq!(loader().load_string("${HOST}").unwrap(), "db.internal");
    }

    #[test]
    fn test_embedded_placeholders() {
        assert_eq!(
            loader().load_string("${SCHEME}://${HOST}:${PORT}/app").unwrap(),
            "postgres://db.internal:8080/app"
        );
    }

    #[test]
    fn test_missing_variable() {
        let err = loader().load_string("${NOPE}").unwrap_err();
        assert_eq!(err, EnvError::MissingVariable("NOPE".into()));
        assert_eq!(err.to_string(), "environment variable 'NOPE' is not set");
    }

    #[test]
    fn test_blank_value_fails() {
        assert_eq!(loader().load_string("").unwrap_err(), EnvError::Empty);
        assert_eq!(loader().load_string("   ").unwrap_err(), EnvError::Empty);
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(matches!(
            loader().load_string("${HOST").unwrap_err(),
            EnvError::Unterminated(_)
        ));
        assert!(matches!(
            loader().load_string("${ ${HOST}").unwrap_err(),
            EnvError::InvalidName(_)
        ));
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(
            loader().load_string("${}").unwrap_err(),
            EnvError::InvalidName(String::new())
        );
        assert_eq!(
            loader().load_string("${1ABC}").unwrap_err(),
            EnvError::InvalidName("1ABC".into())
        );
    }

    #[test]
    fn test_substituted_value_not_rescanned() {
        let loader = BraceEnvironmentLoader::with_vars([("A", "${B}"), ("B", "x")]);
        assert_eq!(loader.load_string("${A}").unwrap(), "${B}");
    }

    #[test]
    fn test_load_int() {
        assert_eq!(loader().load_int("${PORT}").unwrap(), 8080);
        assert_eq!(loader().load_int(" 42 ").unwrap(), 42);
        assert_eq!(loader().load_int("-7").unwrap(), -7);
    }

    #[test]
    fn test_load_int_not_numeric() {
        let err = loader().load_int("${WORD}").unwrap_err();
        assert!(matches!(err, EnvError::NotAnInteger { ref value, .. } if value == "eighty"));
        assert!(err.to_string().starts_with("'eighty' is not a valid integer"));
    }

    #[test]
    fn test_process_environment_missing_variable() {
        let loader = BraceEnvironmentLoader::new();
        let err = loader
            .load_string("${CONFBIND_TEST_SURELY_UNSET_VARIABLE}")
            .unwrap_err();
        assert!(matches!(err, EnvError::MissingVariable(_)));
    }

    #[test]
    fn test_process_environment_reads_path() {
        let loader = BraceEnvironmentLoader::new();
        if let Ok(path) = std::env::var("PATH")
            && !path.trim().is_empty()
        {
            assert_eq!(loader.load_string("${PATH}").unwrap(), path);
        }
    }
}
