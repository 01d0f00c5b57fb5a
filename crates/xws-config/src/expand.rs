//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("XWS_TEST_HOST", "wiki.example.com");
        }
        let result = expand_env("https://${XWS_TEST_HOST}", "storage.xwiki_url").unwrap();
        assert_eq!(result, "https://wiki.example.com");
        unsafe {
            std::env::remove_var("XWS_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("XWS_TEST_UNSET_SPACE");
        }
        let result = expand_env("${XWS_TEST_UNSET_SPACE:-JIO}", "storage.default_space").unwrap();
        assert_eq!(result, "JIO");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("XWS_TEST_MISSING");
        }
        let err = expand_env("${XWS_TEST_MISSING}", "storage.xwiki_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("XWS_TEST_MISSING"));
        assert!(err.to_string().contains("storage.xwiki_url"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("http://localhost:8080", "storage.xwiki_url").unwrap();
        assert_eq!(result, "http://localhost:8080");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("Space$1", "storage.default_space").unwrap();
        assert_eq!(result, "Space$1");
    }
}
