use std::env;
use std::str::FromStr;

use tracing::warn;

/// Reads `name` from the environment, falling back when unset. A value
/// that is set but does not parse is reported, not silently swallowed; a
/// typo in an override should be visible in the logs.
pub fn env_or<T: FromStr>(name: &str, fallback: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(%name, %raw, "unparsable environment override, using fallback");
                fallback
            }
        },
        Err(_) => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_on_missing() {
        assert_eq!(env_or("ORDLIGHT_TEST_MISSING_VAR", 7u64), 7);
    }

    #[test]
    fn test_reads_set_value() {
        env::set_var("ORDLIGHT_TEST_SET_VAR", "123");
        assert_eq!(env_or("ORDLIGHT_TEST_SET_VAR", 7u64), 123);
    }

    #[test]
    fn test_fallback_on_garbage() {
        env::set_var("ORDLIGHT_TEST_GARBAGE_VAR", "not-a-number");
        assert_eq!(env_or("ORDLIGHT_TEST_GARBAGE_VAR", 7u64), 7);
    }
}
