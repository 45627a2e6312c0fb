//! Environment variable parsing helpers.

use std::env;
use std::str::FromStr;

/// Read a non-empty environment variable.
pub(crate) fn optional_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub(crate) fn optional_bool(name: &str) -> Result<Option<bool>, String> {
    let Some(value) = optional_string(name) else {
        return Ok(None);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        other => Err(format!("Invalid boolean value for {name}: {other}")),
    }
}

/// Parse a numeric environment variable.
pub(crate) fn optional_number<T: FromStr>(name: &str) -> Result<Option<T>, String> {
    optional_string(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| format!("Invalid numeric value for {name}: {value}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_optional_bool_variants() {
        unsafe {
            env::set_var("WAAV_NODES_TEST_FLAG", "Yes");
        }
        assert_eq!(optional_bool("WAAV_NODES_TEST_FLAG"), Ok(Some(true)));

        unsafe {
            env::set_var("WAAV_NODES_TEST_FLAG", "0");
        }
        assert_eq!(optional_bool("WAAV_NODES_TEST_FLAG"), Ok(Some(false)));

        unsafe {
            env::set_var("WAAV_NODES_TEST_FLAG", "maybe");
        }
        assert!(optional_bool("WAAV_NODES_TEST_FLAG").is_err());

        unsafe {
            env::remove_var("WAAV_NODES_TEST_FLAG");
        }
        assert_eq!(optional_bool("WAAV_NODES_TEST_FLAG"), Ok(None));
    }

    #[test]
    #[serial]
    fn test_optional_number_and_blank_values() {
        unsafe {
            env::set_var("WAAV_NODES_TEST_NUM", "45");
        }
        assert_eq!(optional_number::<u64>("WAAV_NODES_TEST_NUM"), Ok(Some(45)));

        unsafe {
            env::set_var("WAAV_NODES_TEST_NUM", "forty");
        }
        assert!(optional_number::<u64>("WAAV_NODES_TEST_NUM").is_err());

        unsafe {
            env::set_var("WAAV_NODES_TEST_NUM", "   ");
        }
        assert_eq!(optional_number::<u64>("WAAV_NODES_TEST_NUM"), Ok(None));

        unsafe {
            env::remove_var("WAAV_NODES_TEST_NUM");
        }
    }
}
