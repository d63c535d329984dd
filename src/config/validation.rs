use std::env;

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unknown variables are left as-is.
pub fn expand_env_var_in_string(value: &str) -> String {
    let mut result = value.to_string();
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let replacement = env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_variable() {
        std::env::set_var("WAYFARER_TEST_VAR", "resolved");
        assert_eq!(
            expand_env_var_in_string("key=${WAYFARER_TEST_VAR}"),
            "key=resolved"
        );
    }

    #[test]
    fn leaves_unknown_variable_in_place() {
        assert_eq!(
            expand_env_var_in_string("${WAYFARER_TEST_MISSING}"),
            "${WAYFARER_TEST_MISSING}"
        );
    }
}
