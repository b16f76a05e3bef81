use std::{path::Path, str::FromStr};

use anyhow::bail;
use indoc::formatdoc;
use serde::Deserialize;
use serde_dynamic_string::DynamicString;
use std::fmt::Write;
use toml::Value;

use crate::Config;

/// Fields that may reference an unset environment variable and are then left out.
const OPTIONAL_ENV_FIELDS: &[&str] = &["upstream.api_key", "upstream.user_agent"];

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref().to_path_buf();
    let content = std::fs::read_to_string(&path)?;

    from_toml_str(&content)
}

pub(crate) fn from_toml_str(content: &str) -> anyhow::Result<Config> {
    let mut raw_config: Value = toml::from_str(content)?;

    for field in OPTIONAL_ENV_FIELDS {
        if !expands(&raw_config, field) {
            log::debug!("Removed optional field '{field}' due to missing environment variable");
            remove_field_from_config(&mut raw_config, field);
        }
    }

    expand_dynamic_strings(&mut Vec::new(), &mut raw_config)?;

    let config = Config::deserialize(raw_config)?;
    validate(&config)?;

    Ok(config)
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    if config.rate_limits.limit == 0 {
        bail!("rate_limits.limit must be greater than zero");
    }

    if config.rate_limits.interval.is_zero() {
        bail!("rate_limits.interval must be greater than zero");
    }

    if config.upstream.timeout.is_zero() {
        bail!("upstream.timeout must be greater than zero");
    }

    if config.sanitization.max_length == 0 {
        bail!("sanitization.max_length must be greater than zero");
    }

    if !config.server.path.starts_with('/') {
        bail!("server.path must start with '/', got '{}'", config.server.path);
    }

    if !config.server.health.path.starts_with('/') {
        bail!("server.health.path must start with '/', got '{}'", config.server.health.path);
    }

    if config.server.health.enabled && config.server.health.path == config.server.path {
        bail!("server.health.path must differ from server.path");
    }

    let scheme = config.upstream.base_url.scheme();

    if scheme != "http" && scheme != "https" {
        bail!(formatdoc! {r#"
            upstream.base_url must use http or https, got '{scheme}'.

            Example configuration:

              [upstream]
              base_url = "https://www.courtlistener.com/api/rest/v4"
        "#});
    }

    Ok(())
}

/// Returns false when the string at `path` is a dynamic string that fails to expand.
fn expands(config: &Value, path: &str) -> bool {
    let mut current = config;

    for part in path.split('.') {
        match current.as_table().and_then(|table| table.get(part)) {
            Some(value) => current = value,
            None => return true,
        }
    }

    match current {
        Value::String(s) => DynamicString::<String>::from_str(s).is_ok(),
        _ => true,
    }
}

/// Remove a field from the TOML configuration by path
fn remove_field_from_config(config: &mut Value, path: &str) {
    let parts: Vec<&str> = path.split('.').collect();

    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = config;

    for part in parents {
        match current.as_table_mut().and_then(|table| table.get_mut(*part)) {
            Some(value) => current = value,
            None => return,
        }
    }

    if let Some(table) = current.as_table_mut() {
        table.remove(*last);
    }
}

fn expand_dynamic_strings<'a>(path: &mut Vec<Result<&'a str, usize>>, value: &'a mut Value) -> anyhow::Result<()> {
    match value {
        Value::String(s) => match DynamicString::<String>::from_str(s) {
            Ok(out) => *s = out.into_inner(),
            Err(err) => {
                let mut p = String::new();

                for segment in path.iter() {
                    match segment {
                        Ok(s) => {
                            p.push_str(s);
                            p.push('.');
                        }
                        Err(i) => write!(p, "[{i}]")?,
                    }
                }

                if p.ends_with('.') {
                    p.pop();
                }

                bail!("Failed to expand dynamic string at path '{p}': {err}");
            }
        },
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Err(i));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Table(map) => {
            for (key, value) in map {
                path.push(Ok(key.as_str()));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn missing_optional_env_var_removes_api_key() {
        let config = indoc! {r#"
            [upstream]
            api_key = "{{ env.LEXBRIDGE_TEST_SURELY_UNSET_VARIABLE }}"
        "#};

        let config = from_toml_str(config).unwrap();
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn env_var_expands_into_api_key() {
        // PATH is set in every test environment.
        let config = indoc! {r#"
            [upstream]
            api_key = "{{ env.PATH }}"
        "#};

        let config = from_toml_str(config).unwrap();
        let expected = std::env::var("PATH").unwrap();

        assert_eq!(config.upstream.api_key.unwrap().expose_secret(), expected);
    }

    #[test]
    fn missing_env_var_in_required_field_fails() {
        let config = indoc! {r#"
            [server]
            path = "{{ env.LEXBRIDGE_TEST_SURELY_UNSET_VARIABLE }}"
        "#};

        let error = from_toml_str(config).unwrap_err().to_string();
        assert!(error.contains("server.path"), "{error}");
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = indoc! {r#"
            [rate_limits]
            limit = 0
        "#};

        let error = from_toml_str(config).unwrap_err().to_string();
        insta::assert_snapshot!(error, @"rate_limits.limit must be greater than zero");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = indoc! {r#"
            [upstream]
            timeout = "0s"
        "#};

        let error = from_toml_str(config).unwrap_err().to_string();
        insta::assert_snapshot!(error, @"upstream.timeout must be greater than zero");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = indoc! {r#"
            [upstream]
            base_url = "ftp://example.com/api"
        "#};

        let error = from_toml_str(config).unwrap_err().to_string();
        assert!(error.starts_with("upstream.base_url must use http or https, got 'ftp'"), "{error}");
    }

    #[test]
    fn relative_paths_are_rejected() {
        let config = indoc! {r#"
            [server]
            path = "mcp"
        "#};

        let error = from_toml_str(config).unwrap_err().to_string();
        insta::assert_snapshot!(error, @"server.path must start with '/', got 'mcp'");

        let config = indoc! {r#"
            [server]
            path = "/mcp"

            [server.health]
            path = "/mcp"
        "#};

        let error = from_toml_str(config).unwrap_err().to_string();
        insta::assert_snapshot!(error, @"server.health.path must differ from server.path");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();

        write!(
            file,
            "{}",
            indoc! {r#"
                [server]
                transport = "stdio"

                [rate_limits]
                limit = 5
            "#}
        )
        .unwrap();

        let config = load(file.path()).unwrap();

        assert_eq!(config.server.transport, crate::Transport::Stdio);
        assert_eq!(config.rate_limits.limit, 5);
    }
}
