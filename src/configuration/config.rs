#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    BackendURL,
    ConfigFile,
    ConnectTimeout,
    HealthCheckTimeout,
    ReadTimeout,
}

impl ConfigKey {
    fn is_millis(&self) -> bool {
        return matches!(
            self,
            ConfigKey::ConnectTimeout | ConfigKey::HealthCheckTimeout | ConfigKey::ReadTimeout
        );
    }
}

fn validate(key: ConfigKey, val: &str) -> Result<()> {
    if key.is_millis() && val.parse::<u64>().is_err() {
        bail!(format!(
            "config.toml has an invalid value for key '{key}': {val}\nExpected a number of milliseconds."
        ));
    }

    return Ok(());
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn default(key: ConfigKey) -> String {
        #[cfg(not(target_os = "macos"))]
        let config_path = dirs::cache_dir()
            .unwrap_or_default()
            .join("feeler/config.toml");
        #[cfg(target_os = "macos")]
        let config_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".config/feeler/config.toml");

        let res = match key {
            ConfigKey::BackendURL => "http://127.0.0.1:8000",
            ConfigKey::ConnectTimeout => "5000",
            ConfigKey::HealthCheckTimeout => "1000",
            ConfigKey::ReadTimeout => "300000",

            // Special
            ConfigKey::ConfigFile => return config_path.to_string_lossy().to_string(),
        };

        return res.to_string();
    }

    /// Resolves every key from defaults, then the config file, then CLI
    /// arguments and their environment variables. Nothing is stored until the
    /// whole chain validated.
    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut values: HashMap<String, String> = ConfigKey::iter()
            .map(|key| return (key.to_string(), Config::default(key)))
            .collect();

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        let val_str = val_int.to_string();
                        validate(key, &val_str)?;
                        values.insert(key.to_string(), val_str);
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        validate(key, val_str)?;
                        values.insert(key.to_string(), val_str.to_string());
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    validate(key, val)?;
                    values.insert(key.to_string(), val.to_string());
                }
            }
        }

        values.insert(ConfigKey::ConfigFile.to_string(), config_file);
        for (key, val) in values {
            CONFIG.insert(key, val);
        }

        tracing::debug!(
            backend_url = %Config::get(ConfigKey::BackendURL),
            connect_timeout = %Config::get(ConfigKey::ConnectTimeout),
            read_timeout = %Config::get(ConfigKey::ReadTimeout),
            health_check_timeout = %Config::get(ConfigKey::HealthCheckTimeout),
            config_file = %Config::get(ConfigKey::ConfigFile),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<u64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
