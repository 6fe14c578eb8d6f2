//! Gateway configuration
//!
//! Values are read from the environment. A `.env` file in the working directory is loaded first,
//! if present.

use log::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_CATALOG_URL: &str = "https://exercisedb.p.rapidapi.com";
pub const DEFAULT_CATALOG_HOST: &str = "exercisedb.p.rapidapi.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the relational REST API.
    pub api_url: String,
    pub document_store: Option<DocumentStoreConfig>,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStoreConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_host: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: String::new(),
            api_host: DEFAULT_CATALOG_HOST.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is set, but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            debug!("no .env file loaded: {err}");
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| var(name).filter(|value: &String| !value.trim().is_empty());

        let document_store = match (var("SUPABASE_URL"), var("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(DocumentStoreConfig { url, key }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Incomplete("SUPABASE_URL", "SUPABASE_KEY")),
            (None, Some(_)) => return Err(ConfigError::Incomplete("SUPABASE_KEY", "SUPABASE_URL")),
        };

        let defaults = CatalogConfig::default();

        Ok(Self {
            api_url: var("LIFTBOOK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            document_store,
            catalog: CatalogConfig {
                base_url: var("EXERCISEDB_URL").unwrap_or(defaults.base_url),
                api_key: var("RAPIDAPI_KEY").unwrap_or(defaults.api_key),
                api_host: var("RAPIDAPI_HOST").unwrap_or(defaults.api_host),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            from_map(&[]),
            Ok(Config {
                api_url: DEFAULT_API_URL.to_string(),
                document_store: None,
                catalog: CatalogConfig::default(),
            })
        );
    }

    #[test]
    fn test_all_values() {
        assert_eq!(
            from_map(&[
                ("LIFTBOOK_API_URL", "http://api:8080"),
                ("SUPABASE_URL", "https://abc.supabase.co"),
                ("SUPABASE_KEY", "anon"),
                ("EXERCISEDB_URL", "http://catalog"),
                ("RAPIDAPI_KEY", "secret"),
                ("RAPIDAPI_HOST", "catalog"),
            ]),
            Ok(Config {
                api_url: "http://api:8080".to_string(),
                document_store: Some(DocumentStoreConfig {
                    url: "https://abc.supabase.co".to_string(),
                    key: "anon".to_string(),
                }),
                catalog: CatalogConfig {
                    base_url: "http://catalog".to_string(),
                    api_key: "secret".to_string(),
                    api_host: "catalog".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_incomplete_document_store() {
        assert_eq!(
            from_map(&[("SUPABASE_URL", "https://abc.supabase.co")]),
            Err(ConfigError::Incomplete("SUPABASE_URL", "SUPABASE_KEY"))
        );
        assert_eq!(
            from_map(&[("SUPABASE_KEY", "anon"), ("SUPABASE_URL", " ")]),
            Err(ConfigError::Incomplete("SUPABASE_KEY", "SUPABASE_URL"))
        );
    }
}
