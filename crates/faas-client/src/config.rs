//! Client configuration.
//!
//! Every option is an explicit field with a documented default. A
//! configuration can be written inline or loaded from YAML:
//!
//! ```yaml
//! root: ./example.com/admin
//! domain_search_limit: 2
//! local: true
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Number of ancestor directories consulted when deriving a name
pub const DEFAULT_DOMAIN_SEARCH_LIMIT: usize = 3;

/// Options a [`Client`](crate::Client) is constructed from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Function source directory. Default: the current directory.
    pub root: PathBuf,

    /// Explicit fully-qualified name. Default: derived from `root`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ancestor directories consulted when deriving the name.
    /// Default: [`DEFAULT_DOMAIN_SEARCH_LIMIT`].
    pub domain_search_limit: usize,

    /// Stop `create` after the build stage. Default: `false`.
    pub local: bool,

    /// Report stage progress at info level. Default: `false`.
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            name: None,
            domain_search_limit: DEFAULT_DOMAIN_SEARCH_LIMIT,
            local: false,
            verbose: false,
        }
    }
}

impl ClientConfig {
    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse YAML: {}", e)))
    }

    /// The explicit name, if one was set and is non-empty
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Absolute, lexically cleaned form of `root`.
    ///
    /// Relative roots are joined onto the current directory. The directory
    /// is not required to exist.
    pub fn absolute_root(&self) -> Result<PathBuf> {
        let joined = if self.root.is_absolute() {
            self.root.clone()
        } else {
            let cwd = std::env::current_dir().map_err(|e| {
                Error::Configuration(format!("Current directory unavailable: {}", e))
            })?;
            cwd.join(&self.root)
        };
        Ok(clean(&joined))
    }
}

/// Remove `.` segments and resolve `..` against preceding segments
fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.name, None);
        assert_eq!(config.domain_search_limit, DEFAULT_DOMAIN_SEARCH_LIMIT);
        assert!(!config.local);
        assert!(!config.verbose);
    }

    #[test]
    fn test_clean_resolves_relative_segments() {
        assert_eq!(
            clean(Path::new("/srv/./example.com/www/../admin")),
            PathBuf::from("/srv/example.com/admin")
        );
        assert_eq!(clean(Path::new("/../srv")), PathBuf::from("/srv"));
        assert_eq!(clean(Path::new("/srv/admin/")), PathBuf::from("/srv/admin"));
    }

    #[test]
    fn test_absolute_root_of_current_directory() {
        let config = ClientConfig::default();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.absolute_root().unwrap(), cwd);
    }

    #[test]
    fn test_absolute_root_keeps_absolute_paths() {
        let config = ClientConfig {
            root: PathBuf::from("/srv/example.com/./admin"),
            ..Default::default()
        };
        assert_eq!(
            config.absolute_root().unwrap(),
            PathBuf::from("/srv/example.com/admin")
        );
    }

    #[test]
    fn test_explicit_name_ignores_empty() {
        let mut config = ClientConfig {
            name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.explicit_name(), None);

        config.name = Some("www.example.com".into());
        assert_eq!(config.explicit_name(), Some("www.example.com"));
    }

    #[test]
    fn test_yaml_missing_fields_use_defaults() {
        let config = ClientConfig::from_yaml_str("local: true\n").unwrap();
        assert!(config.local);
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.domain_search_limit, DEFAULT_DOMAIN_SEARCH_LIMIT);
    }

    #[test]
    fn test_yaml_rejects_negative_limit() {
        let result = ClientConfig::from_yaml_str("domain_search_limit: -1\n");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
