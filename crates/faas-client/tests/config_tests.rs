//! Loading client configuration from YAML

use faas_client::{Client, ClientConfig, DEFAULT_DOMAIN_SEARCH_LIMIT, Error};
use std::path::PathBuf;

#[test]
fn test_full_config_parsing() {
    let yaml = r#"
root: ./functions/example.com/admin
name: admin.example.com
domain_search_limit: 2
local: true
verbose: true
"#;

    let config = ClientConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.root, PathBuf::from("./functions/example.com/admin"));
    assert_eq!(config.name.as_deref(), Some("admin.example.com"));
    assert_eq!(config.domain_search_limit, 2);
    assert!(config.local);
    assert!(config.verbose);
}

#[test]
fn test_empty_document_is_default() {
    let config = ClientConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.domain_search_limit, DEFAULT_DOMAIN_SEARCH_LIMIT);
}

#[test]
fn test_malformed_yaml_is_a_configuration_error() {
    let result = ClientConfig::from_yaml_str("local: [true");
    assert!(matches!(result, Err(Error::Configuration(_))));

    let result = ClientConfig::from_yaml_str("local: maybe");
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_missing_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ClientConfig::from_file(dir.path().join("faas.yaml"));
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_client_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("example.com").join("www");
    std::fs::create_dir_all(&root).unwrap();

    let path = dir.path().join("faas.yaml");
    std::fs::write(
        &path,
        format!("root: {}\ndomain_search_limit: 1\n", root.display()),
    )
    .unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    let client = Client::new(config).unwrap();
    assert_eq!(client.name(), "www.example.com");
    assert_eq!(client.root(), root.as_path());
}

#[test]
fn test_config_round_trips_through_yaml() {
    let config = ClientConfig {
        root: PathBuf::from("/srv/example.com/admin"),
        local: true,
        ..Default::default()
    };

    let yaml = serde_yaml::to_string(&config).unwrap();
    assert!(!yaml.contains("name:"));
    assert_eq!(ClientConfig::from_yaml_str(&yaml).unwrap(), config);
}
