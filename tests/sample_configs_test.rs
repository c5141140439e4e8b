use load_fanout::config::{LoadConfig, RunMode};
use load_fanout::utils::validation::Validate;
use load_fanout::{ConfigProvider, LoadError};
use std::time::Duration;

fn load(name: &str) -> LoadConfig {
    let path = format!("{}/configs/{}", env!("CARGO_MANIFEST_DIR"), name);
    LoadConfig::from_file(path).unwrap()
}

#[test]
fn test_shipped_configs() {
    std::env::set_var("LOAD_API_KEY", "sample-key");

    let burst = load("event-queue-burst.toml");
    burst.validate().unwrap();
    assert_eq!(burst.concurrency(), 120);
    assert_eq!(burst.total_requests(), 1200);
    assert_eq!(burst.target.api_key.as_deref(), Some("sample-key"));
    assert_eq!(burst.target.body.as_ref().unwrap()["properties"]["email"], "{email}");

    let login = load("login-burst.toml");
    login.validate().unwrap();
    assert_eq!(login.run.mode, RunMode::Concurrent);
    assert!(login.target_url().contains("{email}"));

    let paced = load("cache-warm-paced.toml");
    paced.validate().unwrap();
    assert_eq!(paced.paced_duration(), Some(Duration::from_secs(600)));
    assert_eq!(paced.target.headers["Content-Type"], "application/json");
    assert!(paced.target.body.is_none());

    std::env::remove_var("LOAD_API_KEY");

    let unresolved = load("cache-warm-paced.toml");
    assert!(matches!(
        unresolved.validate(),
        Err(LoadError::MissingConfigError { .. })
    ));
}
