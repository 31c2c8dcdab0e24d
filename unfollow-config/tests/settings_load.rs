use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use unfollow_config::{SettingsError, SettingsLoader};

const SECRETS: &str = "\
TWITTER_CONSUMER_KEY=file-consumer-key
TWITTER_CONSUMER_SECRET=file-consumer-secret
TWITTER_ACCESS_TOKEN=file-access-token
TWITTER_ACCESS_SECRET=file-access-secret
";

const MANAGED_VARS: [&str; 7] = [
    "TWITTER_CONSUMER_KEY",
    "TWITTER_CONSUMER_SECRET",
    "TWITTER_ACCESS_TOKEN",
    "TWITTER_ACCESS_SECRET",
    "UNFOLLOW_API_URL",
    "UNFOLLOW_TIMEOUT_SECS",
    "UNFOLLOW_MAX_PAGES",
];

/// Run `f` with every variable the loader reads unset, except `overrides`.
fn with_env<R>(overrides: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let vars: Vec<(&str, Option<&str>)> = MANAGED_VARS
        .iter()
        .map(|name| {
            let value = overrides
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| *v);
            (*name, value)
        })
        .collect();
    temp_env::with_vars(vars, f)
}

fn write_env(tmp: &TempDir, contents: &str) -> PathBuf {
    let p = tmp.path().join(".env");
    fs::write(&p, contents).expect("write .env");
    p
}

#[test]
#[serial]
fn loads_secrets_from_env_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_env(&tmp, SECRETS);

    let settings = with_env(&[], || SettingsLoader::new().with_env_file(&path).load())
        .expect("load settings");

    assert_eq!(settings.credentials.consumer_key, "file-consumer-key");
    assert_eq!(settings.credentials.access_secret, "file-access-secret");
    assert_eq!(settings.api_url, unfollow_config::DEFAULT_API_URL);
    assert_eq!(settings.timeout_secs, 15);
    assert_eq!(settings.max_pages, 1000);
}

#[test]
#[serial]
fn missing_env_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("does-not-exist.env");

    let err = with_env(&[], || SettingsLoader::new().with_env_file(&path).load()).unwrap_err();

    assert!(matches!(err, SettingsError::EnvFile { .. }), "got {err:?}");
    assert!(err.to_string().contains("does-not-exist.env"));
}

#[test]
#[serial]
fn process_env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_env(&tmp, SECRETS);

    let settings = with_env(
        &[
            ("TWITTER_ACCESS_TOKEN", "env-access-token"),
            ("UNFOLLOW_MAX_PAGES", "3"),
            ("UNFOLLOW_API_URL", "http://127.0.0.1:9999"),
        ],
        || SettingsLoader::new().with_env_file(&path).load(),
    )
    .expect("load settings");

    assert_eq!(settings.credentials.access_token, "env-access-token");
    assert_eq!(settings.credentials.consumer_key, "file-consumer-key");
    assert_eq!(settings.max_pages, 3);
    assert_eq!(settings.api_url, "http://127.0.0.1:9999");
}

#[test]
#[serial]
fn missing_secret_is_named() {
    let partial = "\
TWITTER_CONSUMER_KEY=ck
TWITTER_CONSUMER_SECRET=cs
TWITTER_ACCESS_TOKEN=at
";
    let err = with_env(&[], || SettingsLoader::new().with_env_str(partial).load()).unwrap_err();

    assert!(matches!(
        err,
        SettingsError::MissingSecret("TWITTER_ACCESS_SECRET")
    ));
}

#[test]
#[serial]
fn zero_page_cap_is_rejected() {
    let contents = format!("{SECRETS}UNFOLLOW_MAX_PAGES=0\n");
    let err = with_env(&[], || SettingsLoader::new().with_env_str(&contents).load()).unwrap_err();

    assert!(matches!(
        err,
        SettingsError::Invalid {
            key: "max_pages",
            ..
        }
    ));
}

#[test]
#[serial]
fn env_file_is_not_exported() {
    let tmp = TempDir::new().unwrap();
    let path = write_env(&tmp, SECRETS);

    with_env(&[], || {
        SettingsLoader::new()
            .with_env_file(&path)
            .load()
            .expect("load settings");
        assert!(std::env::var("TWITTER_CONSUMER_KEY").is_err());
    });
}

#[test]
#[serial]
fn env_only_mode_reads_process_environment() {
    let settings = with_env(
        &[
            ("TWITTER_CONSUMER_KEY", "a"),
            ("TWITTER_CONSUMER_SECRET", "b"),
            ("TWITTER_ACCESS_TOKEN", "c"),
            ("TWITTER_ACCESS_SECRET", "d"),
        ],
        || SettingsLoader::new().without_env_file().load(),
    )
    .expect("load settings");

    assert_eq!(settings.credentials.consumer_secret, "b");
}
