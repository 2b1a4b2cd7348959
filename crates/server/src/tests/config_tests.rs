use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("clinic_server_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("server.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.occupancy_config().tick, Duration::from_secs(2));
    assert!(settings.gemini_config().expect("config").is_none());
}

#[test]
fn file_values_then_env_overrides() {
    let path = temp_settings_file(
        r#"
bind_addr = "0.0.0.0:9000"
gemini_model = "gemini-test"
occupancy_tick_ms = 500
occupancy_seed = 9
"#,
    );
    let env_values: HashMap<&str, &str> = HashMap::from([
        ("APP__BIND_ADDR", "127.0.0.1:7000"),
        ("GEMINI_API_KEY", "from-env"),
        ("APP__OCCUPANCY_TICK_MS", "not-a-number"),
    ]);
    let settings = load_settings_from(&path, |key| env_values.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_bind, "127.0.0.1:7000");
    assert_eq!(settings.gemini_model, "gemini-test");
    assert_eq!(settings.gemini_api_key.as_deref(), Some("from-env"));
    assert_eq!(settings.occupancy_tick_ms, 500);
    assert_eq!(settings.occupancy_seed, Some(9));

    if let Some(dir) = path.parent() {
        fs::remove_dir_all(dir).expect("cleanup");
    }
}

#[test]
fn prefixed_key_wins_over_plain_key() {
    let env_values: HashMap<&str, &str> = HashMap::from([
        ("GEMINI_API_KEY", "plain"),
        ("APP__GEMINI_API_KEY", "prefixed"),
    ]);
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), |key| {
        env_values.get(key).map(|v| v.to_string())
    });
    assert_eq!(settings.gemini_api_key.as_deref(), Some("prefixed"));
}

#[test]
fn gemini_config_validates_base_url() {
    let settings = Settings {
        gemini_api_key: Some("key".into()),
        gemini_base_url: "not a url".into(),
        ..Settings::default()
    };
    assert!(settings.gemini_config().is_err());

    let settings = Settings {
        gemini_api_key: Some("key".into()),
        ..Settings::default()
    };
    let config = settings.gemini_config().expect("valid").expect("configured");
    assert_eq!(config.model, "gemini-2.5-flash");
    assert_eq!(config.base_url.as_str(), "https://generativelanguage.googleapis.com/");
}

#[test]
fn blank_api_key_leaves_assistant_unconfigured() {
    let settings = Settings {
        gemini_api_key: Some("   ".into()),
        ..Settings::default()
    };
    assert!(settings.gemini_config().expect("config").is_none());
}

#[test]
fn session_idle_from_file_and_env() {
    let path = temp_settings_file("session_idle_secs = 600\n");
    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.session_idle(), Duration::from_secs(600));

    let settings = load_settings_from(&path, |key| {
        (key == "APP__SESSION_IDLE_SECS").then(|| "0".to_string())
    });
    assert_eq!(settings.session_idle(), Duration::from_secs(1));

    if let Some(dir) = path.parent() {
        fs::remove_dir_all(dir).expect("cleanup");
    }
    assert_eq!(
        Settings::default().session_idle(),
        crate::api::DEFAULT_SESSION_IDLE
    );
}
