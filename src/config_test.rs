use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_unset() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.token_key, "accessToken");
    assert_eq!(cfg.token_path, PathBuf::from(DEFAULT_TOKEN_PATH));
    assert_eq!(
        cfg.timeouts,
        HttpTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.scroll_completion_timeout, Duration::from_millis(3000));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("AUTH_API_BASE_URL", "https://auth.example.test/"),
        ("AUTH_TOKEN_KEY", "sessionToken"),
        ("AUTH_TOKEN_PATH", "/tmp/tok.json"),
        ("AUTH_REQUEST_TIMEOUT_SECS", "42"),
        ("AUTH_CONNECT_TIMEOUT_SECS", " 7 "),
        ("SCROLL_COMPLETION_TIMEOUT_MS", "1500"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_base_url, "https://auth.example.test");
    assert_eq!(cfg.token_key, "sessionToken");
    assert_eq!(cfg.token_path, PathBuf::from("/tmp/tok.json"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.scroll_completion_timeout, Duration::from_millis(1500));
}

#[test]
fn from_lookup_rejects_non_numeric_timeout() {
    let err = ClientConfig::from_lookup(lookup_from(&[("AUTH_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "AUTH_REQUEST_TIMEOUT_SECS", value: "soon".to_owned() });
}

#[test]
fn empty_token_key_falls_back_to_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("AUTH_TOKEN_KEY", "")])).unwrap();
    assert_eq!(cfg.token_key, "accessToken");
}
