use super::*;

fn store_in(dir: &tempfile::TempDir, key: &str) -> FileTokenStore {
    FileTokenStore::new(dir.path().join("nested").join("session.json"), key)
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir, "accessToken");
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn save_then_load_survives_a_new_handle() {
    let dir = tempfile::tempdir().unwrap();
    store_in(&dir, "accessToken").save("tok1").unwrap();

    let reopened = store_in(&dir, "accessToken");
    assert_eq!(reopened.load().unwrap().as_deref(), Some("tok1"));
}

#[test]
fn save_overwrites_previous_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir, "accessToken");
    store.save("tok1").unwrap();
    store.save("tok2").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("tok2"));
}

#[test]
fn clear_removes_file_when_last_key_goes() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir, "accessToken");
    store.save("tok1").unwrap();
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn clear_without_token_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir, "accessToken");
    store.clear().unwrap();
    assert!(!store.path().exists());
}

#[test]
fn keys_share_a_file_independently() {
    let dir = tempfile::tempdir().unwrap();
    let a = store_in(&dir, "accessToken");
    let b = store_in(&dir, "adminToken");
    a.save("tok-a").unwrap();
    b.save("tok-b").unwrap();

    a.clear().unwrap();
    assert_eq!(a.load().unwrap(), None);
    assert_eq!(b.load().unwrap().as_deref(), Some("tok-b"));
    assert!(b.path().exists());
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir, "accessToken");
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "not json").unwrap();
    assert!(matches!(store.load(), Err(AuthError::Storage(_))));
}
