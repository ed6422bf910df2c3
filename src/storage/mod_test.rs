use super::*;

#[test]
fn memory_store_starts_empty() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn memory_store_save_load_clear() {
    let store = MemoryTokenStore::new();
    store.save("tok1").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("tok1"));
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn memory_store_with_token_is_seeded() {
    let store = MemoryTokenStore::with_token("persisted");
    assert_eq!(store.load().unwrap().as_deref(), Some("persisted"));
}
