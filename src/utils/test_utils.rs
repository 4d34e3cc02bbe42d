#[cfg(test)]
use crate::core::config::SettingsStore;
#[cfg(test)]
use tempfile::TempDir;

/// Settings store backed by a throwaway directory. Keep the `TempDir` alive
/// for the duration of the test; dropping it deletes the file.
#[cfg(test)]
pub fn temp_store() -> (SettingsStore, TempDir) {
    let dir = TempDir::new().expect("create temp config dir");
    let store = SettingsStore::open(dir.path().join("config.toml"));
    (store, dir)
}

/// Store pre-seeded with an API key for the given provider.
#[cfg(test)]
pub fn temp_store_with_key(provider: &str, key: &str) -> (SettingsStore, TempDir) {
    let (store, dir) = temp_store();
    store
        .mutate(|config| {
            config.set_api_key(provider, key);
            Ok(())
        })
        .expect("seed api key");
    (store, dir)
}
