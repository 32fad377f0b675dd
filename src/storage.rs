use imgtool_core::{SettingsStorage, StorageError};
use web_sys::Storage;

use crate::config::STORAGE_KEY;
use crate::dom::js_err;

/// Settings blob in `window.localStorage` under a fixed key.
pub(crate) struct LocalSettingsStorage {
    key: &'static str,
}

impl LocalSettingsStorage {
    pub(crate) fn new() -> Self {
        Self { key: STORAGE_KEY }
    }

    #[cfg(test)]
    pub(crate) fn with_key(key: &'static str) -> Self {
        Self { key }
    }

    fn storage(&self) -> Result<Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(js_err(err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl SettingsStorage for LocalSettingsStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(self.key)
            .map_err(|err| StorageError::Read(js_err(err)))
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(self.key, blob)
            .map_err(|err| StorageError::Write(js_err(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgtool_core::{SettingUpdate, StateUpdate, Store, StoreHooks};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const TEST_KEY: &str = "imgtoolSettingsTest";

    fn clear() {
        if let Ok(storage) = LocalSettingsStorage::with_key(TEST_KEY).storage() {
            let _ = storage.remove_item(TEST_KEY);
        }
    }

    #[wasm_bindgen_test]
    fn settings_round_trip_through_local_storage() {
        clear();
        {
            let store = Store::new(
                Box::new(LocalSettingsStorage::with_key(TEST_KEY)),
                StoreHooks::empty(),
            );
            store.set(StateUpdate::Setting(SettingUpdate::FontSize(33)));
        }
        let store = Store::new(
            Box::new(LocalSettingsStorage::with_key(TEST_KEY)),
            StoreHooks::empty(),
        );
        assert_eq!(store.settings().font_size, 33);
        clear();
    }

    #[wasm_bindgen_test]
    fn missing_key_loads_nothing() {
        clear();
        let storage = LocalSettingsStorage::with_key(TEST_KEY);
        assert_eq!(storage.load(), Ok(None));
    }
}
