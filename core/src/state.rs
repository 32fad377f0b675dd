use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::file::FileMeta;
use crate::selection::Selection;
use crate::settings::{SettingUpdate, SettingValue, Settings, SettingsError, SettingsField};

/// The uploaded image: file metadata plus a data URL the page can display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file: FileMeta,
    pub preview: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    pub image: Option<Rc<ImageUpload>>,
    pub selection: Selection,
    pub settings: Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    Image,
    Selection,
    Settings,
    Setting(SettingsField),
    All,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Image => f.write_str("image"),
            Topic::Selection => f.write_str("selection"),
            Topic::Settings => f.write_str("settings"),
            Topic::Setting(field) => write!(f, "{field}"),
            Topic::All => f.write_str("*"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StateUpdate {
    Image(Option<ImageUpload>),
    Selection(Selection),
    Settings(Settings),
    Setting(SettingUpdate),
}

impl StateUpdate {
    pub fn topic(&self) -> Topic {
        match self {
            StateUpdate::Image(_) => Topic::Image,
            StateUpdate::Selection(_) => Topic::Selection,
            StateUpdate::Settings(_) => Topic::Settings,
            StateUpdate::Setting(update) => Topic::Setting(update.field()),
        }
    }

    fn touches_settings(&self) -> bool {
        matches!(self, StateUpdate::Settings(_) | StateUpdate::Setting(_))
    }
}

/// Payload handed to listeners.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    Image(Option<Rc<ImageUpload>>),
    Selection(Selection),
    Settings(Settings),
    Setting(SettingValue),
    All(State),
}

pub type Listener = Rc<dyn Fn(&Change)>;

struct ListenerEntry {
    id: u64,
    topic: Topic,
    listener: Listener,
}

type Registry = Rc<RefCell<Vec<ListenerEntry>>>;

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Registry,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut entries = self.registry.borrow_mut();
        entries.retain(|entry| entry.id != self.id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Unavailable(String),
    Read(String),
    Write(String),
    Settings(SettingsError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StorageError::Read(msg) => write!(f, "failed to read settings: {msg}"),
            StorageError::Write(msg) => write!(f, "failed to save settings: {msg}"),
            StorageError::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Settings(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SettingsError> for StorageError {
    fn from(err: SettingsError) -> Self {
        StorageError::Settings(err)
    }
}

/// Where the settings blob lives between sessions.
pub trait SettingsStorage {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, blob: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    value: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(blob: impl Into<String>) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(blob.into()))),
        }
    }

    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl SettingsStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        *self.value.borrow_mut() = Some(blob.to_string());
        Ok(())
    }
}

#[derive(Clone)]
pub struct StoreHooks {
    pub on_storage_error: Rc<dyn Fn(&StorageError)>,
}

impl StoreHooks {
    pub fn empty() -> Self {
        Self {
            on_storage_error: Rc::new(|_| {}),
        }
    }
}

impl Default for StoreHooks {
    fn default() -> Self {
        Self::empty()
    }
}

pub struct Store {
    state: RefCell<State>,
    registry: Registry,
    next_listener_id: Cell<u64>,
    storage: Box<dyn SettingsStorage>,
    hooks: StoreHooks,
}

impl Store {
    pub fn new(storage: Box<dyn SettingsStorage>, hooks: StoreHooks) -> Rc<Self> {
        let store = Rc::new(Self {
            state: RefCell::new(State::default()),
            registry: Rc::new(RefCell::new(Vec::new())),
            next_listener_id: Cell::new(1),
            storage,
            hooks,
        });
        store.load_settings();
        store
    }

    pub fn in_memory() -> Rc<Self> {
        Self::new(Box::new(MemoryStorage::new()), StoreHooks::empty())
    }

    pub fn subscribe(&self, topic: Topic, listener: Listener) -> Subscription {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.registry.borrow_mut().push(ListenerEntry {
            id,
            topic,
            listener,
        });
        Subscription {
            id,
            registry: Rc::clone(&self.registry),
        }
    }

    pub fn subscribe_fn(&self, topic: Topic, listener: impl Fn(&Change) + 'static) -> Subscription {
        self.subscribe(topic, Rc::new(listener))
    }

    pub fn set(&self, update: StateUpdate) {
        let persist = update.touches_settings();
        let topic = update.topic();
        let changes = {
            let mut state = self.state.borrow_mut();
            match update {
                StateUpdate::Image(image) => {
                    state.image = image.map(Rc::new);
                    vec![(topic, Change::Image(state.image.clone()))]
                }
                StateUpdate::Selection(selection) => {
                    state.selection = selection;
                    vec![(topic, Change::Selection(selection))]
                }
                StateUpdate::Settings(settings) => {
                    state.settings = settings;
                    vec![(topic, Change::Settings(state.settings.clone()))]
                }
                StateUpdate::Setting(update) => {
                    let value = update.value();
                    state.settings.apply(update);
                    vec![
                        (topic, Change::Setting(value)),
                        (Topic::Settings, Change::Settings(state.settings.clone())),
                    ]
                }
            }
        };
        if persist {
            self.save_settings();
        }
        for (topic, change) in changes {
            self.notify(topic, &change);
        }
        let snapshot = self.snapshot();
        self.notify(Topic::All, &Change::All(snapshot));
    }

    pub fn snapshot(&self) -> State {
        self.state.borrow().clone()
    }

    pub fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection
    }

    pub fn image(&self) -> Option<Rc<ImageUpload>> {
        self.state.borrow().image.clone()
    }

    pub fn has_image(&self) -> bool {
        self.state.borrow().image.is_some()
    }

    /// Merges the persisted blob over the current settings. Returns the
    /// fields that were overwritten; problems go to the storage hook.
    pub fn load_settings(&self) -> Vec<SettingsField> {
        let blob = match self.storage.load() {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(err) => {
                self.report(&err);
                return Vec::new();
            }
        };
        let mut settings = self.settings();
        match settings.merge_persisted(&blob) {
            Ok(fields) => {
                self.state.borrow_mut().settings = settings;
                fields
            }
            Err(err) => {
                self.report(&StorageError::from(err));
                Vec::new()
            }
        }
    }

    pub fn save_settings(&self) {
        let encoded = self.state.borrow().settings.to_json();
        let result = encoded
            .map_err(StorageError::from)
            .and_then(|blob| self.storage.save(&blob));
        if let Err(err) = result {
            self.report(&err);
        }
    }

    fn report(&self, err: &StorageError) {
        (self.hooks.on_storage_error)(err);
    }

    fn notify(&self, topic: Topic, change: &Change) {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .iter()
            .filter(|entry| entry.topic == topic)
            .map(|entry| Rc::clone(&entry.listener))
            .collect();
        for listener in listeners {
            (listener)(change);
        }
    }
}
