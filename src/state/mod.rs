// Session state module
//
// This module provides the SessionStore, the single owner of the live AppConfig.
// Every edit is applied to a copy, re-encoded, persisted through a BlobStore,
// and only then committed; change events are broadcast afterwards.

use crate::metrics::Metrics;
use crate::models::{
    AppConfig, CategoryOverrideSet, FilterRule, LanguagesConfig, OptionsConfig, ProfileName,
    RankCategory, ResolutionConfig, TitleCase,
};
use crate::services::{ConfigCodec, DecodeError, settings_io};
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tokio::sync::broadcast;

/// Change events emitted when the configuration is modified
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigChange {
    ProfileChanged {
        profile: ProfileName,
    },

    TrashFlagChanged {
        remove_trash: bool,
    },

    /// Require, exclude or preferred patterns changed
    FiltersChanged,

    LanguagesChanged,

    ResolutionsChanged,

    OptionsChanged,

    CustomRanksChanged,

    TitlesChanged {
        count: usize,
    },

    /// The whole configuration was swapped out
    ConfigReplaced,
}

/// Where the encoded configuration blob lives between runs.
pub trait BlobStore: Send + Sync {
    /// The stored blob, or `None` if nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    fn write(&mut self, blob: &str) -> Result<()>;
}

/// In-memory blob store. Clones share the same slot, so a test can keep a
/// handle and watch what the session persists.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.to_string());
        Ok(())
    }
}

/// Blob store backed by a single text file.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: Utf8PathBuf,
}

impl FileBlobStore {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let blob = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path))?;
        Ok(Some(blob))
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create session directory: {}", parent))?;
            }
        }

        fs::write(&self.path, blob)
            .with_context(|| format!("Failed to write session file: {}", self.path))
    }
}

struct Session<B> {
    config: AppConfig,
    blob: String,
    store: B,
}

/// Owner of the live configuration
///
/// - [`config()`](Self::config) / [`read()`](Self::read) for access
/// - [`update()`](Self::update) and the `set_*` helpers for edits; each edit
///   is persisted before it becomes visible
/// - [`subscribe()`](Self::subscribe) for change events
///
/// A failed encode or write leaves the previous configuration in place.
pub struct SessionStore<B: BlobStore> {
    session: Arc<RwLock<Session<B>>>,
    change_tx: broadcast::Sender<ConfigChange>,
    metrics: Arc<Metrics>,
}

impl<B: BlobStore> SessionStore<B> {
    /// Opens a session from whatever `store` holds.
    ///
    /// A missing or undecodable blob is replaced by the generated default
    /// configuration, which is written back immediately.
    pub fn load(mut store: B) -> Result<Self> {
        let metrics = Arc::new(Metrics::new());
        let stored = store.read().context("Failed to read stored configuration")?;

        let decoded = match stored.as_deref().map(ConfigCodec::decode) {
            Some(Ok(config)) => {
                metrics.record_decode();
                Some(config)
            }
            Some(Err(e)) => {
                metrics.record_decode_failure();
                tracing::warn!("Stored configuration is unusable, regenerating: {}", e);
                None
            }
            None => None,
        };

        let (config, blob) = match decoded {
            Some(config) => {
                // Legacy and validator-repaired blobs differ from their re-encoding
                let blob = encode_timed(&metrics, &config)?;
                if stored.as_deref().map(str::trim) != Some(blob.as_str()) {
                    tracing::info!("Rewriting stored configuration in canonical form");
                    store.write(&blob).context("Failed to persist configuration")?;
                }
                (config, blob)
            }
            None => {
                metrics.record_bootstrap();
                let config = AppConfig::generated();
                let blob = encode_timed(&metrics, &config)?;
                store.write(&blob).context("Failed to persist configuration")?;
                tracing::info!("Bootstrapped a new configuration");
                (config, blob)
            }
        };

        let (change_tx, _) = broadcast::channel(100);
        Ok(Self {
            session: Arc::new(RwLock::new(Session {
                config,
                blob,
                store,
            })),
            change_tx,
            metrics,
        })
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> AppConfig {
        self.read_session().config.clone()
    }

    /// The encoded form of the current configuration.
    pub fn encoded(&self) -> String {
        self.read_session().blob.clone()
    }

    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppConfig) -> R,
    {
        f(&self.read_session().config)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChange> {
        self.change_tx.subscribe()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Applies an edit, persists it and emits change events.
    ///
    /// An edit that changes nothing is neither persisted nor announced.
    pub fn update<F>(&self, update_fn: F) -> Result<Vec<ConfigChange>>
    where
        F: FnOnce(&mut AppConfig),
    {
        self.try_update(|config| {
            update_fn(config);
            Ok(())
        })
    }

    /// Like [`update()`](Self::update), for edits that can refuse; a refused
    /// edit leaves the configuration untouched.
    pub fn try_update<F>(&self, update_fn: F) -> Result<Vec<ConfigChange>>
    where
        F: FnOnce(&mut AppConfig) -> Result<()>,
    {
        let session = self.write_session();
        let mut edited = session.config.clone();
        update_fn(&mut edited)?;
        if edited == session.config {
            return Ok(Vec::new());
        }

        // Compare what would be persisted, not the raw edit
        let (next, blob) = encode_normalized(&self.metrics, &edited)?;
        let changes = detect_changes(&session.config, &next);
        if changes.is_empty() {
            return Ok(changes);
        }

        self.commit(session, next, blob, changes)
    }

    /// Swaps in a whole configuration.
    pub fn replace(&self, config: AppConfig) -> Result<Vec<ConfigChange>> {
        let session = self.write_session();
        let (next, blob) = encode_normalized(&self.metrics, &config)?;
        self.commit(session, next, blob, vec![ConfigChange::ConfigReplaced])
    }

    /// Back to the generated default configuration.
    pub fn reset(&self) -> Result<Vec<ConfigChange>> {
        tracing::info!("Resetting configuration to defaults");
        self.replace(AppConfig::generated())
    }

    /// Decodes `blob` and replaces the configuration with it.
    pub fn load_blob(&self, blob: &str) -> Result<Vec<ConfigChange>> {
        let config = ConfigCodec::decode(blob).inspect_err(|_: &DecodeError| {
            self.metrics.record_decode_failure();
        })?;
        self.metrics.record_decode();
        self.replace(config)
    }

    pub fn set_core_settings(
        &self,
        remove_trash: bool,
        profile: ProfileName,
    ) -> Result<Vec<ConfigChange>> {
        self.update(|config| {
            config.remove_trash = remove_trash;
            config.settings_model.profile = profile;
        })
    }

    /// Sets the three pattern lists from editor text, one pattern per line.
    pub fn set_filters(
        &self,
        require: &str,
        exclude: &str,
        preferred: &str,
    ) -> Result<Vec<ConfigChange>> {
        self.update(|config| {
            let settings = &mut config.settings_model;
            settings.require = FilterRule::from_lines(require);
            settings.exclude = FilterRule::from_lines(exclude);
            settings.preferred = FilterRule::from_lines(preferred);
        })
    }

    pub fn set_languages(
        &self,
        required: &str,
        exclude: &str,
        preferred: &str,
    ) -> Result<Vec<ConfigChange>> {
        self.update(|config| {
            config.settings_model.languages = LanguagesConfig::from_lines(required, exclude, preferred);
        })
    }

    pub fn set_resolutions(&self, resolutions: ResolutionConfig) -> Result<Vec<ConfigChange>> {
        self.update(|config| config.settings_model.resolutions = resolutions)
    }

    pub fn set_options(&self, options: OptionsConfig) -> Result<Vec<ConfigChange>> {
        let title_similarity = if options.title_similarity.is_finite() {
            options.title_similarity.clamp(0.0, 1.0)
        } else {
            OptionsConfig::default().title_similarity
        };

        self.update(|config| {
            config.settings_model.options = OptionsConfig {
                title_similarity,
                ..options
            };
        })
    }

    pub fn set_category_ranks(
        &self,
        category: RankCategory,
        overrides: CategoryOverrideSet,
    ) -> Result<Vec<ConfigChange>> {
        self.update(|config| config.settings_model.custom_ranks.set(category, overrides))
    }

    /// Appends an empty test case.
    pub fn add_title(&self) -> Result<Vec<ConfigChange>> {
        self.update(|config| config.titles.push(TitleCase::default()))
    }

    pub fn update_title(&self, index: usize, case: TitleCase) -> Result<Vec<ConfigChange>> {
        self.try_update(|config| {
            let Some(slot) = config.titles.get_mut(index) else {
                bail!("No test case at index {}", index);
            };
            *slot = case;
            Ok(())
        })
    }

    /// Removes a test case; the first one always stays.
    pub fn remove_title(&self, index: usize) -> Result<Vec<ConfigChange>> {
        self.try_update(|config| {
            if index == 0 {
                bail!("The first test case cannot be removed");
            }
            if index >= config.titles.len() {
                bail!("No test case at index {}", index);
            }
            config.titles.remove(index);
            Ok(())
        })
    }

    /// Replaces the settings model from an exported JSON document.
    ///
    /// A rejected document leaves the configuration untouched; the error
    /// downcasts to [`settings_io::ImportError`].
    pub fn import_settings(&self, json: &str) -> Result<Vec<ConfigChange>> {
        let settings = match settings_io::import_settings(json) {
            Ok(settings) => settings,
            Err(e) => {
                self.metrics.record_rejected_import();
                tracing::warn!("Rejected settings import: {}", e);
                return Err(e.into());
            }
        };

        self.update(|config| config.settings_model = settings)
    }

    pub fn export_settings(&self) -> Result<String> {
        self.read(|config| settings_io::export_settings(&config.settings_model))
    }

    fn commit(
        &self,
        mut session: RwLockWriteGuard<'_, Session<B>>,
        next: AppConfig,
        blob: String,
        changes: Vec<ConfigChange>,
    ) -> Result<Vec<ConfigChange>> {
        session
            .store
            .write(&blob)
            .context("Failed to persist configuration")?;

        session.config = next;
        session.blob = blob;
        drop(session);

        self.metrics.record_mutation();
        tracing::debug!("Committed configuration edit: {:?}", changes);

        for change in &changes {
            // Nobody listening is fine
            let _ = self.change_tx.send(change.clone());
        }

        Ok(changes)
    }

    fn read_session(&self) -> RwLockReadGuard<'_, Session<B>> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, Session<B>> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B: BlobStore> Clone for SessionStore<B> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            change_tx: self.change_tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

fn encode_timed(metrics: &Metrics, config: &AppConfig) -> Result<String> {
    let started = Instant::now();
    let blob = ConfigCodec::encode(config).context("Failed to encode configuration")?;
    metrics.record_encode(started.elapsed());
    Ok(blob)
}

/// Encodes `config` and reads it back, so the live value always equals what
/// a later load of the blob would produce.
fn encode_normalized(metrics: &Metrics, config: &AppConfig) -> Result<(AppConfig, String)> {
    let blob = encode_timed(metrics, config)?;
    let normalized = ConfigCodec::decode(&blob).context("Failed to read back encoded configuration")?;
    Ok((normalized, blob))
}

/// Detect what changed between two configurations
fn detect_changes(old: &AppConfig, new: &AppConfig) -> Vec<ConfigChange> {
    let mut changes = Vec::new();
    let (old_settings, new_settings) = (&old.settings_model, &new.settings_model);

    if old_settings.profile != new_settings.profile {
        changes.push(ConfigChange::ProfileChanged {
            profile: new_settings.profile,
        });
    }

    if old.remove_trash != new.remove_trash {
        changes.push(ConfigChange::TrashFlagChanged {
            remove_trash: new.remove_trash,
        });
    }

    if old_settings.require != new_settings.require
        || old_settings.exclude != new_settings.exclude
        || old_settings.preferred != new_settings.preferred
    {
        changes.push(ConfigChange::FiltersChanged);
    }

    if old_settings.languages != new_settings.languages {
        changes.push(ConfigChange::LanguagesChanged);
    }

    if old_settings.resolutions != new_settings.resolutions {
        changes.push(ConfigChange::ResolutionsChanged);
    }

    if old_settings.options != new_settings.options {
        changes.push(ConfigChange::OptionsChanged);
    }

    if old_settings.custom_ranks != new_settings.custom_ranks {
        changes.push(ConfigChange::CustomRanksChanged);
    }

    if old.titles != new.titles {
        changes.push(ConfigChange::TitlesChanged {
            count: new.titles.len(),
        });
    }

    changes
}
