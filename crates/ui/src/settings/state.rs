use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use gpui::*;
use gpui_component::{Theme, ThemeMode, ThemeRegistry};
use lawwise_chat::Persona;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "lawwise";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// User preferences kept between launches. Conversations are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(
        default = "default_theme_mode",
        serialize_with = "serialize_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
    #[serde(default)]
    pub theme_name: String,
    #[serde(default)]
    pub default_persona: Persona,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            theme_name: String::new(),
            default_persona: Persona::default(),
        }
    }
}

impl AppSettings {
    pub fn normalized(mut self) -> Self {
        self.theme_name = self.theme_name.trim().to_string();
        self
    }

    /// Same settings switched to the opposite of the mode currently `shown`.
    ///
    /// A named preset can show a different mode than `theme_mode`, so the
    /// caller passes what is actually on screen.
    pub fn toggled_from(&self, shown: ThemeMode) -> Self {
        let theme_mode = if shown.is_dark() {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };

        Self {
            theme_mode,
            // A named preset pins its own mode, so toggling drops it.
            theme_name: String::new(),
            ..self.clone()
        }
    }

    pub fn apply_theme(&self, window: Option<&mut Window>, cx: &mut App) {
        if let Some(theme_config) = ThemeRegistry::global(cx)
            .themes()
            .get(&SharedString::from(self.theme_name.trim().to_string()))
            .cloned()
        {
            let mode = theme_config.mode;
            let theme = Theme::global_mut(cx);
            if mode.is_dark() {
                theme.dark_theme = theme_config;
            } else {
                theme.light_theme = theme_config;
            }
            Theme::change(mode, window, cx);
            return;
        }

        Theme::change(self.theme_mode, window, cx);
    }
}

/// Settings file on disk plus the in-memory snapshot readers share.
pub struct SettingsStore {
    current: Arc<ArcSwap<AppSettings>>,
    path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        match dirs::config_dir() {
            Some(base) => base.join(SETTINGS_DIRECTORY_NAME),
            None => PathBuf::from(format!(".{SETTINGS_DIRECTORY_NAME}")),
        }
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(path: PathBuf) -> Self {
        let initial = read_settings(&path);
        Self {
            current: Arc::new(ArcSwap::from_pointee(initial)),
            path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Arc<AppSettings> {
        self.current.load_full()
    }

    /// Publishes `settings` to readers, then writes them to disk.
    ///
    /// The in-memory snapshot is replaced even when the write fails; the error
    /// only reports that the change will not survive a restart.
    pub fn update(&self, settings: AppSettings) -> Result<(), SettingsError> {
        let settings = Arc::new(settings.normalized());
        self.current.store(Arc::clone(&settings));

        write_settings(&self.path, &settings)?;
        tracing::info!(
            path = %self.path.display(),
            mode = settings.theme_mode.name(),
            persona = %settings.default_persona,
            "settings saved"
        );
        Ok(())
    }
}

fn read_settings(path: &Path) -> AppSettings {
    if !path.is_file() {
        tracing::info!(path = %path.display(), "no settings file, starting with defaults");
        return AppSettings::default();
    }

    let extracted = Figment::from(Serialized::defaults(AppSettings::default()))
        .merge(Json::file(path))
        .extract::<AppSettings>();

    extracted
        .map(AppSettings::normalized)
        .unwrap_or_else(|error| {
            tracing::warn!(path = %path.display(), "ignoring unreadable settings: {error}");
            AppSettings::default()
        })
}

/// Replaces the file through a sibling temp file so a crash never leaves
/// half-written JSON behind.
fn write_settings(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let json = serde_json::to_vec_pretty(settings).context(SerializeConfigSnafu {
        stage: "encode-settings",
    })?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).context(CreateDirSnafu {
            stage: "prepare-settings-dir",
            path: dir.to_path_buf(),
        })?;
    }

    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, json).context(WriteFileSnafu {
        stage: "write-staging-file",
        path: staging.clone(),
    })?;
    std::fs::rename(&staging, path).context(RenameTempFileSnafu {
        stage: "swap-in-staging-file",
        from: staging.clone(),
        to: path.to_path_buf(),
    })
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("cannot create {path:?} during `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("cannot encode settings during `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("cannot write {path:?} during `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("cannot move {from:?} over {to:?} during `{stage}`: {source}"))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// GPUI entity that owns the settings store and broadcasts changes.
pub struct SettingsState {
    store: SettingsStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    pub settings: AppSettings,
}

impl EventEmitter<SettingsChanged> for SettingsState {}

impl SettingsState {
    pub fn new(cx: &mut App) -> Entity<Self> {
        cx.new(|_| Self {
            store: SettingsStore::load(),
        })
    }

    pub fn settings(&self) -> Arc<AppSettings> {
        self.store.settings()
    }

    pub fn update_settings(
        &mut self,
        settings: AppSettings,
        cx: &mut Context<Self>,
    ) -> Result<(), SettingsError> {
        let saved = self.store.update(settings);
        let settings = AppSettings::clone(&self.store.settings());
        cx.emit(SettingsChanged { settings });
        cx.notify();
        saved
    }
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn serialize_theme_mode<S>(value: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_theme_mode(&value))
}

fn parse_theme_mode(value: &str) -> ThemeMode {
    if value.trim().eq_ignore_ascii_case("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lawwise-settings-{name}-{}", std::process::id()))
            .join(SETTINGS_FILE_NAME)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(scratch_config_path("missing"));

        assert_eq!(*store.settings(), AppSettings::default());
        assert_eq!(store.settings().default_persona, Persona::User);
    }

    #[test]
    fn update_persists_and_reloads() {
        let path = scratch_config_path("roundtrip");
        let store = SettingsStore::new(path.clone());
        let settings = AppSettings {
            theme_mode: ThemeMode::Dark,
            theme_name: "  Solarized  ".to_string(),
            default_persona: Persona::Lawyer,
        };

        store.update(settings).unwrap();
        assert!(store.path().is_file());
        assert!(!store.path().with_extension("json.tmp").exists());
        let reloaded = SettingsStore::new(path.clone());

        assert_eq!(reloaded.settings().theme_mode, ThemeMode::Dark);
        assert_eq!(reloaded.settings().theme_name, "Solarized");
        assert_eq!(reloaded.settings().default_persona, Persona::Lawyer);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = scratch_config_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path.clone());
        assert_eq!(*store.settings(), AppSettings::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn toggling_flips_mode_and_clears_preset() {
        let settings = AppSettings {
            theme_mode: ThemeMode::Light,
            theme_name: "Catppuccin".to_string(),
            default_persona: Persona::Lawyer,
        };

        let toggled = settings.toggled_from(ThemeMode::Light);
        assert_eq!(toggled.theme_mode, ThemeMode::Dark);
        assert!(toggled.theme_name.is_empty());
        assert_eq!(toggled.default_persona, Persona::Lawyer);
        assert_eq!(
            toggled.toggled_from(toggled.theme_mode).theme_mode,
            ThemeMode::Light
        );
    }

    #[test]
    fn toggle_follows_the_shown_mode_not_the_stored_one() {
        // A dark preset is on screen while the stored mode still says light.
        let settings = AppSettings {
            theme_mode: ThemeMode::Light,
            theme_name: "Midnight".to_string(),
            default_persona: Persona::User,
        };

        let toggled = settings.toggled_from(ThemeMode::Dark);
        assert_eq!(toggled.theme_mode, ThemeMode::Light);
        assert!(toggled.theme_name.is_empty());
    }

    #[test]
    fn failed_save_still_moves_the_snapshot() {
        let blocker = std::env::temp_dir().join(format!(
            "lawwise-settings-blocked-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&blocker);
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = SettingsStore::new(blocker.join("nested").join(SETTINGS_FILE_NAME));

        let first = store.settings().toggled_from(store.settings().theme_mode);
        assert!(store.update(first).is_err());
        assert_eq!(store.settings().theme_mode, ThemeMode::Dark);

        let second = store.settings().toggled_from(store.settings().theme_mode);
        assert!(store.update(second).is_err());
        assert_eq!(store.settings().theme_mode, ThemeMode::Light);

        let _ = std::fs::remove_file(&blocker);
    }
}
