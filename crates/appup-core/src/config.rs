use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/appup/config.toml`.
///
/// Defaults describe the Cursor editor AppImage; every field can be
/// overridden to manage another single-file application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppupConfig {
    /// Short lowercase name: launcher file stem, icon stem, shim name.
    pub app_name: String,
    /// `Name=` of the desktop entry.
    pub display_name: String,
    /// `Comment=` of the desktop entry.
    pub comment: String,
    /// Vendor API returning `{"downloadUrl": ...}`. `{platform}` is replaced
    /// with `linux-x64` or `linux-arm64`.
    pub api_url: String,
    pub icon_url: String,
    /// Artifact file names look like `<prefix><version>...<suffix>`.
    pub artifact_prefix: String,
    pub artifact_suffix: String,
    /// Where artifacts are stored; defaults to `~/Applications`.
    pub storage_dir: Option<PathBuf>,
    /// CLI shim location; defaults to `/usr/local/bin/<app_name>`.
    pub shim_path: Option<PathBuf>,
    /// Flag passed to the artifact by launchers and the shim.
    pub launch_flag: String,
    pub categories: String,
    pub keywords: String,
    /// Bound for the API query and the HEAD probe, in seconds.
    pub metadata_timeout_secs: u64,
    /// Mark the desktop launcher trusted with `gio` after writing it.
    pub trust_desktop_launcher: bool,
}

impl Default for AppupConfig {
    fn default() -> Self {
        Self {
            app_name: "cursor".to_string(),
            display_name: "Cursor".to_string(),
            comment: "The AI Code Editor".to_string(),
            api_url: "https://www.cursor.com/api/download?platform={platform}&releaseTrack=stable"
                .to_string(),
            icon_url: "https://www.cursor.com/assets/images/logo.png".to_string(),
            artifact_prefix: "Cursor-".to_string(),
            artifact_suffix: ".AppImage".to_string(),
            storage_dir: None,
            shim_path: None,
            launch_flag: "--no-sandbox".to_string(),
            categories: "Development;IDE;TextEditor;".to_string(),
            keywords: "cursor;code;editor;ide;ai;".to_string(),
            metadata_timeout_secs: 5,
            trust_desktop_launcher: true,
        }
    }
}

impl AppupConfig {
    /// `api_url` with `{platform}` substituted.
    pub fn api_url_for(&self, platform: &str) -> String {
        self.api_url.replace("{platform}", platform)
    }
}

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,appup=debug,appup_core=debug";

/// `~/.local/state/appup/appup.log`. The directory is not created here.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("appup")?;
    Ok(xdg_dirs.get_state_home().join("appup").join("appup.log"))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("appup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AppupConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AppupConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AppupConfig = toml::from_str(&data)?;
    Ok(cfg)
}
