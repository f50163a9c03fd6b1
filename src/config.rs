//! Optional TOML settings.
//!
//! ```toml
//! [markers]
//! open = "CUT"
//! close = "END_CUT"
//! titles = ["Week", "Time", "Mon", "Tues", "Wed", "Thur", "Fri"]
//!
//! [calendar]
//! lecture_minutes = 60
//!
//! [defaults]
//! courses = ["GR", "QO"]
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use timecut_engine::scan::ScanConfig;

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;
const DEFAULT_LECTURE_MINUTES: u32 = 60;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    markers: MarkersSection,
    calendar: CalendarSection,
    defaults: DefaultsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MarkersSection {
    open: Option<String>,
    close: Option<String>,
    titles: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CalendarSection {
    lecture_minutes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DefaultsSection {
    courses: Vec<String>,
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub scan: ScanConfig,
    pub lecture_minutes: u32,
    pub default_courses: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            scan: ScanConfig::default(),
            lecture_minutes: DEFAULT_LECTURE_MINUTES,
            default_courses: Vec::new(),
        }
    }
}

impl From<ConfigFile> for Settings {
    fn from(file: ConfigFile) -> Self {
        let mut settings = Settings::default();
        if let Some(open) = file.markers.open {
            settings.scan.open_marker = open;
        }
        if let Some(close) = file.markers.close {
            settings.scan.close_marker = close;
        }
        if let Some(titles) = file.markers.titles {
            settings.scan.column_titles = titles;
        }
        if let Some(minutes) = file.calendar.lecture_minutes {
            settings.lecture_minutes = minutes;
        }
        settings.default_courses = file.defaults.courses;
        settings
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "timecut")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load settings from `explicit`, or the user config file when it exists.
///
/// Problems never abort the run: they come back as warnings and the
/// defaults are used.
pub fn load_settings(explicit: Option<&Path>) -> (Settings, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Settings::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Settings::default(), warnings);
    }

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            (Settings::default(), warnings)
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_settings(&content) {
                Ok(settings) => (settings, warnings),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    (Settings::default(), warnings)
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                (Settings::default(), warnings)
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            (Settings::default(), warnings)
        }
    }
}

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str::<ConfigFile>(content).map(Settings::from)
}
