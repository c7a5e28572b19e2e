use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Conventional extension for profile archives.
pub const PROFILE_EXTENSION: &str = "nvdaprofile";

/// Env override for the live configuration directory.
pub const DIR_OVERRIDE_VAR: &str = "NVPROFILE_DIR";

/// Folder name the screen reader keeps under the per-user application-data directory.
const CONFIG_FOLDER: &str = "nvda";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub computer_name: String,
}

impl Identity {
    pub fn from_env() -> Self {
        Self {
            username: first_env(&["USERNAME", "USER"]),
            computer_name: first_env(&["COMPUTERNAME", "HOSTNAME"]),
        }
    }
}

fn first_env(keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locations {
    /// Live configuration directory that backups read and restores replace.
    pub config_dir: PathBuf,
}

impl Locations {
    pub fn discover() -> Option<Self> {
        Self::resolve(
            std::env::var_os(DIR_OVERRIDE_VAR),
            std::env::var_os("APPDATA"),
            dirs::config_dir(),
        )
    }

    /// Override first, then `%APPDATA%\nvda`, then the platform config dir.
    pub fn resolve(
        override_dir: Option<OsString>,
        appdata: Option<OsString>,
        config_dir: Option<PathBuf>,
    ) -> Option<Self> {
        let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty()).map(PathBuf::from);
        let config_dir = non_empty(override_dir)
            .or_else(|| non_empty(appdata).map(|a| a.join(CONFIG_FOLDER)))
            .or_else(|| config_dir.map(|c| c.join(CONFIG_FOLDER)))?;
        Some(Self { config_dir })
    }
}

/// Appends `.nvdaprofile` unless the path already ends with it.
pub fn with_profile_extension(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(PROFILE_EXTENSION))
        .unwrap_or(false);
    if has_ext {
        return path.to_path_buf();
    }
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(PROFILE_EXTENSION);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_everything() {
        let l = Locations::resolve(
            Some("/srv/cfg".into()),
            Some("/appdata".into()),
            Some(PathBuf::from("/home/u/.config")),
        )
        .unwrap();
        assert_eq!(l.config_dir, PathBuf::from("/srv/cfg"));
    }

    #[test]
    fn appdata_then_config_dir() {
        let l = Locations::resolve(None, Some("/appdata".into()), None).unwrap();
        assert_eq!(l.config_dir, Path::new("/appdata").join("nvda"));

        let l = Locations::resolve(Some("".into()), None, Some(PathBuf::from("/home/u/.config")))
            .unwrap();
        assert_eq!(l.config_dir, Path::new("/home/u/.config").join("nvda"));

        assert!(Locations::resolve(None, None, None).is_none());
    }

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(
            with_profile_extension(Path::new("backup")),
            PathBuf::from("backup.nvdaprofile")
        );
        assert_eq!(
            with_profile_extension(Path::new("dir/backup.nvdaprofile")),
            PathBuf::from("dir/backup.nvdaprofile")
        );
        assert_eq!(
            with_profile_extension(Path::new("backup.zip")),
            PathBuf::from("backup.zip.nvdaprofile")
        );
    }
}
