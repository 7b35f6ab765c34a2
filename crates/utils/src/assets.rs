use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "bottlenote";
const APPLICATION: &str = "whisky-admin";

/// Per-user configuration directory, e.g. `~/.config/whisky-admin` on Linux.
///
/// Falls back to `./.whisky-admin` when the platform has no home directory.
pub fn config_dir() -> PathBuf {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".whisky-admin"))
}

pub fn token_file_path() -> PathBuf {
    config_dir().join("tokens.json")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
