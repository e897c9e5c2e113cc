use std::path::PathBuf;

/// Returns the helpdesk home directory.
///
/// Resolution order:
/// 1. `HELPDESK_HOME` environment variable (if set and non-empty)
/// 2. Platform config directory (e.g. `~/.config/helpdesk`)
/// 3. Current working directory + `.helpdesk`
pub fn helpdesk_home() -> PathBuf {
    if let Ok(home) = std::env::var("HELPDESK_HOME")
        && !home.is_empty()
    {
        return PathBuf::from(home);
    }

    directories::ProjectDirs::from("com", "helpdesk", "helpdesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".helpdesk"))
}

/// Path to the YAML configuration file.
pub fn config_path() -> PathBuf {
    helpdesk_home().join("config.yaml")
}

/// Directory backing the persistent key/value store.
pub fn storage_dir() -> PathBuf {
    helpdesk_home().join("storage")
}

/// Snapshot file for the local backend.
pub fn local_backend_path() -> PathBuf {
    helpdesk_home().join("local-backend.json")
}

/// Log file written by the tracing subscriber.
pub fn log_path() -> PathBuf {
    helpdesk_home().join("helpdesk.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_helpdesk_home_with_env_var() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("HELPDESK_HOME", "/custom/path/helpdesk") };
        assert_eq!(helpdesk_home(), PathBuf::from("/custom/path/helpdesk"));
        assert_eq!(
            config_path(),
            PathBuf::from("/custom/path/helpdesk/config.yaml")
        );
        assert_eq!(
            storage_dir(),
            PathBuf::from("/custom/path/helpdesk/storage")
        );
        unsafe { std::env::remove_var("HELPDESK_HOME") };
    }

    #[test]
    #[serial]
    fn test_empty_env_var_is_ignored() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("HELPDESK_HOME", "") };
        assert_ne!(helpdesk_home(), PathBuf::from(""));
        unsafe { std::env::remove_var("HELPDESK_HOME") };
    }
}
