use anyhow::Result;
use chrono::{Local, SecondsFormat};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Platform-relative path from the home directory to the browser profile.
#[cfg(target_os = "linux")]
const PROFILE_SUBPATH: &str = ".local/share/parkbook/profile";

#[cfg(target_os = "macos")]
const PROFILE_SUBPATH: &str = "Library/Application Support/parkbook/profile";

#[cfg(target_os = "windows")]
const PROFILE_SUBPATH: &str = "AppData/Roaming/parkbook/profile";

/// Returns a platform-appropriate user data directory for the Chrome profile,
/// creating it if it does not already exist. A dedicated profile keeps the
/// site's session cookies between runs so most invocations skip the login.
pub fn get_user_data_dir() -> Result<PathBuf> {
    let home_dir = env::var("HOME").or_else(|_| env::var("USERPROFILE"))?;
    let user_data_dir = PathBuf::from(&home_dir).join(PROFILE_SUBPATH);

    if !user_data_dir.exists() {
        std::fs::create_dir_all(&user_data_dir)?;
        log::info!("User data directory created at: {:?}", user_data_dir);
    }

    Ok(user_data_dir)
}

/// Completely removes the user data directory.
pub fn wipe_user_data_dir() -> Result<()> {
    let path = get_user_data_dir()?;
    if path.exists() {
        std::fs::remove_dir_all(&path)?;
        log::info!("Wiped profile directory: {:?}", path);
    }
    Ok(())
}

/// Escapes a string for embedding in single-quoted JavaScript literals.
pub fn js_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n")
}

/// Default failure-log file name, created in the working directory.
pub const FAILURE_LOG_FILE: &str = "booking-failures.log";

/// Append-only record of failed booking attempts. One line per failure:
/// timestamp, dash, message. A write failure is reported as a warning and
/// never masks the booking error itself.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn in_working_dir() -> Self {
        Self {
            path: PathBuf::from(FAILURE_LOG_FILE),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, message: &str) {
        let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        let line = format!("{} - {}\n", stamp, message);
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = written {
            log::warn!(
                "[!] Could not write failure log {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
