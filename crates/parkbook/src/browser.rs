use anyhow::Result;
use headless_chrome::browser::default_executable;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::{OsStr, OsString};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0";

/// Creates a browser instance with a dedicated user data directory so the
/// site session survives between runs.
///
/// The browser is launched with:
/// - **Headless or windowed mode** based on the `headless` parameter.
/// - **Custom user agent** (the site serves a reduced page to obvious bots).
/// - **Custom user data directory** for isolated session data.
/// - **Sandbox disabled** and an idle timeout matched to the mode: a
///   headless run is fully automated and short, a windowed run may sit open
///   while someone watches it.
///
/// A failed launch wipes the profile directory and retries once; a corrupt
/// profile is the usual cause.
pub fn create_browser(headless: bool) -> Result<Browser> {
    let user_agent = OsString::from(format!("--user-agent={USER_AGENT}"));

    let mut attempts = 0;
    loop {
        let user_data_dir = crate::utils::get_user_data_dir()?;

        let idle_timeout = if headless {
            Duration::from_secs(120)
        } else {
            Duration::from_secs(600)
        };

        let mut options = LaunchOptions::default_builder();
        let mut launch_options = options
            .headless(headless)
            .sandbox(false)
            .idle_browser_timeout(idle_timeout)
            .window_size(Some((1280, 900)))
            .enable_gpu(false)
            .args(vec![
                OsStr::new("--new-window"),
                user_agent.as_os_str(),
                OsStr::new("--no-first-run"),
                OsStr::new("--no-default-browser-check"),
                OsStr::new("--disable-session-crashed-bubble"),
                OsStr::new("--lang=en-US"),
            ])
            .user_data_dir(Some(user_data_dir));

        if let Ok(path) = std::env::var("PARKBOOK_CHROME_PATH") {
            launch_options = launch_options.path(Some(path.into()));
        } else if let Ok(executable_path) = default_executable() {
            launch_options = launch_options.path(Some(executable_path));
        }

        match Browser::new(launch_options.build()?) {
            Ok(browser) => return Ok(browser),
            Err(e) => {
                attempts += 1;
                if attempts >= 2 {
                    anyhow::bail!("browser failed even after profile wipe: {}", e);
                }
                log::warn!("[!] Browser launch failed. Wiping profile and retrying...");
                crate::utils::wipe_user_data_dir()?;
            }
        }
    }
}
