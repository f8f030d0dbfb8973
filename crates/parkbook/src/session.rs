use crate::browser::create_browser;
use crate::error::{BookingError, VerificationFailure};
use crate::handlers::{form, login, submit, verify, BookingTab};
use crate::utils::FailureLog;
use headless_chrome::{Browser, Tab};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

/// Pause after the field writes, long enough for client-side validation to
/// re-render before the confirm button is resolved.
const FIELD_SETTLE: Duration = Duration::from_millis(1200);

/// Pause after the confirm click before probing for a dialog.
const DIALOG_SETTLE: Duration = Duration::from_millis(1500);

/// Pause before verification. The site confirms with a server-driven
/// redirect back to the bare booking URL, which takes several seconds.
const VERIFY_SETTLE: Duration = Duration::from_secs(5);

/// Per-run browser settings.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    /// Budget for each bounded wait (login form, navigation).
    pub timeout: Duration,
}

/// Everything the browser flow needs for one booking attempt, computed
/// up front so the session code performs no URL or title logic of its own.
#[derive(Debug, Clone)]
pub struct BookingPlan {
    /// Deep link that pre-fills the booking form.
    pub deep_link: String,
    /// Bare booking URL the site redirects to on success.
    pub base_url: String,
    pub title: String,
    pub signature: String,
    pub email: String,
    pub password: String,
}

fn get_initial_tab(browser: &Browser) -> anyhow::Result<Arc<Tab>> {
    for _ in 0..10 {
        if let Ok(tabs) = browser.get_tabs().lock() {
            if let Some(tab) = tabs.first() {
                return Ok(Arc::clone(tab));
            }
        }
        sleep(Duration::from_millis(200));
    }
    browser.new_tab()
}

struct BrowserSession {
    browser: Browser,
    tab: BookingTab,
}

impl BrowserSession {
    fn open(options: &SessionOptions) -> anyhow::Result<Self> {
        let browser = create_browser(options.headless)?;
        let raw_tab = get_initial_tab(&browser)?;
        raw_tab.set_default_timeout(options.timeout);
        Ok(Self {
            browser,
            tab: BookingTab::new(raw_tab),
        })
    }

    fn close(self) {
        if let Ok(tabs) = self.browser.get_tabs().lock() {
            for tab in tabs.iter() {
                // We don't want to hang here if the browser is already dead.
                let _ = tab.close(true);
            }
        }
        sleep(Duration::from_millis(200));
    }

    fn run(
        &self,
        options: &SessionOptions,
        plan: &BookingPlan,
        failures: &FailureLog,
    ) -> Result<(), BookingError> {
        log::info!("[*] Navigating to booking link: {}", plan.deep_link);
        self.tab
            .0
            .navigate_to(&plan.deep_link)
            .map_err(|e| BookingError::Browser {
                message: format!("navigation to {} failed: {}", plan.deep_link, e),
            })?;
        if let Err(e) = self.tab.wait_for_navigation() {
            log::warn!("[!] Initial navigation wait timed out: {}, continuing...", e);
        }

        login::ensure_logged_in(&self.tab, &plan.email, &plan.password, options.timeout)?;

        form::fill_booking_fields(&self.tab, &plan.title, &plan.signature)?;
        log::info!("[*] Fields written, letting the page settle");
        sleep(FIELD_SETTLE);

        submit::click_confirm(&self.tab)?;
        sleep(DIALOG_SETTLE);
        submit::dismiss_confirmation_dialog(&self.tab)?;

        log::info!("[*] Waiting for the booking redirect");
        sleep(VERIFY_SETTLE);

        let outcome = verify::verify_booking(&self.tab, &plan.base_url, failures);
        if let Err(BookingError::VerificationFailed(VerificationFailure::Ambiguous { .. })) =
            &outcome
        {
            if let Err(e) = self.tab.log_page_state() {
                log::debug!("[!] Failed to dump page state: {}", e);
            }
        }
        outcome
    }
}

/// Runs one booking attempt start to finish. The browser is scoped to this
/// call: acquired here, closed unconditionally whatever the outcome.
pub fn book(
    options: &SessionOptions,
    plan: &BookingPlan,
    failures: &FailureLog,
) -> Result<(), BookingError> {
    let session = BrowserSession::open(options).map_err(|e| BookingError::Browser {
        message: format!("failed to start browser: {}", e),
    })?;

    let result = session.run(options, plan, failures);
    session.close();
    result
}
