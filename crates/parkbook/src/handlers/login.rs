use crate::dom::{first_clickable, first_visible, Dom};
use crate::error::BookingError;
use crate::handlers::submit::click_with_fallback;
use crate::handlers::tab::BookingTab;
use crate::selectors::{
    BOOKING_FORM_PROBES, LOGIN_EMAIL_FIELDS, LOGIN_PASSWORD_FIELDS, LOGIN_SUBMIT_BUTTONS,
};
use std::time::Duration;

/// True when the booking form itself is on screen, which means the session
/// cookie from a previous run is still valid.
pub(crate) fn booking_form_present(tab: &BookingTab) -> anyhow::Result<bool> {
    Ok(first_visible(tab, BOOKING_FORM_PROBES)?.is_some())
}

/// Logs in if the deep link landed on the login page instead of the booking
/// form. Once the post-login navigation settles the flow continues straight
/// to field filling; a login that silently failed surfaces later through the
/// outcome verifier.
pub(crate) fn ensure_logged_in(
    tab: &BookingTab,
    email: &str,
    password: &str,
    timeout: Duration,
) -> Result<(), BookingError> {
    if booking_form_present(tab)? {
        log::info!("[✓] Existing session detected, skipping login");
        return Ok(());
    }

    log::info!("[*] Booking form not visible, waiting for the login form");
    let email_field = tab
        .wait_for_candidate(LOGIN_EMAIL_FIELDS, timeout)?
        .ok_or_else(|| BookingError::LoginFormNotFound { url: tab.url() })?;
    let password_field = first_visible(tab, LOGIN_PASSWORD_FIELDS)?
        .ok_or_else(|| BookingError::LoginFormNotFound { url: tab.url() })?;

    log::debug!(
        "[*] Login form found ({} / {})",
        email_field.description,
        password_field.description
    );
    tab.fill(email_field.css, email)?;
    tab.fill(password_field.css, password)?;
    log::info!("[*] Typed credentials for {}", email);

    match first_clickable(tab, LOGIN_SUBMIT_BUTTONS)? {
        Some(button) => {
            log::debug!("[*] Submitting login via {}", button.description);
            click_with_fallback(tab, button.css)?;
        }
        None => {
            log::info!("[!] No login submit control found, pressing Enter");
            tab.press_enter()?;
        }
    }

    tab.wait_for_navigation()
        .map_err(|_| BookingError::NavigationTimeout {
            waiting_for: "the post-login redirect".to_string(),
        })?;
    log::info!("[✓] Login submitted, page transition complete");

    Ok(())
}
