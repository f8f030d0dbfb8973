use crate::dom::{first_error_text, Dom};
use crate::error::{BookingError, VerificationFailure};
use crate::selectors::ERROR_BANNERS;
use crate::utils::FailureLog;

/// Classifies the outcome of a submitted booking.
///
/// Success is exactly one shape: the site consumed the query parameters and
/// redirected back to the bare booking URL. Anything else is a failure,
/// reported with the first visible error banner when one exists, otherwise
/// with whatever URL and title the page ended up on. Every failure appends
/// one line to the failure log before the error is returned.
pub(crate) fn verify_booking(
    dom: &dyn Dom,
    base_url: &str,
    failures: &FailureLog,
) -> Result<(), BookingError> {
    let current = dom.url();
    if current == base_url {
        log::info!("[✓] Site returned to {}, booking confirmed", base_url);
        return Ok(());
    }

    log::warn!("[!] Page did not return to the booking URL (now at {})", current);

    let failure = match first_error_text(dom, ERROR_BANNERS)? {
        Some(message) => VerificationFailure::SiteError { message },
        None => VerificationFailure::Ambiguous {
            url: current,
            title: dom.title().unwrap_or_default(),
        },
    };

    failures.append(&failure.log_line());
    Err(BookingError::VerificationFailed(failure))
}
