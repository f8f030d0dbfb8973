//! Ordered selector strategy lists for the booking site.
//!
//! Order encodes priority: the first matching, visible (and where relevant
//! enabled) element wins. The lists run from the most site-specific shape to
//! the most generic fallback, so a cosmetic redesign of the site degrades to
//! the generic entries instead of breaking the run outright.

/// One CSS candidate in a priority-ordered strategy list.
#[derive(Debug, Clone, Copy)]
pub struct SelectorCandidate {
    pub css: &'static str,
    pub description: &'static str,
}

const fn candidate(css: &'static str, description: &'static str) -> SelectorCandidate {
    SelectorCandidate { css, description }
}

/// Any visible match here means the booking form is on screen and the
/// session is already authenticated.
pub const BOOKING_FORM_PROBES: &[SelectorCandidate] = &[
    candidate("input[name=\"title\"]", "booking title input"),
    candidate(".booking-details input", "booking details field"),
    candidate("form[class*=\"booking\"] input", "booking form field"),
];

pub const LOGIN_EMAIL_FIELDS: &[SelectorCandidate] = &[
    candidate("input[type=\"email\"]", "email-typed input"),
    candidate("input[name=\"email\"]", "input named email"),
    candidate("#email", "input with id email"),
    candidate("input[name=\"username\"]", "input named username"),
];

pub const LOGIN_PASSWORD_FIELDS: &[SelectorCandidate] = &[
    candidate("input[type=\"password\"]", "password-typed input"),
    candidate("input[name=\"password\"]", "input named password"),
    candidate("#password", "input with id password"),
];

pub const LOGIN_SUBMIT_BUTTONS: &[SelectorCandidate] = &[
    candidate("form button[type=\"submit\"]", "form submit button"),
    candidate("input[type=\"submit\"]", "submit-typed input"),
    candidate("button[type=\"submit\"]", "any submit button"),
];

pub const TITLE_FIELDS: &[SelectorCandidate] = &[
    candidate("input[name=\"title\"]", "input named title"),
    candidate("#title", "input with id title"),
    candidate("input[placeholder*=\"title\" i]", "input with title placeholder"),
    candidate("textarea[name=\"title\"]", "textarea named title"),
];

pub const SIGNATURE_FIELDS: &[SelectorCandidate] = &[
    candidate("input[name=\"signature\"]", "input named signature"),
    candidate("#signature", "input with id signature"),
    candidate(
        "input[placeholder*=\"signature\" i]",
        "input with signature placeholder",
    ),
];

/// Structural phase of confirm-button resolution, most specific first.
pub const CONFIRM_STRUCTURAL: &[SelectorCandidate] = &[
    candidate(
        ".booking-actions button.btn-success",
        "success button in booking actions",
    ),
    candidate(
        ".modal-footer button.btn-success",
        "success button in modal footer",
    ),
    candidate(
        "form[class*=\"booking\"] button[type=\"submit\"]",
        "submit button in booking form",
    ),
    candidate(
        ".booking-details button[type=\"submit\"]",
        "submit button in booking details",
    ),
    candidate("button.btn-success", "any success button"),
    candidate("button[type=\"submit\"]", "any submit button"),
];

/// Text phase of confirm-button resolution; keyword order is priority order.
pub const CONFIRM_KEYWORDS: &[&str] = &["confirm", "book", "submit"];

/// Modal-scoped candidates for the post-submission dialog.
pub const DIALOG_CONFIRM: &[SelectorCandidate] = &[
    candidate(
        ".modal.show .modal-footer button.btn-success",
        "success button in open modal footer",
    ),
    candidate(".modal.show button[type=\"submit\"]", "submit button in open modal"),
    candidate("[role=\"dialog\"] button.btn-primary", "primary button in dialog"),
    candidate(
        "[role=\"dialog\"] button[type=\"submit\"]",
        "submit button in dialog",
    ),
];

/// Containers the dialog text probe is restricted to.
pub const DIALOG_CONTAINERS: &str = ".modal, [role=\"dialog\"], .popup, .dialog";

pub const DIALOG_KEYWORDS: &[&str] = &["confirm", "ok", "yes"];

/// Error banners checked by the outcome verifier, first visible non-empty
/// text wins.
pub const ERROR_BANNERS: &[SelectorCandidate] = &[
    candidate(".alert-danger", "danger alert"),
    candidate("[role=\"alert\"]", "alert role"),
    candidate("[aria-live=\"assertive\"]", "assertive live region"),
    candidate(".validation-summary-errors", "validation summary"),
    candidate(".error-message", "error message block"),
    candidate("[class*=\"error\"]", "element with error class"),
];
