use std::fmt;

/// Error types returned by a booking attempt.
/// Every variant is terminal for the current attempt; nothing is retried.
#[derive(Debug, Clone)]
pub enum BookingError {
    /// Missing or malformed configuration, or an unknown facility key.
    Config { message: String },
    /// Bad user input, rejected before the browser is launched.
    Validation { message: String },
    /// The login form never appeared within the wait budget.
    LoginFormNotFound { url: String },
    /// A bounded wait for a page transition ran out.
    NavigationTimeout { waiting_for: String },
    /// Neither the structural nor the text phase produced a confirm control.
    ConfirmButtonNotFound { url: String },
    /// The post-submission check did not land on the clean booking URL.
    VerificationFailed(VerificationFailure),
    /// Browser or protocol level failure.
    Browser { message: String },
}

/// How a verification failure presented itself on the page.
#[derive(Debug, Clone)]
pub enum VerificationFailure {
    /// The site showed an explicit error banner; `message` is its text.
    SiteError { message: String },
    /// No banner was found; report what was observable instead.
    Ambiguous { url: String, title: String },
}

impl BookingError {
    /// Returns the user-facing error message.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Config { message } => {
                format!("Configuration problem: {}", message)
            }
            BookingError::Validation { message } => {
                format!("Invalid request: {}", message)
            }
            BookingError::LoginFormNotFound { url } => {
                format!(
                    "Could not find the login form. The site may have changed its layout. (page: {})",
                    url
                )
            }
            BookingError::NavigationTimeout { waiting_for } => {
                format!("Timed out waiting for {}.", waiting_for)
            }
            BookingError::ConfirmButtonNotFound { url } => {
                format!(
                    "Could not find a confirmation button on the booking page. (page: {})",
                    url
                )
            }
            BookingError::VerificationFailed(failure) => failure.user_message(),
            BookingError::Browser { message } => {
                format!("Browser error: {}", message)
            }
        }
    }

    /// True when the site itself rejected the booking, as opposed to the
    /// automation failing to drive the page.
    pub fn is_site_rejection(&self) -> bool {
        matches!(
            self,
            BookingError::VerificationFailed(VerificationFailure::SiteError { .. })
        )
    }
}

impl VerificationFailure {
    pub fn user_message(&self) -> String {
        match self {
            VerificationFailure::SiteError { message } => {
                format!("The site rejected the booking: {}", message)
            }
            VerificationFailure::Ambiguous { url, title } => {
                format!(
                    "Could not confirm the booking. The page did not return to the booking URL. \
                     (page: {}, title: {:?})",
                    url, title
                )
            }
        }
    }

    /// One-line form used for the failure log.
    pub fn log_line(&self) -> String {
        match self {
            VerificationFailure::SiteError { message } => message.clone(),
            VerificationFailure::Ambiguous { url, title } => {
                format!("no confirmation redirect; url={} title={:?}", url, title)
            }
        }
    }
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for BookingError {}

impl From<anyhow::Error> for BookingError {
    fn from(err: anyhow::Error) -> Self {
        BookingError::Browser {
            message: err.to_string(),
        }
    }
}
