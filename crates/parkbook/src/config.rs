use crate::error::BookingError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Environment prefix for credential overrides.
const ENV_PREFIX: &str = "PARKBOOK";

/// Top-level JSON configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub facilities: BTreeMap<String, Facility>,
    pub urls: Urls,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    pub signature: Option<String>,
    pub buffer_minutes: i64,
    pub headless: bool,
    /// Per-wait timeout in seconds for element and navigation waits.
    pub timeout: u64,
    pub book_in_advance_days: Option<i64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            signature: None,
            buffer_minutes: 15,
            headless: true,
            timeout: 30,
            book_in_advance_days: None,
        }
    }
}

/// A bookable facility as the site knows it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    /// Opaque identifier the site assigns to the space.
    pub space_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Urls {
    pub base_url: String,
    pub login_url: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, BookingError> {
        let raw = std::fs::read_to_string(path).map_err(|e| BookingError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&raw).map_err(|e| BookingError::Config {
            message: format!("{} is not valid: {}", path.display(), e),
        })
    }

    /// Non-fatal problems a booking run would trip over, for `validate`.
    pub fn sanity_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.facilities.is_empty() {
            problems.push("no facilities configured".to_string());
        }
        if self.credentials.email.is_none() {
            problems.push("credentials.email is not set (PARKBOOK_EMAIL also works)".to_string());
        }
        if self.credentials.password.is_none() {
            problems.push(
                "credentials.password is not set (will prompt, or set PARKBOOK_PASSWORD)"
                    .to_string(),
            );
        }
        if self.defaults.signature.is_none() {
            problems
                .push("defaults.signature is not set (bookings will need --signature)".to_string());
        }
        for (key, value) in [
            ("urls.baseUrl", &self.urls.base_url),
            ("urls.loginUrl", &self.urls.login_url),
        ] {
            if url::Url::parse(value).is_err() {
                problems.push(format!("{} is not a valid URL: {}", key, value));
            }
        }

        problems
    }

    pub fn facility(&self, key: &str) -> Result<&Facility, BookingError> {
        self.facilities.get(key).ok_or_else(|| {
            let known: Vec<&str> = self.facilities.keys().map(String::as_str).collect();
            BookingError::Config {
                message: format!(
                    "unknown facility '{}' (configured: {})",
                    key,
                    known.join(", ")
                ),
            }
        })
    }
}

/// Environment accessor injected into credential resolution, so the lookup
/// stays side-effect-free and can run against a plain map in tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Normalizes a profile email into an environment-variable key segment:
/// every non-alphanumeric byte becomes `_`, the rest is upper-cased.
pub fn env_key(profile: &str) -> String {
    profile
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Credentials for one named profile, looked up from the environment.
#[derive(Debug, Clone)]
pub struct ProfileCredentials {
    pub email: String,
    pub password: Option<String>,
    pub signature: Option<String>,
}

/// Looks up a profile's credential set. Returns `None` when no variable for
/// the profile is set at all, so callers can distinguish "profile unknown"
/// from "profile known but incomplete".
pub fn lookup_profile(profile: &str, env: EnvLookup) -> Option<ProfileCredentials> {
    let key = env_key(profile);
    let email = env(&format!("{}_EMAIL_{}", ENV_PREFIX, key));
    let password = env(&format!("{}_PASSWORD_{}", ENV_PREFIX, key));
    let signature = env(&format!("{}_SIGNATURE_{}", ENV_PREFIX, key));

    if email.is_none() && password.is_none() && signature.is_none() {
        return None;
    }

    Some(ProfileCredentials {
        // The profile identifier is itself an email address; a dedicated
        // override variable wins if one is set.
        email: email.unwrap_or_else(|| profile.to_string()),
        password,
        signature,
    })
}

/// The credential set a booking run will actually use.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub email: String,
    /// Absent when no source provided one; the CLI prompts in that case.
    pub password: Option<String>,
    /// Profile-level signature override, if any.
    pub signature: Option<String>,
}

/// Resolves credentials from the profile environment, the default
/// environment overrides, and finally the config file, in that order.
pub fn resolve_credentials(
    config: &Config,
    profile: Option<&str>,
    env: EnvLookup,
) -> Result<ResolvedCredentials, BookingError> {
    if let Some(profile) = profile {
        return match lookup_profile(profile, env) {
            Some(found) => Ok(ResolvedCredentials {
                email: found.email,
                password: found.password,
                signature: found.signature,
            }),
            None => Err(BookingError::Config {
                message: format!(
                    "no environment credentials found for profile '{}' \
                     (expected {}_EMAIL_{} / {}_PASSWORD_{})",
                    profile,
                    ENV_PREFIX,
                    env_key(profile),
                    ENV_PREFIX,
                    env_key(profile)
                ),
            }),
        };
    }

    let email = env(&format!("{}_EMAIL", ENV_PREFIX))
        .or_else(|| config.credentials.email.clone())
        .ok_or_else(|| BookingError::Config {
            message: "no login email configured (set credentials.email or PARKBOOK_EMAIL)"
                .to_string(),
        })?;
    let password =
        env(&format!("{}_PASSWORD", ENV_PREFIX)).or_else(|| config.credentials.password.clone());
    let signature = env(&format!("{}_SIGNATURE", ENV_PREFIX));

    Ok(ResolvedCredentials {
        email,
        password,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"{
        "credentials": { "email": "resident@example.com", "password": "hunter2" },
        "defaults": {
            "signature": "J. Resident",
            "bufferMinutes": 15,
            "headless": true,
            "timeout": 30,
            "bookInAdvanceDays": 10
        },
        "facilities": {
            "tennis_lower": { "spaceId": "1244466", "name": "Lower Tennis Court" },
            "pool": { "spaceId": "1244470", "name": "Swimming Pool" }
        },
        "urls": {
            "baseUrl": "https://parkhurst.skedda.com/booking",
            "loginUrl": "https://parkhurst.skedda.com/login"
        }
    }"#;

    fn sample() -> Config {
        serde_json::from_str(SAMPLE).unwrap()
    }

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_full_config() {
        let config = sample();
        assert_eq!(config.facilities.len(), 2);
        assert_eq!(config.facility("tennis_lower").unwrap().space_id, "1244466");
        assert_eq!(config.defaults.book_in_advance_days, Some(10));
        assert_eq!(config.urls.base_url, "https://parkhurst.skedda.com/booking");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "urls": { "baseUrl": "https://x.skedda.com/booking",
                           "loginUrl": "https://x.skedda.com/login" } }"#,
        )
        .unwrap();
        assert_eq!(config.defaults.buffer_minutes, 15);
        assert!(config.defaults.headless);
        assert_eq!(config.defaults.timeout, 30);
        assert!(config.defaults.book_in_advance_days.is_none());
        assert!(config.facilities.is_empty());
    }

    #[test]
    fn unknown_facility_names_known_keys() {
        let err = sample().facility("sauna").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sauna"));
        assert!(message.contains("tennis_lower"));
    }

    #[test]
    fn sanity_problems_flag_gaps_without_failing() {
        let config: Config = serde_json::from_str(
            r#"{ "urls": { "baseUrl": "https://x.skedda.com/booking",
                           "loginUrl": "not a url" } }"#,
        )
        .unwrap();
        let problems = config.sanity_problems();
        assert!(problems.iter().any(|p| p.contains("no facilities")));
        assert!(problems.iter().any(|p| p.contains("urls.loginUrl")));
        assert!(sample().sanity_problems().is_empty());
    }

    #[test]
    fn env_key_normalizes_emails() {
        assert_eq!(env_key("jane.doe@example.com"), "JANE_DOE_EXAMPLE_COM");
        assert_eq!(env_key("bob+tennis@x.co"), "BOB_TENNIS_X_CO");
    }

    #[test]
    fn profile_lookup_reads_normalized_variables() {
        let env = env_of(&[
            ("PARKBOOK_PASSWORD_JANE_DOE_EXAMPLE_COM", "secret"),
            ("PARKBOOK_SIGNATURE_JANE_DOE_EXAMPLE_COM", "Jane D."),
        ]);
        let creds = resolve_credentials(&sample(), Some("jane.doe@example.com"), &|k| {
            env.get(k).cloned()
        })
        .unwrap();
        assert_eq!(creds.email, "jane.doe@example.com");
        assert_eq!(creds.password.as_deref(), Some("secret"));
        assert_eq!(creds.signature.as_deref(), Some("Jane D."));
    }

    #[test]
    fn unknown_profile_is_a_config_error() {
        let env: HashMap<String, String> = HashMap::new();
        let err =
            resolve_credentials(&sample(), Some("nobody@example.com"), &|k| env.get(k).cloned())
                .unwrap_err();
        assert!(matches!(err, BookingError::Config { .. }));
    }

    #[test]
    fn default_env_overrides_beat_the_config_file() {
        let env = env_of(&[("PARKBOOK_EMAIL", "override@example.com")]);
        let creds =
            resolve_credentials(&sample(), None, &|k| env.get(k).cloned()).unwrap();
        assert_eq!(creds.email, "override@example.com");
        // Password still comes from the file when no override is set.
        assert_eq!(creds.password.as_deref(), Some("hunter2"));
    }
}
