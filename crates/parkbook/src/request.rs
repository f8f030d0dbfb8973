use crate::config::Config;
use crate::error::BookingError;
use crate::schedule;
use chrono::NaiveDate;
use url::Url;

/// Raw booking inputs as they arrive from the CLI, before validation.
#[derive(Debug, Clone, Default)]
pub struct BookingInput {
    pub facility: String,
    pub start: String,
    pub end: String,
    pub date: Option<String>,
    /// `Some(None)` when the days-in-advance flag was passed without a value.
    pub advance_days: Option<Option<i64>>,
    pub signature: Option<String>,
    pub title: Option<String>,
    pub force_date: bool,
}

/// A fully validated booking request. Immutable once constructed; every
/// check happens here, before any browser action.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub facility_key: String,
    pub space_id: String,
    pub facility_name: String,
    pub date: NaiveDate,
    /// Slot boundaries in minutes since midnight, local wall clock.
    pub start: i64,
    pub end: i64,
    pub signature: String,
    pub title: String,
}

impl BookingRequest {
    /// Builds a request from CLI input plus config defaults. `today` is
    /// injected so date resolution is deterministic under test.
    pub fn resolve(
        input: BookingInput,
        config: &Config,
        today: NaiveDate,
    ) -> Result<Self, BookingError> {
        let facility = config.facility(&input.facility)?;

        let start = schedule::parse_time(&input.start)?;
        let end = schedule::parse_time(&input.end)?;
        schedule::validate_slot(start, end)?;

        let explicit = input.date.as_deref().map(schedule::parse_date).transpose()?;
        let date = schedule::resolve_date(
            explicit,
            input.advance_days,
            config.defaults.book_in_advance_days,
            today,
        )?;
        schedule::validate_not_past(date, today, input.force_date)?;

        let signature = input.signature.or_else(|| config.defaults.signature.clone()).ok_or_else(
            || BookingError::Validation {
                message: "no signature given (pass --signature or set defaults.signature)"
                    .to_string(),
            },
        )?;

        let title = input
            .title
            .unwrap_or_else(|| schedule::booking_title(start, end, config.defaults.buffer_minutes));

        Ok(Self {
            facility_key: input.facility,
            space_id: facility.space_id.clone(),
            facility_name: facility.name.clone(),
            date,
            start,
            end,
            signature,
            title,
        })
    }

    /// Deep link that pre-fills the site's booking form for this request.
    pub fn deep_link(&self, base_url: &str) -> Result<String, BookingError> {
        build_booking_url(base_url, &self.space_id, self.date, self.start, self.end)
    }
}

fn local_timestamp(date: NaiveDate, minutes_of_day: i64) -> String {
    format!(
        "{}T{:02}:{:02}:00",
        date.format("%Y-%m-%d"),
        minutes_of_day / 60,
        minutes_of_day % 60
    )
}

/// Builds the booking deep link. Start and end travel as ISO-8601 local
/// timestamps with no timezone conversion; the `url` crate owns the
/// percent-encoding.
pub fn build_booking_url(
    base_url: &str,
    space_id: &str,
    date: NaiveDate,
    start: i64,
    end: i64,
) -> Result<String, BookingError> {
    let mut url = Url::parse(base_url).map_err(|e| BookingError::Config {
        message: format!("urls.baseUrl '{}' is not a valid URL: {}", base_url, e),
    })?;
    url.query_pairs_mut()
        .append_pair("nbend", &local_timestamp(date, end))
        .append_pair("nbspaces", space_id)
        .append_pair("nbstart", &local_timestamp(date, start));
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://parkhurst.skedda.com/booking";

    fn sample_config() -> Config {
        serde_json::from_str(
            r#"{
                "credentials": { "email": "resident@example.com", "password": "pw" },
                "defaults": { "signature": "J. Resident", "bufferMinutes": 15 },
                "facilities": {
                    "tennis_lower": { "spaceId": "1244466", "name": "Lower Tennis Court" }
                },
                "urls": {
                    "baseUrl": "https://parkhurst.skedda.com/booking",
                    "loginUrl": "https://parkhurst.skedda.com/login"
                }
            }"#,
        )
        .unwrap()
    }

    fn noon_input() -> BookingInput {
        BookingInput {
            facility: "tennis_lower".to_string(),
            start: "12:00".to_string(),
            end: "13:00".to_string(),
            date: Some("2025-06-15".to_string()),
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn builds_the_expected_deep_link() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let url = build_booking_url(BASE, "1244466", date, 720, 780).unwrap();
        assert_eq!(
            url,
            "https://parkhurst.skedda.com/booking?nbend=2025-06-15T13%3A00%3A00\
             &nbspaces=1244466&nbstart=2025-06-15T12%3A00%3A00"
        );
    }

    #[test]
    fn deep_link_round_trips_through_decoding() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let url = build_booking_url(BASE, "1244466", date, 555, 645).unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("nbstart".to_string(), "2025-06-15T09:15:00".to_string())));
        assert!(pairs.contains(&("nbend".to_string(), "2025-06-15T10:45:00".to_string())));
        assert!(pairs.contains(&("nbspaces".to_string(), "1244466".to_string())));
    }

    #[test]
    fn resolves_a_complete_request() {
        let request = BookingRequest::resolve(noon_input(), &sample_config(), today()).unwrap();
        assert_eq!(request.space_id, "1244466");
        assert_eq!(request.title, "11:45AM - 1:15PM");
        assert_eq!(request.signature, "J. Resident");
        assert_eq!(
            request.deep_link(BASE).unwrap(),
            "https://parkhurst.skedda.com/booking?nbend=2025-06-15T13%3A00%3A00\
             &nbspaces=1244466&nbstart=2025-06-15T12%3A00%3A00"
        );
    }

    #[test]
    fn explicit_title_overrides_the_derived_one() {
        let input = BookingInput {
            title: Some("Club practice".to_string()),
            ..noon_input()
        };
        let request = BookingRequest::resolve(input, &sample_config(), today()).unwrap();
        assert_eq!(request.title, "Club practice");
    }

    #[test]
    fn past_dates_are_rejected_before_any_browser_work() {
        let input = BookingInput {
            date: Some("2025-05-20".to_string()),
            ..noon_input()
        };
        let err = BookingRequest::resolve(input, &sample_config(), today()).unwrap_err();
        assert!(matches!(err, BookingError::Validation { .. }));
    }

    #[test]
    fn forced_past_dates_pass() {
        let input = BookingInput {
            date: Some("2025-05-20".to_string()),
            force_date: true,
            ..noon_input()
        };
        assert!(BookingRequest::resolve(input, &sample_config(), today()).is_ok());
    }

    #[test]
    fn inverted_slots_are_rejected() {
        let input = BookingInput {
            start: "14:00".to_string(),
            end: "13:00".to_string(),
            ..noon_input()
        };
        assert!(BookingRequest::resolve(input, &sample_config(), today()).is_err());
    }

    #[test]
    fn missing_signature_is_an_error() {
        let mut config = sample_config();
        config.defaults.signature = None;
        let err = BookingRequest::resolve(noon_input(), &config, today()).unwrap_err();
        assert!(err.to_string().contains("signature"));
    }
}
