//! End-to-end tests against the real site. Ignored by default; run with
//! `cargo test -- --ignored` and a filled-in config.json in the crate root.

use chrono::Local;
use parkbook::{
    book, resolve_credentials, BookingInput, BookingPlan, BookingRequest, Config, FailureLog,
    SessionOptions,
};
use std::path::Path;
use std::time::Duration;

#[test]
#[ignore]
fn book_a_real_slot() {
    parkbook::init_logger(log::LevelFilter::Debug);

    let config = Config::load(Path::new("config.json")).expect("config.json must exist");
    let creds = resolve_credentials(&config, None, &|k| std::env::var(k).ok())
        .expect("credentials must resolve");

    let input = BookingInput {
        facility: "tennis_lower".to_string(),
        start: "12:00".to_string(),
        end: "13:00".to_string(),
        ..Default::default()
    };
    let request = BookingRequest::resolve(input, &config, Local::now().date_naive())
        .expect("request must validate");

    let plan = BookingPlan {
        deep_link: request.deep_link(&config.urls.base_url).unwrap(),
        base_url: config.urls.base_url.clone(),
        title: request.title.clone(),
        signature: request.signature.clone(),
        email: creds.email.clone(),
        password: creds.password.expect("password must be configured"),
    };

    let options = SessionOptions {
        headless: true,
        timeout: Duration::from_secs(config.defaults.timeout),
    };

    book(&options, &plan, &FailureLog::in_working_dir()).expect("booking should succeed");
}
