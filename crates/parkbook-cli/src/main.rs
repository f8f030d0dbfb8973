//! # parkbook
//!
//! Books a facility slot on the Parkhurst Skedda site: builds the deep
//! link, drives a Chrome session through login and form submission, and
//! reports whether the site accepted the booking.

mod args;

use args::{Args, BookArgs, Command};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use dialoguer::Password;
use log::error;
use parkbook::{
    book, init_logger, resolve_credentials, BookingInput, BookingPlan, BookingRequest, Config,
    FailureLog, SessionOptions,
};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.level.into());

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Book(book_args) => run_book(&config, book_args),
        Command::List => run_list(&config),
        Command::Validate => run_validate(&config),
        Command::Examples => run_examples(),
    }
}

fn run_book(config: &Config, args: BookArgs) -> ExitCode {
    let creds = match resolve_credentials(config, args.profile.as_deref(), &|key| {
        std::env::var(key).ok()
    }) {
        Ok(creds) => creds,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Signature precedence: explicit flag, then the profile's own signature,
    // then the config default (applied inside resolve).
    let input = BookingInput {
        facility: args.facility,
        start: args.start,
        end: args.end,
        date: args.date,
        advance_days: args.book_in_advance_days,
        signature: args.signature.or_else(|| creds.signature.clone()),
        title: args.title,
        force_date: args.force_date,
    };

    let request = match BookingRequest::resolve(input, config, Local::now().date_naive()) {
        Ok(request) => request,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let password = match creds.password.clone() {
        Some(password) => password,
        None => match Password::new()
            .with_prompt(format!("Password for {}", creds.email))
            .interact()
        {
            Ok(password) => password,
            Err(e) => {
                error!("Could not read password: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let deep_link = match request.deep_link(&config.urls.base_url) {
        Ok(url) => url,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let plan = BookingPlan {
        deep_link,
        base_url: config.urls.base_url.clone(),
        title: request.title.clone(),
        signature: request.signature.clone(),
        email: creds.email.clone(),
        password,
    };

    let options = SessionOptions {
        headless: if args.disable_headless {
            false
        } else {
            config.defaults.headless
        },
        timeout: Duration::from_secs(config.defaults.timeout),
    };

    println!(
        "Booking {} ({}) on {}: {}",
        request.facility_name.bold(),
        request.facility_key,
        request.date,
        request.title
    );

    match book(&options, &plan, &FailureLog::in_working_dir()) {
        Ok(()) => {
            println!(
                "{} {} booked for {} on {}",
                "✓".green().bold(),
                request.facility_name,
                request.signature,
                request.date
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            println!("{} {}", "✗".red().bold(), e.user_message());
            if e.is_site_rejection() {
                println!("  Try a different time slot or facility.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run_list(config: &Config) -> ExitCode {
    if config.facilities.is_empty() {
        println!("No facilities configured.");
        return ExitCode::FAILURE;
    }

    println!("{}", "Configured facilities:".bold());
    for (key, facility) in &config.facilities {
        println!(
            "  {:<16} {} (space {})",
            key.cyan(),
            facility.name,
            facility.space_id
        );
    }
    ExitCode::SUCCESS
}

fn run_validate(config: &Config) -> ExitCode {
    let problems = config.sanity_problems();

    if problems.is_empty() {
        println!("{} configuration looks good", "✓".green().bold());
        ExitCode::SUCCESS
    } else {
        for problem in &problems {
            println!("{} {}", "!".yellow().bold(), problem);
        }
        // Warnings only; the file parsed, so the config is usable.
        ExitCode::SUCCESS
    }
}

fn run_examples() -> ExitCode {
    println!("{}", "Examples:".bold());
    println!();
    println!("  # Book the lower tennis court 15 days out (the default horizon)");
    println!("  parkbook book tennis_lower --start 12:00 --end 13:00");
    println!();
    println!("  # Book a specific date");
    println!("  parkbook book tennis_lower --start 18:00 --end 19:00 --date 2025-06-15");
    println!();
    println!("  # Book at the config's advance horizon, or 10 days out explicitly");
    println!("  parkbook book pool --start 09:00 --end 10:00 --book-in-advance-days");
    println!("  parkbook book pool --start 09:00 --end 10:00 --book-in-advance-days 10");
    println!();
    println!("  # Book with another member's credentials from the environment");
    println!("  parkbook book tennis_upper --start 07:00 --end 08:00 --profile jane@example.com");
    println!();
    println!("  # Watch the browser do its thing");
    println!("  parkbook book tennis_lower --start 12:00 --end 13:00 --disable-headless");
    println!();
    println!("  # Inspect the configuration");
    println!("  parkbook list");
    println!("  parkbook validate");
    ExitCode::SUCCESS
}
