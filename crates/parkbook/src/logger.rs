use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};
use std::io::Write;

fn color_level(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERROR".red(),
        Level::Warn => "WARN".yellow(),
        Level::Info => "INFO".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".purple(),
    }
}

pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter(None, level)
        .format(|buf, record| {
            writeln!(buf, "[{}] - {}", color_level(record.level()), record.args())
        })
        .init();
}
