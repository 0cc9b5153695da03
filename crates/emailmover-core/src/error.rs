use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Message parse error: {0}")]
    Mail(#[from] mailparse::MailParseError),

    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Attempted to add to questionable files but already matched: {file_name} (subject '{subject}')")]
    AlreadyMatched { subject: String, file_name: String },
}
