//! Headless core of Datebook.
//!
//! Everything a front end needs to render and drive the calendar lives here:
//! date handling, the meeting [`Store`], the remote [`SyncClient`], the form
//! controller and the [`Calendar`] view model. The crate knows nothing about
//! widgets.

use thiserror::Error;

pub mod calendar;
pub mod config;
pub mod datetime;
pub mod form;
pub mod fs;
pub mod meeting;
pub mod remote;
pub mod store;

pub use calendar::{Calendar, LoadState};
pub use config::{CoreConfig, IdStrategy};
pub use meeting::{Meeting, MeetingId};
pub use remote::{HttpRemote, Remote, SyncClient, WriteOutcome};
pub use store::Store;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request to the calendar endpoint failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Calendar endpoint answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("A read of the calendar is already in flight")]
    ReadInFlight,
    #[error("Unknown time zone '{0}'")]
    TimeZone(String),
    #[error("Failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
