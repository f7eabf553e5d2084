/// Static watch-list, look-back periods, credentials & mail relay settings.
pub mod config;

/// Remote endpoints; currently just the Yahoo! Finance chart API.
pub mod endp;

pub mod error;
pub mod fs;
pub mod notify;
pub mod reference;
pub mod render;
pub mod report;
pub mod www;

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::config::{Category, Credentials, Period, Relay, Watchlist};
    pub use crate::endp::yahoo_finance::{Quote, QuoteSource, YahooFinance};
    pub use crate::notify::{subject, Notifier};
    pub use crate::reference::{JsonFileStore, ReferenceStore, References};
    pub use crate::render::render;
    pub use crate::report::{Built, Change, Report, ReportBuilder, ReportRow, Section, Tone};
    pub use crate::{Error, Result};

    pub fn build_client(user_agent: &str) -> Result<reqwest::Client> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .build()?;
        Ok(client)
    }
}
