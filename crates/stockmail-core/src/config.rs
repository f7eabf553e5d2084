use crate::{Error, Result};

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const SUBMISSION_PORT: u16 = 587;

/// A named group of tickers; purely for report organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub symbols: Vec<String>,
}

impl Category {
    pub fn new(name: &str, symbols: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// An extra look-back column, e.g. `1w` = today's close vs. the close 5 trading days ago.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub label: &'static str,
    pub trading_days: usize,
    pub description: &'static str,
}

/// The watch-list handed to the report builder.
///
/// ```rust
/// use stockmail_core::config::{Category, Watchlist};
///
/// let fixture = Watchlist::new(vec![Category::new("Tech", &["AAA"])]);
/// assert_eq!(fixture.symbol_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    pub categories: Vec<Category>,
    pub periods: Vec<Period>,
}

impl Watchlist {
    /// A watch-list that reports the daily change only.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            periods: vec![],
        }
    }

    pub fn with_periods(mut self, periods: Vec<Period>) -> Self {
        self.periods = periods;
        self
    }

    pub fn symbol_count(&self) -> usize {
        self.categories.iter().map(|c| c.symbols.len()).sum()
    }

    /// Number of trading-day closes needed to fill every column.
    pub fn closes_needed(&self) -> usize {
        self.periods
            .iter()
            .map(|p| p.trading_days)
            .max()
            .unwrap_or(1)
            .max(1)
            + 1
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new(vec![
            Category::new(
                "Semiconductor",
                &["NVDA", "TSM", "ASML", "AMD", "INTC", "AVGO", "QCOM", "TXN", "MU", "ADI"],
            ),
            Category::new(
                "AI",
                &["MSFT", "GOOG", "AMZN", "META", "ORCL", "IBM", "CRM", "NOW", "PATH", "AI"],
            ),
            Category::new(
                "Defense",
                &["LMT", "RTX", "BA", "GD", "NOC", "HII", "LHX", "KBR", "LDOS", "BWXT"],
            ),
        ])
        .with_periods(DEFAULT_PERIODS.to_vec())
    }
}

pub const DEFAULT_PERIODS: [Period; 4] = [
    Period {
        label: "1w",
        trading_days: 5,
        description: "5 trading days ago",
    },
    Period {
        label: "15d",
        trading_days: 15,
        description: "15 trading days ago",
    },
    Period {
        label: "30d",
        trading_days: 30,
        description: "30 trading days ago",
    },
    Period {
        label: "2m",
        trading_days: 60,
        description: "60 trading days ago (approx 2 months)",
    },
];

/// Sender & recipient, sourced from the process environment (or `.env`).
#[derive(Clone)]
pub struct Credentials {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            sender: var("SENDER_EMAIL")?,
            password: var("SENDER_PASSWORD")?,
            recipient: var("RECIPIENT_EMAIL")?,
        })
    }
}

// keep the secret out of log lines
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("sender", &self.sender)
            .field("password", &"********")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// SMTP relay. Port 587 is upgraded with STARTTLS; any other port is
/// expected to speak implicit TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relay {
    pub host: String,
    pub port: u16,
}

impl Default for Relay {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
        }
    }
}

impl Relay {
    pub fn uses_starttls(&self) -> bool {
        self.port == SUBMISSION_PORT
    }

    /// Defaults to Gmail on 465; `SMTP_HOST` & `SMTP_PORT` override.
    pub fn from_env() -> Result<Self> {
        let mut relay = Self::default();
        if let Ok(host) = std::env::var("SMTP_HOST") {
            relay.host = host;
        }
        if let Ok(port) = std::env::var("SMTP_PORT") {
            relay.port = port.parse().map_err(|_| Error::InvalidVar {
                name: "SMTP_PORT",
                value: port,
            })?;
        }
        Ok(relay)
    }
}

fn var(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingVar(name)),
    }
}
