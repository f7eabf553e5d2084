use crate::config::Watchlist;
use crate::endp::yahoo_finance::QuoteSource;
use crate::reference::References;
use std::fmt;

/// Colour class for a change cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Negative => "negative",
        }
    }
}

/// A percent change, kept numeric so the sign never has to be read back out
/// of the formatted text.
///
/// ```rust
/// use stockmail_core::report::{Change, Tone};
///
/// assert_eq!(Change::new(0.0).to_string(), "+0.00%");
/// assert_eq!(Change::new(-1.234).to_string(), "-1.23%");
/// assert_eq!(Change::new(0.0).tone(), Tone::Positive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change(f64);

impl Change {
    pub fn new(pct: f64) -> Self {
        // -0.0 would print as "-0.00%"
        Self(if pct == 0.0 { 0.0 } else { pct })
    }

    /// `(current - base) / base * 100`; `None` unless both prices are finite
    /// and `base` is positive.
    pub fn between(current: f64, base: f64) -> Option<Self> {
        if !(current.is_finite() && base.is_finite() && base > 0.0) {
            return None;
        }
        Some(Self::new((current - base) / base * 100.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn tone(self) -> Tone {
        if self.0 < 0.0 {
            Tone::Negative
        } else {
            Tone::Positive
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2}%", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub symbol: String,
    pub price: f64,
    /// `None` when the stored reference can't be divided by.
    pub vs_reference: Option<Change>,
    pub daily: Change,
    /// One entry per [`Watchlist::periods`]; `None` when history is too short.
    pub periods: Vec<Option<Change>>,
}

impl ReportRow {
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub category: String,
    pub rows: Vec<ReportRow>,
}

/// Category tables in configured order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, category: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// Output of [`ReportBuilder::build`].
#[derive(Debug, Clone)]
pub struct Built {
    pub report: Report,
    pub references: References,
    /// At least one symbol got its first reference price this run.
    pub changed: bool,
}

pub struct ReportBuilder<'a, Q> {
    watchlist: &'a Watchlist,
    source: &'a Q,
}

impl<'a, Q: QuoteSource> ReportBuilder<'a, Q> {
    pub fn new(watchlist: &'a Watchlist, source: &'a Q) -> Self {
        Self { watchlist, source }
    }

    /// Quote every symbol, one at a time, and tabulate against `references`.
    ///
    /// Symbols the source can't price are logged and left out; they neither
    /// get a row nor a reference.
    pub async fn build(&self, mut references: References) -> Built {
        let mut changed = false;
        let mut sections = Vec::with_capacity(self.watchlist.categories.len());

        for category in &self.watchlist.categories {
            let mut rows = Vec::with_capacity(category.symbols.len());

            for symbol in &category.symbols {
                let quote = match self.source.quote(symbol).await {
                    Ok(quote) => quote,
                    Err(e) => {
                        log::warn!("Skipping {symbol}: {e}");
                        continue;
                    }
                };
                if !(quote.price.is_finite() && quote.price > 0.0) {
                    log::warn!("Skipping {symbol}: unusable price {}", quote.price);
                    continue;
                }
                log::debug!(
                    "[{symbol}] {:.2} as of {}",
                    quote.price,
                    quote.dated.as_deref().unwrap_or("latest session")
                );

                let (reference, inserted) = references.get_or_insert(symbol, quote.price);
                if inserted {
                    log::info!("[{symbol}] new reference price {:.2}", quote.price);
                    changed = true;
                }
                let vs_reference = Change::between(quote.price, reference);
                if vs_reference.is_none() {
                    log::warn!("[{symbol}] stored reference {reference} is unusable");
                }

                rows.push(ReportRow {
                    symbol: symbol.clone(),
                    price: quote.price,
                    vs_reference,
                    daily: Change::new(quote.daily_change),
                    periods: self
                        .watchlist
                        .periods
                        .iter()
                        .map(|p| quote.change_over(p.trading_days).map(Change::new))
                        .collect(),
                });
            }

            sections.push(Section {
                category: category.name.clone(),
                rows,
            });
        }

        Built {
            report: Report { sections },
            references,
            changed,
        }
    }
}
