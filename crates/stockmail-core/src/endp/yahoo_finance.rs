use crate::config::Watchlist;
use crate::{www, Error, Result};
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::future::Future;

/// Anything that can produce today's [`Quote`] for a ticker.
///
/// An `Err` is always treated as "unavailable" by the report builder: the
/// symbol is skipped for this run.
pub trait QuoteSource {
    fn quote(&self, symbol: &str) -> impl Future<Output = Result<Quote>> + Send;
}

/// Latest price & changes for a single ticker. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    /// Date of the latest close, when the provider supplied timestamps.
    pub dated: Option<String>,
    pub price: f64,
    /// % change between the two most recent closes; 0 with a single close.
    pub daily_change: f64,
    /// Chronological closes, oldest first; the last one is `price`.
    pub closes: Vec<f64>,
}

impl Quote {
    /// `None` for an empty series.
    pub fn from_closes(symbol: &str, dated: Option<String>, closes: Vec<f64>) -> Option<Self> {
        let price = *closes.last()?;
        let daily_change = pct_change(&closes, 1).unwrap_or(0.0);
        Some(Self {
            symbol: symbol.to_string(),
            dated,
            price,
            daily_change,
            closes,
        })
    }

    /// % change of the latest close vs. the close `trading_days` sessions earlier.
    pub fn change_over(&self, trading_days: usize) -> Option<f64> {
        pct_change(&self.closes, trading_days)
    }
}

fn pct_change(closes: &[f64], trading_days: usize) -> Option<f64> {
    if trading_days == 0 || closes.len() <= trading_days {
        return None;
    }
    let current = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - trading_days];
    if past == 0.0 {
        return None;
    }
    Some((current - past) / past * 100.0)
}

/// [`QuoteSource`] backed by the public chart endpoint.
pub struct YahooFinance {
    client: Client,
    range: &'static str,
}

impl YahooFinance {
    /// The look-back range is sized to the longest period in `watchlist`.
    pub fn new(client: Client, watchlist: &Watchlist) -> Self {
        Self {
            client,
            range: www::range_for(watchlist.closes_needed()),
        }
    }

    pub fn range(&self) -> &'static str {
        self.range
    }
}

impl QuoteSource for YahooFinance {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        let url = www::chart_url(symbol, self.range);
        let history = fetch(&self.client, url)
            .await
            .map_err(|e| unavailable(symbol, e.to_string()))?;
        quote_from_history(symbol, history, self.range)
    }
}

/// Turn a decoded chart into a [`Quote`]; an empty series is unavailable.
pub fn quote_from_history(symbol: &str, history: PriceHistory, range: &str) -> Result<Quote> {
    let cells = history.into_cells(symbol);
    let dated = cells.last().map(|cell| cell.dated.clone());
    let closes = cells.into_iter().map(|cell| cell.close).collect();
    Quote::from_closes(symbol, dated, closes)
        .ok_or_else(|| unavailable(symbol, format!("no closes within {range}")))
}

fn unavailable(symbol: &str, reason: String) -> Error {
    Error::DataUnavailable {
        symbol: symbol.to_string(),
        reason,
    }
}

/// GET & decode the chart at `price_url`.
pub async fn fetch(client: &Client, price_url: String) -> Result<PriceHistory> {
    let price_response: PriceHistory = client.get(price_url).send().await?.json().await?;
    Ok(price_response)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceCell {
    pub dated: String,
    pub close: f64,
}

// `price` schema
#[derive(Deserialize, Serialize, Debug)]
pub struct PriceHistory {
    pub chart: PriceResponse,
}

impl PriceHistory {
    /// Flatten into dated closes. Sessions with a null close (halts, the
    /// still-open candle on some feeds) are dropped.
    pub fn into_cells(self, ticker: &str) -> Vec<PriceCell> {
        let Some(data) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            match self.chart.error {
                Some(e) => log::warn!("[{ticker}] {}: {}", e.code, e.description),
                None => log::warn!("[{ticker}] failed to extract Price data"),
            }
            return vec![];
        };

        let Some(quote) = data.indicators.quote.into_iter().next() else {
            return vec![];
        };

        data.dates
            .into_iter()
            .zip(quote.close)
            .filter_map(|(dated, close)| close.map(|close| PriceCell { dated, close }))
            .collect()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PriceResponse {
    pub result: Option<Vec<PriceCategories>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PriceCategories {
    #[serde(
        rename = "timestamp",
        default,
        deserialize_with = "de_timestamps_to_naive_date"
    )]
    pub dates: Vec<String>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Indicators {
    pub quote: Vec<Candles>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Candles {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Transform a `unix timestamp`    -> `naive date`, e.g.,
///             `1705795200`        -> `2024-01-21`
pub fn de_timestamps_to_naive_date<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamps: Vec<i64> = Deserialize::deserialize(deserializer)?;
    timestamps
        .into_iter()
        .map(|timestamp| {
            DateTime::from_timestamp(timestamp, 0)
                .map(|dt| dt.date_naive().to_string())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {timestamp}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<PriceCell> {
        serde_json::from_str::<PriceHistory>(json)
            .unwrap()
            .into_cells("TEST")
    }

    #[test]
    fn flattens_chart_and_skips_null_closes() {
        let cells = parse(
            r#"{"chart":{"result":[{
                "meta":{"symbol":"TEST"},
                "timestamp":[1705795200,1705881600,1705968000],
                "indicators":{"quote":[{"close":[100.0,null,110.0],"open":[1,2,3]}],
                              "adjclose":[{"adjclose":[100.0,null,110.0]}]}
            }],"error":null}}"#,
        );
        assert_eq!(
            cells,
            vec![
                PriceCell { dated: "2024-01-21".to_string(), close: 100.0 },
                PriceCell { dated: "2024-01-23".to_string(), close: 110.0 },
            ]
        );
    }

    #[test]
    fn unknown_symbol_yields_no_cells() {
        let cells = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        assert!(cells.is_empty());
    }

    #[test]
    fn result_without_timestamps_yields_no_cells() {
        let cells = parse(r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#);
        assert!(cells.is_empty());
    }

    fn history(json: &str) -> PriceHistory {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn quote_from_full_history() {
        let quote = quote_from_history(
            "TEST",
            history(
                r#"{"chart":{"result":[{
                    "timestamp":[1705795200,1705881600],
                    "indicators":{"quote":[{"close":[100.0,101.0]}]}
                }],"error":null}}"#,
            ),
            "5d",
        )
        .unwrap();
        assert_eq!(quote.price, 101.0);
        assert_eq!(quote.dated.as_deref(), Some("2024-01-22"));
        assert!((quote.daily_change - 1.0).abs() < 1e-9);
    }

    #[test]
    fn all_null_closes_are_unavailable() {
        let err = quote_from_history(
            "TEST",
            history(
                r#"{"chart":{"result":[{
                    "timestamp":[1705795200,1705881600],
                    "indicators":{"quote":[{"close":[null,null]}]}
                }],"error":null}}"#,
            ),
            "5d",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { ref symbol, .. } if symbol == "TEST"));
    }

    #[test]
    fn chart_error_is_unavailable() {
        let err = quote_from_history(
            "BAD",
            history(
                r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
            ),
            "5d",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
        assert!(err.to_string().contains("within 5d"));
    }

    #[test]
    fn daily_change_uses_two_latest_closes() {
        let quote = Quote::from_closes("AAA", None, vec![90.0, 100.0, 101.0]).unwrap();
        assert_eq!(quote.price, 101.0);
        assert!((quote.daily_change - 1.0).abs() < 1e-9);

        let falling = Quote::from_closes("AAA", None, vec![100.0, 95.0]).unwrap();
        assert!((falling.daily_change + 5.0).abs() < 1e-9);
    }

    #[test]
    fn single_close_has_zero_daily_change() {
        let quote = Quote::from_closes("AAA", None, vec![42.0]).unwrap();
        assert_eq!(quote.daily_change, 0.0);
        assert_eq!(quote.change_over(5), None);
    }

    #[test]
    fn empty_series_is_no_quote() {
        assert!(Quote::from_closes("AAA", None, vec![]).is_none());
    }

    #[test]
    fn change_over_needs_enough_history() {
        let closes: Vec<f64> = (1..=6).map(|c| c as f64 * 10.0).collect();
        let quote = Quote::from_closes("AAA", None, closes).unwrap();
        assert!((quote.change_over(5).unwrap() - 500.0).abs() < 1e-9);
        assert_eq!(quote.change_over(6), None);
    }
}
