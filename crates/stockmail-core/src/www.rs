const INTERVAL: &str = "1d";

/// Yahoo! Finance chart endpoint for `ticker`, daily candles over `range`.
pub fn chart_url(ticker: &str, range: &str) -> String {
    format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{ticker}?symbol={ticker}&interval={}&range={}",
        INTERVAL, range
    )
}

/// Smallest provider range that holds `closes` trading-day closes.
///
/// `5d` is also the holiday fallback: if today has no candle, the latest
/// entry in the window is used.
pub fn range_for(closes: usize) -> &'static str {
    match closes {
        0..=5 => "5d",
        6..=18 => "1mo",
        19..=55 => "3mo",
        56..=110 => "6mo",
        _ => "1y",
    }
}
