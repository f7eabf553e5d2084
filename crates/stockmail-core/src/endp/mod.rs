/// Daily closes from the Yahoo! Finance v8 chart API.
pub mod yahoo_finance;
