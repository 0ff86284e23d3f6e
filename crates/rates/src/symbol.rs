//! Ticker normalization and classification.
//!
//! Tickers arrive from chat text in whatever shape the user typed them.
//! Normalization is intentionally permissive: anything the alias table does
//! not recognize passes through unchanged, and validity is left to the
//! providers. An unknown ticker costs one round of `PairUnsupported`
//! responses, nothing more.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

lazy_static! {
    /// Informal ticker spellings mapped to their canonical form.
    static ref ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("xbt", "btc");
        m.insert("bcc", "bch");
        m.insert("xdg", "doge");
        m
    };

    /// Tickers pegged near 1.0 of a reference fiat currency.
    ///
    /// Membership only affects display precision, never resolution. The
    /// fiat list mirrors the currencies the aggregator providers quote;
    /// the tail entries are the major USD stablecoins.
    static ref STABLE_CLASS: HashSet<&'static str> = {
        [
            "usd", "eur", "gbp", "jpy", "cny", "aud", "cad", "chf", "inr",
            "brl", "mxn", "sek", "nok", "dkk", "pln", "zar", "hkd", "sgd",
            "thb", "twd", "idr", "php", "try", "ils", "nzd", "rub", "aed",
            "sar", "ngn", "ars", "clp", "czk", "ron",
            "usdt", "usdc", "dai", "busd", "tusd", "fdusd", "usdp",
        ]
        .into_iter()
        .collect()
    };
}

/// Canonicalize a raw ticker string.
///
/// Lowercases, strips every non-alphanumeric character, then applies the
/// alias table. Never fails: unrecognized input passes through unchanged so
/// the providers get to decide whether it exists.
pub fn normalize_ticker(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match ALIASES.get(cleaned.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => cleaned,
    }
}

/// Whether a normalized ticker belongs to the stable/fiat display class.
pub fn is_stable_class(ticker: &str) -> bool {
    STABLE_CLASS.contains(ticker)
}
