//! Coinvert Rates Crate
//!
//! Multi-provider price resolution for the Coinvert bot.
//!
//! # Overview
//!
//! Given a base and a quote ticker, this crate produces an exchange rate by
//! trying several independent price sources in a fixed priority order:
//!
//! - Direct-pair lookup, then USDT-pivot triangulation (or inverse lookup
//!   for rates-by-base providers), per provider
//! - Per-provider cooldowns suppressing transiently failing sources
//! - A short-TTL cache over resolved pair rates
//! - Ticker normalization with alias resolution, and display formatting
//!   keyed by the quote's stable/volatile class
//!
//! # Architecture
//!
//! ```text
//! (base, quote) --> Normalizer --> RateResolver --> PriceQuote
//!                                    |   |   |
//!                            RateCache   |   CooldownTracker
//!                                        v
//!                           PriceProvider (Binance, KuCoin,
//!                                CryptoCompare, Coinbase)
//! ```
//!
//! The resolver owns all of its state; two resolver instances share
//! nothing, which keeps tests isolated and deployments free of hidden
//! globals.

pub mod cache;
pub mod cooldown;
pub mod errors;
pub mod format;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod symbol;

// Re-export the crate's working surface
pub use cache::RateCache;
pub use cooldown::CooldownTracker;
pub use errors::{ProviderError, ResolveError};
pub use format::format_amount;
pub use models::{pair_key, PriceQuote};
pub use resolver::{RateResolver, ResolverConfig};
pub use symbol::{is_stable_class, normalize_ticker};

// Re-export provider types
pub use provider::binance::BinanceProvider;
pub use provider::coinbase::CoinbaseProvider;
pub use provider::cryptocompare::CryptoCompareProvider;
pub use provider::kucoin::KucoinProvider;
pub use provider::{PairFallback, PriceProvider};
