//! Price provider abstractions and implementations.
//!
//! This module contains:
//! - The `PriceProvider` trait that all price sources implement
//! - Concrete adapters (Binance, KuCoin, CryptoCompare, Coinbase)
//!
//! Each adapter owns its wire format and classifies its own failures into
//! the two-kind [`ProviderError`](crate::errors::ProviderError) taxonomy.
//! The resolver never inspects provider responses; it only sees a positive
//! finite price or a classified error.

mod traits;

pub mod binance;
pub mod coinbase;
pub mod cryptocompare;
pub mod kucoin;

pub use traits::{PairFallback, PriceProvider};

/// User-Agent sent with every outbound provider request.
pub(crate) const USER_AGENT: &str = "coinvert/0.1 (+https://t.me/)";
