//! Turns parsed commands into reply text.

use coinvert_rates::{format_amount, normalize_ticker, RateResolver, ResolveError};

use crate::command::{parse_command, Command, HELP_TEXT};

/// Produce the reply for a message text, if the bot has anything to say.
pub async fn respond_to(resolver: &RateResolver, text: &str) -> Option<String> {
    match parse_command(text) {
        Command::Ignore => None,
        Command::Help => Some(HELP_TEXT.to_string()),
        Command::Convert {
            amount,
            base,
            quote,
        } => Some(convert_reply(resolver, amount, &base, &quote).await),
    }
}

/// Resolve the pair and render the two-line conversion reply.
async fn convert_reply(resolver: &RateResolver, amount: f64, base: &str, quote: &str) -> String {
    let base_norm = normalize_ticker(base);
    let quote_norm = normalize_ticker(quote);

    match resolver.resolve(base, quote).await {
        Ok(price) => {
            let total = amount * price.rate;
            let base_upper = base_norm.to_uppercase();
            let quote_upper = quote_norm.to_uppercase();
            format!(
                "`{}` {} ≈ `{}` {}\n(1 {} = `{}` {})",
                amount,
                base_upper,
                format_amount(total, &quote_norm),
                quote_upper,
                base_upper,
                format_amount(price.rate, &quote_norm),
                quote_upper,
            )
        }
        Err(ResolveError::BadSymbol) => {
            let offending = if base_norm.is_empty() { base } else { quote };
            format!("Unknown asset: *{}*", offending)
        }
        Err(ResolveError::NoRoute) => {
            "Price unavailable right now. Try again in a moment.".to_string()
        }
    }
}
