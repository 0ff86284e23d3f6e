//! Chat command parsing.
//!
//! The bot reacts to exactly one conversion trigger plus the usual
//! help/start commands. Everything else is silence: the bot lives in group
//! chats and must not answer arbitrary text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `/c <amount> <base> <quote>`, e.g. `/c 0.5 btc usdt`.
    static ref TRIGGER: Regex =
        Regex::new(r"(?i)^/c\s+([0-9]*\.?[0-9]+)\s+([a-z0-9]+)\s+([a-z0-9]+)$")
            .expect("trigger pattern is valid");
}

/// What a message text asks the bot to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Convert `amount` of `base` into `quote`.
    Convert {
        amount: f64,
        base: String,
        quote: String,
    },
    /// Show usage.
    Help,
    /// Not addressed to the bot.
    Ignore,
}

/// Parse a message text into a command.
pub fn parse_command(text: &str) -> Command {
    let text = text.trim();

    if let Some(caps) = TRIGGER.captures(text) {
        let amount: f64 = match caps[1].parse() {
            Ok(amount) => amount,
            Err(_) => return Command::Ignore,
        };
        // The pattern admits "0" and "0.0"; converting nothing is a no-op.
        if !amount.is_finite() || amount <= 0.0 {
            return Command::Ignore;
        }
        return Command::Convert {
            amount,
            base: caps[2].to_string(),
            quote: caps[3].to_string(),
        };
    }

    let command_word = text.split_whitespace().next().unwrap_or("");
    match command_word.split('@').next().unwrap_or("") {
        "/help" | "/start" => Command::Help,
        _ => Command::Ignore,
    }
}

/// Usage text for `/help` and `/start`.
pub const HELP_TEXT: &str = "Convert between crypto and fiat:\n\
    `/c <amount> <base> <quote>`\n\n\
    Examples:\n\
    `/c 0.5 btc usdt`\n\
    `/c 100 usd eth`\n\
    `/c 1 eth btc`";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_conversion_trigger() {
        let cmd = parse_command("/c 0.5 btc usdt");
        assert_eq!(
            cmd,
            Command::Convert {
                amount: 0.5,
                base: "btc".to_string(),
                quote: "usdt".to_string(),
            }
        );
    }

    #[test]
    fn test_trigger_is_case_insensitive() {
        let cmd = parse_command("/C 1 BTC EUR");
        assert!(matches!(cmd, Command::Convert { amount, .. } if amount == 1.0));
    }

    #[test]
    fn test_leading_dot_amount() {
        let cmd = parse_command("/c .25 eth btc");
        assert!(matches!(cmd, Command::Convert { amount, .. } if amount == 0.25));
    }

    #[test]
    fn test_zero_amount_is_ignored() {
        assert_eq!(parse_command("/c 0 btc usdt"), Command::Ignore);
        assert_eq!(parse_command("/c 0.0 btc usdt"), Command::Ignore);
    }

    #[test]
    fn test_malformed_triggers_are_ignored() {
        assert_eq!(parse_command("/c btc usdt"), Command::Ignore);
        assert_eq!(parse_command("/c 1 btc"), Command::Ignore);
        assert_eq!(parse_command("/c -1 btc usdt"), Command::Ignore);
        assert_eq!(parse_command("/c 1 btc usdt extra"), Command::Ignore);
    }

    #[test]
    fn test_ordinary_chat_is_ignored() {
        assert_eq!(parse_command("what's the btc price?"), Command::Ignore);
        assert_eq!(parse_command(""), Command::Ignore);
    }

    #[test]
    fn test_help_and_start() {
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("/start"), Command::Help);
        assert_eq!(parse_command("/help@coinvert_bot"), Command::Help);
    }
}
