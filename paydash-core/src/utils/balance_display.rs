//! Resolution and display formatting of wallet balances.

use paydash_sdk::objects::WalletBalances;
use rust_decimal::{Decimal, RoundingStrategy};

/// Find the USDC amount in a balances response.
///
/// The dedicated `usdc` field wins; otherwise the first `tokens` entry whose
/// symbol equals `usdc` ignoring case. `None` when neither is present.
pub fn resolve_usdc_amount(balances: &WalletBalances) -> Option<Decimal> {
    if let Some(usdc) = &balances.usdc {
        return Some(usdc.amount);
    }
    balances
        .tokens
        .iter()
        .find(|t| {
            t.symbol
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("usdc"))
        })
        .map(|t| t.amount)
}

/// Two-decimal display string, rounding half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paydash_sdk::objects::{TokenAmount, TokenBalance};

    fn listed(symbol: Option<&str>, amount: Decimal) -> TokenBalance {
        TokenBalance {
            symbol: symbol.map(str::to_owned),
            amount,
        }
    }

    #[test]
    fn test_direct_field_wins() {
        let balances = WalletBalances {
            usdc: Some(TokenAmount {
                amount: Decimal::new(12345, 3),
            }),
            tokens: vec![listed(Some("usdc"), Decimal::ONE)],
        };
        assert_eq!(resolve_usdc_amount(&balances), Some(Decimal::new(12345, 3)));
    }

    #[test]
    fn test_token_list_match_ignores_case() {
        let balances = WalletBalances {
            usdc: None,
            tokens: vec![
                listed(None, Decimal::TEN),
                listed(Some("ETH"), Decimal::TWO),
                listed(Some("USDC"), Decimal::new(75, 1)),
            ],
        };
        assert_eq!(resolve_usdc_amount(&balances), Some(Decimal::new(75, 1)));
    }

    #[test]
    fn test_missing_balance_is_none() {
        assert_eq!(resolve_usdc_amount(&WalletBalances::default()), None);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::new(12344, 3)), "12.34");
        assert_eq!(format_amount(Decimal::new(-5, 3)), "-0.01");
        assert_eq!(format_amount(Decimal::from(3)), "3.00");
    }
}
