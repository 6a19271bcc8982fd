// Bonding-curve arithmetic
//
// Everything here is unsigned integer with truncating division. Settlement
// amounts depend on exact truncation behavior, so no floating point anywhere.
// Multiplications are widened to u128 and checked back into u64; callers map
// a failed narrowing to a hard overflow error.

use serde::{Deserialize, Serialize};

/// Share of a buy payment routed to pool liquidity, in percent
pub const LIQUIDITY_SHARE_PCT: u64 = 80;

/// Share of a buy payment routed to the royalty vault, in percent
pub const ROYALTY_SHARE_PCT: u64 = 10;

/// Price step applied after each trade, in percent
pub const PRICE_STEP_PCT: u64 = 1;

/// Hard price floor; sells never push the price below this
pub const MIN_PRICE: u64 = 1;

/// Three-way split of a buy payment
///
/// `liquidity` and `royalty` are truncating percentages; `creator` is the
/// subtraction remainder, so the three always sum exactly to the payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub liquidity: u64,
    pub royalty: u64,
    pub creator: u64,
}

/// Total cost of a buy: `price * amount * hype_factor`
///
/// Returns None if the product does not fit in u64.
pub fn total_price(price: u64, amount: u64, hype_factor: u64) -> Option<u64> {
    let wide = (price as u128)
        .checked_mul(amount as u128)?
        .checked_mul(hype_factor as u128)?;
    u64::try_from(wide).ok()
}

/// Payout of a sell: `price * amount`
pub fn sell_payout(price: u64, amount: u64) -> Option<u64> {
    u64::try_from((price as u128) * (amount as u128)).ok()
}

/// Split a payment 80/10/remainder between pool, vault and creator
pub fn split_payment(payment: u64) -> PaymentSplit {
    let liquidity = ((payment as u128) * (LIQUIDITY_SHARE_PCT as u128) / 100) as u64;
    let royalty = ((payment as u128) * (ROYALTY_SHARE_PCT as u128) / 100) as u64;
    PaymentSplit {
        liquidity,
        royalty,
        creator: payment - liquidity - royalty,
    }
}

/// Price after a buy: +1% with truncating division
///
/// Below 100 the step truncates to 0 and the price holds, which is the
/// intended integer-curve behavior. Returns None on u64 overflow.
pub fn step_up(price: u64) -> Option<u64> {
    let step = ((price as u128) * (PRICE_STEP_PCT as u128) / 100) as u64;
    price.checked_add(step)
}

/// Price after a sell: -1% with truncating division, floored at MIN_PRICE
pub fn step_down(price: u64) -> u64 {
    let step = ((price as u128) * (PRICE_STEP_PCT as u128) / 100) as u64;
    (price - step).max(MIN_PRICE)
}

/// Pro-rata share of the vault: `vault * balance / total_supply`, truncating
///
/// The result is bounded by the vault whenever `balance <= total_supply`.
/// Returns None if the quotient does not fit in u64 (only possible with a
/// balance far above total supply).
pub fn pro_rata_share(vault: u64, balance: u64, total_supply: u64) -> Option<u64> {
    let wide = (vault as u128) * (balance as u128) / (total_supply as u128);
    u64::try_from(wide).ok()
}
