// Market module - THE CORE
// Bonding-curve pricing, liquidity pools, royalty vaults, creator earnings

mod asset;
mod curve;
mod ledger;

pub use asset::{AccountId, AccountIdError, AssetId, AssetRecord};
pub use curve::{
    PaymentSplit, LIQUIDITY_SHARE_PCT, MIN_PRICE, PRICE_STEP_PCT, ROYALTY_SHARE_PCT,
};
pub use ledger::{BuyReceipt, ClaimReceipt, MarketError, MarketLedger, SellReceipt};
