// Market Ledger - the asset-market state machine
//
// Owns the three keyed stores (asset records, royalty vaults, creator
// balances) and applies each operation atomically: every check and every
// arithmetic result is computed before the first write, so a rejected call
// leaves no partial state behind.

use crate::market::asset::{AccountId, AssetId, AssetRecord};
use crate::market::curve;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors from ledger operations
///
/// All failures are local: the rejected call mutates nothing and the caller
/// may retry with adjusted inputs. A missing asset id is a hard error on
/// every operation, reads included.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    #[error("Asset already listed: {0}")]
    AssetExists(AssetId),

    #[error("Insufficient payment: required {required}, got {payment}")]
    InsufficientPayment { required: u64, payment: u64 },

    #[error("Insufficient token liquidity: available {available}, requested {requested}")]
    InsufficientTokenLiquidity { available: u64, requested: u64 },

    #[error("Insufficient pool liquidity: available {available}, payout {payout}")]
    InsufficientPoolLiquidity { available: u64, payout: u64 },

    #[error("Returning {amount} tokens would exceed total supply")]
    SupplyExceeded { amount: u64 },

    #[error("Total supply must be nonzero")]
    ZeroSupply,

    #[error("Price must be nonzero")]
    ZeroPrice,

    #[error("Hype factor must be nonzero")]
    ZeroHypeFactor,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Deserialization failed")]
    DeserializationFailed,
}

/// Settlement amounts of a filled buy
///
/// The ledger only computes these; moving the actual currency to the pool,
/// vault and creator is the settlement layer's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyReceipt {
    /// Quoted cost (`price * amount * hype_factor`) the payment had to cover
    pub total_price: u64,
    /// Share of the payment added to pool liquidity
    pub liquidity_share: u64,
    /// Share of the payment added to the royalty vault
    pub royalty_share: u64,
    /// Remainder credited to the creator
    pub creator_share: u64,
}

/// Settlement amount of a filled sell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellReceipt {
    /// Native currency owed to the seller out of pool liquidity
    pub payout: u64,
}

/// Settlement amount of a royalty claim
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Pro-rata vault share owed to the claimant
    pub share: u64,
}

/// The asset-market ledger
///
/// Strictly sequential: mutating operations take `&mut self`, so calls are
/// serialized by construction. Nothing here performs value transfer; the
/// receipts carry the amounts for an external settlement collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketLedger {
    /// Asset id -> listed asset state
    assets: HashMap<AssetId, AssetRecord>,
    /// Asset id -> undistributed royalty balance
    royalty_vaults: HashMap<AssetId, u64>,
    /// Creator -> accumulated earnings across all their assets
    creator_balances: HashMap<AccountId, u64>,
    /// Version counter (logical clock), bumped on every applied mutation
    version: u64,
}

impl Default for MarketLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            royalty_vaults: HashMap::new(),
            creator_balances: HashMap::new(),
            version: 0,
        }
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Look up a listed asset
    pub fn get_asset_info(&self, asset_id: AssetId) -> Result<&AssetRecord, MarketError> {
        self.assets
            .get(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))
    }

    /// Undistributed royalty balance for an asset
    pub fn royalty_vault(&self, asset_id: AssetId) -> Result<u64, MarketError> {
        self.royalty_vaults
            .get(&asset_id)
            .copied()
            .ok_or(MarketError::AssetNotFound(asset_id))
    }

    /// Accumulated earnings for a creator (zero if never credited)
    pub fn creator_balance(&self, creator: &AccountId) -> u64 {
        self.creator_balances.get(creator).copied().unwrap_or(0)
    }

    /// Whether an asset id is listed
    pub fn has_asset(&self, asset_id: AssetId) -> bool {
        self.assets.contains_key(&asset_id)
    }

    /// All listed asset ids
    pub fn asset_ids(&self) -> Vec<AssetId> {
        let mut ids: Vec<AssetId> = self.assets.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of listed assets
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Check if the ledger has no listings
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Current version (logical clock)
    pub fn version(&self) -> u64 {
        self.version
    }

    // ========================================================================
    // LISTING
    // ========================================================================

    /// List a new asset: full token pool, seeded currency pool, zero vault
    ///
    /// Rejects an already-listed id; relisting never silently overwrites.
    pub fn insert_asset(
        &mut self,
        asset_id: AssetId,
        external_ref: u64,
        total_supply: u64,
        base_price: u64,
        publisher: AccountId,
        seed_liquidity: u64,
    ) -> Result<(), MarketError> {
        if self.assets.contains_key(&asset_id) {
            return Err(MarketError::AssetExists(asset_id));
        }
        if total_supply == 0 {
            return Err(MarketError::ZeroSupply);
        }
        if base_price == 0 {
            return Err(MarketError::ZeroPrice);
        }

        let record = AssetRecord::new(external_ref, total_supply, base_price, publisher, seed_liquidity);
        self.assets.insert(asset_id, record);
        self.royalty_vaults.insert(asset_id, 0);
        self.version += 1;

        debug!(asset = %asset_id, supply = total_supply, price = base_price, "asset listed");
        Ok(())
    }

    // ========================================================================
    // TRADING
    // ========================================================================

    /// Buy `amount` tokens from the pool
    ///
    /// The payment must cover `price * amount * hype_factor`. It is split
    /// 80% to pool liquidity and 10% to the royalty vault (truncating), with
    /// the remainder credited to the creator, so the three shares always sum
    /// exactly to the payment. The price then steps up 1% (truncating).
    ///
    /// `buyer` is the semantic counterparty; their token holdings are
    /// tracked externally.
    pub fn buy(
        &mut self,
        asset_id: AssetId,
        amount: u64,
        buyer: &AccountId,
        payment: u64,
    ) -> Result<BuyReceipt, MarketError> {
        let asset = self
            .assets
            .get(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))?;
        let vault = self
            .royalty_vaults
            .get(&asset_id)
            .copied()
            .ok_or(MarketError::AssetNotFound(asset_id))?;

        let total_price = curve::total_price(asset.price(), amount, asset.hype_factor())
            .ok_or(MarketError::Overflow)?;

        if payment < total_price {
            return Err(MarketError::InsufficientPayment {
                required: total_price,
                payment,
            });
        }
        if asset.token_liquidity() < amount {
            return Err(MarketError::InsufficientTokenLiquidity {
                available: asset.token_liquidity(),
                requested: amount,
            });
        }

        let split = curve::split_payment(payment);

        // Compute every post-state value before the first write
        let new_token_liquidity = asset.token_liquidity() - amount;
        let new_algo_liquidity = asset
            .algo_liquidity()
            .checked_add(split.liquidity)
            .ok_or(MarketError::Overflow)?;
        let new_price = curve::step_up(asset.price()).ok_or(MarketError::Overflow)?;
        let new_vault = vault.checked_add(split.royalty).ok_or(MarketError::Overflow)?;
        let creator = asset.creator().clone();
        let new_creator_balance = self
            .creator_balance(&creator)
            .checked_add(split.creator)
            .ok_or(MarketError::Overflow)?;

        let asset = self
            .assets
            .get_mut(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))?;
        asset.apply_buy(new_token_liquidity, new_algo_liquidity, new_price);
        self.royalty_vaults.insert(asset_id, new_vault);
        self.creator_balances.insert(creator, new_creator_balance);
        self.version += 1;

        debug!(asset = %asset_id, amount, payment, buyer = %buyer, "buy filled");
        Ok(BuyReceipt {
            total_price,
            liquidity_share: split.liquidity,
            royalty_share: split.royalty,
            creator_share: split.creator,
        })
    }

    /// Sell `amount` tokens back to the pool at the current price
    ///
    /// Rejected if the returned tokens would push the pool above total
    /// supply, or if pool liquidity cannot cover the payout. The price then
    /// steps down 1% (truncating), floored at 1. The payout itself is owed
    /// to the seller by the settlement layer.
    pub fn sell(
        &mut self,
        asset_id: AssetId,
        amount: u64,
        seller: &AccountId,
    ) -> Result<SellReceipt, MarketError> {
        let asset = self
            .assets
            .get(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))?;

        let new_token_liquidity = asset
            .token_liquidity()
            .checked_add(amount)
            .ok_or(MarketError::Overflow)?;
        if new_token_liquidity > asset.total_supply() {
            return Err(MarketError::SupplyExceeded { amount });
        }

        let payout = curve::sell_payout(asset.price(), amount).ok_or(MarketError::Overflow)?;
        if asset.algo_liquidity() < payout {
            return Err(MarketError::InsufficientPoolLiquidity {
                available: asset.algo_liquidity(),
                payout,
            });
        }

        let new_algo_liquidity = asset.algo_liquidity() - payout;
        let new_price = curve::step_down(asset.price());

        let asset = self
            .assets
            .get_mut(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))?;
        asset.apply_sell(new_token_liquidity, new_algo_liquidity, new_price);
        self.version += 1;

        debug!(asset = %asset_id, amount, payout, seller = %seller, "sell filled");
        Ok(SellReceipt { payout })
    }

    // ========================================================================
    // ROYALTIES
    // ========================================================================

    /// Claim a pro-rata share of the royalty vault
    ///
    /// `claimant_balance` is supplied by the caller and trusted as-is; the
    /// holdings ledger lives outside this component. The share is
    /// `vault * claimant_balance / total_supply` with truncating division
    /// (the truncation remainder stays in the vault). A balance large enough
    /// to make the share exceed the vault is rejected as overflow rather
    /// than underflowing the vault.
    pub fn claim_royalty(
        &mut self,
        asset_id: AssetId,
        claimant_balance: u64,
        claimant: &AccountId,
    ) -> Result<ClaimReceipt, MarketError> {
        let total_supply = self
            .assets
            .get(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))?
            .total_supply();
        let vault = self
            .royalty_vaults
            .get(&asset_id)
            .copied()
            .ok_or(MarketError::AssetNotFound(asset_id))?;

        let share = curve::pro_rata_share(vault, claimant_balance, total_supply)
            .ok_or(MarketError::Overflow)?;
        let new_vault = vault.checked_sub(share).ok_or(MarketError::Overflow)?;

        self.royalty_vaults.insert(asset_id, new_vault);
        self.version += 1;

        debug!(asset = %asset_id, share, claimant = %claimant, "royalty claimed");
        Ok(ClaimReceipt { share })
    }

    // ========================================================================
    // ORACLE FEED
    // ========================================================================

    /// Overwrite the hype factor, price and stream bookkeeping
    ///
    /// Privileged oracle entry point; authorization is the caller's concern.
    /// `current_round` is recorded without a monotonicity check, so an
    /// out-of-order feed overwrites silently.
    pub fn set_hype_price(
        &mut self,
        asset_id: AssetId,
        hype_factor: u64,
        new_price: u64,
        new_stream_value: u64,
        current_round: u64,
    ) -> Result<(), MarketError> {
        if hype_factor == 0 {
            return Err(MarketError::ZeroHypeFactor);
        }
        if new_price == 0 {
            return Err(MarketError::ZeroPrice);
        }

        let asset = self
            .assets
            .get_mut(&asset_id)
            .ok_or(MarketError::AssetNotFound(asset_id))?;
        asset.apply_oracle_update(hype_factor, new_price, new_stream_value, current_round);
        self.version += 1;

        debug!(asset = %asset_id, hype_factor, price = new_price, round = current_round, "oracle update applied");
        Ok(())
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Serialize for persistence
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(self).unwrap_or_default()
    }

    /// Deserialize from persisted bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarketError> {
        postcard::from_bytes(bytes).map_err(|_| MarketError::DeserializationFailed)
    }
}
