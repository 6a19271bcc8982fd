// Asset records and the opaque identifiers that key the ledger maps

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

const ACCOUNT_ID_LEN: usize = 32;

/// Errors from parsing an account identifier
#[derive(Error, Debug)]
pub enum AccountIdError {
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid account ID length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Identifier for a listed asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(u64);

impl AssetId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque account identifier (creators, buyers, sellers, claimants)
///
/// The ledger never inspects the bytes; equality and hashing are all it
/// needs. Rendered as base58 for the CLI boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// Generate a random account ID
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a base58 string
    pub fn parse(s: &str) -> Result<Self, AccountIdError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| AccountIdError::InvalidBase58(e.to_string()))?;

        if decoded.len() != ACCOUNT_ID_LEN {
            return Err(AccountIdError::InvalidLength(decoded.len()));
        }

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl PartialEq for AccountId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for AccountId {}

impl Hash for AccountId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// State of one listed asset: bonding-curve price plus the two-sided pool
///
/// `total_supply`, `creator` and `external_ref` are fixed at listing time;
/// everything else moves only through the ledger operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Current unit price in native-currency smallest units, never below 1
    price: u64,
    /// Native-currency reserve backing sell payouts
    algo_liquidity: u64,
    /// Asset tokens available for sale, never above total_supply
    token_liquidity: u64,
    /// Fixed token supply
    total_supply: u64,
    /// Creator credited with the trade share
    creator: AccountId,
    /// Id of the wrapped external token
    external_ref: u64,
    /// Oracle-fed price multiplier, never below 1
    hype_factor: u64,
    /// Most recent oracle stream value (informational)
    last_stream_value: u64,
    /// Round of the most recent oracle update (informational)
    last_update_round: u64,
}

impl AssetRecord {
    /// Create a freshly listed asset: full token pool, seeded currency pool
    pub fn new(
        external_ref: u64,
        total_supply: u64,
        base_price: u64,
        creator: AccountId,
        seed_liquidity: u64,
    ) -> Self {
        Self {
            price: base_price,
            algo_liquidity: seed_liquidity,
            token_liquidity: total_supply,
            total_supply,
            creator,
            external_ref,
            hype_factor: 1,
            last_stream_value: 0,
            last_update_round: 0,
        }
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn algo_liquidity(&self) -> u64 {
        self.algo_liquidity
    }

    pub fn token_liquidity(&self) -> u64 {
        self.token_liquidity
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn creator(&self) -> &AccountId {
        &self.creator
    }

    pub fn external_ref(&self) -> u64 {
        self.external_ref
    }

    pub fn hype_factor(&self) -> u64 {
        self.hype_factor
    }

    pub fn last_stream_value(&self) -> u64 {
        self.last_stream_value
    }

    pub fn last_update_round(&self) -> u64 {
        self.last_update_round
    }

    /// Apply the pool side of a filled buy: tokens out, currency in, stepped
    /// price. All values are pre-validated by the ledger; this only assigns.
    pub(crate) fn apply_buy(&mut self, new_token_liquidity: u64, new_algo_liquidity: u64, new_price: u64) {
        self.token_liquidity = new_token_liquidity;
        self.algo_liquidity = new_algo_liquidity;
        self.price = new_price;
    }

    /// Apply the pool side of a filled sell: tokens in, payout out, stepped
    /// price. All values are pre-validated by the ledger; this only assigns.
    pub(crate) fn apply_sell(&mut self, new_token_liquidity: u64, new_algo_liquidity: u64, new_price: u64) {
        self.token_liquidity = new_token_liquidity;
        self.algo_liquidity = new_algo_liquidity;
        self.price = new_price;
    }

    /// Overwrite the oracle-fed fields
    pub(crate) fn apply_oracle_update(
        &mut self,
        hype_factor: u64,
        new_price: u64,
        new_stream_value: u64,
        current_round: u64,
    ) {
        self.hype_factor = hype_factor;
        self.price = new_price;
        self.last_stream_value = new_stream_value;
        self.last_update_round = current_round;
    }
}
