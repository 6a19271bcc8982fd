// mftmarket - On-ledger bonding-curve market maker for fractionalized media assets
//
// The ledger owns three keyed stores (asset records, royalty vaults, creator
// balances) and exposes five mutating operations plus reads. All arithmetic is
// unsigned integer with truncating division; settlement amounts are returned
// to the caller, never transferred here.

pub mod market;
pub mod storage;
