// Edge cases and boundary tests for the market ledger

use mftmarket::market::{AccountId, AssetId, MarketError, MarketLedger, MIN_PRICE};

// ============================================================================
// PRICE FLOOR TESTS
// ============================================================================

#[test]
fn test_price_never_drops_below_one() {
    let creator = AccountId::generate();
    let seller = AccountId::generate();
    let buyer = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 10_000, 1, creator, 1_000_000)
        .unwrap();

    // drain some tokens so sells are accepted
    ledger.buy(AssetId::new(1), 5000, &buyer, 5000).unwrap();

    for _ in 0..100 {
        ledger.sell(AssetId::new(1), 1, &seller).unwrap();
    }

    let record = ledger.get_asset_info(AssetId::new(1)).unwrap();
    assert_eq!(record.price(), MIN_PRICE);
}

#[test]
fn test_price_decay_floors_at_one_from_above() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let seller = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 100_000, 500, creator, u64::MAX / 2)
        .unwrap();
    ledger
        .buy(AssetId::new(1), 50_000, &buyer, 25_000_000)
        .unwrap();

    // 1% decay truncates to 0 once price < 100; the floor still holds
    let mut last = ledger.get_asset_info(AssetId::new(1)).unwrap().price();
    for _ in 0..1000 {
        ledger.sell(AssetId::new(1), 1, &seller).unwrap();
        let price = ledger.get_asset_info(AssetId::new(1)).unwrap().price();
        assert!(price <= last);
        assert!(price >= MIN_PRICE);
        last = price;
    }
}

// ============================================================================
// TRUNCATION BEHAVIOR TESTS
// ============================================================================

#[test]
fn test_small_price_holds_through_buys() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 10_000, 99, creator, 0)
        .unwrap();

    // 1% of 99 truncates to 0: the curve is flat below 100
    for _ in 0..10 {
        ledger.buy(AssetId::new(1), 1, &buyer, 99).unwrap();
    }
    assert_eq!(ledger.get_asset_info(AssetId::new(1)).unwrap().price(), 99);
}

#[test]
fn test_split_of_odd_payment_loses_nothing() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 1, creator.clone(), 0)
        .unwrap();

    // 101 splits as 80 / 10 / 11: the remainder lands on the creator
    let receipt = ledger.buy(AssetId::new(1), 1, &buyer, 101).unwrap();
    assert_eq!(receipt.liquidity_share, 80);
    assert_eq!(receipt.royalty_share, 10);
    assert_eq!(receipt.creator_share, 11);

    let record = ledger.get_asset_info(AssetId::new(1)).unwrap();
    assert_eq!(record.algo_liquidity(), 80);
    assert_eq!(ledger.royalty_vault(AssetId::new(1)).unwrap(), 10);
    assert_eq!(ledger.creator_balance(&creator), 11);
}

// ============================================================================
// OVERFLOW TESTS
// ============================================================================

#[test]
fn test_buy_quote_overflow_is_rejected() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, u64::MAX, u64::MAX, creator, 0)
        .unwrap();

    let err = ledger.buy(AssetId::new(1), 2, &buyer, u64::MAX).unwrap_err();
    assert!(matches!(err, MarketError::Overflow));

    // no partial state on the hard failure either
    let record = ledger.get_asset_info(AssetId::new(1)).unwrap();
    assert_eq!(record.token_liquidity(), u64::MAX);
    assert_eq!(record.algo_liquidity(), 0);
}

#[test]
fn test_sell_payout_overflow_is_rejected() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let seller = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, u64::MAX, 1, creator, 0)
        .unwrap();
    ledger.buy(AssetId::new(1), 10, &buyer, 10).unwrap();
    ledger.set_hype_price(AssetId::new(1), 1, u64::MAX, 0, 1).unwrap();

    // payout u64::MAX * 2 cannot fit
    let err = ledger.sell(AssetId::new(1), 2, &seller).unwrap_err();
    assert!(matches!(err, MarketError::Overflow));
}

#[test]
fn test_price_step_overflow_is_rejected() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 1, creator, 0)
        .unwrap();
    ledger.set_hype_price(AssetId::new(1), 1, u64::MAX, 0, 1).unwrap();

    // quote fits (amount 1, hype 1) but the +1% step cannot
    let err = ledger.buy(AssetId::new(1), 1, &buyer, u64::MAX).unwrap_err();
    assert!(matches!(err, MarketError::Overflow));
    assert_eq!(ledger.get_asset_info(AssetId::new(1)).unwrap().token_liquidity(), 1000);
}

// ============================================================================
// CLAIM TRUST BOUNDARY TESTS
// ============================================================================

#[test]
fn test_claim_never_exceeds_vault_for_honest_balance() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let claimant = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 10, creator, 500)
        .unwrap();
    ledger.buy(AssetId::new(1), 10, &buyer, 997).unwrap();

    let vault_before = ledger.royalty_vault(AssetId::new(1)).unwrap();
    for balance in [0u64, 1, 333, 999, 1000] {
        let mut fork = ledger.clone();
        let receipt = fork.claim_royalty(AssetId::new(1), balance, &claimant).unwrap();
        assert!(receipt.share <= vault_before);
    }
}

#[test]
fn test_claim_with_inflated_balance_cannot_underflow_vault() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let claimant = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 10, creator, 500)
        .unwrap();
    ledger.buy(AssetId::new(1), 10, &buyer, 1000).unwrap();

    // balance way above total supply would make the share exceed the vault
    let err = ledger
        .claim_royalty(AssetId::new(1), 1_000_000, &claimant)
        .unwrap_err();
    assert!(matches!(err, MarketError::Overflow));
    assert_eq!(ledger.royalty_vault(AssetId::new(1)).unwrap(), 100);
}

#[test]
fn test_claim_zero_balance_yields_zero() {
    let creator = AccountId::generate();
    let claimant = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 10, creator, 0)
        .unwrap();

    let receipt = ledger.claim_royalty(AssetId::new(1), 0, &claimant).unwrap();
    assert_eq!(receipt.share, 0);
}

// ============================================================================
// MISSING ASSET TESTS
// ============================================================================

#[test]
fn test_every_operation_aborts_on_unknown_asset() {
    let account = AccountId::generate();
    let mut ledger = MarketLedger::new();
    let missing = AssetId::new(404);

    assert!(matches!(
        ledger.get_asset_info(missing).unwrap_err(),
        MarketError::AssetNotFound(_)
    ));
    assert!(matches!(
        ledger.royalty_vault(missing).unwrap_err(),
        MarketError::AssetNotFound(_)
    ));
    assert!(matches!(
        ledger.buy(missing, 1, &account, 100).unwrap_err(),
        MarketError::AssetNotFound(_)
    ));
    assert!(matches!(
        ledger.sell(missing, 1, &account).unwrap_err(),
        MarketError::AssetNotFound(_)
    ));
    assert!(matches!(
        ledger.claim_royalty(missing, 1, &account).unwrap_err(),
        MarketError::AssetNotFound(_)
    ));
    assert!(matches!(
        ledger.set_hype_price(missing, 1, 1, 0, 0).unwrap_err(),
        MarketError::AssetNotFound(_)
    ));
    assert_eq!(ledger.version(), 0);
}

// ============================================================================
// BOUNDARY VALUE TESTS
// ============================================================================

#[test]
fn test_buy_entire_supply() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 1, creator, 0)
        .unwrap();

    let receipt = ledger.buy(AssetId::new(1), 1000, &buyer, 1000).unwrap();
    assert_eq!(receipt.total_price, 1000);

    let record = ledger.get_asset_info(AssetId::new(1)).unwrap();
    assert_eq!(record.token_liquidity(), 0);

    // nothing left to buy
    let err = ledger.buy(AssetId::new(1), 1, &buyer, 100).unwrap_err();
    assert!(matches!(err, MarketError::InsufficientTokenLiquidity { .. }));
}

#[test]
fn test_zero_amount_buy_and_sell_are_noops_with_split() {
    let creator = AccountId::generate();
    let buyer = AccountId::generate();
    let seller = AccountId::generate();
    let mut ledger = MarketLedger::new();
    ledger
        .insert_asset(AssetId::new(1), 42, 1000, 200, creator.clone(), 0)
        .unwrap();

    // a zero-amount buy still splits the payment and steps the price
    let receipt = ledger.buy(AssetId::new(1), 0, &buyer, 100).unwrap();
    assert_eq!(receipt.total_price, 0);
    assert_eq!(receipt.liquidity_share, 80);
    assert_eq!(ledger.creator_balance(&creator), 10);
    assert_eq!(ledger.get_asset_info(AssetId::new(1)).unwrap().price(), 202);

    // a zero-amount sell pays nothing and steps the price down
    let receipt = ledger.sell(AssetId::new(1), 0, &seller).unwrap();
    assert_eq!(receipt.payout, 0);
    assert_eq!(ledger.get_asset_info(AssetId::new(1)).unwrap().price(), 200);
}
