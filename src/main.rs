// mftm - operator CLI for the mftmarket ledger
//
// Loads the ledger snapshot from the data directory, applies one operation,
// persists the result and prints the settlement amounts. The set-hype
// subcommand is the authorization boundary for the oracle feed.

use clap::{Parser, Subcommand};
use mftmarket::market::{AccountId, AssetId, MarketLedger};
use mftmarket::storage::MarketStore;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mftm", about = "Bonding-curve market maker for fractionalized media assets")]
struct Cli {
    /// Data directory for the sled store
    #[arg(long, default_value = "./mftm-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a new asset on the market
    Insert {
        asset_id: u64,
        /// Id of the wrapped external token
        external_ref: u64,
        total_supply: u64,
        base_price: u64,
        /// Publisher account (base58)
        publisher: String,
        seed_liquidity: u64,
    },
    /// Buy tokens from the pool
    Buy {
        asset_id: u64,
        amount: u64,
        /// Buyer account (base58)
        buyer: String,
        payment: u64,
    },
    /// Sell tokens back to the pool
    Sell {
        asset_id: u64,
        amount: u64,
        /// Seller account (base58)
        seller: String,
    },
    /// Claim a pro-rata share of the royalty vault
    Claim {
        asset_id: u64,
        /// Claimant token balance (trusted, tracked externally)
        claimant_balance: u64,
        /// Claimant account (base58)
        claimant: String,
    },
    /// Apply an oracle hype/price update
    SetHype {
        asset_id: u64,
        hype_factor: u64,
        new_price: u64,
        new_stream_value: u64,
        current_round: u64,
    },
    /// Show one asset
    Info { asset_id: u64 },
    /// List all assets
    List,
    /// Show storage statistics
    Stats,
    /// Generate a fresh account id
    NewAccount,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!("command failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = MarketStore::open(&cli.data_dir)?;
    let mut ledger = store.load_ledger()?.unwrap_or_else(MarketLedger::new);

    match cli.command {
        Command::Insert {
            asset_id,
            external_ref,
            total_supply,
            base_price,
            publisher,
            seed_liquidity,
        } => {
            let asset_id = AssetId::new(asset_id);
            let publisher = AccountId::parse(&publisher)?;
            ledger.insert_asset(
                asset_id,
                external_ref,
                total_supply,
                base_price,
                publisher,
                seed_liquidity,
            )?;
            persist(&store, &ledger, asset_id)?;
            println!("listed asset {asset_id}");
        }
        Command::Buy {
            asset_id,
            amount,
            buyer,
            payment,
        } => {
            let asset_id = AssetId::new(asset_id);
            let buyer = AccountId::parse(&buyer)?;
            let receipt = ledger.buy(asset_id, amount, &buyer, payment)?;
            persist(&store, &ledger, asset_id)?;
            println!("buy filled: quoted {}", receipt.total_price);
            println!("  -> pool liquidity: {}", receipt.liquidity_share);
            println!("  -> royalty vault:  {}", receipt.royalty_share);
            println!("  -> creator:        {}", receipt.creator_share);
        }
        Command::Sell {
            asset_id,
            amount,
            seller,
        } => {
            let asset_id = AssetId::new(asset_id);
            let seller = AccountId::parse(&seller)?;
            let receipt = ledger.sell(asset_id, amount, &seller)?;
            persist(&store, &ledger, asset_id)?;
            println!("sell filled: payout {} owed to {seller}", receipt.payout);
        }
        Command::Claim {
            asset_id,
            claimant_balance,
            claimant,
        } => {
            let asset_id = AssetId::new(asset_id);
            let claimant = AccountId::parse(&claimant)?;
            let receipt = ledger.claim_royalty(asset_id, claimant_balance, &claimant)?;
            persist(&store, &ledger, asset_id)?;
            println!("royalty share {} owed to {claimant}", receipt.share);
        }
        Command::SetHype {
            asset_id,
            hype_factor,
            new_price,
            new_stream_value,
            current_round,
        } => {
            let asset_id = AssetId::new(asset_id);
            ledger.set_hype_price(asset_id, hype_factor, new_price, new_stream_value, current_round)?;
            persist(&store, &ledger, asset_id)?;
            println!("oracle update applied to asset {asset_id}");
        }
        Command::Info { asset_id } => {
            let asset_id = AssetId::new(asset_id);
            // prefer the per-asset entry, fall back to the snapshot
            let record = match store.load_asset(asset_id)? {
                Some(record) => record,
                None => ledger.get_asset_info(asset_id)?.clone(),
            };
            let vault = ledger.royalty_vault(asset_id)?;
            println!("asset {asset_id}");
            println!("  price:           {}", record.price());
            println!("  hype factor:     {}", record.hype_factor());
            println!("  algo liquidity:  {}", record.algo_liquidity());
            println!("  token liquidity: {}", record.token_liquidity());
            println!("  total supply:    {}", record.total_supply());
            println!("  creator:         {}", record.creator());
            println!("  external ref:    {}", record.external_ref());
            println!("  royalty vault:   {vault}");
            println!("  creator balance: {}", ledger.creator_balance(record.creator()));
            println!("  last stream:     {} (round {})", record.last_stream_value(), record.last_update_round());
        }
        Command::List => {
            if ledger.is_empty() {
                println!("no assets listed");
            }
            for id in ledger.asset_ids() {
                let record = ledger.get_asset_info(id)?;
                println!(
                    "{id}: price {} x{} hype, pool {}/{} tokens, {} liquidity",
                    record.price(),
                    record.hype_factor(),
                    record.token_liquidity(),
                    record.total_supply(),
                    record.algo_liquidity(),
                );
            }
        }
        Command::Stats => {
            let stats = store.stats()?;
            println!("assets:    {}", ledger.asset_count());
            println!("version:   {}", ledger.version());
            println!("keys:      {}", stats.key_count);
            println!("disk size: {} bytes", stats.disk_size_bytes);
        }
        Command::NewAccount => {
            println!("{}", AccountId::generate());
        }
    }

    Ok(())
}

/// Persist the snapshot plus the per-entity entries touched by the call
fn persist(
    store: &MarketStore,
    ledger: &MarketLedger,
    asset_id: AssetId,
) -> Result<(), Box<dyn std::error::Error>> {
    store.save_ledger(ledger)?;
    let record = ledger.get_asset_info(asset_id)?;
    store.save_asset(asset_id, record)?;
    store.save_vault_balance(asset_id, ledger.royalty_vault(asset_id)?)?;
    store.save_creator_balance(record.creator(), ledger.creator_balance(record.creator()))?;
    store.flush()?;
    Ok(())
}
