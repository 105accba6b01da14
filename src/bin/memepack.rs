// ============================================================================
// memepack — command-line front end for the meme card pack SDK
// ============================================================================
// Usage:
//   memepack status                      Show pack opportunities and countdown
//   memepack open [--pack doge]          Spend an opportunity and open a pack
//   memepack buy standard                Open a shop pack
//   memepack collection [--rarity Rare]  List owned cards
//   memepack disenchant ID...            Turn cards into Meme Dust
//   memepack packs                       Show pack types and rarity weights
//   memepack watch [--seconds 10]        Run the recharge timer live
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use memepack_sdk::booster::tables;
use memepack_sdk::config;
use memepack_sdk::models::{Card, CardRarity};
use memepack_sdk::{AsyncMemePackSdk, MemePackSdk, Result};
use tracing_subscriber::EnvFilter;

/// Meme card pack tool
#[derive(Parser)]
#[command(name = "memepack", version, about = "Open meme card packs and manage your collection")]
struct Cli {
    /// Directory holding saved state (default: platform data dir, or $MEMEPACK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pack opportunities, the recharge countdown and the collection size
    Status,

    /// Spend a pack opportunity and open a pack
    Open {
        /// Pack type: doge, popcat or pepe
        #[arg(long, default_value = config::DEFAULT_PACK_TYPE)]
        pack: String,
    },

    /// Open a pack from the shop without spending an opportunity
    Buy {
        /// Shop pack: standard, premium or legendary
        shop_pack: String,
    },

    /// List owned cards
    Collection {
        /// Only show cards of this rarity
        #[arg(long)]
        rarity: Option<String>,
    },

    /// Disenchant cards for Meme Dust
    Disenchant {
        /// Ids of the cards to disenchant
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show the rarity weights of every pack type
    Packs,

    /// Keep the recharge timer running and print the countdown
    Watch {
        /// How long to watch, in seconds
        #[arg(long, default_value = "10")]
        seconds: u64,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn data_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir
        .or_else(|| std::env::var_os(config::DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(config::default_data_dir)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let dir = data_dir(cli.data_dir);

    match cli.command {
        Commands::Watch { seconds } => return cmd_watch(dir, seconds).await,
        Commands::Packs => {
            cmd_packs();
            return Ok(());
        }
        _ => {}
    }

    let mut sdk = MemePackSdk::builder().data_dir(&dir).build()?;
    match cli.command {
        Commands::Status => cmd_status(&sdk),
        Commands::Open { pack } => cmd_open(&mut sdk, &pack),
        Commands::Buy { shop_pack } => cmd_buy(&mut sdk, &shop_pack),
        Commands::Collection { rarity } => cmd_collection(&sdk, rarity),
        Commands::Disenchant { ids } => cmd_disenchant(&mut sdk, &ids),
        Commands::Packs | Commands::Watch { .. } => Ok(()),
    }
}

fn print_cards(cards: &[&Card]) {
    for card in cards {
        println!(
            "  {:>14}  {:10} {:8} power {:5}  social {:3}{}",
            card.id,
            card.rarity,
            card.name,
            card.power,
            card.social_score,
            if card.is_nft { "  [NFT]" } else { "" }
        );
    }
}

fn cmd_status(sdk: &MemePackSdk) -> Result<()> {
    let state = sdk.timer().state();
    println!(
        "Pack opportunities: {}/{}",
        state.opportunities,
        config::MAX_PACK_OPPORTUNITIES
    );
    if state.is_active {
        println!("Next pack in:       {}", state.formatted_remaining());
    } else {
        println!("Next pack in:       (full)");
    }
    println!("Cards owned:        {}", sdk.collection().len());
    println!("Meme Dust:          {}", sdk.collection().dust_balance()?);
    Ok(())
}

fn cmd_open(sdk: &mut MemePackSdk, pack: &str) -> Result<()> {
    match sdk.open_pack(pack)? {
        Some(cards) => {
            println!("Opened a {} pack:", pack.to_uppercase());
            print_cards(&cards.iter().collect::<Vec<_>>());
            println!(
                "{} pack opportunities left",
                sdk.timer().state().opportunities
            );
        }
        None => {
            println!(
                "You have no pack opportunities left. Next one in {}.",
                sdk.timer().state().formatted_remaining()
            );
        }
    }
    Ok(())
}

fn cmd_buy(sdk: &mut MemePackSdk, shop_pack: &str) -> Result<()> {
    let cards = sdk.buy_pack(shop_pack)?;
    println!("Opened a {} shop pack:", shop_pack);
    print_cards(&cards.iter().collect::<Vec<_>>());
    Ok(())
}

fn cmd_collection(sdk: &MemePackSdk, rarity: Option<String>) -> Result<()> {
    let filter = rarity.as_deref().map(str::parse::<CardRarity>).transpose()?;
    let collection = sdk.collection();
    let cards: Vec<&Card> = match filter {
        Some(r) => collection.by_rarity(r),
        None => collection.cards().iter().collect(),
    };

    if cards.is_empty() {
        println!("No cards.");
        return Ok(());
    }
    println!("{} cards:", cards.len());
    print_cards(&cards);

    if filter.is_none() {
        println!();
        for (rarity, count) in collection.rarity_counts().iter().rev() {
            println!("  {:10} {}", rarity, count);
        }
    }
    Ok(())
}

fn cmd_disenchant(sdk: &mut MemePackSdk, ids: &[i64]) -> Result<()> {
    let outcome = sdk.disenchant(ids)?;
    println!(
        "Disenchanted {} card{} for {} Meme Dust",
        outcome.cards,
        if outcome.cards == 1 { "" } else { "s" },
        outcome.dust
    );
    println!("New balance: {} Meme Dust", sdk.collection().dust_balance()?);
    Ok(())
}

fn cmd_packs() {
    for pack_type in tables::pack_types() {
        println!("{}:", pack_type);
        for (rarity, weight) in tables::weight_table(pack_type) {
            println!("  {:10} {:>5}%", rarity, weight);
        }
    }
}

async fn cmd_watch(dir: PathBuf, seconds: u64) -> Result<()> {
    let sdk = AsyncMemePackSdk::builder().data_dir(dir).build().await?;
    for _ in 0..seconds {
        let state = sdk.state().await?;
        if !state.is_active {
            println!("Pack opportunities full ({}), nothing to wait for.", state.opportunities);
            break;
        }
        println!(
            "{} opportunities, next pack in {}",
            state.opportunities,
            state.formatted_remaining()
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    sdk.shutdown().await
}
