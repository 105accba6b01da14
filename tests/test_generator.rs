//! Pack generator tests: rarity sampling, stats, ordering and card fields.

mod common;

use common::{card, T0_MILLIS};
use memepack_sdk::booster::generator::{pick_rarity, sort_by_rarity_desc};
use memepack_sdk::booster::tables::{self, WeightTable};
use memepack_sdk::config::DEFAULT_PACK_TYPE;
use memepack_sdk::models::CardRarity;
use memepack_sdk::{ManualClock, PackGenerator};
use std::collections::HashMap;
use std::sync::Arc;

fn generator(seed: u64) -> PackGenerator {
    PackGenerator::seeded(seed, Arc::new(ManualClock::new(T0_MILLIS)))
}

// ---------------------------------------------------------------------------
// generate_pack
// ---------------------------------------------------------------------------

#[test]
fn zero_count_yields_empty_pack() {
    assert!(generator(1).generate_pack("pepe", 0).is_empty());
}

#[test]
fn pack_has_requested_size() {
    assert_eq!(generator(1).generate_pack("doge", 5).len(), 5);
    assert_eq!(generator(2).generate_pack("popcat", 37).len(), 37);
}

#[test]
fn pack_is_sorted_rarest_first() {
    let mut gen = generator(42);
    for count in 1..60 {
        for pack_type in ["doge", "popcat", "pepe", "nope"] {
            let pack = gen.generate_pack(pack_type, count);
            assert!(
                pack.windows(2).all(|w| w[0].rarity >= w[1].rarity),
                "pack not sorted: {:?}",
                pack.iter().map(|c| c.rarity).collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn stats_fall_within_rarity_ranges() {
    let mut gen = generator(3);
    for card in gen.generate_pack("pepe", 20_000) {
        let power = tables::power_range(card.rarity);
        let social = tables::social_score_range(card.rarity);
        assert!(power.contains(card.power), "{:?}", card);
        assert!(social.contains(card.social_score), "{:?}", card);
    }
}

#[test]
fn ids_are_time_based_with_small_offset() {
    let mut gen = generator(4);
    for card in gen.generate_pack("doge", 500) {
        assert!(card.id >= T0_MILLIS && card.id < T0_MILLIS + 1000);
    }
}

#[test]
fn names_and_images_come_from_pools() {
    let mut gen = generator(5);
    for card in gen.generate_pack("popcat", 500) {
        assert!(tables::CARD_NAMES.contains(&card.name.as_str()));
        assert!(tables::CARD_IMAGES.contains(&card.image.as_str()));
    }
}

#[test]
fn about_one_in_five_cards_is_nft() {
    let cards = generator(6).generate_pack("doge", 20_000);
    let nft = cards.iter().filter(|c| c.is_nft).count() as f64 / cards.len() as f64;
    assert!((nft - 0.2).abs() < 0.02, "NFT rate {}", nft);
}

#[test]
fn rarity_distribution_matches_pepe_table() {
    let n = 100_000;
    let cards = generator(7).generate_pack("pepe", n);

    let mut counts: HashMap<CardRarity, usize> = HashMap::new();
    for card in &cards {
        *counts.entry(card.rarity).or_insert(0) += 1;
    }

    for &(rarity, weight) in tables::weight_table("pepe") {
        let observed = *counts.get(&rarity).unwrap_or(&0) as f64 * 100.0 / n as f64;
        assert!(
            (observed - weight).abs() < 2.0,
            "{}: observed {:.2}%, expected {}%",
            rarity,
            observed,
            weight
        );
    }
}

#[test]
fn unknown_pack_type_uses_default_table() {
    let fallback = generator(8).generate_pack("not-a-pack", 200);
    let doge = generator(8).generate_pack("doge", 200);
    assert_eq!(fallback, doge);
}

#[test]
fn unknown_pack_type_resolves_to_configured_default() {
    let configured = tables::find_weight_table(DEFAULT_PACK_TYPE).expect("default pack has a table");
    assert_eq!(tables::weight_table("not-a-pack"), configured);
    assert_eq!(tables::weight_table(""), configured);
}

#[test]
fn same_seed_same_pack() {
    assert_eq!(
        generator(9).generate_pack("pepe", 5),
        generator(9).generate_pack("pepe", 5)
    );
}

// ---------------------------------------------------------------------------
// pick_rarity
// ---------------------------------------------------------------------------

#[test]
fn pick_rarity_walks_cumulative_weights() {
    let doge = tables::weight_table("doge");
    assert_eq!(pick_rarity(doge, 0.0), CardRarity::Common);
    assert_eq!(pick_rarity(doge, 49.99), CardRarity::Common);
    assert_eq!(pick_rarity(doge, 50.0), CardRarity::Common);
    assert_eq!(pick_rarity(doge, 50.01), CardRarity::Uncommon);
    assert_eq!(pick_rarity(doge, 80.5), CardRarity::Rare);
    assert_eq!(pick_rarity(doge, 96.0), CardRarity::Legendary);
    assert_eq!(pick_rarity(doge, 99.5), CardRarity::UltraRare);
    assert_eq!(pick_rarity(doge, 99.95), CardRarity::SuperRare);
}

#[test]
fn pick_rarity_gap_defaults_to_common() {
    let short: WeightTable = [
        (CardRarity::Common, 10.0),
        (CardRarity::Uncommon, 10.0),
        (CardRarity::Rare, 10.0),
        (CardRarity::Legendary, 10.0),
        (CardRarity::UltraRare, 10.0),
        (CardRarity::SuperRare, 40.0),
    ];
    assert_eq!(pick_rarity(&short, 89.0), CardRarity::SuperRare);
    assert_eq!(pick_rarity(&short, 95.0), CardRarity::Common);
}

#[test]
fn pick_rarity_follows_declaration_order() {
    // Same weights, different order: the roll lands on a different rarity.
    let reversed: WeightTable = [
        (CardRarity::SuperRare, 50.0),
        (CardRarity::Common, 50.0),
        (CardRarity::Uncommon, 0.0),
        (CardRarity::Rare, 0.0),
        (CardRarity::Legendary, 0.0),
        (CardRarity::UltraRare, 0.0),
    ];
    assert_eq!(pick_rarity(&reversed, 10.0), CardRarity::SuperRare);
    assert_eq!(pick_rarity(&reversed, 60.0), CardRarity::Common);
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[test]
fn weight_tables_sum_to_one_hundred() {
    for pack_type in tables::pack_types() {
        let total: f64 = tables::weight_table(pack_type).iter().map(|(_, w)| w).sum();
        assert!((total - 100.0).abs() < 1e-9, "{} sums to {}", pack_type, total);
    }
}

#[test]
fn stat_bases_increase_with_rarity() {
    for pair in CardRarity::ALL.windows(2) {
        assert!(tables::power_range(pair[0]).base < tables::power_range(pair[1]).base);
        assert!(
            tables::social_score_range(pair[0]).base < tables::social_score_range(pair[1]).base
        );
    }
}

#[test]
fn shop_packs_map_to_pack_types() {
    assert_eq!(tables::shop_pack_type("standard"), Some("pepe"));
    assert_eq!(tables::shop_pack_type("premium"), Some("doge"));
    assert_eq!(tables::shop_pack_type("legendary"), Some("popcat"));
    assert_eq!(tables::shop_pack_type("mystery"), None);
}

// ---------------------------------------------------------------------------
// Ordering and serialization
// ---------------------------------------------------------------------------

#[test]
fn sort_keeps_generation_order_within_a_rarity() {
    let mut cards = vec![
        card(1, CardRarity::Common),
        card(2, CardRarity::Rare),
        card(3, CardRarity::Common),
        card(4, CardRarity::SuperRare),
        card(5, CardRarity::Rare),
    ];
    sort_by_rarity_desc(&mut cards);
    let ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4, 2, 5, 1, 3]);
}

#[test]
fn card_serializes_with_front_end_field_names() {
    let mut c = card(17, CardRarity::UltraRare);
    c.is_nft = true;
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["id"], 17);
    assert_eq!(json["rarity"], "UltraRare");
    assert_eq!(json["socialScore"], 50);
    assert_eq!(json["isNFT"], true);
}

#[test]
fn rarity_parses_case_insensitively() {
    assert_eq!("superrare".parse::<CardRarity>().unwrap(), CardRarity::SuperRare);
    assert_eq!(" Rare ".parse::<CardRarity>().unwrap(), CardRarity::Rare);
    assert!("mythic".parse::<CardRarity>().is_err());
    assert_eq!(CardRarity::Legendary.rank(), 3);
}
