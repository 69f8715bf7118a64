//! Statically defined store items.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Rank,
    CurrencyPack,
    Kit,
    Bundle,
}

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Smallest currency unit (IDR has no minor unit)
    pub price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<&'static str>,
    pub category: Category,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
    pub perks: &'static [&'static str],
}

const fn item(
    id: &'static str,
    name: &'static str,
    category: Category,
    price: u64,
    icon: &'static str,
    description: &'static str,
    perks: &'static [&'static str],
) -> CatalogItem {
    CatalogItem {
        id,
        name,
        description,
        price,
        original_price: None,
        discount: None,
        category,
        icon,
        badge: None,
        perks,
    }
}

impl CatalogItem {
    const fn was(mut self, original_price: u64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    const fn discounted(mut self, label: &'static str) -> Self {
        self.discount = Some(label);
        self
    }

    const fn badge(mut self, badge: &'static str) -> Self {
        self.badge = Some(badge);
        self
    }
}

#[rustfmt::skip]
static CATALOG: [CatalogItem; 15] = [
    item("novice", "Novice", Category::Rank, 15_000, "shield",
        "Perfect for new players starting their journey",
        &["Chat Colors & Formatting", "Join Full Server Priority", "2x Daily Rewards",
          "Basic Kit Access", "/nick Command", "Custom Join Message"])
        .was(20_000).discounted("25%").badge("STARTER"),
    item("elite", "Elite", Category::Rank, 40_000, "star",
        "Advanced features for dedicated players",
        &["All Novice Perks", "Private Warps (5 slots)", "3x Daily Rewards", "Elite Kit Access",
          "Particle Effects", "Priority Support", "Custom Prefix", "Exclusive Cosmetics"])
        .was(50_000).discounted("20%").badge("POPULAR"),
    item("legend", "Legend", Category::Rank, 90_000, "crown",
        "Ultimate gaming experience with premium benefits",
        &["All Elite Perks", "Unlimited Private Warps", "5x Daily Rewards", "Legend Kit Access",
          "Custom Join Messages", "Exclusive Cosmetics", "VIP Discord Access",
          "Monthly Bonus Items", "Priority Queue"])
        .was(100_000).discounted("10%").badge("PREMIUM"),
    item("coins-1k", "1,000 Ardentia Coins", Category::CurrencyPack, 10_000, "coins",
        "Perfect starter pack for new players", &["+100 Bonus Coins"]),
    item("coins-5k", "5,000 Ardentia Coins", Category::CurrencyPack, 45_000, "coins",
        "Great value for regular players", &["+750 Bonus Coins"])
        .was(50_000).badge("POPULAR"),
    item("coins-10k", "10,000 Ardentia Coins", Category::CurrencyPack, 85_000, "coins",
        "Best value for serious gamers", &["+2,000 Bonus Coins"])
        .was(100_000),
    item("coins-25k", "25,000 Ardentia Coins", Category::CurrencyPack, 200_000, "coins",
        "Ultimate coin package", &["+7,500 Bonus Coins"])
        .was(250_000),
    item("starter-kit", "Starter Kit", Category::Kit, 5_000, "package",
        "Basic tools and food for beginners", &["Iron Tools", "Food Stack", "Basic Armor"]),
    item("diamond-gear", "Diamond Gear Set", Category::Kit, 25_000, "sword",
        "Complete enchanted diamond armor and weapons",
        &["Diamond Armor Set", "Enchanted Sword", "Shield"]),
    item("builder-kit", "Builder Kit", Category::Kit, 15_000, "pickaxe",
        "Essential tools and blocks for building",
        &["Building Blocks", "Tools", "Decorative Items"]),
    item("legendary-crate", "Legendary Crate", Category::Kit, 35_000, "gem",
        "Rare items and exclusive rewards",
        &["Mystery Items", "Rare Enchants", "Exclusive Cosmetics"]),
    item("pvp-kit", "PvP Master Kit", Category::Kit, 30_000, "trophy",
        "Everything you need for PvP dominance", &["PvP Gear", "Potions", "Special Weapons"]),
    item("explorer-kit", "Explorer Kit", Category::Kit, 20_000, "zap",
        "Perfect for adventurers and explorers", &["Travel Gear", "Maps", "Survival Tools"]),
    item("monthly-pass", "Monthly VIP Pass", Category::Bundle, 50_000, "heart",
        "One month of VIP benefits and daily rewards",
        &["Daily Login Rewards", "VIP Chat", "Exclusive Events", "2x XP Boost"])
        .was(75_000),
    item("season-pass", "Season Battle Pass", Category::Bundle, 35_000, "award",
        "Unlock exclusive rewards throughout the season",
        &["100+ Rewards", "Exclusive Skins", "Special Emotes", "Bonus XP"]),
];

pub fn all() -> &'static [CatalogItem] {
    &CATALOG
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static CatalogItem> {
    CATALOG.iter().filter(move |item| item.category == category)
}

pub fn find(id: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn discounts_are_below_original_price() {
        for item in all() {
            if let Some(original) = item.original_price {
                assert!(item.price < original, "{} is not discounted", item.id);
            }
        }
    }

    #[test]
    fn every_category_is_stocked() {
        assert_eq!(by_category(Category::Rank).count(), 3);
        assert_eq!(by_category(Category::CurrencyPack).count(), 4);
        assert_eq!(by_category(Category::Kit).count(), 6);
        assert_eq!(by_category(Category::Bundle).count(), 2);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find("elite").map(|item| item.price), Some(40_000));
        assert!(find("admin").is_none());
    }
}
