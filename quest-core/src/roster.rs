//! Avatars and warrior assets

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{AvatarId, WarriorId};

/// Elements an avatar or warrior can carry
pub const ELEMENTS: &[&str] = &["Fire", "Water", "Earth", "Air", "Lightning", "Ice"];

/// Stock avatar display names used when generating a class roster
pub const AVATAR_NAMES: &[&str] = &[
    "El Fuego",
    "La Tormenta",
    "El Rayo",
    "La Sombra",
    "El Lobo",
    "La Serpiente",
    "El Aguila",
    "La Pantera",
    "El Tigre",
    "La Estrella",
];

/// Stock warrior names used when generating assets and store stock
pub const WARRIOR_NAMES: &[&str] = &[
    "Thunder", "Shadow", "Blaze", "Frost", "Storm", "Viper", "Titan", "Phantom", "Ember", "Granite",
];

pub const ABILITIES: &[&str] = &[
    "Fire Strike",
    "Water Shield",
    "Earth Slam",
    "Wind Slash",
    "Lightning Bolt",
    "Ice Armor",
];

pub const SUPER_POWERS: &[&str] = &[
    "Invisibility",
    "Super Speed",
    "Telepathy",
    "Time Freeze",
    "Healing Touch",
];

pub const PERSONALITIES: &[&str] = &["Brave", "Clever", "Loyal", "Fierce", "Calm"];

pub const WEAKNESSES: &[&str] = &["Darkness", "Silence", "Cold", "Heights", "Water"];

pub const ANIMAL_ALLIES: &[&str] = &["Wolf", "Eagle", "Jaguar", "Condor", "Llama"];

/// A student's avatar: profile fields plus coins and level
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: AvatarId,
    pub name: String,
    pub avatar_name: String,
    pub thumbnail: String,
    pub coins: i64,
    pub level: u32,
    pub required_level: u32,
    pub element: String,
    pub super_power: String,
    pub personality: String,
    pub weakness: String,
    pub animal_ally: String,
    pub mascot: String,
    /// Derived: number of owned assets (filled when listing)
    #[serde(default)]
    pub asset_count: usize,
    /// Derived: avatar level plus the sum of owned warrior levels
    #[serde(default)]
    pub total_power: u32,
    /// Derived: 1-based class rank by total power, 0 when unranked
    #[serde(default)]
    pub rank: u32,
}

/// Lifecycle of a warrior asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarriorStatus {
    /// In store stock, purchasable
    Store,
    /// Owned by an avatar and deployable
    Warrior,
    /// Defeated in battle, no longer deployable
    Rip,
}

/// A warrior asset: combat stats, ownership and store-lock state
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warrior {
    pub id: WarriorId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attack: i32,
    pub defense: i32,
    pub healing: i32,
    pub base_attack: i32,
    pub base_defense: i32,
    pub base_healing: i32,
    pub power: i32,
    pub endurance: i32,
    pub level: u32,
    pub required_level: u32,
    pub cost: i64,
    pub ability: String,
    pub health: i32,
    pub stamina: i32,
    pub description: String,
    pub xp: i64,
    pub xp_required: i64,
    pub status: WarriorStatus,
    /// Owning avatar, None while in store stock
    pub avatar_id: Option<AvatarId>,
    pub is_locked: bool,
    pub is_locked_by: Option<AvatarId>,
    pub is_unlocked_for: Option<AvatarId>,
    pub thumbnail: String,
}

impl Warrior {
    /// Deployable on a game board
    pub fn is_deployable(&self) -> bool {
        self.status == WarriorStatus::Warrior
    }
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// Generate a random avatar profile for the given student name
pub fn random_avatar<R: Rng>(rng: &mut R, id: AvatarId, name: &str) -> Avatar {
    Avatar {
        id,
        name: name.to_string(),
        avatar_name: pick(rng, AVATAR_NAMES).to_string(),
        thumbnail: String::new(),
        coins: rng.gen_range(50..=200),
        level: rng.gen_range(1..=3),
        required_level: 10,
        element: pick(rng, ELEMENTS).to_string(),
        super_power: pick(rng, SUPER_POWERS).to_string(),
        personality: pick(rng, PERSONALITIES).to_string(),
        weakness: pick(rng, WEAKNESSES).to_string(),
        animal_ally: pick(rng, ANIMAL_ALLIES).to_string(),
        mascot: pick(rng, ANIMAL_ALLIES).to_string(),
        asset_count: 0,
        total_power: 0,
        rank: 0,
    }
}

/// Generate a random warrior. Base stats are rolled once and copied into the
/// live stats so battle damage can drain health while base values persist.
pub fn random_warrior<R: Rng>(rng: &mut R, id: WarriorId, status: WarriorStatus) -> Warrior {
    let level = rng.gen_range(1..=10);
    let attack = rng.gen_range(1..=100);
    let defense = rng.gen_range(1..=100);
    let healing = rng.gen_range(1..=100);
    Warrior {
        id,
        name: pick(rng, WARRIOR_NAMES).to_string(),
        kind: pick(rng, ELEMENTS).to_lowercase(),
        attack,
        defense,
        healing,
        base_attack: attack,
        base_defense: defense,
        base_healing: healing,
        power: attack + defense,
        endurance: rng.gen_range(1..=100),
        level,
        required_level: level,
        cost: (level as i64) * 10 + rng.gen_range(0..50),
        ability: pick(rng, ABILITIES).to_string(),
        health: 100,
        stamina: 100,
        description: String::new(),
        xp: 0,
        xp_required: 100,
        status,
        avatar_id: None,
        is_locked: false,
        is_locked_by: None,
        is_unlocked_for: None,
        thumbnail: String::new(),
    }
}

/// Total power of an avatar: its level plus the levels of its owned warriors
pub fn total_power(avatar: &Avatar, owned: &[&Warrior]) -> u32 {
    avatar.level + owned.iter().map(|w| w.level).sum::<u32>()
}

/// Fill in asset counts, total power and class ranks.
///
/// Ranks are assigned by descending total power, 1-based. When every avatar
/// has the same total power nobody gets a rank, so a fresh class does not
/// show an arbitrary ordering.
pub fn rank_by_power(avatars: &mut [Avatar], warriors: &[Warrior]) {
    for avatar in avatars.iter_mut() {
        let owned: Vec<&Warrior> = warriors
            .iter()
            .filter(|w| w.avatar_id == Some(avatar.id) && w.status != WarriorStatus::Store)
            .collect();
        avatar.asset_count = owned.len();
        avatar.total_power = total_power(avatar, &owned);
    }

    let all_equal = avatars
        .windows(2)
        .all(|pair| pair[0].total_power == pair[1].total_power);
    if all_equal {
        for avatar in avatars.iter_mut() {
            avatar.rank = 0;
        }
        return;
    }

    let mut order: Vec<usize> = (0..avatars.len()).collect();
    order.sort_by(|&a, &b| avatars[b].total_power.cmp(&avatars[a].total_power));
    for (rank, idx) in order.into_iter().enumerate() {
        avatars[idx].rank = rank as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn avatar(id: AvatarId, level: u32) -> Avatar {
        let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
        let mut a = random_avatar(&mut rng, id, "test");
        a.level = level;
        a
    }

    fn owned_warrior(id: WarriorId, owner: AvatarId, level: u32) -> Warrior {
        let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
        let mut w = random_warrior(&mut rng, id, WarriorStatus::Warrior);
        w.avatar_id = Some(owner);
        w.level = level;
        w
    }

    #[test]
    fn test_random_warrior_stats_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for id in 0..50 {
            let w = random_warrior(&mut rng, id, WarriorStatus::Store);
            assert!((1..=10).contains(&w.level));
            assert!((1..=100).contains(&w.attack));
            assert!((1..=100).contains(&w.defense));
            assert_eq!(w.attack, w.base_attack);
            assert_eq!(w.health, 100);
            assert!(w.cost >= 10);
        }
    }

    #[test]
    fn test_ranks_by_total_power() {
        let mut avatars = vec![avatar(1, 2), avatar(2, 5), avatar(3, 1)];
        let warriors = vec![owned_warrior(10, 1, 8), owned_warrior(11, 3, 2)];
        rank_by_power(&mut avatars, &warriors);

        // avatar 1: 2 + 8 = 10, avatar 2: 5, avatar 3: 1 + 2 = 3
        assert_eq!(avatars[0].total_power, 10);
        assert_eq!(avatars[0].rank, 1);
        assert_eq!(avatars[1].rank, 2);
        assert_eq!(avatars[2].rank, 3);
        assert_eq!(avatars[0].asset_count, 1);
    }

    #[test]
    fn test_equal_power_gets_no_ranks() {
        let mut avatars = vec![avatar(1, 3), avatar(2, 3)];
        rank_by_power(&mut avatars, &[]);
        assert_eq!(avatars[0].rank, 0);
        assert_eq!(avatars[1].rank, 0);
    }

    #[test]
    fn test_store_stock_does_not_count_as_asset() {
        let mut avatars = vec![avatar(1, 2), avatar(2, 1)];
        let mut stock = owned_warrior(20, 1, 9);
        stock.status = WarriorStatus::Store;
        rank_by_power(&mut avatars, &[stock]);
        assert_eq!(avatars[0].asset_count, 0);
        assert_eq!(avatars[0].total_power, 2);
    }
}
