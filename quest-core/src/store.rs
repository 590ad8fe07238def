//! Store listings and the two-phase purchase flow

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::roster::{Avatar, Warrior, WarriorStatus};
use crate::{AvatarId, WarriorId};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("no units of that warrior are in stock")]
    OutOfStock,
    #[error("all remaining units are locked by another avatar")]
    LockedByOther,
    #[error("not enough coins: have {coins}, need {cost}")]
    NotEnoughCoins { coins: i64, cost: i64 },
}

/// A store listing: one row per warrior name, aggregating its stock
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Representative unit (lowest id) whose stats the listing shows
    #[serde(flatten)]
    pub warrior: Warrior,
    pub available_units: usize,
}

fn in_stock(warrior: &Warrior) -> bool {
    warrior.status == WarriorStatus::Store && warrior.avatar_id.is_none()
}

/// Group store stock into listings, one per warrior name, sorted by name.
/// Each listing shows the lowest-id unit and carries the strongest lock
/// state found across its units so the storefront can badge it.
pub fn listings<'a, I>(stock: I) -> Vec<Listing>
where
    I: IntoIterator<Item = &'a Warrior>,
{
    let mut groups: BTreeMap<String, Vec<&Warrior>> = BTreeMap::new();
    for warrior in stock.into_iter().filter(|w| in_stock(w)) {
        groups.entry(warrior.name.clone()).or_default().push(warrior);
    }

    groups
        .into_values()
        .map(|mut units| {
            units.sort_by_key(|w| w.id);
            let mut listing = units[0].clone();
            listing.is_locked = units.iter().any(|w| w.is_locked);
            listing.is_locked_by = units.iter().find_map(|w| w.is_locked_by);
            listing.is_unlocked_for = units.iter().find_map(|w| w.is_unlocked_for);
            Listing {
                warrior: listing,
                available_units: units.len(),
            }
        })
        .collect()
}

/// Pick the unit of `name` the buyer should receive.
///
/// Units explicitly unlocked for the buyer come first, then any unlocked
/// unit. If every remaining unit is locked by someone else the purchase is
/// refused rather than handing over a reserved unit.
pub fn select_unit<'a, I>(stock: I, name: &str, buyer: AvatarId) -> Result<WarriorId, StoreError>
where
    I: IntoIterator<Item = &'a Warrior>,
{
    let mut units: Vec<&Warrior> = stock
        .into_iter()
        .filter(|w| in_stock(w) && w.name == name)
        .collect();
    if units.is_empty() {
        return Err(StoreError::OutOfStock);
    }
    units.sort_by_key(|w| w.id);

    if let Some(unit) = units.iter().find(|w| w.is_unlocked_for == Some(buyer)) {
        return Ok(unit.id);
    }
    if let Some(unit) = units
        .iter()
        .find(|w| w.is_locked_by.is_none() || w.is_locked_by == Some(buyer))
    {
        return Ok(unit.id);
    }
    Err(StoreError::LockedByOther)
}

/// Outcome of a completed purchase
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub warrior_id: WarriorId,
    pub name: String,
    pub coins_left: i64,
}

/// Charge the buyer and hand the unit over: it becomes an owned, deployable
/// warrior with lock state cleared.
pub fn complete_purchase(buyer: &mut Avatar, unit: &mut Warrior) -> Result<Receipt, StoreError> {
    if buyer.coins < unit.cost {
        return Err(StoreError::NotEnoughCoins {
            coins: buyer.coins,
            cost: unit.cost,
        });
    }
    buyer.coins -= unit.cost;
    unit.avatar_id = Some(buyer.id);
    unit.status = WarriorStatus::Warrior;
    unit.is_locked = false;
    unit.is_locked_by = None;
    unit.is_unlocked_for = None;
    Ok(Receipt {
        warrior_id: unit.id,
        name: unit.name.clone(),
        coins_left: buyer.coins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{random_avatar, random_warrior};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stock_unit(id: WarriorId, name: &str) -> Warrior {
        let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
        let mut w = random_warrior(&mut rng, id, WarriorStatus::Store);
        w.name = name.to_string();
        w.cost = 50;
        w
    }

    fn buyer(id: AvatarId, coins: i64) -> Avatar {
        let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
        let mut a = random_avatar(&mut rng, id, "buyer");
        a.coins = coins;
        a
    }

    #[test]
    fn test_listings_group_by_name() {
        let stock = vec![
            stock_unit(3, "Thunder"),
            stock_unit(1, "Thunder"),
            stock_unit(2, "Blaze"),
        ];
        let listings = listings(&stock);
        assert_eq!(listings.len(), 2);
        // name-sorted, representative unit has the lowest id
        assert_eq!(listings[0].warrior.name, "Blaze");
        assert_eq!(listings[1].warrior.name, "Thunder");
        assert_eq!(listings[1].warrior.id, 1);
        assert_eq!(listings[1].available_units, 2);
    }

    #[test]
    fn test_listings_skip_owned_units() {
        let mut owned = stock_unit(1, "Thunder");
        owned.status = WarriorStatus::Warrior;
        owned.avatar_id = Some(5);
        assert!(listings(&[owned]).is_empty());
    }

    #[test]
    fn test_select_prefers_unlocked_for_buyer() {
        let mut reserved = stock_unit(2, "Thunder");
        reserved.is_locked = true;
        reserved.is_locked_by = Some(9);
        reserved.is_unlocked_for = Some(5);
        let stock = vec![stock_unit(1, "Thunder"), reserved];
        assert_eq!(select_unit(&stock, "Thunder", 5), Ok(2));
        // another buyer gets the free unit instead
        assert_eq!(select_unit(&stock, "Thunder", 6), Ok(1));
    }

    #[test]
    fn test_select_refuses_foreign_locks() {
        let mut locked = stock_unit(1, "Thunder");
        locked.is_locked = true;
        locked.is_locked_by = Some(9);
        let stock = vec![locked];
        assert_eq!(select_unit(&stock, "Thunder", 5), Err(StoreError::LockedByOther));
        assert_eq!(select_unit(&stock, "Blaze", 5), Err(StoreError::OutOfStock));
    }

    #[test]
    fn test_complete_purchase() {
        let mut avatar = buyer(5, 120);
        let mut unit = stock_unit(1, "Thunder");
        unit.is_locked = true;
        unit.is_locked_by = Some(5);
        let receipt = complete_purchase(&mut avatar, &mut unit).unwrap();
        assert_eq!(receipt.coins_left, 70);
        assert_eq!(avatar.coins, 70);
        assert_eq!(unit.avatar_id, Some(5));
        assert_eq!(unit.status, WarriorStatus::Warrior);
        assert!(!unit.is_locked);
        assert_eq!(unit.is_locked_by, None);
    }

    #[test]
    fn test_purchase_needs_coins() {
        let mut avatar = buyer(5, 10);
        let mut unit = stock_unit(1, "Thunder");
        assert_eq!(
            complete_purchase(&mut avatar, &mut unit),
            Err(StoreError::NotEnoughCoins { coins: 10, cost: 50 })
        );
        assert_eq!(avatar.coins, 10);
        assert_eq!(unit.status, WarriorStatus::Store);
    }
}
