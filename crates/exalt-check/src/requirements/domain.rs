use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::item_id_from_link;

/// Canonical gear identifier (the wiki slug of an item, e.g. `staff-of-the-fundamental-core`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Equipment slot of a character. The catalog numbers these 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Weapon,
    Ability,
    Armor,
    Ring,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Weapon, Slot::Ability, Slot::Armor, Slot::Ring];

    pub const fn index(self) -> usize {
        match self {
            Slot::Weapon => 0,
            Slot::Ability => 1,
            Slot::Armor => 2,
            Slot::Ring => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Slot::Weapon => "weapon",
            Slot::Ability => "ability",
            Slot::Armor => "armor",
            Slot::Ring => "ring",
        }
    }

    /// Maps the catalog's numeric category onto a slot.
    pub fn from_category(category: u8) -> Option<Self> {
        match category {
            1 => Some(Slot::Weapon),
            2 => Some(Slot::Ability),
            3 => Some(Slot::Armor),
            4 => Some(Slot::Ring),
            _ => None,
        }
    }
}

/// Playable classes with their Exalted Lost Halls point requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Warrior,
    Paladin,
    Knight,
    Samurai,
    Ninja,
    Kensei,
    Rogue,
    Assassin,
    Trickster,
    Archer,
    Huntress,
    Bard,
    Wizard,
    Necromancer,
    Mystic,
    Priest,
    Sorcerer,
    Summoner,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 18] = [
        CharacterClass::Warrior,
        CharacterClass::Paladin,
        CharacterClass::Knight,
        CharacterClass::Samurai,
        CharacterClass::Ninja,
        CharacterClass::Kensei,
        CharacterClass::Rogue,
        CharacterClass::Assassin,
        CharacterClass::Trickster,
        CharacterClass::Archer,
        CharacterClass::Huntress,
        CharacterClass::Bard,
        CharacterClass::Wizard,
        CharacterClass::Necromancer,
        CharacterClass::Mystic,
        CharacterClass::Priest,
        CharacterClass::Sorcerer,
        CharacterClass::Summoner,
    ];

    /// Minimum points a loadout needs for an exalted run on this class.
    pub const fn exalted_threshold(self) -> i32 {
        match self {
            CharacterClass::Warrior => 0,
            CharacterClass::Paladin => 1,
            CharacterClass::Knight => 2,
            CharacterClass::Samurai => 3,
            CharacterClass::Ninja => 2,
            CharacterClass::Kensei => 3,
            CharacterClass::Rogue => 4,
            CharacterClass::Assassin => 3,
            CharacterClass::Trickster => 2,
            CharacterClass::Archer => 4,
            CharacterClass::Huntress => 4,
            CharacterClass::Bard => 4,
            CharacterClass::Wizard => 2,
            CharacterClass::Necromancer => 3,
            CharacterClass::Mystic => 2,
            CharacterClass::Priest => 5,
            CharacterClass::Sorcerer => 3,
            CharacterClass::Summoner => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CharacterClass::Warrior => "warrior",
            CharacterClass::Paladin => "paladin",
            CharacterClass::Knight => "knight",
            CharacterClass::Samurai => "samurai",
            CharacterClass::Ninja => "ninja",
            CharacterClass::Kensei => "kensei",
            CharacterClass::Rogue => "rogue",
            CharacterClass::Assassin => "assassin",
            CharacterClass::Trickster => "trickster",
            CharacterClass::Archer => "archer",
            CharacterClass::Huntress => "huntress",
            CharacterClass::Bard => "bard",
            CharacterClass::Wizard => "wizard",
            CharacterClass::Necromancer => "necromancer",
            CharacterClass::Mystic => "mystic",
            CharacterClass::Priest => "priest",
            CharacterClass::Sorcerer => "sorcerer",
            CharacterClass::Summoner => "summoner",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every class with its exalted point requirement.
pub fn exalted_thresholds() -> BTreeMap<CharacterClass, i32> {
    CharacterClass::ALL
        .into_iter()
        .map(|class| (class, class.exalted_threshold()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown character class '{0}'")]
pub struct UnknownClass(pub String);

impl FromStr for CharacterClass {
    type Err = UnknownClass;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.label() == normalized)
            .ok_or_else(|| UnknownClass(value.to_string()))
    }
}

/// Four equipped items in slot order. Unequipped slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    #[serde(default, deserialize_with = "deserialize_slot")]
    pub weapon: Option<ItemId>,
    #[serde(default, deserialize_with = "deserialize_slot")]
    pub ability: Option<ItemId>,
    #[serde(default, deserialize_with = "deserialize_slot")]
    pub armor: Option<ItemId>,
    #[serde(default, deserialize_with = "deserialize_slot")]
    pub ring: Option<ItemId>,
}

/// Accepts ids, wiki links or icon names; blank entries leave the slot unequipped.
fn deserialize_slot<'de, D>(deserializer: D) -> Result<Option<ItemId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(item_id_from_link))
}

impl Loadout {
    pub fn new(
        weapon: Option<ItemId>,
        ability: Option<ItemId>,
        armor: Option<ItemId>,
        ring: Option<ItemId>,
    ) -> Self {
        Self {
            weapon,
            ability,
            armor,
            ring,
        }
    }

    /// Builds a loadout from raw tokens, treating blank entries as unequipped.
    pub fn from_slots<S: AsRef<str>>(slots: [Option<S>; 4]) -> Self {
        let [weapon, ability, armor, ring] = slots.map(|slot| {
            slot.map(|value| value.as_ref().trim().to_string())
                .filter(|value| !value.is_empty())
                .map(ItemId)
        });
        Self::new(weapon, ability, armor, ring)
    }

    pub fn get(&self, slot: Slot) -> Option<&ItemId> {
        match slot {
            Slot::Weapon => self.weapon.as_ref(),
            Slot::Ability => self.ability.as_ref(),
            Slot::Armor => self.armor.as_ref(),
            Slot::Ring => self.ring.as_ref(),
        }
    }

    pub fn set(&mut self, slot: Slot, item: Option<ItemId>) {
        match slot {
            Slot::Weapon => self.weapon = item,
            Slot::Ability => self.ability = item,
            Slot::Armor => self.armor = item,
            Slot::Ring => self.ring = item,
        }
    }

    /// Slot/item pairs in slot order, including empty slots.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, Option<&ItemId>)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }

    /// First slot holding `item`, if any.
    pub fn position_of(&self, item: &ItemId) -> Option<Slot> {
        self.slots()
            .find(|(_, equipped)| *equipped == Some(item))
            .map(|(slot, _)| slot)
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.position_of(item).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().all(|(_, item)| item.is_none())
    }
}

/// One entry of the gear catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearItem {
    pub id: ItemId,
    pub name: String,
    pub slot: Option<Slot>,
    /// Class the item is restricted to. Only abilities carry one in practice.
    pub class: Option<CharacterClass>,
    pub icon: String,
}
