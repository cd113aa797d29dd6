use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::domain::{CharacterClass, GearItem, ItemId, Loadout, Slot};
use super::reskin::ReskinResolver;

/// Point value carried by each tier, highest first. Scoring walks tiers in this order.
pub const TIER_POINTS: [i32; 4] = [5, 3, 2, 1];

/// A single qualifying condition inside a composite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Condition {
    Item(ItemId),
    Class(CharacterClass),
}

/// Rule awarding a tier's points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRule {
    Simple(ItemId),
    /// All conditions must hold at once. `required_count` is the count declared by the row.
    Special {
        required_count: usize,
        conditions: Vec<Condition>,
    },
}

impl PointRule {
    pub fn describe(&self) -> String {
        match self {
            PointRule::Simple(item) => item.to_string(),
            PointRule::Special { conditions, .. } => conditions
                .iter()
                .map(|condition| match condition {
                    Condition::Item(item) => item.to_string(),
                    Condition::Class(class) => format!("class {class}"),
                })
                .collect::<Vec<_>>()
                .join(" + "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointTier {
    pub points: i32,
    pub rules: Vec<PointRule>,
}

/// Four items which together satisfy any class requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetBonus {
    pub items: [ItemId; 4],
}

impl SetBonus {
    /// Every slot must be equipped and every equipped item must belong to the set.
    pub fn matches(&self, loadout: &Loadout) -> bool {
        loadout
            .slots()
            .all(|(_, item)| item.is_some_and(|item| self.items.contains(item)))
    }
}

/// Catalog lookups keyed by canonical item id.
#[derive(Debug, Clone, Default)]
pub struct GearCatalog {
    items: HashMap<ItemId, GearItem>,
}

impl GearCatalog {
    pub fn new(items: impl IntoIterator<Item = GearItem>) -> Self {
        let mut by_id = HashMap::new();
        for item in items {
            if by_id.contains_key(&item.id) {
                tracing::debug!(item = %item.id, "duplicate catalog entry, keeping first");
                continue;
            }
            by_id.insert(item.id.clone(), item);
        }
        Self { items: by_id }
    }

    pub fn get(&self, item: &ItemId) -> Option<&GearItem> {
        self.items.get(item)
    }

    pub fn slot_of(&self, item: &ItemId) -> Option<Slot> {
        self.items.get(item).and_then(|entry| entry.slot)
    }

    pub fn class_of(&self, item: &ItemId) -> Option<CharacterClass> {
        self.items.get(item).and_then(|entry| entry.class)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The complete, read-only rulebook for Exalted Lost Halls runs.
#[derive(Debug, Clone)]
pub struct RuleTable {
    banned: HashSet<ItemId>,
    penalties: HashSet<ItemId>,
    tiers: Vec<PointTier>,
    set_bonuses: Vec<SetBonus>,
    catalog: GearCatalog,
    reskins: ReskinResolver,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    pub fn is_banned(&self, item: &ItemId) -> bool {
        self.banned.contains(item)
    }

    pub fn is_penalized(&self, item: &ItemId) -> bool {
        self.penalties.contains(item)
    }

    pub fn tiers(&self) -> &[PointTier] {
        &self.tiers
    }

    pub fn set_bonuses(&self) -> &[SetBonus] {
        &self.set_bonuses
    }

    pub fn catalog(&self) -> &GearCatalog {
        &self.catalog
    }

    pub fn reskins(&self) -> &ReskinResolver {
        &self.reskins
    }

    pub fn threshold(&self, class: CharacterClass) -> i32 {
        class.exalted_threshold()
    }

    pub fn summary(&self) -> RuleTableSummary {
        RuleTableSummary {
            banned: self.banned.len(),
            penalties: self.penalties.len(),
            tier_rules: self.tiers.iter().map(|tier| tier.rules.len()).collect(),
            set_bonuses: self.set_bonuses.len(),
            catalog_items: self.catalog.len(),
            reskins: self.reskins.len(),
        }
    }
}

/// Section sizes reported once a table is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTableSummary {
    pub banned: usize,
    pub penalties: usize,
    pub tier_rules: Vec<usize>,
    pub set_bonuses: usize,
    pub catalog_items: usize,
    pub reskins: usize,
}

/// Collects table sections; `build` yields the immutable table.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    banned: HashSet<ItemId>,
    penalties: HashSet<ItemId>,
    tiers: [Vec<PointRule>; 4],
    set_bonuses: Vec<SetBonus>,
    catalog: Vec<GearItem>,
    reskins: HashMap<ItemId, ItemId>,
}

impl RuleTableBuilder {
    pub fn banned(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.banned.extend(items);
        self
    }

    pub fn penalties(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.penalties.extend(items);
        self
    }

    /// Appends rules to the tier worth `points`. Values outside 5/3/2/1 are ignored.
    pub fn tier(mut self, points: i32, rules: impl IntoIterator<Item = PointRule>) -> Self {
        match TIER_POINTS.iter().position(|value| *value == points) {
            Some(index) => self.tiers[index].extend(rules),
            None => tracing::warn!(points, "ignoring rules for unknown point tier"),
        }
        self
    }

    pub fn set_bonuses(mut self, sets: impl IntoIterator<Item = SetBonus>) -> Self {
        self.set_bonuses.extend(sets);
        self
    }

    pub fn catalog(mut self, items: impl IntoIterator<Item = GearItem>) -> Self {
        self.catalog.extend(items);
        self
    }

    pub fn reskins(mut self, pairs: impl IntoIterator<Item = (ItemId, ItemId)>) -> Self {
        self.reskins.extend(pairs);
        self
    }

    pub fn build(self) -> RuleTable {
        let tiers = TIER_POINTS
            .into_iter()
            .zip(self.tiers)
            .map(|(points, rules)| PointTier { points, rules })
            .collect();

        RuleTable {
            banned: self.banned,
            penalties: self.penalties,
            tiers,
            set_bonuses: self.set_bonuses,
            catalog: GearCatalog::new(self.catalog),
            reskins: ReskinResolver::new(self.reskins),
        }
    }
}
