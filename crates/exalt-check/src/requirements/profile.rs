use serde::{Deserialize, Serialize};

use super::domain::{CharacterClass, ItemId, Loadout};

const MAX_NAME_LEN: usize = 10;

/// Converts a raw gear reference into its item id.
///
/// Accepts `/wiki/<id>` links, absolute wiki URLs and `<id>.png` image names.
pub fn item_id_from_link(link: &str) -> ItemId {
    let trimmed = link.trim();
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    let segment = without_query
        .rsplit('/')
        .next()
        .unwrap_or(without_query);
    let id = segment.strip_suffix(".png").unwrap_or(segment);
    ItemId(id.to_ascii_lowercase())
}

/// In-game player name as accepted by profile lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerNameError {
    #[error("player name is empty")]
    Empty,
    #[error("player name exceeds 10 characters")]
    TooLong,
    #[error("player name may only contain ASCII letters")]
    InvalidCharacters,
}

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, PlayerNameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(PlayerNameError::Empty);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(PlayerNameError::TooLong);
        }
        if !name.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(PlayerNameError::InvalidCharacters);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = PlayerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}

/// A character as returned by a player profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    /// Class name as reported by the profile. Unknown names evaluate without a class.
    #[serde(default)]
    pub class: Option<String>,
    /// Raw item references in slot order. Missing or blank entries are unequipped.
    #[serde(default)]
    pub equipment: Vec<Option<String>>,
    #[serde(default)]
    pub stats_maxed: bool,
}

impl CharacterSnapshot {
    pub fn character_class(&self) -> Option<CharacterClass> {
        let raw = self.class.as_deref()?;
        match raw.parse() {
            Ok(class) => Some(class),
            Err(error) => {
                tracing::warn!(%error, "profile character has an unrecognized class");
                None
            }
        }
    }

    pub fn loadout(&self) -> Loadout {
        let mut slots: [Option<ItemId>; 4] = Default::default();
        for (slot, raw) in slots.iter_mut().zip(&self.equipment) {
            *slot = raw
                .as_deref()
                .filter(|link| !link.trim().is_empty())
                .map(item_id_from_link);
        }
        if self.equipment.len() > slots.len() {
            tracing::debug!(
                extra = self.equipment.len() - slots.len(),
                "ignoring equipment beyond the four gear slots"
            );
        }
        let [weapon, ability, armor, ring] = slots;
        Loadout::new(weapon, ability, armor, ring)
    }
}
