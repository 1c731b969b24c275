use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Something Alice can pick up (or become) along the way.
///
/// Variants are declared in the alphabetical order of their tags, so a
/// `BTreeSet<Item>` iterates in the same order as the sorted tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Item {
    GardenSecret,
    MushroomSlice,
    MusicNote,
    PaintedRose,
    Shrunk,
    Small,
    Tall,
}

impl Item {
    pub fn tag(self) -> &'static str {
        match self {
            Item::GardenSecret => "garden-secret",
            Item::MushroomSlice => "mushroom-slice",
            Item::MusicNote => "music-note",
            Item::PaintedRose => "painted-rose",
            Item::Shrunk => "shrunk",
            Item::Small => "small",
            Item::Tall => "tall",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single state change requested by the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Gain(Item),
    Consume(Item),
    Curiosity(i32),
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(Hash))]
pub struct GameState {
    inventory: BTreeSet<Item>,
    /// Boldness meter; a positive value opens some favourable guards.
    curiosity: i32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding an item already held is a no-op.
    pub fn add(&mut self, item: Item) {
        self.inventory.insert(item);
    }

    /// Removing an item not held is a no-op.
    pub fn remove(&mut self, item: Item) {
        self.inventory.remove(&item);
    }

    pub fn contains(&self, item: Item) -> bool {
        self.inventory.contains(&item)
    }

    pub fn adjust_curiosity(&mut self, delta: i32) {
        self.curiosity += delta;
    }

    pub fn curiosity(&self) -> i32 {
        self.curiosity
    }

    /// Back to an empty inventory and zero curiosity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Gain(item) => self.add(item),
            Effect::Consume(item) => self.remove(item),
            Effect::Curiosity(delta) => self.adjust_curiosity(delta),
        }
    }

    /// Sorted, duplicate-free item tags.
    pub fn inventory_tags(&self) -> Vec<&'static str> {
        self.inventory.iter().map(|item| item.tag()).collect()
    }

    /// The `Inventory: ...` line shown at the end of a round.
    pub fn inventory_line(&self) -> String {
        if self.inventory.is_empty() {
            "Inventory: empty".to_string()
        } else {
            format!("Inventory: {}", self.inventory_tags().join(", "))
        }
    }
}
