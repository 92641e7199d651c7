//! Player state store.
//!
//! One serde-serializable tree owns every resource amount and bookkeeping
//! record. Currencies in [`crate::registry`] are views over fields in here;
//! each section defaults on load so older saves keep deserializing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::decimal::Decimal;
use crate::effects::{BonusSource, GameRules};
use crate::registry;

const ANTIMATTER_DIMENSION_TIERS: usize = 8;
const MATTER_DIMENSION_TIERS: usize = 4;
const ACTIVE_GLYPH_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlayerState {
    pub antimatter: Decimal,
    pub infinities: Decimal,
    pub infinities_banked: Decimal,
    pub infinity_points: Decimal,
    pub infinity_power: Decimal,
    pub eternities: Decimal,
    pub eternity_points: Decimal,
    pub time_shards: Decimal,
    pub realities: f64,
    pub records: Records,
    pub achievement_checks: AchievementChecks,
    pub timestudy: TimeStudyState,
    pub dilation: DilationState,
    pub reality: RealityState,
    pub celestials: Celestials,
    pub antimatter_dimensions: Vec<AntimatterDimension>,
    pub challenge: ChallengeState,
    pub unlocks: Unlocks,
}

impl PlayerState {
    /// Fresh save: dimension slots allocated and every currency at its reset floor.
    #[must_use]
    pub fn new_game(rules: &dyn GameRules) -> Self {
        let mut state = Self::default();
        state.ensure_slots();
        for currency in registry::all() {
            currency.reset(&mut state, rules);
        }
        state
    }

    /// Grow dimension and glyph slot lists to their full length. Existing
    /// entries are kept.
    pub fn ensure_slots(&mut self) {
        if self.antimatter_dimensions.len() < ANTIMATTER_DIMENSION_TIERS {
            self.antimatter_dimensions
                .resize(ANTIMATTER_DIMENSION_TIERS, AntimatterDimension::default());
        }
        let matter = &mut self.celestials.laitela.matter_dimensions;
        if matter.len() < MATTER_DIMENSION_TIERS {
            matter.resize(MATTER_DIMENSION_TIERS, MatterDimension::default());
        }
        let glyphs = &mut self.reality.glyphs.active;
        if glyphs.len() < ACTIVE_GLYPH_SLOTS {
            glyphs.resize(ACTIVE_GLYPH_SLOTS, None);
        }
    }

    /// Load a state from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a player state.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the state to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Historical peaks; every field here only ever rises between resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Records {
    pub total_antimatter: Decimal,
    pub this_infinity: InfinityRecords,
    pub this_eternity: EternityRecords,
    pub this_reality: RealityRecords,
    pub best_reality: BestRealityRecords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InfinityRecords {
    pub max_am: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EternityRecords {
    pub max_am: Decimal,
    pub max_ip: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RealityRecords {
    pub max_am: Decimal,
    pub max_ip: Decimal,
    pub max_ep: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BestRealityRecords {
    pub best_ep: Decimal,
    /// Glyphs equipped when `best_ep` was set.
    pub best_ep_set: Vec<Glyph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementChecks {
    pub no_antimatter_produced: bool,
}

impl Default for AchievementChecks {
    fn default() -> Self {
        Self {
            no_antimatter_produced: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TimeStudyState {
    pub theorem: Decimal,
    pub max_theorem: Decimal,
    pub studies: Vec<u16>,
    pub am_bought: u32,
    pub ip_bought: u32,
    pub ep_bought: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DilationState {
    pub tachyon_particles: Decimal,
    pub dilated_time: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RealityState {
    pub reality_machines: Decimal,
    pub imaginary_machines: Decimal,
    pub perk_points: f64,
    pub glyphs: GlyphSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlyphSet {
    /// Equipped slots; `None` is an empty slot.
    pub active: Vec<Option<Glyph>>,
}

impl GlyphSet {
    /// Copies of the equipped glyphs, skipping empty slots.
    #[must_use]
    pub fn equipped(&self) -> Vec<Glyph> {
        self.active.iter().flatten().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub id: u32,
    pub kind: GlyphKind,
    pub level: u32,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphKind {
    Power,
    Infinity,
    Replication,
    Time,
    Dilation,
    Effarig,
    Reality,
    Cursed,
    Companion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Celestials {
    pub effarig: EffarigState,
    pub laitela: LaitelaState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EffarigState {
    pub relic_shards: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LaitelaState {
    pub dark_matter: Decimal,
    pub max_dark_matter: Decimal,
    pub dark_energy: f64,
    pub singularities: f64,
    pub singularity_cap_increases: u32,
    pub matter_dimensions: Vec<MatterDimension>,
}

/// Matter dimension as last computed by the dimension system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatterDimension {
    pub amount: Decimal,
    /// Dark energy granted per tick.
    pub power_de: f64,
    pub interval_ms: f64,
}

impl Default for MatterDimension {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            power_de: 0.0,
            interval_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntimatterDimension {
    pub amount: Decimal,
    pub multiplier: Decimal,
}

impl Default for AntimatterDimension {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            multiplier: Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChallengeState {
    /// Running normal challenge id; 0 when none is running.
    pub normal: u8,
}

impl ChallengeState {
    #[must_use]
    pub const fn is_normal_running(self, id: u8) -> bool {
        id != 0 && self.normal == id
    }
}

/// Unlocked bonus sources, keyed by their id within each family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Unlocks {
    pub perks: BTreeSet<u16>,
    pub achievements: BTreeSet<u16>,
    pub reality_upgrades: BTreeSet<u16>,
    pub imaginary_upgrades: BTreeSet<u16>,
}

impl Unlocks {
    #[must_use]
    pub fn contains(&self, source: BonusSource) -> bool {
        match source {
            BonusSource::Perk(id) => self.perks.contains(&id),
            BonusSource::Achievement(id) => self.achievements.contains(&id),
            BonusSource::RealityUpgrade(id) => self.reality_upgrades.contains(&id),
            BonusSource::ImaginaryUpgrade(id) => self.imaginary_upgrades.contains(&id),
        }
    }

    /// Mark a source as unlocked; returns `false` if it already was.
    pub fn unlock(&mut self, source: BonusSource) -> bool {
        match source {
            BonusSource::Perk(id) => self.perks.insert(id),
            BonusSource::Achievement(id) => self.achievements.insert(id),
            BonusSource::RealityUpgrade(id) => self.reality_upgrades.insert(id),
            BonusSource::ImaginaryUpgrade(id) => self.imaginary_upgrades.insert(id),
        }
    }
}
