//! The concrete currency registry.
//!
//! Every resource the game tracks is one `static` [`CurrencyDef`] below. The
//! definitions only differ in which field they map and which bookkeeping
//! hooks they carry:
//!
//! - record tracking on write (antimatter, infinity points, eternity points,
//!   dark matter)
//! - first-gain flag on add (antimatter)
//! - derived counter advanced on add (time theorems)
//! - hard cap clamp after add (reality machines)
//! - best-record snapshot of the equipped glyphs (eternity points)
//! - composite resets (eternity points, time theorems)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::currency::{CurrencyDef, zero_floor};
use crate::decimal::Decimal;
use crate::effects::{BonusSource, GameRules, perks};
use crate::ops::{DecimalOps, NumberOps, Operations};
use crate::state::PlayerState;

/// Normal challenge in which the second antimatter dimension also produces antimatter.
const TWO_TIER_PRODUCTION_CHALLENGE: u8 = 12;

const ANTIMATTER_FLOOR_SOURCES: [BonusSource; 7] = [
    BonusSource::Perk(perks::START_AM1),
    BonusSource::Perk(perks::START_AM2),
    BonusSource::Achievement(21),
    BonusSource::Achievement(37),
    BonusSource::Achievement(54),
    BonusSource::Achievement(55),
    BonusSource::Achievement(78),
];

const INFINITY_POINT_FLOOR_SOURCES: [BonusSource; 3] = [
    BonusSource::Perk(perks::START_IP1),
    BonusSource::Perk(perks::START_IP2),
    BonusSource::Achievement(104),
];

const ETERNITY_FLOOR_SOURCES: [BonusSource; 1] = [BonusSource::RealityUpgrade(10)];

const ETERNITY_POINT_FLOOR_SOURCES: [BonusSource; 3] = [
    BonusSource::Perk(perks::START_EP1),
    BonusSource::Perk(perks::START_EP2),
    BonusSource::Perk(perks::START_EP3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrencyId {
    Antimatter,
    Infinities,
    InfinitiesBanked,
    InfinitiesTotal,
    InfinityPoints,
    InfinityPower,
    Eternities,
    EternityPoints,
    TimeShards,
    TimeTheorems,
    TachyonParticles,
    DilatedTime,
    Realities,
    RealityMachines,
    PerkPoints,
    RelicShards,
    ImaginaryMachines,
    DarkMatter,
    DarkEnergy,
    Singularities,
}

impl CurrencyId {
    pub const ALL: [Self; 20] = [
        Self::Antimatter,
        Self::Infinities,
        Self::InfinitiesBanked,
        Self::InfinitiesTotal,
        Self::InfinityPoints,
        Self::InfinityPower,
        Self::Eternities,
        Self::EternityPoints,
        Self::TimeShards,
        Self::TimeTheorems,
        Self::TachyonParticles,
        Self::DilatedTime,
        Self::Realities,
        Self::RealityMachines,
        Self::PerkPoints,
        Self::RelicShards,
        Self::ImaginaryMachines,
        Self::DarkMatter,
        Self::DarkEnergy,
        Self::Singularities,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Antimatter => "antimatter",
            Self::Infinities => "infinities",
            Self::InfinitiesBanked => "infinities-banked",
            Self::InfinitiesTotal => "infinities-total",
            Self::InfinityPoints => "infinity-points",
            Self::InfinityPower => "infinity-power",
            Self::Eternities => "eternities",
            Self::EternityPoints => "eternity-points",
            Self::TimeShards => "time-shards",
            Self::TimeTheorems => "time-theorems",
            Self::TachyonParticles => "tachyon-particles",
            Self::DilatedTime => "dilated-time",
            Self::Realities => "realities",
            Self::RealityMachines => "reality-machines",
            Self::PerkPoints => "perk-points",
            Self::RelicShards => "relic-shards",
            Self::ImaginaryMachines => "imaginary-machines",
            Self::DarkMatter => "dark-matter",
            Self::DarkEnergy => "dark-energy",
            Self::Singularities => "singularities",
        }
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyId {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

impl From<CurrencyId> for String {
    fn from(value: CurrencyId) -> Self {
        value.as_str().to_string()
    }
}

fn write_antimatter(state: &mut PlayerState, value: Decimal) {
    state.antimatter = value;
    let records = &mut state.records;
    records.total_antimatter = records.total_antimatter.max(value);
    records.this_infinity.max_am = records.this_infinity.max_am.max(value);
    records.this_eternity.max_am = records.this_eternity.max_am.max(value);
    records.this_reality.max_am = records.this_reality.max_am.max(value);
}

fn antimatter_after_add(state: &mut PlayerState, _rules: &dyn GameRules, amount: Decimal) {
    if amount > Decimal::ZERO && state.achievement_checks.no_antimatter_produced {
        log::debug!("{}: first gain recorded", CurrencyId::Antimatter);
        state.achievement_checks.no_antimatter_produced = false;
    }
}

fn antimatter_floor(state: &PlayerState, rules: &dyn GameRules) -> Decimal {
    rules.effect_max(state, Decimal::TEN, &ANTIMATTER_FLOOR_SOURCES)
}

fn write_infinity_points(state: &mut PlayerState, value: Decimal) {
    state.infinity_points = value;
    let records = &mut state.records;
    records.this_eternity.max_ip = records.this_eternity.max_ip.max(value);
    records.this_reality.max_ip = records.this_reality.max_ip.max(value);
}

fn infinity_point_floor(state: &PlayerState, rules: &dyn GameRules) -> Decimal {
    rules.effect_max(state, Decimal::ZERO, &INFINITY_POINT_FLOOR_SOURCES)
}

fn eternity_floor(state: &PlayerState, rules: &dyn GameRules) -> Decimal {
    rules.effect_max(state, Decimal::ZERO, &ETERNITY_FLOOR_SOURCES)
}

fn write_eternity_points(state: &mut PlayerState, value: Decimal) {
    state.eternity_points = value;
    let records = &mut state.records;
    records.this_reality.max_ep = records.this_reality.max_ep.max(value);
    if records.best_reality.best_ep < value {
        records.best_reality.best_ep = value;
        records.best_reality.best_ep_set = state.reality.glyphs.equipped();
        log::debug!(
            "{}: new best {value} with {} glyphs equipped",
            CurrencyId::EternityPoints,
            records.best_reality.best_ep_set.len()
        );
    }
}

fn eternity_point_floor(state: &PlayerState, rules: &dyn GameRules) -> Decimal {
    rules.effect_max(state, Decimal::ZERO, &ETERNITY_POINT_FLOOR_SOURCES)
}

fn reset_eternity_points(
    def: &CurrencyDef<DecimalOps>,
    state: &mut PlayerState,
    rules: &dyn GameRules,
) {
    def.reset_value(state, rules);
    state.records.this_reality.max_ep = def.starting_value(state, rules);
}

fn time_theorems_after_add(state: &mut PlayerState, _rules: &dyn GameRules, amount: Decimal) {
    state.timestudy.max_theorem = state.timestudy.max_theorem.plus(amount);
}

fn reset_time_theorems(
    def: &CurrencyDef<DecimalOps>,
    state: &mut PlayerState,
    rules: &dyn GameRules,
) {
    rules.respec_time_studies(state);
    def.reset_value(state, rules);
    state.timestudy.am_bought = 0;
    state.timestudy.ip_bought = 0;
    state.timestudy.ep_bought = 0;
    state.timestudy.max_theorem = def.starting_value(state, rules);
}

fn reality_machines_after_add(state: &mut PlayerState, rules: &dyn GameRules, _amount: Decimal) {
    let cap = rules.reality_machine_cap(state);
    let current = state.reality.reality_machines;
    if current > cap {
        log::debug!("{}: clamped {current} to cap {cap}", CurrencyId::RealityMachines);
        state.reality.reality_machines = current.clamp_max(cap);
    }
}

fn write_dark_matter(state: &mut PlayerState, value: Decimal) {
    let laitela = &mut state.celestials.laitela;
    laitela.dark_matter = value;
    laitela.max_dark_matter = laitela.max_dark_matter.max(value);
}

pub static ANTIMATTER: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::Antimatter,
    read: |state: &PlayerState| state.antimatter,
    write: write_antimatter,
    after_add: Some(antimatter_after_add),
    starting_value: antimatter_floor,
    reset: None,
};

pub static INFINITIES: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::Infinities,
    read: |state: &PlayerState| state.infinities,
    write: |state: &mut PlayerState, value: Decimal| state.infinities = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static INFINITIES_BANKED: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::InfinitiesBanked,
    read: |state: &PlayerState| state.infinities_banked,
    write: |state: &mut PlayerState, value: Decimal| state.infinities_banked = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

/// Unbanked plus banked infinities. Writes land on the unbanked count.
pub static INFINITIES_TOTAL: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::InfinitiesTotal,
    read: |state: &PlayerState| state.infinities.plus(state.infinities_banked),
    write: |state: &mut PlayerState, value: Decimal| state.infinities = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static INFINITY_POINTS: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::InfinityPoints,
    read: |state: &PlayerState| state.infinity_points,
    write: write_infinity_points,
    after_add: None,
    starting_value: infinity_point_floor,
    reset: None,
};

pub static INFINITY_POWER: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::InfinityPower,
    read: |state: &PlayerState| state.infinity_power,
    write: |state: &mut PlayerState, value: Decimal| state.infinity_power = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static ETERNITIES: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::Eternities,
    read: |state: &PlayerState| state.eternities,
    write: |state: &mut PlayerState, value: Decimal| state.eternities = value,
    after_add: None,
    starting_value: eternity_floor,
    reset: None,
};

pub static ETERNITY_POINTS: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::EternityPoints,
    read: |state: &PlayerState| state.eternity_points,
    write: write_eternity_points,
    after_add: None,
    starting_value: eternity_point_floor,
    reset: Some(reset_eternity_points),
};

pub static TIME_SHARDS: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::TimeShards,
    read: |state: &PlayerState| state.time_shards,
    write: |state: &mut PlayerState, value: Decimal| state.time_shards = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static TIME_THEOREMS: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::TimeTheorems,
    read: |state: &PlayerState| state.timestudy.theorem,
    write: |state: &mut PlayerState, value: Decimal| state.timestudy.theorem = value,
    after_add: Some(time_theorems_after_add),
    starting_value: zero_floor::<DecimalOps>,
    reset: Some(reset_time_theorems),
};

pub static TACHYON_PARTICLES: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::TachyonParticles,
    read: |state: &PlayerState| state.dilation.tachyon_particles,
    write: |state: &mut PlayerState, value: Decimal| state.dilation.tachyon_particles = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static DILATED_TIME: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::DilatedTime,
    read: |state: &PlayerState| state.dilation.dilated_time,
    write: |state: &mut PlayerState, value: Decimal| state.dilation.dilated_time = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static REALITIES: CurrencyDef<NumberOps> = CurrencyDef {
    id: CurrencyId::Realities,
    read: |state: &PlayerState| state.realities,
    write: |state: &mut PlayerState, value: f64| state.realities = value,
    after_add: None,
    starting_value: zero_floor::<NumberOps>,
    reset: None,
};

pub static REALITY_MACHINES: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::RealityMachines,
    read: |state: &PlayerState| state.reality.reality_machines,
    write: |state: &mut PlayerState, value: Decimal| state.reality.reality_machines = value,
    after_add: Some(reality_machines_after_add),
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static PERK_POINTS: CurrencyDef<NumberOps> = CurrencyDef {
    id: CurrencyId::PerkPoints,
    read: |state: &PlayerState| state.reality.perk_points,
    write: |state: &mut PlayerState, value: f64| state.reality.perk_points = value,
    after_add: None,
    starting_value: zero_floor::<NumberOps>,
    reset: None,
};

pub static RELIC_SHARDS: CurrencyDef<NumberOps> = CurrencyDef {
    id: CurrencyId::RelicShards,
    read: |state: &PlayerState| state.celestials.effarig.relic_shards,
    write: |state: &mut PlayerState, value: f64| state.celestials.effarig.relic_shards = value,
    after_add: None,
    starting_value: zero_floor::<NumberOps>,
    reset: None,
};

pub static IMAGINARY_MACHINES: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::ImaginaryMachines,
    read: |state: &PlayerState| state.reality.imaginary_machines,
    write: |state: &mut PlayerState, value: Decimal| state.reality.imaginary_machines = value,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static DARK_MATTER: CurrencyDef<DecimalOps> = CurrencyDef {
    id: CurrencyId::DarkMatter,
    read: |state: &PlayerState| state.celestials.laitela.dark_matter,
    write: write_dark_matter,
    after_add: None,
    starting_value: zero_floor::<DecimalOps>,
    reset: None,
};

pub static DARK_ENERGY: CurrencyDef<NumberOps> = CurrencyDef {
    id: CurrencyId::DarkEnergy,
    read: |state: &PlayerState| state.celestials.laitela.dark_energy,
    write: |state: &mut PlayerState, value: f64| state.celestials.laitela.dark_energy = value,
    after_add: None,
    starting_value: zero_floor::<NumberOps>,
    reset: None,
};

pub static SINGULARITIES: CurrencyDef<NumberOps> = CurrencyDef {
    id: CurrencyId::Singularities,
    read: |state: &PlayerState| state.celestials.laitela.singularities,
    write: |state: &mut PlayerState, value: f64| state.celestials.laitela.singularities = value,
    after_add: None,
    starting_value: zero_floor::<NumberOps>,
    reset: None,
};

/// A registry entry with its representation erased.
#[derive(Debug, Clone, Copy)]
pub enum AnyCurrency {
    Number(&'static CurrencyDef<NumberOps>),
    Decimal(&'static CurrencyDef<DecimalOps>),
}

impl AnyCurrency {
    #[must_use]
    pub fn id(self) -> CurrencyId {
        match self {
            Self::Number(def) => def.id,
            Self::Decimal(def) => def.id,
        }
    }

    #[must_use]
    pub const fn is_decimal(self) -> bool {
        matches!(self, Self::Decimal(_))
    }

    pub fn reset(self, state: &mut PlayerState, rules: &dyn GameRules) {
        match self {
            Self::Number(def) => def.reset(state, rules),
            Self::Decimal(def) => def.reset(state, rules),
        }
    }

    /// Current value, lifted into [`Decimal`] for f64 currencies.
    #[must_use]
    pub fn value_decimal(self, state: &PlayerState) -> Decimal {
        match self {
            Self::Number(def) => NumberOps::to_decimal(def.value(state)),
            Self::Decimal(def) => def.value(state),
        }
    }

    #[must_use]
    pub fn starting_value_decimal(self, state: &PlayerState, rules: &dyn GameRules) -> Decimal {
        match self {
            Self::Number(def) => NumberOps::to_decimal(def.starting_value(state, rules)),
            Self::Decimal(def) => def.starting_value(state, rules),
        }
    }

    /// Whether the currency currently sits exactly at its reset floor.
    #[must_use]
    pub fn is_at_floor(self, state: &PlayerState, rules: &dyn GameRules) -> bool {
        match self {
            Self::Number(def) => def.eq(state, def.starting_value(state, rules)),
            Self::Decimal(def) => def.eq(state, def.starting_value(state, rules)),
        }
    }
}

#[must_use]
pub fn lookup(id: CurrencyId) -> AnyCurrency {
    match id {
        CurrencyId::Antimatter => AnyCurrency::Decimal(&ANTIMATTER),
        CurrencyId::Infinities => AnyCurrency::Decimal(&INFINITIES),
        CurrencyId::InfinitiesBanked => AnyCurrency::Decimal(&INFINITIES_BANKED),
        CurrencyId::InfinitiesTotal => AnyCurrency::Decimal(&INFINITIES_TOTAL),
        CurrencyId::InfinityPoints => AnyCurrency::Decimal(&INFINITY_POINTS),
        CurrencyId::InfinityPower => AnyCurrency::Decimal(&INFINITY_POWER),
        CurrencyId::Eternities => AnyCurrency::Decimal(&ETERNITIES),
        CurrencyId::EternityPoints => AnyCurrency::Decimal(&ETERNITY_POINTS),
        CurrencyId::TimeShards => AnyCurrency::Decimal(&TIME_SHARDS),
        CurrencyId::TimeTheorems => AnyCurrency::Decimal(&TIME_THEOREMS),
        CurrencyId::TachyonParticles => AnyCurrency::Decimal(&TACHYON_PARTICLES),
        CurrencyId::DilatedTime => AnyCurrency::Decimal(&DILATED_TIME),
        CurrencyId::Realities => AnyCurrency::Number(&REALITIES),
        CurrencyId::RealityMachines => AnyCurrency::Decimal(&REALITY_MACHINES),
        CurrencyId::PerkPoints => AnyCurrency::Number(&PERK_POINTS),
        CurrencyId::RelicShards => AnyCurrency::Number(&RELIC_SHARDS),
        CurrencyId::ImaginaryMachines => AnyCurrency::Decimal(&IMAGINARY_MACHINES),
        CurrencyId::DarkMatter => AnyCurrency::Decimal(&DARK_MATTER),
        CurrencyId::DarkEnergy => AnyCurrency::Number(&DARK_ENERGY),
        CurrencyId::Singularities => AnyCurrency::Number(&SINGULARITIES),
    }
}

/// Every registry entry in [`CurrencyId::ALL`] order.
pub fn all() -> impl Iterator<Item = AnyCurrency> {
    CurrencyId::ALL.into_iter().map(lookup)
}

/// Antimatter gained per real second from the dimension system.
#[must_use]
pub fn antimatter_production_per_second(state: &PlayerState, rules: &dyn GameRules) -> Decimal {
    let first = rules.antimatter_dimension_production(state, 1);
    if state
        .challenge
        .is_normal_running(TWO_TIER_PRODUCTION_CHALLENGE)
    {
        first.plus(rules.antimatter_dimension_production(state, 2))
    } else {
        first
    }
}

#[must_use]
pub fn dark_energy_production_per_second(state: &PlayerState) -> f64 {
    state
        .celestials
        .laitela
        .matter_dimensions
        .iter()
        .filter(|dimension| dimension.amount > Decimal::ZERO)
        .map(|dimension| dimension.power_de * 1000.0 / dimension.interval_ms)
        .sum()
}

/// Seconds until the singularity cap is reached; infinite without production.
#[must_use]
pub fn singularities_time_until(state: &PlayerState, rules: &dyn GameRules) -> f64 {
    let production = dark_energy_production_per_second(state);
    if production > 0.0 {
        rules.singularity_cap(state) / production
    } else {
        f64::INFINITY
    }
}

/// Theorems ever gained, including those spent on studies.
#[must_use]
pub fn time_theorem_max(state: &PlayerState) -> Decimal {
    state.timestudy.max_theorem
}

#[must_use]
pub fn dark_matter_max(state: &PlayerState) -> Decimal {
    state.celestials.laitela.max_dark_matter
}

pub fn set_dark_matter_max(state: &mut PlayerState, value: Decimal) {
    state.celestials.laitela.max_dark_matter = value;
}
