//! Bonus sources and the rules collaborator consulted by currencies.
//!
//! Currencies never compute game balance themselves. Reset floors, hard caps
//! and production rates come from a [`GameRules`] implementation; the bundled
//! [`StandardRules`] is table-driven from `assets/rules.json`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use thiserror::Error;

use crate::decimal::Decimal;
use crate::numbers;
use crate::state::PlayerState;

const DEFAULT_RULES_DATA: &str = include_str!("../assets/rules.json");
const DEFAULT_RM_CAP_EXPONENT: i64 = 1000;
const DEFAULT_RM_CAP_UPGRADE: u16 = 6;
const DEFAULT_SINGULARITY_CAP_BASE: f64 = 200.0;

/// Something the player can own that grants a bonus amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum BonusSource {
    Perk(u16),
    Achievement(u16),
    RealityUpgrade(u16),
    ImaginaryUpgrade(u16),
}

/// Perk ids that raise reset floors.
pub mod perks {
    pub const START_AM1: u16 = 10;
    pub const START_AM2: u16 = 11;
    pub const START_IP1: u16 = 12;
    pub const START_IP2: u16 = 13;
    pub const START_EP1: u16 = 14;
    pub const START_EP2: u16 = 15;
    pub const START_EP3: u16 = 16;
}

/// Balance collaborator. Implementations must be pure reads except for
/// [`GameRules::respec_time_studies`].
pub trait GameRules {
    /// Largest of `base` and the bonus of every unlocked source in `sources`.
    fn effect_max(&self, state: &PlayerState, base: Decimal, sources: &[BonusSource]) -> Decimal;

    fn reality_machine_cap(&self, state: &PlayerState) -> Decimal;

    /// Theorems currently locked up in purchased time studies.
    fn time_studies_cost(&self, state: &PlayerState) -> Decimal;

    /// Per-second output of antimatter dimension `tier` (1-based).
    fn antimatter_dimension_production(&self, state: &PlayerState, tier: usize) -> Decimal;

    fn singularity_cap(&self, state: &PlayerState) -> f64;

    /// Refund every purchased study back into theorems and clear the list.
    fn respec_time_studies(&self, state: &mut PlayerState) {
        let refund = self.time_studies_cost(state);
        state.timestudy.studies.clear();
        state.timestudy.theorem = state.timestudy.theorem.plus(refund);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusEntry {
    pub source: BonusSource,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub bonuses: Vec<BonusEntry>,
    pub base_reality_machine_cap: Decimal,
    /// Imaginary upgrade whose bonus multiplies the reality machine cap.
    pub rm_cap_upgrade: u16,
    pub time_study_costs: BTreeMap<u16, f64>,
    pub singularity_cap_base: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            bonuses: Vec::new(),
            base_reality_machine_cap: Decimal::pow10(DEFAULT_RM_CAP_EXPONENT),
            rm_cap_upgrade: DEFAULT_RM_CAP_UPGRADE,
            time_study_costs: BTreeMap::new(),
            singularity_cap_base: DEFAULT_SINGULARITY_CAP_BASE,
        }
    }
}

/// Errors raised when a rules table violates its invariants.
#[derive(Debug, Error, PartialEq)]
pub enum RulesConfigError {
    #[error("bonus for {bonus:?} must be finite and non-negative, got {value}")]
    InvalidBonus { bonus: BonusSource, value: Decimal },
    #[error("bonus for {0:?} is listed more than once")]
    DuplicateBonus(BonusSource),
    #[error("{field} must be positive and finite")]
    NonPositive { field: &'static str },
    #[error("time study {id} has invalid cost {cost}")]
    InvalidStudyCost { id: u16, cost: f64 },
}

impl RulesConfig {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_RULES_DATA).unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a rules table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns `RulesConfigError` when any entry violates the documented bounds.
    pub fn validate(&self) -> Result<(), RulesConfigError> {
        let mut seen = BTreeSet::new();
        for entry in &self.bonuses {
            if !entry.value.is_finite() || entry.value < Decimal::ZERO {
                return Err(RulesConfigError::InvalidBonus {
                    bonus: entry.source,
                    value: entry.value,
                });
            }
            if !seen.insert(entry.source) {
                return Err(RulesConfigError::DuplicateBonus(entry.source));
            }
        }
        if !self.base_reality_machine_cap.is_finite()
            || self.base_reality_machine_cap <= Decimal::ZERO
        {
            return Err(RulesConfigError::NonPositive {
                field: "base_reality_machine_cap",
            });
        }
        if !self.singularity_cap_base.is_finite() || self.singularity_cap_base <= 0.0 {
            return Err(RulesConfigError::NonPositive {
                field: "singularity_cap_base",
            });
        }
        if let Some((&id, &cost)) = self
            .time_study_costs
            .iter()
            .find(|(_, cost)| !cost.is_finite() || **cost < 0.0)
        {
            return Err(RulesConfigError::InvalidStudyCost { id, cost });
        }
        Ok(())
    }
}

/// Table-driven [`GameRules`].
#[derive(Debug, Clone, PartialEq)]
pub struct StandardRules {
    bonuses: BTreeMap<BonusSource, Decimal>,
    base_reality_machine_cap: Decimal,
    rm_cap_upgrade: BonusSource,
    time_study_costs: BTreeMap<u16, f64>,
    singularity_cap_base: f64,
}

impl StandardRules {
    /// # Errors
    ///
    /// Returns `RulesConfigError` if the config fails validation.
    pub fn from_config(config: &RulesConfig) -> Result<Self, RulesConfigError> {
        config.validate()?;
        Ok(Self {
            bonuses: config
                .bonuses
                .iter()
                .map(|entry| (entry.source, entry.value))
                .collect(),
            base_reality_machine_cap: config.base_reality_machine_cap,
            rm_cap_upgrade: BonusSource::ImaginaryUpgrade(config.rm_cap_upgrade),
            time_study_costs: config.time_study_costs.clone(),
            singularity_cap_base: config.singularity_cap_base,
        })
    }

    /// Rules built from the bundled table, shared for the process lifetime.
    #[must_use]
    pub fn shared() -> &'static Self {
        static RULES: OnceLock<StandardRules> = OnceLock::new();
        RULES.get_or_init(|| {
            Self::from_config(&RulesConfig::load_from_static()).unwrap_or_else(|err| {
                log::warn!("bundled rules table rejected ({err}); using defaults");
                Self::default()
            })
        })
    }

    #[must_use]
    pub fn bonus(&self, source: BonusSource) -> Option<Decimal> {
        self.bonuses.get(&source).copied()
    }
}

impl Default for StandardRules {
    fn default() -> Self {
        let config = RulesConfig::default();
        Self {
            bonuses: BTreeMap::new(),
            base_reality_machine_cap: config.base_reality_machine_cap,
            rm_cap_upgrade: BonusSource::ImaginaryUpgrade(config.rm_cap_upgrade),
            time_study_costs: BTreeMap::new(),
            singularity_cap_base: config.singularity_cap_base,
        }
    }
}

impl GameRules for StandardRules {
    fn effect_max(&self, state: &PlayerState, base: Decimal, sources: &[BonusSource]) -> Decimal {
        sources
            .iter()
            .copied()
            .filter(|source| state.unlocks.contains(*source))
            .filter_map(|source| self.bonus(source))
            .fold(base, Decimal::max)
    }

    fn reality_machine_cap(&self, state: &PlayerState) -> Decimal {
        let multiplier = self.effect_max(state, Decimal::ONE, &[self.rm_cap_upgrade]);
        self.base_reality_machine_cap.times(multiplier)
    }

    fn time_studies_cost(&self, state: &PlayerState) -> Decimal {
        state
            .timestudy
            .studies
            .iter()
            .map(|id| self.time_study_costs.get(id).copied().unwrap_or(0.0))
            .map(Decimal::from_f64)
            .sum()
    }

    fn antimatter_dimension_production(&self, state: &PlayerState, tier: usize) -> Decimal {
        tier.checked_sub(1)
            .and_then(|index| state.antimatter_dimensions.get(index))
            .map_or(Decimal::ZERO, |dimension| {
                dimension.amount.times(dimension.multiplier)
            })
    }

    fn singularity_cap(&self, state: &PlayerState) -> f64 {
        let increases = i64::from(state.celestials.laitela.singularity_cap_increases);
        self.singularity_cap_base * numbers::pow10(increases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AntimatterDimension;

    fn bundled() -> StandardRules {
        StandardRules::from_config(&RulesConfig::load_from_static()).unwrap()
    }

    #[test]
    fn bundled_table_parses_and_validates() {
        let config = RulesConfig::from_json(DEFAULT_RULES_DATA).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.bonuses.is_empty());
        assert_eq!(StandardRules::shared(), &bundled());
    }

    #[test]
    fn effect_max_ignores_locked_sources() {
        let rules = bundled();
        let mut state = PlayerState::default();
        let sources = [BonusSource::Achievement(21), BonusSource::Perk(perks::START_AM1)];
        assert_eq!(rules.effect_max(&state, Decimal::TEN, &sources), Decimal::TEN);
        assert_eq!(rules.effect_max(&state, Decimal::ZERO, &[]), Decimal::ZERO);

        state.unlocks.unlock(BonusSource::Achievement(21));
        assert_eq!(
            rules.effect_max(&state, Decimal::TEN, &sources),
            Decimal::from_f64(100.0)
        );
        state.unlocks.unlock(BonusSource::Perk(perks::START_AM1));
        assert!(rules.effect_max(&state, Decimal::TEN, &sources) > Decimal::pow10(100));
    }

    #[test]
    fn validation_rejects_bad_tables() {
        let mut config = RulesConfig::default();
        config.bonuses.push(BonusEntry {
            source: BonusSource::Perk(1),
            value: Decimal::from_f64(-1.0),
        });
        assert!(matches!(
            config.validate(),
            Err(RulesConfigError::InvalidBonus { .. })
        ));

        let mut config = RulesConfig::default();
        let entry = BonusEntry {
            source: BonusSource::Perk(1),
            value: Decimal::ONE,
        };
        config.bonuses = vec![entry.clone(), entry];
        assert_eq!(
            config.validate(),
            Err(RulesConfigError::DuplicateBonus(BonusSource::Perk(1)))
        );

        let mut config = RulesConfig::default();
        config.singularity_cap_base = 0.0;
        assert!(matches!(
            config.validate(),
            Err(RulesConfigError::NonPositive { .. })
        ));

        let mut config = RulesConfig::default();
        config.time_study_costs.insert(11, f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(RulesConfigError::InvalidStudyCost { id: 11, .. })
        ));
    }

    #[test]
    fn caps_and_production_read_state() {
        let rules = bundled();
        let mut state = PlayerState::default();
        assert_eq!(rules.reality_machine_cap(&state), Decimal::pow10(1000));
        state.unlocks.unlock(BonusSource::ImaginaryUpgrade(6));
        assert!(rules.reality_machine_cap(&state) > Decimal::pow10(1000));

        state.antimatter_dimensions = vec![AntimatterDimension {
            amount: Decimal::from_f64(4.0),
            multiplier: Decimal::from_f64(2.5),
        }];
        assert_eq!(
            rules.antimatter_dimension_production(&state, 1),
            Decimal::TEN
        );
        assert_eq!(rules.antimatter_dimension_production(&state, 0), Decimal::ZERO);
        assert_eq!(rules.antimatter_dimension_production(&state, 2), Decimal::ZERO);

        state.celestials.laitela.singularity_cap_increases = 2;
        assert!((rules.singularity_cap(&state) - 20_000.0).abs() < 1e-9);
    }

    #[test]
    fn respec_refunds_study_costs() {
        let rules = bundled();
        let mut state = PlayerState::default();
        state.timestudy.studies = vec![11, 21, 9999];
        let cost = rules.time_studies_cost(&state);
        assert!(cost > Decimal::ZERO);
        rules.respec_time_studies(&mut state);
        assert!(state.timestudy.studies.is_empty());
        assert_eq!(state.timestudy.theorem, cost);
    }
}
