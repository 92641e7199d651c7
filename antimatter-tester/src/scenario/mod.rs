use anyhow::{Result, bail, ensure};
use antimatter_game::effects::{BonusSource, GameRules, StandardRules, perks};
use antimatter_game::registry::{self, CurrencyId};
use antimatter_game::{Decimal, PlayerState};

use crate::logic::{CurrencyOp, SimulationPlan, SimulationSummary};

const SWEEP_ROUNDS: usize = 400;
/// Allowed relative drift between running totals accumulated in different orders.
const LOCKSTEP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const CATALOG: [(&str, &str); 6] = [
    ("smoke", "Fresh game starts every currency at its floor"),
    ("purchase-sweep", "Random gains and purchases stay atomic and non-negative"),
    ("record-tracking", "Historical maxima never trail live values"),
    ("hard-cap", "Reality machines never exceed the cap after an add"),
    ("theorem-lockstep", "Time theorem maximum follows gains only"),
    ("reset-cycle", "Random play then a full reset lands on bonus floors"),
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.to_lowercase();
    let plan = match key.as_str() {
        "smoke" => SimulationPlan::new(0).with_expectation(fresh_game_expectation),
        "purchase-sweep" => SimulationPlan::new(SWEEP_ROUNDS)
            .with_ops(&[CurrencyOp::Add, CurrencyOp::Purchase])
            .with_expectation(purchases_expectation),
        "record-tracking" => SimulationPlan::new(SWEEP_ROUNDS)
            .with_currencies(&[
                CurrencyId::Antimatter,
                CurrencyId::InfinityPoints,
                CurrencyId::EternityPoints,
                CurrencyId::DarkMatter,
            ])
            .with_max_exponent(400)
            .with_expectation(records_expectation),
        "hard-cap" => SimulationPlan::new(SWEEP_ROUNDS / 4)
            .with_currencies(&[CurrencyId::RealityMachines])
            .with_ops(&[CurrencyOp::Add, CurrencyOp::Subtract, CurrencyOp::Purchase])
            .with_max_exponent(1500)
            .with_expectation(hard_cap_expectation),
        "theorem-lockstep" => SimulationPlan::new(SWEEP_ROUNDS)
            .with_currencies(&[CurrencyId::TimeTheorems])
            .with_ops(&[CurrencyOp::Add, CurrencyOp::Subtract, CurrencyOp::Purchase])
            .with_expectation(lockstep_expectation),
        "reset-cycle" => SimulationPlan::new(SWEEP_ROUNDS)
            .with_unlocks(&[
                BonusSource::Perk(perks::START_AM2),
                BonusSource::Perk(perks::START_IP2),
                BonusSource::Perk(perks::START_EP3),
                BonusSource::RealityUpgrade(10),
            ])
            .resetting_at_end()
            .with_expectation(floors_expectation),
        _ => return None,
    };
    Some(TestScenario::simulation(key, plan))
}

fn all_at_floor(state: &PlayerState, rules: &dyn GameRules) -> Result<()> {
    for currency in registry::all() {
        ensure!(
            currency.is_at_floor(state, rules),
            "{} is {} instead of its floor {}",
            currency.id(),
            currency.value_decimal(state),
            currency.starting_value_decimal(state, rules)
        );
    }
    Ok(())
}

fn fresh_game_expectation(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    all_at_floor(state, StandardRules::shared())?;
    ensure!(
        state.antimatter == Decimal::TEN,
        "fresh antimatter {} != 10",
        state.antimatter
    );
    ensure!(
        state.achievement_checks.no_antimatter_produced,
        "first-gain flag cleared before any gain"
    );
    Ok(())
}

fn purchases_expectation(summary: &SimulationSummary) -> Result<()> {
    if summary.purchases_attempted > 0 && summary.purchases_made == 0 {
        bail!(
            "none of {} purchases succeeded",
            summary.purchases_attempted
        );
    }
    Ok(())
}

fn records_expectation(summary: &SimulationSummary) -> Result<()> {
    let records = &summary.final_state.records;
    ensure!(
        records.best_reality.best_ep >= records.this_reality.max_ep,
        "best EP {} below this reality's max {}",
        records.best_reality.best_ep,
        records.this_reality.max_ep
    );
    ensure!(
        records.total_antimatter >= records.this_infinity.max_am,
        "total antimatter {} below infinity max {}",
        records.total_antimatter,
        records.this_infinity.max_am
    );
    Ok(())
}

fn hard_cap_expectation(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    let cap = StandardRules::shared().reality_machine_cap(state);
    ensure!(
        state.reality.reality_machines <= cap,
        "reality machines {} above cap {cap}",
        state.reality.reality_machines
    );
    Ok(())
}

fn lockstep_expectation(summary: &SimulationSummary) -> Result<()> {
    let timestudy = &summary.final_state.timestudy;
    let ceiling = registry::time_theorem_max(&summary.final_state)
        .times(Decimal::from_f64(1.0 + LOCKSTEP_TOLERANCE));
    ensure!(
        timestudy.theorem <= ceiling,
        "theorems {} above tracked maximum {}",
        timestudy.theorem,
        timestudy.max_theorem
    );
    Ok(())
}

fn floors_expectation(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    all_at_floor(state, StandardRules::shared())?;
    ensure!(
        state.antimatter == Decimal::new(5.0, 140),
        "antimatter floor {} ignores START_AM2",
        state.antimatter
    );
    ensure!(
        state.records.this_reality.max_ep == state.eternity_points,
        "reality EP record {} not rewound to {}",
        state.records.this_reality.max_ep,
        state.eternity_points
    );
    Ok(())
}
