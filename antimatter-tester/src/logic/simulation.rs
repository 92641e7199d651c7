use anyhow::Result;
use antimatter_game::currency::CurrencyDef;
use antimatter_game::effects::{BonusSource, GameRules};
use antimatter_game::numbers;
use antimatter_game::registry::{self, AnyCurrency, CurrencyId};
use antimatter_game::{Decimal, Operations, PlayerState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::fmt;

/// Native currencies stay well inside the f64 range so sweeps never overflow.
const NUMBER_MAX_EXPONENT: i64 = 100;

/// Reads unbanked plus banked infinities but writes only the unbanked count, so
/// its read-back differs from the written value once anything is banked.
const SWEEP_EXCLUDED: [CurrencyId; 1] = [CurrencyId::InfinitiesTotal];

pub type Expectation = fn(&SimulationSummary) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrencyOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Purchase,
    BumpTo,
    DropTo,
    Reset,
}

impl CurrencyOp {
    pub const ALL: [Self; 8] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Purchase,
        Self::BumpTo,
        Self::DropTo,
        Self::Reset,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Purchase => "purchase",
            Self::BumpTo => "bump-to",
            Self::DropTo => "drop-to",
            Self::Reset => "reset",
        }
    }

    const fn is_scaling(self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }
}

impl fmt::Display for CurrencyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a sweep does and what its summary must satisfy.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub rounds: usize,
    pub currencies: Vec<CurrencyId>,
    pub ops: Vec<CurrencyOp>,
    pub unlocks: Vec<BonusSource>,
    /// Largest power of ten used for generated amounts.
    pub max_exponent: i64,
    pub reset_at_end: bool,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds,
            currencies: CurrencyId::ALL
                .into_iter()
                .filter(|id| !SWEEP_EXCLUDED.contains(id))
                .collect(),
            ops: CurrencyOp::ALL.to_vec(),
            unlocks: Vec::new(),
            max_exponent: 30,
            reset_at_end: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_currencies(mut self, currencies: &[CurrencyId]) -> Self {
        self.currencies = currencies.to_vec();
        self
    }

    #[must_use]
    pub fn with_ops(mut self, ops: &[CurrencyOp]) -> Self {
        self.ops = ops.to_vec();
        self
    }

    #[must_use]
    pub fn with_unlocks(mut self, unlocks: &[BonusSource]) -> Self {
        self.unlocks = unlocks.to_vec();
        self
    }

    #[must_use]
    pub fn with_max_exponent(mut self, max_exponent: i64) -> Self {
        self.max_exponent = max_exponent.max(0);
        self
    }

    #[must_use]
    pub fn resetting_at_end(mut self) -> Self {
        self.reset_at_end = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// Outcome of one seeded sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub steps: usize,
    pub purchases_attempted: usize,
    pub purchases_made: usize,
    pub clamped_adds: usize,
    pub violations: Vec<String>,
    #[serde(skip)]
    pub final_state: PlayerState,
}

/// Deterministic random operation sweep over the currency registry.
pub struct SimulationSession<'r> {
    rules: &'r dyn GameRules,
    rng: ChaCha20Rng,
    state: PlayerState,
    summary: SimulationSummary,
}

impl<'r> SimulationSession<'r> {
    pub fn new(rules: &'r dyn GameRules, plan: &SimulationPlan, seed: u64) -> Self {
        let mut state = PlayerState::new_game(rules);
        for &source in &plan.unlocks {
            state.unlocks.unlock(source);
        }
        if !plan.unlocks.is_empty() {
            // Floors depend on unlocks, so start from the raised floors
            for currency in registry::all() {
                currency.reset(&mut state, rules);
            }
        }
        Self {
            rules,
            rng: ChaCha20Rng::seed_from_u64(seed),
            state,
            summary: SimulationSummary {
                seed,
                ..SimulationSummary::default()
            },
        }
    }

    pub fn run(mut self, plan: &SimulationPlan) -> SimulationSummary {
        if !plan.currencies.is_empty() && !plan.ops.is_empty() {
            for _ in 0..plan.rounds {
                self.step(plan);
            }
        }
        if plan.reset_at_end {
            for currency in registry::all() {
                currency.reset(&mut self.state, self.rules);
            }
        }
        self.summary.final_state = self.state;
        self.summary
    }

    fn step(&mut self, plan: &SimulationPlan) {
        let id = plan.currencies[self.rng.gen_range(0..plan.currencies.len())];
        let op = plan.ops[self.rng.gen_range(0..plan.ops.len())];
        let outcome = match registry::lookup(id) {
            AnyCurrency::Number(def) => {
                let amount = self.number_amount(op, plan.max_exponent);
                self.apply(def, op, amount)
            }
            AnyCurrency::Decimal(def) => {
                let amount = self.decimal_amount(op, plan.max_exponent);
                self.apply(def, op, amount)
            }
        };
        self.summary.steps += 1;
        let violation = outcome.err().or_else(|| record_violation(&self.state));
        if let Some(message) = violation {
            log::debug!("step {}: {message}", self.summary.steps);
            self.summary
                .violations
                .push(format!("step {} {id} {op}: {message}", self.summary.steps));
        }
    }

    fn number_amount(&mut self, op: CurrencyOp, max_exponent: i64) -> f64 {
        if op.is_scaling() {
            return self.scaling_factor(op);
        }
        let exponent = self.rng.gen_range(0..=max_exponent.min(NUMBER_MAX_EXPONENT));
        self.rng.gen_range(1.0..10.0) * numbers::pow10(exponent)
    }

    fn decimal_amount(&mut self, op: CurrencyOp, max_exponent: i64) -> Decimal {
        if op.is_scaling() {
            return Decimal::from_f64(self.scaling_factor(op));
        }
        let exponent = self.rng.gen_range(0..=max_exponent);
        Decimal::new(self.rng.gen_range(1.0..10.0), exponent)
    }

    fn scaling_factor(&mut self, op: CurrencyOp) -> f64 {
        match op {
            CurrencyOp::Divide => self.rng.gen_range(1.0..4.0),
            _ => self.rng.gen_range(0.5..2.0),
        }
    }

    fn apply<O: Operations>(
        &mut self,
        def: &CurrencyDef<O>,
        op: CurrencyOp,
        amount: O::Value,
    ) -> Result<(), String> {
        let state = &mut self.state;
        let rules = self.rules;
        let before = def.value(state);
        match op {
            CurrencyOp::Add => {
                def.add(state, rules, amount);
                if O::lt(def.value(state), O::add(before, amount)) {
                    self.summary.clamped_adds += 1;
                }
                if def.id == CurrencyId::RealityMachines
                    && registry::REALITY_MACHINES.gt(state, rules.reality_machine_cap(state))
                {
                    return Err("reality machines above cap after add".to_string());
                }
            }
            CurrencyOp::Subtract => {
                def.subtract(state, amount);
                if O::lt(def.value(state), O::zero()) {
                    return Err(format!("subtract left {:?} below zero", def.value(state)));
                }
            }
            CurrencyOp::Multiply => def.multiply(state, amount),
            CurrencyOp::Divide => def.divide(state, amount),
            CurrencyOp::Purchase => {
                self.summary.purchases_attempted += 1;
                let affordable = O::gte(before, amount);
                let bought = def.purchase(state, amount);
                let after = def.value(state);
                if bought != affordable {
                    return Err(format!(
                        "purchase of {amount:?} from {before:?} returned {bought}"
                    ));
                }
                if bought {
                    self.summary.purchases_made += 1;
                    if !O::eq(after, O::subtract(before, amount)) {
                        return Err(format!("purchase left {after:?} from {before:?}"));
                    }
                } else if !O::eq(after, before) {
                    return Err(format!("refused purchase changed {before:?} to {after:?}"));
                }
            }
            CurrencyOp::BumpTo => {
                def.bump_to(state, amount);
                if O::lt(def.value(state), before) {
                    return Err(format!("bump_to lowered {before:?}"));
                }
            }
            CurrencyOp::DropTo => {
                def.drop_to(state, amount);
                if O::gt(def.value(state), before) {
                    return Err(format!("drop_to raised {before:?}"));
                }
            }
            CurrencyOp::Reset => {
                def.reset(state, rules);
                let start = def.starting_value(state, rules);
                if !def.eq(state, start) {
                    return Err(format!("reset left {:?}, floor {start:?}", def.value(state)));
                }
            }
        }
        Ok(())
    }
}

/// First record field found trailing its live value.
fn record_violation(state: &PlayerState) -> Option<String> {
    let records = &state.records;
    let laitela = &state.celestials.laitela;
    let checks = [
        ("total antimatter", records.total_antimatter, state.antimatter),
        ("infinity max antimatter", records.this_infinity.max_am, state.antimatter),
        ("eternity max antimatter", records.this_eternity.max_am, state.antimatter),
        ("reality max antimatter", records.this_reality.max_am, state.antimatter),
        ("eternity max IP", records.this_eternity.max_ip, state.infinity_points),
        ("reality max IP", records.this_reality.max_ip, state.infinity_points),
        ("reality max EP", records.this_reality.max_ep, state.eternity_points),
        ("best EP", records.best_reality.best_ep, state.eternity_points),
        ("max dark matter", laitela.max_dark_matter, laitela.dark_matter),
    ];
    checks
        .into_iter()
        .find(|(_, record, value)| record < value)
        .map(|(label, record, value)| format!("{label} {record} trails {value}"))
}

/// Run every expectation, returning the first failure message.
pub fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    if let Some(first) = summary.violations.first() {
        return Some(format!(
            "{} invariant violation(s), first: {first}",
            summary.violations.len()
        ));
    }
    plan.expectations
        .iter()
        .find_map(|expectation| expectation(summary).err().map(|err| err.to_string()))
}
