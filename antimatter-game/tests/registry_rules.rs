use antimatter_game::effects::{BonusSource, GameRules, StandardRules, perks};
use antimatter_game::registry::{
    self, ANTIMATTER, DARK_MATTER, ETERNITY_POINTS, INFINITIES_TOTAL, INFINITY_POWER, PERK_POINTS,
    REALITY_MACHINES, TIME_SHARDS, TIME_THEOREMS,
};
use antimatter_game::state::{Glyph, GlyphKind};
use antimatter_game::{Decimal, PlayerState};
use std::cell::Cell;

fn glyph(id: u32, kind: GlyphKind) -> Glyph {
    Glyph {
        id,
        kind,
        level: 5000,
        strength: 3.5,
    }
}

/// Wraps the standard rules and records what the currency layer asked for.
#[derive(Default)]
struct ObservingRules {
    inner: StandardRules,
    cap: Option<Decimal>,
    cap_reads: Cell<usize>,
    theorem_at_respec: Cell<Option<Decimal>>,
}

impl GameRules for ObservingRules {
    fn effect_max(&self, state: &PlayerState, base: Decimal, sources: &[BonusSource]) -> Decimal {
        self.inner.effect_max(state, base, sources)
    }

    fn reality_machine_cap(&self, state: &PlayerState) -> Decimal {
        self.cap_reads.set(self.cap_reads.get() + 1);
        match self.cap {
            // Cap grows with realities so stale caps would show up
            Some(per_reality) => per_reality.times(Decimal::from_f64(state.realities + 1.0)),
            None => self.inner.reality_machine_cap(state),
        }
    }

    fn time_studies_cost(&self, state: &PlayerState) -> Decimal {
        self.inner.time_studies_cost(state)
    }

    fn antimatter_dimension_production(&self, state: &PlayerState, tier: usize) -> Decimal {
        self.inner.antimatter_dimension_production(state, tier)
    }

    fn singularity_cap(&self, state: &PlayerState) -> f64 {
        self.inner.singularity_cap(state)
    }

    fn respec_time_studies(&self, state: &mut PlayerState) {
        self.theorem_at_respec.set(Some(state.timestudy.theorem));
        state.timestudy.studies.clear();
    }
}

#[test]
fn number_currency_clamps_subtraction_at_zero() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    let mut perk_points = PERK_POINTS.bind(&mut state, &rules);
    assert!(perk_points.eq(0.0));
    perk_points.add(5.0);
    assert!(perk_points.eq(5.0));
    perk_points.subtract(10.0);
    assert!(perk_points.eq(0.0));
}

#[test]
fn decimal_purchase_only_spends_when_affordable() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    let mut power = INFINITY_POWER.bind(&mut state, &rules);
    power.set_value(Decimal::from_f64(100.0));
    assert!(!power.purchase(Decimal::from_f64(150.0)));
    assert_eq!(power.value(), Decimal::from_f64(100.0));
    assert!(power.purchase(Decimal::from_f64(50.0)));
    assert_eq!(power.value(), Decimal::from_f64(50.0));
}

#[test]
fn time_theorem_max_only_follows_gains() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    assert!(TIME_THEOREMS.value(&state).is_zero());
    assert!(registry::time_theorem_max(&state).is_zero());

    let seven = Decimal::from_f64(7.0);
    TIME_THEOREMS.add(&mut state, &rules, seven);
    assert_eq!(TIME_THEOREMS.value(&state), seven);
    assert_eq!(registry::time_theorem_max(&state), seven);

    TIME_THEOREMS.subtract(&mut state, seven);
    assert!(TIME_THEOREMS.value(&state).is_zero());
    assert_eq!(registry::time_theorem_max(&state), seven);
}

#[test]
fn bump_to_never_lowers() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    let mut perk_points = PERK_POINTS.bind(&mut state, &rules);
    perk_points.set_value(3.0);
    perk_points.bump_to(10.0);
    assert!(perk_points.eq(10.0));
    perk_points.bump_to(2.0);
    assert!(perk_points.eq(10.0));
}

#[test]
fn antimatter_first_gain_clears_flag_once() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    assert!(state.achievement_checks.no_antimatter_produced);

    ANTIMATTER.add(&mut state, &rules, Decimal::ZERO);
    assert!(state.achievement_checks.no_antimatter_produced);

    ANTIMATTER.add(&mut state, &rules, Decimal::from_f64(-5.0));
    assert!(state.achievement_checks.no_antimatter_produced);

    ANTIMATTER.add(&mut state, &rules, Decimal::from_f64(95.0));
    assert!(!state.achievement_checks.no_antimatter_produced);
    assert_eq!(state.records.total_antimatter, Decimal::from_f64(100.0));
    assert_eq!(state.records.this_reality.max_am, Decimal::from_f64(100.0));

    ANTIMATTER.add(&mut state, &rules, Decimal::ONE);
    assert!(!state.achievement_checks.no_antimatter_produced);
    ANTIMATTER.reset(&mut state, &rules);
    assert!(!state.achievement_checks.no_antimatter_produced);
    assert_eq!(state.records.this_infinity.max_am, Decimal::from_f64(101.0));
}

#[test]
fn antimatter_floor_takes_largest_unlocked_bonus() {
    let rules = StandardRules::shared();
    let mut state = PlayerState::new_game(rules);
    assert_eq!(ANTIMATTER.starting_value(&state, rules), Decimal::TEN);

    state.unlocks.unlock(BonusSource::Achievement(21));
    assert_eq!(ANTIMATTER.starting_value(&state, rules), Decimal::from_f64(100.0));

    state.unlocks.unlock(BonusSource::Perk(perks::START_AM2));
    state.unlocks.unlock(BonusSource::Achievement(78));
    ANTIMATTER.reset(&mut state, rules);
    assert_eq!(state.antimatter, Decimal::new(5.0, 140));
}

#[test]
fn zero_floor_bonus_lists_fall_back_to_zero() {
    let rules = StandardRules::shared();
    let state = PlayerState::new_game(rules);
    assert!(registry::INFINITY_POINTS.starting_value(&state, rules).is_zero());
    assert!(registry::ETERNITIES.starting_value(&state, rules).is_zero());
    assert!(ETERNITY_POINTS.starting_value(&state, rules).is_zero());
}

#[test]
fn eternity_points_snapshot_glyphs_on_new_best() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    state.reality.glyphs.active[0] = Some(glyph(1, GlyphKind::Power));
    state.reality.glyphs.active[2] = Some(glyph(2, GlyphKind::Time));

    ETERNITY_POINTS.set_value(&mut state, Decimal::from_f64(100.0));
    let best = &state.records.best_reality;
    assert_eq!(best.best_ep, Decimal::from_f64(100.0));
    assert_eq!(
        best.best_ep_set,
        vec![glyph(1, GlyphKind::Power), glyph(2, GlyphKind::Time)]
    );

    state.reality.glyphs.active = vec![Some(glyph(9, GlyphKind::Effarig)); 5];
    ETERNITY_POINTS.set_value(&mut state, Decimal::from_f64(50.0));
    ETERNITY_POINTS.set_value(&mut state, Decimal::from_f64(100.0));
    assert_eq!(state.records.best_reality.best_ep_set.len(), 2);

    ETERNITY_POINTS.add(&mut state, &rules, Decimal::ONE);
    assert_eq!(state.records.best_reality.best_ep, Decimal::from_f64(101.0));
    assert_eq!(state.records.best_reality.best_ep_set.len(), 5);
    assert_eq!(state.records.this_reality.max_ep, Decimal::from_f64(101.0));
}

#[test]
fn eternity_point_reset_rewinds_reality_record() {
    let rules = StandardRules::shared();
    let mut state = PlayerState::new_game(rules);
    state.unlocks.unlock(BonusSource::Perk(perks::START_EP1));
    ETERNITY_POINTS.set_value(&mut state, Decimal::pow10(60));
    ETERNITY_POINTS.reset(&mut state, rules);
    assert_eq!(state.eternity_points, Decimal::TEN);
    assert_eq!(state.records.this_reality.max_ep, Decimal::TEN);
    assert_eq!(state.records.best_reality.best_ep, Decimal::pow10(60));
}

#[test]
fn time_theorem_reset_respecs_before_restoring_floor() {
    let rules = ObservingRules::default();
    let mut state = PlayerState::new_game(&rules);
    TIME_THEOREMS.add(&mut state, &rules, Decimal::from_f64(12.0));
    state.timestudy.studies = vec![11, 21];
    state.timestudy.am_bought = 3;
    state.timestudy.ip_bought = 2;
    state.timestudy.ep_bought = 1;

    TIME_THEOREMS.reset(&mut state, &rules);
    assert_eq!(
        rules.theorem_at_respec.get(),
        Some(Decimal::from_f64(12.0))
    );
    assert!(state.timestudy.studies.is_empty());
    assert!(state.timestudy.theorem.is_zero());
    assert!(state.timestudy.max_theorem.is_zero());
    assert_eq!(
        (
            state.timestudy.am_bought,
            state.timestudy.ip_bought,
            state.timestudy.ep_bought
        ),
        (0, 0, 0)
    );
}

#[test]
fn standard_respec_refunds_before_reset() {
    let rules = StandardRules::shared();
    let mut state = PlayerState::new_game(rules);
    state.timestudy.studies = vec![11, 21];
    TIME_THEOREMS.add(&mut state, rules, Decimal::from_f64(4.0));

    rules.respec_time_studies(&mut state);
    assert_eq!(state.timestudy.theorem, Decimal::from_f64(8.0));
    assert_eq!(registry::time_theorem_max(&state), Decimal::from_f64(4.0));
}

#[test]
fn reality_machines_clamp_to_cap_read_after_add() {
    let rules = ObservingRules {
        cap: Some(Decimal::from_f64(1000.0)),
        ..ObservingRules::default()
    };
    let mut state = PlayerState::new_game(&rules);

    REALITY_MACHINES.add(&mut state, &rules, Decimal::from_f64(5000.0));
    assert_eq!(REALITY_MACHINES.value(&state), Decimal::from_f64(1000.0));

    state.realities = 3.0;
    let reads_before = rules.cap_reads.get();
    REALITY_MACHINES.add(&mut state, &rules, Decimal::from_f64(5000.0));
    assert_eq!(rules.cap_reads.get(), reads_before + 1);
    assert_eq!(REALITY_MACHINES.value(&state), Decimal::from_f64(4000.0));

    REALITY_MACHINES.set_value(&mut state, Decimal::pow10(10));
    assert_eq!(REALITY_MACHINES.value(&state), Decimal::pow10(10));
}

#[test]
fn reality_machine_cap_uses_bundled_table() {
    let rules = StandardRules::shared();
    let mut state = PlayerState::new_game(rules);
    REALITY_MACHINES.add(&mut state, rules, Decimal::new(3.0, 1200));
    assert_eq!(state.reality.reality_machines, Decimal::pow10(1000));

    state.unlocks.unlock(BonusSource::ImaginaryUpgrade(6));
    REALITY_MACHINES.add(&mut state, rules, Decimal::new(3.0, 1200));
    assert_eq!(state.reality.reality_machines, Decimal::pow10(1100));
}

#[test]
fn infinities_total_writes_unbanked_count() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    state.infinities_banked = Decimal::from_f64(40.0);
    INFINITIES_TOTAL.add(&mut state, &rules, Decimal::from_f64(2.0));
    assert_eq!(state.infinities, Decimal::from_f64(42.0));
    assert_eq!(INFINITIES_TOTAL.value(&state), Decimal::from_f64(82.0));
}

#[test]
fn dark_matter_max_is_a_high_water_mark() {
    let rules = StandardRules::default();
    let mut state = PlayerState::new_game(&rules);
    DARK_MATTER.add(&mut state, &rules, Decimal::pow10(30));
    assert!(DARK_MATTER.purchase(&mut state, Decimal::pow10(29)));
    assert_eq!(registry::dark_matter_max(&state), Decimal::pow10(30));
    assert!(DARK_MATTER.lt(&state, registry::dark_matter_max(&state)));
}

#[test]
fn purchase_after_divide_by_zero_is_refused_for_both_representations() {
    let rules = StandardRules::shared();
    let mut state = PlayerState::new_game(rules);

    PERK_POINTS.set_value(&mut state, 0.0);
    PERK_POINTS.divide(&mut state, 0.0);
    let affordable = PERK_POINTS.gte(&state, 5.0);
    assert_eq!(PERK_POINTS.purchase(&mut state, 5.0), affordable);
    assert!(!affordable);
    assert!(PERK_POINTS.value(&state).is_nan());

    TIME_SHARDS.set_value(&mut state, Decimal::ZERO);
    TIME_SHARDS.divide(&mut state, Decimal::ZERO);
    let cost = Decimal::from_f64(5.0);
    let affordable = TIME_SHARDS.gte(&state, cost);
    assert_eq!(TIME_SHARDS.purchase(&mut state, cost), affordable);
    assert!(!affordable);
    assert!(TIME_SHARDS.value(&state).is_nan());

    PERK_POINTS.subtract(&mut state, 5.0);
    TIME_SHARDS.subtract(&mut state, cost);
    assert!(PERK_POINTS.eq(&state, 0.0));
    assert!(TIME_SHARDS.eq(&state, Decimal::ZERO));
}
