//! Currency definitions and the bound handle used by game code.
//!
//! A [`CurrencyDef`] is an immutable table of accessors and hooks that maps one
//! logical resource onto one field of [`PlayerState`]. All arithmetic goes
//! through the definition's [`Operations`] strategy. A [`Currency`] pairs a
//! definition with the state and rules it acts on for the duration of a borrow.

use std::fmt;

use crate::decimal::Decimal;
use crate::effects::GameRules;
use crate::ops::{DecimalOps, Operations};
use crate::registry::CurrencyId;
use crate::state::PlayerState;

pub type ReadFn<O> = fn(&PlayerState) -> <O as Operations>::Value;
/// Setter; record-tracking side effects belong here.
pub type WriteFn<O> = fn(&mut PlayerState, <O as Operations>::Value);
/// Runs after the base add with the amount that was added.
pub type AfterAddFn<O> = fn(&mut PlayerState, &dyn GameRules, <O as Operations>::Value);
pub type StartingValueFn<O> = fn(&PlayerState, &dyn GameRules) -> <O as Operations>::Value;
/// Composite reset. Must leave the stored value equal to the starting value.
pub type ResetFn<O> = fn(&CurrencyDef<O>, &mut PlayerState, &dyn GameRules);

pub struct CurrencyDef<O: Operations> {
    pub id: CurrencyId,
    pub read: ReadFn<O>,
    pub write: WriteFn<O>,
    pub after_add: Option<AfterAddFn<O>>,
    pub starting_value: StartingValueFn<O>,
    pub reset: Option<ResetFn<O>>,
}

/// Reset floor for currencies without bonus sources.
pub fn zero_floor<O: Operations>(_state: &PlayerState, _rules: &dyn GameRules) -> O::Value {
    O::zero()
}

impl<O: Operations> fmt::Debug for CurrencyDef<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyDef")
            .field("id", &self.id)
            .field("after_add", &self.after_add.is_some())
            .field("reset", &self.reset.is_some())
            .finish_non_exhaustive()
    }
}

impl<O: Operations> CurrencyDef<O> {
    #[must_use]
    pub fn value(&self, state: &PlayerState) -> O::Value {
        (self.read)(state)
    }

    pub fn set_value(&self, state: &mut PlayerState, value: O::Value) {
        (self.write)(state, value);
    }

    pub fn add(&self, state: &mut PlayerState, rules: &dyn GameRules, amount: O::Value) {
        let next = O::add(self.value(state), amount);
        self.set_value(state, next);
        if let Some(after_add) = self.after_add {
            after_add(state, rules, amount);
        }
    }

    /// Subtract, flooring at the representation's zero.
    pub fn subtract(&self, state: &mut PlayerState, amount: O::Value) {
        let next = O::max(O::subtract(self.value(state), amount), O::zero());
        self.set_value(state, next);
    }

    pub fn multiply(&self, state: &mut PlayerState, amount: O::Value) {
        let next = O::multiply(self.value(state), amount);
        self.set_value(state, next);
    }

    pub fn divide(&self, state: &mut PlayerState, amount: O::Value) {
        let next = O::divide(self.value(state), amount);
        self.set_value(state, next);
    }

    #[must_use]
    pub fn eq(&self, state: &PlayerState, amount: O::Value) -> bool {
        O::eq(self.value(state), amount)
    }

    #[must_use]
    pub fn gt(&self, state: &PlayerState, amount: O::Value) -> bool {
        O::gt(self.value(state), amount)
    }

    #[must_use]
    pub fn gte(&self, state: &PlayerState, amount: O::Value) -> bool {
        O::gte(self.value(state), amount)
    }

    #[must_use]
    pub fn lt(&self, state: &PlayerState, amount: O::Value) -> bool {
        O::lt(self.value(state), amount)
    }

    #[must_use]
    pub fn lte(&self, state: &PlayerState, amount: O::Value) -> bool {
        O::lte(self.value(state), amount)
    }

    /// Spend `cost` if affordable. Leaves the state untouched and returns
    /// `false` otherwise.
    pub fn purchase(&self, state: &mut PlayerState, cost: O::Value) -> bool {
        if !self.gte(state, cost) {
            log::trace!("{}: cannot afford {cost:?}", self.id);
            return false;
        }
        self.subtract(state, cost);
        true
    }

    /// Raise the value to at least `floor`.
    pub fn bump_to(&self, state: &mut PlayerState, floor: O::Value) {
        let next = O::max(self.value(state), floor);
        self.set_value(state, next);
    }

    /// Lower the value to at most `ceiling`.
    pub fn drop_to(&self, state: &mut PlayerState, ceiling: O::Value) {
        let next = O::min(self.value(state), ceiling);
        self.set_value(state, next);
    }

    #[must_use]
    pub fn starting_value(&self, state: &PlayerState, rules: &dyn GameRules) -> O::Value {
        (self.starting_value)(state, rules)
    }

    /// Base reset: store the starting value and nothing else. Composite reset
    /// hooks call this for their own step.
    pub fn reset_value(&self, state: &mut PlayerState, rules: &dyn GameRules) {
        let start = self.starting_value(state, rules);
        self.set_value(state, start);
    }

    pub fn reset(&self, state: &mut PlayerState, rules: &dyn GameRules) {
        match self.reset {
            Some(reset) => {
                log::debug!("{}: composite reset", self.id);
                reset(self, state, rules);
            }
            None => self.reset_value(state, rules),
        }
    }

    /// Bind this definition to a state and rules set.
    pub fn bind<'a>(
        &'a self,
        state: &'a mut PlayerState,
        rules: &'a dyn GameRules,
    ) -> Currency<'a, O> {
        Currency {
            def: self,
            state,
            rules,
        }
    }
}

impl CurrencyDef<DecimalOps> {
    #[must_use]
    pub fn mantissa(&self, state: &PlayerState) -> f64 {
        self.value(state).mantissa()
    }

    #[must_use]
    pub fn exponent(&self, state: &PlayerState) -> i64 {
        self.value(state).exponent()
    }
}

/// A currency definition bound to the state it mutates.
pub struct Currency<'a, O: Operations> {
    def: &'a CurrencyDef<O>,
    state: &'a mut PlayerState,
    rules: &'a dyn GameRules,
}

impl<O: Operations> fmt::Debug for Currency<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Currency")
            .field("id", &self.def.id)
            .field("value", &self.value())
            .finish()
    }
}

impl<O: Operations> Currency<'_, O> {
    #[must_use]
    pub fn id(&self) -> CurrencyId {
        self.def.id
    }

    #[must_use]
    pub fn state(&self) -> &PlayerState {
        self.state
    }

    #[must_use]
    pub fn value(&self) -> O::Value {
        self.def.value(self.state)
    }

    pub fn set_value(&mut self, value: O::Value) {
        self.def.set_value(self.state, value);
    }

    pub fn add(&mut self, amount: O::Value) {
        self.def.add(self.state, self.rules, amount);
    }

    pub fn subtract(&mut self, amount: O::Value) {
        self.def.subtract(self.state, amount);
    }

    pub fn multiply(&mut self, amount: O::Value) {
        self.def.multiply(self.state, amount);
    }

    pub fn divide(&mut self, amount: O::Value) {
        self.def.divide(self.state, amount);
    }

    #[must_use]
    pub fn eq(&self, amount: O::Value) -> bool {
        self.def.eq(self.state, amount)
    }

    #[must_use]
    pub fn gt(&self, amount: O::Value) -> bool {
        self.def.gt(self.state, amount)
    }

    #[must_use]
    pub fn gte(&self, amount: O::Value) -> bool {
        self.def.gte(self.state, amount)
    }

    #[must_use]
    pub fn lt(&self, amount: O::Value) -> bool {
        self.def.lt(self.state, amount)
    }

    #[must_use]
    pub fn lte(&self, amount: O::Value) -> bool {
        self.def.lte(self.state, amount)
    }

    pub fn purchase(&mut self, cost: O::Value) -> bool {
        self.def.purchase(self.state, cost)
    }

    pub fn bump_to(&mut self, floor: O::Value) {
        self.def.bump_to(self.state, floor);
    }

    pub fn drop_to(&mut self, ceiling: O::Value) {
        self.def.drop_to(self.state, ceiling);
    }

    #[must_use]
    pub fn starting_value(&self) -> O::Value {
        self.def.starting_value(self.state, self.rules)
    }

    pub fn reset(&mut self) {
        self.def.reset(self.state, self.rules);
    }
}

impl Currency<'_, DecimalOps> {
    #[must_use]
    pub fn mantissa(&self) -> f64 {
        self.def.mantissa(self.state)
    }

    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.def.exponent(self.state)
    }
}

impl From<Currency<'_, DecimalOps>> for Decimal {
    fn from(currency: Currency<'_, DecimalOps>) -> Self {
        currency.value()
    }
}
