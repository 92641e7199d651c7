//! Read-only views for display consumers.

use serde::Serialize;

use crate::decimal::Decimal;
use crate::registry::{
    self, ANTIMATTER, CurrencyId, IMAGINARY_MACHINES, REALITY_MACHINES, SINGULARITIES,
};
use crate::state::PlayerState;

/// Reality machine exponent at which the imaginary machine counter appears.
const IMAGINARY_REVEAL_EXPONENT: i64 = 1000;
/// Peak IP/min rates above this are not worth printing.
const PEAK_RATE_DISPLAY_LIMIT: Decimal = Decimal::pow10(100_000);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyReadout {
    pub id: CurrencyId,
    pub value: Decimal,
    pub display: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RealityMachinesReadout {
    pub reality_machines: Decimal,
    pub imaginary_machines: Decimal,
    pub show_imaginary: bool,
}

impl RealityMachinesReadout {
    #[must_use]
    pub fn from_state(state: &PlayerState) -> Self {
        let reality_machines = REALITY_MACHINES.value(state);
        let imaginary_machines = IMAGINARY_MACHINES.value(state);
        Self {
            reality_machines,
            imaginary_machines,
            show_imaginary: imaginary_machines > Decimal::ZERO
                || reality_machines.exponent() >= IMAGINARY_REVEAL_EXPONENT,
        }
    }
}

/// Inputs the crunch button needs that live outside the currency layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrunchContext {
    pub infinity_broken: bool,
    pub gained_ip: Decimal,
    pub minutes_this_infinity: f64,
    pub peak_ip_per_minute: Decimal,
}

/// Header button offering a big crunch once infinity is broken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BigCrunchReadout {
    pub gained_ip: Decimal,
    /// Present only while the peak rate is small enough to display.
    pub current_ip_per_minute: Option<Decimal>,
    pub peak_ip_per_minute: Option<Decimal>,
}

impl BigCrunchReadout {
    /// `None` while the button is hidden: infinity unbroken, antimatter below
    /// `f64::MAX`, or a normal challenge running.
    #[must_use]
    pub fn from_state(state: &PlayerState, context: &CrunchContext) -> Option<Self> {
        let visible = context.infinity_broken
            && ANTIMATTER.value(state) >= Decimal::from_f64(f64::MAX)
            && state.challenge.normal == 0;
        if !visible {
            return None;
        }
        let show_rates = context.peak_ip_per_minute <= PEAK_RATE_DISPLAY_LIMIT;
        Some(Self {
            gained_ip: context.gained_ip,
            current_ip_per_minute: show_rates.then(|| {
                context
                    .gained_ip
                    .divided_by(Decimal::from_f64(context.minutes_this_infinity))
            }),
            peak_ip_per_minute: show_rates.then_some(context.peak_ip_per_minute),
        })
    }
}

/// Singularity threshold series: `start`, then `start * repeat^n`.
/// A `repeat` of 1 or less means the milestone completes once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingularityMilestone {
    pub start: f64,
    pub repeat: f64,
    pub limit: Option<u32>,
}

impl SingularityMilestone {
    #[must_use]
    pub fn is_unique(self) -> bool {
        self.repeat <= 1.0 || self.limit == Some(1)
    }

    #[must_use]
    pub fn max_completions(self) -> Option<u32> {
        if self.repeat <= 1.0 {
            Some(self.limit.unwrap_or(1).min(1))
        } else {
            self.limit
        }
    }

    /// Singularities needed for completion number `completed + 1`.
    #[must_use]
    pub fn goal(self, completed: u32) -> f64 {
        let exponent = i32::try_from(completed).unwrap_or(i32::MAX);
        self.start * self.repeat.max(1.0).powi(exponent)
    }

    #[must_use]
    pub fn completions(self, singularities: f64) -> u32 {
        let cap = self.max_completions();
        let mut done = 0_u32;
        while cap.is_none_or(|cap| done < cap) {
            let goal = self.goal(done);
            let stalled = done > 0 && goal <= self.goal(done - 1);
            if !goal.is_finite() || stalled || singularities < goal {
                break;
            }
            done += 1;
        }
        done
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingularityMilestoneReadout {
    pub completions: u32,
    pub is_maxed: bool,
    pub is_unique: bool,
    pub next_goal: Option<f64>,
    pub remaining: f64,
    /// Fill of the progress bar between the previous and next goal, in `0..=1`.
    pub progress: f64,
}

impl SingularityMilestoneReadout {
    #[must_use]
    pub fn from_state(state: &PlayerState, milestone: SingularityMilestone) -> Self {
        let singularities = SINGULARITIES.value(state);
        let completions = milestone.completions(singularities);
        let is_maxed = milestone
            .max_completions()
            .is_some_and(|cap| completions >= cap);
        if is_maxed {
            return Self {
                completions,
                is_maxed,
                is_unique: milestone.is_unique(),
                next_goal: None,
                remaining: 0.0,
                progress: 1.0,
            };
        }
        let next = milestone.goal(completions);
        let previous = if completions == 0 {
            0.0
        } else {
            milestone.goal(completions - 1)
        };
        let span = next - previous;
        let progress = if span > 0.0 {
            ((singularities - previous) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            completions,
            is_maxed,
            is_unique: milestone.is_unique(),
            next_goal: Some(next),
            remaining: (next - singularities).max(0.0),
            progress,
        }
    }

    /// Condenses still needed at `per_condense` singularities each.
    #[must_use]
    pub fn condenses_to_next(&self, per_condense: f64) -> f64 {
        if self.remaining == 0.0 {
            return 0.0;
        }
        if per_condense > 0.0 {
            self.remaining / per_condense
        } else {
            f64::INFINITY
        }
    }
}

#[must_use]
pub fn currency(state: &PlayerState, id: CurrencyId) -> CurrencyReadout {
    let value = registry::lookup(id).value_decimal(state);
    CurrencyReadout {
        id,
        value,
        display: format_amount(value),
    }
}

/// One readout per registry currency, in registry order.
#[must_use]
pub fn all(state: &PlayerState) -> Vec<CurrencyReadout> {
    CurrencyId::ALL
        .into_iter()
        .map(|id| currency(state, id))
        .collect()
}

/// Whole numbers below a thousand print plainly; everything else in
/// two-decimal scientific form.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    let exponent = value.exponent();
    if (0..3).contains(&exponent) || value.is_zero() {
        format!("{:.0}", value.to_f64().floor())
    } else {
        format!("{:.2}e{}", value.mantissa(), exponent)
    }
}
