//! Antimatter currency layer
//!
//! Numeric strategies, the currency registry and the player state they act on
//! for an incremental game. The crate has no UI or platform dependencies.

pub mod currency;
pub mod decimal;
pub mod effects;
pub mod numbers;
pub mod ops;
pub mod readout;
pub mod registry;
pub mod state;

pub use currency::{Currency, CurrencyDef};
pub use decimal::{Decimal, ParseDecimalError};
pub use effects::{BonusEntry, BonusSource, GameRules, RulesConfig, RulesConfigError, StandardRules};
pub use ops::{DecimalOps, NumberOps, Operations};
pub use readout::{
    BigCrunchReadout, CrunchContext, CurrencyReadout, RealityMachinesReadout, SingularityMilestone,
    SingularityMilestoneReadout,
};
pub use registry::{AnyCurrency, CurrencyId, UnknownCurrency};
pub use state::{Glyph, GlyphKind, PlayerState};

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save player state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    fn save_game(&self, save_name: &str, state: &PlayerState) -> Result<(), Self::Error>;

    /// Load player state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<PlayerState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Owns the rules and storage backend for one game.
pub struct GameEngine<R, S>
where
    R: GameRules,
    S: GameStorage,
{
    rules: R,
    storage: S,
}

impl<R, S> GameEngine<R, S>
where
    R: GameRules,
    S: GameStorage,
{
    pub const fn new(rules: R, storage: S) -> Self {
        Self { rules, storage }
    }

    pub const fn rules(&self) -> &R {
        &self.rules
    }

    /// Fresh state with every currency at its reset floor.
    #[must_use]
    pub fn new_game(&self) -> PlayerState {
        PlayerState::new_game(&self.rules)
    }

    /// Bind a registry currency to `state` under this engine's rules.
    pub fn currency<'a, O: Operations>(
        &'a self,
        def: &'a CurrencyDef<O>,
        state: &'a mut PlayerState,
    ) -> Currency<'a, O> {
        def.bind(state, &self.rules)
    }

    /// Save a player state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn save_game(&self, save_name: &str, state: &PlayerState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, state)
    }

    /// Load a player state
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn load_game(&self, save_name: &str) -> Result<Option<PlayerState>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(mut state) = self.storage.load_game(save_name).map_err(Into::into)? else {
            return Ok(None);
        };
        // Older saves may predate some dimension or glyph slots
        state.ensure_slots();
        Ok(Some(state))
    }

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}
