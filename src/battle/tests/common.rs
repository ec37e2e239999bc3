use crate::battle::pipeline::PhasePipeline;
use crate::battle::state::{BattleEvent, BattleState, TurnRng};
use crate::combatant::CombatantTemplate;
use crate::config::EngineConfig;
use crate::errors::BattleResult;
use crate::player::BattlerIndex;
use schema::{Ability, Move, PokemonType, Species, StatType, StatusType, TypeSet};

/// A builder for creating test combatant templates with common defaults.
///
/// # Example
/// ```ignore
/// let feebas = TestCombatantBuilder::new(Species::Feebas, 50)
///     .with_moves(vec![Move::FreezeDry])
///     .with_status(StatusType::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    template: CombatantTemplate,
}

impl TestCombatantBuilder {
    /// Creates a new builder for a given species and level, knowing only Splash.
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            template: CombatantTemplate::new(species, level, vec![Move::Splash]),
        }
    }

    /// Sets the moves for the test combatant.
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.template.moves = moves;
        self
    }

    /// Sets the status condition for the test combatant.
    pub fn with_status(mut self, status: StatusType) -> Self {
        self.template.status = Some(status);
        self
    }

    /// Sets the current HP for the test combatant. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.template.hp = Some(hp);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.template.ability = Some(ability);
        self
    }

    /// Overrides the species' types.
    pub fn with_types(mut self, types: &[PokemonType]) -> Self {
        self.template.types = TypeSet::from_slice(types);
        self
    }

    /// Starts the combatant at the given stage for one stat.
    pub fn with_stat_stage(mut self, stat: StatType, stage: i8) -> Self {
        self.template.stat_stages.change(stat, stage);
        self
    }

    pub fn build(self) -> CombatantTemplate {
        self.template
    }
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(player: CombatantTemplate, enemy: CombatantTemplate) -> BattleState {
    assert_ok(BattleState::new(
        "test_battle".to_string(),
        &[player],
        &[enemy],
    ))
}

/// Creates a 1v1 pipeline with the default config and predictable rolls.
pub fn create_test_pipeline(player: CombatantTemplate, enemy: CombatantTemplate) -> PhasePipeline {
    create_test_pipeline_with_config(player, enemy, EngineConfig::default())
}

pub fn create_test_pipeline_with_config(
    player: CombatantTemplate,
    enemy: CombatantTemplate,
    config: EngineConfig,
) -> PhasePipeline {
    PhasePipeline::new(create_test_battle(player, enemy), config).with_rng(predictable_rng())
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Useful for tests where the specific RNG outcome is not important.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// Effectiveness multipliers reported against `target`, in order.
pub fn effectiveness_against(events: &[BattleEvent], target: BattlerIndex) -> Vec<f64> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::AttackTypeEffectiveness {
                target: hit,
                multiplier,
            } if *hit == target => Some(*multiplier),
            _ => None,
        })
        .collect()
}

/// Battlers in the order their moves were announced.
pub fn move_order(events: &[BattleEvent]) -> Vec<BattlerIndex> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { battler, .. } => Some(*battler),
            _ => None,
        })
        .collect()
}
