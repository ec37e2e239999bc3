//! Scripted battles loaded from RON.
//!
//! A scenario names both sides, an engine config and the actions each round.
//! Running it drives a `PhasePipeline` until the battle ends or the script runs
//! out, and hands back the full event log.

use crate::battle::pipeline::{AdvanceOutcome, PhasePipeline};
use crate::battle::state::{BattleEvent, BattleState, GameState};
use crate::combatant::CombatantTemplate;
use crate::config::EngineConfig;
use crate::errors::{BattleResult, ConfigError, ConfigResult};
use crate::player::{BattlerIndex, PlayerAction};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub battler: BattlerIndex,
    pub action: PlayerAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptedRound {
    pub actions: Vec<ScriptedAction>,
    /// Forces the order actions resolve in this round.
    #[serde(default)]
    pub turn_order: Option<Vec<BattlerIndex>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub config: EngineConfig,
    pub player: Vec<CombatantTemplate>,
    pub enemy: Vec<CombatantTemplate>,
    #[serde(default)]
    pub rounds: Vec<ScriptedRound>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub events: Vec<BattleEvent>,
    pub game_state: GameState,
    /// Rounds that ran to completion (or ended the battle).
    pub turns_played: u32,
}

impl Scenario {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let scenario: Scenario = ron::from_str(source)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_ron_str(&content)
    }

    pub fn run(&self) -> BattleResult<ScenarioOutcome> {
        tracing::info!(scenario = %self.name, rounds = self.rounds.len(), "running scenario");
        let state = BattleState::new(self.name.clone(), &self.player, &self.enemy)?;
        let mut pipeline = PhasePipeline::new(state, self.config.clone());
        let mut events = Vec::new();
        let mut turns_played = 0;

        for (index, round) in self.rounds.iter().enumerate() {
            if pipeline.is_over() {
                tracing::warn!(
                    scenario = %self.name,
                    skipped = self.rounds.len() - index,
                    "battle ended before the script did"
                );
                break;
            }
            if let Some(order) = &round.turn_order {
                pipeline.set_turn_order(order.clone())?;
            }
            for scripted in &round.actions {
                pipeline.submit_action(scripted.battler, scripted.action.clone())?;
            }

            if let AdvanceOutcome::AwaitingActions = pipeline.to_next_turn()? {
                return Err(ConfigError::InvalidValue {
                    field: "rounds",
                    message: format!(
                        "round {} has no action for {:?}",
                        index + 1,
                        pipeline.awaiting_actions()
                    ),
                }
                .into());
            }
            events.extend(pipeline.take_events());
            turns_played += 1;
        }

        Ok(ScenarioOutcome {
            events,
            game_state: pipeline.state().game_state,
            turns_played,
        })
    }
}
