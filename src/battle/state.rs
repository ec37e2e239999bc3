use crate::combatant::{Combatant, CombatantTemplate};
use crate::errors::{BattleResult, BattleStateError};
use crate::player::{BattlerIndex, PlayerAction, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{Move, Species, StatusType, TypeSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

const VALID_LEVELS: RangeInclusive<u8> = 1..=100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    PlayerWin,
    EnemyWin,
    Draw,
}

impl GameState {
    pub fn is_over(self) -> bool {
        matches!(self, GameState::PlayerWin | GameState::EnemyWin | GameState::Draw)
    }

    pub fn won_by(side: Side) -> GameState {
        match side {
            Side::Player => GameState::PlayerWin,
            Side::Enemy => GameState::EnemyWin,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnOrderDetermined {
        order: Vec<BattlerIndex>,
        forced: bool,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Moves
    MoveUsed {
        battler: BattlerIndex,
        pokemon: Species,
        move_used: Move,
    },
    AttackTypeEffectiveness {
        target: BattlerIndex,
        multiplier: f64,
    },
    DamageDealt {
        target: BattlerIndex,
        pokemon: Species,
        damage: u16,
        remaining_hp: u16,
    },
    HitCount {
        hits: u8,
    },

    // Effects
    TypeChanged {
        target: BattlerIndex,
        pokemon: Species,
        old_types: TypeSet,
        new_types: TypeSet,
    },
    StatusApplied {
        target: BattlerIndex,
        pokemon: Species,
        status: StatusType,
    },
    StatusDamage {
        target: BattlerIndex,
        pokemon: Species,
        status: StatusType,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonFainted {
        battler: BattlerIndex,
        pokemon: Species,
    },

    // Action Failures
    ActionFailed {
        battler: BattlerIndex,
        reason: ActionFailureReason,
    },

    // Battle End
    SideForfeited {
        side: Side,
    },
    BattleEnded {
        winner: Option<Side>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnOrderDetermined { .. } | BattleEvent::TurnEnded { .. } => None,

            BattleEvent::MoveUsed {
                pokemon, move_used, ..
            } => Some(format!("{} used {}!", pokemon, move_used)),
            BattleEvent::AttackTypeEffectiveness { multiplier, .. } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::DamageDealt {
                pokemon, damage, ..
            } => Some(format!("{} took {} damage!", pokemon, damage)),
            BattleEvent::HitCount { hits } => Some(format!("Hit {} time(s)!", hits)),

            BattleEvent::TypeChanged {
                pokemon, new_types, ..
            } => Some(format!("{} transformed into the {} type!", pokemon, new_types)),
            BattleEvent::StatusApplied {
                pokemon, status, ..
            } => Some(format!("{} {}", pokemon, Self::format_status_applied(*status))),
            BattleEvent::StatusDamage {
                pokemon, status, ..
            } => Some(format!(
                "{} is hurt by its {}!",
                pokemon,
                status.to_string().to_lowercase()
            )),
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),

            BattleEvent::ActionFailed { reason, .. } => Some(reason.to_string()),

            BattleEvent::SideForfeited { side } => {
                Some(format!("The {} side forfeited the battle!", side.label()))
            }
            BattleEvent::BattleEnded { winner } => match winner {
                Some(side) => Some(format!("The {} side has won the battle!", side.label())),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }

    fn format_status_applied(status: StatusType) -> &'static str {
        match status {
            StatusType::Burn => "was burned!",
            StatusType::Poison => "was poisoned!",
            StatusType::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    /// The acting combatant fainted before its turn came up
    UserFainted,
    /// No standing opponent is left to target
    NoTarget,
    /// The move has no effect on the current target
    MoveFailed,
}

impl std::fmt::Display for ActionFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionFailureReason::UserFainted => write!(f, "It can't move!"),
            ActionFailureReason::NoTarget => write!(f, "But there was no target..."),
            ActionFailureReason::MoveFailed => write!(f, "But it failed!"),
        }
    }
}

/// Event bus for collecting and managing battle events.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Print all events using their formatted text, skipping silent events.
    pub fn print_formatted(&self) {
        for line in self.formatted_lines() {
            println!("  {}", line);
        }
    }

    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// Source of percentage rolls (1..=100) for damage rolls and chance effects.
///
/// Scripted sources replay a fixed list of outcomes, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn new_seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self::new_seeded(rand::rng().random())
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } if !outcomes.is_empty() => {
                if *index >= outcomes.len() {
                    tracing::warn!(reason, "scripted rng exhausted, replaying from the start");
                    *index = 0;
                }
                let outcome = outcomes[*index].clamp(1, 100);
                *index += 1;
                outcome
            }
            RngSource::Scripted { .. } => 100,
            RngSource::Seeded(rng) => rng.random_range(1..=100),
        };
        tracing::trace!(outcome, reason, "rng consumed");
        outcome
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub combatants: Vec<Combatant>,
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: BTreeMap<BattlerIndex, PlayerAction>,
}

impl BattleState {
    /// Builds a battle from per-side templates. Slot indices follow template order.
    pub fn new(
        id: String,
        player_templates: &[CombatantTemplate],
        enemy_templates: &[CombatantTemplate],
    ) -> BattleResult<Self> {
        if player_templates.is_empty() {
            return Err(BattleStateError::EmptySide("player").into());
        }
        if enemy_templates.is_empty() {
            return Err(BattleStateError::EmptySide("enemy").into());
        }

        for template in player_templates.iter().chain(enemy_templates) {
            if !VALID_LEVELS.contains(&template.level) {
                return Err(BattleStateError::InvalidLevel {
                    species: template.species,
                    level: template.level,
                }
                .into());
            }
        }

        let sides = [(Side::Player, player_templates), (Side::Enemy, enemy_templates)];
        let combatants: Vec<Combatant> = sides
            .into_iter()
            .flat_map(|(side, templates)| {
                templates.iter().enumerate().map(move |(slot, template)| {
                    Combatant::from_template(BattlerIndex::new(side, slot as u8), template)
                })
            })
            .collect();

        // A side with nobody standing would never reach a faint check.
        for side in [Side::Player, Side::Enemy] {
            let mut members = combatants.iter().filter(|c| c.battler.side == side);
            if members.all(Combatant::is_fainted) {
                return Err(BattleStateError::SideAlreadyDefeated(side.label()).into());
            }
        }

        Ok(Self {
            battle_id: id,
            combatants,
            turn_number: 1,
            game_state: GameState::WaitingForActions,
            action_queue: BTreeMap::new(),
        })
    }

    pub fn combatant(&self, battler: BattlerIndex) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.battler == battler)
    }

    pub fn combatant_mut(&mut self, battler: BattlerIndex) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.battler == battler)
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(move |c| c.battler.side == side)
    }

    /// Battlers that are still standing, in slot order.
    pub fn standing_battlers(&self) -> Vec<BattlerIndex> {
        let mut battlers: Vec<_> = self
            .combatants
            .iter()
            .filter(|c| !c.is_fainted())
            .map(|c| c.battler)
            .collect();
        battlers.sort();
        battlers
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.side(side).all(Combatant::is_fainted)
    }

    pub fn first_standing_opponent(&self, battler: BattlerIndex) -> Option<BattlerIndex> {
        self.side(battler.side.opponent())
            .filter(|c| !c.is_fainted())
            .map(|c| c.battler)
            .min()
    }

    /// Standing battlers that have not submitted an action yet.
    pub fn battlers_awaiting_action(&self) -> Vec<BattlerIndex> {
        self.standing_battlers()
            .into_iter()
            .filter(|battler| !self.action_queue.contains_key(battler))
            .collect()
    }
}
