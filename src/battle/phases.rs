//! Phases of a battle round and their handlers.
//!
//! A handler reads the battle state, never mutates it, and returns a
//! [`PhaseOutcome`]: the commands to apply and the phases to run next. The
//! pipeline inserts those phases at the front of its queue, in order, so a
//! move's hits and their consequences resolve before the next queued action.

use crate::battle::calculators::calculate_damage;
use crate::battle::commands::BattleCommand;
use crate::battle::effectiveness::EffectivenessResolver;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, GameState, TurnRng};
use crate::battle::turn_order::{collect_pending, schedule};
use crate::combatant::Combatant;
use crate::config::EngineConfig;
use crate::errors::{BattleResult, BattleStateError};
use crate::move_data::get_move_data;
use crate::player::{BattlerIndex, PlayerAction, Side};
use schema::{Move, MoveEffect, PokemonType, StatusType, TypeSet};
use std::collections::VecDeque;
use strum::Display;

/// Fieldless identifier of a phase, used to drive and inspect the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PhaseKind {
    TurnStart,
    CommandPhase,
    MovePhase,
    MoveEffectPhase,
    EffectApplicationPhase,
    FaintPhase,
    TurnEndPhase,
    BattleEndPhase,
}

impl PhaseKind {
    /// Kinds that run at most once per round.
    pub fn is_repeatable(self) -> bool {
        !matches!(
            self,
            PhaseKind::TurnStart | PhaseKind::CommandPhase | PhaseKind::TurnEndPhase
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    TurnStart,
    /// Collects the round's actions and schedules them.
    Command,
    /// Announces a move and queues its hits or its effect.
    Move {
        battler: BattlerIndex,
        move_index: usize,
        target: Option<BattlerIndex>,
    },
    /// One hit of a damaging move.
    MoveEffect {
        attacker: BattlerIndex,
        target: BattlerIndex,
        move_used: Move,
        hit: u8,
        total_hits: u8,
    },
    /// Secondary effect of a move that connected.
    EffectApplication {
        attacker: BattlerIndex,
        target: BattlerIndex,
        move_used: Move,
        effect: MoveEffect,
    },
    Faint {
        battler: BattlerIndex,
    },
    TurnEnd,
    /// Terminal. `winner` is `None` on a draw.
    BattleEnd {
        winner: Option<Side>,
        forfeited_by: Option<Side>,
    },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::TurnStart => PhaseKind::TurnStart,
            Phase::Command => PhaseKind::CommandPhase,
            Phase::Move { .. } => PhaseKind::MovePhase,
            Phase::MoveEffect { .. } => PhaseKind::MoveEffectPhase,
            Phase::EffectApplication { .. } => PhaseKind::EffectApplicationPhase,
            Phase::Faint { .. } => PhaseKind::FaintPhase,
            Phase::TurnEnd => PhaseKind::TurnEndPhase,
            Phase::BattleEnd { .. } => PhaseKind::BattleEndPhase,
        }
    }

    /// Runs the handler for this phase.
    pub fn execute(&self, ctx: &mut PhaseContext<'_>) -> BattleResult<PhaseOutcome> {
        match self {
            Phase::TurnStart => Ok(turn_start(ctx.state)),
            Phase::Command => command_phase(ctx),
            Phase::Move {
                battler,
                move_index,
                target,
            } => move_phase(ctx.state, *battler, *move_index, *target),
            Phase::MoveEffect {
                attacker,
                target,
                move_used,
                hit,
                total_hits,
            } => move_effect_phase(ctx, *attacker, *target, *move_used, *hit, *total_hits),
            Phase::EffectApplication {
                attacker,
                target,
                move_used,
                effect,
            } => effect_application_phase(ctx, *attacker, *target, *move_used, *effect),
            Phase::Faint { battler } => faint_phase(ctx.state, *battler),
            Phase::TurnEnd => Ok(turn_end_phase(ctx.state, ctx.config)),
            Phase::BattleEnd {
                winner,
                forfeited_by,
            } => Ok(battle_end_phase(*winner, *forfeited_by)),
        }
    }
}

/// Everything a handler may read, plus the round's randomness.
pub struct PhaseContext<'a> {
    pub state: &'a BattleState,
    pub config: &'a EngineConfig,
    pub resolver: &'a EffectivenessResolver,
    pub rng: &'a mut TurnRng,
    /// Explicit order for this round's actions, if one was supplied.
    pub forced_order: Option<&'a [BattlerIndex]>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseOutcome {
    pub commands: Vec<BattleCommand>,
    /// Inserted at the front of the queue, in this order.
    pub next_phases: Vec<Phase>,
}

impl PhaseOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, command: BattleCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn event(self, event: BattleEvent) -> Self {
        self.command(BattleCommand::EmitEvent(event))
    }

    pub fn then(mut self, phase: Phase) -> Self {
        self.next_phases.push(phase);
        self
    }
}

/// Ordered queue of upcoming phases.
#[derive(Debug, Clone, Default)]
pub struct PhaseQueue {
    phases: VecDeque<Phase>,
}

impl PhaseQueue {
    pub fn new() -> Self {
        Self {
            phases: VecDeque::new(),
        }
    }

    /// Adds a phase to the end of the queue.
    pub fn push_back(&mut self, phase: Phase) {
        self.phases.push_back(phase);
    }

    /// Inserts phases at the front, keeping their relative order.
    pub fn push_front_all(&mut self, phases: Vec<Phase>) {
        for phase in phases.into_iter().rev() {
            self.phases.push_front(phase);
        }
    }

    /// Removes and returns the next phase to be executed.
    pub fn pop_front(&mut self) -> Option<Phase> {
        self.phases.pop_front()
    }

    pub fn clear(&mut self) {
        self.phases.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter()
    }
}

fn turn_start(state: &BattleState) -> PhaseOutcome {
    tracing::info!(turn = state.turn_number, battle = %state.battle_id, "round started");
    PhaseOutcome::new()
        .command(BattleCommand::SetGameState(GameState::WaitingForActions))
        .event(BattleEvent::TurnStarted {
            turn_number: state.turn_number,
        })
        .then(Phase::Command)
}

fn command_phase(ctx: &mut PhaseContext<'_>) -> BattleResult<PhaseOutcome> {
    let state = ctx.state;
    let pending = collect_pending(state)?;
    let ordered = schedule(
        pending,
        ctx.forced_order,
        ctx.config.tie_break,
        state.turn_number,
    )?;

    let order: Vec<BattlerIndex> = ordered.iter().map(|p| p.battler).collect();
    tracing::debug!(?order, forced = ctx.forced_order.is_some(), "turn order determined");

    let mut outcome = PhaseOutcome::new()
        .command(BattleCommand::SetGameState(GameState::TurnInProgress))
        .command(BattleCommand::ClearActionQueue)
        .event(BattleEvent::TurnOrderDetermined {
            order,
            forced: ctx.forced_order.is_some(),
        });

    for pending in ordered {
        outcome = match pending.action {
            PlayerAction::Forfeit => outcome.then(Phase::BattleEnd {
                winner: Some(pending.battler.side.opponent()),
                forfeited_by: Some(pending.battler.side),
            }),
            PlayerAction::UseMove { move_index, target } => outcome.then(Phase::Move {
                battler: pending.battler,
                move_index,
                target,
            }),
        };
    }
    Ok(outcome.then(Phase::TurnEnd))
}

/// The requested target if still standing, else the first standing opponent.
fn resolve_target(
    state: &BattleState,
    battler: BattlerIndex,
    requested: Option<BattlerIndex>,
) -> Option<BattlerIndex> {
    requested
        .filter(|target| state.combatant(*target).is_some_and(|c| !c.is_fainted()))
        .or_else(|| state.first_standing_opponent(battler))
}

fn action_failed(battler: BattlerIndex, reason: ActionFailureReason) -> PhaseOutcome {
    tracing::warn!(%battler, ?reason, "action skipped");
    PhaseOutcome::new().event(BattleEvent::ActionFailed { battler, reason })
}

fn move_phase(
    state: &BattleState,
    battler: BattlerIndex,
    move_index: usize,
    requested_target: Option<BattlerIndex>,
) -> BattleResult<PhaseOutcome> {
    let user = state
        .combatant(battler)
        .ok_or(BattleStateError::UnknownBattler(battler))?;
    if user.is_fainted() {
        return Ok(action_failed(battler, ActionFailureReason::UserFainted));
    }
    let Some(move_used) = user.move_at(move_index) else {
        return Ok(action_failed(battler, ActionFailureReason::MoveFailed));
    };

    let mut outcome = PhaseOutcome::new().event(BattleEvent::MoveUsed {
        battler,
        pokemon: user.species,
        move_used,
    });

    let Some(target) = resolve_target(state, battler, requested_target) else {
        return Ok(outcome.event(BattleEvent::ActionFailed {
            battler,
            reason: ActionFailureReason::NoTarget,
        }));
    };
    let Some(move_data) = get_move_data(move_used) else {
        return Ok(outcome.event(BattleEvent::ActionFailed {
            battler,
            reason: ActionFailureReason::MoveFailed,
        }));
    };

    if move_data.is_damaging() {
        let total_hits = move_data.hits.max(1);
        for hit in 1..=total_hits {
            outcome = outcome.then(Phase::MoveEffect {
                attacker: battler,
                target,
                move_used,
                hit,
                total_hits,
            });
        }
    } else if let Some(effect) = move_data.effect {
        outcome = outcome.then(Phase::EffectApplication {
            attacker: battler,
            target,
            move_used,
            effect,
        });
    }
    Ok(outcome)
}

fn standing(state: &BattleState, battler: BattlerIndex) -> BattleResult<Option<&Combatant>> {
    let combatant = state
        .combatant(battler)
        .ok_or(BattleStateError::UnknownBattler(battler))?;
    Ok((!combatant.is_fainted()).then_some(combatant))
}

fn move_effect_phase(
    ctx: &mut PhaseContext<'_>,
    attacker: BattlerIndex,
    target: BattlerIndex,
    move_used: Move,
    hit: u8,
    total_hits: u8,
) -> BattleResult<PhaseOutcome> {
    let (Some(user), Some(defender)) = (standing(ctx.state, attacker)?, standing(ctx.state, target)?)
    else {
        // A previous hit already decided this exchange.
        return Ok(PhaseOutcome::new());
    };
    let Some(move_data) = get_move_data(move_used) else {
        return Ok(PhaseOutcome::new());
    };

    let effectiveness = ctx.resolver.resolve_with_data(move_data, user, defender);
    let mut outcome = PhaseOutcome::new()
        .command(BattleCommand::RecordEffectiveness {
            target,
            multiplier: effectiveness.multiplier,
        })
        .event(BattleEvent::AttackTypeEffectiveness {
            target,
            multiplier: effectiveness.multiplier,
        });
    if effectiveness.is_immune() {
        return Ok(outcome);
    }

    let damage = calculate_damage(
        user,
        defender,
        move_data,
        &effectiveness,
        ctx.config.stab_multiplier,
        ctx.rng,
    );
    outcome = outcome.command(BattleCommand::DealDamage {
        target,
        amount: damage,
    });

    let knocked_out = damage >= defender.current_hp();
    if (knocked_out || hit == total_hits) && total_hits > 1 {
        outcome = outcome.event(BattleEvent::HitCount { hits: hit });
    }
    if knocked_out {
        return Ok(outcome.then(Phase::Faint { battler: target }));
    }
    if hit == total_hits {
        if let Some(effect) = move_data.effect {
            outcome = outcome.then(Phase::EffectApplication {
                attacker,
                target,
                move_used,
                effect,
            });
        }
    }
    Ok(outcome)
}

/// Types that can never receive a status.
fn status_immune(types: &TypeSet, status: StatusType) -> bool {
    match status {
        StatusType::Burn => types.contains(PokemonType::Fire),
        StatusType::Paralysis => types.contains(PokemonType::Electric),
        StatusType::Poison => {
            types.contains(PokemonType::Poison) || types.contains(PokemonType::Steel)
        }
    }
}

fn effect_application_phase(
    ctx: &mut PhaseContext<'_>,
    attacker: BattlerIndex,
    target: BattlerIndex,
    move_used: Move,
    effect: MoveEffect,
) -> BattleResult<PhaseOutcome> {
    let Some(defender) = standing(ctx.state, target)? else {
        return Ok(PhaseOutcome::new());
    };
    let is_status_move = get_move_data(move_used).is_some_and(|data| !data.is_damaging());

    match effect {
        MoveEffect::ChangeTargetType(new_type) => {
            if defender.types.is_pure(new_type) {
                return Ok(action_failed(attacker, ActionFailureReason::MoveFailed));
            }
            let new_types = TypeSet::single(new_type);
            Ok(PhaseOutcome::new()
                .command(BattleCommand::SetTypes {
                    target,
                    types: new_types,
                })
                .event(BattleEvent::TypeChanged {
                    target,
                    pokemon: defender.species,
                    old_types: defender.types,
                    new_types,
                }))
        }
        MoveEffect::InflictStatus { status, chance } => {
            if defender.status.is_some() || status_immune(&defender.types, status) {
                // Secondary chances fail silently; a dedicated status move reports it.
                return Ok(if is_status_move {
                    action_failed(attacker, ActionFailureReason::MoveFailed)
                } else {
                    PhaseOutcome::new()
                });
            }
            if ctx.rng.next_outcome("Status Chance") > chance {
                return Ok(PhaseOutcome::new());
            }
            Ok(PhaseOutcome::new()
                .command(BattleCommand::SetStatus {
                    target,
                    status: Some(status),
                })
                .event(BattleEvent::StatusApplied {
                    target,
                    pokemon: defender.species,
                    status,
                }))
        }
    }
}

fn faint_phase(state: &BattleState, battler: BattlerIndex) -> BattleResult<PhaseOutcome> {
    let combatant = state
        .combatant(battler)
        .ok_or(BattleStateError::UnknownBattler(battler))?;
    let outcome = PhaseOutcome::new().event(BattleEvent::PokemonFainted {
        battler,
        pokemon: combatant.species,
    });

    match decide_winner(
        state.side_defeated(Side::Player),
        state.side_defeated(Side::Enemy),
    ) {
        Some(winner) => Ok(outcome.then(Phase::BattleEnd {
            winner,
            forfeited_by: None,
        })),
        None => Ok(outcome),
    }
}

/// `Some(winner)` once a side is out; the inner `None` is a draw.
fn decide_winner(player_out: bool, enemy_out: bool) -> Option<Option<Side>> {
    match (player_out, enemy_out) {
        (false, false) => None,
        (true, true) => Some(None),
        (true, false) => Some(Some(Side::Enemy)),
        (false, true) => Some(Some(Side::Player)),
    }
}

fn turn_end_phase(state: &BattleState, config: &EngineConfig) -> PhaseOutcome {
    let mut outcome = PhaseOutcome::new();
    let mut fainted = Vec::new();

    if config.status_chip_damage {
        for combatant in state.combatants.iter().filter(|c| !c.is_fainted()) {
            let Some(status @ (StatusType::Burn | StatusType::Poison)) = combatant.status else {
                continue;
            };
            let damage = (combatant.max_hp() / 8).max(1);
            let remaining_hp = combatant.current_hp().saturating_sub(damage);
            outcome = outcome
                .command(BattleCommand::DealDamage {
                    target: combatant.battler,
                    amount: damage,
                })
                .event(BattleEvent::StatusDamage {
                    target: combatant.battler,
                    pokemon: combatant.species,
                    status,
                    damage: damage.min(combatant.current_hp()),
                    remaining_hp,
                });
            if remaining_hp == 0 {
                fainted.push(combatant);
            }
        }
    }

    // Chip knockouts resolve here, so the round closes before the counter moves.
    for combatant in &fainted {
        outcome = outcome.event(BattleEvent::PokemonFainted {
            battler: combatant.battler,
            pokemon: combatant.species,
        });
    }
    outcome = outcome.event(BattleEvent::TurnEnded {
        turn_number: state.turn_number,
    });

    let side_out = |side: Side| {
        state
            .side(side)
            .all(|c| c.is_fainted() || fainted.iter().any(|f| f.battler == c.battler))
    };
    match decide_winner(side_out(Side::Player), side_out(Side::Enemy)) {
        Some(winner) => outcome.then(Phase::BattleEnd {
            winner,
            forfeited_by: None,
        }),
        None => outcome
            .command(BattleCommand::IncrementTurnNumber)
            .command(BattleCommand::SetGameState(GameState::WaitingForActions))
            .then(Phase::TurnStart),
    }
}

fn battle_end_phase(winner: Option<Side>, forfeited_by: Option<Side>) -> PhaseOutcome {
    tracing::info!(winner = ?winner, forfeited_by = ?forfeited_by, "battle ended");
    let final_state = winner.map_or(GameState::Draw, GameState::won_by);
    let mut outcome = PhaseOutcome::new();
    if let Some(side) = forfeited_by {
        outcome = outcome.event(BattleEvent::SideForfeited { side });
    }
    outcome
        .command(BattleCommand::SetGameState(final_state))
        .event(BattleEvent::BattleEnded { winner })
}
