use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState};
use crate::combatant::Combatant;
use crate::errors::{BattleResult, BattleStateError};
use crate::player::{BattlerIndex, PlayerAction};
use schema::{StatusType, TypeSet};

/// Atomic commands representing final state changes.
///
/// Phase handlers only ever describe changes as commands; the pipeline is the
/// single place that applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    IncrementTurnNumber,
    QueueAction {
        battler: BattlerIndex,
        action: PlayerAction,
    },
    ClearActionQueue,

    // Combatant modifications
    DealDamage {
        target: BattlerIndex,
        amount: u16,
    },
    SetTypes {
        target: BattlerIndex,
        types: TypeSet,
    },
    SetStatus {
        target: BattlerIndex,
        status: Option<StatusType>,
    },
    RecordEffectiveness {
        target: BattlerIndex,
        multiplier: f64,
    },

    // Battle flow
    EmitEvent(BattleEvent),
}

/// Execute a batch of commands in order, stopping at the first failure.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> BattleResult<()> {
    for command in commands {
        tracing::trace!(?command, "executing command");
        execute_command(command, state, bus)?;
    }
    Ok(())
}

/// Helper function to execute commands that operate on a single combatant
fn execute_combatant_command<F>(
    target: BattlerIndex,
    state: &mut BattleState,
    operation: F,
) -> BattleResult<()>
where
    F: FnOnce(&mut Combatant),
{
    let combatant = state
        .combatant_mut(target)
        .ok_or(BattleStateError::UnknownBattler(target))?;
    operation(combatant);
    Ok(())
}

/// Helper function specifically for DealDamage command with event emission
fn execute_deal_damage_command(
    target: BattlerIndex,
    amount: u16,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let combatant = state
        .combatant_mut(target)
        .ok_or(BattleStateError::UnknownBattler(target))?;
    let dealt = combatant.take_damage(amount);

    bus.push(BattleEvent::DamageDealt {
        target,
        pokemon: combatant.species,
        damage: dealt,
        remaining_hp: combatant.current_hp(),
    });
    Ok(())
}

fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> BattleResult<()> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
            Ok(())
        }
        BattleCommand::DealDamage { target, amount } => {
            execute_deal_damage_command(target, amount, state, bus)
        }
        BattleCommand::SetTypes { target, types } => {
            execute_combatant_command(target, state, |combatant| combatant.types = types)
        }
        BattleCommand::SetStatus { target, status } => {
            execute_combatant_command(target, state, |combatant| combatant.status = status)
        }
        BattleCommand::RecordEffectiveness { target, multiplier } => {
            execute_combatant_command(target, state, |combatant| {
                combatant.last_effectiveness = Some(multiplier)
            })
        }
        BattleCommand::SetGameState(new_state) => {
            state.game_state = new_state;
            Ok(())
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
            Ok(())
        }
        BattleCommand::QueueAction { battler, action } => {
            if state.combatant(battler).is_none() {
                return Err(BattleStateError::UnknownBattler(battler).into());
            }
            state.action_queue.insert(battler, action);
            Ok(())
        }
        BattleCommand::ClearActionQueue => {
            state.action_queue.clear();
            Ok(())
        }
    }
}
