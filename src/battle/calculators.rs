use crate::battle::effectiveness::Effectiveness;
use crate::battle::state::TurnRng;
use crate::battle::stats::{effective_attack, effective_defense};
use crate::combatant::Combatant;
use crate::move_data::MoveData;
use schema::{MoveCategory, StatusType};

const MIN_DAMAGE_ROLL: u32 = 85;

/// Maps a 1..=100 outcome onto the 85..=100 percent damage roll.
pub fn damage_roll(rng: &mut TurnRng) -> u32 {
    MIN_DAMAGE_ROLL + u32::from(rng.next_outcome("Damage Roll")) * (100 - MIN_DAMAGE_ROLL) / 100
}

/// Damage of one hit, before it is clamped to the defender's remaining HP.
///
/// Immune hits deal 0 and consume no roll; any other hit deals at least 1.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    effectiveness: &Effectiveness,
    stab_multiplier: f64,
    rng: &mut TurnRng,
) -> u16 {
    let Some(power) = move_data.power.filter(|_| move_data.is_damaging()) else {
        return 0;
    };
    if effectiveness.is_immune() {
        return 0;
    }

    let level = u32::from(attacker.level);
    let attack = u32::from(effective_attack(attacker, move_data));
    let defense = u32::from(effective_defense(defender, move_data));
    let base = ((2 * level / 5 + 2) * u32::from(power) * attack / defense) / 50 + 2;

    let stab = if attacker.types.contains(effectiveness.attacking_type) {
        stab_multiplier
    } else {
        1.0
    };
    let burn = if attacker.status == Some(StatusType::Burn)
        && move_data.category == MoveCategory::Physical
    {
        0.5
    } else {
        1.0
    };
    let roll = f64::from(damage_roll(rng)) / 100.0;

    let damage = (f64::from(base) * stab * effectiveness.multiplier * burn * roll).floor();
    tracing::trace!(base, stab, multiplier = effectiveness.multiplier, roll, damage, "damage calculated");
    (damage.min(f64::from(u16::MAX)) as u16).max(1)
}
