//! Type effectiveness as an ordered chain of rules.
//!
//! Each rule reads the move, attacker and defender and refines an
//! [`EffectivenessState`]: the per-defending-type components and any
//! override that replaces their product. Forced effectiveness always runs
//! last so that it sees every override it may need to remove.

use crate::combatant::Combatant;
use crate::config::ForcedEffectivenessConfig;
use crate::move_data::{get_move_data, MoveData};
use schema::{Ability, Move, MoveFlag, PokemonType, TypeChart, NEUTRAL, NO_EFFECT};
use serde::Serialize;
use std::fmt;

/// Multiplier contributed by one of the defender's current types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Component {
    pub defending_type: PokemonType,
    pub multiplier: f64,
    /// Set by forced effectiveness; later rules must not touch it.
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverrideSource {
    Ability(Ability),
    DamageNegation,
}

/// A fixed multiplier that replaces the component product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Override {
    pub source: OverrideSource,
    pub multiplier: f64,
}

/// Working state threaded through the rule chain.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectivenessState {
    pub attacking_type: PokemonType,
    pub components: Vec<Component>,
    pub overrides: Vec<Override>,
}

impl EffectivenessState {
    fn new(attacking_type: PokemonType) -> Self {
        Self {
            attacking_type,
            components: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Product of the components.
    pub fn component_product(&self) -> f64 {
        self.components.iter().map(|c| c.multiplier).product()
    }

    /// The most restrictive override if any, else the component product.
    pub fn net(&self) -> f64 {
        self.overrides
            .iter()
            .map(|o| o.multiplier)
            .reduce(f64::min)
            .unwrap_or_else(|| self.component_product())
    }

    pub fn has_forced_component(&self) -> bool {
        self.components.iter().any(|c| c.forced)
    }
}

/// Final result of a resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effectiveness {
    pub attacking_type: PokemonType,
    pub components: Vec<Component>,
    pub overrides: Vec<Override>,
    pub multiplier: f64,
}

impl Effectiveness {
    pub fn neutral(attacking_type: PokemonType) -> Self {
        Self {
            attacking_type,
            components: Vec::new(),
            overrides: Vec::new(),
            multiplier: NEUTRAL,
        }
    }

    pub fn is_immune(&self) -> bool {
        self.multiplier == NO_EFFECT
    }

    pub fn is_forced(&self) -> bool {
        self.components.iter().any(|c| c.forced)
    }
}

impl From<EffectivenessState> for Effectiveness {
    fn from(state: EffectivenessState) -> Self {
        let multiplier = state.net();
        Self {
            attacking_type: state.attacking_type,
            components: state.components,
            overrides: state.overrides,
            multiplier,
        }
    }
}

/// Everything a rule may read.
pub struct EffectivenessContext<'a> {
    pub move_data: &'a MoveData,
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub chart: &'a TypeChart,
    pub forced: &'a ForcedEffectivenessConfig,
}

pub trait EffectivenessRule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState);
}

/// Picks the attacking type: `MatchesUserType` first, then attacker abilities.
#[derive(Debug)]
pub struct AttackingTypeRule;

impl EffectivenessRule for AttackingTypeRule {
    fn name(&self) -> &'static str {
        "attacking-type"
    }

    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState) {
        if ctx.move_data.has_flag(MoveFlag::MatchesUserType) {
            state.attacking_type = ctx.attacker.types.primary();
            return;
        }
        match ctx.attacker.ability {
            Ability::Normalize => state.attacking_type = PokemonType::Normal,
            ability => {
                if let (PokemonType::Normal, Some(converted)) =
                    (state.attacking_type, ability.converts_normal_moves_to())
                {
                    state.attacking_type = converted;
                }
            }
        }
    }
}

/// One chart lookup per defending current type.
#[derive(Debug)]
pub struct ChartRule;

impl EffectivenessRule for ChartRule {
    fn name(&self) -> &'static str {
        "chart"
    }

    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState) {
        state.components = ctx
            .defender
            .types
            .iter()
            .map(|defending_type| Component {
                defending_type,
                multiplier: ctx.chart.lookup(state.attacking_type, defending_type),
                forced: false,
            })
            .collect();
    }
}

/// Reads chart immunities as neutral when something lets the move through.
#[derive(Debug)]
pub struct ImmunityNegationRule;

impl ImmunityNegationRule {
    fn scrappy_applies(attacker: &Combatant, attacking: PokemonType, defending: PokemonType) -> bool {
        attacker.ability == Ability::Scrappy
            && defending == PokemonType::Ghost
            && matches!(attacking, PokemonType::Normal | PokemonType::Fighting)
    }
}

impl EffectivenessRule for ImmunityNegationRule {
    fn name(&self) -> &'static str {
        "immunity-negation"
    }

    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState) {
        let negate_all = ctx.move_data.has_flag(MoveFlag::IgnoresTypeImmunity)
            || ctx.defender.flags.ignore_type_immunity;
        let attacking = state.attacking_type;
        for component in state.components.iter_mut().filter(|c| c.multiplier == NO_EFFECT) {
            if negate_all || Self::scrappy_applies(ctx.attacker, attacking, component.defending_type) {
                component.multiplier = NEUTRAL;
            }
        }
    }
}

/// Defender abilities that pin the result to a fixed multiplier.
#[derive(Debug)]
pub struct AbilityOverrideRule;

impl EffectivenessRule for AbilityOverrideRule {
    fn name(&self) -> &'static str {
        "ability-override"
    }

    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState) {
        let ability = ctx.defender.ability;
        let blocked = match ability {
            Ability::WonderGuard => state.net() <= NEUTRAL,
            _ => ability.immune_to() == Some(state.attacking_type),
        };
        if blocked {
            state.overrides.push(Override {
                source: OverrideSource::Ability(ability),
                multiplier: NO_EFFECT,
            });
        }
    }
}

/// Defenders flagged to negate every hit.
#[derive(Debug)]
pub struct DamageNegationRule;

impl EffectivenessRule for DamageNegationRule {
    fn name(&self) -> &'static str {
        "damage-negation"
    }

    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState) {
        if ctx.defender.flags.negate_all_damage {
            state.overrides.push(Override {
                source: OverrideSource::DamageNegation,
                multiplier: NO_EFFECT,
            });
        }
    }
}

/// Forces the designated defending type to the configured multiplier.
#[derive(Debug)]
pub struct ForcedEffectivenessRule;

impl EffectivenessRule for ForcedEffectivenessRule {
    fn name(&self) -> &'static str {
        "forced-effectiveness"
    }

    fn apply(&self, ctx: &EffectivenessContext<'_>, state: &mut EffectivenessState) {
        let Some(designated) = ctx.move_data.forced_effectiveness_against() else {
            return;
        };
        for component in state
            .components
            .iter_mut()
            .filter(|c| c.defending_type == designated)
        {
            component.multiplier = ctx.forced.multiplier;
            component.forced = true;
        }
        if !state.has_forced_component() {
            return;
        }
        state.overrides.retain(|o| match o.source {
            OverrideSource::Ability(_) => !ctx.forced.defeats_ability_override,
            OverrideSource::DamageNegation => !ctx.forced.defeats_damage_negation,
        });
    }
}

/// Runs the rule chain against a type chart.
#[derive(Debug)]
pub struct EffectivenessResolver {
    chart: TypeChart,
    forced: ForcedEffectivenessConfig,
    rules: Vec<Box<dyn EffectivenessRule>>,
}

impl Default for EffectivenessResolver {
    fn default() -> Self {
        Self::new(TypeChart::default(), ForcedEffectivenessConfig::default())
    }
}

impl EffectivenessResolver {
    pub fn new(chart: TypeChart, forced: ForcedEffectivenessConfig) -> Self {
        Self {
            chart,
            forced,
            rules: vec![
                Box::new(AttackingTypeRule),
                Box::new(ChartRule),
                Box::new(ImmunityNegationRule),
                Box::new(AbilityOverrideRule),
                Box::new(DamageNegationRule),
                Box::new(ForcedEffectivenessRule),
            ],
        }
    }

    /// Adds a rule just before forced effectiveness, which stays last.
    pub fn with_rule(mut self, rule: Box<dyn EffectivenessRule>) -> Self {
        let position = self.rules.len().saturating_sub(1);
        self.rules.insert(position, rule);
        self
    }

    pub fn chart(&self) -> &TypeChart {
        &self.chart
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Net multiplier of `move_used` from `attacker` against `defender`'s current types.
    /// Moves without catalog data resolve as neutral.
    pub fn resolve(&self, move_used: Move, attacker: &Combatant, defender: &Combatant) -> Effectiveness {
        match get_move_data(move_used) {
            Some(move_data) => self.resolve_with_data(move_data, attacker, defender),
            None => {
                tracing::warn!(%move_used, "no move data, resolving as neutral");
                Effectiveness::neutral(PokemonType::Normal)
            }
        }
    }

    pub fn resolve_with_data(
        &self,
        move_data: &MoveData,
        attacker: &Combatant,
        defender: &Combatant,
    ) -> Effectiveness {
        let ctx = EffectivenessContext {
            move_data,
            attacker,
            defender,
            chart: &self.chart,
            forced: &self.forced,
        };
        let mut state = EffectivenessState::new(move_data.move_type);
        for rule in &self.rules {
            rule.apply(&ctx, &mut state);
            tracing::trace!(rule = rule.name(), net = state.net(), "effectiveness rule applied");
        }
        let effectiveness = Effectiveness::from(state);
        tracing::debug!(
            attacker = %attacker.battler,
            defender = %defender.battler,
            attacking_type = %effectiveness.attacking_type,
            defending_types = %defender.types,
            multiplier = effectiveness.multiplier,
            "effectiveness resolved"
        );
        effectiveness
    }
}
