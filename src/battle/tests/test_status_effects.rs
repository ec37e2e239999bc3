#[cfg(test)]
mod tests {
    use crate::battle::phases::PhaseKind;
    use crate::battle::pipeline::PhasePipeline;
    use crate::battle::state::{ActionFailureReason, BattleEvent, TurnRng};
    use crate::battle::tests::common::{
        assert_ok, create_test_pipeline, create_test_pipeline_with_config, TestCombatantBuilder,
    };
    use crate::config::EngineConfig;
    use crate::player::{BattlerIndex, PlayerAction};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Move, PokemonType, Species, StatusType, TypeSet};

    fn status_battle(player_move: Move, enemy: Species) -> PhasePipeline {
        create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50)
                .with_moves(vec![player_move])
                .build(),
            TestCombatantBuilder::new(enemy, 50).build(),
        )
    }

    fn play_round(pipeline: &mut PhasePipeline) -> Vec<BattleEvent> {
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, PlayerAction::use_move(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)));
        assert_ok(pipeline.to_next_turn());
        pipeline.take_events()
    }

    fn enemy_status(pipeline: &PhasePipeline) -> Option<StatusType> {
        pipeline
            .state()
            .combatant(BattlerIndex::ENEMY)
            .and_then(|enemy| enemy.status)
    }

    #[rstest]
    #[case::burn(Move::WillOWisp, StatusType::Burn)]
    #[case::paralysis(Move::ThunderWave, StatusType::Paralysis)]
    fn test_status_move_inflicts_status(#[case] move_used: Move, #[case] status: StatusType) {
        let mut pipeline = status_battle(move_used, Species::Snorlax);
        let events = play_round(&mut pipeline);

        assert_eq!(enemy_status(&pipeline), Some(status));
        assert!(events.contains(&BattleEvent::StatusApplied {
            target: BattlerIndex::ENEMY,
            pokemon: Species::Snorlax,
            status,
        }));
        // Status moves never report type effectiveness.
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::AttackTypeEffectiveness { .. })));
    }

    #[test]
    fn test_burn_deals_an_eighth_of_max_hp_at_turn_end() {
        let mut pipeline = status_battle(Move::WillOWisp, Species::Snorlax);
        let events = play_round(&mut pipeline);

        let snorlax = pipeline.state().combatant(BattlerIndex::ENEMY).unwrap();
        // Snorlax has 155 max HP at level 50.
        assert_eq!(snorlax.max_hp(), 155);
        assert_eq!(snorlax.current_hp(), 155 - 19);
        assert!(events.contains(&BattleEvent::StatusDamage {
            target: BattlerIndex::ENEMY,
            pokemon: Species::Snorlax,
            status: StatusType::Burn,
            damage: 19,
            remaining_hp: 136,
        }));

        let status_damage = events
            .iter()
            .position(|e| matches!(e, BattleEvent::StatusDamage { .. }));
        let turn_ended = events
            .iter()
            .position(|e| matches!(e, BattleEvent::TurnEnded { .. }));
        assert!(status_damage < turn_ended);
    }

    #[test]
    fn test_chip_damage_can_be_disabled() {
        let mut pipeline = create_test_pipeline_with_config(
            TestCombatantBuilder::new(Species::Feebas, 50).build(),
            TestCombatantBuilder::new(Species::Snorlax, 50)
                .with_status(StatusType::Poison)
                .build(),
            EngineConfig {
                status_chip_damage: false,
                ..EngineConfig::default()
            },
        );
        let events = play_round(&mut pipeline);

        let snorlax = pipeline.state().combatant(BattlerIndex::ENEMY).unwrap();
        assert_eq!(snorlax.current_hp(), snorlax.max_hp());
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::StatusDamage { .. })));
    }

    #[rstest]
    #[case::fire_resists_burn(Move::WillOWisp, Species::Volcanion)]
    #[case::electric_resists_paralysis(Move::ThunderWave, Species::Pikachu)]
    fn test_status_immune_types_make_the_move_fail(#[case] move_used: Move, #[case] enemy: Species) {
        let mut pipeline = status_battle(move_used, enemy);
        let events = play_round(&mut pipeline);

        assert_eq!(enemy_status(&pipeline), None);
        assert!(events.contains(&BattleEvent::ActionFailed {
            battler: BattlerIndex::PLAYER,
            reason: ActionFailureReason::MoveFailed,
        }));
    }

    #[test]
    fn test_status_move_fails_against_existing_status() {
        let mut pipeline = create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50)
                .with_moves(vec![Move::WillOWisp])
                .build(),
            TestCombatantBuilder::new(Species::Magikarp, 50)
                .with_status(StatusType::Paralysis)
                .build(),
        );
        let events = play_round(&mut pipeline);

        assert_eq!(enemy_status(&pipeline), Some(StatusType::Paralysis));
        assert!(events.contains(&BattleEvent::ActionFailed {
            battler: BattlerIndex::PLAYER,
            reason: ActionFailureReason::MoveFailed,
        }));
    }

    #[test]
    fn test_secondary_status_rolls_against_its_chance() {
        // Ember burns 10% of the time. A roll of 50 misses.
        let mut missed = status_battle(Move::Ember, Species::Snorlax);
        let events = play_round(&mut missed);
        assert_eq!(enemy_status(&missed), None);
        assert!(!events.iter().any(|e| matches!(e, BattleEvent::ActionFailed { .. })));

        // The damage roll comes first, then the chance roll of 5 lands.
        let mut landed = status_battle(Move::Ember, Species::Snorlax)
            .with_rng(TurnRng::new_for_test(vec![100, 5, 50, 50]));
        play_round(&mut landed);
        assert_eq!(enemy_status(&landed), Some(StatusType::Burn));
    }

    #[test]
    fn test_soak_replaces_types() {
        let mut pipeline = status_battle(Move::Soak, Species::Snorlax);
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, PlayerAction::use_move(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)));
        assert_ok(pipeline.advance_past(PhaseKind::EffectApplicationPhase));

        let snorlax = pipeline.state().combatant(BattlerIndex::ENEMY).unwrap();
        assert_eq!(snorlax.types, TypeSet::single(PokemonType::Water));
        assert!(pipeline.events().events().contains(&BattleEvent::TypeChanged {
            target: BattlerIndex::ENEMY,
            pokemon: Species::Snorlax,
            old_types: TypeSet::single(PokemonType::Normal),
            new_types: TypeSet::single(PokemonType::Water),
        }));
    }

    #[test]
    fn test_soak_fails_on_pure_water_target() {
        let mut pipeline = status_battle(Move::Soak, Species::Magikarp);
        let events = play_round(&mut pipeline);

        assert!(events.contains(&BattleEvent::ActionFailed {
            battler: BattlerIndex::PLAYER,
            reason: ActionFailureReason::MoveFailed,
        }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::TypeChanged { .. })));
    }
}
