#[cfg(test)]
mod tests {
    use crate::battle::pipeline::{AdvanceOutcome, PhasePipeline};
    use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, GameState};
    use crate::battle::tests::common::{
        assert_ok, create_test_pipeline, move_order, predictable_rng, TestCombatantBuilder,
    };
    use crate::config::EngineConfig;
    use crate::errors::{ActionError, BattleEngineError};
    use crate::player::{BattlerIndex, PlayerAction, Side};
    use pretty_assertions::assert_eq;
    use schema::{Move, Species, StatusType};

    fn play_round(pipeline: &mut PhasePipeline) -> (AdvanceOutcome, Vec<BattleEvent>) {
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, PlayerAction::use_move(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)));
        let outcome = assert_ok(pipeline.to_next_turn());
        (outcome, pipeline.take_events())
    }

    fn damage_events(events: &[BattleEvent], target: BattlerIndex) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, BattleEvent::DamageDealt { target: hit, .. } if *hit == target))
            .count()
    }

    #[test]
    fn test_knockout_ends_the_battle() {
        let mut pipeline = create_test_pipeline(
            TestCombatantBuilder::new(Species::Snorlax, 50)
                .with_moves(vec![Move::Tackle])
                .build(),
            TestCombatantBuilder::new(Species::Magikarp, 50)
                .with_hp(1)
                .build(),
        );
        let (outcome, events) = play_round(&mut pipeline);

        assert_eq!(outcome, AdvanceOutcome::BattleEnded);
        assert_eq!(pipeline.state().game_state, GameState::PlayerWin);
        assert!(pipeline.is_over());

        let tail: Vec<_> = events.iter().rev().take(2).rev().cloned().collect();
        assert_eq!(
            tail,
            vec![
                BattleEvent::PokemonFainted {
                    battler: BattlerIndex::ENEMY,
                    pokemon: Species::Magikarp,
                },
                BattleEvent::BattleEnded {
                    winner: Some(Side::Player),
                },
            ]
        );
        assert!(!events.iter().any(|e| matches!(e, BattleEvent::TurnEnded { .. })));
    }

    #[test]
    fn test_multi_hit_stops_after_knockout() {
        let mut pipeline = create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50)
                .with_moves(vec![Move::DoubleKick])
                .build(),
            TestCombatantBuilder::new(Species::Magikarp, 50)
                .with_hp(1)
                .build(),
        );
        let (_, events) = play_round(&mut pipeline);

        assert_eq!(damage_events(&events, BattlerIndex::ENEMY), 1);
        assert!(events.contains(&BattleEvent::HitCount { hits: 1 }));
        assert_eq!(pipeline.state().game_state, GameState::PlayerWin);
    }

    #[test]
    fn test_chip_damage_knockout_hands_the_win_to_the_opponent() {
        let mut pipeline = create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50)
                .with_status(StatusType::Burn)
                .with_hp(5)
                .build(),
            TestCombatantBuilder::new(Species::Magikarp, 50).build(),
        );
        let (outcome, events) = play_round(&mut pipeline);

        assert_eq!(outcome, AdvanceOutcome::BattleEnded);
        assert_eq!(pipeline.state().game_state, GameState::EnemyWin);
        // The knockout belongs to the round that caused it.
        assert_eq!(pipeline.state().turn_number, 1);
        let fainted_at = events.iter().position(|e| {
            *e == BattleEvent::PokemonFainted {
                battler: BattlerIndex::PLAYER,
                pokemon: Species::Feebas,
            }
        });
        let turn_ended_at = events
            .iter()
            .position(|e| *e == BattleEvent::TurnEnded { turn_number: 1 });
        assert!(fainted_at.is_some());
        assert!(fainted_at < turn_ended_at);
    }

    fn doubles_pipeline() -> PhasePipeline {
        let state = assert_ok(BattleState::new(
            "doubles".to_string(),
            &[
                TestCombatantBuilder::new(Species::Snorlax, 50)
                    .with_moves(vec![Move::Tackle])
                    .build(),
                TestCombatantBuilder::new(Species::Pikachu, 50)
                    .with_moves(vec![Move::Thunderbolt])
                    .build(),
            ],
            &[
                TestCombatantBuilder::new(Species::Magikarp, 50)
                    .with_hp(1)
                    .build(),
                TestCombatantBuilder::new(Species::Wingull, 50).build(),
            ],
        ));
        PhasePipeline::new(state, EngineConfig::default()).with_rng(predictable_rng())
    }

    #[test]
    fn test_fainted_combatants_lose_their_action_and_targets_shift() {
        let mut pipeline = doubles_pipeline();
        let aim_at_magikarp = |move_index| PlayerAction::UseMove {
            move_index,
            target: Some(BattlerIndex::ENEMY),
        };
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, aim_at_magikarp(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER_2, aim_at_magikarp(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY_2, PlayerAction::use_move(0)));

        // Pikachu 110, Wingull 105, Magikarp 100, Snorlax 50.
        assert_eq!(
            assert_ok(pipeline.to_next_turn()),
            AdvanceOutcome::Reached(crate::battle::phases::PhaseKind::TurnStart)
        );
        let events = pipeline.take_events();

        assert_eq!(
            move_order(&events),
            vec![
                BattlerIndex::PLAYER_2,
                BattlerIndex::ENEMY_2,
                BattlerIndex::PLAYER
            ]
        );
        assert!(events.contains(&BattleEvent::ActionFailed {
            battler: BattlerIndex::ENEMY,
            reason: ActionFailureReason::UserFainted,
        }));
        // Snorlax aimed at the fainted Magikarp and hit Wingull instead.
        assert_eq!(damage_events(&events, BattlerIndex::ENEMY), 1);
        assert_eq!(damage_events(&events, BattlerIndex::ENEMY_2), 1);
        assert_eq!(pipeline.state().game_state, GameState::WaitingForActions);

        assert_eq!(
            pipeline.awaiting_actions(),
            vec![
                BattlerIndex::PLAYER,
                BattlerIndex::PLAYER_2,
                BattlerIndex::ENEMY_2
            ]
        );
        assert_eq!(
            pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)),
            Err(BattleEngineError::Action(ActionError::FaintedCombatant(
                BattlerIndex::ENEMY
            )))
        );
    }
}
