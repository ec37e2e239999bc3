#[cfg(test)]
mod tests {
    use crate::battle::phases::PhaseKind;
    use crate::battle::pipeline::{AdvanceOutcome, PhasePipeline};
    use crate::battle::state::{BattleEvent, GameState};
    use crate::battle::tests::common::{
        assert_ok, create_test_pipeline, create_test_pipeline_with_config, move_order,
        TestCombatantBuilder,
    };
    use crate::config::{EngineConfig, TieBreak};
    use crate::errors::{BattleEngineError, TurnOrderError};
    use crate::player::{BattlerIndex, PlayerAction, Side};
    use pretty_assertions::assert_eq;
    use schema::{Move, Species, StatType, StatusType};

    fn splash_battle(player: Species, enemy: Species) -> PhasePipeline {
        create_test_pipeline(
            TestCombatantBuilder::new(player, 50)
                .with_moves(vec![Move::Splash, Move::QuickAttack])
                .build(),
            TestCombatantBuilder::new(enemy, 50).build(),
        )
    }

    fn play_round(pipeline: &mut PhasePipeline, player_move: usize) -> Vec<BattlerIndex> {
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, PlayerAction::use_move(player_move)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)));
        assert_ok(pipeline.to_next_turn());
        move_order(&pipeline.take_events())
    }

    #[test]
    fn test_faster_combatant_acts_first() {
        // Pikachu (speed 110) outspeeds Snorlax (speed 50).
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);
        assert_eq!(
            play_round(&mut pipeline, 0),
            vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]
        );
    }

    #[test]
    fn test_priority_move_beats_speed() {
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);
        assert_eq!(
            play_round(&mut pipeline, 1),
            vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]
        );
    }

    #[test]
    fn test_paralysis_halves_speed() {
        let mut healthy = splash_battle(Species::Feebas, Species::Shedinja);
        assert_eq!(
            play_round(&mut healthy, 0),
            vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]
        );

        let mut paralyzed = create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50)
                .with_status(StatusType::Paralysis)
                .build(),
            TestCombatantBuilder::new(Species::Shedinja, 50).build(),
        );
        assert_eq!(
            play_round(&mut paralyzed, 0),
            vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]
        );
    }

    #[test]
    fn test_speed_stage_reorders_the_turn() {
        // Feebas (100) is slower than Pikachu (110) until +2 doubles its speed.
        let mut neutral = splash_battle(Species::Feebas, Species::Pikachu);
        assert_eq!(
            play_round(&mut neutral, 0),
            vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]
        );

        let mut boosted = create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50)
                .with_stat_stage(StatType::Speed, 2)
                .build(),
            TestCombatantBuilder::new(Species::Pikachu, 50).build(),
        );
        assert_eq!(
            play_round(&mut boosted, 0),
            vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]
        );
    }

    #[test]
    fn test_forced_order_is_honoured_once() {
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);

        assert_ok(pipeline.set_turn_order(vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]));
        assert_eq!(
            play_round(&mut pipeline, 0),
            vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]
        );

        // The next round falls back to speed order.
        assert_eq!(
            play_round(&mut pipeline, 0),
            vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]
        );
    }

    #[test]
    fn test_forced_order_overrides_priority() {
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);
        assert_ok(pipeline.set_turn_order(vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]));
        assert_eq!(
            play_round(&mut pipeline, 1),
            vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]
        );
    }

    #[test]
    fn test_order_event_reports_forced_orders() {
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);
        assert_ok(pipeline.set_turn_order(vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]));
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, PlayerAction::use_move(0)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::use_move(0)));
        assert_ok(pipeline.advance_past(PhaseKind::CommandPhase));

        assert!(pipeline.events().events().contains(&BattleEvent::TurnOrderDetermined {
            order: vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY],
            forced: true,
        }));
    }

    #[test]
    fn test_invalid_forced_orders_fail_fast() {
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);

        assert_eq!(
            pipeline.set_turn_order(vec![BattlerIndex::PLAYER]),
            Err(BattleEngineError::TurnOrder(TurnOrderError::Missing(
                BattlerIndex::ENEMY
            )))
        );
        assert_eq!(
            pipeline.set_turn_order(vec![
                BattlerIndex::ENEMY,
                BattlerIndex::ENEMY,
                BattlerIndex::PLAYER
            ]),
            Err(BattleEngineError::TurnOrder(TurnOrderError::Duplicate(
                BattlerIndex::ENEMY
            )))
        );
        assert_eq!(
            pipeline.set_turn_order(vec![
                BattlerIndex::PLAYER,
                BattlerIndex::ENEMY,
                BattlerIndex::ENEMY_2
            ]),
            Err(BattleEngineError::TurnOrder(TurnOrderError::NotActing(
                BattlerIndex::ENEMY_2
            )))
        );

        // Nothing was stored: the round still uses speed order.
        assert_eq!(
            play_round(&mut pipeline, 0),
            vec![BattlerIndex::ENEMY, BattlerIndex::PLAYER]
        );
    }

    #[test]
    fn test_seeded_tie_break_is_reproducible() {
        // Feebas and Magikarp both have 100 speed at level 50.
        let run = || {
            let mut pipeline = create_test_pipeline_with_config(
                TestCombatantBuilder::new(Species::Feebas, 50).build(),
                TestCombatantBuilder::new(Species::Magikarp, 50).build(),
                EngineConfig {
                    tie_break: TieBreak::Seeded(1234),
                    ..EngineConfig::default()
                },
            );
            (0..5)
                .map(|_| play_round(&mut pipeline, 0))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_slot_order_breaks_speed_ties() {
        let mut pipeline = create_test_pipeline(
            TestCombatantBuilder::new(Species::Feebas, 50).build(),
            TestCombatantBuilder::new(Species::Magikarp, 50).build(),
        );
        for _ in 0..3 {
            assert_eq!(
                play_round(&mut pipeline, 0),
                vec![BattlerIndex::PLAYER, BattlerIndex::ENEMY]
            );
        }
    }

    #[test]
    fn test_forfeit_acts_before_priority_moves() {
        let mut pipeline = splash_battle(Species::Snorlax, Species::Pikachu);
        assert_ok(pipeline.submit_action(BattlerIndex::PLAYER, PlayerAction::use_move(1)));
        assert_ok(pipeline.submit_action(BattlerIndex::ENEMY, PlayerAction::Forfeit));

        assert_eq!(assert_ok(pipeline.to_next_turn()), AdvanceOutcome::BattleEnded);
        let events = pipeline.take_events();
        assert!(move_order(&events).is_empty());
        assert!(events.contains(&BattleEvent::SideForfeited { side: Side::Enemy }));
        assert_eq!(pipeline.state().game_state, GameState::PlayerWin);
    }
}
