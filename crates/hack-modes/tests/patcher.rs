//! hack-modes patcher tests

#[cfg(test)]
mod tests {
    use hack_env::{Action, EnvError, Environment, Frame, SpriteMachine, StepInfo, StepOutcome};
    use hack_modes::games::{self, FISHING_DERBY, FISHING_DERBY_FISH_X, FISHING_DERBY_SHARK_X};
    use hack_modes::{
        parse_modif, Clamp, EntityClass, GameTable, HackConfig, ModeConfig, ModeEntry, ModeRule, PatchError,
        PatchedEnv, Patcher,
    };

    /// Bare RAM with a do-nothing step.
    struct Ram(Vec<u8>);

    impl Environment for Ram {
        fn get_memory(&self) -> &[u8] { &self.0 }
        fn set_memory(&mut self, index: usize, value: u8) -> Result<(), EnvError> {
            let len = self.0.len();
            let cell = self.0.get_mut(index).ok_or(EnvError::InvalidMemoryIndex { index: index as i64, len })?;
            *cell = value;
            Ok(())
        }
        fn step(&mut self, _action: Action) -> StepOutcome {
            StepOutcome { frame: self.render(), reward: 0.0, done: false, info: StepInfo::default() }
        }
        fn render(&self) -> Frame { Frame::new(1, 1, [0, 0, 0]) }
        fn reset(&mut self) { self.0.iter_mut().for_each(|v| *v = 0); }
    }

    fn ram_with(cell: usize, value: u8) -> Ram {
        let mut r = Ram(vec![7; 128]);
        r.0[cell] = value;
        r
    }

    fn patcher(entity: &str, mode: u8) -> Patcher {
        Patcher::new(&FISHING_DERBY, &ModeConfig::new().with(entity, mode)).unwrap()
    }

    fn shark_after(mode: u8, v: u8) -> u8 {
        let mut r = ram_with(FISHING_DERBY_SHARK_X, v);
        patcher("shark", mode).apply(&mut r).unwrap();
        r.0[FISHING_DERBY_SHARK_X]
    }

    fn fish_after(mode: u8, v: u8) -> u8 {
        let mut r = Ram(vec![v; 128]);
        patcher("fish", mode).apply(&mut r).unwrap();
        let first = r.0[FISHING_DERBY_FISH_X[0]];
        assert!(FISHING_DERBY_FISH_X.iter().all(|&c| r.0[c] == first));
        first
    }

    #[test]
    fn fishing_derby_table_is_valid() {
        FISHING_DERBY.validate().unwrap();
        assert!(games::lookup("fishingderby").is_some());
        assert!(games::lookup("Seaquest").is_none());
    }

    #[test]
    fn shark_pin_modes() {
        for v in [0u8, 25, 60, 105, 255] {
            assert_eq!(shark_after(1, v), 105);
            assert_eq!(shark_after(2, v), 25);
        }
    }

    #[test]
    fn shark_teleport() {
        assert_eq!(shark_after(3, 100), 25);
        assert_eq!(shark_after(3, 30), 105);
        assert_eq!(shark_after(3, 50), 50);
        assert_eq!(shark_after(3, 25), 25);
    }

    #[test]
    fn shark_speed_ramp() {
        assert_eq!(shark_after(4, 115), 120);
        assert_eq!(shark_after(4, 121), 1);
        assert_eq!(shark_after(4, 120), 120);
        assert_eq!(shark_after(4, 1), 6);
    }

    #[test]
    fn ramp_saturates() {
        let rule = ModeRule::Ramp { upper: 255, step: 5, floor: 0 };
        assert_eq!(rule.next_value(253), Some(255));
        assert_eq!(rule.next_value(255), None);
    }

    #[test]
    fn fish_bands() {
        assert_eq!(fish_after(1, 87), 44);
        assert_eq!(fish_after(1, 86), 86);
        assert_eq!(fish_after(2, 69), 116);
        assert_eq!(fish_after(2, 70), 70);
        assert_eq!(fish_after(3, 87), 70);
        assert_eq!(fish_after(3, 200), 70);
        assert_eq!(fish_after(3, 69), 86);
        assert_eq!(fish_after(3, 0), 86);
        for v in 70..=86 { assert_eq!(fish_after(3, v), v); }
    }

    #[test]
    fn other_cells_untouched() {
        let mut r = Ram((0..128).map(|i| i as u8).collect());
        let before = r.0.clone();
        let p = Patcher::new(&FISHING_DERBY, &ModeConfig::new().with("shark", 1).with("fish", 3)).unwrap();
        p.apply(&mut r).unwrap();
        for i in 0..128 {
            if !p.cells().contains(&i) { assert_eq!(r.0[i], before[i], "cell {i}"); }
        }
    }

    #[test]
    fn non_ramp_modes_are_idempotent() {
        let cases = [("shark", 1), ("shark", 2), ("shark", 3), ("fish", 1), ("fish", 2), ("fish", 3)];
        for (entity, mode) in cases {
            let p = patcher(entity, mode);
            for v in 0..=255u8 {
                let mut once = Ram(vec![v; 128]);
                p.apply(&mut once).unwrap();
                let mut twice = Ram(once.0.clone());
                p.apply(&mut twice).unwrap();
                assert_eq!(once.0, twice.0, "{entity} mode {mode} from {v}");
            }
        }
    }

    #[test]
    fn entity_classes_compose_in_any_order() {
        let shark = patcher("shark", 4);
        let fish = patcher("fish", 3);
        for v in [0u8, 30, 69, 100, 121, 200] {
            let mut a = Ram(vec![v; 128]);
            shark.apply(&mut a).unwrap();
            fish.apply(&mut a).unwrap();
            let mut b = Ram(vec![v; 128]);
            fish.apply(&mut b).unwrap();
            shark.apply(&mut b).unwrap();
            assert_eq!(a.0, b.0);
        }
    }

    #[test]
    fn patcher_rejects_bad_config() {
        let err = Patcher::new(&FISHING_DERBY, &ModeConfig::new().with("octopus", 1)).unwrap_err();
        assert!(matches!(err, PatchError::UnknownEntity { .. }));
        let err = Patcher::new(&FISHING_DERBY, &ModeConfig::new().with("shark", 9)).unwrap_err();
        assert_eq!(err, PatchError::UnknownMode { entity: "shark".into(), mode: 9 });
        let err = Patcher::new(&FISHING_DERBY, &ModeConfig::new().with("shark", 1).with("Shark", 2)).unwrap_err();
        assert_eq!(err, PatchError::DuplicateEntity("shark".into()));
    }

    #[test]
    fn mode_zero_is_unmodified() {
        let p = Patcher::new(&FISHING_DERBY, &ModeConfig::new().with("shark", 0).with("fish", 0)).unwrap();
        assert!(p.is_empty());
        let mut r = ram_with(FISHING_DERBY_SHARK_X, 100);
        p.apply(&mut r).unwrap();
        assert_eq!(r.0[FISHING_DERBY_SHARK_X], 100);
    }

    static OVERLAPPING: GameTable = GameTable {
        name: "Overlap",
        entities: &[
            EntityClass { name: "a", modes: &[ModeEntry { mode: 1, label: "", cells: &[3, 4], rule: ModeRule::Pin { value: 1 } }] },
            EntityClass { name: "b", modes: &[ModeEntry { mode: 1, label: "", cells: &[4], rule: ModeRule::Pin { value: 2 } }] },
        ],
    };

    static RESERVED: GameTable = GameTable {
        name: "Reserved",
        entities: &[EntityClass {
            name: "a",
            modes: &[ModeEntry {
                mode: 0,
                label: "",
                cells: &[1],
                rule: ModeRule::ClampBand { above: Some(Clamp { threshold: 1, value: 1 }), below: None },
            }],
        }],
    };

    #[test]
    fn invalid_tables_are_rejected() {
        assert_eq!(
            OVERLAPPING.validate(),
            Err(PatchError::OverlappingCells { first: "a".into(), second: "b".into(), cell: 4 })
        );
        assert!(Patcher::new(&OVERLAPPING, &ModeConfig::new()).is_err());
        assert_eq!(RESERVED.validate(), Err(PatchError::ReservedMode { entity: "a".into() }));
    }

    #[test]
    fn modif_tokens() {
        assert_eq!(parse_modif(&FISHING_DERBY, "s3").unwrap(), ("shark", 3));
        assert_eq!(parse_modif(&FISHING_DERBY, "fish1").unwrap(), ("fish", 1));
        assert_eq!(parse_modif(&FISHING_DERBY, "shark_4").unwrap(), ("shark", 4));
        assert!(matches!(parse_modif(&FISHING_DERBY, "x1"), Err(PatchError::UnknownEntity { .. })));
        assert!(matches!(parse_modif(&FISHING_DERBY, "s"), Err(PatchError::BadModif(_))));
        assert!(matches!(parse_modif(&FISHING_DERBY, "3"), Err(PatchError::BadModif(_))));
        assert!(matches!(parse_modif(&FISHING_DERBY, "s300"), Err(PatchError::BadModif(_))));

        let cfg = ModeConfig::from_modifs(&FISHING_DERBY, &["s1", "f2", "shark3"]).unwrap();
        assert_eq!(cfg.mode_for("shark"), 3);
        assert_eq!(cfg.mode_for("fish"), 2);
    }

    #[test]
    fn hack_config_json() {
        let cfg = HackConfig::from_json(
            r#"{"game":"fishingderby","modes":{"shark":2},"modifs":["f3"],"switch_modifs":["s4"],"switch_frame":50}"#,
        ).unwrap();
        let initial = cfg.initial_modes().unwrap();
        assert_eq!(initial.mode_for("shark"), 2);
        assert_eq!(initial.mode_for("fish"), 3);
        let switched = cfg.switch_modes().unwrap().unwrap();
        assert_eq!(switched.mode_for("shark"), 4);
        assert_eq!(switched.mode_for("fish"), 3);

        let bare = HackConfig::from_json("{}").unwrap();
        assert_eq!(bare.game, "FishingDerby");
        assert!(bare.switch_modes().unwrap().is_none());
        assert!(HackConfig::from_json(r#"{"game":"Pong"}"#).unwrap().table().is_err());
    }

    #[test]
    fn patched_machine_keeps_shark_pinned() {
        let mut env = PatchedEnv::new(SpriteMachine::new(), patcher("shark", 1)).unwrap();
        for _ in 0..50 {
            env.step(Action::Noop);
            assert!((104..=106).contains(&env.inner().shark_x()));
        }
    }

    #[test]
    fn patched_machine_herds_fish_to_the_middle() {
        let mut env = PatchedEnv::new(SpriteMachine::new(), patcher("fish", 3)).unwrap();
        for _ in 0..200 {
            env.step(Action::Noop);
            for i in 0..6 { assert!((69..=87).contains(&env.inner().fish_x(i))); }
        }
    }

    #[test]
    fn patched_env_checks_ram_bounds() {
        let err = PatchedEnv::new(Ram(vec![0; 16]), patcher("shark", 1)).err().unwrap();
        assert_eq!(err, PatchError::CellOutOfRange { cell: 75, len: 16 });

        let mut env = PatchedEnv::new(Ram(vec![0; 128]), Patcher::unmodified(&FISHING_DERBY)).unwrap();
        assert!(env.replace_patcher(patcher("fish", 1)).is_ok());
        assert_eq!(env.patcher().active().len(), 1);
    }

    #[test]
    fn switch_modes_take_over_at_the_switch_frame() {
        let cfg = HackConfig::from_json(r#"{"switch_modifs":["s1"],"switch_frame":10}"#).unwrap();
        let mut env = PatchedEnv::from_config(SpriteMachine::new(), &cfg).unwrap();
        assert_eq!(env.patcher().game().name, "FishingDerby");
        assert!(env.patcher().is_empty());

        for _ in 0..10 { env.step(Action::Noop); }
        // free movement up to the switch
        assert_eq!(env.inner().shark_x(), 70);
        assert!(env.is_switched());
        assert_eq!(env.patcher().active().len(), 1);

        for _ in 0..190 { env.step(Action::Noop); }
        assert_eq!(env.steps(), 200);
        assert_eq!(env.inner().shark_x(), 104);

        env.reset();
        assert_eq!(env.steps(), 0);
        assert!(!env.is_switched());
    }

    #[test]
    fn switch_patcher_must_target_the_same_game() {
        let env = PatchedEnv::new(Ram(vec![0; 128]), Patcher::unmodified(&FISHING_DERBY)).unwrap();
        let err = env.with_switch(5, Patcher::unmodified(&RESERVED)).err().unwrap();
        assert!(matches!(err, PatchError::Config(_)));
    }

    #[test]
    fn unmodified_configs() {
        assert!(ModeConfig::new().is_unmodified());
        assert!(ModeConfig::new().with("shark", 0).is_unmodified());
        assert!(!ModeConfig::new().with("shark", 0).with("fish", 2).is_unmodified());
    }
}
