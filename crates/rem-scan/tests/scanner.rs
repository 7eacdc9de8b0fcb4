//! causative-cell scanner tests

#[cfg(test)]
mod tests {
    use hack_env::machine::{SHARK_X, WATER_COLOR};
    use hack_env::memory::snapshot;
    use hack_env::{Action, EnvError, Environment, Frame, SpriteMachine, StepInfo, StepOutcome};
    use hack_modes::games::FISHING_DERBY;
    use hack_modes::{ModeConfig, PatchedEnv, Patcher};
    use rem_scan::{find_causative_cells, ProbeControl, ScanConfig, ScanError, Scanner, TieBreak};
    use std::collections::BTreeSet;

    const K: usize = 5;

    /// Every pixel is white when `ram[K]` is odd, black otherwise. Stepping bumps cell 0.
    struct ParityEnv {
        ram: Vec<u8>,
        steps: u64,
    }

    impl ParityEnv {
        fn new(k_value: u8) -> Self {
            let mut ram: Vec<u8> = (0..128).map(|i| (i * 7 % 256) as u8).collect();
            ram[K] = k_value;
            ParityEnv { ram, steps: 0 }
        }
    }

    impl Environment for ParityEnv {
        fn get_memory(&self) -> &[u8] { &self.ram }
        fn set_memory(&mut self, index: usize, value: u8) -> Result<(), EnvError> {
            let len = self.ram.len();
            let cell = self.ram.get_mut(index).ok_or(EnvError::InvalidMemoryIndex { index: index as i64, len })?;
            *cell = value;
            Ok(())
        }
        fn step(&mut self, _action: Action) -> StepOutcome {
            self.steps += 1;
            self.ram[0] = self.ram[0].wrapping_add(1);
            StepOutcome { frame: self.render(), reward: 0.0, done: false, info: StepInfo::default() }
        }
        fn render(&self) -> Frame {
            let c = if self.ram[K] % 2 == 1 { [255, 255, 255] } else { [0, 0, 0] };
            Frame::new(4, 4, c)
        }
        fn reset(&mut self) { *self = ParityEnv::new(0); }
    }

    #[test]
    fn odd_cell_is_the_only_cause() {
        for v in [1u8, 3, 77, 255] {
            let mut env = ParityEnv::new(v);
            let found = find_causative_cells(&mut env, 2, 3).unwrap();
            assert_eq!(found, BTreeSet::from([K]), "ram[K] = {v}");
        }
    }

    #[test]
    fn even_cell_yields_nothing() {
        for v in [0u8, 2, 100] {
            let mut env = ParityEnv::new(v);
            assert!(find_causative_cells(&mut env, 0, 0).unwrap().is_empty());
        }
    }

    #[test]
    fn scan_leaves_memory_as_it_found_it() {
        let mut env = ParityEnv::new(9);
        let before = snapshot(&env);
        let report = Scanner::default().scan(&mut env, 1, 1).unwrap();
        assert_eq!(snapshot(&env), before);
        assert_eq!(report.probed, 128);
        assert_eq!(report.reference_pixel, [255, 255, 255]);
        assert_eq!(report.hits[0].pixel, [0, 0, 0]);
        // one reference step plus one per probe
        assert_eq!(env.steps, 129);
    }

    #[test]
    fn out_of_range_pixel_is_rejected_up_front() {
        let mut env = ParityEnv::new(1);
        let before = snapshot(&env);
        let err = find_causative_cells(&mut env, 4, 0).unwrap_err();
        assert_eq!(err, ScanError::OutOfRangePixel { x: 4, y: 0, width: 4, height: 4 });
        assert!(find_causative_cells(&mut env, 0, 99).is_err());
        assert_eq!(snapshot(&env), before);
        assert_eq!(env.steps, 0);
    }

    #[test]
    fn empty_probe_list_is_rejected() {
        let mut env = ParityEnv::new(1);
        let scanner = Scanner::new(ScanConfig { probe_values: vec![], ..ScanConfig::default() });
        assert_eq!(scanner.scan(&mut env, 0, 0).unwrap_err(), ScanError::NoProbeValues);
        assert_eq!(env.steps, 0);
    }

    #[test]
    fn abort_stops_probing_with_memory_restored() {
        let mut env = ParityEnv::new(1);
        let before = snapshot(&env);
        let report = Scanner::default()
            .scan_with(&mut env, 0, 0, |index: usize, _: u8, _: &Frame| {
                if index == 10 { ProbeControl::Abort } else { ProbeControl::Continue }
            })
            .unwrap();
        assert!(report.aborted);
        assert_eq!(report.probed, 11);
        assert_eq!(report.candidates(), BTreeSet::from([K]));
        assert_eq!(snapshot(&env), before);
    }

    #[test]
    fn first_change_wins_per_cell() {
        let config = ScanConfig { probe_values: vec![0, 2, 3], ..ScanConfig::default() };
        let mut env = ParityEnv::new(5);
        let report = Scanner::new(config.clone()).scan(&mut env, 0, 0).unwrap();
        assert_eq!(report.hits.len(), 1);
        assert_eq!((report.hits[0].index, report.hits[0].probe_value), (K, 0));
        assert_eq!(report.probed, 127 * 3 + 1);

        let every = ScanConfig { tie_break: TieBreak::EveryChange, ..config };
        let report = Scanner::new(every).scan(&mut env, 0, 0).unwrap();
        let values: Vec<u8> = report.hits.iter().map(|h| h.probe_value).collect();
        assert_eq!(values, vec![0, 2]);
        assert_eq!(report.candidates(), BTreeSet::from([K]));
        assert_eq!(report.probed, 128 * 3);
    }

    #[test]
    fn shark_pixel_traces_to_shark_cell() {
        let mut m = SpriteMachine::new();
        let before = snapshot(&m);
        // shark spans x 61..77 on row 70..76 after the reference step
        let found = find_causative_cells(&mut m, 65, 72).unwrap();
        assert_eq!(found, BTreeSet::from([SHARK_X]));
        assert_eq!(snapshot(&m), before);
    }

    #[test]
    fn water_pixel_traces_to_colour_cell() {
        let mut m = SpriteMachine::new();
        m.set_memory(WATER_COLOR, 2).unwrap();
        assert_eq!(find_causative_cells(&mut m, 5, 200).unwrap(), BTreeSet::from([WATER_COLOR]));
    }

    #[test]
    fn pinned_cell_is_not_causative() {
        let patcher = Patcher::new(&FISHING_DERBY, &ModeConfig::new().with("shark", 1)).unwrap();
        let mut env = PatchedEnv::new(SpriteMachine::new(), patcher).unwrap();
        let before = snapshot(&env);
        assert!(find_causative_cells(&mut env, 110, 72).unwrap().is_empty());
        assert_eq!(snapshot(&env), before);
    }
}
