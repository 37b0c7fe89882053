//! Unit tests for nc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{HostId, NodeIndex, SwitchId};

    #[test]
    fn index_roundtrip() {
        let id = SwitchId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(SwitchId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn device_names() {
        assert_eq!(SwitchId(7).to_string(), "s7");
        assert_eq!(HostId(7).to_string(), "hs7");
        assert_eq!(NodeIndex(3).to_string(), "#3");
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(SwitchId::INVALID.0, u32::MAX);
        assert_eq!(HostId::default(), HostId::INVALID);
    }
}

#[cfg(test)]
mod params {
    use std::time::Duration;

    use crate::{BatchConfig, CoreError, GeneratorConfig, RunParameters};

    #[test]
    fn reference_defaults() {
        let p = RunParameters::default();
        assert_eq!(p.time_between_pings, 30);
        assert_eq!(p.pings_per_window, 4);
        assert_eq!(p.window_count, 5);
        assert_eq!(p.link_cut_window, 2);
        assert!(p.validate().is_ok());
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[test]
    fn window_arithmetic() {
        let p = RunParameters::default();
        assert_eq!(p.ping_interval(), Duration::from_secs(30));
        assert_eq!(p.window_duration(), Duration::from_secs(120));
        assert_eq!(p.sampling_duration(), Duration::from_secs(600));
        assert_eq!(p.windows_before_cut(), 2);
        assert_eq!(p.windows_after_cut(), 3);
        assert!(p.schedules_cut());
    }

    #[test]
    fn cut_at_window_count_means_no_cut() {
        let p = RunParameters { link_cut_window: 5, ..RunParameters::default() };
        assert!(p.validate().is_ok());
        assert!(!p.schedules_cut());
        assert_eq!(p.windows_after_cut(), 0);
    }

    #[test]
    fn cut_past_last_window_rejected() {
        let p = RunParameters { link_cut_window: 6, ..RunParameters::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_pings_rejected() {
        let p = RunParameters { pings_per_window: 0, ..RunParameters::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn generator_bounds_checked() {
        let g = GeneratorConfig { min_nodes: 70, ..GeneratorConfig::default() };
        assert!(g.validate().is_err());
        let g = GeneratorConfig { max_loop_size: 2, ..GeneratorConfig::default() };
        assert!(g.validate().is_err());
    }

    #[test]
    fn generator_bound_overflow_is_a_config_error() {
        let g = GeneratorConfig { min_nodes: u32::MAX, max_nodes: u32::MAX, ..GeneratorConfig::default() };
        assert!(matches!(g.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn batch_probability_checked() {
        let c = BatchConfig { chance_of_no_link_cut: 1.5, ..BatchConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn controllers_round_robin() {
        let c = BatchConfig {
            controllers: vec!["a:6633".into(), "b:6633".into()],
            ..BatchConfig::default()
        };
        assert_eq!(c.controller_for(0), Some("a:6633"));
        assert_eq!(c.controller_for(3), Some("b:6633"));
        let empty = BatchConfig { controllers: vec![], ..BatchConfig::default() };
        assert_eq!(empty.controller_for(0), None);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let c: BatchConfig = serde_json::from_str(r#"{ "thread_count": 2, "seed": 9 }"#).unwrap();
        assert_eq!(c.thread_count, 2);
        assert_eq!(c.seed, 9);
        assert_eq!(c.run, RunParameters::default());
        assert_eq!(c.generator.max_nodes, 75);
    }

    #[test]
    fn partial_run_section_takes_defaults() {
        let c: BatchConfig = serde_json::from_str(r#"{ "run": { "window_count": 6 } }"#).unwrap();
        assert_eq!(c.run.window_count, 6);
        assert_eq!(c.run.pings_per_window, 4);
        assert_eq!(c.run.link_cut_window, 2);
        assert!(c.validate().is_ok());
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::{Clock, ScaledClock};

    #[test]
    fn scaled_clock_compresses_sleep() {
        let clock = ScaledClock::new(1_000.0);
        let t0 = std::time::Instant::now();
        clock.sleep(Duration::from_secs(1)); // 1 ms of real time
        assert!(t0.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn scaled_clock_reports_experiment_time() {
        let clock = ScaledClock::new(1_000.0);
        let start = clock.now();
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.elapsed(start) >= Duration::from_secs(2));
    }

    #[test]
    fn invalid_factor_falls_back() {
        assert_eq!(ScaledClock::new(0.0).factor(), 1.0);
        assert_eq!(ScaledClock::new(f64::NAN).factor(), 1.0);
    }

    #[test]
    fn pace_skips_when_interval_spent() {
        let clock = ScaledClock::new(1_000.0);
        let start = clock.now();
        std::thread::sleep(Duration::from_millis(5)); // 5 experiment seconds
        let t0 = std::time::Instant::now();
        clock.pace(start, Duration::from_secs(1));
        assert!(t0.elapsed() < Duration::from_millis(50));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn children_differ_by_offset() {
        let mut root_a = SimRng::new(1);
        let mut root_b = SimRng::new(1);
        let mut c0 = root_a.child(0);
        let mut c1 = root_b.child(1);
        assert_ne!(c0.random::<u64>(), c1.random::<u64>());
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
