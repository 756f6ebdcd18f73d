//! # Window Invariants
//!
//! Property tests over random instruction streams and configurations. After
//! every admission the window must respect its capacity and degree limits,
//! and every live producer must sit ahead of the consumers it forwards to.

use proptest::prelude::*;
use robscan_core::common::{InstId, RegId};
use robscan_core::config::Config;
use robscan_core::isa::{Category, InstructionDescriptor, MemRef, Operand};
use robscan_core::window::ForwardingSimulator;

fn operand() -> impl Strategy<Value = Operand> {
    prop_oneof![
        6 => (0u32..6).prop_map(|r| Operand::Reg(RegId(r))),
        2 => (0u64..4).prop_map(|b| Operand::Mem(MemRef { base: b * 8, ..MemRef::default() })),
        1 => Just(Operand::Imm),
    ]
}

fn instruction() -> impl Strategy<Value = InstructionDescriptor> {
    (
        0u64..64,
        prop_oneof![
            4 => Just(Category::Binary),
            2 => Just(Category::Logical),
            1 => Just(Category::DataTransfer),
        ],
        prop::collection::vec(operand(), 0..=4),
    )
        .prop_map(|(id, category, operands)| InstructionDescriptor::new(InstId(id), category, operands))
}

fn config() -> impl Strategy<Value = Config> {
    (
        2usize..16,
        1usize..4,
        1usize..4,
        1usize..5,
        0usize..4,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(capacity, max_operands, max_forwards, lookahead, imminent, extend, baseline, track, backfill, restrict)| {
                let mut config = Config::default();
                config.window.capacity = capacity;
                config.window.max_operands = max_operands;
                config.window.max_forwards = max_forwards;
                config.window.lookahead = lookahead;
                config.window.imminent_distance = imminent.min(capacity - 1);
                config.window.extend_to_tail = extend;
                config.policy.baseline = baseline;
                config.policy.track_missed = track;
                config.policy.backfill = backfill;
                config.policy.restrict_categories = restrict;
                config
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_window_invariants_hold(config in config(), trace in prop::collection::vec(instruction(), 1..80)) {
        let capacity = config.window.capacity;
        let max_forwards = config.window.max_forwards;
        let baseline = config.policy.baseline;
        let mut sim = ForwardingSimulator::new(config).unwrap();
        let mut forwards = 0;

        for (n, desc) in trace.iter().enumerate() {
            let admission = sim.admit(desc);
            let window = sim.window();

            prop_assert!(window.len() <= capacity);
            prop_assert_eq!(window.len(), (n + 1).min(capacity));
            prop_assert_eq!(sim.counters().instructions, n as u64 + 1);

            prop_assert_eq!(sim.counters().forwards, forwards + admission.bindings as u64);
            forwards = sim.counters().forwards;

            for (pos, entry) in window.iter().enumerate() {
                prop_assert!(entry.forwards_to.len() <= max_forwards);
                for &producer in &entry.forwards_from {
                    if let Some(p) = window.position(producer) {
                        prop_assert!(p < pos, "producer {} sits behind consumer {}", producer, entry.tag);
                    }
                }
            }

            if admission.bypassed {
                prop_assert_eq!(admission.bindings, 0);
            }
        }

        if baseline {
            prop_assert_eq!(sim.counters().relocations, 0);
            prop_assert_eq!(sim.counters().backfills, 0);
        }
    }

    #[test]
    fn prop_potential_is_a_bounded_ratio(trace in prop::collection::vec(instruction(), 1..60)) {
        let mut sim = ForwardingSimulator::new(Config::default()).unwrap();
        for desc in &trace {
            let _ = sim.admit(desc);
        }
        let potential = sim.counters().forwarding_potential().unwrap();
        prop_assert!(potential >= 0.0);
        prop_assert!(potential <= 3.0);
    }
}
