//! # Admission Scenarios
//!
//! End-to-end admission sequences checked against the exact window order,
//! forwarding links and counters they must produce.

use crate::common::builder::InstructionBuilder;
use crate::common::harness::TestContext;
use pretty_assertions::assert_eq;
use robscan_core::config::{Config, Profile};
use robscan_core::isa::Category;

// ══════════════════════════════════════════════════════════
// 1. Baseline
// ══════════════════════════════════════════════════════════

#[test]
fn test_baseline_records_missed_forward_instead_of_relocating() {
    let mut ctx = TestContext::with_overlay(
        r#"{"window": {"capacity": 4, "imminent_distance": 1}, "policy": {"baseline": true}}"#,
    );
    let w1 = ctx.op(1, &[]).tag;
    let w2 = ctx.op(2, &[]).tag;
    let w3 = ctx.op(3, &[1]);

    assert_eq!(w3.bindings, 0);
    assert_eq!(w3.missed, 1);
    assert!(!w3.relocated);
    assert_eq!(ctx.order(), vec![w1, w2, w3.tag]);
    assert_eq!(ctx.entry(w1).missed_forwards_to, vec![w3.tag]);
    assert_eq!(ctx.counters().forwards, 0);
    assert_eq!(ctx.counters().relocations, 0);
}

#[test]
fn test_baseline_still_counts_imminent_forward() {
    let mut ctx = TestContext::with_overlay(r#"{"policy": {"baseline": true}}"#);
    let w1 = ctx.op(1, &[]).tag;
    let _ = ctx.op(2, &[]);
    let w3 = ctx.op(3, &[1]);

    assert_eq!(w3.bindings, 1);
    assert_eq!(ctx.entry(w1).forwards_to, vec![w3.tag]);
    assert_eq!(ctx.counters().forwards, 1);
    assert_eq!(ctx.counters().relocations, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Rank 1 relocation
// ══════════════════════════════════════════════════════════

#[test]
fn test_consumer_relocates_next_to_distant_producer() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"capacity": 8, "imminent_distance": 1}}"#);
    let a = ctx.op(1, &[]).tag;
    let b = ctx.op(2, &[]).tag;
    let c = ctx.op(3, &[]).tag;
    let d = ctx.op(4, &[1]);

    assert!(d.relocated);
    assert_eq!(d.bindings, 1);
    assert_eq!(ctx.order(), vec![a, d.tag, b, c]);
    assert_eq!(ctx.entry(a).forwards_to, vec![d.tag]);
    assert_eq!(ctx.entry(d.tag).forwards_from, vec![a]);
    assert_eq!(ctx.counters().relocations, 1);
}

#[test]
fn test_full_profile_relocates_beyond_imminent_distance() {
    let mut ctx = TestContext::default();
    let a = ctx.op(1, &[]).tag;
    let fillers = ctx.fillers(3);
    let d = ctx.op(4, &[1]);

    let mut expected = vec![a, d.tag];
    expected.extend(fillers);
    assert_eq!(ctx.order(), expected);
    assert_eq!(ctx.counters().forwards, 1);
}

#[test]
fn test_consumer_stays_behind_chained_dependent() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"imminent_distance": 1, "lookahead": 2}}"#);
    let a = ctx.op(1, &[]).tag;
    let k = ctx.op(2, &[1]).tag;
    let d = ctx.op(3, &[1]);

    assert_eq!(d.bindings, 1);
    assert!(!d.relocated);
    assert_eq!(ctx.order(), vec![a, k, d.tag]);
    assert_eq!(ctx.entry(a).forwards_to, vec![k, d.tag]);
}

#[test]
fn test_memory_operands_match_by_surrogate() {
    let mut ctx = TestContext::default();
    let store = ctx.admit(&InstructionBuilder::new(1).mem(0x1000, 8).reg(3).build());
    let load = ctx.admit(&InstructionBuilder::new(2).reg(4).mem(0x1008, 0).build());

    assert_eq!(load.bindings, 1);
    assert_eq!(ctx.entry(load.tag).forwards_from, vec![store.tag]);
}

// ══════════════════════════════════════════════════════════
// 3. Degree limit
// ══════════════════════════════════════════════════════════

#[test]
fn test_saturated_producer_misses_further_consumers() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"max_forwards": 1}}"#);
    let a = ctx.op(1, &[]).tag;
    let x = ctx.op(2, &[1]);
    let y = ctx.op(3, &[1]);

    assert_eq!(x.bindings, 1);
    assert_eq!(y.bindings, 0);
    assert_eq!(y.missed, 1);
    assert_eq!(ctx.entry(a).forwards_to, vec![x.tag]);
    assert_eq!(ctx.entry(a).missed_forwards_to, vec![y.tag]);
    assert_eq!(ctx.counters().forwards, 1);
    assert_eq!(ctx.counters().missed_forwards, 1);
}

// ══════════════════════════════════════════════════════════
// 4. Bypass
// ══════════════════════════════════════════════════════════

#[test]
fn test_restricted_category_bypasses_analysis() {
    let mut ctx = TestContext::compact();
    let mov = ctx.admit(
        &InstructionBuilder::new(1)
            .category(Category::DataTransfer)
            .reg(1)
            .reg(2)
            .build(),
    );
    let add = ctx.op(3, &[1]);

    assert!(mov.bypassed);
    assert!(!ctx.entry(mov.tag).analyzed);
    assert_eq!(ctx.entry(mov.tag).destination, None);
    assert_eq!(add.bindings, 0);
    assert_eq!(ctx.counters().bypassed, 1);
    assert_eq!(ctx.counters().instructions, 2);
    assert_eq!(ctx.sim.window().len(), 2);
}

#[test]
fn test_bypassed_entry_is_evicted_in_order() {
    let config = Config::for_profile(Profile::Compact)
        .overlay(r#"{"window": {"capacity": 3}}"#)
        .unwrap();
    let mut ctx = TestContext::new(config);
    let first = ctx.fillers(1)[0];
    let mov = ctx.admit(
        &InstructionBuilder::new(1)
            .category(Category::DataTransfer)
            .reg(1)
            .reg(2)
            .build(),
    );
    let rest = ctx.fillers(2);
    assert_eq!(ctx.order(), vec![mov.tag, rest[0], rest[1]]);
    assert!(ctx.sim.window().find(first).is_none());

    let last = ctx.fillers(1)[0];
    assert!(ctx.sim.window().find(mov.tag).is_none());
    assert_eq!(ctx.order(), vec![rest[0], rest[1], last]);
    assert_eq!(ctx.counters().evictions, 2);
    assert_eq!(ctx.counters().bypassed, 1);
}

#[test]
fn test_too_many_operands_bypasses_analysis() {
    let mut ctx = TestContext::default();
    let _ = ctx.op(1, &[]);
    let wide = ctx.op(2, &[1, 3, 4]);

    assert!(wide.bypassed);
    assert_eq!(ctx.counters().forwards, 0);
}

// ══════════════════════════════════════════════════════════
// 5. Capacity
// ══════════════════════════════════════════════════════════

#[test]
fn test_eviction_retires_oldest_and_forgets_its_writes() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"capacity": 4, "imminent_distance": 1}}"#);
    let a = ctx.op(1, &[]).tag;
    let fillers = ctx.fillers(4);

    assert_eq!(ctx.sim.window().len(), 4);
    assert_eq!(ctx.order(), fillers);
    assert!(ctx.sim.window().find(a).is_none());
    assert_eq!(ctx.counters().evictions, 1);

    let d = ctx.op(2, &[1]);
    assert_eq!(d.bindings, 0);
    assert_eq!(ctx.counters().evictions, 2);
    assert_eq!(ctx.sim.window().len(), 4);
}

// ══════════════════════════════════════════════════════════
// 6. Hazard filter
// ══════════════════════════════════════════════════════════

#[test]
fn test_producer_older_than_other_operands_second_writer_is_dropped() {
    let mut ctx = TestContext::default();
    let y = ctx.op(1, &[]).tag;
    let _x = ctx.op(2, &[]).tag;
    let z = ctx.op(2, &[]).tag;
    let d = ctx.op(8, &[1, 2]);

    assert_eq!(ctx.entry(d.tag).forwards_from, vec![z]);
    assert!(ctx.entry(y).forwards_to.is_empty());
    assert!(ctx.entry(y).missed_forwards_to.is_empty());
}

// ══════════════════════════════════════════════════════════
// 7. Older producers (rank 2 and up)
// ══════════════════════════════════════════════════════════

#[test]
fn test_second_producer_within_lookahead_binds_in_place() {
    let mut ctx = TestContext::default();
    let a = ctx.op(1, &[]).tag;
    let b = ctx.op(2, &[]).tag;
    let d = ctx.op(9, &[2, 1]);

    assert_eq!(d.bindings, 2);
    assert!(!d.relocated);
    assert_eq!(ctx.entry(d.tag).forwards_from, vec![b, a]);
}

#[test]
fn test_bound_chain_moves_after_older_producer() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"imminent_distance": 1}}"#);
    let a = ctx.op(1, &[]).tag;
    let early = ctx.fillers(4);
    let b = ctx.op(2, &[]).tag;
    let late = ctx.fillers(2);
    let d = ctx.op(9, &[2, 1]);

    assert_eq!(d.bindings, 2);
    assert!(d.relocated);
    let mut expected = vec![a, b, d.tag];
    expected.extend(early);
    expected.extend(late);
    assert_eq!(ctx.order(), expected);
    assert_eq!(ctx.entry(d.tag).forwards_from, vec![b, a]);
    assert_eq!(ctx.counters().relocations, 3);
}

#[test]
fn test_chain_with_inbound_forward_cannot_move() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"imminent_distance": 1}}"#);
    let a = ctx.op(1, &[]).tag;
    let _ = ctx.fillers(3);
    let _w = ctx.op(7, &[]).tag;
    let b = ctx.op(2, &[7]);
    let _ = ctx.fillers(2);
    let d = ctx.op(9, &[2, 1]);

    assert_eq!(b.bindings, 1);
    assert_eq!(d.bindings, 1);
    assert_eq!(d.missed, 1);
    assert_eq!(ctx.entry(d.tag).forwards_from, vec![b.tag]);
    assert_eq!(ctx.entry(a).missed_forwards_to, vec![d.tag]);
}

#[test]
fn test_chain_does_not_overtake_writer_of_bound_producer() {
    let mut ctx = TestContext::with_overlay(
        r#"{"window": {"imminent_distance": 1, "max_forwards": 2}}"#,
    );
    let pk = ctx.op(1, &[]).tag;
    let _ = ctx.fillers(4);
    let w = ctx.op(5, &[]).tag;
    let _ = ctx.op(6, &[5]);
    let _ = ctx.op(7, &[5]);
    // w is saturated, so p1 reads r5 without a forward.
    let p1 = ctx.op(2, &[5]);
    assert_eq!(p1.bindings, 0);
    assert_eq!(ctx.entry(w).missed_forwards_to, vec![p1.tag]);
    let _ = ctx.fillers(2);
    let d = ctx.op(9, &[2, 1]);

    assert_eq!(d.bindings, 1);
    assert_eq!(d.missed, 1);
    assert_eq!(ctx.entry(d.tag).forwards_from, vec![p1.tag]);
    assert_eq!(ctx.entry(pk).missed_forwards_to, vec![d.tag]);
    let order = ctx.order();
    let pos = |t| order.iter().position(|&x| x == t).unwrap();
    assert!(pos(w) < pos(p1.tag));
    assert!(pos(p1.tag) < pos(d.tag));
}

// ══════════════════════════════════════════════════════════
// 8. Backfill
// ══════════════════════════════════════════════════════════

#[test]
fn test_idle_producer_is_backfilled_before_unforwarded_consumer() {
    let mut ctx = TestContext::with_overlay(
        r#"{"window": {"imminent_distance": 2, "lookahead": 1}, "policy": {"track_missed": false}}"#,
    );
    let p = ctx.op(5, &[]).tag;
    let a = ctx.op(1, &[]).tag;
    let x = ctx.op(6, &[5]).tag;
    let f = ctx.fillers(1)[0];
    let d = ctx.op(3, &[1]);

    assert_eq!(d.bindings, 1);
    assert_eq!(d.missed, 1);
    assert_eq!(ctx.order(), vec![p, x, f, a, d.tag]);
    assert_eq!(ctx.entry(a).forwards_to, vec![d.tag]);
    assert_eq!(ctx.counters().backfills, 1);
    assert_eq!(ctx.counters().relocations, 1);
}

#[test]
fn test_tracked_miss_keeps_producer_out_of_backfill() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"imminent_distance": 2, "lookahead": 1}}"#);
    let p = ctx.op(5, &[]).tag;
    let a = ctx.op(1, &[]).tag;
    let x = ctx.op(6, &[5]).tag;
    let f = ctx.fillers(1)[0];
    let d = ctx.op(3, &[1]);

    assert_eq!(d.bindings, 0);
    assert_eq!(ctx.order(), vec![p, a, x, f, d.tag]);
    assert_eq!(ctx.entry(a).missed_forwards_to, vec![d.tag]);
    assert_eq!(ctx.counters().backfills, 0);
}

#[test]
fn test_backfill_does_not_pass_reader_of_producer() {
    let mut ctx = TestContext::with_overlay(
        r#"{"window": {"imminent_distance": 2, "lookahead": 1}, "policy": {"track_missed": false}}"#,
    );
    let p = ctx.op(5, &[]).tag;
    let a = ctx.op(1, &[]).tag;
    let x = ctx.op(6, &[5]).tag;
    let b1 = ctx.op(2, &[]).tag;
    let b2 = ctx.op(2, &[]).tag;
    // Reads r1 too, but a is dropped behind the newer r2 writes.
    let r = ctx.op(7, &[1, 2]);
    assert_eq!(ctx.entry(r.tag).forwards_from, vec![b2]);
    assert!(ctx.entry(a).is_idle());
    let d = ctx.op(3, &[1]);

    assert_eq!(d.bindings, 0);
    assert_eq!(ctx.order(), vec![p, a, x, b1, b2, r.tag, d.tag]);
    assert_eq!(ctx.counters().backfills, 0);
}

// ══════════════════════════════════════════════════════════
// 9. Run lifecycle
// ══════════════════════════════════════════════════════════

#[test]
fn test_reset_starts_a_fresh_run() {
    let mut ctx = TestContext::default();
    let _ = ctx.op(1, &[]);
    let _ = ctx.op(2, &[1]);
    ctx.sim.reset();

    assert!(ctx.sim.window().is_empty());
    assert_eq!(ctx.counters().instructions, 0);
    assert_eq!(ctx.counters().forwarding_potential(), None);
    assert_eq!(ctx.op(1, &[]).tag.0, 0);
}

#[test]
fn test_snapshot_reports_occupancy() {
    let mut ctx = TestContext::with_overlay(r#"{"window": {"capacity": 2, "imminent_distance": 1}}"#);
    let _ = ctx.fillers(3);
    let snap = ctx.sim.snapshot();

    assert_eq!(snap.occupancy, 2);
    assert_eq!(snap.capacity, 2);
    assert_eq!(snap.counters.instructions, 3);
    assert_eq!(snap.counters.evictions, 1);
}
