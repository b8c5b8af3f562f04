//! Fuzz arbitrary operation sequences against an active list.
//!
//! Every operation may fail; the target only asserts that the list stays
//! internally consistent and that nothing panics.

#![no_main]

use std::time::Duration;

use activekit::{
    ActionOptions, ActiveList, ActiveListConfig, AutoPlayConfig, LimitBehavior, ManualClock,
    Placement,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Activate(u8, bool),
    Deactivate(u8, bool),
    Toggle(u8),
    Next,
    Previous,
    ActivateMatching(u8),
    DeactivateMatching(u8),
    Insert(u8, u8),
    Remove(u8),
    RemoveMatching(u8),
    Swap(u8, u8),
    Move(u8, u8),
    MoveNextTo(u8, u8, u8),
    Play,
    Pause,
    Stop,
    Advance(u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    len: u8,
    circular: bool,
    limit: Option<u8>,
    behavior: u8,
    cooldown_ms: u16,
    auto_play_ms: u16,
    ops: Vec<Op>,
}

fn opts(user: bool) -> ActionOptions<u8> {
    if user {
        ActionOptions::user()
    } else {
        ActionOptions::automatic()
    }
}

fuzz_target!(|input: Input| {
    let behavior = match input.behavior % 3 {
        0 => LimitBehavior::Circular,
        1 => LimitBehavior::Ignore,
        _ => LimitBehavior::Error,
    };
    let mut config = ActiveListConfig::new(0..input.len % 32)
        .circular(input.circular)
        .with_max_activation_limit(input.limit.map(|l| usize::from(l % 6)))
        .with_limit_behavior(behavior)
        .with_history(16);
    if input.cooldown_ms > 0 {
        config = config.with_cooldown(Duration::from_millis(u64::from(input.cooldown_ms)));
    }
    if input.auto_play_ms > 0 {
        config = config.with_auto_play(AutoPlayConfig::new(Duration::from_millis(u64::from(
            input.auto_play_ms,
        ))));
    }

    let clock = ManualClock::new();
    let Ok(mut list) = ActiveList::with_clock(config, clock.clone()) else {
        return;
    };

    for op in input.ops.iter().take(256) {
        let _ = match *op {
            Op::Activate(i, user) => list.activate_by_index(usize::from(i), opts(user)),
            Op::Deactivate(i, user) => list.deactivate_by_index(usize::from(i), opts(user)),
            Op::Toggle(i) => list.toggle_by_index(usize::from(i), opts(true)),
            Op::Next => list.activate_next(opts(true)),
            Op::Previous => list.activate_previous(opts(true)),
            Op::ActivateMatching(m) => {
                let m = usize::from(m % 4) + 1;
                list.activate_by_predicate(|ctx| ctx.index % m == 0, opts(true))
            }
            Op::DeactivateMatching(v) => {
                list.deactivate_by_predicate(|ctx| *ctx.value <= v, opts(true))
            }
            Op::Insert(i, v) => list.insert_at_index(usize::from(i), v).map(|_| ()),
            Op::Remove(i) => list.remove_by_index(usize::from(i)).map(|_| ()),
            Op::RemoveMatching(v) => {
                list.remove_by_predicate(|ctx| *ctx.value == v);
                Ok(())
            }
            Op::Swap(a, b) => list.swap_by_index(usize::from(a), usize::from(b)),
            Op::Move(a, b) => list.move_by_index(usize::from(a), usize::from(b)),
            Op::MoveNextTo(from, target, p) => {
                let placement = match p % 3 {
                    0 => Placement::At,
                    1 => Placement::Before,
                    _ => Placement::After,
                };
                let target = usize::from(target);
                list.move_by_index_by_predicate(usize::from(from), |ctx| ctx.index == target, placement)
            }
            Op::Play => list.play(),
            Op::Pause => {
                list.pause();
                Ok(())
            }
            Op::Stop => {
                list.stop();
                Ok(())
            }
            Op::Advance(ms) => {
                clock.advance(Duration::from_millis(u64::from(ms)));
                list.poll_timers()
            }
        };

        for (i, content) in list.contents().iter().enumerate() {
            assert_eq!(content.index(), i);
        }
        let active = list.active_indexes();
        if let Some(limit) = list.max_activation_limit() {
            assert!(active.len() <= limit);
        }
        assert!(list.history().len() <= 16);
        if let Some(last) = list.last_activated_index() {
            assert!(active.contains(&last));
        }
    }
});
