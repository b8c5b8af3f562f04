//! Log output is part of the contract hosts rely on when debugging.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use activekit::{ActionOptions, ActiveList, ActiveListConfig, AutoPlayConfig, ManualClock};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone, Default)]
struct Capture {
    messages: Arc<Mutex<Vec<String>>>,
}

struct MessageVisitor<'a>(&'a mut Option<String>);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        if let Some(message) = message {
            self.messages.lock().unwrap().push(message);
        }
    }
}

fn captured(f: impl FnOnce()) -> Vec<String> {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    let messages = capture.messages.lock().unwrap().clone();
    messages
}

#[test]
fn cooldown_transitions_are_logged() {
    let messages = captured(|| {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::new(["a", "b"]).with_cooldown(Duration::from_millis(100)),
            clock.clone(),
        )
        .unwrap();
        list.activate_by_index(0, ActionOptions::default()).unwrap();
        list.activate_by_index(1, ActionOptions::default()).unwrap();
        clock.advance(Duration::from_millis(100));
        list.poll_timers().unwrap();
    });
    for expected in ["cooldown started", "dropped during cooldown", "cooldown ended"] {
        assert!(
            messages.iter().any(|m| m == expected),
            "missing {expected:?} in {messages:?}"
        );
    }
}

#[test]
fn autoplay_lifecycle_is_logged() {
    let messages = captured(|| {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::new([1, 2, 3])
                .with_active_indexes([0])
                .with_auto_play(AutoPlayConfig::new(Duration::from_millis(50))),
            clock.clone(),
        )
        .unwrap();
        list.pause();
        list.play().unwrap();
        list.stop();
    });
    let lifecycle: Vec<&str> = messages
        .iter()
        .map(String::as_str)
        .filter(|m| m.starts_with("autoplay "))
        .collect();
    assert_eq!(
        lifecycle,
        vec!["autoplay paused", "autoplay resumed", "autoplay stopped"]
    );
}
