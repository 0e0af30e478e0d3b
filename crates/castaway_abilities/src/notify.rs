//! Damage notification channel.
//!
//! An attribute set that takes damage implements [`NotifiesOnDamage`]; an
//! owner subscribes once and drains the receiver after every effect it
//! executes. No back-pointer from the set to its owner is needed.

use crate::effect::EffectSpec;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Damage resolved against an attribute set.
#[derive(Clone, Debug)]
pub struct DamageReceived {
    /// Evaluated magnitude of the damage modifier.
    pub magnitude: f32,
    /// Spec of the effect that dealt the damage.
    pub spec: EffectSpec,
}

/// Capability: "notifies subscribers when damage resolves against me".
pub trait NotifiesOnDamage {
    /// Registers a new subscriber.
    fn subscribe_damage(&mut self) -> Receiver<DamageReceived>;
}

/// Subscriber list behind [`NotifiesOnDamage`].
#[derive(Debug, Default)]
pub struct DamageNotifier {
    subscribers: Vec<Sender<DamageReceived>>,
}

impl DamageNotifier {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<DamageReceived> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Delivers `event` to every live subscriber, dropping disconnected ones.
    ///
    /// Returns the number of subscribers reached.
    pub fn notify(&mut self, event: &DamageReceived) -> usize {
        self.subscribers.retain(|s| s.send(event.clone()).is_ok());
        self.subscribers.len()
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
