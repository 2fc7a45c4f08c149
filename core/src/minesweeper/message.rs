use core::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Normal,
    /// A safe cell was clicked.
    Obtaining,
    /// A mine went off.
    Damage,
}

/// Mood line that falls back to [`Mood::Normal`] some time after the last reaction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Message {
    mood: Mood,
    hold: Duration,
    remaining: Duration,
}

impl Message {
    pub const fn new(hold: Duration) -> Self {
        Self {
            mood: Mood::Normal,
            hold,
            remaining: Duration::ZERO,
        }
    }

    pub const fn mood(&self) -> Mood {
        self.mood
    }

    pub fn reset(&mut self) {
        self.mood = Mood::Normal;
        self.remaining = Duration::ZERO;
    }

    pub fn show(&mut self, mood: Mood) {
        self.mood = mood;
        self.remaining = self.hold;
    }

    /// Returns `true` when the mood just went back to normal.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.remaining.is_zero() {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(delta);
        if self.remaining.is_zero() {
            self.mood = Mood::Normal;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_falls_back_after_hold() {
        let mut message = Message::new(Duration::from_secs(3));
        message.show(Mood::Damage);

        assert!(!message.tick(Duration::from_secs(2)));
        assert_eq!(message.mood(), Mood::Damage);
        assert!(message.tick(Duration::from_secs(2)));
        assert_eq!(message.mood(), Mood::Normal);
        assert!(!message.tick(Duration::from_secs(2)));
    }
}
