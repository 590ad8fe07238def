//! Client-side turn clock poller.
//!
//! Clients render a countdown for the shared turn and, when it runs out, ask
//! the server to advance. Because every client polls the same clock, the
//! poller must request the advance exactly once per turn; the server's own
//! elapsed-time guard catches the stragglers.

use chrono::{DateTime, Utc};

use crate::game::GameBoard;

/// What the poller wants done after a tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockSignal {
    /// Keep counting down; this many seconds remain
    Tick(i64),
    /// The turn has expired: request an advance from the server
    Advance,
}

/// Polls a board's turn clock and fires a single advance request per turn
#[derive(Debug, Default)]
pub struct TurnClock {
    /// Turn we already fired an advance for, keyed by index and start time
    fired: Option<(usize, Option<DateTime<Utc>>)>,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, game: &GameBoard, now: DateTime<Utc>) -> ClockSignal {
        let remaining = game.remaining(now);
        if remaining > 0 {
            return ClockSignal::Tick(remaining);
        }
        let key = (game.current_turn_index, game.turn_start_time);
        if self.fired == Some(key) {
            return ClockSignal::Tick(0);
        }
        self.fired = Some(key);
        ClockSignal::Advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn board() -> GameBoard {
        let mut b = GameBoard::new(1, "test", 3, 3, Utc::now()).unwrap();
        b.turn_order = vec![1, 2];
        b
    }

    #[test]
    fn test_ticks_while_time_remains() {
        let mut b = board();
        let now = Utc::now();
        b.turn_start_time = Some(now);
        let mut clock = TurnClock::new();
        assert_eq!(clock.poll(&b, now + Duration::seconds(5)), ClockSignal::Tick(15));
    }

    #[test]
    fn test_fires_advance_once_per_turn() {
        let mut b = board();
        let now = Utc::now();
        b.turn_start_time = Some(now);
        let expired = now + Duration::seconds(25);

        let mut clock = TurnClock::new();
        assert_eq!(clock.poll(&b, expired), ClockSignal::Advance);
        // repeated polls on the same expired turn stay quiet
        assert_eq!(clock.poll(&b, expired), ClockSignal::Tick(0));
        assert_eq!(clock.poll(&b, expired + Duration::seconds(3)), ClockSignal::Tick(0));

        // once the server advances, the next expiry fires again
        b.advance_turn(expired).unwrap();
        let expired2 = expired + Duration::seconds(25);
        assert_eq!(clock.poll(&b, expired2), ClockSignal::Advance);
    }
}
