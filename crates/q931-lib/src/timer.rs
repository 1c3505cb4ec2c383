use core::fmt::Debug;

use q931_core::Longtime;

/// Pending timers kept in a list sorted by expiry.
/// Each key names its owner and the timer kind; starting a pending key moves it.
pub struct TimerSet<K> {
    pending: Vec<(Longtime, K)>,
}

impl<K: Copy + PartialEq + Debug> TimerSet<K> {
    pub fn new() -> Self {
        TimerSet { pending: Vec::new() }
    }

    /// Start or restart `key` to expire at the absolute time `expires`
    pub fn start(&mut self, key: K, expires: Longtime) {
        self.stop(key);
        // Insert after timers with the same expiry so equal deadlines fire in start order
        let pos = self.pending.iter().position(|(t, _)| *t > expires).unwrap_or(self.pending.len());
        tracing::trace!("start {:?} at {}", key, expires);
        self.pending.insert(pos, (expires, key));
    }

    pub fn start_delta(&mut self, key: K, delta: Longtime, now: Longtime) {
        self.start(key, now + delta);
    }

    /// Stop `key` if pending
    pub fn stop(&mut self, key: K) {
        if let Some(pos) = self.pending.iter().position(|(_, k)| *k == key) {
            tracing::trace!("stop {:?}", key);
            self.pending.remove(pos);
        }
    }

    /// Stop every pending key matching `pred`
    pub fn stop_matching(&mut self, pred: impl Fn(&K) -> bool) {
        self.pending.retain(|(_, k)| !pred(k));
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(_, k)| *k == key)
    }

    pub fn expiry(&self, key: K) -> Option<Longtime> {
        self.pending.iter().find(|(_, k)| *k == key).map(|(t, _)| *t)
    }

    /// Remove and return the earliest timer that has expired at `now`.
    /// Callers fire one timer at a time and ask again, since firing may start or stop others.
    pub fn pop_expired(&mut self, now: Longtime) -> Option<K> {
        match self.pending.first() {
            Some((t, _)) if *t <= now => Some(self.pending.remove(0).1),
            _ => None,
        }
    }

    /// Time from `now` until the next expiry, None when nothing is pending
    pub fn next_timer(&self, now: Longtime) -> Option<Longtime> {
        self.pending.first().map(|(t, _)| (*t - now).max(0))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq + Debug> Default for TimerSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::debug;

    #[test]
    fn test_fires_in_expiry_order() {
        debug::setup_logging_verbose();
        let mut timers = TimerSet::new();
        timers.start('a', 100);
        timers.start('b', 50);
        timers.start('c', 200);

        let mut fired = vec![];
        while let Some(k) = timers.pop_expired(120) {
            fired.push(k);
        }
        assert_eq!(fired, vec!['b', 'a']);
        assert!(timers.is_pending('c'));
        assert_eq!(timers.next_timer(120), Some(80));
    }

    #[test]
    fn test_restart_moves_timer() {
        debug::setup_logging_verbose();
        let mut timers = TimerSet::new();
        timers.start(1, 10);
        timers.start(2, 20);
        timers.start(1, 30);
        assert_eq!(timers.len(), 2);
        assert_eq!(timers.pop_expired(25), Some(2));
        assert_eq!(timers.pop_expired(25), None);
        assert_eq!(timers.expiry(1), Some(30));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timers = TimerSet::new();
        timers.start_delta(7u8, 5, 100);
        timers.stop(7);
        timers.stop(7);
        assert!(timers.is_empty());
        assert_eq!(timers.next_timer(0), None);
    }

    #[test]
    fn test_equal_expiry_keeps_start_order() {
        let mut timers = TimerSet::new();
        timers.start('x', 10);
        timers.start('y', 10);
        assert_eq!(timers.pop_expired(10), Some('x'));
        assert_eq!(timers.pop_expired(10), Some('y'));
    }
}
