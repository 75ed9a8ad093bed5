//! Single-flight guard for store operations.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Marks an operation as running for as long as the guard lives.
///
/// Beginning applies `start` to the published state (typically "loading =
/// true"); dropping applies `finish` and releases the flag. Drop also runs
/// when the operation's future is cancelled, so the loading flag can never
/// stick.
pub(crate) struct InFlight<'a, S> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<S>,
    finish: fn(&mut S),
}

impl<'a, S> InFlight<'a, S> {
    /// Returns `None` if another operation holds `flag`.
    pub(crate) fn try_begin(
        flag: &'a AtomicBool,
        state: &'a watch::Sender<S>,
        start: fn(&mut S),
        finish: fn(&mut S),
    ) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return None;
        }
        state.send_modify(start);
        Some(Self {
            flag,
            state,
            finish,
        })
    }
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.state.send_modify(self.finish);
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected_until_drop() {
        let flag = AtomicBool::new(false);
        let (state, _rx) = watch::channel(false);

        let guard = InFlight::try_begin(&flag, &state, |s| *s = true, |s| *s = false);
        assert!(guard.is_some());
        assert!(*state.borrow());
        assert!(InFlight::try_begin(&flag, &state, |s| *s = true, |s| *s = false).is_none());

        drop(guard);
        assert!(!*state.borrow());
        assert!(InFlight::try_begin(&flag, &state, |s| *s = true, |s| *s = false).is_some());
    }
}
