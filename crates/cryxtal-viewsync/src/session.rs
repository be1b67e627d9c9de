use std::cell::Cell;
use std::rc::Rc;

/// Single-flight marker for group broadcasts.
///
/// Entering hands out a [`SessionGuard`]; the session stays active until the
/// guard drops, on every exit path.
#[derive(Clone, Debug, Default)]
pub struct BroadcastSession {
    active: Rc<Cell<bool>>,
}

impl BroadcastSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// `None` when a broadcast is already in flight.
    pub fn enter(&self) -> Option<SessionGuard> {
        if self.active.replace(true) {
            return None;
        }
        Some(SessionGuard {
            active: Rc::clone(&self.active),
        })
    }
}

#[must_use = "the session ends when the guard is dropped"]
#[derive(Debug)]
pub struct SessionGuard {
    active: Rc<Cell<bool>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_flight() {
        let session = BroadcastSession::new();
        let guard = session.enter().expect("idle session");
        assert!(session.is_active());
        assert!(session.enter().is_none());
        drop(guard);
        assert!(!session.is_active());
        assert!(session.enter().is_some());
    }

    #[test]
    fn released_on_panic() {
        let session = BroadcastSession::new();
        let inner = session.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = inner.enter().expect("idle session");
            panic!("command failed");
        }));
        assert!(result.is_err());
        assert!(!session.is_active());
    }
}
