//! "Measurement in progress" indicator
//! 
//! The indicator fades in when an acquisition starts. A hide requested while the
//! fade-in is still running is deferred until the renderer reports the animation
//! finished; the returned `Dismissal` completes at that moment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Hidden,
    /// Visible; `animating` while the fade-in runs
    Showing { animating: bool },
}

/// Completion handle for a hide request
#[derive(Debug, Clone)]
pub struct Dismissal {
    done: Arc<AtomicBool>,
}

impl Dismissal {
    fn completed() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(true)),
        }
    }

    fn pending() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }
}

/// Busy indicator state machine
#[derive(Debug)]
pub struct BusyIndicator {
    state: IndicatorState,
    pending: Vec<Dismissal>,
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self {
            state: IndicatorState::Hidden,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, IndicatorState::Showing { .. })
    }

    /// Start showing; the fade-in begins
    /// 
    /// Hides still deferred from an earlier fade-in belong to the previous
    /// acquisition. They complete here and cannot hide the new one.
    pub fn show(&mut self) {
        self.complete_pending();
        self.state = IndicatorState::Showing { animating: true };
    }

    fn complete_pending(&mut self) {
        for dismissal in self.pending.drain(..) {
            dismissal.done.store(true, Ordering::SeqCst);
        }
    }

    /// Request the indicator be hidden
    /// 
    /// # Returns
    /// Handle that completes once the indicator is actually hidden
    pub fn dismiss(&mut self) -> Dismissal {
        match self.state {
            IndicatorState::Hidden => Dismissal::completed(),
            IndicatorState::Showing { animating: false } => {
                self.state = IndicatorState::Hidden;
                Dismissal::completed()
            }
            IndicatorState::Showing { animating: true } => {
                let dismissal = Dismissal::pending();
                self.pending.push(dismissal.clone());
                dismissal
            }
        }
    }

    /// Fade-in finished; carries out any deferred hide
    pub fn animation_finished(&mut self) {
        if let IndicatorState::Showing { animating: true } = self.state {
            if self.pending.is_empty() {
                self.state = IndicatorState::Showing { animating: false };
            } else {
                self.state = IndicatorState::Hidden;
                self.complete_pending();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_after_animation() {
        let mut busy = BusyIndicator::new();
        busy.show();
        busy.animation_finished();
        assert_eq!(busy.state(), IndicatorState::Showing { animating: false });

        let dismissal = busy.dismiss();
        assert!(dismissal.is_complete());
        assert!(!busy.is_visible());
    }

    #[test]
    fn test_dismiss_during_animation_is_deferred() {
        let mut busy = BusyIndicator::new();
        busy.show();

        let first = busy.dismiss();
        let second = busy.dismiss();
        assert!(!first.is_complete());
        assert!(busy.is_visible());

        busy.animation_finished();
        assert!(first.is_complete());
        assert!(second.is_complete());
        assert_eq!(busy.state(), IndicatorState::Hidden);
    }

    #[test]
    fn test_show_again_drops_deferred_hide() {
        let mut busy = BusyIndicator::new();
        busy.show();
        let stale = busy.dismiss();
        assert!(!stale.is_complete());

        busy.show();
        assert!(stale.is_complete());

        busy.animation_finished();
        assert_eq!(busy.state(), IndicatorState::Showing { animating: false });

        assert!(busy.dismiss().is_complete());
        assert_eq!(busy.state(), IndicatorState::Hidden);
    }

    #[test]
    fn test_dismiss_when_hidden() {
        let mut busy = BusyIndicator::default();
        assert!(busy.dismiss().is_complete());
        busy.animation_finished();
        assert_eq!(busy.state(), IndicatorState::Hidden);
    }
}
