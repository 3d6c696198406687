//! Month transition controller
//!
//! Swapping the displayed month is animated by the renderer. The controller
//! tracks the one transition in flight and settles it exactly once, on
//! whichever comes first: the renderer's animation-end signal or a fallback
//! deadline armed for the animation duration plus a safety margin. Relying on
//! the animation signal alone would leave the picker stuck if the renderer
//! drops it.

mod scheduler;

pub use scheduler::{ManualScheduler, TokioScheduler, TransitionScheduler};

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::types::{CalendarDate, Direction, TransitionId};

/// Default animation length.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Default slack added to the animation length before the fallback fires.
pub const DEFAULT_SETTLE_MARGIN: Duration = Duration::from_millis(100);

/// Animation length and fallback slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    pub animation: Duration,
    pub margin: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            animation: DEFAULT_TRANSITION_DURATION,
            margin: DEFAULT_SETTLE_MARGIN,
        }
    }
}

impl TransitionTiming {
    /// Delay after which the fallback settles a transition.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.animation.saturating_add(self.margin)
    }
}

/// A month change in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTransition {
    pub id: TransitionId,
    pub direction: Direction,
    /// First day of the month being brought in
    pub target_month: CalendarDate,
}

/// What settled a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleCause {
    AnimationEnd,
    Deadline,
}

impl fmt::Display for SettleCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnimationEnd => write!(f, "animation end"),
            Self::Deadline => write!(f, "deadline"),
        }
    }
}

/// Drives at most one month transition at a time.
pub struct TransitionController {
    pending: Option<MonthTransition>,
    last_id: TransitionId,
    timing: TransitionTiming,
    scheduler: Box<dyn TransitionScheduler>,
}

impl TransitionController {
    pub fn new(timing: TransitionTiming, scheduler: Box<dyn TransitionScheduler>) -> Self {
        Self {
            pending: None,
            last_id: TransitionId::default(),
            timing,
            scheduler,
        }
    }

    #[must_use]
    pub const fn timing(&self) -> TransitionTiming {
        self.timing
    }

    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// The transition in flight, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&MonthTransition> {
        self.pending.as_ref()
    }

    /// Start moving from `current_month` to the month of `target`.
    ///
    /// Returns `None` without side effects while another transition is in
    /// flight, or when `target` is already the current month.
    pub fn begin(
        &mut self,
        current_month: CalendarDate,
        target: CalendarDate,
    ) -> Option<MonthTransition> {
        if let Some(pending) = &self.pending {
            debug!("Transition {} in flight, dropping request for {}", pending.id, target);
            return None;
        }
        if current_month.same_month(target) {
            return None;
        }

        let direction = if target.month_index() < current_month.month_index() {
            Direction::Left
        } else {
            Direction::Right
        };

        self.last_id = self.last_id.next();
        let transition = MonthTransition {
            id: self.last_id,
            direction,
            target_month: target.first_of_month(),
        };
        self.scheduler.arm(transition.id, self.timing.deadline());
        self.pending = Some(transition);

        debug!(
            "Transition {} started: {:?} to {}",
            transition.id, direction, transition.target_month
        );
        Some(transition)
    }

    /// The renderer finished animating transition `id`.
    pub fn animation_finished(&mut self, id: TransitionId) -> Option<CalendarDate> {
        self.settle(id, SettleCause::AnimationEnd)
    }

    /// The fallback deadline of transition `id` passed.
    pub fn deadline_elapsed(&mut self, id: TransitionId) -> Option<CalendarDate> {
        self.settle(id, SettleCause::Deadline)
    }

    /// Settle transition `id` and return its target month.
    ///
    /// Idempotent: a signal for a transition that is not in flight (already
    /// settled, or never started) returns `None`.
    pub fn settle(&mut self, id: TransitionId, cause: SettleCause) -> Option<CalendarDate> {
        let pending = self.pending.filter(|t| t.id == id)?;
        self.pending = None;
        self.scheduler.cancel(id);
        info!("Transition {} settled by {}", id, cause);
        Some(pending.target_month)
    }

    /// Drop any transition in flight without applying it and disarm its
    /// deadline. Used when the picker closes.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.id);
            debug!("Transition {} cancelled", pending.id);
        }
    }
}

impl Drop for TransitionController {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TransitionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionController")
            .field("pending", &self.pending)
            .field("last_id", &self.last_id)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn controller() -> (TransitionController, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let controller =
            TransitionController::new(TransitionTiming::default(), Box::new(scheduler.clone()));
        (controller, scheduler)
    }

    #[test]
    fn test_begin_sets_direction_and_arms_deadline() {
        let (mut ctl, timers) = controller();
        let t = ctl.begin(date("2021-11-01"), date("2021-10-15")).unwrap();
        assert_eq!(t.direction, Direction::Left);
        assert_eq!(t.target_month, date("2021-10-01"));
        assert!(ctl.is_transitioning());
        assert_eq!(timers.armed(), vec![(t.id, Duration::from_millis(400))]);
    }

    #[test]
    fn test_forward_is_right() {
        let (mut ctl, _timers) = controller();
        let t = ctl.begin(date("2021-12-01"), date("2022-01-01")).unwrap();
        assert_eq!(t.direction, Direction::Right);
    }

    #[test]
    fn test_second_request_is_dropped() {
        let (mut ctl, timers) = controller();
        let first = ctl.begin(date("2021-11-01"), date("2021-12-01")).unwrap();
        assert!(ctl.begin(date("2021-11-01"), date("2022-01-01")).is_none());
        assert_eq!(ctl.pending().map(|t| t.id), Some(first.id));
        assert_eq!(timers.armed().len(), 1);
    }

    #[test]
    fn test_same_month_is_not_a_transition() {
        let (mut ctl, timers) = controller();
        assert!(ctl.begin(date("2021-11-01"), date("2021-11-30")).is_none());
        assert!(!ctl.is_transitioning());
        assert!(timers.armed().is_empty());
    }

    #[test]
    fn test_animation_then_deadline_settles_once() {
        let (mut ctl, timers) = controller();
        let t = ctl.begin(date("2021-11-01"), date("2021-12-01")).unwrap();

        assert_eq!(ctl.animation_finished(t.id), Some(date("2021-12-01")));
        assert_eq!(ctl.deadline_elapsed(t.id), None);
        assert!(!ctl.is_transitioning());
        assert!(!timers.is_armed(t.id));
        assert_eq!(timers.take_cancelled(), vec![t.id]);
    }

    #[test]
    fn test_deadline_then_animation_settles_once() {
        let (mut ctl, _timers) = controller();
        let t = ctl.begin(date("2021-11-01"), date("2021-10-01")).unwrap();

        assert_eq!(ctl.deadline_elapsed(t.id), Some(date("2021-10-01")));
        assert_eq!(ctl.animation_finished(t.id), None);
        assert!(!ctl.is_transitioning());
    }

    #[test]
    fn test_stale_signal_does_not_settle_newer_transition() {
        let (mut ctl, _timers) = controller();
        let first = ctl.begin(date("2021-11-01"), date("2021-12-01")).unwrap();
        ctl.animation_finished(first.id);
        let second = ctl.begin(date("2021-12-01"), date("2022-01-01")).unwrap();

        assert_eq!(ctl.deadline_elapsed(first.id), None);
        assert!(ctl.is_transitioning());
        assert_eq!(ctl.deadline_elapsed(second.id), Some(date("2022-01-01")));
    }

    #[test]
    fn test_cancel_disarms_without_settling() {
        let (mut ctl, timers) = controller();
        let t = ctl.begin(date("2021-11-01"), date("2021-12-01")).unwrap();
        ctl.cancel();
        assert!(!ctl.is_transitioning());
        assert!(!timers.is_armed(t.id));
        assert_eq!(ctl.deadline_elapsed(t.id), None);
    }

    #[test]
    fn test_drop_disarms_pending_deadline() {
        let (mut ctl, timers) = controller();
        let t = ctl.begin(date("2021-11-01"), date("2021-12-01")).unwrap();
        drop(ctl);
        assert!(!timers.is_armed(t.id));
    }
}
