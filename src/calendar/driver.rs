//! Async driver owning one picker.
//!
//! Host input and transition deadlines arrive on the same channel, so the
//! picker is only ever touched from the driver task. After every event the
//! driver publishes a [`PickerSnapshot`] the host reads through its handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use super::{
    DatePicker, Handled, KeyCommand, Navigation, PanelView, PickerEvent, PickerOptions,
    RangeDatePicker, SingleDatePicker,
};
use crate::error::{Error, Result};
use crate::selection::{PickerResult, Selection, SelectionMode};
use crate::transition::{MonthTransition, TokioScheduler};
use crate::types::CalendarDate;

/// How often the loop rechecks the stop flag when no event arrives.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What a host needs to draw the picker and bind its controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerSnapshot {
    pub selection: Selection,
    pub navigation: Navigation,
    pub panels: Vec<PanelView>,
    /// Transition in flight; its id is what `AnimationEnd` must carry
    pub transition: Option<MonthTransition>,
    pub closed: bool,
}

impl PickerSnapshot {
    fn of(picker: &dyn DatePicker) -> Self {
        Self {
            selection: picker.selection().clone(),
            navigation: picker.navigation(),
            panels: picker.panels(),
            transition: picker.transition(),
            closed: picker.is_closed(),
        }
    }
}

/// Cloneable sender side of a running picker.
#[derive(Debug, Clone)]
pub struct PickerHandle {
    tx: mpsc::UnboundedSender<PickerEvent>,
    snapshots: watch::Receiver<PickerSnapshot>,
    running: Arc<AtomicBool>,
}

impl PickerHandle {
    /// Queue an event for the picker.
    pub fn send(&self, event: PickerEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|e| Error::other(format!("picker is closed, dropped {:?}", e.0)))
    }

    pub fn click(&self, day: CalendarDate) -> Result<()> {
        self.send(PickerEvent::DayClicked(day))
    }

    pub fn key(&self, key: KeyCommand) -> Result<()> {
        self.send(PickerEvent::Key(key))
    }

    pub fn confirm(&self) -> Result<()> {
        self.send(PickerEvent::Confirm)
    }

    pub fn cancel(&self) -> Result<()> {
        self.send(PickerEvent::Cancel)
    }

    /// Report the end of the animation for the transition last published.
    ///
    /// Returns `false` when no transition is in flight.
    pub fn animation_end(&self) -> Result<bool> {
        match self.snapshot().transition {
            Some(transition) => {
                self.send(PickerEvent::AnimationEnd(transition.id))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Latest state published by the driver.
    #[must_use]
    pub fn snapshot(&self) -> PickerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified each time the driver publishes a new snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<PickerSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the driver without delivering a result.
    ///
    /// Only sets an atomic flag; the loop notices it within one poll interval.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.tx.is_closed()
    }
}

/// Runs a picker until it is confirmed, cancelled, stopped, or every handle
/// is dropped.
pub struct PickerDriver {
    picker: Box<dyn DatePicker>,
    rx: mpsc::UnboundedReceiver<PickerEvent>,
    snapshots: watch::Sender<PickerSnapshot>,
    running: Arc<AtomicBool>,
}

impl PickerDriver {
    /// Build the picker for `options.mode` and the handle feeding it.
    ///
    /// Fallback deadlines are armed as tokio tasks, so `run` must be awaited
    /// inside a tokio runtime.
    #[must_use]
    pub fn new(options: &PickerOptions) -> (Self, PickerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let weak = tx.downgrade();
        let scheduler = Box::new(TokioScheduler::new(move |id| match weak.upgrade() {
            Some(tx) => {
                let _ = tx.send(PickerEvent::TransitionDeadline(id));
            }
            None => debug!("Deadline {} fired after the picker went away", id),
        }));

        let picker: Box<dyn DatePicker> = match options.mode {
            SelectionMode::Single => Box::new(SingleDatePicker::new(options, scheduler)),
            SelectionMode::Range => Box::new(RangeDatePicker::new(options, scheduler)),
        };

        let (snapshots, snapshot_rx) = watch::channel(PickerSnapshot::of(picker.as_ref()));
        let running = Arc::new(AtomicBool::new(true));
        let handle = PickerHandle {
            tx,
            snapshots: snapshot_rx,
            running: Arc::clone(&running),
        };
        (
            Self {
                picker,
                rx,
                snapshots,
                running,
            },
            handle,
        )
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(&Selection) + Send + 'static) -> Self {
        self.picker.set_on_change(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_result(
        mut self,
        callback: impl FnMut(Option<PickerResult>) + Send + 'static,
    ) -> Self {
        self.picker.set_on_result(Box::new(callback));
        self
    }

    /// Open the picker and process events until it closes.
    ///
    /// Returns the confirmed value, or `None` when cancelled or stopped.
    pub async fn run(mut self) -> Option<PickerResult> {
        info!("Starting picker driver...");
        self.picker.open();
        self.publish();

        loop {
            if !self.running.load(Ordering::SeqCst) {
                info!("Picker stopped");
                self.picker.close();
                break;
            }

            tokio::select! {
                event = self.rx.recv() => match event {
                    Some(event) => {
                        let handled = self.picker.handle(event);
                        if handled != Handled::Ignored {
                            self.publish();
                        }
                        if handled == Handled::Closed {
                            break;
                        }
                    }
                    None => {
                        debug!("All picker handles dropped, cancelling");
                        self.picker.handle(PickerEvent::Cancel);
                        break;
                    }
                },
                () = tokio::time::sleep(POLL_INTERVAL) => {
                    // Periodic stop check
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        self.publish();
        self.picker.outcome()
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(PickerSnapshot::of(self.picker.as_ref()));
    }
}
