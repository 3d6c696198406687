//! Scripted picker sessions.
//!
//! A script is one command per line; blank lines and `#` comments are
//! skipped:
//!
//! ```text
//! click 2022-01-01    # day click
//! key right           # ArrowRight, PageUp, Enter, Escape, ...
//! prev | next         # month navigation
//! years               # toggle the year list
//! year 2020           # click a year
//! animation-end       # renderer finished the transition in flight
//! deadline            # fallback timers fire
//! show                # draw the picker
//! ok | cancel         # close the picker
//! ```
//!
//! Sessions run on a [`ManualScheduler`], so transitions only settle when the
//! script says so and output is deterministic.

use std::str::FromStr;

use tracing::debug;

use crate::calendar::{
    DatePicker, Handled, KeyCommand, PickerEvent, PickerOptions, RangeDatePicker,
    SingleDatePicker,
};
use crate::error::{Error, Result};
use crate::selection::{PickerResult, SelectionMode};
use crate::transition::ManualScheduler;
use crate::types::CalendarDate;

/// One script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Forward an event unchanged
    Event(PickerEvent),
    /// Animation-end signal for whatever transition is in flight
    AnimationEnd,
    /// Fire every armed fallback timer
    Deadline,
    Show,
}

impl FromStr for ScriptCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(Error::other(format!("too many arguments for '{verb}'")));
        }

        let needs_arg = |what: &str| {
            arg.ok_or_else(|| Error::other(format!("'{verb}' needs {what}")))
        };
        let no_arg = |command: Self| match arg {
            Some(extra) => Err(Error::other(format!("'{verb}' takes no argument, got '{extra}'"))),
            None => Ok(command),
        };

        match verb.as_str() {
            "click" => {
                let day: CalendarDate = needs_arg("a date")?.parse()?;
                Ok(Self::Event(PickerEvent::DayClicked(day)))
            }
            "key" => {
                let key: KeyCommand = needs_arg("a key name")?.parse()?;
                Ok(Self::Event(PickerEvent::Key(key)))
            }
            "year" => {
                let raw = needs_arg("a year")?;
                let year = raw
                    .parse()
                    .map_err(|_| Error::other(format!("invalid year '{raw}'")))?;
                Ok(Self::Event(PickerEvent::YearPicked(year)))
            }
            "prev" => no_arg(Self::Event(PickerEvent::PrevMonth)),
            "next" => no_arg(Self::Event(PickerEvent::NextMonth)),
            "years" => no_arg(Self::Event(PickerEvent::ToggleYearSelector)),
            "ok" | "confirm" => no_arg(Self::Event(PickerEvent::Confirm)),
            "cancel" => no_arg(Self::Event(PickerEvent::Cancel)),
            "animation-end" => no_arg(Self::AnimationEnd),
            "deadline" => no_arg(Self::Deadline),
            "show" => no_arg(Self::Show),
            _ => Err(Error::other(format!("unknown command '{verb}'"))),
        }
    }
}

/// Parse a whole script into `(line number, command)` pairs.
pub fn parse_script(text: &str) -> Result<Vec<(usize, ScriptCommand)>> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then_some((index + 1, line))
        })
        .map(|(number, line)| {
            line.parse::<ScriptCommand>()
                .map(|command| (number, command))
                .map_err(|e| Error::script(number, e.to_string()))
        })
        .collect()
}

/// A picker driven by script commands.
pub struct ScriptSession {
    picker: Box<dyn DatePicker>,
    timers: ManualScheduler,
}

impl ScriptSession {
    /// Build and open a picker for `options`.
    #[must_use]
    pub fn new(options: &PickerOptions) -> Self {
        let timers = ManualScheduler::new();
        let scheduler = Box::new(timers.clone());
        let mut picker: Box<dyn DatePicker> = match options.mode {
            SelectionMode::Single => Box::new(SingleDatePicker::new(options, scheduler)),
            SelectionMode::Range => Box::new(RangeDatePicker::new(options, scheduler)),
        };
        picker.open();
        Self { picker, timers }
    }

    #[must_use]
    pub fn picker(&self) -> &dyn DatePicker {
        self.picker.as_ref()
    }

    /// Apply one command; `show` is passed to `on_show`.
    pub fn apply(
        &mut self,
        command: ScriptCommand,
        on_show: &mut dyn FnMut(&dyn DatePicker),
    ) -> Handled {
        match command {
            ScriptCommand::Event(event) => self.picker.handle(event),
            ScriptCommand::AnimationEnd => match self.picker.transition() {
                Some(t) => self.picker.handle(PickerEvent::AnimationEnd(t.id)),
                None => Handled::Ignored,
            },
            ScriptCommand::Deadline => {
                let fired = self.timers.expire_all();
                fired.into_iter().fold(Handled::Ignored, |acc, id| {
                    match self.picker.handle(PickerEvent::TransitionDeadline(id)) {
                        Handled::Ignored => acc,
                        other => other,
                    }
                })
            }
            ScriptCommand::Show => {
                on_show(self.picker.as_ref());
                Handled::Applied
            }
        }
    }

    /// Run `commands` until the picker closes or the script ends.
    ///
    /// A script that ends with the picker still open counts as cancelled.
    pub fn run(
        &mut self,
        commands: &[(usize, ScriptCommand)],
        mut on_show: impl FnMut(&dyn DatePicker),
    ) -> Option<PickerResult> {
        for (line, command) in commands {
            let handled = self.apply(*command, &mut on_show);
            debug!("Line {}: {:?} -> {:?}", line, command, handled);
            for id in self.timers.take_cancelled() {
                debug!("Line {}: deadline {} disarmed", line, id);
            }
            if handled == Handled::Closed {
                break;
            }
        }
        if !self.picker.is_closed() {
            self.picker.handle(PickerEvent::Cancel);
        }
        self.picker.outcome()
    }
}
