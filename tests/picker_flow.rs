//! End-to-end picker scenarios through the public API.

use std::sync::{Arc, Mutex};

use calendar_engine::calendar::{
    DatePicker, Handled, KeyCommand, PickerEvent, PickerOptions, RangeDatePicker,
    SingleDatePicker,
};
use calendar_engine::transition::ManualScheduler;
use calendar_engine::{CalendarDate, DateRange, PickerDriver, PickerResult, Selection};

fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

fn single(options: &PickerOptions) -> SingleDatePicker {
    SingleDatePicker::new(options, Box::new(ManualScheduler::new()))
}

fn range(options: &PickerOptions) -> RangeDatePicker {
    RangeDatePicker::new(options, Box::new(ManualScheduler::new()))
}

#[test]
fn clamped_initial_day_then_nine_days_right() {
    let options = PickerOptions::single(date("2021-10-02"))
        .with_bounds(date("2021-11-01"), date("2021-11-30"));
    let mut picker = single(&options);
    assert_eq!(picker.selection().selected_range().start(), date("2021-11-01"));

    for _ in 0..9 {
        picker.handle(PickerEvent::Key(KeyCommand::Right));
    }
    picker.handle(PickerEvent::Confirm);
    assert_eq!(
        picker.outcome(),
        Some(PickerResult::Single {
            date: date("2021-11-10")
        })
    );
}

#[test]
fn range_clicks_in_either_order() {
    let options = PickerOptions::range(date("2021-12-20"), date("2022-01-20"));

    let mut forward = range(&options);
    forward.handle(PickerEvent::DayClicked(date("2022-01-01")));
    forward.handle(PickerEvent::DayClicked(date("2022-01-05")));
    assert_eq!(
        forward.selection().selected_range(),
        DateRange::new(date("2022-01-01"), date("2022-01-05"))
    );

    let mut backward = range(&options);
    backward.handle(PickerEvent::DayClicked(date("2022-01-15")));
    backward.handle(PickerEvent::DayClicked(date("2022-01-08")));
    assert_eq!(
        backward.selection().selected_range(),
        DateRange::new(date("2022-01-08"), date("2022-01-15"))
    );
}

#[test]
fn max_selectable_days_limits_second_click() {
    let options = PickerOptions::range(date("2022-01-01"), date("2022-01-05"))
        .with_max_selectable_days(10);
    let mut picker = range(&options);
    picker.handle(PickerEvent::DayClicked(date("2021-12-31")));

    let [left, right] = picker.day_views();
    let selectable: Vec<CalendarDate> = left
        .iter()
        .chain(right.iter())
        .filter(|v| v.selectable)
        .map(|v| v.date)
        .collect();
    assert_eq!(selectable.first(), Some(&date("2021-12-22")));
    assert_eq!(selectable.last(), Some(&date("2022-01-09")));
    assert_eq!(selectable.len(), 19);
}

#[test]
fn prev_month_disabled_when_min_in_displayed_month() {
    let options = PickerOptions::single(date("2021-11-20"))
        .with_bounds(date("2021-11-05"), date("2022-06-30"));
    let mut picker = single(&options);
    let nav = picker.navigation();
    assert!(!nav.can_go_prev);
    assert!(nav.can_go_next);
    assert_eq!(picker.handle(PickerEvent::PrevMonth), Handled::Ignored);
}

#[test]
fn settlement_is_idempotent_in_any_order() {
    for animation_first in [true, false] {
        let timers = ManualScheduler::new();
        let options = PickerOptions::single(date("2021-11-09"));
        let mut picker = SingleDatePicker::new(&options, Box::new(timers.clone()));

        picker.handle(PickerEvent::NextMonth);
        let id = picker.transition().unwrap().id;
        let (first, second) = if animation_first {
            (PickerEvent::AnimationEnd(id), PickerEvent::TransitionDeadline(id))
        } else {
            (PickerEvent::TransitionDeadline(id), PickerEvent::AnimationEnd(id))
        };

        assert_eq!(picker.handle(first), Handled::Applied);
        assert_eq!(picker.handle(second), Handled::Ignored);
        assert_eq!(picker.current_month(), date("2021-12-01"));
        assert!(picker.transition().is_none());
        assert!(timers.armed().is_empty());
    }
}

#[test]
fn selection_invariants_hold_over_random_walk() {
    let bounds = (date("2021-11-05"), date("2022-02-20"));
    let options = PickerOptions::range(date("2021-12-01"), date("2021-12-03"))
        .with_bounds(bounds.0, bounds.1)
        .with_max_selectable_days(12);
    let mut picker = range(&options);
    let seen: Arc<Mutex<Vec<Selection>>> = Arc::default();
    let sink = Arc::clone(&seen);
    picker.set_on_change(Box::new(move |s| sink.lock().unwrap().push(s.clone())));

    // Deterministic pseudo-random clicks across the displayed panels
    let mut seed: i64 = 17;
    for _ in 0..200 {
        seed = (seed * 1_103_515_245 + 12_345) % 2_147_483_648;
        let offset = seed % 70 - 35;
        picker.handle(PickerEvent::DayClicked(date("2021-12-15").add_days(offset)));
    }

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    for selection in seen.iter() {
        let range = selection.selected_range();
        assert!(range.start() <= range.end());
        assert!(range.start() >= bounds.0 && range.end() <= bounds.1);
        assert!(range.start().days_until(range.end()).get() <= 11);
    }
}

#[tokio::test(start_paused = true)]
async fn driver_round_trip() {
    let options = PickerOptions::range(date("2022-01-01"), date("2022-01-05"));
    let (driver, handle) = PickerDriver::new(&options);
    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&results);
    let task = tokio::spawn(driver.on_result(move |r| sink.lock().unwrap().push(r)).run());

    handle.click(date("2022-01-15")).unwrap();
    handle.click(date("2022-01-08")).unwrap();
    handle.confirm().unwrap();

    let expected = Some(PickerResult::Range {
        start: date("2022-01-08"),
        end: date("2022-01-15"),
    });
    assert_eq!(task.await.unwrap(), expected);
    assert_eq!(*results.lock().unwrap(), vec![expected]);
}
