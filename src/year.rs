//! Year selector: bounded list of years with a keyboard highlight.

use serde::Serialize;

/// Keyboard moves inside the year list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearKey {
    Up,
    Down,
    Confirm,
}

/// Years between `min_year` and `max_year`, both included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSelector {
    min_year: i32,
    max_year: i32,
    selected: i32,
    highlighted: i32,
}

impl YearSelector {
    /// Create a selector. Inverted limits are swapped and `selected_year` is
    /// clamped into them.
    #[must_use]
    pub fn new(min_year: i32, max_year: i32, selected_year: i32) -> Self {
        let (min_year, max_year) = if max_year < min_year {
            (max_year, min_year)
        } else {
            (min_year, max_year)
        };
        let selected = selected_year.clamp(min_year, max_year);
        Self {
            min_year,
            max_year,
            selected,
            highlighted: selected,
        }
    }

    /// Every year in range, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        (self.min_year..=self.max_year).collect()
    }

    #[must_use]
    pub const fn selected(&self) -> i32 {
        self.selected
    }

    #[must_use]
    pub const fn highlighted(&self) -> i32 {
        self.highlighted
    }

    #[must_use]
    pub const fn is_selected(&self, year: i32) -> bool {
        year == self.selected
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.min_year <= year && year <= self.max_year
    }

    /// Move the highlight one year back, stopping at `min_year`.
    pub fn highlight_previous(&mut self) -> i32 {
        self.highlighted = (self.highlighted - 1).max(self.min_year);
        self.highlighted
    }

    /// Move the highlight one year forward, stopping at `max_year`.
    pub fn highlight_next(&mut self) -> i32 {
        self.highlighted = (self.highlighted + 1).min(self.max_year);
        self.highlighted
    }

    /// Commit the highlighted year.
    pub fn confirm(&mut self) -> i32 {
        self.selected = self.highlighted;
        self.selected
    }

    /// Commit `year` directly (a click on the list), clamped into range.
    pub fn pick(&mut self, year: i32) -> i32 {
        self.highlighted = year.clamp(self.min_year, self.max_year);
        self.confirm()
    }

    /// Apply a key; returns the committed year on `Confirm`.
    pub fn handle_key(&mut self, key: YearKey) -> Option<i32> {
        match key {
            YearKey::Up => {
                self.highlight_previous();
                None
            }
            YearKey::Down => {
                self.highlight_next();
                None
            }
            YearKey::Confirm => Some(self.confirm()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_are_inclusive() {
        let selector = YearSelector::new(2020, 2022, 2021);
        assert_eq!(selector.years(), vec![2020, 2021, 2022]);
        assert!(selector.is_selected(2021));
        assert!(!selector.is_selected(2020));
        assert!(!selector.contains(2019));
        assert!(!selector.contains(2023));
    }

    #[test]
    fn test_highlight_is_clamped() {
        let mut selector = YearSelector::new(2020, 2022, 2021);
        assert_eq!(selector.handle_key(YearKey::Up), None);
        assert_eq!(selector.highlighted(), 2020);
        selector.handle_key(YearKey::Up);
        assert_eq!(selector.highlighted(), 2020);
        selector.handle_key(YearKey::Down);
        selector.handle_key(YearKey::Down);
        selector.handle_key(YearKey::Down);
        assert_eq!(selector.highlighted(), 2022);
        // Highlight alone does not change the selection
        assert_eq!(selector.selected(), 2021);
        assert_eq!(selector.handle_key(YearKey::Confirm), Some(2022));
        assert_eq!(selector.selected(), 2022);
    }

    #[test]
    fn test_new_normalizes_input() {
        let selector = YearSelector::new(2022, 2020, 1999);
        assert_eq!(selector.years(), vec![2020, 2021, 2022]);
        assert_eq!(selector.selected(), 2020);
    }

    #[test]
    fn test_pick_clamps() {
        let mut selector = YearSelector::new(2020, 2022, 2021);
        assert_eq!(selector.pick(2030), 2022);
        assert_eq!(selector.pick(2020), 2020);
    }
}
