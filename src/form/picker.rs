use crate::domain::{Messages, OptionDefinition};

/// Option id that pairs a picker with a free-text "please specify" field.
pub const OTHER_OPTION_ID: &str = "other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub id: String,
    pub label: String,
}

impl From<&OptionDefinition> for PickerOption {
    fn from(definition: &OptionDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            label: definition.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    Unchanged,
    /// The cap is already reached; nothing was changed.
    CapacityReached,
    Unknown,
}

impl ToggleOutcome {
    pub fn changed(self) -> bool {
        matches!(self, ToggleOutcome::Selected | ToggleOutcome::Deselected)
    }
}

/// Single- or multi-select control over a fixed option list.
#[derive(Debug, Clone)]
pub struct OptionPicker {
    mode: SelectionMode,
    options: Vec<PickerOption>,
    selected: Vec<bool>,
    cap: Option<usize>,
    placeholder: Option<String>,
    is_open: bool,
    cursor: usize,
}

impl OptionPicker {
    pub fn build(options: Vec<PickerOption>, mode: SelectionMode, cap: Option<usize>) -> Self {
        let selected = vec![false; options.len()];
        Self {
            mode,
            options,
            selected,
            cap: cap.filter(|max| *max > 0),
            placeholder: None,
            is_open: false,
            cursor: 0,
        }
    }

    pub fn single(options: Vec<PickerOption>) -> Self {
        Self::build(options, SelectionMode::Single, None)
    }

    pub fn multi(options: Vec<PickerOption>, cap: Option<usize>) -> Self {
        Self::build(options, SelectionMode::Multi, cap)
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_multi(&self) -> bool {
        self.mode == SelectionMode::Multi
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    pub fn options(&self) -> &[PickerOption] {
        &self.options
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.position(id)
            .map(|index| self.selected[index])
            .unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|flag| **flag).count()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_count() == 0
    }

    /// Selected ids in option order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.selected)
            .filter_map(|(option, flag)| flag.then(|| option.id.clone()))
            .collect()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.cap
            .map(|max| self.is_multi() && self.selected_count() >= max)
            .unwrap_or(false)
    }

    pub fn toggle(&mut self, id: &str) -> ToggleOutcome {
        let Some(index) = self.position(id) else {
            return ToggleOutcome::Unknown;
        };
        match self.mode {
            SelectionMode::Single => {
                if self.selected[index] {
                    return ToggleOutcome::Unchanged;
                }
                self.selected.iter_mut().for_each(|flag| *flag = false);
                self.selected[index] = true;
                ToggleOutcome::Selected
            }
            SelectionMode::Multi => {
                if self.selected[index] {
                    self.selected[index] = false;
                    return ToggleOutcome::Deselected;
                }
                if self.is_at_capacity() {
                    return ToggleOutcome::CapacityReached;
                }
                self.selected[index] = true;
                ToggleOutcome::Selected
            }
        }
    }

    /// Selects options in order until every option or the cap is reached.
    /// Returns whether the selection changed.
    pub fn select_all(&mut self) -> bool {
        if !self.is_multi() {
            return false;
        }
        let limit = self.cap.unwrap_or(self.options.len());
        let mut changed = false;
        for index in 0..self.selected.len() {
            if self.selected_count() >= limit {
                break;
            }
            if !self.selected[index] {
                self.selected[index] = true;
                changed = true;
            }
        }
        changed
    }

    pub fn clear_all(&mut self) -> bool {
        if !self.is_multi() || self.is_empty() {
            return false;
        }
        self.selected.iter_mut().for_each(|flag| *flag = false);
        true
    }

    pub fn summary_label(&self, messages: &Messages) -> String {
        let count = self.selected_count();
        match count {
            0 => self
                .placeholder
                .clone()
                .unwrap_or_else(|| messages.placeholder.clone()),
            1 => self
                .options
                .iter()
                .zip(&self.selected)
                .find_map(|(option, flag)| flag.then(|| option.label.clone()))
                .unwrap_or_default(),
            n => messages.selected_count(n),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.is_open = open;
        if open {
            self.cursor = self
                .selected
                .iter()
                .position(|flag| *flag)
                .unwrap_or(0);
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_option(&self) -> Option<&PickerOption> {
        self.options.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as i32;
        let next = (self.cursor as i32 + delta).rem_euclid(len);
        self.cursor = next as usize;
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|option| option.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ids: &[&str]) -> Vec<PickerOption> {
        ids.iter()
            .map(|id| PickerOption {
                id: id.to_string(),
                label: id.to_uppercase(),
            })
            .collect()
    }

    #[test]
    fn single_select_replaces_and_never_clears() {
        let mut picker = OptionPicker::single(options(&["a", "b", "c"]));
        assert_eq!(picker.toggle("a"), ToggleOutcome::Selected);
        assert_eq!(picker.toggle("b"), ToggleOutcome::Selected);
        assert_eq!(picker.selected_ids(), vec!["b"]);
        assert_eq!(picker.toggle("b"), ToggleOutcome::Unchanged);
        assert_eq!(picker.selected_ids(), vec!["b"]);
        assert!(!picker.select_all());
        assert!(!picker.clear_all());
    }

    #[test]
    fn multi_select_cap_rejects_without_mutation() {
        let mut picker = OptionPicker::multi(options(&["a", "b", "c", "d", "e"]), Some(3));
        for id in ["a", "b", "c"] {
            assert_eq!(picker.toggle(id), ToggleOutcome::Selected);
        }
        assert!(picker.is_at_capacity());
        assert_eq!(picker.toggle("d"), ToggleOutcome::CapacityReached);
        assert_eq!(picker.selected_ids(), vec!["a", "b", "c"]);

        assert_eq!(picker.toggle("b"), ToggleOutcome::Deselected);
        assert!(!picker.is_at_capacity());
        assert_eq!(picker.toggle("d"), ToggleOutcome::Selected);
        assert_eq!(picker.selected_ids(), vec!["a", "c", "d"]);
    }

    #[test]
    fn select_all_respects_cap_in_option_order() {
        let mut picker = OptionPicker::multi(options(&["a", "b", "c", "d", "e"]), Some(3));
        picker.toggle("e");
        assert!(picker.select_all());
        assert_eq!(picker.selected_ids(), vec!["a", "b", "e"]);
        assert!(picker.clear_all());
        assert!(picker.is_empty());

        let mut uncapped = OptionPicker::multi(options(&["a", "b"]), None);
        assert!(uncapped.select_all());
        assert!(!uncapped.select_all());
        assert_eq!(uncapped.selected_count(), 2);
    }

    #[test]
    fn summary_label_tracks_selection_size() {
        let messages = Messages::english();
        let mut picker =
            OptionPicker::multi(options(&["a", "b", "c"]), None).with_placeholder("Choose types");
        assert_eq!(picker.summary_label(&messages), "Choose types");
        picker.toggle("b");
        assert_eq!(picker.summary_label(&messages), "B");
        picker.toggle("c");
        assert_eq!(picker.summary_label(&messages), "2 options selected");

        let single = OptionPicker::single(options(&["a"]));
        assert_eq!(single.summary_label(&messages), "Select an option");
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut picker = OptionPicker::multi(options(&["a"]), None);
        assert_eq!(picker.toggle("zzz"), ToggleOutcome::Unknown);
        assert!(picker.is_empty());
    }

    #[test]
    fn cursor_wraps_and_opening_jumps_to_selection() {
        let mut picker = OptionPicker::single(options(&["a", "b", "c"]));
        picker.move_cursor(-1);
        assert_eq!(picker.cursor(), 2);
        picker.move_cursor(1);
        assert_eq!(picker.cursor(), 0);
        picker.toggle("b");
        picker.set_open(true);
        assert!(picker.is_open());
        assert_eq!(picker.cursor_option().map(|o| o.id.as_str()), Some("b"));
    }
}
