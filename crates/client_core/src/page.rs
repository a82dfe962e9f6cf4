//! View-model of the estimate page.
//!
//! Front-ends render these controls and write user input back into them;
//! the controllers only ever see an [`EstimatePage`].

use shared::domain::{LocationList, DEFAULT_ROOM_COUNT, LOCATION_PLACEHOLDER, ROOM_COUNT_CHOICES};

pub const BHK_GROUP: &str = "uiBHK";
pub const BATH_GROUP: &str = "uiBathrooms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSelection {
    Checked(u32),
    Unselected,
}

impl RoomSelection {
    pub fn count_or_default(self) -> u32 {
        match self {
            Self::Checked(count) => count,
            Self::Unselected => DEFAULT_ROOM_COUNT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RadioGroup {
    name: &'static str,
    choices: Vec<u32>,
    checked: Option<u32>,
}

impl RadioGroup {
    pub fn new(name: &'static str, choices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name,
            choices: choices.into_iter().collect(),
            checked: None,
        }
    }

    pub fn room_counts(name: &'static str) -> Self {
        Self::new(name, ROOM_COUNT_CHOICES)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn choices(&self) -> &[u32] {
        &self.choices
    }

    /// Checks `value` if it is one of the group's choices.
    pub fn check(&mut self, value: u32) -> bool {
        if !self.choices.contains(&value) {
            return false;
        }
        self.checked = Some(value);
        true
    }

    pub fn clear(&mut self) {
        self.checked = None;
    }

    pub fn is_checked(&self, value: u32) -> bool {
        self.checked == Some(value)
    }

    pub fn selection(&self) -> RoomSelection {
        match self.checked {
            Some(value) => RoomSelection::Checked(value),
            None => RoomSelection::Unselected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl LocationOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: LOCATION_PLACEHOLDER.to_string(),
            disabled: true,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            label: name,
            disabled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationSelect {
    options: Vec<LocationOption>,
    selected: usize,
}

impl Default for LocationSelect {
    fn default() -> Self {
        Self {
            options: vec![LocationOption::placeholder()],
            selected: 0,
        }
    }
}

impl LocationSelect {
    /// Replaces every option with the placeholder followed by `list`, and
    /// selects the placeholder.
    pub fn replace_options(&mut self, list: &LocationList) {
        self.options = std::iter::once(LocationOption::placeholder())
            .chain(list.names.iter().map(LocationOption::named))
            .collect();
        self.selected = 0;
    }

    pub fn options(&self) -> &[LocationOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&LocationOption> {
        self.options.get(self.selected)
    }

    /// Value of the selected option; empty while the placeholder is selected.
    pub fn value(&self) -> &str {
        self.selected().map_or("", |option| option.value.as_str())
    }

    /// Selects the first enabled option whose value is `value`.
    pub fn select(&mut self, value: &str) -> bool {
        match self
            .options
            .iter()
            .position(|option| !option.disabled && option.value == value)
        {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceOutput {
    text: String,
}

impl PriceOutput {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub struct EstimatePage {
    pub square_footage: String,
    pub bhk: RadioGroup,
    pub bath: RadioGroup,
    pub locations: LocationSelect,
    pub price: PriceOutput,
    alert: Option<String>,
}

impl Default for EstimatePage {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatePage {
    pub fn new() -> Self {
        Self {
            square_footage: String::new(),
            bhk: RadioGroup::room_counts(BHK_GROUP),
            bath: RadioGroup::room_counts(BATH_GROUP),
            locations: LocationSelect::default(),
            price: PriceOutput::default(),
            alert: None,
        }
    }

    pub fn bhk_count(&self) -> u32 {
        self.bhk.selection().count_or_default()
    }

    pub fn bath_count(&self) -> u32 {
        self.bath.selection().count_or_default()
    }

    /// Raises a blocking alert; a newer alert replaces one not yet dismissed.
    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_groups_read_as_two() {
        let page = EstimatePage::new();
        assert_eq!(page.bhk.selection(), RoomSelection::Unselected);
        assert_eq!(page.bhk_count(), 2);
        assert_eq!(page.bath_count(), 2);
    }

    #[test]
    fn checked_value_is_read_back() {
        let mut page = EstimatePage::new();
        assert!(page.bhk.check(4));
        assert!(page.bath.check(1));
        assert_eq!(page.bhk_count(), 4);
        assert_eq!(page.bath_count(), 1);

        page.bhk.clear();
        assert_eq!(page.bhk_count(), 2);
    }

    #[test]
    fn values_outside_choices_are_not_checked() {
        let mut group = RadioGroup::room_counts(BATH_GROUP);
        assert!(!group.check(9));
        assert_eq!(group.selection(), RoomSelection::Unselected);
        assert_eq!(group.name(), "uiBathrooms");
    }

    #[test]
    fn replacing_options_prepends_disabled_placeholder() {
        let mut select = LocationSelect::default();
        select.replace_options(&LocationList::from_server(vec!["A".into(), "B".into()]));

        let labels: Vec<_> = select.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Select a location", "A", "B"]);
        assert!(select.options()[0].disabled);
        assert_eq!(select.value(), "");
    }

    #[test]
    fn placeholder_cannot_be_selected() {
        let mut select = LocationSelect::default();
        select.replace_options(&LocationList::fallback());
        assert!(!select.select(""));
        assert!(select.select("Whitefield"));
        assert_eq!(select.value(), "Whitefield");

        select.replace_options(&LocationList::fallback());
        assert_eq!(select.value(), "", "reload resets the selection");
    }

    #[test]
    fn alert_is_taken_once() {
        let mut page = EstimatePage::new();
        page.raise_alert("first");
        page.raise_alert("second");
        assert_eq!(page.take_alert().as_deref(), Some("second"));
        assert_eq!(page.take_alert(), None);
    }
}
