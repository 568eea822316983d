use crate::models::{SearchRequest, DEFAULT_DISCOUNT_TYPES};
use chrono::{Days, Local, NaiveDate};

pub const DEFAULT_LOCATION: &str = "New York, NY";
pub const DEFAULT_GUESTS: u32 = 2;
pub const MIN_GUESTS: u32 = 1;
pub const MAX_GUESTS: u32 = 10;

const CHECK_IN_OFFSET_DAYS: u64 = 30;
const CHECK_OUT_OFFSET_DAYS: u64 = 32;

/// Editable search parameters, prefilled with a stay one month out
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    location: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: u32,
    discount_types: Vec<String>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::with_today(Local::now().date_naive())
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the default form as if today were `today`
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            check_in: today + Days::new(CHECK_IN_OFFSET_DAYS),
            check_out: today + Days::new(CHECK_OUT_OFFSET_DAYS),
            guests: DEFAULT_GUESTS,
            discount_types: DEFAULT_DISCOUNT_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn discount_types(&self) -> &[String] {
        &self.discount_types
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn set_check_in(&mut self, date: NaiveDate) {
        self.check_in = date;
    }

    pub fn set_check_out(&mut self, date: NaiveDate) {
        self.check_out = date;
    }

    /// Guest count is held to the range the input offers (1 to 10)
    pub fn set_guests(&mut self, guests: u32) {
        self.guests = guests.clamp(MIN_GUESTS, MAX_GUESTS);
    }

    pub fn is_selected(&self, discount_type: &str) -> bool {
        self.discount_types.iter().any(|t| t == discount_type)
    }

    /// Select the discount type if it is not selected, otherwise drop it
    pub fn toggle_discount_type(&mut self, discount_type: &str) {
        if self.is_selected(discount_type) {
            self.discount_types.retain(|t| t != discount_type);
        } else {
            self.discount_types.push(discount_type.to_string());
        }
    }

    /// Replace the whole selection, ignoring repeated entries
    pub fn set_discount_types<I, S>(&mut self, discount_types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.discount_types.clear();
        for discount_type in discount_types {
            let discount_type = discount_type.into();
            if !self.is_selected(&discount_type) {
                self.discount_types.push(discount_type);
            }
        }
    }

    /// Hand the current values to `on_search` in form order
    pub fn submit<F, R>(&self, on_search: F) -> R
    where
        F: FnOnce(&str, NaiveDate, NaiveDate, u32, &[String]) -> R,
    {
        on_search(
            &self.location,
            self.check_in,
            self.check_out,
            self.guests,
            &self.discount_types,
        )
    }

    pub fn to_request(&self) -> SearchRequest {
        self.submit(|location, check_in, check_out, guests, discount_types| SearchRequest {
            location: location.to_string(),
            check_in,
            check_out,
            guests,
            discount_types: discount_types.to_vec(),
        })
    }
}
