//! Application state and the transitions that update it.

use serde::Serialize;

use crate::{geo::Coordinate, locations::Location};

/// Whether the "Cash Available" badge should be shown for `amount`.
pub fn tag_enabled(amount: f64) -> bool {
    amount > 0.0
}

/// Withdrawal amount as typed into the numeric input.
pub struct WithdrawAmount;

impl WithdrawAmount {
    /// Coerces raw input text to a number. Blank or non-numeric text is 0.
    pub fn coerce(input: &str) -> f64 {
        input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The position request settled; `None` when it failed.
    FetchCompleted(Option<Coordinate>),
    LocationsGenerated(Vec<Location>),
    AmountChanged(f64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub center: Option<Coordinate>,
    pub fetch_tried: bool,
    pub locations: Vec<Location>,
    pub withdraw_amount: f64,
    pub tag_enabled: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::FetchCompleted(center) => {
                self.fetch_tried = true;
                self.center = center;
            }
            Transition::LocationsGenerated(locations) => {
                self.locations = locations;
            }
            Transition::AmountChanged(amount) => {
                self.withdraw_amount = amount;
                self.tag_enabled = tag_enabled(amount);
            }
        }
    }

    /// Locations that currently display the cash badge.
    pub fn cash_badges(&self) -> impl Iterator<Item = &Location> {
        let enabled = self.tag_enabled;
        self.locations
            .iter()
            .filter(move |location| enabled && location.cash_available)
    }
}
