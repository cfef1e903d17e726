//! What a renderer needs to draw the list and the map.

use serde::Serialize;

use crate::{config::MapSettings, geo::Coordinate, state::AppState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: u32,
    pub label: String,
    pub distance_text: String,
    pub show_cash_badge: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinate,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub map_id: String,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub fetch_tried: bool,
    pub withdraw_amount: f64,
    pub tag_enabled: bool,
    pub entries: Vec<ListEntry>,
    /// Absent until a center is known.
    pub map: Option<MapView>,
}

impl StateView {
    pub fn from_state(state: &AppState, settings: &MapSettings) -> Self {
        let entries = state
            .locations
            .iter()
            .map(|location| ListEntry {
                id: location.id,
                label: location.label.clone(),
                distance_text: location.distance_text.clone(),
                show_cash_badge: state.tag_enabled && location.cash_available,
            })
            .collect();
        let map = state.center.map(|center| MapView {
            center,
            zoom: settings.zoom,
            map_id: settings.map_id.clone(),
            markers: state
                .locations
                .iter()
                .map(|location| Marker {
                    position: location.coord,
                    title: location.label.clone(),
                })
                .collect(),
        });
        Self {
            fetch_tried: state.fetch_tried,
            withdraw_amount: state.withdraw_amount,
            tag_enabled: state.tag_enabled,
            entries,
            map,
        }
    }
}
