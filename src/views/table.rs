//! Tabular pick listing.

use crate::{
    core::store::{StoreSnapshot, display_order},
    pick::{Pick, PickRow},
};

/// Every pick as a row, sorted by UWI then MD (undefined last) then name.
pub fn render_table(picks: &StoreSnapshot) -> Vec<PickRow> {
    let mut sorted: Vec<Pick> = picks.picks.clone();
    sorted.sort_by(display_order);
    sorted.into_iter().map(PickRow::from).collect()
}
