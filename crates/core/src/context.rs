use crate::models::RetrievedPlaces;

/// Renders one `<interest>: <place>, <place>` line per interest, in retrieval order.
pub fn render_context(places: &RetrievedPlaces) -> String {
    places
        .iter()
        .map(|entry| format!("{}: {}", entry.interest, entry.places.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
