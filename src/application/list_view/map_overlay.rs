use crate::domain::location::MapPin;
use crate::domain::report::Report;
use crate::domain::shared::geo::Coordinates;

/// Reports that can be placed on a map, in list order.
pub fn with_coordinates(reports: &[Report]) -> Vec<&Report> {
    reports
        .iter()
        .filter(|r| r.coordinates().is_some())
        .collect()
}

/// Center of the first locatable report, else `fallback`.
pub fn initial_center(reports: &[Report], fallback: Coordinates) -> Coordinates {
    reports
        .iter()
        .find_map(Report::coordinates)
        .unwrap_or(fallback)
}

pub fn pins(reports: &[Report]) -> Vec<MapPin> {
    reports
        .iter()
        .filter_map(|r| {
            r.coordinates().map(|coordinates| MapPin {
                coordinates,
                label: r.title().to_string(),
            })
        })
        .collect()
}
