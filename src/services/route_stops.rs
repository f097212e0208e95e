//! Helpers de paradas de ruta
//!
//! Normaliza la lista de paradas persistida (columna actual `stops` o la
//! antigua `stoppages`) y construye la secuencia completa
//! `[inicio, ...paradas ordenadas, fin]` que consume el motor de progreso.

use crate::models::route_template::{
    GeoPoint, RouteStop, RouteTemplate, SequencedStop, StopKind, StoredStop,
};

/// `stops` si existe y no está vacío, si no `stoppages`, si no vacío.
/// Las entradas sin `order` toman su posición en el array.
pub fn resolve_stops(stops: Option<&[StoredStop]>, legacy_stoppages: Option<&[StoredStop]>) -> Vec<RouteStop> {
    let source = match stops {
        Some(list) if !list.is_empty() => list,
        _ => legacy_stoppages.unwrap_or(&[]),
    };

    source
        .iter()
        .enumerate()
        .map(|(position, stop)| RouteStop {
            name: stop.name.clone(),
            lat: stop.lat,
            lng: stop.lng,
            order: stop.order.unwrap_or(position as i32),
        })
        .collect()
}

/// Paradas intermedias ordenadas por `order` (orden estable ante empates)
pub fn sorted_stops(route: &RouteTemplate) -> Vec<RouteStop> {
    let mut stops = route.stops.clone();
    stops.sort_by_key(|stop| stop.order);
    stops
}

/// Secuencia completa con índice de parada
pub fn full_stop_sequence(route: &RouteTemplate) -> Vec<SequencedStop> {
    let mut sequence = Vec::with_capacity(route.total_stops());
    sequence.push(endpoint(0, &route.start_point, StopKind::Start));
    for (position, stop) in sorted_stops(route).into_iter().enumerate() {
        sequence.push(SequencedStop {
            index: position as i32 + 1,
            name: stop.name,
            lat: stop.lat,
            lng: stop.lng,
            kind: StopKind::Stop,
        });
    }
    let last = sequence.len() as i32;
    sequence.push(endpoint(last, &route.end_point, StopKind::End));
    sequence
}

/// Posición de una parada por nombre dentro de la secuencia completa
pub fn position_of(route: &RouteTemplate, name: &str) -> Option<SequencedStop> {
    let wanted = name.trim();
    full_stop_sequence(route)
        .into_iter()
        .find(|stop| stop.name.eq_ignore_ascii_case(wanted))
}

fn endpoint(index: i32, point: &GeoPoint, kind: StopKind) -> SequencedStop {
    SequencedStop {
        index,
        name: point.name.clone(),
        lat: point.lat,
        lng: point.lng,
        kind,
    }
}
