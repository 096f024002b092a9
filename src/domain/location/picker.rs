use super::map::{MapOptions, MapPin, MapSurface, MarkerId, PointerEvent};
use crate::domain::shared::geo::{Bounds, Coordinates};
use tracing::debug;

pub type SelectionCallback = Box<dyn FnMut(Coordinates) + Send>;

enum Mode {
    Interactive {
        marker: MarkerId,
        on_selected: SelectionCallback,
    },
    ReadOnly {
        pins: Vec<MarkerId>,
    },
}

/// Map-backed location input in one of two modes.
///
/// Interactive pickers own a single draggable marker and report every click
/// or drag-end synchronously. Read-only pickers show fixed pins, disable all
/// pointer interaction and never report a selection.
pub struct LocationPicker<M: MapSurface> {
    map: M,
    mode: Mode,
    selected: Option<Coordinates>,
}

impl<M: MapSurface> LocationPicker<M> {
    pub fn interactive(
        mut map: M,
        options: MapOptions,
        initial: Option<Coordinates>,
        on_selected: SelectionCallback,
    ) -> Self {
        let start = initial.unwrap_or(options.center);
        map.set_camera(start, options.zoom);
        map.restrict_camera(options.max_bounds, options.min_zoom);
        map.set_interactive(true);
        let marker = map.place_marker(start, None, true);

        Self {
            map,
            mode: Mode::Interactive {
                marker,
                on_selected,
            },
            selected: initial,
        }
    }

    pub fn read_only(mut map: M, options: MapOptions, pins: &[MapPin]) -> Self {
        let center = pins.first().map(|p| p.coordinates).unwrap_or(options.center);
        map.set_camera(center, options.zoom);
        map.restrict_camera(options.max_bounds, options.min_zoom);
        map.set_interactive(false);

        let markers = pins
            .iter()
            .map(|pin| map.place_marker(pin.coordinates, Some(pin.label.clone()), false))
            .collect();

        if pins.len() > 1 {
            let points: Vec<Coordinates> = pins.iter().map(|p| p.coordinates).collect();
            if let Some(bounds) = Bounds::enclosing(&points) {
                map.fit_bounds(bounds);
            }
        }

        Self {
            map,
            mode: Mode::ReadOnly { pins: markers },
            selected: None,
        }
    }

    /// Feeds a pointer event to the picker. Returns `true` when it produced a
    /// selection.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        let Mode::Interactive {
            marker,
            on_selected,
        } = &mut self.mode
        else {
            debug!(?event, "Ignoring pointer event on read-only map");
            return false;
        };

        let (at, clicked) = match event {
            PointerEvent::MapClick(at) => (at, true),
            PointerEvent::MarkerDragEnd { marker: dragged, at } if dragged == *marker => (at, false),
            PointerEvent::MarkerDragEnd { .. } => return false,
        };

        if !at.is_valid() {
            return false;
        }
        if clicked {
            self.map.move_marker(*marker, at);
        }

        self.selected = Some(at);
        on_selected(at);
        true
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mode, Mode::ReadOnly { .. })
    }

    pub fn selected(&self) -> Option<Coordinates> {
        self.selected
    }

    pub fn pin_count(&self) -> usize {
        match &self.mode {
            Mode::Interactive { .. } => 1,
            Mode::ReadOnly { pins } => pins.len(),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn into_map(self) -> M {
        self.map
    }
}
