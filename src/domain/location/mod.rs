pub mod geocoder;
pub mod map;
pub mod picker;

pub use geocoder::{Geocoder, place_name_or_empty};
pub use map::{MapOptions, MapPin, MapSurface, MarkerId, PointerEvent};
pub use picker::{LocationPicker, SelectionCallback};
