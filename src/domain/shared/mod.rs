pub mod errors;
pub mod geo;
pub mod ids;
pub mod notice;
