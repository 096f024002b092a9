pub mod gateway;
pub mod geocoding;
pub mod notifications;
pub mod session;
