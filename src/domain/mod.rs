pub mod comment;
pub mod gateway;
pub mod location;
pub mod report;
pub mod session;
pub mod shared;
