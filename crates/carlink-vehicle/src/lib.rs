//! Vehicle domain service: reconciles vendor records into the shapes API
//! callers see and validates caller input before anything goes upstream.

mod percent;
mod service;

pub use percent::round_percent;
pub use service::VehicleService;
