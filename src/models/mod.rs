//! Data models

pub mod inspection;
pub mod vehicle;

pub use inspection::InspectionRecord;
pub use vehicle::VehicleRecord;
