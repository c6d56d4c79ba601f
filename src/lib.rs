//! School Locator: a small registry of schools ranked by great-circle
//! distance from a query point.

pub mod error;
pub mod geo;
pub mod registry;
pub mod school;
pub mod server;
pub mod store;

pub use error::{RegistryError, StoreError, ValidationError};
pub use geo::{haversine_km, Coordinates};
pub use registry::Registry;
pub use school::{RankedSchool, School, SchoolDraft};
