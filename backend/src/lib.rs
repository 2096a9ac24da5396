//! Parking lot backend library.
//!
//! Layout follows a hexagonal split: [`domain`] holds the rules and ports,
//! [`inbound`] adapts HTTP onto the driving ports, and [`outbound`] provides
//! storage adapters for the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
pub use settings::ParkingSettings;
