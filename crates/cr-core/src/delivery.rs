//! Delivery request record.

use std::fmt;

use crate::Location;

/// One item to drop off at one location.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryRequest {
    pub item: String,
    pub location: Location,
}

impl DeliveryRequest {
    pub fn new(item: impl Into<String>, location: Location) -> Self {
        Self { item: item.into(), location }
    }
}

impl fmt::Display for DeliveryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.item, self.location)
    }
}
