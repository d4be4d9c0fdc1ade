//! Device location
//!
//! Resolves "where am I" to coordinates. The CLI has no GPS, so the device
//! position is either a configured home position or a one-shot network
//! lookup that the user has to allow.

pub mod ip;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use std::future::Future;

/// Trait for device location sources
pub trait LocationProvider: Send + Sync {
    /// Read the current position once
    ///
    /// Fails with `PermissionDenied` when the lookup is not allowed and with
    /// `PositionUnavailable` when the read itself fails. Never retries.
    fn resolve_device_location(&self) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// A position fixed in configuration
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationProvider for FixedLocation {
    async fn resolve_device_location(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// The location source selected by configuration
#[derive(Debug)]
pub enum DeviceLocation {
    Fixed(FixedLocation),
    Network(ip::IpLocator),
}

impl LocationProvider for DeviceLocation {
    async fn resolve_device_location(&self) -> Result<Coordinates> {
        match self {
            DeviceLocation::Fixed(fixed) => fixed.resolve_device_location().await,
            DeviceLocation::Network(locator) => locator.resolve_device_location().await,
        }
    }
}

/// Pick the configured home position if there is one, else a network lookup
pub fn device_location_provider(config: &Config) -> Result<DeviceLocation> {
    match config.home()? {
        Some(home) => Ok(DeviceLocation::Fixed(FixedLocation(home))),
        None => Ok(DeviceLocation::Network(ip::IpLocator::new(
            config.location.allow_network_lookup,
        )?)),
    }
}
