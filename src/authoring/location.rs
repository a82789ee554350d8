use log::{debug, warn};
use thiserror::Error;

use crate::model::Coordinate;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("Geolocation is not supported on this device.")]
    Unsupported,

    #[error("Geolocation permission denied. Please allow location access to use this feature.")]
    PermissionDenied,

    #[error("Error getting location. Please try again.")]
    Unavailable,
}

/// Something that can tell where the device currently is.
pub trait DeviceLocator {
    fn current_position(&mut self) -> Result<Coordinate, LocationError>;
}

/// A locator answering from a configured `"lat,lng"` setting.
#[derive(Debug, Clone)]
pub struct StaticLocator {
    setting: Option<String>,
}

impl StaticLocator {
    pub fn new(setting: Option<String>) -> Self {
        Self { setting }
    }
}

impl DeviceLocator for StaticLocator {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        let setting = self.setting.as_deref().ok_or(LocationError::Unsupported)?;
        setting.parse().map_err(|e| {
            warn!("ignoring device location '{}': {}", setting, e);
            LocationError::Unavailable
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Device,
    Map,
}

/// The single "current candidate location" slot of an authoring session.
///
/// Fed once from the device and any number of times from map clicks; the
/// latest map click always wins.
#[derive(Debug, Default, Clone)]
pub struct LocationProvider {
    candidate: Option<(Coordinate, Source)>,
    device_requested: bool,
}

impl LocationProvider {
    /// Asks the device for its position, once per session. Later calls are
    /// no-ops, and a position arriving after a map pick is dropped.
    pub fn request_device_location<L>(&mut self, locator: &mut L) -> Result<(), LocationError>
    where
        L: DeviceLocator + ?Sized,
    {
        if self.device_requested {
            return Ok(());
        }
        self.device_requested = true;

        let coordinate = locator.current_position()?;
        if matches!(self.candidate, Some((_, Source::Map))) {
            debug!("device location {} superseded by map pick", coordinate);
            return Ok(());
        }

        debug!("device location resolved to {}", coordinate);
        self.candidate = Some((coordinate, Source::Device));
        Ok(())
    }

    pub fn pick_on_map(&mut self, coordinate: Coordinate) {
        debug!("map pick at {}", coordinate);
        self.candidate = Some((coordinate, Source::Map));
    }

    pub fn candidate(&self) -> Option<&Coordinate> {
        self.candidate.as_ref().map(|(c, _)| c)
    }

    /// Centre for a map view. `None` means no map should be shown yet.
    pub fn map_center(&self) -> Option<(f64, f64)> {
        self.candidate().and_then(Coordinate::degrees)
    }

    pub fn clear(&mut self) {
        self.candidate = None;
    }
}
