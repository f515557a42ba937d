use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::{DEFAULT_CENTER, DEFAULT_ZOOM, GEOLOCATION_TIMEOUT_MS, LOCATED_ZOOM, POSITION_NOTICE};
use crate::error::GeolocationError;
use crate::map::{LatLng, MapView, TileLayer, ViewOrigin};

/// Single current-position query.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<LatLng, GeolocationError>;
}

/// Whatever the browser's geolocation API answered.
#[derive(Debug, Clone)]
pub struct ReportedPosition(pub Result<LatLng, GeolocationError>);

#[async_trait]
impl Geolocator for ReportedPosition {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        self.0.clone()
    }
}

/// A home position taken from settings.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub LatLng);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

/// Builds the initial map view from a position query, falling back to a fixed view.
#[derive(Debug, Clone)]
pub struct MapInitializer {
    pub default_center: LatLng,
    pub default_zoom: u8,
    pub located_zoom: u8,
    pub timeout: Duration,
    pub tile_layer: TileLayer,
}

impl Default for MapInitializer {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER.into(),
            default_zoom: DEFAULT_ZOOM,
            located_zoom: LOCATED_ZOOM,
            timeout: Duration::from_millis(GEOLOCATION_TIMEOUT_MS),
            tile_layer: TileLayer::default(),
        }
    }
}

impl MapInitializer {
    /// Queries `geolocator` under the timeout, rejecting out-of-range answers.
    pub async fn query_position(&self, geolocator: &dyn Geolocator) -> Result<LatLng, GeolocationError> {
        let coords = tokio::time::timeout(self.timeout, geolocator.current_position())
            .await
            .unwrap_or(Err(GeolocationError::TimedOut))?;

        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(GeolocationError::InvalidPosition {
                lat: coords.lat,
                lng: coords.lng,
            })
        }
    }

    /// Always yields a usable map with an empty marker layer.
    pub async fn initialize(&self, geolocator: &dyn Geolocator) -> MapView {
        let position = self.query_position(geolocator).await;

        match position {
            Ok(coords) => {
                info!("📍 Map centered on user position {:.4}, {:.4}", coords.lat, coords.lng);
                MapView::new(coords, self.located_zoom, ViewOrigin::Located)
                    .with_tile_layer(self.tile_layer.clone())
            }
            Err(e) => {
                warn!("{}; using default map view", e);
                MapView::new(self.default_center, self.default_zoom, ViewOrigin::Fallback)
                    .with_tile_layer(self.tile_layer.clone())
                    .with_notice(POSITION_NOTICE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapWidget;

    struct NeverAnswers;

    #[async_trait]
    impl Geolocator for NeverAnswers {
        async fn current_position(&self) -> Result<LatLng, GeolocationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn located_view_uses_position_and_zoom() {
        let view = MapInitializer::default()
            .initialize(&FixedPosition(LatLng::new(35.6, 139.6)))
            .await;

        assert_eq!(view.center(), LatLng::new(35.6, 139.6));
        assert_eq!(view.zoom(), LOCATED_ZOOM);
        assert_eq!(view.origin, ViewOrigin::Located);
        assert!(view.notice.is_none());
        assert!(view.markers().is_empty());
    }

    #[tokio::test]
    async fn failure_falls_back_with_notice() {
        let view = MapInitializer::default().initialize(&NoGeolocation).await;

        assert_eq!(view.center(), LatLng::new(52.5, 13.4));
        assert_eq!(view.zoom(), DEFAULT_ZOOM);
        assert_eq!(view.origin, ViewOrigin::Fallback);
        assert_eq!(view.notice.as_deref(), Some(POSITION_NOTICE));
    }

    #[tokio::test]
    async fn reported_denial_falls_back() {
        let reported = ReportedPosition(Err(GeolocationError::Denied("User denied".into())));
        let view = MapInitializer::default().initialize(&reported).await;

        assert_eq!(view.origin, ViewOrigin::Fallback);
    }

    #[tokio::test]
    async fn timeout_falls_back() {
        let initializer = MapInitializer {
            timeout: Duration::from_millis(20),
            ..MapInitializer::default()
        };
        let view = initializer.initialize(&NeverAnswers).await;

        assert_eq!(view.origin, ViewOrigin::Fallback);
        assert_eq!(view.center(), initializer.default_center);
    }

    #[tokio::test]
    async fn out_of_range_position_falls_back() {
        let reported = ReportedPosition(Ok(LatLng::new(500.0, 0.0)));
        let initializer = MapInitializer::default();

        assert_eq!(
            initializer.query_position(&reported).await,
            Err(GeolocationError::InvalidPosition { lat: 500.0, lng: 0.0 })
        );
        let view = initializer.initialize(&reported).await;
        assert_eq!(view.origin, ViewOrigin::Fallback);
    }
}
