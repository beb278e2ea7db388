//! Location-change orchestration
//!
//! [`Dashboard`] is what the surrounding shell talks to. Every location
//! change fetches current conditions, forecast, air quality and UV index for
//! one coordinate pair, and renders all eight primary panels only when every
//! fetch succeeded. A detached task then fetches and renders the historical
//! chart on its own.
//!
//! Each call takes a new generation number. Results of a call that is no
//! longer the latest one are dropped, so a slow answer for an old location
//! never overwrites a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

use crate::api::WeatherSource;
use crate::config::DashboardConfig;
use crate::history::{DEFAULT_HISTORY_DAYS, fetch_history};
use crate::location_resolver::{LocationParser, LocationResolver, PositionSource};
use crate::models::{AirQualityIndex, Coordinates, CurrentConditions, ForecastSeries, UvIndex};
use crate::presentation::{ChartSeries, DashboardPanels};
use crate::store::SavedLocations;
use crate::view::DashboardView;
use crate::{DashboardError, Result};

const SEARCH_FAILED: &str = "Error searching location. Please try again.";
const POSITION_FAILED: &str =
    "Unable to retrieve your location. Please search for a location manually.";
const NOTHING_TO_SAVE: &str = "No location selected. Search for a location before saving it.";
const SAVE_FAILED: &str = "Unable to save location. Please try again.";
const LOAD_SAVED_FAILED: &str = "Unable to load saved locations.";

/// Knobs of the rendered panels
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub map_zoom: u8,
    /// Precipitation overlay tile template
    pub tile_url: String,
    /// Days in the historical chart, today included
    pub history_days: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for DashboardSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            map_zoom: config.defaults.map_zoom,
            tile_url: config.weather.tile_url.clone(),
            history_days: match config.defaults.history_days {
                0 => DEFAULT_HISTORY_DAYS,
                days => days,
            },
        }
    }
}

/// Everything fetched for one coordinate pair
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub coordinates: Coordinates,
    pub conditions: CurrentConditions,
    pub forecast: ForecastSeries,
    pub air_quality: AirQualityIndex,
    pub uv: UvIndex,
}

/// What happened to one orchestration call
#[derive(Debug)]
pub enum LocationOutcome {
    /// All primary panels were rendered from this snapshot
    Rendered(Box<WeatherSnapshot>),
    /// A newer call was issued before this one finished; nothing was rendered
    Superseded,
    /// A primary fetch failed; nothing was rendered
    Failed(DashboardError),
}

/// Record of one orchestration call
#[derive(Debug)]
pub struct LocationUpdate {
    pub generation: u64,
    pub outcome: LocationOutcome,
    /// Historical flow, present when the primary panels were rendered
    pub history: Option<JoinHandle<()>>,
}

impl LocationUpdate {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self.outcome, LocationOutcome::Rendered(_))
    }
}

/// Location-driven weather dashboard
pub struct Dashboard {
    source: Arc<dyn WeatherSource>,
    view: Arc<dyn DashboardView>,
    saved: SavedLocations,
    position: Option<Arc<dyn PositionSource>>,
    settings: DashboardSettings,
    generation: Arc<AtomicU64>,
    // held from the latest-check until the last panel of a flow is drawn
    render_lock: Arc<Mutex<()>>,
    current_label: Mutex<Option<String>>,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        view: Arc<dyn DashboardView>,
        saved: SavedLocations,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            source,
            view,
            saved,
            position: None,
            settings,
            generation: Arc::new(AtomicU64::new(0)),
            render_lock: Arc::new(Mutex::new(())),
            current_label: Mutex::new(None),
        }
    }

    /// Enable "current location" lookups
    #[must_use]
    pub fn with_position_source(mut self, position: Arc<dyn PositionSource>) -> Self {
        self.position = Some(position);
        self
    }

    /// Label that "save" would store
    #[must_use]
    pub fn current_label(&self) -> Option<String> {
        self.current_label.lock().clone()
    }

    /// Fetch and render everything for the coordinates
    pub async fn resolve_location(&self, latitude: f64, longitude: f64) -> LocationUpdate {
        self.resolve_at(Coordinates::new(latitude, longitude), None)
            .await
    }

    /// Geocode (or parse) the query, then resolve the best match.
    ///
    /// Returns `None` when nothing was resolved: an empty query is ignored,
    /// a failed search is reported through a notice.
    pub async fn resolve_by_text_query(&self, query: &str) -> Option<LocationUpdate> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search query");
            return None;
        }

        let resolved = match LocationParser::parse(query) {
            Ok(input) => LocationResolver::resolve(self.source.as_ref(), input).await,
            Err(err) => Err(err),
        };

        match resolved {
            Ok(location) => Some(
                self.resolve_at(location.coordinates(), Some(location.display_label()))
                    .await,
            ),
            Err(err) => {
                error!("Error searching location '{}': {}", query, err);
                let notice = match err {
                    DashboardError::NoResults { .. } => err.user_message(),
                    _ => SEARCH_FAILED.to_string(),
                };
                self.view.notify(&notice);
                None
            }
        }
    }

    /// Resolve the device position, when the host can provide one
    pub async fn resolve_by_current_device_position(&self) -> Option<LocationUpdate> {
        let Some(position) = &self.position else {
            let err = DashboardError::unsupported("Geolocation");
            warn!("{}", err);
            self.view.notify(&err.user_message());
            return None;
        };

        match position.current_position().await {
            Ok(at) => Some(self.resolve_at(at, None).await),
            Err(err) => {
                error!("Error getting location: {}", err);
                self.view.notify(POSITION_FAILED);
                None
            }
        }
    }

    /// Save the label of the location on display; true when the list changed
    pub async fn add_current_location_to_saved(&self) -> bool {
        let label = self
            .current_label()
            .filter(|label| !label.trim().is_empty());
        let Some(label) = label else {
            self.view.notify(NOTHING_TO_SAVE);
            return false;
        };

        match self.saved.add(&label).await {
            Ok(true) => {
                self.show_saved_locations().await;
                true
            }
            Ok(false) => false,
            Err(err) => {
                error!("Failed to save location '{}': {}", label, err);
                self.view.notify(SAVE_FAILED);
                false
            }
        }
    }

    /// Reload the saved list from storage and render it in full
    pub async fn show_saved_locations(&self) {
        match self.saved.load().await {
            Ok(names) => self.view.render_saved_locations(&names),
            Err(err) => {
                error!("Failed to load saved locations: {}", err);
                self.view.notify(LOAD_SAVED_FAILED);
            }
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    #[instrument(skip_all, fields(at = %at.format()))]
    async fn resolve_at(&self, at: Coordinates, label: Option<String>) -> LocationUpdate {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, "Resolving location");

        let fetched = self.fetch_snapshot(at).await;
        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(generation, "Error fetching weather data: {}", err);
                return LocationUpdate {
                    generation,
                    outcome: LocationOutcome::Failed(err),
                    history: None,
                };
            }
        };

        {
            let _render = self.render_lock.lock();
            if !self.is_latest(generation) {
                debug!(generation, "Discarding superseded weather data");
                return LocationUpdate {
                    generation,
                    outcome: LocationOutcome::Superseded,
                    history: None,
                };
            }

            DashboardPanels::build(&snapshot, &self.settings).render(self.view.as_ref());
            *self.current_label.lock() =
                Some(label.unwrap_or_else(|| snapshot.conditions.city_name.clone()));
        }

        let history = self.spawn_history(generation, at, snapshot.conditions.utc_offset_seconds);

        LocationUpdate {
            generation,
            outcome: LocationOutcome::Rendered(Box::new(snapshot)),
            history: Some(history),
        }
    }

    async fn fetch_snapshot(&self, at: Coordinates) -> Result<WeatherSnapshot> {
        let (conditions, forecast, air_quality, uv) = tokio::try_join!(
            self.source.current_conditions(at),
            self.source.forecast(at),
            self.source.air_quality(at),
            self.source.uv_index(at),
        )?;

        Ok(WeatherSnapshot {
            coordinates: at,
            conditions,
            forecast,
            air_quality,
            uv,
        })
    }

    fn spawn_history(
        &self,
        generation: u64,
        at: Coordinates,
        utc_offset_seconds: i32,
    ) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let view = Arc::clone(&self.view);
        let latest = Arc::clone(&self.generation);
        let render_lock = Arc::clone(&self.render_lock);
        let days = self.settings.history_days;

        tokio::spawn(
            async move {
                match fetch_history(source.as_ref(), at, Utc::now(), days).await {
                    Ok(points) => {
                        let _render = render_lock.lock();
                        if latest.load(Ordering::SeqCst) == generation {
                            let chart = ChartSeries::history(&points, utc_offset_seconds);
                            view.render_history_chart(&chart);
                        } else {
                            debug!("Discarding superseded historical data");
                        }
                    }
                    Err(err) => error!("Error fetching historical weather data: {}", err),
                }
            }
            .instrument(info_span!("history", generation)),
        )
    }
}
