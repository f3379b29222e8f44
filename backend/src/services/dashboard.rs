//! Weather dashboard orchestration
//!
//! Sequences location resolution, fetching and derivation for every refresh
//! and owns the resulting state. The state moves through
//! `Idle -> Loading -> Ready | Failed`; each transition publishes a complete
//! replacement on a watch channel. Only one refresh runs at a time.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::{GeolocationConfig, WeatherConfig};
use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;
use crate::models::{
    has_usable_api_key, validate_place_name, Alert, CurrentConditions, ForecastDay,
    Recommendation, Theme, WeatherBundle,
};
use crate::services::location::{Geolocator, LocationIntent, LocationResolver};
use crate::services::weather::WeatherService;

const MISSING_API_KEY: &str = "Weather API key is not configured";

/// Dashboard lifecycle status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DashboardStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Dashboard state, replaced wholesale on every transition
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Idle,
    Loading,
    Ready(WeatherBundle),
    Failed { message: String, retryable: bool },
}

impl DashboardState {
    pub fn status(&self) -> DashboardStatus {
        match self {
            DashboardState::Idle => DashboardStatus::Idle,
            DashboardState::Loading => DashboardStatus::Loading,
            DashboardState::Ready(_) => DashboardStatus::Ready,
            DashboardState::Failed { .. } => DashboardStatus::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading)
    }
}

/// What the presentation layer renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub status: DashboardStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentConditions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastDay>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub retryable: bool,
}

impl DashboardView {
    fn empty(status: DashboardStatus) -> Self {
        Self {
            status,
            location: None,
            current: None,
            forecast: None,
            alerts: None,
            theme: None,
            recommendations: None,
            error: None,
            retryable: false,
        }
    }
}

impl From<&DashboardState> for DashboardView {
    fn from(state: &DashboardState) -> Self {
        match state {
            DashboardState::Idle | DashboardState::Loading => Self::empty(state.status()),
            DashboardState::Ready(bundle) => Self {
                location: Some(bundle.location.clone()),
                current: Some(bundle.current.clone()),
                forecast: Some(bundle.forecast.clone()),
                alerts: Some(bundle.alerts.clone()),
                theme: Some(bundle.theme),
                recommendations: Some(bundle.recommendations.clone()),
                ..Self::empty(DashboardStatus::Ready)
            },
            DashboardState::Failed { message, retryable } => Self {
                error: Some(message.clone()),
                retryable: *retryable,
                ..Self::empty(DashboardStatus::Failed)
            },
        }
    }
}

struct Pipeline {
    resolver: LocationResolver,
    weather: WeatherService,
}

struct DashboardInner {
    /// `None` when no API key is configured
    pipeline: Option<Pipeline>,
    state: watch::Sender<Arc<DashboardState>>,
    in_flight: Mutex<Option<CancellationToken>>,
    last_intent: Mutex<Option<LocationIntent>>,
}

/// Owner of the weather dashboard state
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

impl Dashboard {
    pub fn new(weather: &WeatherConfig, geolocation: &GeolocationConfig) -> AppResult<Self> {
        let pipeline = match weather.api_key.as_deref() {
            Some(key) if has_usable_api_key(Some(key)) => {
                let client = WeatherClient::new(key.trim().to_string(), weather)?;
                Some(Pipeline {
                    resolver: LocationResolver::new(
                        client.clone(),
                        weather.default_location.clone(),
                        geolocation.into(),
                    ),
                    weather: WeatherService::new(client),
                })
            }
            _ => {
                tracing::warn!("{}; weather refreshes will fail", MISSING_API_KEY);
                None
            }
        };

        let (state, _) = watch::channel(Arc::new(DashboardState::Idle));

        Ok(Self {
            inner: Arc::new(DashboardInner {
                pipeline,
                state,
                in_flight: Mutex::new(None),
                last_intent: Mutex::new(None),
            }),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.inner.pipeline.is_some()
    }

    /// Current state snapshot
    pub fn state(&self) -> Arc<DashboardState> {
        self.inner.state.borrow().clone()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from(self.state().as_ref())
    }

    /// Receive every state transition from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.inner.state.subscribe()
    }

    /// Refresh for a free-text place name
    pub async fn search(&self, city: &str) -> AppResult<Arc<DashboardState>> {
        let city = validate_place_name(city).map_err(|msg| AppError::validation("city", msg))?;
        self.refresh(LocationIntent::Place(city.to_string())).await
    }

    /// Refresh for the device position reported by `geolocator`
    pub async fn locate(&self, geolocator: Arc<dyn Geolocator>) -> AppResult<Arc<DashboardState>> {
        self.refresh(LocationIntent::Device(geolocator)).await
    }

    /// Replay the last location intent
    pub async fn retry(&self) -> AppResult<Arc<DashboardState>> {
        let intent = self
            .inner
            .last_intent
            .lock()
            .clone()
            .ok_or_else(|| AppError::validation("intent", "There is no weather request to retry"))?;
        self.refresh(intent).await
    }

    /// Cancel the in-flight refresh, if any
    pub fn cancel(&self) -> bool {
        match self.inner.in_flight.lock().as_ref() {
            Some(token) => {
                tracing::info!("Cancelling weather refresh");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Run one refresh to completion and return the state it committed.
    ///
    /// Fails only with `Busy` when another refresh is running; pipeline errors
    /// end in a `Failed` state instead. The refresh runs on its own task so a
    /// dropped caller cannot leave the dashboard stuck in `Loading`.
    pub async fn refresh(&self, intent: LocationIntent) -> AppResult<Arc<DashboardState>> {
        let token = self.begin(&intent)?;
        let dashboard = self.clone();

        tokio::spawn(async move { dashboard.run(intent, token).await })
            .await
            .map_err(|e| AppError::Internal(format!("Weather refresh task failed: {}", e)))
    }

    fn begin(&self, intent: &LocationIntent) -> AppResult<CancellationToken> {
        let mut in_flight = self.inner.in_flight.lock();
        if in_flight.is_some() {
            return Err(AppError::Busy);
        }

        let token = CancellationToken::new();
        *in_flight = Some(token.clone());
        *self.inner.last_intent.lock() = Some(intent.clone());
        self.transition(DashboardState::Loading);

        Ok(token)
    }

    async fn run(&self, intent: LocationIntent, token: CancellationToken) -> Arc<DashboardState> {
        tracing::info!(?intent, "Refreshing weather");

        let result = tokio::select! {
            _ = token.cancelled() => Err(AppError::Cancelled),
            result = self.load(&intent) => result,
        };

        let mut in_flight = self.inner.in_flight.lock();
        let result = if token.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            result
        };

        let next = match result {
            Ok(bundle) => DashboardState::Ready(bundle),
            Err(err) => {
                tracing::warn!(error = %err, "Weather refresh failed");
                DashboardState::Failed {
                    message: err.user_message(),
                    retryable: err.is_retryable(),
                }
            }
        };
        let committed = self.transition(next);
        *in_flight = None;

        committed
    }

    async fn load(&self, intent: &LocationIntent) -> AppResult<WeatherBundle> {
        let pipeline = self
            .inner
            .pipeline
            .as_ref()
            .ok_or_else(|| AppError::Configuration(MISSING_API_KEY.to_string()))?;

        let coordinates = pipeline.resolver.resolve(intent).await?;
        let snapshot = pipeline.weather.fetch_snapshot(coordinates).await?;

        Ok(snapshot.into_bundle(Utc::now()))
    }

    fn transition(&self, next: DashboardState) -> Arc<DashboardState> {
        let next = Arc::new(next);
        tracing::info!(status = ?next.status(), "Dashboard state changed");
        self.inner.state.send_replace(next.clone());
        next
    }
}
