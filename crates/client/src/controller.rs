//! Runs the search state machine against real timers, requests and a map.

use std::sync::Arc;

use store::{FeatureCollection, Geometry};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::machine::{transition, Destination, Event, Intent, NavKey, SearchState};
use crate::navigator::{MapNavigator, MarkerHandle, MarkerIcon};
use crate::sources::{Geocoder, SuggestionSource};

/// A spawned timer or request and the generation it was started for.
struct Tracked {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Tracked {
    fn abort(self) {
        self.handle.abort();
    }
}

/// Owns a [`SearchState`] and performs the intents each transition emits.
///
/// Timers and requests run as tokio tasks that report back through an
/// internal channel; call [`SearchController::next`] or
/// [`SearchController::settle`] to feed their completions into the machine.
/// Methods that start work must be called inside a tokio runtime.
pub struct SearchController<N> {
    config: ClientConfig,
    state: SearchState,
    suggestions: Arc<dyn SuggestionSource>,
    geocoder: Arc<dyn Geocoder>,
    navigator: N,
    marker: Option<MarkerHandle>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    debounce: Option<Tracked>,
    request: Option<Tracked>,
}

impl<N: MapNavigator> SearchController<N> {
    pub fn new(
        config: ClientConfig,
        suggestions: Arc<dyn SuggestionSource>,
        geocoder: Arc<dyn Geocoder>,
        navigator: N,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            state: SearchState::new(),
            suggestions,
            geocoder,
            navigator,
            marker: None,
            events_tx,
            events_rx,
            debounce: None,
            request: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Marker of the current search selection, if any.
    pub fn search_marker(&self) -> Option<MarkerHandle> {
        self.marker
    }

    /// Centres the map on a freshly loaded feature collection and drops a
    /// service marker on every point feature.
    pub fn show_collection(&mut self, collection: &FeatureCollection) -> Vec<MarkerHandle> {
        self.navigator
            .set_view(collection.center, self.config.initial_zoom);

        let mut markers = Vec::new();
        for feature in collection.services.values().flatten() {
            if feature.geometry_kind() != Geometry::Point {
                continue;
            }
            let icon = MarkerIcon::Service(feature.icon().key());
            let marker = self.navigator.add_marker(feature.centroid, icon);
            let popup = feature.popup_html.as_deref().unwrap_or(&feature.name);
            self.navigator.bind_popup(marker, popup);
            markers.push(marker);
        }
        markers
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.dispatch(Event::InputChanged(text.into()));
    }

    pub fn key(&mut self, key: NavKey) {
        self.dispatch(Event::Key(key));
    }

    pub fn choose(&mut self, index: usize) {
        self.dispatch(Event::SuggestionChosen(index));
    }

    /// Cancels every timer and request. Nothing started before this call
    /// will change state afterwards.
    pub fn teardown(&mut self) {
        self.dispatch(Event::Teardown);
    }

    /// No timer or request is outstanding.
    pub fn is_idle(&self) -> bool {
        self.debounce.is_none() && self.request.is_none()
    }

    /// Processes one completion, waiting for it if work is outstanding.
    ///
    /// Returns `false` when there is nothing left to wait for.
    pub async fn next(&mut self) -> bool {
        let event = match self.events_rx.try_recv() {
            Ok(event) => event,
            Err(_) if self.is_idle() => return false,
            Err(_) => match self.events_rx.recv().await {
                Some(event) => event,
                None => return false,
            },
        };
        self.receive(event);
        true
    }

    /// Runs until no timer or request is outstanding.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn receive(&mut self, event: Event) {
        match &event {
            Event::DebounceElapsed { generation } => {
                if self.debounce.as_ref().is_some_and(|t| t.generation == *generation) {
                    self.debounce = None;
                }
            }
            Event::SuggestionsLoaded { generation, .. }
            | Event::GeocodeFinished { generation, .. } => {
                if self.request.as_ref().is_some_and(|t| t.generation == *generation) {
                    self.request = None;
                }
            }
            _ => {}
        }
        self.dispatch(event);
    }

    pub fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        let (next, intents) = transition(state, event);
        self.state = next;
        for intent in intents {
            self.perform(intent);
        }
    }

    fn perform(&mut self, intent: Intent) {
        match intent {
            Intent::StartDebounce { generation } => {
                if let Some(previous) = self.debounce.take() {
                    previous.abort();
                }
                let tx = self.events_tx.clone();
                let delay = self.config.debounce();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Event::DebounceElapsed { generation });
                });
                self.debounce = Some(Tracked { generation, handle });
            }
            Intent::CancelDebounce => {
                if let Some(timer) = self.debounce.take() {
                    timer.abort();
                }
            }
            Intent::CancelRequests => {
                if let Some(request) = self.request.take() {
                    tracing::debug!(generation = request.generation, "aborting superseded request");
                    request.abort();
                }
            }
            Intent::FetchSuggestions { generation, query } => {
                let tx = self.events_tx.clone();
                let source = Arc::clone(&self.suggestions);
                let limit = self.config.search_timeout();
                let handle = tokio::spawn(async move {
                    let outcome = tokio::time::timeout(limit, source.search(&query))
                        .await
                        .unwrap_or(Err(ClientError::Timeout));
                    match &outcome {
                        Ok(results) => {
                            tracing::debug!(generation, query = %query, results = results.len(), "suggestions loaded");
                        }
                        Err(err) => {
                            tracing::warn!(generation, query = %query, error = %err, "address search failed");
                        }
                    }
                    let _ = tx.send(Event::SuggestionsLoaded {
                        generation,
                        outcome,
                    });
                });
                self.track_request(generation, handle);
            }
            Intent::Geocode { generation, query } => {
                let tx = self.events_tx.clone();
                let geocoder = Arc::clone(&self.geocoder);
                let limit = self.config.geocode_timeout();
                let handle = tokio::spawn(async move {
                    let outcome = tokio::time::timeout(limit, geocoder.geocode(&query))
                        .await
                        .unwrap_or(Err(ClientError::Timeout));
                    if let Err(err) = &outcome {
                        tracing::warn!(generation, query = %query, error = %err, "geocoder lookup failed");
                    }
                    let _ = tx.send(Event::GeocodeFinished {
                        generation,
                        outcome,
                    });
                });
                self.track_request(generation, handle);
            }
            Intent::Navigate(destination) => self.navigate(destination),
        }
    }

    fn track_request(&mut self, generation: u64, handle: JoinHandle<()>) {
        if let Some(previous) = self.request.replace(Tracked { generation, handle }) {
            previous.abort();
        }
    }

    /// Flies to the destination and replaces the single search marker.
    fn navigate(&mut self, destination: Destination) {
        if let Some(previous) = self.marker.take() {
            self.navigator.remove_marker(previous);
        }
        self.navigator.fly_to(
            destination.position,
            self.config.select_zoom,
            self.config.fly_duration_secs,
        );
        let marker = self
            .navigator
            .add_marker(destination.position, MarkerIcon::SearchPin);
        self.navigator.bind_popup(marker, &destination.label);
        self.marker = Some(marker);

        tracing::info!(
            label = %destination.label,
            lat = destination.position[0],
            lon = destination.position[1],
            "moved map to selected address"
        );
    }
}

impl<N> Drop for SearchController<N> {
    fn drop(&mut self) {
        if let Some(timer) = self.debounce.take() {
            timer.abort();
        }
        if let Some(request) = self.request.take() {
            request.abort();
        }
    }
}
