//! Incremental address search as an explicit state machine.
//!
//! [`transition`] is pure: it takes the current [`SearchState`] and one
//! [`Event`] and returns the next state plus the [`Intent`]s the
//! [`crate::SearchController`] must carry out (timers, requests, map moves).
//!
//! Every input change, selection, escape or teardown bumps the state's
//! generation. Timer and request completions carry the generation they were
//! started for; a completion whose generation is not current is dropped
//! without touching state.

use matcher::{LatLon, SearchResult, MIN_QUERY_CHARS};

use crate::error::ClientError;
use crate::sources::GeocodedPlace;

// User-facing text, in the map's pt-BR locale.
pub const NOT_FOUND_MESSAGE: &str = "Endereço não encontrado.";
pub const INVALID_COORDINATES_MESSAGE: &str = "Coordenadas inválidas retornadas pela busca.";
pub const UNAVAILABLE_MESSAGE: &str = "Não foi possível realizar a busca agora.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for typing to settle.
    Debouncing,
    /// Local search request in flight.
    Querying,
    ShowingSuggestions,
    NoResults,
    /// External geocoder request in flight.
    Geocoding,
    /// Geocoder fallback failed; `message` holds the user-visible text.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Escape,
    Enter,
}

#[derive(Debug)]
pub enum Event {
    InputChanged(String),
    DebounceElapsed {
        generation: u64,
    },
    SuggestionsLoaded {
        generation: u64,
        outcome: Result<Vec<SearchResult>, ClientError>,
    },
    Key(NavKey),
    /// A suggestion was picked directly (click or tap).
    SuggestionChosen(usize),
    GeocodeFinished {
        generation: u64,
        outcome: Result<Option<GeocodedPlace>, ClientError>,
    },
    Teardown,
}

/// Where the map should go after a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub position: LatLon,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    StartDebounce { generation: u64 },
    CancelDebounce,
    FetchSuggestions { generation: u64, query: String },
    Geocode { generation: u64, query: String },
    /// Abort any in-flight local search or geocode request.
    CancelRequests,
    Navigate(Destination),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub phase: Phase,
    pub query: String,
    pub suggestions: Vec<SearchResult>,
    /// Highlighted suggestion, `-1` for none.
    pub cursor: isize,
    pub panel_open: bool,
    pub message: Option<String>,
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            query: String::new(),
            suggestions: Vec::new(),
            cursor: -1,
            panel_open: false,
            message: None,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn highlighted(&self) -> Option<&SearchResult> {
        usize::try_from(self.cursor)
            .ok()
            .and_then(|i| self.suggestions.get(i))
    }

    fn supersede(&mut self, intents: &mut Vec<Intent>) -> u64 {
        self.generation += 1;
        intents.push(Intent::CancelDebounce);
        intents.push(Intent::CancelRequests);
        self.generation
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.cursor = -1;
        self.panel_open = false;
    }

    fn reset(&mut self) {
        self.query.clear();
        self.clear_suggestions();
        self.message = None;
        self.phase = Phase::Idle;
    }

    fn select(&mut self, destination: Destination, intents: &mut Vec<Intent>) {
        self.supersede(intents);
        self.reset();
        intents.push(Intent::Navigate(destination));
    }

    fn select_suggestion(&mut self, index: usize, intents: &mut Vec<Intent>) {
        if let Some(s) = self.suggestions.get(index) {
            let destination = Destination {
                position: s.centroid,
                label: s.label(),
            };
            self.select(destination, intents);
        }
    }

    fn on_input(&mut self, text: String, intents: &mut Vec<Intent>) {
        let generation = self.supersede(intents);
        self.query = text;
        self.cursor = -1;
        self.message = None;

        if self.query.trim().chars().count() < MIN_QUERY_CHARS {
            self.clear_suggestions();
            self.phase = Phase::Idle;
        } else {
            self.phase = Phase::Debouncing;
            intents.push(Intent::StartDebounce { generation });
        }
    }

    fn on_debounce(&mut self, generation: u64, intents: &mut Vec<Intent>) {
        if generation != self.generation || self.phase != Phase::Debouncing {
            return;
        }
        self.phase = Phase::Querying;
        intents.push(Intent::FetchSuggestions {
            generation,
            query: self.query.trim().to_string(),
        });
    }

    fn on_suggestions(&mut self, generation: u64, outcome: Result<Vec<SearchResult>, ClientError>) {
        if generation != self.generation || self.phase != Phase::Querying {
            return;
        }
        match outcome {
            Ok(results) if !results.is_empty() => {
                self.suggestions = results;
                self.cursor = -1;
                self.panel_open = true;
                self.phase = Phase::ShowingSuggestions;
            }
            Ok(_) | Err(_) => {
                self.clear_suggestions();
                self.phase = Phase::NoResults;
            }
        }
    }

    fn on_key(&mut self, key: NavKey, intents: &mut Vec<Intent>) {
        let last = self.suggestions.len() as isize - 1;
        match key {
            NavKey::ArrowDown => {
                if last >= 0 {
                    self.cursor = (self.cursor + 1).min(last);
                }
            }
            NavKey::ArrowUp => {
                self.cursor = (self.cursor - 1).max(-1);
            }
            NavKey::Escape => {
                self.supersede(intents);
                self.reset();
            }
            NavKey::Enter => self.on_enter(intents),
        }
    }

    fn on_enter(&mut self, intents: &mut Vec<Intent>) {
        if let Some(index) = usize::try_from(self.cursor)
            .ok()
            .filter(|&i| i < self.suggestions.len())
        {
            self.select_suggestion(index, intents);
        } else if !self.suggestions.is_empty() {
            self.select_suggestion(0, intents);
        } else {
            let query = self.query.trim().to_string();
            if query.is_empty() {
                return;
            }
            let generation = self.supersede(intents);
            self.message = None;
            self.phase = Phase::Geocoding;
            intents.push(Intent::Geocode { generation, query });
        }
    }

    fn on_geocode(
        &mut self,
        generation: u64,
        outcome: Result<Option<GeocodedPlace>, ClientError>,
        intents: &mut Vec<Intent>,
    ) {
        if generation != self.generation || self.phase != Phase::Geocoding {
            return;
        }
        let message = match outcome {
            Ok(Some(place)) => {
                self.select(
                    Destination {
                        position: place.position,
                        label: place.label,
                    },
                    intents,
                );
                return;
            }
            Ok(None) => NOT_FOUND_MESSAGE,
            Err(ClientError::InvalidCoordinates) => INVALID_COORDINATES_MESSAGE,
            Err(_) => UNAVAILABLE_MESSAGE,
        };
        self.phase = Phase::Error;
        self.message = Some(message.to_string());
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies one event to `state`.
pub fn transition(mut state: SearchState, event: Event) -> (SearchState, Vec<Intent>) {
    let mut intents = Vec::new();
    match event {
        Event::InputChanged(text) => state.on_input(text, &mut intents),
        Event::DebounceElapsed { generation } => state.on_debounce(generation, &mut intents),
        Event::SuggestionsLoaded {
            generation,
            outcome,
        } => state.on_suggestions(generation, outcome),
        Event::Key(key) => state.on_key(key, &mut intents),
        Event::SuggestionChosen(index) => state.select_suggestion(index, &mut intents),
        Event::GeocodeFinished {
            generation,
            outcome,
        } => state.on_geocode(generation, outcome, &mut intents),
        Event::Teardown => {
            state.supersede(&mut intents);
            state.clear_suggestions();
            state.phase = Phase::Idle;
        }
    }
    (state, intents)
}
