//! Map collaborator driven by the search controller.

use matcher::LatLon;
use store::ServiceIconKey;

/// Opaque handle to a marker placed through a [`MapNavigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    /// Pin for the currently selected search result.
    SearchPin,
    Service(ServiceIconKey),
}

/// Whatever renders the map. The controller only ever moves the view and
/// manages its own search marker through this trait.
pub trait MapNavigator {
    fn set_view(&mut self, center: LatLon, zoom: u8);

    fn fly_to(&mut self, center: LatLon, zoom: u8, duration_secs: f64);

    fn add_marker(&mut self, position: LatLon, icon: MarkerIcon) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn bind_popup(&mut self, handle: MarkerHandle, text: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorCall {
    SetView { center: LatLon, zoom: u8 },
    FlyTo { center: LatLon, zoom: u8, duration_secs: f64 },
    AddMarker { handle: MarkerHandle, position: LatLon, icon: MarkerIcon },
    RemoveMarker(MarkerHandle),
    BindPopup { handle: MarkerHandle, text: String },
}

/// Headless navigator that records every call and tracks live markers.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    calls: Vec<NavigatorCall>,
    live: Vec<MarkerHandle>,
    next_id: u64,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[NavigatorCall] {
        &self.calls
    }

    pub fn live_markers(&self) -> &[MarkerHandle] {
        &self.live
    }

    pub fn last_fly_to(&self) -> Option<(LatLon, u8)> {
        self.calls.iter().rev().find_map(|c| match c {
            NavigatorCall::FlyTo { center, zoom, .. } => Some((*center, *zoom)),
            _ => None,
        })
    }

    pub fn popup_for(&self, handle: MarkerHandle) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            NavigatorCall::BindPopup { handle: h, text } if *h == handle => Some(text.as_str()),
            _ => None,
        })
    }
}

impl MapNavigator for RecordingNavigator {
    fn set_view(&mut self, center: LatLon, zoom: u8) {
        self.calls.push(NavigatorCall::SetView { center, zoom });
    }

    fn fly_to(&mut self, center: LatLon, zoom: u8, duration_secs: f64) {
        self.calls.push(NavigatorCall::FlyTo {
            center,
            zoom,
            duration_secs,
        });
    }

    fn add_marker(&mut self, position: LatLon, icon: MarkerIcon) -> MarkerHandle {
        self.next_id += 1;
        let handle = MarkerHandle(self.next_id);
        self.live.push(handle);
        self.calls.push(NavigatorCall::AddMarker {
            handle,
            position,
            icon,
        });
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.live.retain(|h| *h != handle);
        self.calls.push(NavigatorCall::RemoveMarker(handle));
    }

    fn bind_popup(&mut self, handle: MarkerHandle, text: &str) {
        self.calls.push(NavigatorCall::BindPopup {
            handle,
            text: text.to_string(),
        });
    }
}
