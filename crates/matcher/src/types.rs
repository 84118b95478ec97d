use serde::{Deserialize, Serialize};

/// `[latitude, longitude]` in decimal degrees, as persisted on disk.
pub type LatLon = [f64; 2];

/// One row of the persisted address index.
///
/// Field names follow the snapshot format (`logradouro`, `setor`,
/// `subprefeitura`). Entries are immutable once a snapshot is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressEntry {
    /// Street or display name.
    #[serde(rename = "logradouro")]
    pub street: String,
    /// Normalized form of `street` used for matching.
    #[serde(default)]
    pub normalized: String,
    pub centroid: LatLon,
    /// Service sector identifier.
    #[serde(rename = "setor")]
    pub sector: String,
    pub name: String,
    #[serde(rename = "subprefeitura", default)]
    pub subprefecture: Option<String>,
}

impl AddressEntry {
    /// Builds an entry and computes its normalized form.
    pub fn new(
        street: impl Into<String>,
        centroid: LatLon,
        sector: impl Into<String>,
        name: impl Into<String>,
        subprefecture: Option<String>,
    ) -> Self {
        let street = street.into();
        Self {
            normalized: canonical::normalize(&street),
            street,
            centroid,
            sector: sector.into(),
            name: name.into(),
            subprefecture,
        }
    }

    /// Fills `normalized` from `street` when the snapshot left it blank.
    ///
    /// Returns `true` if the field had to be recomputed.
    pub fn ensure_normalized(&mut self) -> bool {
        if self.normalized.trim().is_empty() {
            self.normalized = canonical::normalize(&self.street);
            true
        } else {
            false
        }
    }

    /// Client-facing projection of this entry.
    pub fn to_result(&self) -> SearchResult {
        SearchResult {
            street: self.street.clone(),
            centroid: self.centroid,
            sector: self.sector.clone(),
            name: self.name.clone(),
            subprefecture: self.subprefecture.clone(),
        }
    }
}

/// An address suggestion as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "logradouro")]
    pub street: String,
    pub centroid: LatLon,
    #[serde(rename = "setor")]
    pub sector: String,
    pub name: String,
    /// Serialized as `null` when absent.
    #[serde(rename = "subprefeitura", default)]
    pub subprefecture: Option<String>,
}

impl SearchResult {
    /// Text shown in the suggestion list and on the map marker popup.
    pub fn label(&self) -> String {
        match &self.subprefecture {
            Some(sub) if !sub.trim().is_empty() => format!("{} ({sub})", self.street),
            _ => self.street.clone(),
        }
    }
}

/// Body of a successful search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}
