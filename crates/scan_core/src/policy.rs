//! Provider policy, scan options and the request assembled from them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::area::{
    clamp_spacing, try_build_area_payload, AreaKind, AreaOfInterest, AreaPayload, GeometryError,
    DEFAULT_SPACING,
};

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 22;

/// Which imagery providers to use, in priority order, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderPolicy {
    pub order: Vec<String>,
    pub quality_threshold: f64,
    /// Upper bound on tiles fetched; 0 means no limit.
    pub max_tiles: u32,
    pub zoom: u8,
    pub spacing: f64,
}

impl Default for ProviderPolicy {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            quality_threshold: 0.6,
            max_tiles: 0,
            zoom: 20,
            spacing: DEFAULT_SPACING,
        }
    }
}

impl ProviderPolicy {
    /// Copy with unique, non-blank providers and every number in range.
    pub fn normalized(&self) -> Self {
        let mut seen = HashSet::new();
        let order = self
            .order
            .iter()
            .map(|provider| provider.trim())
            .filter(|provider| !provider.is_empty())
            .filter(|provider| seen.insert(provider.to_ascii_lowercase()))
            .map(ToOwned::to_owned)
            .collect();
        let quality_threshold = if self.quality_threshold.is_finite() {
            self.quality_threshold.clamp(0.0, 1.0)
        } else {
            Self::default().quality_threshold
        };
        Self {
            order,
            quality_threshold,
            max_tiles: self.max_tiles,
            zoom: self.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            spacing: clamp_spacing(Some(self.spacing)),
        }
    }

    pub fn tile_limit(&self) -> Option<u64> {
        (self.max_tiles > 0).then_some(u64::from(self.max_tiles))
    }
}

/// Lead filters applied by the backend while scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanFilters {
    pub min_confidence: Option<f64>,
    pub property_types: Vec<String>,
    pub exclude_existing_leads: bool,
}

/// Optional enrichment steps run on qualified leads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentOptions {
    pub owner_lookup: bool,
    pub contact_enrichment: bool,
    pub storm_history: bool,
}

/// Body of the create-scan-job call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanJobRequest {
    pub area_type: AreaKind,
    pub area_payload: AreaPayload,
    pub provider_policy: ProviderPolicy,
    pub filters: ScanFilters,
    pub enrichment_options: EnrichmentOptions,
    pub budget_cents: u64,
}

/// Everything the operator entered in the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDraft {
    pub area: AreaOfInterest,
    #[serde(default)]
    pub policy: ProviderPolicy,
    #[serde(default)]
    pub filters: ScanFilters,
    #[serde(default)]
    pub enrichment: EnrichmentOptions,
    #[serde(default)]
    pub budget_cents: u64,
}

impl ScanDraft {
    pub fn new(area: AreaOfInterest) -> Self {
        Self {
            area,
            policy: ProviderPolicy::default(),
            filters: ScanFilters::default(),
            enrichment: EnrichmentOptions::default(),
            budget_cents: 0,
        }
    }

    /// Builds the backend request; fails without touching the network when
    /// the area has no valid payload.
    pub fn to_request(&self) -> Result<ScanJobRequest, GeometryError> {
        let provider_policy = self.policy.normalized();
        let area_payload = try_build_area_payload(&self.area, Some(provider_policy.spacing))?;
        Ok(ScanJobRequest {
            area_type: area_payload.kind(),
            area_payload,
            provider_policy,
            filters: self.filters.clone(),
            enrichment_options: self.enrichment.clone(),
            budget_cents: self.budget_cents,
        })
    }
}
