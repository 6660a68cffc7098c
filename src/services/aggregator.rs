use std::sync::Arc;

use crate::{
    models::{Aggregated, ClimateProfile, Location, PartialSoilProfile, SoilProfile},
    services::providers::{ClimateProvider, SoilProvider},
};

/// Collects soil and climate signals for a location
///
/// Aggregation is total: provider failures are logged and replaced with the
/// documented fallback profile, never propagated.
#[derive(Clone)]
pub struct SignalAggregator {
    soil_provider: Arc<dyn SoilProvider>,
    climate_provider: Arc<dyn ClimateProvider>,
}

impl SignalAggregator {
    pub fn new(
        soil_provider: Arc<dyn SoilProvider>,
        climate_provider: Arc<dyn ClimateProvider>,
    ) -> Self {
        Self {
            soil_provider,
            climate_provider,
        }
    }

    /// Soil profile for `location`, or the caller's override when given
    ///
    /// An override never touches the provider; its gaps are filled from
    /// [`SoilProfile::FALLBACK`].
    pub async fn aggregate_soil(
        &self,
        location: Location,
        manual: Option<&PartialSoilProfile>,
    ) -> Aggregated<SoilProfile> {
        if let Some(manual) = manual {
            tracing::debug!(location = %location, "Using manual soil profile");
            return Aggregated::Manual {
                profile: SoilProfile::from_partial(manual),
            };
        }

        match self.soil_provider.get_soil(location).await {
            Ok(raw) => Aggregated::Observed {
                profile: SoilProfile::from_partial(&raw),
            },
            Err(e) => {
                tracing::warn!(
                    location = %location,
                    provider = self.soil_provider.name(),
                    error = %e,
                    "Soil provider failed, using fallback profile"
                );
                Aggregated::Fallback {
                    profile: SoilProfile::FALLBACK,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn aggregate_climate(&self, location: Location) -> Aggregated<ClimateProfile> {
        match self.climate_provider.get_climate(location).await {
            Ok(profile) => Aggregated::Observed { profile },
            Err(e) => {
                tracing::warn!(
                    location = %location,
                    provider = self.climate_provider.name(),
                    error = %e,
                    "Climate provider failed, using fallback profile"
                );
                Aggregated::Fallback {
                    profile: ClimateProfile::FALLBACK,
                    reason: e.to_string(),
                }
            }
        }
    }
}
