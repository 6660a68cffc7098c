use futures::future::join_all;
use tracing::instrument;

use crate::{
    error::EngineError,
    models::{
        Aggregated, CandidateResult, ClimateProfile, Location, PartialSoilProfile, Recommendation,
        SoilProfile,
    },
    prediction::Artifacts,
    services::{
        aggregator::SignalAggregator,
        encoder::CROP_TYPE,
        scorer::{crop_type_tag, CandidateScorer},
    },
};

/// Crops considered for every request, in tie-break order
pub const CANDIDATE_CROPS: [&str; 4] = ["wheat", "rice", "maize", "barley"];

/// Picks the revenue-maximizing crop for a location
///
/// Stateless between requests: signals are fetched fresh each time and nothing
/// is cached. Soil and climate are aggregated once and shared by every
/// candidate.
#[derive(Clone)]
pub struct RecommendationEngine {
    aggregator: SignalAggregator,
    scorer: CandidateScorer,
    candidates: Vec<String>,
}

impl RecommendationEngine {
    pub fn new(aggregator: SignalAggregator, scorer: CandidateScorer) -> Self {
        Self {
            aggregator,
            scorer,
            candidates: CANDIDATE_CROPS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Overrides the candidate list; declared order still breaks ties
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Warns at startup about candidates the encoder was not fitted on
    pub fn check_candidates(&self, artifacts: &Artifacts) {
        for crop in &self.candidates {
            if !artifacts.encoder.knows(CROP_TYPE, &crop_type_tag(crop)) {
                tracing::warn!(
                    crop = %crop,
                    "Candidate crop unknown to encoder; it will always be skipped"
                );
            }
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Recommends the crop with the highest expected revenue
    ///
    /// Candidates are scored concurrently but selected in declared order: the
    /// first candidate reaching the maximum revenue wins. Failed candidates are
    /// skipped; if none succeeds the request fails with
    /// [`EngineError::NoViableCandidate`].
    #[instrument(skip(self, location, manual_soil), fields(location = %location))]
    pub async fn recommend(
        &self,
        location: Location,
        country: &str,
        manual_soil: Option<&PartialSoilProfile>,
    ) -> Result<Recommendation, EngineError> {
        let (soil, climate) = tokio::join!(
            self.aggregator.aggregate_soil(location, manual_soil),
            self.aggregator.aggregate_climate(location),
        );

        tracing::info!(
            soil_source = soil.source(),
            climate_source = climate.source(),
            "Signals aggregated"
        );

        let soil = soil.into_profile();
        let climate = climate.into_profile();

        let results = self.score_candidates(country, soil, climate).await;
        let best = select_best(results)?;

        tracing::info!(
            crop = %best.crop,
            predicted_yield = best.predicted_yield,
            revenue = best.revenue,
            country = %country,
            "Recommendation selected"
        );

        Ok(Recommendation::from(best))
    }

    /// Soil and climate for a location, with provenance
    pub async fn signals(
        &self,
        location: Location,
    ) -> (Aggregated<SoilProfile>, Aggregated<ClimateProfile>) {
        tokio::join!(
            self.aggregator.aggregate_soil(location, None),
            self.aggregator.aggregate_climate(location),
        )
    }

    /// Scores every candidate; results come back in declared order
    async fn score_candidates(
        &self,
        country: &str,
        soil: SoilProfile,
        climate: ClimateProfile,
    ) -> Vec<Result<CandidateResult, EngineError>> {
        join_all(
            self.candidates
                .iter()
                .map(|crop| self.scorer.score(crop, country, soil, climate)),
        )
        .await
    }
}

/// First candidate with strictly greater revenue wins; failures are skipped
fn select_best(
    results: Vec<Result<CandidateResult, EngineError>>,
) -> Result<CandidateResult, EngineError> {
    let attempted = results.len();
    let mut best: Option<CandidateResult> = None;

    for result in results {
        match result {
            Ok(candidate) => {
                let better = match &best {
                    Some(current) => candidate.revenue > current.revenue,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping candidate");
            }
        }
    }

    best.ok_or(EngineError::NoViableCandidate { attempted })
}
