use anyhow::Context;
use drishticore::analysis::RouteSelection;
use drishticore::catalog::{AnomalyInputValues, AnomalyKind};
use drishticore::registry::{route_track_points, station_by_code, SensorRegistry};
use drishticore::LatLng;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Describes a batch of synthetic anomaly placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: Option<String>,
    pub route: Option<RouteSelection>,
    pub placements: usize,
    pub kinds: Vec<AnomalyKind>,
    /// Track subdivisions used when sampling positions along the route.
    pub segments: usize,
    /// Max offset in degrees applied to each sampled position.
    pub jitter: f64,
    /// Sample operator inputs across each field's range instead of defaults.
    pub randomize_inputs: bool,
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: None,
            route: None,
            placements: 3,
            kinds: AnomalyKind::ALL.to_vec(),
            segments: 20,
            jitter: 0.0005,
            randomize_inputs: false,
            seed: 0,
        }
    }
}

/// One anomaly the scenario will place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub kind: AnomalyKind,
    pub position: LatLng,
    pub inputs: AnomalyInputValues,
}

fn candidate_positions(config: &ScenarioConfig) -> anyhow::Result<Vec<LatLng>> {
    match &config.route {
        Some(route) => {
            let from = station_by_code(&route.from)
                .with_context(|| format!("resolving route start {}", route.from))?;
            let to = station_by_code(&route.to)
                .with_context(|| format!("resolving route end {}", route.to))?;
            Ok(route_track_points(from, to, config.segments))
        }
        None => Ok(SensorRegistry::builtin()
            .nodes()
            .iter()
            .map(|s| s.position)
            .collect()),
    }
}

fn sample_inputs(kind: AnomalyKind, randomize: bool, rng: &mut StdRng) -> AnomalyInputValues {
    let definition = kind.definition();
    if !randomize {
        return definition.default_inputs();
    }
    definition
        .input_fields
        .iter()
        .fold(AnomalyInputValues::default(), |values, field| {
            values.with(field.key, rng.gen_range(field.min..=field.max))
        })
}

pub fn build_placements(config: &ScenarioConfig) -> anyhow::Result<Vec<PlacementPlan>> {
    let positions = candidate_positions(config)?;
    let kinds = if config.kinds.is_empty() {
        AnomalyKind::ALL.to_vec()
    } else {
        config.kinds.clone()
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut plans = Vec::with_capacity(config.placements);
    for _ in 0..config.placements {
        let base = *positions
            .choose(&mut rng)
            .context("scenario has no candidate positions")?;
        let kind = *kinds
            .choose(&mut rng)
            .context("scenario has no anomaly kinds")?;
        let jitter = config.jitter.abs();
        let position = if jitter > 0.0 {
            LatLng::new(
                base.lat + rng.gen_range(-jitter..=jitter),
                base.lng + rng.gen_range(-jitter..=jitter),
            )
        } else {
            base
        };
        plans.push(PlacementPlan {
            kind,
            position,
            inputs: sample_inputs(kind, config.randomize_inputs, &mut rng),
        });
    }
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_requested_count() {
        let config = ScenarioConfig {
            placements: 7,
            ..Default::default()
        };
        let plans = build_placements(&config).unwrap();
        assert_eq!(plans.len(), 7);
    }

    #[test]
    fn same_seed_same_plan() {
        let config = ScenarioConfig {
            route: Some(RouteSelection::new("NDLS", "NZM")),
            placements: 5,
            randomize_inputs: true,
            seed: 13,
            ..Default::default()
        };
        assert_eq!(build_placements(&config).unwrap(), build_placements(&config).unwrap());
    }

    #[test]
    fn randomized_inputs_stay_in_range() {
        let config = ScenarioConfig {
            placements: 40,
            randomize_inputs: true,
            seed: 21,
            ..Default::default()
        };
        for plan in build_placements(&config).unwrap() {
            assert!(plan.kind.definition().validate(&plan.inputs).is_ok());
        }
    }

    #[test]
    fn unknown_route_station_is_an_error() {
        let config = ScenarioConfig {
            route: Some(RouteSelection::new("NDLS", "BOM")),
            ..Default::default()
        };
        assert!(build_placements(&config).is_err());
    }
}
