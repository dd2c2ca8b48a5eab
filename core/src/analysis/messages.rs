use crate::catalog::AnomalyKind;
use rand::seq::SliceRandom;
use rand::Rng;

/// Flavor text per anomaly kind. Not derived from the input values.
pub fn analysis_messages(kind: AnomalyKind) -> &'static [&'static str] {
    match kind {
        AnomalyKind::Obstruction => &[
            "Foreign object detected on track surface",
            "Debris or obstruction blocking rail path",
            "Physical barrier identified via vibration analysis",
        ],
        AnomalyKind::Tampering => &[
            "Fishplate displacement detected",
            "Rail joint anomaly identified",
            "Track component interference detected",
        ],
        AnomalyKind::Thermal => &[
            "Abnormal heat signature detected",
            "Thermal anomaly near track infrastructure",
            "Hot spot identified requiring inspection",
        ],
        AnomalyKind::Vibration => &[
            "Unusual vibration pattern detected",
            "Acoustic anomaly requires investigation",
            "Ground vibration outside normal parameters",
        ],
    }
}

pub fn pick_message<R: Rng + ?Sized>(kind: AnomalyKind, rng: &mut R) -> &'static str {
    analysis_messages(kind)
        .choose(rng)
        .copied()
        .unwrap_or("Anomaly detected")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn picked_message_belongs_to_kind_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        for kind in AnomalyKind::ALL {
            let message = pick_message(kind, &mut rng);
            assert!(analysis_messages(kind).contains(&message));
        }
    }

    #[test]
    fn same_seed_same_message() {
        let a = pick_message(AnomalyKind::Thermal, &mut StdRng::seed_from_u64(5));
        let b = pick_message(AnomalyKind::Thermal, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
