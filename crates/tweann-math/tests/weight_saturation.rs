//! Property: after any plasticity update, every weight satisfies |w| <= 2*PI.

use proptest::prelude::*;
use tweann_math::plasticity::{NeuromodulationParams, PlasticityRule};
use tweann_math::WEIGHT_BOUND;

fn any_rule() -> impl Strategy<Value = PlasticityRule> {
    prop_oneof![
        Just(PlasticityRule::None),
        any::<f64>().prop_map(PlasticityRule::Hebbian),
        any::<f64>().prop_map(PlasticityRule::Ojas),
        (any::<f64>(), any::<f64>(), any::<f64>(), any::<f64>(), any::<f64>()).prop_map(
            |(h, a, b, c, d)| PlasticityRule::Neuromodulation(NeuromodulationParams::fixed(
                h, a, b, c, d
            ))
        ),
    ]
}

proptest! {
    #[test]
    fn updated_weight_is_always_saturated(
        rule in any_rule(),
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        w in -1000.0f64..1000.0,
    ) {
        let updated = rule.update_weight(0, x, y, w, &[x]);
        prop_assert!(updated.abs() <= WEIGHT_BOUND + 1e-9);
        prop_assert!(updated.is_finite());
    }
}
