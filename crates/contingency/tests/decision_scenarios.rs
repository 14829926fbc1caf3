use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vericast_contingency::{ContingencyCounts, Operator, Outcome, ThresholdSet, classify};

#[test]
fn gale_warning_is_a_hit() {
    let r = classify(18.5, 19.2, 17.49, Operator::Gt);
    assert_eq!(r.outcome, Outcome::Hit);
}

#[test]
fn cold_front_is_a_hit() {
    let r = classify(271.0, 272.5, 273.15, Operator::Lt);
    assert_eq!(r.outcome, Outcome::Hit);
    assert!(r.forecast_crosses && r.observed_crosses);
}

#[test]
fn mixed_contingency_scores() {
    let s = ContingencyCounts::new(7, 2, 1, 10).scores();
    assert_relative_eq!(s.csi, 0.7, epsilon = 1e-9);
    assert_relative_eq!(s.hit_rate, 0.778, epsilon = 1e-3);
    assert_relative_eq!(s.false_alarm_ratio, 0.125, epsilon = 1e-9);
}

#[test]
fn pair_can_hit_low_threshold_and_miss_high_threshold() {
    let set = ThresholdSet::new(Operator::Gt, vec![12.86, 24.69]);
    let r = set.classify_all(20.0, 30.0);
    assert_eq!(r[0].outcome, Outcome::Hit);
    assert_eq!(r[1].outcome, Outcome::Miss);
}

#[test]
fn random_pairs_always_land_in_exactly_one_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    let ops = [Operator::Gt, Operator::Ge, Operator::Lt, Operator::Le];
    let mut counts = ContingencyCounts::default();
    let n = 5_000u64;

    for _ in 0..n {
        let forecast: f64 = rng.random_range(-50.0..50.0);
        let observed: f64 = rng.random_range(-50.0..50.0);
        let threshold: f64 = rng.random_range(-50.0..50.0);
        let op = ops[rng.random_range(0..ops.len())];

        let r = classify(forecast, observed, threshold, op);
        let expected = match (r.forecast_crosses, r.observed_crosses) {
            (true, true) => Outcome::Hit,
            (false, true) => Outcome::Miss,
            (true, false) => Outcome::FalseAlarm,
            (false, false) => Outcome::CorrectNegative,
        };
        assert_eq!(r.outcome, expected);
        counts.record(r.outcome);
    }

    assert_eq!(counts.total(), n);
}

#[test]
fn scores_are_never_nan() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..1_000 {
        let c = ContingencyCounts::new(
            rng.random_range(0..3),
            rng.random_range(0..3),
            rng.random_range(0..3),
            rng.random_range(0..3),
        );
        let s = c.scores();
        for v in [
            s.hit_rate,
            s.false_alarm_rate,
            s.false_alarm_ratio,
            s.accuracy,
            s.csi,
            s.bias_score,
        ] {
            assert!(v.is_finite(), "{c:?} produced {v}");
            assert!(v >= 0.0);
        }
    }
}
