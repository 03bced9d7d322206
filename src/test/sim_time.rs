use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
    assert_eq!(SimTime::from_secs_f64(1.5), SimTime(1_500_000_000));
    assert_eq!(SimTime::from_secs(4).as_secs_f64(), 4.0);
}

#[test]
fn sim_time_from_secs_f64_clamps_bad_input() {
    assert_eq!(SimTime::from_secs_f64(-1.0), SimTime::ZERO);
    assert_eq!(SimTime::from_secs_f64(f64::NAN), SimTime::ZERO);
    assert_eq!(SimTime::from_secs_f64(f64::INFINITY), SimTime::MAX);
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime::MAX);
}

#[test]
fn sim_time_arithmetic_saturates() {
    assert_eq!(SimTime(3).since(SimTime(5)), SimTime::ZERO);
    assert_eq!(SimTime(5).since(SimTime(3)), SimTime(2));
    assert_eq!(SimTime::MAX.saturating_add(SimTime(1)), SimTime::MAX);
    assert_eq!(SimTime(250).times(4), SimTime(1_000));
}
