use super::fixtures::{bank, bank_over, scenario};
use crate::dispatch::{BankSelection, CallMode, DEFAULT_MOVING_PENALTY, DispatchPolicy};
use crate::error::ConfigError;
use crate::sim::{DestinationSpec, DwellSpec, FloorRange, FloorRates, ScenarioSpec};

#[test]
fn scenario_parses_minimal_json_with_defaults() {
    let raw = r#"
    {
        "building": {
            "floor_count": 6,
            "banks": [ { "id": 1, "car_count": 2, "speed": 1.5, "dwell": { "kind": "fixed", "secs": 2.0 } } ]
        },
        "arrival": { "rates": { "kind": "uniform", "rate": 0.1 }, "seed": 42 },
        "dispatch_policy": { "kind": "nearest" },
        "run_horizon_secs": 3600
    }
    "#;
    let spec: ScenarioSpec = serde_json::from_str(raw).expect("parse scenario");
    assert!(spec.name.is_none());
    assert!(spec.drain);
    assert_eq!(spec.call_mode, CallMode::SingleCar);
    assert_eq!(spec.bank_selection, BankSelection::Narrowest);
    assert!(matches!(spec.arrival.destinations, DestinationSpec::Uniform));
    assert_eq!(
        spec.dispatch_policy,
        DispatchPolicy::Nearest {
            moving_penalty: DEFAULT_MOVING_PENALTY
        }
    );
    let b = &spec.building.banks[0];
    assert_eq!(b.capacity(), 10);
    assert_eq!(b.served(6), FloorRange { lowest: 0, highest: 5 });
    assert_eq!(b.dwell, DwellSpec::Fixed { secs: 2.0 });
    spec.validate().expect("valid scenario");
}

#[test]
fn scenario_parses_per_floor_rates_and_lobby_profile() {
    let raw = r#"
    {
        "name": "morning",
        "building": {
            "floor_count": 4,
            "banks": [ { "id": 7, "car_count": 1, "speed": 1.0,
                         "dwell": { "kind": "uniform", "min_secs": 1.0, "max_secs": 3.0 },
                         "floors": { "lowest": 0, "highest": 3 }, "capacity": 4, "start_floor": 2 } ]
        },
        "arrival": {
            "rates": { "kind": "per_floor", "rates": [0.5, 0.0, 0.0, 0.1] },
            "destinations": { "kind": "lobby_heavy", "lobby_share": 0.9 },
            "seed": 1
        },
        "dispatch_policy": { "kind": "random" },
        "call_mode": "bank_broadcast",
        "bank_selection": "all",
        "run_horizon_secs": 60.0,
        "drain": false
    }
    "#;
    let spec: ScenarioSpec = serde_json::from_str(raw).expect("parse scenario");
    assert_eq!(spec.name.as_deref(), Some("morning"));
    assert_eq!(spec.call_mode, CallMode::BankBroadcast);
    assert_eq!(spec.bank_selection, BankSelection::All);
    assert_eq!(spec.dispatch_policy, DispatchPolicy::Random);
    assert!(!spec.drain);
    assert_eq!(spec.arrival.rates.rate_for(0), 0.5);
    assert_eq!(spec.arrival.rates.rate_for(3), 0.1);
    assert_eq!(spec.building.banks[0].capacity(), 4);
    spec.validate().expect("valid scenario");
}

#[test]
fn lobby_heavy_weights_split_between_lobby_and_other_floors() {
    let d = DestinationSpec::LobbyHeavy {
        lobby: 0,
        lobby_share: 0.6,
    };
    let w = d.conditional_weights(3, 5);
    assert_eq!(w[3], 0.0);
    assert!((w[0] - 0.6).abs() < 1e-12);
    for f in [1, 2, 4] {
        assert!((w[f] - 0.4 / 3.0).abs() < 1e-12);
    }
    // 大堂出发：其余楼层均匀
    assert_eq!(d.conditional_weights(0, 5), vec![0.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn validation_rejects_zero_cars() {
    let spec = scenario(6, vec![bank(1, 0)], 0.1);
    assert_eq!(spec.validate(), Err(ConfigError::ZeroCars(1)));
}

#[test]
fn validation_rejects_negative_rate() {
    let mut spec = scenario(3, vec![bank(1, 1)], 0.1);
    spec.arrival.rates = FloorRates::PerFloor {
        rates: vec![0.1, -0.5, 0.0],
    };
    assert_eq!(
        spec.validate(),
        Err(ConfigError::InvalidRate {
            floor: 1,
            rate: -0.5
        })
    );
}

#[test]
fn validation_rejects_rate_count_mismatch() {
    let mut spec = scenario(3, vec![bank(1, 1)], 0.1);
    spec.arrival.rates = FloorRates::PerFloor {
        rates: vec![0.1, 0.1],
    };
    assert_eq!(
        spec.validate(),
        Err(ConfigError::RateCountMismatch {
            expected: 3,
            got: 2
        })
    );
}

#[test]
fn validation_rejects_bank_range_outside_building() {
    let spec = scenario(6, vec![bank_over(1, 2, 0, 6)], 0.1);
    assert!(matches!(
        spec.validate(),
        Err(ConfigError::FloorOutOfRange { floor: 6, .. })
    ));
}

#[test]
fn validation_rejects_trip_no_bank_can_serve() {
    // 两组互不重叠：0..=2 与 3..=5，跨区行程无人服务
    let spec = scenario(6, vec![bank_over(1, 1, 0, 2), bank_over(2, 1, 3, 5)], 0.1);
    assert!(matches!(
        spec.validate(),
        Err(ConfigError::UnservedTrip { .. })
    ));

    // 只有区内客流时合法
    let mut spec = spec;
    spec.arrival.destinations = DestinationSpec::Matrix {
        weights: vec![
            vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0],
            vec![1.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
        ],
    };
    spec.validate().expect("zoned traffic is servable");
}

#[test]
fn validation_rejects_bad_speed_dwell_horizon_and_duplicates() {
    let mut b = bank(1, 1);
    b.speed = 0.0;
    assert!(matches!(
        scenario(4, vec![b], 0.1).validate(),
        Err(ConfigError::InvalidSpeed { bank: 1, .. })
    ));

    let mut b = bank(1, 1);
    b.dwell = DwellSpec::Uniform {
        min_secs: 3.0,
        max_secs: 1.0,
    };
    assert!(matches!(
        scenario(4, vec![b], 0.1).validate(),
        Err(ConfigError::InvalidDwell { bank: 1, .. })
    ));

    let mut spec = scenario(4, vec![bank(1, 1)], 0.1);
    spec.run_horizon_secs = 0.0;
    assert_eq!(spec.validate(), Err(ConfigError::InvalidHorizon(0.0)));

    let spec = scenario(4, vec![bank(1, 1), bank(1, 2)], 0.1);
    assert_eq!(spec.validate(), Err(ConfigError::DuplicateBank(1)));

    let spec = scenario(1, vec![bank(1, 1)], 0.1);
    assert_eq!(spec.validate(), Err(ConfigError::TooFewFloors(1)));

    let spec = scenario(4, vec![], 0.1);
    assert_eq!(spec.validate(), Err(ConfigError::NoBanks));
}

#[test]
fn validation_rejects_start_floor_outside_bank() {
    let mut b = bank_over(1, 1, 2, 5);
    b.start_floor = Some(0);
    let mut spec = scenario(6, vec![b], 0.0);
    spec.arrival.rates = FloorRates::Uniform { rate: 0.0 };
    assert!(matches!(
        spec.validate(),
        Err(ConfigError::FloorOutOfRange { what: "start", .. })
    ));
}
