use super::fixtures::{bank, bank_over, scenario};
use crate::building::{BankId, Building, CarId, Direction};
use crate::dispatch::{BankSelection, DispatchPolicy, Dispatcher};
use crate::sim::{SimRng, SimTime, Stream};

fn building(banks: Vec<crate::sim::BankSpec>, floor_count: u32) -> Building {
    Building::from_spec(&scenario(floor_count, banks, 0.0).building)
}

fn assign(d: &mut Dispatcher, b: &mut Building, origin: u32, destination: u32) -> CarId {
    let bank = b.route(origin, destination).expect("routable");
    let call = b.add_call(vec![bank], origin, destination, SimTime::ZERO);
    d.assign(b.call(call), b.bank(bank), b.cars(), SimTime::ZERO)
}

fn park(b: &mut Building, car: usize, floor: u32) {
    // 把空闲轿厢挪到指定楼层：开一次门再关上
    let c = b.car_mut(CarId(car));
    c.request_stop(floor);
    while c.floor() != floor {
        let dir = Direction::toward(c.floor(), floor);
        if c.state() != crate::building::CarState::Moving {
            c.depart(dir, SimTime::ZERO);
        }
        let next = c.next_floor();
        c.arrive(next, SimTime::ZERO);
    }
    c.open_doors();
    c.close_doors(SimTime::ZERO);
}

#[test]
fn nearest_picks_closest_idle_car() {
    let mut b = building(vec![bank(1, 3)], 10);
    park(&mut b, 0, 0);
    park(&mut b, 1, 8);
    park(&mut b, 2, 4);
    let mut d = Dispatcher::new(DispatchPolicy::nearest(), SimRng::new(1));
    assert_eq!(assign(&mut d, &mut b, 6, 0), CarId(1));
    assert_eq!(assign(&mut d, &mut b, 3, 9), CarId(2));
    assert_eq!(assign(&mut d, &mut b, 1, 9), CarId(0));
}

#[test]
fn nearest_breaks_ties_by_lowest_id() {
    let mut b = building(vec![bank(1, 3)], 10);
    park(&mut b, 0, 2);
    park(&mut b, 1, 6);
    park(&mut b, 2, 6);
    let mut d = Dispatcher::new(DispatchPolicy::nearest(), SimRng::new(1));
    // 2 与 6 到 4 距离相同
    assert_eq!(assign(&mut d, &mut b, 4, 9), CarId(0));
    assert_eq!(assign(&mut d, &mut b, 6, 0), CarId(1));
}

#[test]
fn nearest_penalizes_busy_cars() {
    let mut b = building(vec![bank(1, 2)], 10);
    park(&mut b, 1, 4);
    // 0 号车在 0 层起步向上，运行中
    let c = b.car_mut(CarId(0));
    c.request_stop(9);
    c.depart(Direction::Up, SimTime::ZERO);

    let mut d = Dispatcher::new(
        DispatchPolicy::Nearest {
            moving_penalty: 3.0,
        },
        SimRng::new(1),
    );
    // 距离 2 + 惩罚 3 = 5 > 空闲车距离 2
    assert_eq!(assign(&mut d, &mut b, 2, 9), CarId(1));

    let mut d = Dispatcher::new(
        DispatchPolicy::Nearest {
            moving_penalty: 0.0,
        },
        SimRng::new(1),
    );
    assert_eq!(assign(&mut d, &mut b, 2, 9), CarId(0));
}

#[test]
fn assignment_never_leaves_the_call_bank() {
    // 低区组（0..=4）车都停在 0 层，高区组（0..=9）车停在 4 层
    let mut b = building(vec![bank_over(1, 2, 0, 4), bank(2, 2)], 10);
    park(&mut b, 2, 4);
    park(&mut b, 3, 4);
    for policy in [
        DispatchPolicy::nearest(),
        DispatchPolicy::Random,
        DispatchPolicy::Suitability,
    ] {
        let mut d = Dispatcher::new(policy, SimRng::new(3));
        for _ in 0..50 {
            let car = assign(&mut d, &mut b, 4, 2);
            assert_eq!(b.car(car).bank, BankId(0), "{policy:?}");
            let car = assign(&mut d, &mut b, 4, 8);
            assert_eq!(b.car(car).bank, BankId(1), "{policy:?}");
        }
    }
}

#[test]
fn random_assignment_is_uniform_over_bank() {
    let mut b = building(vec![bank(1, 4)], 10);
    let mut d = Dispatcher::new(DispatchPolicy::Random, SimRng::stream(11, Stream::Dispatch));
    let mut counts = [0usize; 4];
    let n = 40_000;
    for _ in 0..n {
        counts[assign(&mut d, &mut b, 0, 5).0] += 1;
    }
    let expected = n as f64 / 4.0;
    for c in counts {
        assert!(
            (c as f64 - expected).abs() / expected < 0.05,
            "counts not uniform: {counts:?}"
        );
    }
}

#[test]
fn random_assignment_is_reproducible_for_a_seed() {
    let picks = |seed| {
        let mut b = building(vec![bank(1, 5)], 10);
        let mut d = Dispatcher::new(DispatchPolicy::Random, SimRng::new(seed));
        (0..100)
            .map(|_| assign(&mut d, &mut b, 1, 7))
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(99), picks(99));
    assert_ne!(picks(99), picks(100));
}

#[test]
fn single_car_bank_is_trivial_for_every_policy() {
    let mut b = building(vec![bank(1, 1)], 5);
    for policy in [
        DispatchPolicy::nearest(),
        DispatchPolicy::Random,
        DispatchPolicy::Suitability,
    ] {
        let mut d = Dispatcher::new(policy, SimRng::new(0));
        assert_eq!(assign(&mut d, &mut b, 3, 1), CarId(0));
    }
}

#[test]
fn suitability_prefers_car_coming_toward_the_call() {
    let mut b = building(vec![bank(1, 2)], 10);
    // 0 号车在 5 层向上运行；1 号车空闲在 8 层
    let c = b.car_mut(CarId(0));
    c.request_stop(9);
    c.depart(Direction::Up, SimTime::ZERO);
    c.arrive(1, SimTime::ZERO);
    c.arrive(2, SimTime::ZERO);
    c.arrive(3, SimTime::ZERO);
    c.arrive(4, SimTime::ZERO);
    c.arrive(5, SimTime::ZERO);
    park(&mut b, 1, 8);

    let mut d = Dispatcher::new(DispatchPolicy::Suitability, SimRng::new(0));
    // 驶离者得 1 分，空闲车得 N+2-d = 10+2-5 = 7 分
    assert_eq!(assign(&mut d, &mut b, 3, 0), CarId(1));
    // 呼叫在 7 层：0 号车向上驶来（同向）10+2-2 = 10，空闲车 10+2-1 = 11
    assert_eq!(assign(&mut d, &mut b, 7, 9), CarId(1));
    // 呼叫在 6 层、向下：0 号车反向驶来 10+1-1 = 10，空闲车 10+2-2 = 10，同分取小 id
    assert_eq!(assign(&mut d, &mut b, 6, 0), CarId(0));
}

#[test]
fn bank_selection_picks_narrowest_all_or_one_at_random() {
    // 低区组 0..=4 比全楼组窄，排在前面
    let b = building(vec![bank(2, 1), bank_over(1, 1, 0, 4)], 10);
    let candidates = b.serving_banks(1, 3);
    assert_eq!(candidates, vec![BankId(1), BankId(0)]);
    assert_eq!(b.route(1, 3), Some(BankId(1)));
    assert_eq!(b.serving_banks(1, 8), vec![BankId(0)]);

    let mut d = Dispatcher::new(DispatchPolicy::nearest(), SimRng::new(5));
    assert_eq!(
        d.select_banks(BankSelection::Narrowest, candidates.clone()),
        vec![BankId(1)]
    );
    assert_eq!(
        d.select_banks(BankSelection::All, candidates.clone()),
        candidates
    );

    let mut counts = [0usize; 2];
    let n = 10_000;
    for _ in 0..n {
        let picked = d.select_banks(BankSelection::Random, candidates.clone());
        assert_eq!(picked.len(), 1);
        counts[picked[0].0] += 1;
    }
    for c in counts {
        assert!((c as f64 / n as f64 - 0.5).abs() < 0.03, "{counts:?}");
    }
}

#[test]
fn random_bank_selection_with_one_candidate_draws_nothing() {
    let mut a = Dispatcher::new(DispatchPolicy::Random, SimRng::new(8));
    let mut b = Dispatcher::new(DispatchPolicy::Random, SimRng::new(8));
    assert_eq!(
        a.select_banks(BankSelection::Random, vec![BankId(3)]),
        vec![BankId(3)]
    );
    // a 没有消耗随机数，两边后续的随机派梯结果一致
    let mut bld = building(vec![bank(1, 6)], 10);
    for _ in 0..20 {
        assert_eq!(assign(&mut a, &mut bld, 0, 5), assign(&mut b, &mut bld, 0, 5));
    }
}

#[test]
fn policies_and_bank_selections_parse_from_cli_names() {
    assert_eq!("nearest".parse::<DispatchPolicy>(), Ok(DispatchPolicy::nearest()));
    assert_eq!("random".parse::<DispatchPolicy>(), Ok(DispatchPolicy::Random));
    assert_eq!("suitability".parse::<DispatchPolicy>(), Ok(DispatchPolicy::Suitability));
    assert!("closest".parse::<DispatchPolicy>().is_err());

    assert_eq!("narrowest".parse::<BankSelection>(), Ok(BankSelection::Narrowest));
    assert_eq!("all".parse::<BankSelection>(), Ok(BankSelection::All));
    assert_eq!("random".parse::<BankSelection>(), Ok(BankSelection::Random));
    assert!("every".parse::<BankSelection>().is_err());
}

#[test]
fn nearest_penalizes_cars_standing_with_doors_open() {
    let mut b = building(vec![bank(1, 2)], 10);
    park(&mut b, 0, 2);
    park(&mut b, 1, 4);
    // 0 号车在 2 层开门停靠
    let c = b.car_mut(CarId(0));
    c.request_stop(2);
    c.open_doors();
    assert_eq!(c.state(), crate::building::CarState::DoorOpen);

    let mut d = Dispatcher::new(
        DispatchPolicy::Nearest {
            moving_penalty: 3.0,
        },
        SimRng::new(1),
    );
    // 距离 0 + 惩罚 3 > 空闲车距离 2
    assert_eq!(assign(&mut d, &mut b, 2, 9), CarId(1));

    let mut d = Dispatcher::new(
        DispatchPolicy::Nearest {
            moving_penalty: 1.0,
        },
        SimRng::new(1),
    );
    assert_eq!(assign(&mut d, &mut b, 2, 9), CarId(0));
}
