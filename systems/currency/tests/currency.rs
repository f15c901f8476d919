use std::time::Duration;

use lost_drone_core::{Command, Event};
use lost_drone_system_currency::{Config, CurrencyGainer};

fn income(millis: u64) -> Event {
    Event::IncomeTick {
        dt: Duration::from_millis(millis),
    }
}

#[test]
fn grants_once_per_interval() {
    let mut gainer = CurrencyGainer::new(Config::new(5, Duration::from_millis(500)));
    let mut commands = Vec::new();

    for _ in 0..4 {
        gainer.handle(&[income(250)], &mut commands);
    }

    assert_eq!(
        commands,
        vec![
            Command::GainCurrency { amount: 5 },
            Command::GainCurrency { amount: 5 },
        ]
    );
    assert_eq!(gainer.granted(), 10);
}

#[test]
fn plain_clock_ticks_earn_nothing() {
    let mut gainer = CurrencyGainer::new(Config::new(5, Duration::from_millis(100)));
    let mut commands = Vec::new();

    gainer.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(10),
        }],
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn long_ticks_combine_into_one_grant() {
    let mut gainer = CurrencyGainer::new(Config::new(3, Duration::from_millis(100)));
    let mut commands = Vec::new();

    gainer.handle(&[income(250), income(100)], &mut commands);

    assert_eq!(commands, vec![Command::GainCurrency { amount: 9 }]);
}

#[test]
fn zero_interval_or_amount_never_grants() {
    let mut commands = Vec::new();
    CurrencyGainer::new(Config::new(0, Duration::from_millis(10))).handle(&[income(1_000)], &mut commands);
    CurrencyGainer::new(Config::new(10, Duration::ZERO)).handle(&[income(1_000)], &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn initialize_discards_partial_progress() {
    let mut gainer = CurrencyGainer::new(Config::new(1, Duration::from_secs(1)));
    let mut commands = Vec::new();
    gainer.handle(&[income(900)], &mut commands);

    gainer.initialize();
    gainer.handle(&[income(900)], &mut commands);

    assert!(commands.is_empty());
    assert_eq!(gainer.granted(), 0);
}

#[test]
fn huge_ticks_saturate_into_one_grant() {
    let mut gainer = CurrencyGainer::new(Config::new(1, Duration::from_millis(1)));
    let mut commands = Vec::new();

    gainer.handle(
        &[Event::IncomeTick {
            dt: Duration::from_secs(10_000_000),
        }],
        &mut commands,
    );

    assert_eq!(commands, vec![Command::GainCurrency { amount: u32::MAX }]);
}
