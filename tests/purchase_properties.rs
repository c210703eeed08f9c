//! Purchase properties checked against every store implementation
//!
//! Each property runs on the in-memory store, the shared store and the
//! text-file store, so the stores are held to the same contract.

use rstest::rstest;
use rust_decimal::Decimal;
use soda_machine::{
    Coin, DataStore, InMemoryStore, MachineError, Product, PurchaseOutcome, Rejection, SharedStore,
    SodaMachine, StoreConfig, TextFileStore,
};
use std::thread;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
enum StoreKind {
    Memory,
    Shared,
    TextFile,
}

struct Seed {
    products: Vec<Product>,
    coins: Vec<Coin>,
}

impl Seed {
    fn new(cokes: usize, quarters: usize, dimes: usize, nickels: usize) -> Self {
        let mut coins = vec![Coin::quarter(); quarters];
        coins.extend(vec![Coin::dime(); dimes]);
        coins.extend(vec![Coin::nickel(); nickels]);
        Seed {
            products: vec![Product::new("Coke", "1"); cokes],
            coins,
        }
    }
}

fn price() -> Decimal {
    Decimal::new(75, 2)
}

fn cents(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

fn seeded<S: DataStore>(mut store: S, seed: &Seed) -> SodaMachine<S> {
    store.add_products(seed.products.clone()).unwrap();
    store.add_coins(seed.coins.clone()).unwrap();
    SodaMachine::new(store)
}

/// Run `$body` with `$machine` bound to a seeded machine over the given store kind
macro_rules! on_store {
    ($kind:expr, $seed:expr, |$machine:ident| $body:block) => {{
        let dir = TempDir::new().unwrap();
        match $kind {
            StoreKind::Memory => {
                let mut $machine = seeded(InMemoryStore::new(price()), $seed);
                $body
            }
            StoreKind::Shared => {
                let mut $machine = seeded(SharedStore::new(price()), $seed);
                $body
            }
            StoreKind::TextFile => {
                let store =
                    TextFileStore::initialize(StoreConfig::in_dir(dir.path()), price(), false)
                        .unwrap();
                let mut $machine = seeded(store, $seed);
                $body
            }
        }
    }};
}

/// Everything a rejected purchase must leave alone
#[derive(Debug, PartialEq)]
struct Snapshot {
    coins: Vec<Coin>,
    products: Vec<Product>,
    credit: Decimal,
    cash: Decimal,
    income: Decimal,
}

fn snapshot<S: DataStore>(machine: &SodaMachine<S>, user: &str) -> Snapshot {
    Snapshot {
        coins: machine.coin_inventory().unwrap(),
        products: machine.product_inventory().unwrap(),
        credit: machine.deposited_total(user).unwrap(),
        cash: machine.current_cash_on_hand().unwrap(),
        income: machine.total_income().unwrap(),
    }
}

#[rstest]
fn deposits_add_up(#[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind) {
    on_store!(kind, &Seed::new(0, 0, 0, 0), |machine| {
        let amounts = [cents(5), cents(10), cents(25), cents(100), Decimal::ZERO, cents(333)];
        let mut expected = Decimal::ZERO;

        for amount in amounts {
            expected += amount;
            assert_eq!(machine.deposit("ann", amount).unwrap(), expected);
        }
        assert_eq!(machine.deposited_total("ann").unwrap(), expected);
        assert_eq!(machine.deposited_total("bob").unwrap(), Decimal::ZERO);
    });
}

#[rstest]
#[case::insufficient_funds(Seed::new(3, 4, 4, 4), cents(50), "Coke")]
#[case::out_of_stock(Seed::new(3, 4, 4, 4), cents(100), "Sprite")]
#[case::no_coins(Seed::new(3, 0, 0, 0), cents(175), "Coke")]
#[case::greedy_dead_end(Seed::new(3, 1, 3, 0), cents(105), "Coke")]
#[case::not_enough_nickels(Seed::new(3, 0, 0, 2), cents(100), "Coke")]
fn rejections_change_nothing(
    #[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind,
    #[case] seed: Seed,
    #[case] credit: Decimal,
    #[case] product: &str,
) {
    on_store!(kind, &seed, |machine| {
        machine.deposit("ann", credit).unwrap();
        let before = snapshot(&machine, "ann");

        let outcome = machine.request_product(&Product::named(product), "ann").unwrap();

        assert!(outcome.rejection().is_some(), "expected a rejection, got {:?}", outcome);
        assert!(outcome.change().is_empty());
        assert_eq!(snapshot(&machine, "ann"), before);
    });
}

#[rstest]
fn successful_purchases_pay_exact_change(
    #[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind,
) {
    // Every multiple of 0.05 from the price up to 3.00
    for step in 0..=45 {
        let credit = price() + cents(5 * step);

        on_store!(kind, &Seed::new(1, 12, 5, 5), |machine| {
            machine.deposit("ann", credit).unwrap();
            let coins_before = Coin::total(&machine.coin_inventory().unwrap());

            let outcome = machine.request_product(&Product::named("Coke"), "ann").unwrap();

            let purchase = match outcome {
                PurchaseOutcome::Dispensed(purchase) => purchase,
                other => panic!("credit {} should buy a Coke, got {:?}", credit, other),
            };
            assert_eq!(purchase.change_total(), credit - price());
            assert_eq!(machine.deposited_total("ann").unwrap(), Decimal::ZERO);
            assert_eq!(machine.current_cash_on_hand().unwrap(), credit);
            assert_eq!(machine.total_income().unwrap(), credit);
            assert_eq!(
                Coin::total(&machine.coin_inventory().unwrap()),
                coins_before - purchase.change_total()
            );
            assert!(machine.product_inventory().unwrap().is_empty());
        });
    }
}

#[rstest]
fn empty_cash_keeps_income(
    #[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind,
) {
    on_store!(kind, &Seed::new(2, 4, 0, 0), |machine| {
        machine.deposit("ann", cents(100)).unwrap();
        machine.request_product(&Product::named("Coke"), "ann").unwrap();
        machine.deposit("bob", cents(75)).unwrap();
        machine.request_product(&Product::named("Coke"), "bob").unwrap();

        assert_eq!(machine.empty_cash_on_hand().unwrap(), cents(175));
        assert_eq!(machine.current_cash_on_hand().unwrap(), Decimal::ZERO);
        assert_eq!(machine.total_income().unwrap(), cents(175));
        assert_eq!(machine.empty_cash_on_hand().unwrap(), Decimal::ZERO);
    });
}

#[rstest]
fn rejected_credit_can_be_refunded(
    #[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind,
) {
    on_store!(kind, &Seed::new(0, 0, 0, 0), |machine| {
        machine.deposit("ann", cents(175)).unwrap();

        let outcome = machine.request_product(&Product::named("Coke"), "ann").unwrap();
        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::OutOfStock {
                product: "Coke".to_string()
            })
        );

        machine.issue_refund("ann").unwrap();
        assert_eq!(machine.deposited_total("ann").unwrap(), Decimal::ZERO);
        assert_eq!(machine.total_income().unwrap(), Decimal::ZERO);
    });
}

#[rstest]
fn padded_user_ids_name_the_same_user(
    #[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind,
) {
    on_store!(kind, &Seed::new(1, 4, 0, 0), |machine| {
        assert_eq!(machine.deposit(" ann", cents(50)).unwrap(), cents(50));
        assert_eq!(machine.deposit("ann  ", cents(50)).unwrap(), cents(100));
        assert_eq!(machine.deposited_total(" ann").unwrap(), cents(100));
        assert_eq!(machine.deposited_total("ann").unwrap(), cents(100));

        let outcome = machine.request_product(&Product::named("Coke"), " ann ").unwrap();
        assert_eq!(outcome.change(), &[Coin::quarter()]);
        assert_eq!(machine.deposited_total("ann").unwrap(), Decimal::ZERO);
    });
}

#[rstest]
fn overflowing_deposit_is_refused(
    #[values(StoreKind::Memory, StoreKind::Shared, StoreKind::TextFile)] kind: StoreKind,
) {
    on_store!(kind, &Seed::new(0, 0, 0, 0), |machine| {
        machine.deposit("ann", Decimal::MAX).unwrap();

        let error = machine.deposit("ann", cents(5)).unwrap_err();

        assert!(matches!(error, MachineError::ArithmeticOverflow { .. }));
        assert!(!error.is_fatal());
        assert_eq!(machine.deposited_total("ann").unwrap(), Decimal::MAX);
    });
}

#[test]
fn concurrent_sessions_never_oversell() {
    let store = seeded(SharedStore::new(price()), &Seed::new(20, 40, 0, 0)).into_store();

    let dispensed: usize = thread::scope(|scope| {
        let sessions: Vec<_> = (0..8)
            .map(|i| {
                let mut machine = SodaMachine::new(store.clone());
                let user = format!("user{}", i);
                scope.spawn(move || {
                    let mut dispensed = 0;
                    for _ in 0..3 {
                        machine.deposit(&user, cents(100)).unwrap();
                        match machine.request_product(&Product::named("Coke"), &user).unwrap() {
                            PurchaseOutcome::Dispensed(purchase) => {
                                assert_eq!(purchase.change, vec![Coin::quarter()]);
                                dispensed += 1;
                            }
                            PurchaseOutcome::Rejected(_) => machine.issue_refund(&user).unwrap(),
                        }
                    }
                    dispensed
                })
            })
            .collect();
        sessions.into_iter().map(|s| s.join().unwrap()).sum()
    });

    let inventory = store.snapshot();
    assert_eq!(dispensed, 20);
    assert!(inventory.products.is_empty());
    assert_eq!(inventory.coins.len(), 20);
    assert_eq!(inventory.financials.total_income, cents(2000));
    assert_eq!(inventory.financials.cash_on_hand, cents(2000));
}
