use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use future_awaits::future::combine;
use future_awaits::task::ThreadPool;
use future_awaits::{Await, BridgeError, Future, PairError};

fn pooled() -> Await {
    Await::new().on(ThreadPool::new().unwrap())
}

fn slow<V: Send + Sync + 'static>(millis: u64, res: Result<V, String>) -> Future<V, String> {
    Future::new(move || {
        thread::sleep(Duration::from_millis(millis));
        res
    })
}

#[test]
fn combine_collects_in_argument_order() {
    let waiter = pooled();

    let id = slow(30, Ok(7u32));
    let name = slow(0, Ok("ferris".to_string()));
    let admin = slow(10, Ok(true));

    let res = combine::combine3(&waiter, &id, &name, &admin).get();
    assert_eq!(res, Ok((7, "ferris".to_string(), true)));
}

#[test]
fn combine_runs_in_parallel() {
    let waiter = pooled();
    let (sender, receiver) = mpsc::channel();

    // The first future can only finish after the second one has started.
    let first = Future::<u8, String>::new(move || {
        receiver.recv_timeout(Duration::from_secs(5)).map_err(|err| err.to_string())
    });
    let second = Future::<u8, String>::new(move || {
        sender.send(4).unwrap();
        Ok(2)
    });

    assert_eq!(combine::combine2(&waiter, &first, &second).get(), Ok((4, 2)));
}

#[test]
fn combine_fails_without_partial_values() {
    let waiter = pooled();

    let number = slow(0, Ok(1));
    let text = slow::<String>(10, Err("text unavailable".to_string()));

    let res = combine::combine2(&waiter, &number, &text).get();
    assert_eq!(
        res,
        Err(BridgeError::Wrapped(PairError::Second("text unavailable".to_string())))
    );
}

#[test]
fn combine_times_out() {
    let waiter = pooled().timeout(Duration::from_millis(20));

    let fast = slow(0, Ok(1u8));
    let stuck = slow(300, Ok(2u8));

    let res = combine::combine2(&waiter, &fast, &stuck).get();
    assert_eq!(res, Err(BridgeError::TimedOut));
}

#[test]
fn combine_omitting_errors() {
    let waiter = pooled();

    let a = slow(5, Ok(1u8));
    let b = slow::<u8>(0, Err("b".to_string()));
    let c = slow(0, Ok('c'));
    let d = slow::<bool>(5, Err("d".to_string()));

    let res = combine::combine4_omitting_errors(&waiter, &a, &b, &c, &d).get();
    assert_eq!(res, Ok((Some(1), None, Some('c'), None)));
}

#[test]
fn combine_six() {
    let waiter = pooled();

    let res = combine::combine6(
        &waiter,
        &slow(6, Ok(1u8)),
        &slow(5, Ok(2u16)),
        &slow(4, Ok(3u32)),
        &slow(3, Ok(4u64)),
        &slow(2, Ok(5i8)),
        &slow(1, Ok("six")),
    )
    .get();

    assert_eq!(res, Ok((1, 2, 3, 4, 5, "six")));
}

#[test]
fn wait_runs_in_order() {
    let order = Arc::new(AtomicUsize::new(0));

    let step = |expected: usize, value: &'static str| {
        let order = order.clone();
        Future::<_, String>::new(move || {
            assert_eq!(order.fetch_add(1, Ordering::SeqCst), expected);
            Ok(value)
        })
    };

    let res = combine::wait4(&step(0, "a"), &step(1, "b"), &step(2, "c"), &step(3, "d")).get();
    assert_eq!(res, Ok(("a", "b", "c", "d")));
    assert_eq!(order.load(Ordering::SeqCst), 4);
}

#[test]
fn wait_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));

    let counted = |res: Result<u8, &'static str>| {
        let calls = calls.clone();
        Future::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            res
        })
    };

    let res = combine::wait3(&counted(Ok(1)), &counted(Err("second")), &counted(Ok(3))).get();
    assert_eq!(res, Err("second"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn wait_omitting_errors() {
    let res = combine::wait5_omitting_errors(
        &Future::<u8, ()>::ok(1),
        &Future::<u8, ()>::err(()),
        &Future::<String, ()>::ok("three".to_string()),
        &Future::<u8, ()>::err(()),
        &Future::<char, ()>::ok('5'),
    );

    assert_eq!(
        res.value(),
        &(Some(1), None, Some("three".to_string()), None, Some('5'))
    );
}

#[derive(Clone, Debug, PartialEq)]
struct Offline;

#[derive(Clone, Debug, PartialEq)]
enum LookupError {
    NotFound(String),
}

#[test]
fn combine_pair_with_different_error_types() {
    let waiter = pooled();

    let count = Future::<i32, Offline>::new(|| Ok(3));
    let found = Future::<String, LookupError>::new(|| Ok("ferris".to_string()));
    let missing = Future::<String, LookupError>::err(LookupError::NotFound("crab".to_string()));
    let down = Future::<i32, Offline>::err(Offline);

    assert_eq!(
        combine::combine2(&waiter, &count, &found).get(),
        Ok((3, "ferris".to_string()))
    );
    assert_eq!(
        combine::combine2(&waiter, &count, &missing).get(),
        Err(BridgeError::Wrapped(PairError::Second(LookupError::NotFound(
            "crab".to_string()
        ))))
    );
    assert_eq!(
        combine::combine2(&waiter, &down, &found).get(),
        Err(BridgeError::Wrapped(PairError::First(Offline)))
    );
    assert_eq!(
        combine::combine2_omitting_errors(&waiter, &down, &found).get(),
        Ok((None, Some("ferris".to_string())))
    );
    assert_eq!(
        combine::combine2_omitting_errors(&waiter, &down, &missing).get(),
        Ok((None, None))
    );
}

#[test]
fn mixed_error_types_after_map_err() {
    let waiter = pooled();

    let port = Future::<u16, std::num::ParseIntError>::new(|| "80x".parse());
    let host = Future::<String, &str>::ok("example.org".to_string());
    let secure = Future::<bool, ()>::ok(true);

    let res = combine::combine3(
        &waiter,
        &port.map_err(|err| err.to_string()),
        &host.map_err(|err| err.to_string()),
        &secure.map_err(|_| String::new()),
    )
    .get();

    assert_eq!(
        res,
        Err(BridgeError::Wrapped("invalid digit found in string".to_string()))
    );
}

#[test]
fn combine_all() {
    let waiter = pooled();

    let futures: Vec<_> = (0..10u64).map(|i| slow(10 - i, Ok(i))).collect();
    assert_eq!(
        combine::combine_all(&waiter, &futures).get(),
        Ok((0..10).collect::<Vec<_>>())
    );

    let mut with_failure = futures.clone();
    with_failure.push(slow(0, Err("eleventh".to_string())));
    assert_eq!(
        combine::combine_all(&waiter, &with_failure).get(),
        Err(BridgeError::Wrapped("eleventh".to_string()))
    );

    let empty: Vec<Future<u8, String>> = Vec::new();
    assert_eq!(combine::combine_all(&waiter, &empty).get(), Ok(vec![]));
}

#[test]
fn combine_all_omitting_errors() {
    let waiter = pooled();

    let futures: Vec<_> = (0..6u8)
        .map(|i| {
            if i % 2 == 0 {
                slow(0, Ok(i))
            } else {
                slow(0, Err(format!("odd {}", i)))
            }
        })
        .collect();

    let values = combine::combine_all_omitting_errors(&waiter, &futures).get().unwrap();
    assert_eq!(values.into_iter().collect::<Vec<_>>(), [(0, 0), (2, 2), (4, 4)]);

    let failing = vec![slow::<u8>(0, Err("only".to_string()))];
    assert_eq!(
        combine::combine_all_omitting_errors(&waiter, &failing).get(),
        Err(BridgeError::Wrapped("only".to_string()))
    );
}
