use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

use future_awaits::sync::Completion;
use future_awaits::task::{Inline, SerialQueue, ThreadPool};
use future_awaits::{Await, BridgeError, Future, PairError};

fn thread_name() -> String {
    thread::current().name().unwrap_or("<unnamed>").to_string()
}

#[test]
fn evaluates_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let future = Future::<_, ()>::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(10));
        Ok(99)
    });

    let barrier = Arc::new(Barrier::new(100));
    let handles: Vec<_> = (0..100)
        .map(|_| {
            let future = future.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                future.get()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(99));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn lazy_until_needed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let future = Future::<u8, ()>::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    });
    let mapped = future.map(|v| v + 1).and_then(|v| Future::ok(v * 10));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!future.is_evaluated());

    assert_eq!(mapped.get(), Ok(20));
    assert!(future.is_evaluated());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn clones_share_the_cache() {
    let future = Future::<u8, ()>::new(|| Ok(5));
    let alias = future.clone();
    let converted = Future::from(&future);

    assert_eq!(alias.get(), Ok(5));
    assert!(future.is_evaluated());
    assert!(converted.is_evaluated());
}

#[test]
fn map_laws() {
    let future = Future::<i32, String>::ok(3);
    assert_eq!(future.map(|v| *v).get(), future.get());

    let f = |v: &i32| v + 1;
    let g = |v: &i32| v * 2;
    assert_eq!(future.map(f).map(g).get(), future.map(move |v| g(&f(v))).get());

    let failed = Future::<i32, String>::err("nope".to_string());
    assert_eq!(failed.map(|v| v + 1).get(), Err("nope".to_string()));
}

#[test]
fn map_err() {
    let failed = Future::<u8, u16>::err(404);
    let described = failed.map_err(|code| format!("HTTP {}", code));
    assert_eq!(described.get(), Err("HTTP 404".to_string()));

    let ok = Future::<u8, u16>::ok(1);
    assert_eq!(ok.map_err(|code| code.to_string()).get(), Ok(1));
}

#[test]
fn and_then_runs_in_order() {
    let (sender, receiver) = mpsc::channel();

    let first_sender = sender.clone();
    let first = Future::<u8, ()>::new(move || {
        first_sender.send("first").unwrap();
        Ok(1)
    });
    let second = first.and_then(move |v| {
        let v = *v;
        Future::new(move || {
            sender.send("second").unwrap();
            Ok(v + 1)
        })
    });

    assert_eq!(second.get(), Ok(2));
    assert_eq!(receiver.try_iter().collect::<Vec<_>>(), ["first", "second"]);
}

#[test]
fn and_then_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let failed = Future::<u8, &str>::err("boom").and_then(move |v| {
        counter.fetch_add(1, Ordering::SeqCst);
        Future::ok(*v)
    });

    assert_eq!(failed.get(), Err("boom"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn chain_tags_the_failing_stage() {
    let port = Future::<u16, &str>::ok(8080);

    let connected = port.chain(|port| Future::<String, u8>::ok(format!("localhost:{}", port)));
    assert_eq!(connected.get(), Ok("localhost:8080".to_string()));

    let refused = port.chain(|_| Future::<String, u8>::err(111));
    assert_eq!(refused.get(), Err(PairError::Second(111)));

    let missing =
        Future::<u16, &str>::err("no port").chain(|_| Future::<String, u8>::ok("x".into()));
    assert_eq!(missing.get(), Err(PairError::First("no port")));
}

#[test]
fn callbacks_on_pool() {
    let pool = ThreadPool::new().unwrap();
    let (sender, receiver) = mpsc::channel();

    let future = Future::<u8, ()>::new(|| Ok(3));
    let success = sender.clone();
    let failure = sender.clone();
    future
        .then(&pool, move |res| sender.send(format!("then {:?}", res)).unwrap())
        .on_success(&pool, move |v| success.send(format!("success {}", v)).unwrap())
        .on_failure(&pool, move |_| failure.send("failure".to_string()).unwrap());

    let mut seen: Vec<String> = receiver.iter().take(2).collect();
    seen.sort();
    assert_eq!(seen, ["success 3", "then Ok(3)"]);
    assert!(receiver.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn callbacks_inline() {
    let (sender, receiver) = mpsc::channel();

    Future::<u8, &str>::err("bad").on_failure(&Inline, move |err| sender.send(*err).unwrap());

    assert_eq!(receiver.try_recv(), Ok("bad"));
}

#[test]
fn interactive_queue_never_evaluates() {
    let ui = SerialQueue::interactive("ui").unwrap();
    let (sender, receiver) = mpsc::channel();

    let builder_sender = sender.clone();
    let future = Future::<u8, ()>::new(move || {
        thread::sleep(Duration::from_millis(20));
        builder_sender.send(("builder", thread_name())).unwrap();
        Ok(1)
    });

    future.then(&ui, move |res| {
        assert_eq!(*res, Ok(1));
        sender.send(("callback", thread_name())).unwrap();
    });

    let (stage, name) = receiver.recv().unwrap();
    assert_eq!(stage, "builder");
    assert_ne!(name, "ui");

    let (stage, name) = receiver.recv().unwrap();
    assert_eq!(stage, "callback");
    assert_eq!(name, "ui");
}

#[test]
fn from_callback() {
    let waiter = Await::new().on(ThreadPool::new().unwrap());

    let future = Future::from_callback(&waiter, |done: Completion<Result<u32, String>>| {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            done.succeed(12);
        });
    });

    assert!(!future.is_evaluated());
    assert_eq!(future.get(), Ok(12));
}

#[test]
fn on_error_ignores_sentinels() {
    let pool = ThreadPool::new().unwrap();
    let (sender, receiver) = mpsc::channel();

    let timed_out = Future::from_callback(
        &Await::new().timeout(Duration::from_millis(10)),
        |done: Completion<Result<u8, &'static str>>| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                done.fail("late");
            });
        },
    );

    let failure = sender.clone();
    timed_out
        .on_error(&pool, move |err| sender.send(format!("error {}", err)).unwrap())
        .on_failure(&pool, move |err| failure.send(format!("failure {}", err)).unwrap());

    assert_eq!(receiver.recv().unwrap(), "failure operation has timed out");
    assert!(receiver.recv_timeout(Duration::from_millis(50)).is_err());

    let (sender, receiver) = mpsc::channel();
    let refused = Future::<u8, _>::err(BridgeError::Wrapped("refused"));
    refused.on_error(&pool, move |err| sender.send(*err).unwrap());
    assert_eq!(receiver.recv().unwrap(), "refused");
}

#[test]
fn infallible_value() {
    let future = future_awaits::future::combine::wait2_omitting_errors(
        &Future::<u8, ()>::ok(1),
        &Future::<u8, ()>::err(()),
    );
    assert_eq!(*future.value(), (Some(1), None));
}

#[test]
#[should_panic = "builder exploded"]
fn panicking_builder() {
    let future = Future::<u8, ()>::new(|| panic!("builder exploded"));
    let _ = future.get();
}
