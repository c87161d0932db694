use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use future_awaits::sync;
use future_awaits::task::{Builder, Executor, SerialQueue, ThreadPool};

fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn smoke() {
    let pool = ThreadPool::new().unwrap();
    let (sender, receiver) = mpsc::channel();

    for i in 0..100 {
        let sender = sender.clone();
        pool.execute(Box::new(move || sender.send(i).unwrap()));
    }

    let mut values: Vec<i32> = receiver.iter().take(100).collect();
    values.sort();
    assert_eq!(values, (0..100).collect::<Vec<_>>());
}

#[test]
fn nested_blocking_does_not_deadlock() {
    let pool = ThreadPool::new().unwrap();
    let (sender, receiver) = mpsc::channel();

    let inner = pool.clone();
    pool.execute(Box::new(move || {
        // Block this worker on a job that can only run on another worker.
        let (completion, signal) = sync::channel();
        inner.execute(Box::new(move || completion.complete("inner")));
        sender.send(signal.wait(None)).unwrap();
    }));

    let res = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(res, Ok("inner"));
}

#[test]
fn max_threads_is_respected() {
    let pool = Builder::new().max_threads(2).build().unwrap();
    let (sender, receiver) = mpsc::channel();

    for _ in 0..6 {
        let sender = sender.clone();
        pool.execute(Box::new(move || {
            thread::sleep(Duration::from_millis(10));
            sender.send(()).unwrap();
        }));
    }

    assert_eq!(receiver.iter().take(6).count(), 6);
    assert!(pool.threads() <= 2);
}

#[test]
fn idle_threads_retire() {
    let pool = Builder::new()
        .idle_timeout(Duration::from_millis(20))
        .build()
        .unwrap();
    let (sender, receiver) = mpsc::channel();

    for _ in 0..8 {
        let sender = sender.clone();
        pool.execute(Box::new(move || {
            thread::sleep(Duration::from_millis(20));
            sender.send(()).unwrap();
        }));
    }
    assert_eq!(receiver.iter().take(8).count(), 8);

    // One thread always stays behind to wait for work.
    assert!(eventually(|| pool.threads() == 1));
    assert!(eventually(|| pool.idle_threads() == 1));
}

#[test]
fn survives_panics() {
    let pool = ThreadPool::builder().max_threads(1).build().unwrap();
    let (sender, receiver) = mpsc::channel();

    pool.execute(Box::new(|| panic!("boom")));
    pool.execute(Box::new(move || sender.send("still alive").unwrap()));

    assert_eq!(receiver.recv_timeout(Duration::from_secs(5)), Ok("still alive"));
}

#[test]
fn clones_share_one_pool() {
    let pool = ThreadPool::new().unwrap();
    let observer = pool.clone();
    let (sender, receiver) = mpsc::channel();

    pool.execute(Box::new(move || sender.send(()).unwrap()));
    receiver.recv().unwrap();

    drop(pool);
    // `observer` still keeps the pool alive.
    assert!(observer.threads() >= 1);

    let name = observer.name().to_string();
    assert_eq!(name, "future-awaits/worker");
    drop(observer);
}

#[test]
fn serial_queue_preserves_order() {
    let queue = SerialQueue::new("serial").unwrap();
    let (sender, receiver) = mpsc::channel();

    for i in 0..50 {
        let sender = sender.clone();
        queue.execute(Box::new(move || {
            if i % 7 == 0 {
                thread::sleep(Duration::from_millis(1));
            }
            sender.send(i).unwrap();
        }));
    }

    let order: Vec<i32> = receiver.iter().take(50).collect();
    assert_eq!(order, (0..50).collect::<Vec<_>>());
}

#[test]
fn interactive_queue_forbids_blocking() {
    let ui = SerialQueue::interactive("ui").unwrap();
    assert!(!ui.allows_blocking());
    assert!(ui.is_interactive());
    assert_eq!(ui.name(), "ui");

    let worker = SerialQueue::new("worker").unwrap();
    assert!(worker.allows_blocking());
}
