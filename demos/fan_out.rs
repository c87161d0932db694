//! Fetches a few fake records concurrently and combines them.

use std::thread;
use std::time::Duration;

use future_awaits::future::combine;
use future_awaits::task::ThreadPool;
use future_awaits::{Await, BridgeError, Future, MultiAwait, Operation};

fn fetch(id: u32) -> Operation<String, String> {
    Box::new(move || {
        thread::sleep(Duration::from_millis(u64::from(40 - id * 10)));
        if id == 3 {
            Err(BridgeError::Wrapped(format!("record {} is missing", id)))
        } else {
            Ok(format!("record {}", id))
        }
    })
}

fn main() {
    femme::start(log::LevelFilter::Info).unwrap();

    let pool = ThreadPool::builder().name("fan-out").build().unwrap();
    let waiter = Await::new().on(pool.clone()).timeout(Duration::from_secs(1));

    // Records come back in request order, even though later requests finish first.
    println!("all: {:?}", waiter.run_all((0..3).map(fetch)));
    println!("with failure: {:?}", waiter.run_all((0..4).map(fetch)));
    println!("omitting errors: {:?}", waiter.run_omitting_errors((0..4).map(fetch)));

    let pair = MultiAwait::new().on(pool).run(
        || Ok::<_, BridgeError<()>>(42u16),
        || Ok::<_, BridgeError<()>>("mixed types".to_string()),
    );
    println!("pair: {:?}", pair);

    let width = Future::<u32, String>::new(|| Ok(640));
    let height = Future::<u32, String>::new(|| Ok(480));
    let area = combine::combine2(&waiter, &width, &height).map(|(w, h)| w * h);
    println!("area: {:?}", area.get());
}
