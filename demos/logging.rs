//! Prints the crate's execution log on the standard output.

use std::thread;
use std::time::Duration;

use future_awaits::sync::Completion;
use future_awaits::task::ThreadPool;
use future_awaits::Await;

fn main() {
    femme::start(log::LevelFilter::Trace).unwrap();

    let pool = ThreadPool::new().unwrap();
    let waiter = Await::new().on(pool).timeout(Duration::from_millis(100));

    let res = waiter.run(|completion: Completion<Result<&str, ()>>| {
        thread::spawn(move || completion.succeed("Hello world!"));
    });
    log::info!("first operation: {:?}", res);

    let res = waiter.run(|completion: Completion<Result<&str, ()>>| {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            completion.succeed("too late");
        });
    });
    log::info!("second operation: {:?}", res);
}
