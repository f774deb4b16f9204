//! `redeliver uuid` – print random UUIDs.

use redeliver_core::id::UuidProducer;

pub fn run_uuid(count: usize) {
    let producer = UuidProducer;
    for _ in 0..count {
        println!("{}", producer.produce());
    }
}
