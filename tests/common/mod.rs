#![allow(dead_code)]

pub use vibewatch_test_utils::builders;
pub use vibewatch_test_utils::fake_trigger;
pub use vibewatch_test_utils::{init_tracing, with_timeout};

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Poll `captured` until it holds at least `n` entries.
pub async fn wait_for_captures(captured: &Arc<Mutex<Vec<String>>>, n: usize) -> Vec<String> {
    loop {
        {
            let guard = captured.lock().unwrap();
            if guard.len() >= n {
                return guard.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
