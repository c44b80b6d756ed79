//! Bounded-concurrency batch driver with inter-batch pacing.
//!
//! Splits an ordered work list into fixed-size groups, runs each group's
//! items concurrently, and hands every group's results to the caller as soon
//! as that group settles. Groups are strictly sequential: group N+1 never
//! starts before group N has settled and the pacing delay has elapsed. The
//! delay is skipped after the final group.
//!
//! Workers must be total. A worker that can fail encodes the failure into its
//! result type (the last-run worker coerces per-item failure to `None`) so a
//! single item can never abort its siblings.

use std::future::Future;

use futures::future::join_all;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub inter_batch_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 10,
            inter_batch_delay: Duration::from_millis(100),
        }
    }
}

/// Drives `worker` over `items` in paced groups of at most
/// `opts.batch_size`, calling `on_group` with each group's results (in item
/// order) before the next group starts. Holds no state between calls.
pub async fn run_batched<T, R, W, Fut, G>(
    items: Vec<T>,
    opts: &BatchOptions,
    mut worker: W,
    mut on_group: G,
) where
    W: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
    G: FnMut(Vec<R>),
{
    let batch_size = opts.batch_size.max(1);

    let mut remaining = items;
    let mut first = true;
    while !remaining.is_empty() {
        if !first {
            sleep(opts.inter_batch_delay).await;
        }
        first = false;

        let tail = remaining.split_off(batch_size.min(remaining.len()));
        let group = std::mem::replace(&mut remaining, tail);

        let results = join_all(group.into_iter().map(&mut worker)).await;
        on_group(results);
    }
}
