//! Bounded task pool: keep up to `limit` futures in flight, refill as each
//! one finishes, until the queue is empty.

use std::future::Future;

use anyhow::Result;
use tokio::task::JoinSet;

/// Runs `f` over every item with at most `limit` futures in flight at once.
/// Results come back in input order regardless of completion order.
///
/// A panicking task surfaces as an error from the whole run; item-level
/// failures belong in `R` and never tear down the pool.
pub async fn for_each_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let limit = limit.max(1);
    let mut queue = items.into_iter().enumerate();
    let mut set = JoinSet::new();
    let mut results: Vec<(usize, R)> = Vec::new();

    loop {
        while set.len() < limit {
            let Some((idx, item)) = queue.next() else {
                break;
            };
            let fut = f(item);
            set.spawn(async move { (idx, fut.await) });
        }

        if set.is_empty() {
            break;
        }
        let Some(res) = set.join_next().await else {
            break;
        };
        let pair = res.map_err(|e| anyhow::anyhow!("worker task join: {e}"))?;
        results.push(pair);
    }

    results.sort_by_key(|&(idx, _)| idx);
    Ok(results.into_iter().map(|(_, r)| r).collect())
}
