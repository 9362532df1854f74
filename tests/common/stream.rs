//! Walk collection helpers.

use futures_core::Stream;
use std::future::poll_fn;
use std::pin::Pin;
use std::task::Context;

/// Poll a stream until it ends or `limit` items have arrived, keeping
/// errors in place.
pub async fn collect_stream<S, T, E>(mut stream: S, limit: usize) -> Vec<Result<T, E>>
where
    S: Stream<Item = Result<T, E>> + Unpin,
{
    let mut results = Vec::new();
    while results.len() < limit {
        match poll_fn(|cx: &mut Context<'_>| Pin::new(&mut stream).poll_next(cx)).await {
            Some(result) => results.push(result),
            None => break,
        }
    }
    results
}
