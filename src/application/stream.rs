//! Stream combinators shared by the store and the config monitor.

use std::future::{self, Future};

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::watch;

/// Drop items whose key equals the key of the last emitted item.
///
/// The first item always passes. Non-adjacent repeats (A, B, A) all pass.
pub fn distinct_until_changed_by<S, K, F>(stream: S, mut key: F) -> impl Stream<Item = S::Item>
where
    S: Stream,
    K: PartialEq,
    F: FnMut(&S::Item) -> K,
{
    let mut last: Option<K> = None;
    stream.filter_map(move |item| {
        let current = key(&item);
        let changed = last.as_ref() != Some(&current);
        if changed {
            last = Some(current);
        }
        future::ready(changed.then_some(item))
    })
}

/// Re-run `query` now and after every bump of `changes`.
///
/// A query returning `None` (a failed read, already logged by the caller)
/// emits nothing; the stream waits for the next change instead. The stream
/// ends when the sending side of `changes` is dropped.
pub fn watch_query<T, F, Fut>(changes: watch::Receiver<u64>, query: F) -> BoxStream<'static, T>
where
    T: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    stream::unfold(
        (changes, query, true),
        |(mut changes, mut query, first)| async move {
            if !first && changes.changed().await.is_err() {
                return None;
            }
            loop {
                let _version = *changes.borrow_and_update();
                if let Some(value) = query().await {
                    return Some((value, (changes, query, false)));
                }
                if changes.changed().await.is_err() {
                    return None;
                }
            }
        },
    )
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn distinct_collapses_adjacent_repeats_only() {
        let items = stream::iter(vec!["a", "a", "b", "b", "a", "c", "c"]);
        let out: Vec<_> = distinct_until_changed_by(items, |s| *s).collect().await;
        assert_eq!(out, vec!["a", "b", "a", "c"]);
    }

    #[tokio::test]
    async fn distinct_uses_key_not_whole_item() {
        let items = stream::iter(vec![("x", 1), ("x", 2), ("y", 3)]);
        let out: Vec<_> = distinct_until_changed_by(items, |(id, _)| *id).collect().await;
        assert_eq!(out, vec![("x", 1), ("y", 3)]);
    }

    #[tokio::test]
    async fn watch_query_emits_initially_and_on_change() {
        let (tx, rx) = watch::channel(0_u64);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut values = watch_query(rx, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Some(n) }
        });

        assert_eq!(values.next().await, Some(0));
        tx.send_modify(|v| *v += 1);
        assert_eq!(values.next().await, Some(1));
        drop(tx);
        assert_eq!(values.next().await, None);
    }

    #[tokio::test]
    async fn watch_query_skips_failed_reads() {
        let (tx, rx) = watch::channel(0_u64);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut values = watch_query(rx, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { (n > 0).then_some(n) }
        });

        let next = tokio::spawn(async move { values.next().await });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        tx.send_modify(|v| *v += 1);
        assert_eq!(next.await.unwrap(), Some(1));
    }
}
