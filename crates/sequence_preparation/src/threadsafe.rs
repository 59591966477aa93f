use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

/// Clonable handle that serializes concurrent access to a single underlying
/// iterator.
///
/// Clones share one producer behind one mutex, so any number of consumer
/// threads can pull items without observing interleaved partial state; the
/// lock also serializes the producer's random draws. Dropping the last clone
/// frees the producer — there is no explicit teardown.
///
/// # Example
/// ```ignore
/// let generator = processor.frame_generator(&mapping, "train")?;
/// let shared = ThreadSafeIterator::new(generator);
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = shared.clone();
///         std::thread::spawn(move || {
///             while let Ok(Some(batch)) = shared.next_item() {
///                 // train on batch?
///             }
///         })
///     })
///     .collect();
/// ```
pub struct ThreadSafeIterator<I> {
    inner: Arc<Mutex<I>>,
}

impl<I> Clone for ThreadSafeIterator<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: Iterator> ThreadSafeIterator<I> {
    pub fn new(iterator: I) -> Self {
        Self {
            inner: Arc::new(Mutex::new(iterator)),
        }
    }

    /// Advances the shared iterator by one item.
    ///
    /// Blocks until the lock is available. Returns an error if the mutex was
    /// poisoned by a consumer that panicked mid-pull; the generator must be
    /// treated as dead at that point, matching the fatal-pull contract.
    pub fn next_item(&self) -> Result<Option<I::Item>> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Generator lock poisoned by a panicked consumer"))?;
        Ok(guard.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn serves_every_item_exactly_once_across_threads() {
        let shared = ThreadSafeIterator::new(0..400);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(item) = shared.next_item().unwrap() {
                        seen.push(item);
                    }
                    seen
                })
            })
            .collect();

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }

        assert_eq!(all.len(), 400);
        let distinct: HashSet<_> = all.iter().collect();
        assert_eq!(distinct.len(), 400);
    }

    #[test]
    fn exhausted_iterator_keeps_returning_none() {
        let shared = ThreadSafeIterator::new(std::iter::empty::<u32>());
        assert_eq!(shared.next_item().unwrap(), None);
        assert_eq!(shared.next_item().unwrap(), None);
    }

    #[test]
    fn poisoned_lock_surfaces_as_an_error() {
        let shared = ThreadSafeIterator::new(0..10);
        let poisoner = shared.clone();

        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(shared.next_item().is_err());
    }
}
