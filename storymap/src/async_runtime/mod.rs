//! Running background futures on the current thread.
//!
//! Deck handles are shared through `Rc`, so their futures are not `Send`. On the web they run on
//! the browser event loop, on native targets they must be spawned inside a `tokio::task::LocalSet`.

use std::future::Future;

/// Spawns a future on the current thread without waiting for its result.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<T>(future: T)
where
    T: Future + 'static,
    T::Output: 'static,
{
    tokio::task::spawn_local(future);
}

/// Spawns a future on the current thread without waiting for its result.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<T>(future: T)
where
    T: Future + 'static,
    T::Output: 'static,
{
    wasm_bindgen_futures::spawn_local(async {
        future.await;
    });
}
