/*!
Fan-out of decoded route updates to registered listeners.

A [Dispatcher] owns an ordered list of listeners. [Dispatcher::dispatch] hands every record to
every listener, records in the outer loop and listeners in the inner loop, and stops at the first
listener error.

```
use zettabgp::dispatch::Dispatcher;
use zettabgp::models::RouteUpdate;

let mut dispatcher = Dispatcher::new();
dispatcher.register_fn(|update: &RouteUpdate| {
    println!("{}", update);
    Ok(())
});
assert_eq!(dispatcher.len(), 1);
```
*/
use crate::error::{DispatchError, ListenerError};
use crate::models::RouteUpdate;
use std::fmt::{Debug, Formatter};

/// A downstream consumer of route updates.
///
/// Any `FnMut(&RouteUpdate) -> Result<(), ListenerError>` is a listener.
pub trait RouteUpdateListener {
    fn on_update(&mut self, update: &RouteUpdate) -> Result<(), ListenerError>;
}

impl<F> RouteUpdateListener for F
where
    F: FnMut(&RouteUpdate) -> Result<(), ListenerError>,
{
    fn on_update(&mut self, update: &RouteUpdate) -> Result<(), ListenerError> {
        self(update)
    }
}

#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<Box<dyn RouteUpdateListener>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. The same listener may be registered more than once.
    pub fn register<L>(&mut self, listener: L)
    where
        L: RouteUpdateListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Appends a closure listener; unlike [Dispatcher::register] this lets the compiler infer the
    /// closure's argument type.
    pub fn register_fn<F>(&mut self, listener: F)
    where
        F: FnMut(&RouteUpdate) -> Result<(), ListenerError> + 'static,
    {
        self.register(listener);
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: RouteUpdateListener + 'static,
    {
        self.register(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers each record to each listener, in registration order.
    ///
    /// On the first listener error, fan-out stops and the error is returned. Listeners that come
    /// before the failing one have already received the failing record.
    pub fn dispatch(&mut self, updates: &[RouteUpdate]) -> Result<(), DispatchError> {
        for update in updates {
            for (index, listener) in self.listeners.iter_mut().enumerate() {
                listener
                    .on_update(update)
                    .map_err(|source| DispatchError {
                        listener: index,
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
