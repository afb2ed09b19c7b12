/*!
A feed composes one decoder with one dispatcher.

```
use zettabgp::dispatch::Dispatcher;
use zettabgp::feed::UpdateFeed;
use zettabgp::models::RouteUpdate;
use zettabgp::parser::ExaBgpDecoder;

let mut dispatcher = Dispatcher::new();
dispatcher.register_fn(|update: &RouteUpdate| {
    println!("{}", update);
    Ok(())
});

let mut feed = UpdateFeed::new(ExaBgpDecoder, dispatcher);
feed.process(r#"{"type": "state", "time": 1729362670.1}"#).unwrap();
assert_eq!(feed.stats().skipped, 1);
```
*/
use crate::dispatch::Dispatcher;
use crate::error::FeedError;
use crate::models::RouteUpdate;
use crate::parser::RouteUpdateDecoder;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Counters kept by an [UpdateFeed].
///
/// `inputs` counts every successfully decoded input, `skipped` the ones that were not route
/// updates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub inputs: u64,
    pub skipped: u64,
    pub announcements: u64,
    pub withdrawals: u64,
}

impl FeedStats {
    fn record(&mut self, updates: &[RouteUpdate]) {
        let announcements = updates.iter().filter(|u| u.is_announcement()).count() as u64;
        self.announcements += announcements;
        self.withdrawals += updates.len() as u64 - announcements;
    }
}

impl Display for FeedStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inputs: {}, skipped: {}, announcements: {}, withdrawals: {}",
            self.inputs, self.skipped, self.announcements, self.withdrawals
        )
    }
}

#[derive(Debug)]
pub struct UpdateFeed<D> {
    decoder: D,
    dispatcher: Dispatcher,
    stats: FeedStats,
}

impl<D: RouteUpdateDecoder> UpdateFeed<D> {
    pub fn new(decoder: D, dispatcher: Dispatcher) -> Self {
        UpdateFeed {
            decoder,
            dispatcher,
            stats: FeedStats::default(),
        }
    }

    /// Decodes one input and dispatches the resulting records.
    ///
    /// Returns the number of records dispatched. Inputs that are not route updates are counted
    /// as skipped and not dispatched. Inputs that fail to decode leave the counters untouched.
    pub fn process(&mut self, input: &D::Input) -> Result<usize, FeedError> {
        let updates = match self.decoder.decode(input)? {
            Some(updates) => updates,
            None => {
                self.stats.inputs += 1;
                self.stats.skipped += 1;
                return Ok(0);
            }
        };
        self.stats.inputs += 1;
        self.stats.record(&updates);
        self.dispatcher.dispatch(&updates)?;
        Ok(updates.len())
    }

    pub fn stats(&self) -> FeedStats {
        self.stats
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn into_parts(self) -> (D, Dispatcher) {
        (self.decoder, self.dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::parser::ExaBgpDecoder;
    use std::cell::RefCell;
    use std::rc::Rc;

    const UPDATE: &str = r#"{ "exabgp": "4.0.1", "time": 1729362672.5, "type": "update", "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" }, "asn": { "local": 1, "peer": 1 }, "direction": "receive", "message": { "update": { "attribute": { "origin": "igp", "local-preference": 100 }, "announce": { "ipv4 unicast": { "172.17.179.104": [ { "nlri": "1.1.0.0/24" }, { "nlri": "1.1.1.0/24" } ] } }, "withdraw": { "ipv4 unicast": [ { "nlri": "1.2.0.0/24" } ] } } } } }"#;

    #[test]
    fn test_process_counts_and_dispatches() {
        let seen = Rc::new(RefCell::new(0));
        let mut dispatcher = Dispatcher::new();
        let counter = seen.clone();
        dispatcher.register_fn(move |_: &RouteUpdate| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        let mut feed = UpdateFeed::new(ExaBgpDecoder, dispatcher);
        assert_eq!(feed.process(UPDATE).unwrap(), 3);
        assert_eq!(feed.process(r#"{"type": "notification"}"#).unwrap(), 0);
        assert!(matches!(
            feed.process("garbage"),
            Err(FeedError::Decode(DecodeError::InvalidJson(_)))
        ));

        assert_eq!(*seen.borrow(), 3);
        assert_eq!(
            feed.stats(),
            FeedStats {
                inputs: 2,
                skipped: 1,
                announcements: 2,
                withdrawals: 1,
            }
        );
    }

    #[test]
    fn test_listener_error_is_returned() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_fn(|_: &RouteUpdate| Err("broker down".into()));
        let mut feed = UpdateFeed::new(ExaBgpDecoder, dispatcher);
        match feed.process(UPDATE) {
            Err(FeedError::Dispatch(e)) => {
                assert_eq!(e.listener, 0);
                assert_eq!(e.source.to_string(), "broker down");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
