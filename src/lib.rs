/*!
zettabgp normalizes BGP route updates from ExaBGP and MRT dumps into one per-prefix record type,
and fans the records out to registered listeners.

# Decoding

Each source has a decoder implementing [RouteUpdateDecoder]. A decoder takes one source message
and returns the [RouteUpdate]s it carries: all withdrawals first, then all announcements.

```
use zettabgp::parser::parse_exabgp_message;

let line = r#"{ "exabgp": "4.0.1", "time": 1729362672.5, "type": "update", "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" }, "asn": { "local": 1, "peer": 1 }, "direction": "receive", "message": { "update": { "attribute": { "origin": "igp", "local-preference": 100 }, "announce": { "ipv4 unicast": { "172.17.179.104": [ { "nlri": "1.1.0.0/24" } ] } } } } } }"#;
let updates = parse_exabgp_message(line).unwrap().unwrap();
assert_eq!(updates.len(), 1);
assert_eq!(updates[0].nlri.to_string(), "1.1.0.0/24");
```

MRT records are expected already framed and decoded by an MRT reader; [Bgp4MpRecord] and
[RibRecord] deserialize from the JSON such readers dump.

# Fan-out

A [Dispatcher] delivers records to its listeners in registration order, and an [UpdateFeed]
composes a decoder with a dispatcher:

```
use zettabgp::{Dispatcher, RouteUpdate, UpdateFeed};
use zettabgp::parser::Bgp4MpDecoder;

let mut dispatcher = Dispatcher::new();
dispatcher.register_fn(|update: &RouteUpdate| {
    println!("{}", update);
    Ok(())
});
let feed = UpdateFeed::new(Bgp4MpDecoder, dispatcher);
assert_eq!(feed.stats().inputs, 0);
```

# Logging

The crate logs through the [log] facade and never installs a logger.
*/
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod models;
pub mod parser;

pub use dispatch::{Dispatcher, RouteUpdateListener};
pub use error::{DecodeError, DispatchError, FeedError, ListenerError};
pub use feed::{FeedStats, UpdateFeed};
pub use models::*;
pub use parser::RouteUpdateDecoder;
