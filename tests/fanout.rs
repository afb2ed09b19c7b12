use std::cell::RefCell;
use std::rc::Rc;
use zettabgp::parser::ExaBgpDecoder;
use zettabgp::{Dispatcher, FeedError, ListenerError, RouteUpdate, RouteUpdateListener, UpdateFeed};

const TWO_PREFIXES: &str = r#"{ "exabgp": "4.0.1", "time": 1729362672.5, "type": "update", "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" }, "asn": { "local": 1, "peer": 1 }, "direction": "receive", "message": { "update": { "attribute": { "origin": "igp" }, "announce": { "ipv4 unicast": { "172.17.179.104": [ { "nlri": "1.1.0.0/24" }, { "nlri": "1.1.1.0/24" } ] } } } } } }"#;

type Log = Rc<RefCell<Vec<String>>>;

/// Records what it sees, and fails on the prefix it is told to fail on.
struct Probe {
    name: &'static str,
    log: Log,
    fail_on: Option<&'static str>,
}

impl RouteUpdateListener for Probe {
    fn on_update(&mut self, update: &RouteUpdate) -> Result<(), ListenerError> {
        let prefix = update.nlri.to_string();
        if self.fail_on == Some(prefix.as_str()) {
            return Err(format!("{} rejected {}", self.name, prefix).into());
        }
        self.log
            .borrow_mut()
            .push(format!("{}({})", self.name, prefix));
        Ok(())
    }
}

fn probe(name: &'static str, log: &Log, fail_on: Option<&'static str>) -> Probe {
    Probe {
        name,
        log: log.clone(),
        fail_on,
    }
}

#[test]
fn test_listener_ordering() -> anyhow::Result<()> {
    let log: Log = Rc::default();
    let dispatcher = Dispatcher::new()
        .with_listener(probe("L1", &log, None))
        .with_listener(probe("L2", &log, None));

    let mut feed = UpdateFeed::new(ExaBgpDecoder, dispatcher);
    assert_eq!(feed.process(TWO_PREFIXES)?, 2);
    assert_eq!(
        *log.borrow(),
        vec!["L1(1.1.0.0/24)", "L2(1.1.0.0/24)", "L1(1.1.1.0/24)", "L2(1.1.1.0/24)"]
    );
    Ok(())
}

#[test]
fn test_listener_failure_stops_fan_out() {
    let log: Log = Rc::default();
    let dispatcher = Dispatcher::new()
        .with_listener(probe("L1", &log, None))
        .with_listener(probe("L2", &log, Some("1.1.1.0/24")))
        .with_listener(probe("L3", &log, None));

    let mut feed = UpdateFeed::new(ExaBgpDecoder, dispatcher);
    let err = match feed.process(TWO_PREFIXES) {
        Err(FeedError::Dispatch(err)) => err,
        other => panic!("expected a dispatch error, got {:?}", other),
    };
    assert_eq!(err.listener, 1);
    assert_eq!(err.source.to_string(), "L2 rejected 1.1.1.0/24");

    // the first record reached everyone, the second only the listener before the failing one
    assert_eq!(
        *log.borrow(),
        vec!["L1(1.1.0.0/24)", "L2(1.1.0.0/24)", "L3(1.1.0.0/24)", "L1(1.1.1.0/24)"]
    );
    assert_eq!(feed.stats().announcements, 2);
}

#[test]
fn test_dispatchers_are_independent() -> anyhow::Result<()> {
    let log: Log = Rc::default();
    let mut first = UpdateFeed::new(
        ExaBgpDecoder,
        Dispatcher::new().with_listener(probe("A", &log, None)),
    );
    let mut second = UpdateFeed::new(ExaBgpDecoder, Dispatcher::new());

    second.process(TWO_PREFIXES)?;
    assert!(log.borrow().is_empty());

    first.process(TWO_PREFIXES)?;
    assert_eq!(log.borrow().len(), 2);
    Ok(())
}
