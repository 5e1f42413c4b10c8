// Copyright (C) 2025 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of syslog-record.
//
// syslog-record is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// syslog-record is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with syslog-record.  If
// not, see <http://www.gnu.org/licenses/>.

//! Check our output against an independent RFC 5424 parser.

use syslog_record::{
    environment::Environment,
    facility::{Facility, Severity},
    message::{Message, StructuredDataElement},
    reflect::{Field, Record, Value},
    registry::Registry,
    rfc5424::Rfc5424,
};

use chrono::{DateTime, FixedOffset};
use syslog_rfc5424::{parse_message, SyslogFacility, SyslogSeverity};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn registry() -> Registry {
    Registry::builder()
        .environment(Environment::new("mymachine.example.com", "evntslog", "").unwrap())
        .build()
        .unwrap()
}

fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

#[test]
fn hand_built_message() {
    let mut msg = Message::new(ts("2003-10-11T22:14:15.003Z"));
    msg.severity = Severity::LOG_CRIT.code();
    msg.facility = Facility::LOG_AUTH.code();
    msg.hostname = "mymachine.example.com".to_owned();
    msg.app_name = "su".to_owned();
    msg.message_id = "ID47".to_owned();
    msg.message = b"'su root' failed for lonvick on /dev/pts/8".to_vec();

    let bytes = Rfc5424::default().encode(&msg).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        text,
        "<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - 'su root' failed for lonvick on /dev/pts/8"
    );

    let parsed = parse_message(&text).unwrap();
    assert_eq!(parsed.severity, SyslogSeverity::SEV_CRIT);
    assert_eq!(parsed.facility, SyslogFacility::LOG_AUTH);
    assert_eq!(parsed.timestamp, Some(1065910455));
    assert_eq!(parsed.hostname.as_deref(), Some("mymachine.example.com"));
    assert_eq!(parsed.appname.as_deref(), Some("su"));
    assert!(parsed.procid.is_none());
    assert_eq!(parsed.msgid.as_deref(), Some("ID47"));
    assert_eq!(parsed.msg, "'su root' failed for lonvick on /dev/pts/8");
}

/// The third example in RFC 5424 section 6.5, declared as a record
struct AppEvent {
    timestamp: DateTime<FixedOffset>,
    iut: u32,
    event_source: &'static str,
    event_id: u64,
}

impl Record for AppEvent {
    const FIELDS: &'static [Field] = &[
        Field::new("Severity").with_tag("notice"),
        Field::new("Facility").with_tag("local4"),
        Field::new("Timestamp"),
        Field::new("MessageID").with_tag("ID47"),
        Field::new("SDID").with_tag("32473@example"),
        Field::new("Iut"),
        Field::new("EventSource").with_tag("eventSource"),
        Field::new("EventID").with_tag("eventID"),
    ];
    fn value(&self, index: usize) -> Value<'_> {
        match index {
            2 => Value::from(self.timestamp),
            5 => Value::from(self.iut),
            6 => Value::from(self.event_source),
            7 => Value::from(self.event_id),
            _ => Value::Null,
        }
    }
}

#[test]
fn record_with_structured_data() {
    let r = registry();
    let event = AppEvent {
        timestamp: ts("2003-10-11T22:14:15.003Z"),
        iut: 3,
        event_source: "Application",
        event_id: 1011,
    };

    let msg = r.message(&event).unwrap();
    assert_eq!(
        msg.structured_data,
        vec![StructuredDataElement::new("32473@example")
            .with_param("iut", "3")
            .with_param("eventSource", "Application")
            .with_param("eventID", "1011")]
    );

    let text = String::from_utf8(r.encode(&event).unwrap()).unwrap();
    assert_eq!(
        text,
        r#"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [32473@example iut="3" eventSource="Application" eventID="1011"]"#
    );

    let parsed = parse_message(&text).unwrap();
    assert_eq!(parsed.severity, SyslogSeverity::SEV_NOTICE);
    assert_eq!(parsed.facility, SyslogFacility::LOG_LOCAL4);
    assert_eq!(parsed.appname.as_deref(), Some("evntslog"));
    assert_eq!(
        parsed.sd.find_tuple("32473@example", "eventSource").map(|s| s.as_str()),
        Some("Application")
    );
    assert_eq!(
        parsed.sd.find_tuple("32473@example", "eventID").map(|s| s.as_str()),
        Some("1011")
    );
}

struct Upload<'a> {
    path: &'a str,
    payload: &'a [u8],
}

impl Record for Upload<'static> {
    const FIELDS: &'static [Field] = &[
        Field::new("Path"),
        Field::new("Message"),
        Field::new("cursor").private(),
    ];
    fn value(&self, index: usize) -> Value<'_> {
        match index {
            0 => Value::from(self.path),
            1 => Value::from(self.payload),
            _ => Value::Null,
        }
    }
}

#[test]
fn opaque_body() {
    let r = registry();
    let bytes = r
        .encode(&Upload {
            path: "/tmp/x",
            payload: b"\x00\x01\xfe",
        })
        .unwrap();
    let mut tail = br#" mymachine.example.com evntslog - Upload [0@local path="/tmp/x"] "#.to_vec();
    tail.extend_from_slice(b"\x00\x01\xfe");
    assert!(bytes.ends_with(&tail));
}

#[test]
fn invalid_values() {
    let mut msg = Message::new(ts("2003-10-11T22:14:15.003Z"));
    msg.message_id = "x".repeat(33);
    match Rfc5424::default().encode(&msg) {
        Err(err) => assert_eq!(err.property(), "MessageID"),
        Ok(_) => panic!("a 33-character MSGID should be rejected"),
    }

    assert!(matches!(
        Environment::new("my machine", "a", "1"),
        Err(syslog_record::Error::BadHostname { .. })
    ));
}

/// Counts the "computed field map" events the registry emits
struct Computations(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for Computations {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == tracing::Level::DEBUG && meta.target() == "syslog_record::registry" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn field_maps_are_computed_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber =
        tracing_subscriber::registry::Registry::default().with(Computations(count.clone()));

    tracing::subscriber::with_default(subscriber, || {
        let r = registry();
        let event = AppEvent {
            timestamp: ts("2003-10-11T22:14:15.003Z"),
            iut: 3,
            event_source: "Application",
            event_id: 1011,
        };
        for _ in 0..4 {
            r.encode(&event).unwrap();
        }
        r.register::<AppEvent>().unwrap();
        r.register::<Upload<'static>>().unwrap();
        assert_eq!(r.len(), 2);
    });

    assert_eq!(count.load(Ordering::SeqCst), 2);
}
