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
//! Turn application-defined record types into RFC [5424] [`syslog`] messages
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//! [`syslog`]: https://en.wikipedia.org/wiki/Syslog
//!
//! # Introduction
//!
//! An RFC 5424 message carries a good deal more than a line of text: a priority, a timestamp, four
//! header fields identifying where it came from, and any number of "structured data" elements,
//! each a named bag of key/value parameters. Assembling all that by hand at every call site is
//! tedious & error-prone. This crate lets an application instead declare a _type_ per kind of
//! event, and derives the message from an instance of that type:
//!
//! - [`reflect`] holds the [`Record`](reflect::Record) trait by which a type declares its fields,
//!   and the rules mapping those fields onto a message
//! - [`registry`] computes each type's mapping once, caches it, and builds messages from
//!   instances
//! - [`rfc5424`] validates & serializes a [`Message`](message::Message)
//! - [`environment`] supplies process-wide defaults for the HOSTNAME, APP-NAME & PROCID fields
//! - [`facility`] enumerates syslog facilities & severities
//!
//! # Usage
//!
//! ```rust
//! use syslog_record::{
//!     environment::Environment,
//!     reflect::{Field, Record, Value},
//!     registry::Registry,
//! };
//!
//! struct LoginFailed {
//!     user: String,
//!     source: Option<String>,
//!     reason: String,
//! }
//!
//! impl Record for LoginFailed {
//!     const FIELDS: &'static [Field] = &[
//!         Field::new("Severity").with_tag("warning"),
//!         Field::new("SDID").with_tag("32473@example"),
//!         Field::new("User"),
//!         Field::new("Source").with_tag("src,omitempty"),
//!         Field::new("Reason").with_tag(",message"),
//!     ];
//!     fn value(&self, index: usize) -> Value<'_> {
//!         match index {
//!             2 => Value::from(&self.user),
//!             3 => Value::from(self.source.as_deref()),
//!             4 => Value::from(&self.reason),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! // `Registry::new()` would discover these from the running process
//! let registry = Registry::builder()
//!     .environment(Environment::new("bree.local", "sshd", "123").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let bytes = registry
//!     .encode(&LoginFailed {
//!         user: "root".to_owned(),
//!         source: None,
//!         reason: "bad password".to_owned(),
//!     })
//!     .unwrap();
//! let text = String::from_utf8(bytes).unwrap();
//! // LOG_LOCAL0 (16) * 8 + LOG_WARNING (4)
//! assert!(text.starts_with("<132>1 "));
//! assert!(text.ends_with(
//!     r#" bree.local sshd 123 LoginFailed [32473@example user="root"] bad password"#
//! ));
//! ```
//!
//! Records that carry no timestamp are stamped with the current time. The encoder is strict by
//! default; see [`Rfc5424Builder`](rfc5424::Rfc5424Builder) for the knobs.
//!
//! # Logging
//!
//! This crate logs its own goings-on through [`tracing`]: field-map computation at DEBUG, cache
//! hits at TRACE, and rejected messages at DEBUG. It never installs a subscriber.
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html

pub mod environment;
pub mod error;
pub mod facility;
pub mod message;
pub mod reflect;
pub mod registry;
pub mod rfc5424;

pub use error::{Error, Result};
