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

//! In-memory representation of a single RFC [5424] syslog message.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! [`Message`] is deliberately "dumb": the severity & facility are plain integers and the header
//! fields plain strings, so that any value at all can be represented. Whether that value can be
//! put on the wire is decided by [`Rfc5424`](crate::rfc5424::Rfc5424) at encoding time.

use chrono::{DateTime, FixedOffset};

/// A single structured-data parameter: `name="value"`.
///
/// The value is a [`String`], which makes the RFC's "must be UTF-8" rule for PARAM-VALUE hold by
/// construction; it is escaped on the way out, not on the way in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredDataParam {
    pub name: String,
    pub value: String,
}

impl StructuredDataParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> StructuredDataParam {
        StructuredDataParam {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An SD-ELEMENT: an identifier and an ordered list of parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredDataElement {
    pub id: String,
    pub parameters: Vec<StructuredDataParam>,
}

impl StructuredDataElement {
    pub fn new(id: impl Into<String>) -> StructuredDataElement {
        StructuredDataElement {
            id: id.into(),
            parameters: Vec::new(),
        }
    }
    /// Append a parameter to this element
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(StructuredDataParam::new(name, value));
        self
    }
}

/// An RFC 5424 syslog message, prior to validation.
///
/// Empty strings in `hostname`, `app_name`, `process_id` & `message_id` denote the NILVALUE. The
/// order of `structured_data` is the order in which elements will be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// 0-7 are the `<syslog.h>` levels; the encoder accepts up to 8
    pub severity: u8,
    /// 0-23
    pub facility: u8,
    pub timestamp: DateTime<FixedOffset>,
    pub hostname: String,
    pub app_name: String,
    pub process_id: String,
    pub message_id: String,
    pub structured_data: Vec<StructuredDataElement>,
    /// Opaque payload; written verbatim
    pub message: Vec<u8>,
}

impl Message {
    /// A message with the given timestamp, all-zero PRI & every other field empty
    pub fn new(timestamp: DateTime<FixedOffset>) -> Message {
        Message {
            severity: 0,
            facility: 0,
            timestamp,
            hostname: String::new(),
            app_name: String::new(),
            process_id: String::new(),
            message_id: String::new(),
            structured_data: Vec::new(),
            message: Vec::new(),
        }
    }
    /// Add the parameter `name="value"` to the element identified by `id`.
    ///
    /// If there is no such element yet, one is appended to the structured data.
    pub fn add_datum(&mut self, id: &str, name: impl Into<String>, value: impl Into<String>) {
        let param = StructuredDataParam::new(name, value);
        match self.structured_data.iter_mut().find(|elt| elt.id == id) {
            Some(elt) => elt.parameters.push(param),
            None => self.structured_data.push(StructuredDataElement {
                id: id.to_owned(),
                parameters: vec![param],
            }),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn add_datum() {
        let mut msg = Message::new(chrono::DateTime::<chrono::Utc>::from(std::time::UNIX_EPOCH).into());
        msg.add_datum("a@1", "x", "1");
        msg.add_datum("b@1", "y", "2");
        msg.add_datum("a@1", "z", "3");
        assert_eq!(
            msg.structured_data,
            vec![
                StructuredDataElement::new("a@1")
                    .with_param("x", "1")
                    .with_param("z", "3"),
                StructuredDataElement::new("b@1").with_param("y", "2"),
            ]
        );
    }
}
