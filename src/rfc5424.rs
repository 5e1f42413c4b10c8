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

//! RFC [5424]-compliant syslog message encoding
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! [`Rfc5424`] validates a [`Message`] against the grammar in section 6 of the RFC & writes it
//! out as
//!
//! ```text
//! <PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA[ MSG]
//! ```
//!
//! Consumers of these bytes tend to be strict parsers, so validation is not optional: [`encode`]
//! will not write a single byte of a message that fails [`validate`].
//!
//! [`encode`]: Rfc5424::encode
//! [`validate`]: Rfc5424::validate
//!
//! # Examples
//!
//! ```rust
//! use syslog_record::{message::Message, rfc5424::Rfc5424};
//! use chrono::DateTime;
//!
//! let mut msg = Message::new(DateTime::parse_from_rfc3339("2003-10-11T22:14:15.003Z").unwrap());
//! msg.severity = 2;
//! msg.facility = 4;
//! msg.hostname = "mymachine.example.com".to_owned();
//! msg.app_name = "su".to_owned();
//! msg.message_id = "ID47".to_owned();
//! msg.message = b"'su root' failed for lonvick on /dev/pts/8".to_vec();
//!
//! assert_eq!(
//!     Rfc5424::default().encode(&msg).unwrap(),
//!     b"<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - 'su root' failed for lonvick on /dev/pts/8"
//! );
//! ```

use crate::message::Message;

use backtrace::Backtrace;
use bytes::BufMut;
use chrono::prelude::*;

use std::borrow::Cow;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       module error type                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// RFC 5424 encoding errors
#[non_exhaustive]
pub enum Error {
    /// A [`Message`] field violates the RFC; `property` names the field, `value` is (a rendering
    /// of) the offending value.
    InvalidValue {
        property: &'static str,
        value: String,
        back: Backtrace,
    },
}

impl Error {
    /// The name of the offending [`Message`] property
    pub fn property(&self) -> &'static str {
        match self {
            Error::InvalidValue { property, .. } => property,
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidValue {
                property, value, ..
            } => write!(
                f,
                "Message cannot be serialized because {} is invalid: {}",
                property, value
            ),
            _ => write!(f, "RFC 5424 encoding error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidValue { back, .. } => write!(f, "{}\n{:#?}", self, back),
            _ => write!(f, "{}", self),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

fn invalid<T>(property: &'static str, value: impl ToString) -> Result<T> {
    tracing::debug!(property, "message failed RFC 5424 validation");
    Err(Error::InvalidValue {
        property,
        value: value.to_string(),
        back: Backtrace::new(),
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       character classes                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// HOSTNAME = NILVALUE / 1*255PRINTUSASCII
pub const MAX_HOSTNAME_LEN: usize = 255;
/// APP-NAME = NILVALUE / 1*48PRINTUSASCII
pub const MAX_APP_NAME_LEN: usize = 48;
/// PROCID = NILVALUE / 1*128PRINTUSASCII
pub const MAX_PROCESS_ID_LEN: usize = 128;
/// MSGID = NILVALUE / 1*32PRINTUSASCII
pub const MAX_MESSAGE_ID_LEN: usize = 32;
/// SD-NAME = 1*32PRINTUSASCII, except '=', SP, ']', %d34 (")
pub const MAX_SD_NAME_LEN: usize = 32;

/// PRINTUSASCII = %d33-126
pub fn is_printable_us_ascii(s: &str) -> bool {
    s.bytes().all(|b| (33..=126).contains(&b))
}

fn is_valid_sd_name(s: &str, allow_long: bool) -> bool {
    if s.is_empty() || (!allow_long && s.len() > MAX_SD_NAME_LEN) {
        return false;
    }
    s.bytes()
        .all(|b| (33..=126).contains(&b) && b != b'=' && b != b']' && b != b'"')
}

/// Escape a PARAM-VALUE: `"`, `\` & `]` are each preceded by a backslash.
///
/// Values needing no escapes (the overwhelming majority) are returned as-is, without allocating.
pub fn escape_sd_param(s: &str) -> Cow<'_, str> {
    let escapes = s
        .bytes()
        .filter(|b| matches!(b, b'\\' | b'"' | b']'))
        .count();
    if escapes == 0 {
        return Cow::Borrowed(s);
    }
    let mut t = String::with_capacity(s.len() + escapes);
    for c in s.chars() {
        if matches!(c, '\\' | '"' | ']') {
            t.push('\\');
        }
        t.push(c);
    }
    Cow::Owned(t)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          the encoder                                           //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// An encoder that produces RFC [5424]-conformant syslog messages.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
///
/// The default configuration is strictly compliant. [`Rfc5424Builder::allow_long_sd_names`]
/// relaxes the 32-character ceiling on SD-IDs & PARAM-NAMEs, which is a deliberate violation of
/// the RFC; only turn it on if you know your collector tolerates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rfc5424 {
    allow_long_sd_names: bool,
    with_bom: bool,
}

pub struct Rfc5424Builder {
    imp: Rfc5424,
}

impl Rfc5424Builder {
    /// Permit SD-IDs & PARAM-NAMEs longer than thirty-two characters (violates RFC 5424)
    pub fn allow_long_sd_names(mut self, allow_long_sd_names: bool) -> Self {
        self.imp.allow_long_sd_names = allow_long_sd_names;
        self
    }
    /// Prefix non-empty MSG parts with the UTF-8 byte order mark
    pub fn with_bom(mut self, with_bom: bool) -> Self {
        self.imp.with_bom = with_bom;
        self
    }
    pub fn build(self) -> Rfc5424 {
        self.imp
    }
}

impl Rfc5424 {
    pub fn builder() -> Rfc5424Builder {
        Rfc5424Builder {
            imp: Rfc5424::default(),
        }
    }

    pub fn allows_long_sd_names(&self) -> bool {
        self.allow_long_sd_names
    }

    /// Check `msg` against the RFC; the first violation found is returned.
    pub fn validate(&self, msg: &Message) -> Result<()> {
        if msg.severity > 8 {
            return invalid("Severity", msg.severity);
        }
        if msg.facility > 23 {
            return invalid("Facility", msg.facility);
        }

        for (property, value, max_len) in [
            ("Hostname", &msg.hostname, MAX_HOSTNAME_LEN),
            ("AppName", &msg.app_name, MAX_APP_NAME_LEN),
            ("ProcessID", &msg.process_id, MAX_PROCESS_ID_LEN),
            ("MessageID", &msg.message_id, MAX_MESSAGE_ID_LEN),
        ] {
            if !is_printable_us_ascii(value) || value.len() > max_len {
                return invalid(property, value);
            }
        }

        for elt in &msg.structured_data {
            if !is_valid_sd_name(&elt.id, self.allow_long_sd_names) {
                return invalid("StructuredData/ID", &elt.id);
            }
            // PARAM-VALUE is UTF-8 by construction (it's a `String`); only the name needs checking
            for param in &elt.parameters {
                if !is_valid_sd_name(&param.name, self.allow_long_sd_names) {
                    return invalid("StructuredData/Name", &param.name);
                }
            }
        }
        Ok(())
    }

    /// Validate & serialize `msg`.
    pub fn encode(&self, msg: &Message) -> Result<Vec<u8>> {
        self.validate(msg)?;

        let mut buf = format!("<{}>1 ", msg.severity | (msg.facility << 3)).into_bytes();
        write_timestamp(&mut buf, &msg.timestamp);
        for field in [
            &msg.hostname,
            &msg.app_name,
            &msg.process_id,
            &msg.message_id,
        ] {
            buf.put_u8(b' ');
            buf.put_slice(nilify(field).as_bytes());
        }
        buf.put_u8(b' ');

        if msg.structured_data.is_empty() {
            buf.put_u8(b'-');
        }
        for elt in &msg.structured_data {
            buf.put_u8(b'[');
            buf.put_slice(elt.id.as_bytes());
            for param in &elt.parameters {
                buf.put_u8(b' ');
                buf.put_slice(param.name.as_bytes());
                buf.put_slice(b"=\"");
                buf.put_slice(escape_sd_param(&param.value).as_bytes());
                buf.put_u8(b'"');
            }
            buf.put_u8(b']');
        }

        if !msg.message.is_empty() {
            buf.put_u8(b' ');
            if self.with_bom {
                buf.put_slice(&[0xef, 0xbb, 0xbf]);
            }
            buf.put_slice(&msg.message);
        }
        Ok(buf)
    }
}

fn nilify(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

/// RFC 3339 with as many fractional digits as are needed (none, if the nanoseconds are zero) &
/// "Z" for UTC
fn write_timestamp(buf: &mut Vec<u8>, ts: &DateTime<FixedOffset>) {
    buf.put_slice(ts.format("%Y-%m-%dT%H:%M:%S").to_string().as_bytes());
    // chrono represents a leap second as nanos >= 1e9; %S has already printed it as "60"
    let nanos = ts.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let frac = format!("{:09}", nanos);
        buf.put_u8(b'.');
        buf.put_slice(frac.trim_end_matches('0').as_bytes());
    }
    if ts.offset().local_minus_utc() == 0 {
        buf.put_u8(b'Z');
    } else {
        buf.put_slice(ts.format("%:z").to_string().as_bytes());
    }
}
