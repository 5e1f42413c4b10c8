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

//! Mapping application-defined record types onto syslog messages.
//!
//! # Introduction
//!
//! Applications would rather not build a [`Message`](crate::message::Message) by hand for every
//! line they log; they'd rather declare a type ("a login failure has a user, a source address &
//! a reason") and have the syslog fields fall out of it. Rust has no runtime reflection, so a
//! type opts-in by implementing [`Record`]: it declares its fields, once, as a table of
//! [`Field`]s, and hands back a [`Value`] for any one of them by index.
//!
//! [`reflect`] turns that table into a [`FieldMap`]: which field (if any) supplies each header
//! field, what the defaults are, and how every other field becomes a structured-data parameter.
//! This is done once per type (see [`Registry`](crate::registry::Registry)); turning an instance
//! into a message is then just a walk over the [`FieldMap`].
//!
//! # Field Classification
//!
//! Fields are classified in declaration order:
//!
//! - a field named `Severity`, `Facility`, `Timestamp`, `Hostname`, `AppName`, `ProcessID`,
//!   `MessageID` or `Message` supplies that part of the message
//!   - on `Severity` & `Facility` the tag names the default ("crit", "local3", ...)
//!   - on `AppName` & `MessageID` the tag *is* the default; absent a `MessageID` default, the
//!     type's name is used
//! - a field named `SDID` doesn't appear in the message; its tag sets the SD-ID for the
//!   structured-data fields declared after it
//! - a private field with no tag is ignored
//! - a field tagged `,message` supplies the MSG part
//! - anything else is a structured-data parameter; the tag is `[SD-ID ][name][,omitempty]`
//!   where the SD-ID must look like `<digits>@<anything but whitespace>`. A missing name is
//!   derived from the field name by lower-casing its first character; a missing SD-ID is the
//!   current `SDID` default, else "0@local"
//!
//! # Examples
//!
//! ```rust
//! use syslog_record::reflect::{reflect, Field, Record, Value};
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
//! let map = reflect::<LoginFailed>().unwrap();
//! assert_eq!(map.message_id_default(), "LoginFailed");
//! assert_eq!(map.structured_data()[0].name(), "user");
//! assert_eq!(map.structured_data()[1].sd_id(), "32473@example");
//! ```

use crate::facility::{Facility, Severity};

use backtrace::Backtrace;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use regex::Regex;

use std::sync::OnceLock;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       module error type                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Record declaration errors.
///
/// Every one of these is a mistake in the way a [`Record`] type was written, not something that
/// will go away on retry.
#[non_exhaustive]
pub enum Error {
    /// A `Severity` field's tag names no known severity
    UnknownSeverity {
        record: &'static str,
        name: String,
        back: Backtrace,
    },
    /// A `Facility` field's tag names no known facility
    UnknownFacility {
        record: &'static str,
        name: String,
        back: Backtrace,
    },
    /// A structured-data field's tag carries an attribute other than `omitempty`
    UnknownTagAttribute {
        record: &'static str,
        field: &'static str,
        attribute: String,
        back: Backtrace,
    },
    /// A record returned a value of the wrong shape for the part of the message it supplies
    TypeMismatch {
        record: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
        back: Backtrace,
    },
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnknownSeverity { record, name, .. } => write!(
                f,
                "invalid tag on Severity field of {}: no severity named {:?}",
                record, name
            ),
            Error::UnknownFacility { record, name, .. } => write!(
                f,
                "invalid tag on Facility field of {}: no facility named {:?}",
                record, name
            ),
            Error::UnknownTagAttribute {
                record,
                field,
                attribute,
                ..
            } => write!(f, "unknown tag {} on field {} of {}", attribute, field, record),
            Error::TypeMismatch {
                record,
                field,
                expected,
                found,
                ..
            } => write!(
                f,
                "field {} of {} should be {} but is {}",
                field, record, expected, found
            ),
            _ => write!(f, "record declaration error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnknownSeverity { back, .. } => write!(f, "{}\n{:#?}", self, back),
            Error::UnknownFacility { back, .. } => write!(f, "{}\n{:#?}", self, back),
            Error::UnknownTagAttribute { back, .. } => write!(f, "{}\n{:#?}", self, back),
            Error::TypeMismatch { back, .. } => write!(f, "{}\n{:#?}", self, back),
            _ => write!(f, "{}", self),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      record declarations                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The declaration of one field of a [`Record`] type.
///
/// `Field`s are built in `const` context, so a type's declarations can live in a `static` table:
///
/// ```rust
/// use syslog_record::reflect::Field;
/// const FIELDS: &[Field] = &[
///     Field::new("Facility").with_tag("auth"),
///     Field::new("Detail").with_tag("1@example detail,omitempty"),
///     Field::new("scratch").private(),
/// ];
/// assert!(!FIELDS[2].is_exported());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    tag: &'static str,
    exported: bool,
}

impl Field {
    /// An exported field named `name`, with no tag
    pub const fn new(name: &'static str) -> Field {
        Field {
            name,
            tag: "",
            exported: true,
        }
    }
    pub const fn with_tag(self, tag: &'static str) -> Field {
        Field { tag, ..self }
    }
    /// Mark this field as not externally visible; untagged private fields are left out of the
    /// structured data.
    pub const fn private(self) -> Field {
        Field {
            exported: false,
            ..self
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn tag(&self) -> &'static str {
        self.tag
    }
    pub fn is_exported(&self) -> bool {
        self.exported
    }
}

/// A type that can be logged as a syslog message.
pub trait Record: 'static {
    /// This type's fields, in declaration order; [`Record::value`] indexes into this
    const FIELDS: &'static [Field];
    /// The name of this type; the default MSGID.
    ///
    /// Defaults to the type name without its module path or generic arguments.
    fn name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
    /// The value of field `index` (an index into [`Record::FIELDS`]) in this instance
    fn value(&self, index: usize) -> Value<'_>;
}

fn short_type_name(name: &'static str) -> &'static str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

/// The value of one field of a [`Record`] instance.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    /// No value
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
    Severity(Severity),
    Facility(Facility),
    Timestamp(DateTime<FixedOffset>),
}

impl Value<'_> {
    /// True for [`Value::Null`], empty strings & byte strings, zero & `false`
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(x) => *x == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Severity(_) | Value::Facility(_) | Value::Timestamp(_) => false,
        }
    }
    /// A name for this value's shape, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "a bool",
            Value::Int(_) => "a signed integer",
            Value::UInt(_) => "an unsigned integer",
            Value::Float(_) => "a float",
            Value::Str(_) => "a string",
            Value::Bytes(_) => "a byte string",
            Value::Severity(_) => "a severity",
            Value::Facility(_) => "a facility",
            Value::Timestamp(_) => "a timestamp",
        }
    }
}

impl std::fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Value::Severity(s) => write!(f, "{}", s),
            Value::Facility(x) => write!(f, "{}", x),
            Value::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(x: $t) -> Self {
                    Value::$variant(x as $target)
                }
            }
        )+
    };
}

value_from!(Int, i64, i8, i16, i32, i64, isize);
value_from!(UInt, u64, u8, u16, u32, u64, usize);
value_from!(Float, f64, f32, f64);

impl From<bool> for Value<'_> {
    fn from(x: bool) -> Self {
        Value::Bool(x)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(x: &'a str) -> Self {
        Value::Str(x)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(x: &'a String) -> Self {
        Value::Str(x)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(x: &'a [u8]) -> Self {
        Value::Bytes(x)
    }
}

impl<'a> From<&'a Vec<u8>> for Value<'a> {
    fn from(x: &'a Vec<u8>) -> Self {
        Value::Bytes(x)
    }
}

impl From<Severity> for Value<'_> {
    fn from(x: Severity) -> Self {
        Value::Severity(x)
    }
}

impl From<Facility> for Value<'_> {
    fn from(x: Facility) -> Self {
        Value::Facility(x)
    }
}

impl From<DateTime<FixedOffset>> for Value<'_> {
    fn from(x: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(x)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(x: DateTime<Utc>) -> Self {
        Value::Timestamp(x.into())
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(x: Option<T>) -> Self {
        x.map_or(Value::Null, Into::into)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         the field map                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The parts of a syslog message a [`Record`] field can supply
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Severity,
    Facility,
    Timestamp,
    Hostname,
    AppName,
    ProcessID,
    MessageID,
    Message,
}

impl Role {
    const ALL: [Role; 8] = [
        Role::Severity,
        Role::Facility,
        Role::Timestamp,
        Role::Hostname,
        Role::AppName,
        Role::ProcessID,
        Role::MessageID,
        Role::Message,
    ];
    /// The field name that binds a field to this role
    pub fn field_name(self) -> &'static str {
        match self {
            Role::Severity => "Severity",
            Role::Facility => "Facility",
            Role::Timestamp => "Timestamp",
            Role::Hostname => "Hostname",
            Role::AppName => "AppName",
            Role::ProcessID => "ProcessID",
            Role::MessageID => "MessageID",
            Role::Message => "Message",
        }
    }
    fn from_field_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.field_name() == name)
    }
}

/// SD-ID used when neither the field's tag nor an `SDID` field supply one
pub const DEFAULT_SD_ID: &str = "0@local";

/// How one [`Record`] field becomes a structured-data parameter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredDataField {
    index: usize,
    sd_id: String,
    name: String,
    omit_empty: bool,
}

impl StructuredDataField {
    /// Index of the field in [`Record::FIELDS`]
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn sd_id(&self) -> &str {
        &self.sd_id
    }
    /// The PARAM-NAME
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Leave the parameter out altogether when the field's value is zero
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }
}

/// Everything needed to turn instances of one [`Record`] type into syslog messages.
///
/// A pure function of the type's [`Field`] declarations; see [`reflect`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMap {
    record: &'static str,
    roles: [Option<usize>; 8],
    severity_default: Severity,
    facility_default: Facility,
    app_name_default: Option<String>,
    message_id_default: String,
    structured_data: Vec<StructuredDataField>,
}

impl FieldMap {
    /// The name of the [`Record`] type this map describes
    pub fn record(&self) -> &'static str {
        self.record
    }
    /// The index of the field supplying `role`, if any
    pub fn field(&self, role: Role) -> Option<usize> {
        self.roles[role as usize]
    }
    pub fn severity_default(&self) -> Severity {
        self.severity_default
    }
    pub fn facility_default(&self) -> Facility {
        self.facility_default
    }
    /// The APP-NAME named by the `AppName` tag; `None` means "use the process' name"
    pub fn app_name_default(&self) -> Option<&str> {
        self.app_name_default.as_deref()
    }
    pub fn message_id_default(&self) -> &str {
        &self.message_id_default
    }
    /// Structured-data fields, in declaration order
    pub fn structured_data(&self) -> &[StructuredDataField] {
        &self.structured_data
    }
    /// Look-up the structured-data field producing parameter `name` of element `sd_id`
    pub fn structured_data_field(&self, sd_id: &str, name: &str) -> Option<&StructuredDataField> {
        self.structured_data
            .iter()
            .find(|f| f.sd_id == sd_id && f.name == name)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         the reflector                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Compute the [`FieldMap`] for `R`.
///
/// This does the work every time it's called; applications will generally want to go through a
/// [`Registry`](crate::registry::Registry), which does it once per type.
pub fn reflect<R: Record>() -> Result<FieldMap> {
    reflect_fields(R::name(), R::FIELDS)
}

fn sd_tag_regex() -> &'static Regex {
    static SD_TAG: OnceLock<Regex> = OnceLock::new();
    // `\d` & `\S` are spelled-out so as to stay ASCII-only
    SD_TAG.get_or_init(|| {
        Regex::new(r"^([0-9]+@[^\t\n\f\r ]+)(?: (.*))?$").expect("Invalid SD tag regex")
    })
}

/// "Severity" => "severity"; only the first character is touched
fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn reflect_fields(record: &'static str, fields: &[Field]) -> Result<FieldMap> {
    let mut map = FieldMap {
        record,
        roles: [None; 8],
        severity_default: Severity::default(),
        facility_default: Facility::default(),
        app_name_default: None,
        message_id_default: record.to_owned(),
        structured_data: Vec::new(),
    };
    let mut sd_id_default: Option<&str> = None;

    for (index, field) in fields.iter().enumerate() {
        let tag = field.tag;
        if let Some(role) = Role::from_field_name(field.name) {
            map.roles[role as usize] = Some(index);
            if tag.is_empty() {
                continue;
            }
            match role {
                Role::Severity => {
                    map.severity_default =
                        Severity::from_name(tag).ok_or_else(|| Error::UnknownSeverity {
                            record,
                            name: tag.to_owned(),
                            back: Backtrace::new(),
                        })?
                }
                Role::Facility => {
                    map.facility_default =
                        Facility::from_name(tag).ok_or_else(|| Error::UnknownFacility {
                            record,
                            name: tag.to_owned(),
                            back: Backtrace::new(),
                        })?
                }
                Role::AppName => map.app_name_default = Some(tag.to_owned()),
                Role::MessageID => map.message_id_default = tag.to_owned(),
                _ => (),
            }
            continue;
        }

        if field.name == "SDID" {
            if !tag.is_empty() {
                sd_id_default = Some(tag);
            }
            continue;
        }

        if tag.is_empty() && !field.exported {
            continue;
        }

        let mut parts = tag.split(',');
        let head = parts.next().unwrap_or_default();
        let attrs: Vec<&str> = parts.collect();

        if head.is_empty() && attrs.first() == Some(&"message") {
            map.roles[Role::Message as usize] = Some(index);
            continue;
        }

        let (sd_id, name) = match sd_tag_regex().captures(head) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str()),
            ),
            None => (sd_id_default.unwrap_or(DEFAULT_SD_ID), head),
        };

        let mut omit_empty = false;
        for attr in attrs {
            match attr {
                "omitempty" => omit_empty = true,
                _ => {
                    return Err(Error::UnknownTagAttribute {
                        record,
                        field: field.name,
                        attribute: attr.to_owned(),
                        back: Backtrace::new(),
                    })
                }
            }
        }

        map.structured_data.push(StructuredDataField {
            index,
            sd_id: sd_id.to_owned(),
            name: if name.is_empty() {
                lower_first(field.name)
            } else {
                name.to_owned()
            },
            omit_empty,
        });
    }

    Ok(map)
}

#[cfg(test)]
mod test {

    use super::*;

    struct Plain;
    impl Record for Plain {
        const FIELDS: &'static [Field] = &[];
        fn value(&self, _: usize) -> Value<'_> {
            Value::Null
        }
    }

    struct Generic<T>(T);
    impl<T: 'static> Record for Generic<T> {
        const FIELDS: &'static [Field] = &[];
        fn value(&self, _: usize) -> Value<'_> {
            Value::Null
        }
    }

    fn map_of(fields: &[Field]) -> FieldMap {
        reflect_fields("Test", fields).unwrap()
    }

    #[test]
    fn defaults() {
        let map = reflect::<Plain>().unwrap();
        assert_eq!(map.record(), "Plain");
        for role in Role::ALL {
            assert_eq!(map.field(role), None);
        }
        assert_eq!(map.severity_default(), Severity::LOG_INFO);
        assert_eq!(map.facility_default(), Facility::LOG_LOCAL0);
        assert_eq!(map.app_name_default(), None);
        assert_eq!(map.message_id_default(), "Plain");
        assert!(map.structured_data().is_empty());

        assert_eq!(Generic::<u32>::name(), "Generic");
    }

    #[test]
    fn roles() {
        let map = map_of(&[
            Field::new("Message"),
            Field::new("MessageID"),
            Field::new("ProcessID"),
            Field::new("AppName"),
            Field::new("Hostname"),
            Field::new("Timestamp"),
            Field::new("Facility"),
            Field::new("Severity"),
        ]);
        for (i, role) in Role::ALL.iter().rev().enumerate() {
            assert_eq!(map.field(*role), Some(i));
        }
        assert!(map.structured_data().is_empty());
        // Role names are case-sensitive
        let map = map_of(&[Field::new("severity")]);
        assert_eq!(map.field(Role::Severity), None);
        assert_eq!(map.structured_data()[0].name(), "severity");
    }

    #[test]
    fn role_tags() {
        let map = map_of(&[
            Field::new("Severity").with_tag("crit"),
            Field::new("Facility").with_tag("local3"),
            Field::new("AppName").with_tag("login"),
            Field::new("MessageID").with_tag("LOGIN_FAILED"),
            // no effect
            Field::new("Hostname").with_tag("whatever"),
        ]);
        assert_eq!(map.severity_default(), Severity::LOG_CRIT);
        assert_eq!(map.facility_default(), Facility::LOG_LOCAL3);
        assert_eq!(map.app_name_default(), Some("login"));
        assert_eq!(map.message_id_default(), "LOGIN_FAILED");
        assert_eq!(map.field(Role::Hostname), Some(4));
    }

    #[test]
    fn bad_role_tags() {
        let err = reflect_fields("Test", &[Field::new("Severity").with_tag("loud")]).unwrap_err();
        assert!(matches!(err, Error::UnknownSeverity { ref name, .. } if name == "loud"));
        assert_eq!(
            format!("{}", err),
            "invalid tag on Severity field of Test: no severity named \"loud\""
        );
        let err = reflect_fields("Test", &[Field::new("Facility").with_tag("local9")]).unwrap_err();
        assert!(matches!(err, Error::UnknownFacility { ref name, .. } if name == "local9"));
    }

    #[test]
    fn structured_data_names() {
        let map = map_of(&[
            Field::new("EventSource"),
            Field::new("Detail").with_tag("why"),
            Field::new("URLPath"),
            Field::new("x"),
        ]);
        let sd = map.structured_data();
        assert_eq!(sd.len(), 4);
        assert_eq!(sd[0].name(), "eventSource");
        assert_eq!(sd[1].name(), "why");
        // Only the first character is lower-cased
        assert_eq!(sd[2].name(), "uRLPath");
        assert_eq!(sd[3].name(), "x");
        assert!(sd.iter().all(|f| f.sd_id() == DEFAULT_SD_ID && !f.omit_empty()));
        assert_eq!(
            sd.iter().map(StructuredDataField::index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn structured_data_ids() {
        let map = map_of(&[
            Field::new("A"),
            Field::new("SDID").with_tag("32473@example"),
            Field::new("B"),
            Field::new("C").with_tag("1@other c2"),
            Field::new("D").with_tag("2@other"),
            // doesn't start with digits, so it's just a (bad) parameter name
            Field::new("E").with_tag("exampleSDID@32473 e"),
            Field::new("SDID"),
            Field::new("F"),
        ]);
        let sd = map.structured_data();
        let got: Vec<(&str, &str)> = sd.iter().map(|f| (f.sd_id(), f.name())).collect();
        assert_eq!(
            got,
            vec![
                ("0@local", "a"),
                ("32473@example", "b"),
                ("1@other", "c2"),
                ("2@other", "d"),
                ("32473@example", "exampleSDID@32473 e"),
                ("32473@example", "f"),
            ]
        );
        assert_eq!(map.structured_data_field("1@other", "c2").unwrap().index(), 3);
        assert!(map.structured_data_field("0@local", "c2").is_none());
    }

    #[test]
    fn visibility() {
        let map = map_of(&[
            Field::new("hidden").private(),
            Field::new("shown").private().with_tag("shown"),
            Field::new("Public"),
        ]);
        let names: Vec<&str> = map.structured_data().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["shown", "public"]);
        // Role fields are bound regardless of visibility
        let map = map_of(&[Field::new("Severity").private()]);
        assert_eq!(map.field(Role::Severity), Some(0));
    }

    #[test]
    fn message_tag() {
        let map = map_of(&[Field::new("Text").with_tag(",message"), Field::new("Other")]);
        assert_eq!(map.field(Role::Message), Some(0));
        assert_eq!(map.structured_data().len(), 1);

        // `message` is only special with an empty head
        let err = reflect_fields("Test", &[Field::new("Text").with_tag("text,message")]).unwrap_err();
        assert!(matches!(err, Error::UnknownTagAttribute { ref attribute, .. } if attribute == "message"));
    }

    #[test]
    fn attributes() {
        let map = map_of(&[
            Field::new("A").with_tag(",omitempty"),
            Field::new("B").with_tag("bee,omitempty"),
            Field::new("C").with_tag("7@x,omitempty"),
        ]);
        let sd = map.structured_data();
        assert!(sd.iter().all(StructuredDataField::omit_empty));
        assert_eq!((sd[0].sd_id(), sd[0].name()), ("0@local", "a"));
        assert_eq!(sd[1].name(), "bee");
        assert_eq!((sd[2].sd_id(), sd[2].name()), ("7@x", "c"));

        for tag in ["a,omitmpty", "a,omitempty,bogus", ",", "b@1 x,"] {
            let err = reflect_fields("Test", &[Field::new("A").with_tag(tag)]).unwrap_err();
            assert!(matches!(err, Error::UnknownTagAttribute { field: "A", .. }), "{}", tag);
        }
    }

    #[test]
    fn sd_tag_pattern() {
        let re = sd_tag_regex();
        let caps = re.captures("32473@example eventSource").unwrap();
        assert_eq!(&caps[1], "32473@example");
        assert_eq!(&caps[2], "eventSource");
        assert!(re.captures("32473@example").unwrap().get(2).is_none());
        assert!(re.captures("example@32473 x").is_none());
        assert!(re.captures("1@\u{a0}").unwrap().get(1).is_some());
    }

    #[test]
    fn pure() {
        let fields = [
            Field::new("Severity").with_tag("err"),
            Field::new("SDID").with_tag("1@a"),
            Field::new("X").with_tag(",omitempty"),
        ];
        assert_eq!(map_of(&fields), map_of(&fields));
    }

    #[test]
    fn values() {
        assert!(Value::from(None::<&str>).is_zero());
        assert!(Value::from("").is_zero());
        assert!(Value::from(0u8).is_zero());
        assert!(Value::from(0.0f32).is_zero());
        assert!(Value::from(false).is_zero());
        assert!(!Value::from(Severity::LOG_EMERG).is_zero());
        assert!(!Value::from(Some(-1i32)).is_zero());

        assert_eq!(Value::from(-3i16), Value::Int(-3));
        assert_eq!(Value::from(3usize), Value::UInt(3));
        assert_eq!(format!("{}", Value::from(2.5f64)), "2.5");
        assert_eq!(format!("{}", Value::Null), "");
        assert_eq!(format!("{}", Value::from(Facility::LOG_AUTH)), "LOG_AUTH");
        assert_eq!(
            format!("{}", Value::from(DateTime::<Utc>::from(std::time::UNIX_EPOCH))),
            "1970-01-01T00:00:00Z"
        );
    }
}
