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

//! The [`Registry`]: one [`FieldMap`] per [`Record`] type, plus everything else needed to turn
//! records into bytes.
//!
//! An application builds one [`Registry`] at startup & shares it (by reference, or in an
//! [`Arc`]) with everything that logs. The first time a given record type is seen its
//! [`FieldMap`] is computed & stored; from then on it's a read-locked hash look-up.

use crate::{
    environment::Environment,
    error,
    message::Message,
    reflect::{self, reflect, FieldMap, Record, Role, Value},
    rfc5424::Rfc5424,
};

use backtrace::Backtrace;
use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::RwLock;

use std::{any::TypeId, collections::HashMap, sync::Arc};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         struct Registry                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Thread-safe store of [`FieldMap`]s, keyed by record type.
///
/// Two threads asking for the same new type at the same time may both compute its [`FieldMap`];
/// since that computation is pure, whichever is stored first wins & the other is dropped.
pub struct Registry {
    environment: Environment,
    encoder: Rfc5424,
    cache: RwLock<HashMap<TypeId, Arc<FieldMap>>>,
}

pub struct RegistryBuilder {
    environment: Option<Environment>,
    encoder: Rfc5424,
}

impl RegistryBuilder {
    /// Use `environment` rather than discovering one
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }
    pub fn encoder(mut self, encoder: Rfc5424) -> Self {
        self.encoder = encoder;
        self
    }
    /// Build the [`Registry`], discovering the process [`Environment`] if none was given
    pub fn build(self) -> error::Result<Registry> {
        let environment = match self.environment {
            Some(environment) => environment,
            None => Environment::discover()?,
        };
        Ok(Registry {
            environment,
            encoder: self.encoder,
            cache: RwLock::new(HashMap::new()),
        })
    }
}

impl Registry {
    /// A [`Registry`] for this process, with a strictly RFC-compliant encoder
    pub fn new() -> error::Result<Registry> {
        Registry::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            environment: None,
            encoder: Rfc5424::default(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn encoder(&self) -> &Rfc5424 {
        &self.encoder
    }

    /// The number of record types seen so far
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Return the [`FieldMap`] for `R`, computing it if this is the first request for `R`.
    pub fn field_map<R: Record>(&self) -> reflect::Result<Arc<FieldMap>> {
        let key = TypeId::of::<R>();
        let cached = self.cache.read().get(&key).cloned();
        if let Some(map) = cached {
            tracing::trace!(record = R::name(), "field map cache hit");
            return Ok(map);
        }

        let map = Arc::new(reflect::<R>()?);
        tracing::debug!(
            record = R::name(),
            structured_data = map.structured_data().len(),
            "computed field map"
        );
        Ok(Arc::clone(self.cache.write().entry(key).or_insert(map)))
    }

    /// Register `R` up-front, so that a bad declaration shows up at startup rather than the first
    /// time an `R` is logged.
    pub fn register<R: Record>(&self) -> reflect::Result<()> {
        self.field_map::<R>().map(|_| ())
    }

    /// Build the syslog [`Message`] for `record`.
    pub fn message<R: Record>(&self, record: &R) -> reflect::Result<Message> {
        let map = self.field_map::<R>()?;
        Adapter {
            map: &map,
            environment: &self.environment,
        }
        .message(record)
    }

    /// Build the syslog [`Message`] for `record` & encode it.
    pub fn encode<R: Record>(&self, record: &R) -> error::Result<Vec<u8>> {
        let msg = self.message(record)?;
        Ok(self.encoder.encode(&msg)?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      records to messages                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

struct Adapter<'a> {
    map: &'a FieldMap,
    environment: &'a Environment,
}

impl Adapter<'_> {
    fn mismatch<T, R: Record>(&self, index: usize, expected: &'static str, found: &Value) -> reflect::Result<T> {
        Err(reflect::Error::TypeMismatch {
            record: self.map.record(),
            field: R::FIELDS.get(index).map_or("?", |f| f.name()),
            expected,
            found: found.kind(),
            back: Backtrace::new(),
        })
    }

    /// The value supplying `role` (along with its field index), or `None` if there is no such
    /// field or its value is [`Value::Null`]. Shape is checked by the caller before zero values
    /// fall back to defaults.
    fn role<'r, R: Record>(&self, record: &'r R, role: Role) -> Option<(usize, Value<'r>)> {
        self.map
            .field(role)
            .map(|index| (index, record.value(index)))
            .filter(|(_, value)| !matches!(value, Value::Null))
    }

    fn string<R: Record>(&self, record: &R, role: Role, default: &str) -> reflect::Result<String> {
        match self.role(record, role) {
            None | Some((_, Value::Str(""))) => Ok(default.to_owned()),
            Some((_, Value::Str(s))) => Ok(s.to_owned()),
            Some((index, other)) => self.mismatch::<_, R>(index, "a string", &other),
        }
    }

    fn message<R: Record>(&self, record: &R) -> reflect::Result<Message> {
        let severity = match self.role(record, Role::Severity) {
            None => self.map.severity_default(),
            Some((_, Value::Severity(s))) => s,
            Some((index, other)) => return self.mismatch::<_, R>(index, "a severity", &other),
        };
        let facility = match self.role(record, Role::Facility) {
            None => self.map.facility_default(),
            Some((_, Value::Facility(f))) => f,
            Some((index, other)) => return self.mismatch::<_, R>(index, "a facility", &other),
        };
        let timestamp: DateTime<FixedOffset> = match self.role(record, Role::Timestamp) {
            None => Utc::now().into(),
            Some((_, Value::Timestamp(t))) => t,
            Some((index, other)) => return self.mismatch::<_, R>(index, "a timestamp", &other),
        };
        let body = match self.role(record, Role::Message) {
            None => Vec::new(),
            Some((_, Value::Str(s))) => s.as_bytes().to_vec(),
            Some((_, Value::Bytes(b))) => b.to_vec(),
            Some((index, other)) => return self.mismatch::<_, R>(index, "a string or bytes", &other),
        };

        let app_name_default = self
            .map
            .app_name_default()
            .unwrap_or(self.environment.app_name());

        let mut msg = Message {
            severity: severity.code(),
            facility: facility.code(),
            timestamp,
            hostname: self.string(record, Role::Hostname, self.environment.hostname())?,
            app_name: self.string(record, Role::AppName, app_name_default)?,
            process_id: self.string(record, Role::ProcessID, self.environment.process_id())?,
            message_id: self.string(record, Role::MessageID, self.map.message_id_default())?,
            structured_data: Vec::new(),
            message: body,
        };

        for field in self.map.structured_data() {
            let value = record.value(field.index());
            if let Value::Bytes(_) = value {
                return self.mismatch::<_, R>(field.index(), "text", &value);
            }
            if field.omit_empty() && value.is_zero() {
                continue;
            }
            msg.add_datum(field.sd_id(), field.name(), value.to_string());
        }

        Ok(msg)
    }
}
