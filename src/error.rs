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
//! [syslog-record](crate) errors

use crate::{reflect, rfc5424};

use backtrace::Backtrace;

/// [syslog-record](crate) error type
///
/// [syslog-record](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of
/// a straightforward enumeration with a few match arms chosen on the basis what the caller will
/// need to repond.
///
/// There are three families of failure, and callers will want to treat them differently:
///
/// - the environment variants (`No*` & `Bad*`) come from [`Environment`] discovery at startup
/// - [`Error::Configuration`] means a record type was declared incorrectly; it's a programming
///   error, and there's no point in retrying
/// - [`Error::InvalidValue`] means one particular message couldn't be put on the wire; the next
///   one may well be fine
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
/// [`Environment`]: crate::environment::Environment
#[non_exhaustive]
pub enum Error {
    BadAppName {
        name: Vec<u8>,
        back: Backtrace,
    },
    BadHostname {
        name: Vec<u8>,
        back: Backtrace,
    },
    BadProcId {
        name: Vec<u8>,
        back: Backtrace,
    },
    /// A record type's field declarations are invalid
    Configuration { source: reflect::Error },
    /// A message violates RFC 5424
    InvalidValue { source: rfc5424::Error },
    /// Failed to fetch the current executable (via std::env)
    NoExecutable {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// Failed to fetch hostname (via libc)
    NoHostname {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
}

impl std::convert::From<reflect::Error> for Error {
    fn from(source: reflect::Error) -> Self {
        Error::Configuration { source }
    }
}

impl std::convert::From<rfc5424::Error> for Error {
    fn from(source: rfc5424::Error) -> Self {
        Error::InvalidValue { source }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadAppName { name, .. } => write!(
                f,
                "{:?} is not an RFC 5424-compliant APP-NAME",
                String::from_utf8_lossy(name)
            ),
            Error::BadHostname { name, .. } => write!(
                f,
                "{:?} is not an RFC 5424-compliant HOSTNAME",
                String::from_utf8_lossy(name)
            ),
            Error::BadProcId { name, .. } => write!(
                f,
                "{:?} is not an RFC 5424-compliant PROCID",
                String::from_utf8_lossy(name)
            ),
            Error::Configuration { source } => write!(f, "Bad record declaration: {}", source),
            Error::InvalidValue { source } => write!(f, "{}", source),
            Error::NoExecutable { source, .. } => {
                write!(f, "Couldn't determine the current executable: {}", source)
            }
            Error::NoHostname { source, .. } => {
                write!(f, "Couldn't determine this host's name: {}", source)
            }
            _ => write!(f, "Other syslog-record error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadAppName { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::BadHostname { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::BadProcId { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::Configuration { source } => write!(f, "{:?}", source),
            Error::InvalidValue { source } => write!(f, "{:?}", source),
            Error::NoExecutable { source: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::NoHostname { source: _, back } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "syslog-record error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration { source } => Some(source),
            Error::InvalidValue { source } => Some(source),
            Error::NoExecutable { source, .. } | Error::NoHostname { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
