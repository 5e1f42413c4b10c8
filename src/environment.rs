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

//! Process-wide defaults for the HOSTNAME, APP-NAME & PROCID header fields.
//!
//! An [`Environment`] is resolved once, at startup, and shared by every record built through a
//! [`Registry`](crate::registry::Registry). Values are checked against RFC [5424] up-front, so a
//! bad hostname shows up as a startup failure rather than as every single message failing
//! validation.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424

use crate::{
    error::{Error, Result},
    rfc5424::{is_printable_us_ascii, MAX_APP_NAME_LEN, MAX_HOSTNAME_LEN, MAX_PROCESS_ID_LEN},
};

use backtrace::Backtrace;

/// Default header values for records that don't carry their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    hostname: String,
    app_name: String,
    process_id: String,
}

fn checked(s: String, max_len: usize) -> std::result::Result<String, Vec<u8>> {
    if is_printable_us_ascii(&s) && s.len() <= max_len {
        Ok(s)
    } else {
        Err(s.into_bytes())
    }
}

/// The APP-NAME for the executable at `exe`: its file name, cut down to the RFC's forty-eight
/// characters if need be. A file name that can't be made legal (absent, not UTF-8, or containing
/// characters outside PRINTUSASCII) yields the NILVALUE rather than failing startup.
fn app_name_for(exe: &std::path::Path) -> String {
    let name = match exe.file_name().and_then(|os_str| os_str.to_str()) {
        Some(name) if is_printable_us_ascii(name) => name,
        _ => {
            tracing::warn!(?exe, "executable name is not a legal APP-NAME; APP-NAME defaults to nil");
            return String::new();
        }
    };
    if name.len() > MAX_APP_NAME_LEN {
        tracing::warn!(name, "executable name is too long for APP-NAME; truncating");
        // PRINTUSASCII is single-byte, so any index is a char boundary
        name[..MAX_APP_NAME_LEN].to_owned()
    } else {
        name.to_owned()
    }
}

impl Environment {
    /// Construct an [`Environment`] from explicit values; empty strings mean NILVALUE.
    pub fn new(
        hostname: impl Into<String>,
        app_name: impl Into<String>,
        process_id: impl Into<String>,
    ) -> Result<Environment> {
        Ok(Environment {
            hostname: checked(hostname.into(), MAX_HOSTNAME_LEN).map_err(|name| {
                Error::BadHostname {
                    name,
                    back: Backtrace::new(),
                }
            })?,
            app_name: checked(app_name.into(), MAX_APP_NAME_LEN).map_err(|name| {
                Error::BadAppName {
                    name,
                    back: Backtrace::new(),
                }
            })?,
            process_id: checked(process_id.into(), MAX_PROCESS_ID_LEN).map_err(|name| {
                Error::BadProcId {
                    name,
                    back: Backtrace::new(),
                }
            })?,
        })
    }

    /// Discover this process' hostname, executable name & process ID.
    ///
    /// The hostname comes from [gethostname()] (by way of the [hostname] crate); failing to get
    /// one is an error, since it would otherwise be silently missing from every message. The
    /// application name is the file name of [`std::env::current_exe`] (truncated, or nil if it
    /// can't be made RFC-compliant) and the process ID is [`std::process::id`].
    ///
    /// [gethostname()]: https://man7.org/linux/man-pages/man2/gethostname.2.html
    /// [hostname]: https://docs.rs/hostname
    pub fn discover() -> Result<Environment> {
        let hostname = hostname::get()
            .map_err(|err| Error::NoHostname {
                source: Box::new(err),
                back: Backtrace::new(),
            })?
            .into_string()
            .map_err(|name| Error::BadHostname {
                name: name.to_string_lossy().into_owned().into_bytes(),
                back: Backtrace::new(),
            })?;

        let exe = std::env::current_exe().map_err(|err| Error::NoExecutable {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        Environment::new(hostname, app_name_for(&exe), std::process::id().to_string())
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn process_id(&self) -> &str {
        &self.process_id
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn explicit() {
        let env = Environment::new("bree.local", "prototyping", "123").unwrap();
        assert_eq!(env.hostname(), "bree.local");
        assert_eq!(env.app_name(), "prototyping");
        assert_eq!(env.process_id(), "123");

        assert!(Environment::new("", "", "").is_ok());

        assert!(matches!(
            Environment::new("bree local", "a", "1"),
            Err(Error::BadHostname { .. })
        ));
        assert!(matches!(
            Environment::new("h", "0123456789012345678901234567890123456789012345678", "1"),
            Err(Error::BadAppName { .. })
        ));
        assert!(matches!(
            Environment::new("h", "a", "p".repeat(129)),
            Err(Error::BadProcId { .. })
        ));
    }

    #[test]
    fn app_name_from_executable() {
        use std::path::Path;
        assert_eq!(app_name_for(Path::new("/usr/sbin/sshd")), "sshd");
        assert_eq!(app_name_for(Path::new("/")), "");
        assert_eq!(app_name_for(Path::new("/opt/my tool")), "");
        assert_eq!(app_name_for(Path::new("/opt/caf\u{e9}")), "");
        let long = "x".repeat(60);
        assert_eq!(app_name_for(&Path::new("/opt").join(&long)), "x".repeat(48));
        // Whatever discovery comes up with is acceptable to `new`
        assert!(Environment::new("h", app_name_for(&Path::new("/bin").join(&long)), "1").is_ok());
    }

    #[test]
    fn discover() {
        // At least _exercise_ discovery; the process ID is the one thing we can check.
        if let Ok(env) = Environment::discover() {
            assert_eq!(env.process_id(), std::process::id().to_string());
        }
    }
}
