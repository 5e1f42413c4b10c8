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

//! syslog facility & severity defintions.
//!
//! [`Facility`] and [`Severity`] replicate the names used in `<syslog.h>`. Unlike the header, the
//! facility values are *not* pre-shifted; the PRI is formed as `severity | (facility << 3)` at
//! encoding time.
//!
//! Both enumerations can be looked-up by name ([`Facility::from_name`], [`Severity::from_name`]);
//! this is how record types name their defaults in field tags.

type StdResult<T, E> = std::result::Result<T, E>;

/// RFC [5424] defines twenty-four "facilities" for messages.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
///
/// The set of selected sources is, ahem, showing its age (does anyone have a line-printer
/// anymore?), but there it is. Giles Orr's [note] on the topic is worth a read.
///
/// [note]: https://www.gilesorr.com/blog/rsyslog-facility-severity.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0,
    /// random user-level messages
    LOG_USER = 1,
    /// mail system
    LOG_MAIL = 2,
    /// system daemons
    LOG_DAEMON = 3,
    /// security/authorization messages
    LOG_AUTH = 4,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5,
    /// line printer subsystem
    LOG_LPR = 6,
    /// network news subsystem
    LOG_NEWS = 7,
    /// UUCP subsystem
    LOG_UUCP = 8,
    /// clock daemon
    LOG_CRON = 9,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10,
    /// ftp daemon
    LOG_FTP = 11,
    /// NTP subsystem
    LOG_NTP = 12,
    /// log audit
    LOG_AUDIT = 13,
    /// log alert
    LOG_ALERT = 14,
    /// clock daemon (note 2)
    LOG_CLOCK = 15,
    /// reserved for local use
    LOG_LOCAL0 = 16,
    /// reserved for local use
    LOG_LOCAL1 = 17,
    /// reserved for local use
    LOG_LOCAL2 = 18,
    /// reserved for local use
    LOG_LOCAL3 = 19,
    /// reserved for local use
    LOG_LOCAL4 = 20,
    /// reserved for local use
    LOG_LOCAL5 = 21,
    /// reserved for local use
    LOG_LOCAL6 = 22,
    /// reserved for local use
    LOG_LOCAL7 = 23,
}

const FACILITIES: [(Facility, &str); 24] = [
    (Facility::LOG_KERN, "kern"),
    (Facility::LOG_USER, "user"),
    (Facility::LOG_MAIL, "mail"),
    (Facility::LOG_DAEMON, "daemon"),
    (Facility::LOG_AUTH, "auth"),
    (Facility::LOG_SYSLOG, "syslog"),
    (Facility::LOG_LPR, "lpr"),
    (Facility::LOG_NEWS, "news"),
    (Facility::LOG_UUCP, "uucp"),
    (Facility::LOG_CRON, "cron"),
    (Facility::LOG_AUTHPRIV, "authpriv"),
    (Facility::LOG_FTP, "ftp"),
    (Facility::LOG_NTP, "ntp"),
    (Facility::LOG_AUDIT, "audit"),
    (Facility::LOG_ALERT, "alert"),
    (Facility::LOG_CLOCK, "clock"),
    (Facility::LOG_LOCAL0, "local0"),
    (Facility::LOG_LOCAL1, "local1"),
    (Facility::LOG_LOCAL2, "local2"),
    (Facility::LOG_LOCAL3, "local3"),
    (Facility::LOG_LOCAL4, "local4"),
    (Facility::LOG_LOCAL5, "local5"),
    (Facility::LOG_LOCAL6, "local6"),
    (Facility::LOG_LOCAL7, "local7"),
];

/// Strip an optional (case-insensitive) `LOG_` prefix from `name`
fn unprefixed(name: &str) -> &str {
    match name.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("LOG_") => &name[4..],
        _ => name,
    }
}

impl Facility {
    /// Look-up a facility by name.
    ///
    /// Names are matched case-insensitively, with or without the `LOG_` prefix, so "local3",
    /// "Local3" & "LOG_LOCAL3" all name [`Facility::LOG_LOCAL3`].
    pub fn from_name(name: &str) -> Option<Facility> {
        let name = unprefixed(name);
        FACILITIES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(f, _)| *f)
    }
    /// The facility's numeric code (0-23)
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::default::Default for Facility {
    /// The default facility for records that don't say otherwise is `LOG_LOCAL0`.
    fn default() -> Self {
        Facility::LOG_LOCAL0
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "LOG_{}", FACILITIES[*self as usize].1.to_ascii_uppercase())
    }
}

/// RFC [5424] defines eight severity levels for messages. The enumeration values duplicate the
/// constants documented as per the `syslog()` manual [page] & defined in `<syslog.h>`.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// system is unusable
    LOG_EMERG = 0,
    /// action must be take immediately
    LOG_ALERT = 1,
    /// critical conditions
    LOG_CRIT = 2,
    /// error conditions
    LOG_ERR = 3,
    /// warning conditions
    LOG_WARNING = 4,
    /// normal, but significant condition
    LOG_NOTICE = 5,
    /// informational message
    LOG_INFO = 6,
    /// debug-level message
    LOG_DEBUG = 7,
}

// The first name is canonical; the rest are accepted aliases.
const SEVERITIES: [(Severity, &[&str]); 8] = [
    (Severity::LOG_EMERG, &["emerg", "emergency", "panic"]),
    (Severity::LOG_ALERT, &["alert"]),
    (Severity::LOG_CRIT, &["crit", "critical"]),
    (Severity::LOG_ERR, &["err", "error"]),
    (Severity::LOG_WARNING, &["warning", "warn"]),
    (Severity::LOG_NOTICE, &["notice"]),
    (Severity::LOG_INFO, &["info", "informational"]),
    (Severity::LOG_DEBUG, &["debug"]),
];

impl Severity {
    /// Look-up a severity by name.
    ///
    /// Names are matched case-insensitively, with or without the `LOG_` prefix; the common long
    /// forms ("Emergency", "Critical", "Error", ...) are accepted as well.
    pub fn from_name(name: &str) -> Option<Severity> {
        let name = unprefixed(name);
        SEVERITIES
            .iter()
            .find(|(_, names)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
            .map(|(s, _)| *s)
    }
    /// The severity's numeric code (0-7)
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::default::Default for Severity {
    /// The default severity for records that don't say otherwise is `LOG_INFO`.
    fn default() -> Self {
        Severity::LOG_INFO
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "LOG_{}",
            SEVERITIES[*self as usize].1[0].to_ascii_uppercase()
        )
    }
}

#[cfg(test)]
mod facility_severity_tests {
    use super::*;
    /// Test basic PRI formatting
    #[test]
    fn test_pri() {
        assert_eq!(
            14,
            Severity::LOG_INFO.code() | (Facility::LOG_USER.code() << 3)
        );
        assert_eq!(format!("{}", Facility::LOG_FTP), "LOG_FTP".to_string());
        assert_eq!(format!("{:?}", Facility::LOG_FTP), "LOG_FTP".to_string());
        assert_eq!(format!("{}", Severity::LOG_WARNING), "LOG_WARNING");
    }

    #[test]
    fn test_tables_are_in_code_order() {
        for (i, (f, _)) in FACILITIES.iter().enumerate() {
            assert_eq!(f.code() as usize, i);
        }
        for (i, (s, _)) in SEVERITIES.iter().enumerate() {
            assert_eq!(s.code() as usize, i);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Facility::from_name("local7"), Some(Facility::LOG_LOCAL7));
        assert_eq!(Facility::from_name("Daemon"), Some(Facility::LOG_DAEMON));
        assert_eq!(Facility::from_name("LOG_AUTHPRIV"), Some(Facility::LOG_AUTHPRIV));
        assert_eq!(Facility::from_name("local8"), None);
        assert_eq!(Facility::from_name("LOG_"), None);
        assert_eq!(Facility::from_name(""), None);

        assert_eq!(Severity::from_name("crit"), Some(Severity::LOG_CRIT));
        assert_eq!(Severity::from_name("Critical"), Some(Severity::LOG_CRIT));
        assert_eq!(Severity::from_name("LOG_ERR"), Some(Severity::LOG_ERR));
        assert_eq!(Severity::from_name("Emergency"), Some(Severity::LOG_EMERG));
        assert_eq!(Severity::from_name("loud"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Severity::default(), Severity::LOG_INFO);
        assert_eq!(Facility::default(), Facility::LOG_LOCAL0);
    }
}
