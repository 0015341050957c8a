use core::fmt;
use core::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use super::*;
use crate::{NANOS_MAX, NANOS_PER_SECOND};

/// `google.protobuf.Timestamp`
///
/// A point in time as seconds and non-negative nanos since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Message for Timestamp {
    const NAME: &'static str = "google.protobuf.Timestamp";

    fn default_value() -> Timestamp {
        Timestamp::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::basic::<scalar::Int64>(w, 1, &self.seconds);
        encode::basic::<scalar::Int32>(w, 2, &self.nanos);
    }

    fn decode_fields(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<Timestamp, DecodeError> {
        let mut seconds = sentinel::basic::<scalar::Int64>(1);
        let mut nanos = sentinel::basic::<scalar::Int32>(2);
        decode::run(reader, ctx, &mut [&mut seconds, &mut nanos])?;
        Ok(Timestamp {
            seconds: seconds.finish(),
            nanos: nanos.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit::<scalar::Int64>(&mut obj, "seconds", "seconds", &self.seconds, opts);
        json::ser::emit::<scalar::Int32>(&mut obj, "nanos", "nanos", &self.nanos, opts);
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Timestamp, DecodeError> {
        Ok(Timestamp {
            seconds: json::de::parse::<scalar::Int64>(obj, "seconds", "seconds")?,
            nanos: json::de::parse::<scalar::Int32>(obj, "nanos", "nanos")?,
        })
    }

    fn merge_from(&mut self, other: Timestamp) {
        merge::scalar::<scalar::Int64>(&mut self.seconds, other.seconds);
        merge::scalar::<scalar::Int32>(&mut self.nanos, other.nanos);
    }
}

impl Timestamp {
    /// Normalizes to canonical format: `nanos` in `[0, 999,999,999]`,
    /// counting forward in time even before the epoch. Saturates on
    /// overflow.
    pub fn normalize(&mut self) {
        if self.nanos <= -NANOS_PER_SECOND || self.nanos >= NANOS_PER_SECOND {
            if let Some(seconds) = self
                .seconds
                .checked_add(i64::from(self.nanos / NANOS_PER_SECOND))
            {
                self.seconds = seconds;
                self.nanos %= NANOS_PER_SECOND;
            } else if self.nanos < 0 {
                self.seconds = i64::MIN;
                self.nanos = 0;
            } else {
                self.seconds = i64::MAX;
                self.nanos = NANOS_MAX;
            }
        }

        if self.nanos < 0 {
            if let Some(seconds) = self.seconds.checked_sub(1) {
                self.seconds = seconds;
                self.nanos += NANOS_PER_SECOND;
            } else {
                self.seconds = i64::MIN;
                self.nanos = 0;
            }
        }
    }
}

/// A timestamp handling error.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimestampError {
    /// The string was not RFC 3339 per the protobuf JSON mapping.
    ParseFailure,

    /// The timestamp does not fit a `SystemTime`.
    OutOfSystemRange(Timestamp),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::ParseFailure => write!(f, "failed to parse timestamp"),
            TimestampError::OutOfSystemRange(timestamp) => write!(
                f,
                "timestamp out of system range: {:?}",
                timestamp
            ),
        }
    }
}

impl std::error::Error for TimestampError {}

impl From<SystemTime> for Timestamp {
    fn from(system_time: SystemTime) -> Timestamp {
        let (seconds, nanos) = match system_time.duration_since(UNIX_EPOCH) {
            Ok(duration) => (duration.as_secs() as i64, duration.subsec_nanos() as i32),
            Err(error) => {
                let duration = error.duration();
                let seconds = -(duration.as_secs() as i64);
                let nanos = duration.subsec_nanos() as i32;
                if nanos == 0 {
                    (seconds, 0)
                } else {
                    (seconds - 1, NANOS_PER_SECOND - nanos)
                }
            }
        };
        Timestamp { seconds, nanos }
    }
}

impl TryFrom<Timestamp> for SystemTime {
    type Error = TimestampError;

    fn try_from(mut timestamp: Timestamp) -> Result<SystemTime, TimestampError> {
        let original = timestamp;
        timestamp.normalize();
        let base = if timestamp.seconds >= 0 {
            UNIX_EPOCH.checked_add(std::time::Duration::from_secs(timestamp.seconds as u64))
        } else {
            UNIX_EPOCH.checked_sub(std::time::Duration::from_secs(
                timestamp.seconds.unsigned_abs(),
            ))
        };
        base.and_then(|time| {
            time.checked_add(std::time::Duration::from_nanos(timestamp.nanos as u64))
        })
        .ok_or(TimestampError::OutOfSystemRange(original))
    }
}

impl fmt::Display for Timestamp {
    /// Writes the RFC 3339 form, e.g. `"2024-03-08T20:54:43.500000001Z"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json(&JsonOptions::default()) {
            Json::String(s) => f.write_str(&s),
            _ => Err(fmt::Error),
        }
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Timestamp, TimestampError> {
        Timestamp::from_json(&Json::String(s.to_owned())).map_err(|_| TimestampError::ParseFailure)
    }
}
