use core::fmt;
use core::str::FromStr;
use core::time;

use super::*;
use crate::{NANOS_MAX, NANOS_PER_SECOND};

/// `google.protobuf.Duration`
///
/// A signed span of time at nanosecond resolution. `seconds` and `nanos`
/// must agree in sign in the normal form; see [`Duration::normalize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    pub seconds: i64,
    pub nanos: i32,
}

impl Message for Duration {
    const NAME: &'static str = "google.protobuf.Duration";

    fn default_value() -> Duration {
        Duration::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::basic::<scalar::Int64>(w, 1, &self.seconds);
        encode::basic::<scalar::Int32>(w, 2, &self.nanos);
    }

    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Duration, DecodeError> {
        let mut seconds = sentinel::basic::<scalar::Int64>(1);
        let mut nanos = sentinel::basic::<scalar::Int32>(2);
        decode::run(reader, ctx, &mut [&mut seconds, &mut nanos])?;
        Ok(Duration {
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

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Duration, DecodeError> {
        Ok(Duration {
            seconds: json::de::parse::<scalar::Int64>(obj, "seconds", "seconds")?,
            nanos: json::de::parse::<scalar::Int32>(obj, "nanos", "nanos")?,
        })
    }

    fn merge_from(&mut self, other: Duration) {
        merge::scalar::<scalar::Int64>(&mut self.seconds, other.seconds);
        merge::scalar::<scalar::Int32>(&mut self.nanos, other.nanos);
    }
}

impl Duration {
    /// Normalizes the duration to a canonical format: `nanos` within
    /// ±999,999,999 and carrying the same sign as `seconds`. Saturates at
    /// the representable extremes on overflow.
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
                self.nanos = -NANOS_MAX;
            } else {
                self.seconds = i64::MAX;
                self.nanos = NANOS_MAX;
            }
        }

        if self.seconds < 0 && self.nanos > 0 {
            self.seconds += 1;
            self.nanos -= NANOS_PER_SECOND;
        } else if self.seconds > 0 && self.nanos < 0 {
            self.seconds -= 1;
            self.nanos += NANOS_PER_SECOND;
        }
    }
}

/// A duration handling error.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DurationError {
    /// The string was not a well-formed duration per the protobuf JSON
    /// mapping.
    ParseFailure,

    /// A negative `Duration` cannot convert to `std::time::Duration`; the
    /// payload carries the magnitude.
    NegativeDuration(time::Duration),

    /// The `std::time::Duration` exceeds the representable range.
    OutOfRange,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationError::ParseFailure => write!(f, "failed to parse duration"),
            DurationError::NegativeDuration(duration) => {
                write!(f, "failed to convert negative duration: {:?}", duration)
            }
            DurationError::OutOfRange => write!(f, "failed to convert duration out of range"),
        }
    }
}

impl std::error::Error for DurationError {}

impl TryFrom<time::Duration> for Duration {
    type Error = DurationError;

    fn try_from(duration: time::Duration) -> Result<Duration, DurationError> {
        let seconds = i64::try_from(duration.as_secs()).map_err(|_| DurationError::OutOfRange)?;
        let nanos = duration.subsec_nanos() as i32;
        let mut duration = Duration { seconds, nanos };
        duration.normalize();
        Ok(duration)
    }
}

impl TryFrom<Duration> for time::Duration {
    type Error = DurationError;

    fn try_from(mut duration: Duration) -> Result<time::Duration, DurationError> {
        duration.normalize();
        if duration.seconds >= 0 && duration.nanos >= 0 {
            Ok(time::Duration::new(
                duration.seconds as u64,
                duration.nanos as u32,
            ))
        } else {
            Err(DurationError::NegativeDuration(time::Duration::new(
                (-duration.seconds) as u64,
                (-duration.nanos) as u32,
            )))
        }
    }
}

impl fmt::Display for Duration {
    /// Writes the canonical JSON string form, e.g. `"-1.500000000s"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json(&JsonOptions::default()) {
            Json::String(s) => f.write_str(&s),
            _ => Err(fmt::Error),
        }
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Duration, DurationError> {
        Duration::from_json(&Json::String(s.to_owned())).map_err(|_| DurationError::ParseFailure)
    }
}
