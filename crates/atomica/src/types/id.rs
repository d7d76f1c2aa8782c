use derive_more::Display;
use serde::{Serialize, Serializer};
use std::str::FromStr;
use ulid::Ulid;

///
/// Id
///
/// Document identity. ULID-backed so ids sort by creation time, which keeps
/// selector output stable in logs and tests.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Id(Ulid);

impl Id {
    pub const MIN: Self = Self(Ulid(u128::MIN));

    /// Construct from raw ULID parts (millisecond timestamp + randomness).
    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(Ulid::from_parts(timestamp_ms, random))
    }

    /// Construct from a raw 128-bit value.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Ulid(value))
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0.0
    }
}

impl From<Ulid> for Id {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl FromStr for Id {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

// Ids serialize as their canonical ULID text form; selectors and modifier
// documents never carry the raw 128-bit value on the wire.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_text() {
        let id = Id::from_parts(1_700_000_000_000, 42);
        let text = id.to_string();
        let parsed: Id = text.parse().expect("canonical ULID text must parse");

        assert_eq!(id, parsed);
    }

    #[test]
    fn ids_order_by_timestamp_part() {
        let older = Id::from_parts(1_000, u128::from(u64::MAX));
        let newer = Id::from_parts(2_000, 0);

        assert!(Id::MIN < older);
        assert!(older < newer);
    }
}
