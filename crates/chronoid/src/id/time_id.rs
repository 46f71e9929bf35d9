use crate::base62::{self, LIMBS};
use crate::{CUSTOM_EPOCH, Error, RandSource, Result, ThreadRandom};
use core::fmt;
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A 160-bit, time-ordered, k-sortable identifier.
///
/// - 32 bits: whole seconds since [`CUSTOM_EPOCH`] (most significant)
/// - 128 bits: random payload (least significant)
///
/// ```text
///  Bit Index:  159            128 127            0
///              +-----------------+---------------+
///  Field:      |  seconds (32)   | payload (128) |
///              +-----------------+---------------+
///              |<-- MSB --- 160 bits --- LSB --->|
/// ```
///
/// The canonical text form is a fixed-width, 27-character radix-62 string
/// over the alphabet `0-9A-Za-z`. Because the alphabet is in ascending ASCII
/// order and the width is fixed, encoded identifiers sort byte-wise in the
/// same order as their creation times.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeId {
    seconds: u32,
    payload: u128,
}

impl TimeId {
    /// Width of the timestamp field in bits.
    pub const SECONDS_BITS: u32 = 32;
    /// Width of the random payload field in bits.
    pub const PAYLOAD_BITS: u32 = 128;
    /// Length of the canonical radix-62 encoding.
    pub const ENCODED_LEN: usize = base62::ENCODED_LEN;

    /// Constructs an identifier from its raw components.
    #[must_use]
    pub const fn from_parts(seconds: u32, payload: u128) -> Self {
        Self { seconds, payload }
    }

    /// Seconds since [`CUSTOM_EPOCH`] at which this identifier was created.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The random payload bits.
    #[must_use]
    pub const fn payload(&self) -> u128 {
        self.payload
    }

    /// Returns the maximum representable timestamp value.
    #[must_use]
    pub const fn max_seconds() -> u32 {
        u32::MAX
    }

    /// Returns the maximum representable payload value.
    #[must_use]
    pub const fn max_payload() -> u128 {
        u128::MAX
    }

    /// Returns `true` if the payload can still be incremented within the
    /// current tick.
    #[must_use]
    pub const fn has_payload_room(&self) -> bool {
        self.payload < Self::max_payload()
    }

    /// Returns a new identifier with the payload incremented by one.
    ///
    /// Callers must check [`Self::has_payload_room`] first; monotonic
    /// generators do.
    #[must_use]
    pub const fn increment_payload(&self) -> Self {
        Self::from_parts(self.seconds, self.payload + 1)
    }

    /// Returns a new identifier for a newer tick with a fresh payload.
    #[must_use]
    pub const fn rollover_to(&self, seconds: u32, payload: u128) -> Self {
        Self::from_parts(seconds, payload)
    }

    /// Generates an identifier using the current system time and the built-in
    /// [`ThreadRandom`] random generator.
    ///
    /// This convenience constructor does **not** maintain any internal state
    /// and therefore does *not* guarantee monotonicity when multiple IDs are
    /// created within the same second. For bursty load or strictly monotonic
    /// output, prefer a stateful generator such as
    /// [`BasicMonoTimeIdGenerator`] or [`LockMonoTimeIdGenerator`].
    ///
    /// [`BasicMonoTimeIdGenerator`]: crate::BasicMonoTimeIdGenerator
    /// [`LockMonoTimeIdGenerator`]: crate::LockMonoTimeIdGenerator
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(SystemTime::now())
    }

    /// Generates an identifier from the given `SystemTime`, using the
    /// built-in [`ThreadRandom`] random generator.
    #[must_use]
    pub fn from_datetime(datetime: SystemTime) -> Self {
        Self::from_datetime_and_rand(datetime, &ThreadRandom)
    }

    /// Generates an identifier from the given `SystemTime` and a custom
    /// random number generator implementing [`RandSource`].
    ///
    /// Times before [`CUSTOM_EPOCH`] clamp to tick zero; times past the
    /// 32-bit range clamp to the maximum tick.
    #[must_use]
    pub fn from_datetime_and_rand<R>(datetime: SystemTime, rng: &R) -> Self
    where
        R: RandSource<u128>,
    {
        let seconds = datetime
            .duration_since(UNIX_EPOCH + CUSTOM_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
            .min(u64::from(Self::max_seconds())) as u32;
        Self::from_seconds_and_rand(seconds, rng)
    }

    /// Generates an identifier for the given tick, using the built-in
    /// [`ThreadRandom`] random generator.
    #[must_use]
    pub fn from_seconds(seconds: u32) -> Self {
        Self::from_seconds_and_rand(seconds, &ThreadRandom)
    }

    /// Generates an identifier for the given tick and a custom random number
    /// generator implementing [`RandSource`].
    #[must_use]
    pub fn from_seconds_and_rand<R>(seconds: u32, rng: &R) -> Self
    where
        R: RandSource<u128>,
    {
        Self::from_parts(seconds, rng.rand())
    }

    /// Returns the creation instant embedded in this identifier.
    ///
    /// The precision is limited to whole seconds; anything finer was never
    /// recorded.
    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        UNIX_EPOCH + CUSTOM_EPOCH + Duration::from_secs(u64::from(self.seconds))
    }

    /// Returns the identifier as 20 big-endian bytes.
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; 20] {
        let mut out = [0_u8; 20];
        let secs = self.seconds.to_be_bytes();
        let payload = self.payload.to_be_bytes();
        let mut i = 0;
        while i < 4 {
            out[i] = secs[i];
            i += 1;
        }
        let mut i = 0;
        while i < 16 {
            out[4 + i] = payload[i];
            i += 1;
        }
        out
    }

    /// Reconstructs an identifier from 20 big-endian bytes.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 20]) -> Self {
        let seconds = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let mut payload_bytes = [0_u8; 16];
        let mut i = 0;
        while i < 16 {
            payload_bytes[i] = bytes[4 + i];
            i += 1;
        }
        Self::from_parts(seconds, u128::from_be_bytes(payload_bytes))
    }

    /// Encodes this identifier into its canonical 27-character radix-62
    /// [`String`].
    ///
    /// The resulting string is guaranteed to be ASCII and lexicographically
    /// sortable.
    ///
    /// # Example
    ///
    /// ```
    /// use chronoid::TimeId;
    ///
    /// let id = TimeId::from_parts(0, 61);
    /// assert_eq!(id.encode(), "00000000000000000000000000z");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buf = [0_u8; Self::ENCODED_LEN];
        self.encode_to_buf(&mut buf);

        // SAFETY: radix-62 output is always valid ASCII
        unsafe { String::from_utf8_unchecked(buf.to_vec()) }
    }

    /// Encodes this identifier into the provided output buffer without heap
    /// allocation.
    ///
    /// This is the zero-allocation alternative to [`Self::encode`].
    pub fn encode_to_buf(&self, buf: &mut [u8; Self::ENCODED_LEN]) {
        base62::encode_base62(self.to_limbs(), buf);
    }

    /// Decodes a canonical radix-62 string back into an identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the input string:
    /// - is not exactly [`Self::ENCODED_LEN`] bytes long
    /// - contains bytes outside the radix-62 alphabet (decoding is
    ///   case-sensitive)
    /// - decodes to a value of 2^160 or more
    ///
    /// # Example
    ///
    /// ```
    /// use chronoid::TimeId;
    ///
    /// let zero = "0".repeat(27);
    /// let id = TimeId::decode(&zero).unwrap();
    /// assert_eq!(id.seconds(), 0);
    /// assert_eq!(id.payload(), 0);
    /// ```
    pub fn decode(s: &str) -> Result<Self, Error> {
        let limbs = base62::decode_base62(s)?;
        Ok(Self::from_limbs(limbs))
    }

    /// The 160-bit value as little-endian 64-bit limbs for the codec.
    const fn to_limbs(self) -> [u64; LIMBS] {
        [
            self.payload as u64,
            (self.payload >> 64) as u64,
            self.seconds as u64,
        ]
    }

    const fn from_limbs(limbs: [u64; LIMBS]) -> Self {
        let payload = ((limbs[1] as u128) << 64) | limbs[0] as u128;
        Self::from_parts(limbs[2] as u32, payload)
    }
}

impl fmt::Display for TimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode().fmt(f)
    }
}

impl fmt::Debug for TimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("TimeId");
        dbg.field("encoded", &self.encode());
        dbg.field(
            "seconds",
            &format_args!("{} (0x{:x})", self.seconds, self.seconds),
        );
        dbg.field("payload", &format_args!("0x{:032x}", self.payload));
        dbg.finish()
    }
}

impl PartialEq<str> for TimeId {
    fn eq(&self, other: &str) -> bool {
        Self::decode(other).map(|id| id == *self).unwrap_or(false)
    }
}

impl PartialEq<&str> for TimeId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<TimeId> for &str {
    fn eq(&self, other: &TimeId) -> bool {
        other == *self
    }
}

impl PartialEq<String> for TimeId {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<TimeId> for String {
    fn eq(&self, other: &TimeId) -> bool {
        other == self
    }
}

impl From<TimeId> for String {
    fn from(val: TimeId) -> Self {
        val.encode()
    }
}

impl From<&TimeId> for String {
    fn from(val: &TimeId) -> Self {
        val.encode()
    }
}

impl core::convert::TryFrom<&str> for TimeId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::decode(s)
    }
}

impl core::str::FromStr for TimeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base62::Base62Error;

    /// Identifier minted by a 2019-era deployment; decodes to a mid-2019
    /// creation instant.
    const SAMPLE: &str = "1KDT7Ov7ZJ4BKneIK5PrtYkWQUs";

    struct MockRand;
    impl RandSource<u128> for MockRand {
        fn rand(&self) -> u128 {
            42
        }
    }

    #[test]
    fn id_fields_and_bounds() {
        let id = TimeId::from_parts(TimeId::max_seconds(), TimeId::max_payload());
        assert_eq!(id.seconds(), u32::MAX);
        assert_eq!(id.payload(), u128::MAX);
        assert!(!id.has_payload_room());

        let id = TimeId::from_parts(0, 0);
        assert_eq!(id.seconds(), 0);
        assert_eq!(id.payload(), 0);
        assert!(id.has_payload_room());
        assert_eq!(id.increment_payload().payload(), 1);
    }

    #[test]
    fn rollover_replaces_both_fields() {
        let id = TimeId::from_parts(7, u128::MAX);
        let next = id.rollover_to(8, 3);
        assert_eq!(next.seconds(), 8);
        assert_eq!(next.payload(), 3);
    }

    #[test]
    fn from_seconds_and_rand_packs_components() {
        let id = TimeId::from_seconds_and_rand(42, &MockRand);
        assert_eq!(id.seconds(), 42);
        assert_eq!(id.payload(), 42);
    }

    #[test]
    fn created_at_offsets_from_custom_epoch() {
        let id = TimeId::from_parts(5, 0);
        assert_eq!(
            id.created_at(),
            UNIX_EPOCH + CUSTOM_EPOCH + Duration::from_secs(5)
        );

        let id = TimeId::from_parts(0, u128::MAX);
        assert_eq!(id.created_at(), UNIX_EPOCH + CUSTOM_EPOCH);
    }

    #[test]
    fn from_datetime_at_epoch_is_tick_zero() {
        let id = TimeId::from_datetime_and_rand(UNIX_EPOCH + CUSTOM_EPOCH, &MockRand);
        assert_eq!(id.seconds(), 0);

        // Pre-epoch times clamp rather than wrap
        let id = TimeId::from_datetime_and_rand(UNIX_EPOCH, &MockRand);
        assert_eq!(id.seconds(), 0);

        let id = TimeId::from_datetime_and_rand(
            UNIX_EPOCH + CUSTOM_EPOCH + Duration::from_secs(1000),
            &MockRand,
        );
        assert_eq!(id.seconds(), 1000);
    }

    #[test]
    fn now_embeds_a_recent_creation_instant() {
        let id = TimeId::now();
        let decoded = id.created_at();
        // Whole-second truncation plus scheduling slack
        assert!(decoded <= SystemTime::now() + Duration::from_secs(2));
        assert!(decoded >= UNIX_EPOCH + CUSTOM_EPOCH);
    }

    #[test]
    fn encode_produces_fixed_width_ascii() {
        for id in [
            TimeId::from_parts(0, 0),
            TimeId::now(),
            TimeId::from_parts(u32::MAX, u128::MAX),
        ] {
            let s = id.encode();
            assert_eq!(s.len(), TimeId::ENCODED_LEN);
            assert!(s.is_ascii());
            assert!(!s.is_empty());
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        for id in [
            TimeId::from_parts(0, 0),
            TimeId::from_parts(0, 1),
            TimeId::from_parts(1, 0),
            TimeId::from_parts(42, 42),
            TimeId::now(),
            TimeId::from_parts(u32::MAX, u128::MAX),
        ] {
            let encoded = id.encode();
            let decoded = TimeId::decode(&encoded).unwrap();
            assert_eq!(id, decoded, "roundtrip for {encoded}");
        }
    }

    #[test]
    fn sample_identifier_roundtrips() {
        let id = TimeId::decode(SAMPLE).unwrap();
        assert_eq!(id.encode(), SAMPLE);
        assert_eq!(id, SAMPLE);

        let created = id.created_at();
        assert!(created > UNIX_EPOCH + CUSTOM_EPOCH);
        assert!(created < SystemTime::now());
    }

    #[test]
    fn id_order_matches_encoded_order() {
        let ascending = [
            TimeId::from_parts(0, 0),
            TimeId::from_parts(0, 61),
            TimeId::from_parts(0, 62),
            TimeId::from_parts(0, u128::MAX),
            TimeId::from_parts(1, 0),
            TimeId::from_parts(1, 1),
            TimeId::from_parts(2, 0),
            TimeId::from_parts(u32::MAX, u128::MAX),
        ];
        for pair in ascending.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].encode() < pair[1].encode());
        }
    }

    #[test]
    fn be_bytes_roundtrip_preserves_order() {
        let a = TimeId::from_parts(7, 100);
        let b = TimeId::from_parts(8, 0);
        assert_eq!(TimeId::from_be_bytes(a.to_be_bytes()), a);
        assert_eq!(TimeId::from_be_bytes(b.to_be_bytes()), b);
        assert!(a.to_be_bytes() < b.to_be_bytes());
    }

    #[test]
    fn display_and_parse_roundtrip() {
        let id = TimeId::from_parts(123, 456);
        let s = id.to_string();
        assert_eq!(s, id.encode());
        let parsed: TimeId = s.parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(TimeId::try_from(s.as_str()).unwrap(), id);
    }

    #[test]
    fn string_equality_bridges() {
        let id = TimeId::from_parts(0, 61);
        assert_eq!(id, "00000000000000000000000000z");
        assert_eq!("00000000000000000000000000z", id);
        assert_eq!(id, String::from(id));
        // Malformed strings are simply unequal
        assert!(id != "not an id");
    }

    #[test]
    fn decode_propagates_codec_errors() {
        let err = TimeId::decode("too short").unwrap_err();
        assert_eq!(err, Error::Base62(Base62Error::DecodeInvalidLen { len: 9 }));

        let err = TimeId::decode(&"z".repeat(TimeId::ENCODED_LEN)).unwrap_err();
        assert_eq!(err, Error::Base62(Base62Error::DecodeOverflow));
    }

    #[test]
    fn debug_shows_components() {
        let id = TimeId::from_parts(1, 2);
        let dbg = format!("{id:#?}");
        assert!(dbg.contains("seconds"));
        assert!(dbg.contains("payload"));
    }
}
