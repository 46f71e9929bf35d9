use crate::TimeId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for TimeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0_u8; Self::ENCODED_LEN];
        self.encode_to_buf(&mut buf);
        // SAFETY: radix-62 output is always valid ASCII
        s.serialize_str(unsafe { core::str::from_utf8_unchecked(&buf) })
    }
}

impl<'de> Deserialize<'de> for TimeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Base62Visitor;

        impl serde::de::Visitor<'_> for Base62Visitor {
            type Value = TimeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a 27-character radix-62 encoded string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                TimeId::decode(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(Base62Visitor)
    }
}
