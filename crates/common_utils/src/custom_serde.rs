//! Custom serialization/deserialization implementations.

/// Date (de)serialization in the `yyyy-MM-dd` form the payment API expects.
pub mod server_date {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

    const FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

    /// Parse a `yyyy-MM-dd` string into a [`Date`], outside of serde.
    pub fn parse(raw: &str) -> Result<Date, time::error::Parse> {
        Date::parse(raw, FORMAT)
    }

    /// Serialize a [`Date`] as `yyyy-MM-dd`.
    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    /// Deserialize a [`Date`] from `yyyy-MM-dd`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// The same format over `Option<Date>`, for put-if-present fields.
    pub mod option {
        use super::*;

        /// Serialize an optional [`Date`] as `yyyy-MM-dd`.
        pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional [`Date`] from `yyyy-MM-dd`.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }

}
