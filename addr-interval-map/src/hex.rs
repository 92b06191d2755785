use crate::error::Error;

pub fn as_hex_string<S, T>(field: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::LowerHex,
{
    serializer.collect_str(&format_args!("{field:#x}"))
}

pub fn from_prefixed_hex_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Deserialize;
    let s = String::deserialize(deserializer)?;
    let s = if let Some(s) = s.strip_prefix("0x") {
        s
    } else {
        return Err(serde::de::Error::custom(format!(
            "Unexpected hex string {s} without 0x prefix."
        )));
    };
    u64::from_str_radix(s, 16).map_err(serde::de::Error::custom)
}

/// Parses a hex address as typed on the command line, with or without `0x`.
pub fn parse_address(s: &str) -> Result<u64, Error> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).map_err(|e| Error::InvalidAddress(s.to_string(), e))
}
