use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Empty or inverted address range: start {start:#x} is not below limit {limit:#x}")]
    EmptyRange { start: u64, limit: u64 },

    #[error("Couldn't parse symbol file: {0}")]
    InvalidSymbolFile(
        #[from]
        #[source]
        serde_json::Error,
    ),

    #[error("Invalid address {0:?}, expected a hex number")]
    InvalidAddress(String, #[source] std::num::ParseIntError),
}

impl Error {
    pub fn enum_as_string(&self) -> &'static str {
        match self {
            Error::EmptyRange { .. } => "EmptyRange",
            Error::InvalidSymbolFile(_) => "InvalidSymbolFile",
            Error::InvalidAddress(_, _) => "InvalidAddress",
        }
    }
}
