use core::fmt;

/// Why an information element or message header could not be decoded or encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IeParseErr {
    /// Ran out of octets. `field` is the field being read, when known
    BufferEnded { field: Option<&'static str> },
    InvalidValue { field: &'static str, value: u64 },
    /// Octet group did not continue or stop where the element defines it to
    InvalidExtBit { field: &'static str },
    InvalidElemId { found: u64 },
    InconsistentLength { expected: usize, found: usize },
    Inconsistency { field: &'static str, reason: &'static str },
    NotImplemented { field: Option<&'static str> },
}

impl fmt::Display for IeParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IeParseErr::BufferEnded { field: Some(field) } => write!(f, "element truncated at {}", field),
            IeParseErr::BufferEnded { field: None } => write!(f, "element truncated"),
            IeParseErr::InvalidValue { field, value } => write!(f, "{} = {} is not a coded value", field, value),
            IeParseErr::InvalidExtBit { field } => write!(f, "bad extension bit in {}", field),
            IeParseErr::InvalidElemId { found } => write!(f, "unexpected element identifier 0x{:02x}", found),
            IeParseErr::InconsistentLength { expected, found } => {
                write!(f, "length {} where at most {} fits", found, expected)
            }
            IeParseErr::Inconsistency { field, reason } => write!(f, "{}: {}", field, reason),
            IeParseErr::NotImplemented { field: Some(field) } => write!(f, "{} not supported", field),
            IeParseErr::NotImplemented { field: None } => write!(f, "not supported"),
        }
    }
}

impl std::error::Error for IeParseErr {}

/// `Err(InvalidValue)` unless `$value == $expected`
#[macro_export]
macro_rules! expect_value {
    ($value:expr, $expected:expr, $field:expr) => {{
        let v = $value;
        if v != $expected {
            Err($crate::ie_parse_error::IeParseErr::InvalidValue { field: $field, value: v.into() })
        } else {
            Ok(())
        }
    }};
}

/// `Err(InvalidExtBit)` unless the extension bit is `$expected`.
/// 1 ends an octet group, 0 says another octet of the group follows.
#[macro_export]
macro_rules! expect_ext {
    ($ext:expr, $expected:expr, $field:expr) => {{
        if $ext != $expected {
            Err($crate::ie_parse_error::IeParseErr::InvalidExtBit { field: $field })
        } else {
            Ok(())
        }
    }};
}
