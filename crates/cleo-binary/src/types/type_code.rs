//! Element type codes.

/// Element encoding of an array payload.
///
/// | Variant   | Code | Width |
/// |-----------|------|-------|
/// | `Float64` | `d`  | 8     |
/// | `Float32` | `f`  | 4     |
/// | `UInt32`  | `I`  | 4     |
/// | `UInt64`  | `Q`  | 8     |
/// | `Int32`   | `i`  | 4     |
/// | `Int64`   | `q`  | 8     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// 8-byte IEEE float.
    Float64,
    /// 4-byte IEEE float.
    Float32,
    /// 4-byte unsigned integer.
    UInt32,
    /// 8-byte unsigned integer.
    UInt64,
    /// 4-byte signed integer.
    Int32,
    /// 8-byte signed integer.
    Int64,
}

impl TypeCode {
    /// All supported codes, in table order.
    pub const ALL: [TypeCode; 6] = [
        Self::Float64,
        Self::Float32,
        Self::UInt32,
        Self::UInt64,
        Self::Int32,
        Self::Int64,
    ];

    /// Single-character code written to the preamble.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Float64 => 'd',
            Self::Float32 => 'f',
            Self::UInt32 => 'I',
            Self::UInt64 => 'Q',
            Self::Int32 => 'i',
            Self::Int64 => 'q',
        }
    }

    /// Parse a single-character code.
    #[must_use]
    pub fn from_char(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tc| tc.as_char() == code)
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Float32 | Self::UInt32 | Self::Int32 => 4,
            Self::Float64 | Self::UInt64 | Self::Int64 => 8,
        }
    }

    /// True for floating-point codes.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float64 | Self::Float32)
    }

    /// True for unsigned integer codes.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::UInt32 | Self::UInt64)
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
