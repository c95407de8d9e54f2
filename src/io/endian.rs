//! Byte order detection and swapping.
//!
//! Native order is probed at runtime from the in-memory layout of a `u16`,
//! so the same code path runs on every target without `cfg` switches.

/// Byte order of an archive session.
///
/// The discriminants are the values stored in the first byte of every archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Endianness {
    /// Most significant byte first.
    Big = 0,
    /// Least significant byte first.
    Little = 1,
}

impl Endianness {
    /// Byte order of the running machine.
    #[inline]
    pub fn native() -> Self {
        // Low-order byte of 1 is non-zero only on little endian machines.
        if 1u16.to_ne_bytes()[0] != 0 {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Decode the archive header byte. Any non-zero value reads as little endian.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        if value == 0 {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Header byte value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a CLI style name: `native`, `little` or `big`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "native" => Some(Self::native()),
            "little" => Some(Self::Little),
            "big" => Some(Self::Big),
            _ => None,
        }
    }

    /// Lower case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Little => "little",
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Self::native()
    }
}

/// Byte reversal of fixed-width scalars.
///
/// Implemented per width: 1-byte types return their input, 2/4/8-byte types
/// reverse their bytes.
pub trait EndianSwap: Copy {
    /// Return `self` with its bytes reversed.
    fn endian_swap(self) -> Self;
}

macro_rules! impl_swap_identity {
    ($($ty:ty),*) => {$(
        impl EndianSwap for $ty {
            #[inline(always)]
            fn endian_swap(self) -> Self {
                self
            }
        }
    )*};
}

macro_rules! impl_swap_int {
    ($($ty:ty),*) => {$(
        impl EndianSwap for $ty {
            #[inline(always)]
            fn endian_swap(self) -> Self {
                self.swap_bytes()
            }
        }
    )*};
}

macro_rules! impl_swap_float {
    ($($ty:ty),*) => {$(
        impl EndianSwap for $ty {
            #[inline(always)]
            fn endian_swap(self) -> Self {
                <$ty>::from_bits(self.to_bits().swap_bytes())
            }
        }
    )*};
}

impl_swap_identity!(u8, i8);
impl_swap_int!(u16, i16, u32, i32, u64, i64);
impl_swap_float!(f32, f64);

/// Return `value` with its bytes reversed.
#[inline]
pub fn endian_swap<T: EndianSwap>(value: T) -> T {
    value.endian_swap()
}

/// Reverse the bytes of every element of `values` in place.
#[inline]
pub fn endian_swap_slice<T: EndianSwap>(values: &mut [T]) {
    for value in values.iter_mut() {
        *value = value.endian_swap();
    }
}
