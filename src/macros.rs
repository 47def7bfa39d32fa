//! # Internal Macros
//!
//! ## zerocopy_accessors!
//!
//! Generates getters and setters for `#[repr(C)]` records whose fields use
//! zerocopy little-endian wrappers (`U32`, `U64`). Used by the persisted
//! segment map records.
//!
//! ```ignore
//! impl SegmentRecord {
//!     zerocopy_accessors! {
//!         offset: u64,
//!         count: u64,
//!     }
//! }
//! // pub fn offset(&self) -> u64
//! // pub fn set_offset(&mut self, val: u64)
//! ```

/// Generates getter and setter methods for zerocopy little-endian fields.
#[macro_export]
macro_rules! zerocopy_accessors {
    (@impl $field:ident, u32) => {
        ::paste::paste! {
            #[inline]
            pub fn $field(&self) -> u32 {
                self.$field.get()
            }

            #[inline]
            pub fn [<set_ $field>](&mut self, val: u32) {
                self.$field = ::zerocopy::little_endian::U32::new(val);
            }
        }
    };
    (@impl $field:ident, u64) => {
        ::paste::paste! {
            #[inline]
            pub fn $field(&self) -> u64 {
                self.$field.get()
            }

            #[inline]
            pub fn [<set_ $field>](&mut self, val: u64) {
                self.$field = ::zerocopy::little_endian::U64::new(val);
            }
        }
    };
    ($($field:ident : $ty:tt),* $(,)?) => {
        $(
            $crate::zerocopy_accessors!(@impl $field, $ty);
        )*
    };
}
