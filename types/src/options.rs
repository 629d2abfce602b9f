//! Language dialect and target configuration.
//!
//! Several predicates answer differently depending on the dialect: complete
//! enums count as integral only in C, `void` is a literal type from C++14
//! on, and "POD" means different things before and after C++11. Sizes and
//! alignments come from the target.

/// Which language dialect is being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LangOptions {
    pub c_plus_plus: bool,
    pub c_plus_plus_11: bool,
    pub c_plus_plus_14: bool,
    pub c_plus_plus_17: bool,
    /// Objective-C, including lightweight generics.
    pub objc: bool,
    /// Automatic reference counting for Objective-C objects.
    pub objc_auto_ref_count: bool,
    /// Garbage-collected Objective-C.
    pub objc_gc: bool,
    /// Bounds-checked pointers and arrays.
    pub checked_c: bool,
}

impl Default for LangOptions {
    fn default() -> Self {
        LangOptions::c11()
    }
}

impl LangOptions {
    pub const fn c11() -> Self {
        Self {
            c_plus_plus: false,
            c_plus_plus_11: false,
            c_plus_plus_14: false,
            c_plus_plus_17: false,
            objc: false,
            objc_auto_ref_count: false,
            objc_gc: false,
            checked_c: false,
        }
    }

    pub const fn cxx98() -> Self {
        Self { c_plus_plus: true, ..Self::c11() }
    }

    pub const fn cxx11() -> Self {
        Self { c_plus_plus_11: true, ..Self::cxx98() }
    }

    pub const fn cxx14() -> Self {
        Self { c_plus_plus_14: true, ..Self::cxx11() }
    }

    pub const fn cxx17() -> Self {
        Self { c_plus_plus_17: true, ..Self::cxx14() }
    }

    pub const fn with_objc(self) -> Self {
        Self { objc: true, ..self }
    }

    pub const fn with_objc_arc(self) -> Self {
        Self { objc: true, objc_auto_ref_count: true, ..self }
    }

    pub const fn with_objc_gc(self) -> Self {
        Self { objc: true, objc_gc: true, ..self }
    }

    pub const fn with_checked_c(self) -> Self {
        Self { checked_c: true, ..self }
    }
}

/// Sizes and alignments of the target, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    pub char_signed: bool,
    pub bool_width: u16,
    pub short_width: u16,
    pub int_width: u16,
    pub long_width: u16,
    pub long_long_width: u16,
    pub int128_align: u16,
    pub wchar_width: u16,
    pub wchar_signed: bool,
    pub half_width: u16,
    pub float_width: u16,
    pub double_width: u16,
    pub long_double_width: u16,
    pub long_double_align: u16,
    pub float128_align: u16,
    pub pointer_width: u16,
    /// Largest size, in bits, at which `_Atomic` types are lock-free and
    /// padded to a power of two.
    pub max_atomic_inline_width: u16,
}

impl Default for TargetInfo {
    fn default() -> Self {
        TargetInfo::x86_64()
    }
}

impl TargetInfo {
    /// An LP64 target with x86-64 conventions.
    pub const fn x86_64() -> Self {
        Self {
            char_signed: true,
            bool_width: 8,
            short_width: 16,
            int_width: 32,
            long_width: 64,
            long_long_width: 64,
            int128_align: 128,
            wchar_width: 32,
            wchar_signed: true,
            half_width: 16,
            float_width: 32,
            double_width: 64,
            long_double_width: 128,
            long_double_align: 128,
            float128_align: 128,
            pointer_width: 64,
            max_atomic_inline_width: 128,
        }
    }

    /// An ILP32 target with i386 conventions.
    pub const fn i386() -> Self {
        Self {
            long_width: 32,
            long_double_width: 96,
            long_double_align: 32,
            pointer_width: 32,
            max_atomic_inline_width: 64,
            ..Self::x86_64()
        }
    }
}
