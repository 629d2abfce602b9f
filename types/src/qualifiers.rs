//! Qualifier sets.
//!
//! A [`Qualifiers`] value packs every qualifier axis into a single `u32`:
//!
//! | bits    | axis                                   |
//! |---------|----------------------------------------|
//! | 0..3    | cv-restrict mask ([`Cvr`])             |
//! | 3..5    | garbage-collection annotation          |
//! | 5..8    | ownership lifetime                     |
//! | 8..32   | address space                          |
//!
//! All operations are pure value computations and never allocate.

use core::fmt;

use bitflags::bitflags;

use crate::core::{QualType, Ty};
use crate::error::QualifierError;

bitflags! {
    /// The "fast" qualifiers: const, restrict and volatile.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Cvr: u8 {
        const CONST = 1;
        const RESTRICT = 1 << 1;
        const VOLATILE = 1 << 2;
    }
}

/// Garbage-collection annotation (`__weak` / `__strong` under GC).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum GcAttr {
    #[default]
    None,
    Weak,
    Strong,
}

/// Reference-counting ownership annotation.
///
/// The declaration order matters: every lifetime after `ExplicitNone`
/// requires non-trivial copy and destruction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Lifetime {
    #[default]
    None,
    ExplicitNone,
    Strong,
    Weak,
    Autoreleasing,
}

/// Address space of an object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum AddressSpace {
    #[default]
    Default,
    OpenClGlobal,
    OpenClLocal,
    OpenClConstant,
    OpenClPrivate,
    OpenClGeneric,
    CudaDevice,
    CudaConstant,
    CudaShared,
    /// A numbered, target-specific address space.
    Target(u32),
}

const FIRST_TARGET_SPACE: u32 = 9;
const MAX_TARGET_SPACE: u32 = (1 << 24) - 1 - FIRST_TARGET_SPACE;

impl AddressSpace {
    fn encode(self) -> u32 {
        match self {
            AddressSpace::Default => 0,
            AddressSpace::OpenClGlobal => 1,
            AddressSpace::OpenClLocal => 2,
            AddressSpace::OpenClConstant => 3,
            AddressSpace::OpenClPrivate => 4,
            AddressSpace::OpenClGeneric => 5,
            AddressSpace::CudaDevice => 6,
            AddressSpace::CudaConstant => 7,
            AddressSpace::CudaShared => 8,
            AddressSpace::Target(n) => {
                debug_assert!(n <= MAX_TARGET_SPACE, "address space {n} out of range");
                FIRST_TARGET_SPACE + n.min(MAX_TARGET_SPACE)
            }
        }
    }

    fn decode(raw: u32) -> Self {
        match raw {
            0 => AddressSpace::Default,
            1 => AddressSpace::OpenClGlobal,
            2 => AddressSpace::OpenClLocal,
            3 => AddressSpace::OpenClConstant,
            4 => AddressSpace::OpenClPrivate,
            5 => AddressSpace::OpenClGeneric,
            6 => AddressSpace::CudaDevice,
            7 => AddressSpace::CudaConstant,
            8 => AddressSpace::CudaShared,
            n => AddressSpace::Target(n - FIRST_TARGET_SPACE),
        }
    }

    /// Whether an object in `other` may be addressed through `self`.
    pub fn is_superset_of(self, other: AddressSpace) -> bool {
        self == other
            || (self == AddressSpace::OpenClGeneric
                && matches!(
                    other,
                    AddressSpace::OpenClGlobal
                        | AddressSpace::OpenClLocal
                        | AddressSpace::OpenClPrivate
                ))
    }
}

const CVR_MASK: u32 = 0b111;
const GC_SHIFT: u32 = 3;
const GC_MASK: u32 = 0b11 << GC_SHIFT;
const LIFETIME_SHIFT: u32 = 5;
const LIFETIME_MASK: u32 = 0b111 << LIFETIME_SHIFT;
const ADDRESS_SPACE_SHIFT: u32 = 8;
const ADDRESS_SPACE_MASK: u32 = !0 << ADDRESS_SPACE_SHIFT;

/// An immutable set of type qualifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Qualifiers(u32);

static_assertions::assert_eq_size!(Qualifiers, u32);

impl Qualifiers {
    pub const EMPTY: Qualifiers = Qualifiers(0);

    pub const fn from_cvr(cvr: Cvr) -> Self {
        Qualifiers(cvr.bits() as u32)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    // === Axes ===

    pub fn cvr(self) -> Cvr {
        Cvr::from_bits_truncate((self.0 & CVR_MASK) as u8)
    }

    pub fn has_const(self) -> bool {
        self.cvr().contains(Cvr::CONST)
    }

    pub fn has_volatile(self) -> bool {
        self.cvr().contains(Cvr::VOLATILE)
    }

    pub fn has_restrict(self) -> bool {
        self.cvr().contains(Cvr::RESTRICT)
    }

    pub fn gc(self) -> GcAttr {
        match (self.0 & GC_MASK) >> GC_SHIFT {
            0 => GcAttr::None,
            1 => GcAttr::Weak,
            _ => GcAttr::Strong,
        }
    }

    pub fn has_gc(self) -> bool {
        self.gc() != GcAttr::None
    }

    pub fn lifetime(self) -> Lifetime {
        match (self.0 & LIFETIME_MASK) >> LIFETIME_SHIFT {
            0 => Lifetime::None,
            1 => Lifetime::ExplicitNone,
            2 => Lifetime::Strong,
            3 => Lifetime::Weak,
            _ => Lifetime::Autoreleasing,
        }
    }

    pub fn has_lifetime(self) -> bool {
        self.lifetime() != Lifetime::None
    }

    /// Strong, weak and autoreleasing lifetimes need non-trivial copies.
    pub fn has_non_trivial_lifetime(self) -> bool {
        self.lifetime() > Lifetime::ExplicitNone
    }

    pub fn address_space(self) -> AddressSpace {
        AddressSpace::decode((self.0 & ADDRESS_SPACE_MASK) >> ADDRESS_SPACE_SHIFT)
    }

    pub fn has_address_space(self) -> bool {
        self.0 & ADDRESS_SPACE_MASK != 0
    }

    /// Just the cv-restrict part, which is what fits in a handle.
    pub fn fast(self) -> Qualifiers {
        Qualifiers(self.0 & CVR_MASK)
    }

    pub fn has_non_fast_qualifiers(self) -> bool {
        self.0 & !CVR_MASK != 0
    }

    // === Builders ===

    pub fn with_cvr(self, cvr: Cvr) -> Self {
        Qualifiers(self.0 | cvr.bits() as u32)
    }

    pub fn with_const(self) -> Self {
        self.with_cvr(Cvr::CONST)
    }

    pub fn with_volatile(self) -> Self {
        self.with_cvr(Cvr::VOLATILE)
    }

    pub fn with_restrict(self) -> Self {
        self.with_cvr(Cvr::RESTRICT)
    }

    pub fn without_cvr(self, cvr: Cvr) -> Self {
        Qualifiers(self.0 & !(cvr.bits() as u32))
    }

    pub fn with_gc(self, gc: GcAttr) -> Self {
        let raw = match gc {
            GcAttr::None => 0,
            GcAttr::Weak => 1,
            GcAttr::Strong => 2,
        };
        Qualifiers((self.0 & !GC_MASK) | (raw << GC_SHIFT))
    }

    pub fn with_lifetime(self, lifetime: Lifetime) -> Self {
        let raw = match lifetime {
            Lifetime::None => 0,
            Lifetime::ExplicitNone => 1,
            Lifetime::Strong => 2,
            Lifetime::Weak => 3,
            Lifetime::Autoreleasing => 4,
        };
        Qualifiers((self.0 & !LIFETIME_MASK) | (raw << LIFETIME_SHIFT))
    }

    pub fn without_lifetime(self) -> Self {
        self.with_lifetime(Lifetime::None)
    }

    pub fn with_address_space(self, space: AddressSpace) -> Self {
        Qualifiers((self.0 & !ADDRESS_SPACE_MASK) | (space.encode() << ADDRESS_SPACE_SHIFT))
    }

    // === Set algebra ===

    /// Union of two sets. Where both sides set the same non-cvr axis to
    /// different values, `other` wins.
    pub fn union(self, other: Qualifiers) -> Qualifiers {
        let mut out = Qualifiers(self.0 | (other.0 & CVR_MASK));
        if other.has_gc() {
            out = out.with_gc(other.gc());
        }
        if other.has_lifetime() {
            out = out.with_lifetime(other.lifetime());
        }
        if other.has_address_space() {
            out = out.with_address_space(other.address_space());
        }
        out
    }

    /// Removes every qualifier of `other` that is present in `self`.
    ///
    /// Non-cvr axes are only removed when both sides agree on the value.
    pub fn remove(self, other: Qualifiers) -> Qualifiers {
        let mut out = Qualifiers(self.0 & !(other.0 & CVR_MASK));
        if other.has_gc() && out.gc() == other.gc() {
            out = out.with_gc(GcAttr::None);
        }
        if other.has_lifetime() && out.lifetime() == other.lifetime() {
            out = out.without_lifetime();
        }
        if other.has_address_space() && out.address_space() == other.address_space() {
            out = out.with_address_space(AddressSpace::Default);
        }
        out
    }

    /// Two sets are consistent when every non-cvr axis is equal or unset
    /// on at least one side.
    pub fn is_consistent_with(self, other: Qualifiers) -> bool {
        (!self.has_gc() || !other.has_gc() || self.gc() == other.gc())
            && (!self.has_lifetime() || !other.has_lifetime() || self.lifetime() == other.lifetime())
            && (!self.has_address_space()
                || !other.has_address_space()
                || self.address_space() == other.address_space())
    }

    /// Merges qualifiers that are known to be consistent.
    ///
    /// Merging inconsistent sets is a contract violation, caught in debug
    /// builds.
    pub fn add_consistent(&mut self, other: Qualifiers) {
        debug_assert!(
            self.is_consistent_with(other),
            "inconsistent qualifier merge: {self:?} + {other:?}"
        );
        *self = self.union(other);
    }

    /// Checked form of [`Qualifiers::add_consistent`].
    pub fn try_add_consistent(self, other: Qualifiers) -> Result<Qualifiers, QualifierError> {
        if self.has_address_space()
            && other.has_address_space()
            && self.address_space() != other.address_space()
        {
            return Err(QualifierError::AddressSpaceConflict {
                left: self.address_space(),
                right: other.address_space(),
            });
        }
        if self.has_gc() && other.has_gc() && self.gc() != other.gc() {
            return Err(QualifierError::GcConflict { left: self.gc(), right: other.gc() });
        }
        if self.has_lifetime() && other.has_lifetime() && self.lifetime() != other.lifetime() {
            return Err(QualifierError::LifetimeConflict {
                left: self.lifetime(),
                right: other.lifetime(),
            });
        }
        Ok(self.union(other))
    }

    /// `self` strictly contains `other`: they differ, the cv bits of `self`
    /// include those of `other`, and each other axis either matches or is
    /// set only on `self`.
    pub fn is_strict_superset_of(self, other: Qualifiers) -> bool {
        self != other
            && (self.0 & CVR_MASK) | (other.0 & CVR_MASK) == (self.0 & CVR_MASK)
            && (self.gc() == other.gc() || (self.has_gc() && !other.has_gc()))
            && (self.address_space() == other.address_space()
                || (self.has_address_space() && !other.has_address_space()))
            && (self.lifetime() == other.lifetime()
                || (self.has_lifetime() && !other.has_lifetime()))
    }

    /// Whether a reference to `self`-qualified storage can bind to
    /// `other`-qualified storage.
    pub fn compatibly_includes(self, other: Qualifiers) -> bool {
        self.address_space().is_superset_of(other.address_space())
            && (self.gc() == other.gc() || !self.has_gc() || !other.has_gc())
            && self.lifetime() == other.lifetime()
            && (self.0 & CVR_MASK) | (other.0 & CVR_MASK) == (self.0 & CVR_MASK)
    }
}

/// Accumulates qualifiers while sugar is stripped off a type, so they can
/// be re-applied to the node that remains.
#[derive(Clone, Copy, Debug, Default)]
pub struct QualifierCollector(Qualifiers);

impl QualifierCollector {
    pub fn new(initial: Qualifiers) -> Self {
        Self(initial)
    }

    /// Takes the qualifiers off `qt`, returning the bare node.
    pub fn strip<'tcx>(&mut self, qt: QualType<'tcx>) -> Ty<'tcx> {
        self.0.add_consistent(qt.quals);
        qt.ty
    }

    pub fn add(&mut self, quals: Qualifiers) {
        self.0.add_consistent(quals);
    }

    pub fn qualifiers(&self) -> Qualifiers {
        self.0
    }

    /// Re-applies everything collected to `qt`.
    pub fn apply<'tcx>(&self, qt: QualType<'tcx>) -> QualType<'tcx> {
        qt.with_quals(self.0)
    }
}

impl From<Cvr> for Qualifiers {
    fn from(cvr: Cvr) -> Self {
        Qualifiers::from_cvr(cvr)
    }
}

impl fmt::Debug for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Qualifiers()");
        }
        write!(f, "Qualifiers({self})")
    }
}

/// Prints qualifiers the way they are spelled in source, space separated.
impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut word = |f: &mut fmt::Formatter<'_>, s: &str| -> fmt::Result {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(s)
        };
        if self.has_const() {
            word(f, "const")?;
        }
        if self.has_volatile() {
            word(f, "volatile")?;
        }
        if self.has_restrict() {
            word(f, "restrict")?;
        }
        match self.address_space() {
            AddressSpace::Default => {}
            AddressSpace::OpenClGlobal => word(f, "__global")?,
            AddressSpace::OpenClLocal => word(f, "__local")?,
            AddressSpace::OpenClConstant => word(f, "__constant")?,
            AddressSpace::OpenClPrivate => word(f, "__private")?,
            AddressSpace::OpenClGeneric => word(f, "__generic")?,
            AddressSpace::CudaDevice => word(f, "__device__")?,
            AddressSpace::CudaConstant => word(f, "__constant__")?,
            AddressSpace::CudaShared => word(f, "__shared__")?,
            AddressSpace::Target(n) => word(f, &alloc::format!("__attribute__((address_space({n})))"))?,
        }
        match self.gc() {
            GcAttr::None => {}
            GcAttr::Weak => word(f, "__weak")?,
            GcAttr::Strong => word(f, "__strong")?,
        }
        match self.lifetime() {
            Lifetime::None => {}
            Lifetime::ExplicitNone => word(f, "__unsafe_unretained")?,
            Lifetime::Strong => word(f, "__strong")?,
            Lifetime::Weak => word(f, "__weak")?,
            Lifetime::Autoreleasing => word(f, "__autoreleasing")?,
        }
        Ok(())
    }
}
