//! Opaque handles to declarations and expressions owned elsewhere.
//!
//! Types refer to declarations by index into a [`DeclStore`](crate::decl::DeclStore)
//! and to expressions through an [`ExprRef`] evaluated by an
//! [`ExprStore`](crate::decl::ExprStore). Both are plain `Copy` values so
//! they can live inside interned nodes.

use core::fmt;

use super::flags::ExprDeps;

macro_rules! decl_id {
    ($($(#[$meta:meta])* $name:ident => $prefix:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(pub u32);

            impl $name {
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($prefix, "#{}"), self.0)
                }
            }
        )*
    };
}

decl_id! {
    /// A struct, class, union or interface definition.
    RecordId => "record";
    EnumId => "enum";
    TypedefId => "typedef";
    /// An Objective-C class interface.
    InterfaceId => "interface";
    /// A type parameter of a parameterized Objective-C class.
    TypeParamId => "type_param";
    ProtocolId => "protocol";
    TemplateId => "template";
}

/// An expression embedded in a type (array bounds, `typeof` operands,
/// `noexcept` conditions, address-space arguments).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ExprRef {
    pub id: u32,
    pub deps: ExprDeps,
}

impl ExprRef {
    pub fn new(id: u32) -> Self {
        Self { id, deps: ExprDeps::empty() }
    }

    pub fn with_deps(self, deps: ExprDeps) -> Self {
        Self { deps: self.deps | deps, ..self }
    }

    pub fn is_value_dependent(self) -> bool {
        self.deps.contains(ExprDeps::VALUE_DEPENDENT)
    }

    pub fn is_type_dependent(self) -> bool {
        self.deps.contains(ExprDeps::TYPE_DEPENDENT)
    }

    pub fn is_instantiation_dependent(self) -> bool {
        self.deps.intersects(
            ExprDeps::INSTANTIATION_DEPENDENT | ExprDeps::VALUE_DEPENDENT | ExprDeps::TYPE_DEPENDENT,
        )
    }

    pub fn contains_unexpanded_pack(self) -> bool {
        self.deps.contains(ExprDeps::UNEXPANDED_PACK)
    }
}
