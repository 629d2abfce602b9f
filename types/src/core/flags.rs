use bitflags::bitflags;

bitflags! {
    /// Dependence properties of a type node.
    ///
    /// These flags are computed once when a node is interned, from the node's
    /// own shape and the flags of its children, so queries never re-walk the
    /// graph.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct TyFlags: u8 {
        /// Depends on a template parameter.
        const DEPENDENT = 1;
        /// Mentions a template parameter somewhere, even in a non-dependent
        /// position. Always set when `DEPENDENT` is.
        const INSTANTIATION_DEPENDENT = 1 << 1;
        /// Contains an array whose size is only known at run time.
        const VARIABLY_MODIFIED = 1 << 2;
        /// Mentions a parameter pack that has not been expanded.
        const UNEXPANDED_PACK = 1 << 3;
    }
}

bitflags! {
    /// Dependence properties of an expression embedded in a type.
    ///
    /// Expressions are owned by the surrounding compiler; a type only keeps
    /// an opaque [`ExprRef`](crate::core::ExprRef) together with these bits.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct ExprDeps: u8 {
        const VALUE_DEPENDENT = 1;
        const TYPE_DEPENDENT = 1 << 1;
        const INSTANTIATION_DEPENDENT = 1 << 2;
        const UNEXPANDED_PACK = 1 << 3;
    }
}

impl TyFlags {
    pub(crate) fn dependent() -> Self {
        TyFlags::DEPENDENT | TyFlags::INSTANTIATION_DEPENDENT
    }
}

impl ExprDeps {
    /// The dependence of an expression that mentions a template parameter
    /// in a type-dependent position.
    pub fn dependent() -> Self {
        ExprDeps::VALUE_DEPENDENT | ExprDeps::TYPE_DEPENDENT | ExprDeps::INSTANTIATION_DEPENDENT
    }
}
