//! Type construction macros for ergonomic type building.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use quail_types::{ty, DeclTable, LangOptions, TargetInfo, TyCtxt};
//!
//! let arena = Bump::new();
//! let decls = DeclTable::new(&arena);
//! let tcx = TyCtxt::new(&arena, &decls, LangOptions::c11(), TargetInfo::x86_64());
//!
//! // Builtins and qualifiers
//! let int_ty = ty!(tcx, Int);
//! let cstr = ty!(tcx, Ptr[Const[Char]]);
//!
//! // Arrays
//! let buf = ty!(tcx, Array[Char; 16]);
//! let flexible = ty!(tcx, Array[Int]);
//!
//! // Functions
//! let printf = ty!(tcx, (Ptr[Const[Char]], ...) => Int);
//! let callback = ty!(tcx, Ptr[(Ptr[Void]) => Void]);
//! # let _ = (int_ty, cstr, buf, flexible, printf, callback);
//! ```

/// Macro for constructing types with a concise syntax.
///
/// # Syntax
///
/// | Pattern | Meaning |
/// |---------|---------|
/// | `Void`, `Bool`, `Char`, `Int`, `ULong`, `Double`, ... | Builtin types |
/// | `Id`, `Class` | Objective-C `id` and `Class` |
/// | `Const[T]`, `Volatile[T]`, `Restrict[T]` | Qualified types |
/// | `Ptr[T]`, `BlockPtr[T]`, `Ref[T]`, `RRef[T]` | Pointers and references |
/// | `CheckedPtr[T]`, `ArrayPtr[T]`, `NtArrayPtr[T]` | Bounds-checked pointers |
/// | `Array[T; N]`, `Array[T]` | Constant-size and incomplete arrays |
/// | `CheckedArray[T; N]`, `NtCheckedArray[T; N]` | Bounds-checked arrays |
/// | `Vector[T; N]`, `ExtVector[T; N]` | Vector types |
/// | `Complex[T]`, `Atomic[T]`, `Paren[T]` | Wrappers |
/// | `(T1, T2) => R`, `(T1, ...) => R` | Prototyped functions |
/// | `name` | A `QualType` bound in scope |
/// | `{ expr }` | Any expression producing a `QualType` |
#[macro_export]
macro_rules! ty {
    // === Entry point ===

    ($b:expr, $($rest:tt)+) => {{
        let __b = &$b;
        $crate::ty!(@ty __b ; $($rest)+)
    }};

    // === Builtins ===

    (@ty $b:expr ; Void) => { $b.void() };
    (@ty $b:expr ; Bool) => { $b.bool_ty() };
    (@ty $b:expr ; Char) => { $b.char_ty() };
    (@ty $b:expr ; SChar) => { $b.schar() };
    (@ty $b:expr ; UChar) => { $b.uchar() };
    (@ty $b:expr ; WChar) => { $b.wchar() };
    (@ty $b:expr ; Short) => { $b.short() };
    (@ty $b:expr ; UShort) => { $b.ushort() };
    (@ty $b:expr ; Int) => { $b.int() };
    (@ty $b:expr ; UInt) => { $b.uint() };
    (@ty $b:expr ; Long) => { $b.long() };
    (@ty $b:expr ; ULong) => { $b.ulong() };
    (@ty $b:expr ; LongLong) => { $b.long_long() };
    (@ty $b:expr ; ULongLong) => { $b.ulong_long() };
    (@ty $b:expr ; Int128) => { $b.int128() };
    (@ty $b:expr ; Half) => { $b.half() };
    (@ty $b:expr ; Float) => { $b.float() };
    (@ty $b:expr ; Double) => { $b.double() };
    (@ty $b:expr ; LongDouble) => { $b.long_double() };
    (@ty $b:expr ; NullPtr) => { $b.nullptr_ty() };
    (@ty $b:expr ; Id) => { $b.objc_id() };
    (@ty $b:expr ; Class) => { $b.objc_class() };
    (@ty $b:expr ; Sel) => { $b.objc_sel() };

    // === Qualifiers ===

    (@ty $b:expr ; Const[$($inner:tt)+]) => {
        $crate::ty!(@ty $b ; $($inner)+).with_const()
    };
    (@ty $b:expr ; Volatile[$($inner:tt)+]) => {
        $crate::ty!(@ty $b ; $($inner)+).with_volatile()
    };
    (@ty $b:expr ; Restrict[$($inner:tt)+]) => {
        $crate::ty!(@ty $b ; $($inner)+).with_cvr($crate::Cvr::RESTRICT)
    };

    // === Pointers and references ===

    (@ty $b:expr ; Ptr[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_pointer(pointee)
    }};
    (@ty $b:expr ; BlockPtr[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_block_pointer(pointee)
    }};
    (@ty $b:expr ; Ref[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_lvalue_reference(pointee)
    }};
    (@ty $b:expr ; RRef[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_rvalue_reference(pointee)
    }};
    (@ty $b:expr ; CheckedPtr[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_checked_pointer(pointee, $crate::CheckedPointerKind::Ptr)
    }};
    (@ty $b:expr ; ArrayPtr[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_checked_pointer(pointee, $crate::CheckedPointerKind::ArrayPtr)
    }};
    (@ty $b:expr ; NtArrayPtr[$($inner:tt)+]) => {{
        let pointee = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_checked_pointer(pointee, $crate::CheckedPointerKind::NtArrayPtr)
    }};

    // === Wrappers ===

    (@ty $b:expr ; Complex[$($inner:tt)+]) => {{
        let element = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_complex(element)
    }};
    (@ty $b:expr ; Atomic[$($inner:tt)+]) => {{
        let value = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_atomic(value)
    }};
    (@ty $b:expr ; Paren[$($inner:tt)+]) => {{
        let inner = $crate::ty!(@ty $b ; $($inner)+);
        $b.mk_paren(inner)
    }};

    // === Arrays and vectors ===
    // The element may itself contain brackets, so split on the first
    // top-level `;` by accumulating tokens.
    // @array builder ; flavor ; [element_acc] remaining

    (@ty $b:expr ; Array[$($args:tt)+]) => {
        $crate::ty!(@array $b ; Unchecked ; [] $($args)+)
    };
    (@ty $b:expr ; CheckedArray[$($args:tt)+]) => {
        $crate::ty!(@array $b ; Checked ; [] $($args)+)
    };
    (@ty $b:expr ; NtCheckedArray[$($args:tt)+]) => {
        $crate::ty!(@array $b ; NtChecked ; [] $($args)+)
    };
    (@ty $b:expr ; Vector[$($args:tt)+]) => {
        $crate::ty!(@array $b ; Vector ; [] $($args)+)
    };
    (@ty $b:expr ; ExtVector[$($args:tt)+]) => {
        $crate::ty!(@array $b ; ExtVector ; [] $($args)+)
    };

    // Found the size
    (@array $b:expr ; Vector ; [$($elem:tt)+] ; $n:expr) => {{
        let element = $crate::ty!(@ty $b ; $($elem)+);
        $b.mk_vector(element, $n, $crate::VectorKind::Generic)
    }};
    (@array $b:expr ; ExtVector ; [$($elem:tt)+] ; $n:expr) => {{
        let element = $crate::ty!(@ty $b ; $($elem)+);
        $b.mk_ext_vector(element, $n)
    }};
    (@array $b:expr ; $flavor:ident ; [$($elem:tt)+] ; $n:expr) => {{
        let element = $crate::ty!(@ty $b ; $($elem)+);
        $b.mk_checked_array(element, $n, $crate::CheckedArrayKind::$flavor)
    }};

    // No size: incomplete array
    (@array $b:expr ; $flavor:ident ; [$($elem:tt)+]) => {{
        let element = $crate::ty!(@ty $b ; $($elem)+);
        $b.mk_checked_incomplete_array(element, $crate::CheckedArrayKind::$flavor)
    }};

    // Bracketed group - include whole thing in element accumulator
    (@array $b:expr ; $flavor:ident ; [$($elem:tt)*] [$($inner:tt)*] $($rest:tt)*) => {
        $crate::ty!(@array $b ; $flavor ; [$($elem)* [$($inner)*]] $($rest)*)
    };

    // Any other token - accumulate
    (@array $b:expr ; $flavor:ident ; [$($elem:tt)*] $tok:tt $($rest:tt)*) => {
        $crate::ty!(@array $b ; $flavor ; [$($elem)* $tok] $($rest)*)
    };

    // === Function (params) => ret ===

    (@ty $b:expr ; ($($params:tt)*) => $($ret:tt)+) => {{
        let (params, variadic) = $crate::ty!(@params $b ; [] [] $($params)*);
        let result = $crate::ty!(@ty $b ; $($ret)+);
        let proto = $crate::FnProto::new(result, $b.mk_ty_list(params));
        $b.mk_fn(if variadic { proto.variadic() } else { proto })
    }};

    // === Param list parsing ===
    // @params builder ; [collected_types] [current_type_acc] remaining

    // Empty params
    (@params $b:expr ; [] []) => {
        ([] as [$crate::QualType<'_>; 0], false)
    };

    // Trailing ellipsis
    (@params $b:expr ; [$($collected:tt)*] [] ...) => {
        ([$($collected)*], true)
    };

    // End of params - emit last accumulated type
    (@params $b:expr ; [$($collected:tt)*] [$($curr:tt)+]) => {{
        let last = $crate::ty!(@ty $b ; $($curr)+);
        ([$($collected)* last], false)
    }};

    // Comma - emit current type, continue
    (@params $b:expr ; [$($collected:tt)*] [$($curr:tt)+] , $($rest:tt)*) => {{
        let item = $crate::ty!(@ty $b ; $($curr)+);
        $crate::ty!(@params $b ; [$($collected)* item,] [] $($rest)*)
    }};

    // Bracketed group - include whole thing in current type
    (@params $b:expr ; [$($collected:tt)*] [$($curr:tt)*] [$($inner:tt)*] $($rest:tt)*) => {
        $crate::ty!(@params $b ; [$($collected)*] [$($curr)* [$($inner)*]] $($rest)*)
    };

    // Any other token - accumulate
    (@params $b:expr ; [$($collected:tt)*] [$($curr:tt)*] $tok:tt $($rest:tt)*) => {
        $crate::ty!(@params $b ; [$($collected)*] [$($curr)* $tok] $($rest)*)
    };

    // === Escapes ===

    (@ty $b:expr ; { $e:expr }) => { $e };
    (@ty $b:expr ; $var:ident) => { $var };
}

#[cfg(test)]
mod tests {
    use crate::core::{BuiltinKind, CheckedArrayKind, CheckedPointerKind, TyKind};
    use crate::test_utils::with_tcx;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin() {
        with_tcx(|tcx, _| {
            assert_eq!(ty!(tcx, Int), tcx.int());
            assert_eq!(ty!(tcx, ULongLong).kind(), &TyKind::Builtin(BuiltinKind::ULongLong));
        });
    }

    #[test]
    fn test_qualifiers_stack() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, Const[Volatile[Int]]);
            assert_eq!(t, tcx.int().with_const().with_volatile());
        });
    }

    #[test]
    fn test_pointer_to_const() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, Ptr[Const[Char]]);
            assert_eq!(t, tcx.mk_pointer(tcx.char_ty().with_const()));
        });
    }

    #[test]
    fn test_array_sizes() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, Array[Ptr[Int]; 4]);
            assert_eq!(t, tcx.mk_constant_array(tcx.mk_pointer(tcx.int()), 4));

            let incomplete = ty!(tcx, Array[Array[Char; 2]]);
            assert_eq!(incomplete, tcx.mk_incomplete_array(tcx.mk_constant_array(tcx.char_ty(), 2)));
        });
    }

    #[test]
    fn test_checked_flavors() {
        with_tcx(|tcx, _| {
            let p = ty!(tcx, NtArrayPtr[Char]);
            assert_eq!(p.kind(), &TyKind::Pointer {
                pointee: tcx.char_ty(),
                checked: CheckedPointerKind::NtArrayPtr,
            });
            let a = ty!(tcx, CheckedArray[Int; 3]);
            assert_eq!(a.kind(), &TyKind::ConstantArray {
                element: tcx.int(),
                size: 3,
                checked: CheckedArrayKind::Checked,
            });
        });
    }

    #[test]
    fn test_function() {
        with_tcx(|tcx, _| {
            let f = ty!(tcx, (Int, Ptr[Char]) => Void);
            let TyKind::FunctionProto(proto) = f.kind() else {
                panic!("Expected FunctionProto, got {f:?}");
            };
            assert_eq!(proto.result, tcx.void());
            assert_eq!(proto.params, &[tcx.int(), tcx.mk_pointer(tcx.char_ty())]);
            assert!(!proto.variadic);
        });
    }

    #[test]
    fn test_function_no_params_and_variadic() {
        with_tcx(|tcx, _| {
            let f = ty!(tcx, () => Int);
            let TyKind::FunctionProto(proto) = f.kind() else {
                panic!("Expected FunctionProto, got {f:?}");
            };
            assert!(proto.params.is_empty());

            let g = ty!(tcx, (Ptr[Const[Char]], ...) => Int);
            let TyKind::FunctionProto(proto) = g.kind() else {
                panic!("Expected FunctionProto, got {g:?}");
            };
            assert_eq!(proto.params.len(), 1);
            assert!(proto.variadic);
        });
    }

    #[test]
    fn test_function_pointer_param() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, (Ptr[(Int) => Void], Array[Int; 2]) => Void);
            let TyKind::FunctionProto(proto) = t.kind() else {
                panic!("Expected FunctionProto, got {t:?}");
            };
            assert_eq!(proto.params[0], ty!(tcx, Ptr[(Int) => Void]));
        });
    }

    #[test]
    fn test_variables_and_escapes() {
        with_tcx(|tcx, decls| {
            let td = decls.add_typedef("size_t", tcx.ulong());
            let size_t = tcx.mk_typedef(td);
            let t = ty!(tcx, Ptr[size_t]);
            assert_eq!(t, tcx.mk_pointer(size_t));
            let u = ty!(tcx, Array[{ tcx.mk_typedef(td) }; 2]);
            assert_eq!(u, tcx.mk_constant_array(size_t, 2));
        });
    }
}
