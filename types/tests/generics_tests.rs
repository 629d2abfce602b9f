//! Member types of generic Objective-C classes, seen through receivers.

use bumpalo::Bump;
use expect_test::expect;
use pretty_assertions::assert_eq;
use quail_types::{
    DeclTable, InterfaceDecl, InterfaceId, LangOptions, ObjCSubstitutionContext as Ctx, QualType, SubstError,
    TargetInfo, TyCtxt, ty,
};

fn with_objc<R>(f: impl for<'tcx> FnOnce(TyCtxt<'tcx>, &'tcx DeclTable<'tcx>) -> R) -> R {
    let arena = Bump::new();
    let decls = DeclTable::new(&arena);
    let tcx = TyCtxt::new(&arena, &decls, LangOptions::c11().with_objc(), TargetInfo::x86_64());
    f(tcx, &decls)
}

struct Foundation<'tcx> {
    string: InterfaceId,
    array: InterfaceId,
    mutable_array: InterfaceId,
    /// `ObjectType`, the parameter of `NSArray`.
    element: QualType<'tcx>,
}

/// `NSObject`, `NSString : NSObject`, `NSArray<ObjectType : NSObject *>`
/// and `NSMutableArray<E : NSObject *> : NSArray<E>`.
fn foundation<'tcx>(tcx: TyCtxt<'tcx>, decls: &'tcx DeclTable<'tcx>) -> Foundation<'tcx> {
    let object = tcx.mk_objc_interface(decls.add_interface(InterfaceDecl::new("NSObject")));
    let object_ptr = tcx.mk_objc_object_pointer(object);
    let string = decls.add_interface(InterfaceDecl { superclass: Some(object), ..InterfaceDecl::new("NSString") });

    let array = decls.add_interface(InterfaceDecl { superclass: Some(object), ..InterfaceDecl::new("NSArray") });
    let element = tcx.mk_objc_type_param(decls.set_type_params(array, [("ObjectType", object_ptr)])[0], &[]);

    let mutable_array = decls.add_interface(InterfaceDecl::new("NSMutableArray"));
    let e = tcx.mk_objc_type_param(decls.set_type_params(mutable_array, [("E", object_ptr)])[0], &[]);
    let superclass = tcx.mk_objc_object(tcx.mk_objc_interface(array), &[e], &[], false);
    decls.update_interface(mutable_array, |d| d.superclass = Some(superclass));

    Foundation { string, array, mutable_array, element }
}

fn specialized<'tcx>(tcx: TyCtxt<'tcx>, class: InterfaceId, args: &[QualType<'tcx>]) -> QualType<'tcx> {
    tcx.mk_objc_object_pointer(tcx.mk_objc_object(tcx.mk_objc_interface(class), args, &[], false))
}

#[test]
fn test_method_through_specialized_subclass() {
    with_objc(|tcx, decls| {
        let c = foundation(tcx, decls);
        let string_ptr = tcx.mk_objc_interface_pointer(c.string);
        let element = c.element;
        let object_at_index = ty!(tcx, (UInt) => element);
        expect!["ObjectType (unsigned int)"].assert_eq(&object_at_index.display(tcx).to_string());

        let receiver = specialized(tcx, c.mutable_array, &[string_ptr]);
        expect!["NSMutableArray<NSString *> *"].assert_eq(&receiver.display(tcx).to_string());

        let member = object_at_index.subst_member_type(tcx, receiver, c.array, Ctx::Ordinary);
        expect!["NSString *(unsigned int)"].assert_eq(&member.display(tcx).to_string());
    });
}

#[test]
fn test_method_through_unspecialized_receivers() {
    with_objc(|tcx, decls| {
        let c = foundation(tcx, decls);
        let element = c.element;
        let first_object = ty!(tcx, () => element);

        for receiver in [tcx.mk_objc_interface_pointer(c.array), tcx.objc_id()] {
            let member = first_object.subst_member_type(tcx, receiver, c.array, Ctx::Ordinary);
            expect!["__kindof NSObject *(void)"].assert_eq(&member.display(tcx).to_string());
            expect!["NSObject *(void)"].assert_eq(&member.strip_kind_of_type(tcx).display(tcx).to_string());
        }
    });
}

#[test]
fn test_parameters_and_properties_use_bounds() {
    with_objc(|tcx, decls| {
        let c = foundation(tcx, decls);
        let receiver = tcx.mk_objc_interface_pointer(c.array);

        let element = c.element;
        let add = ty!(tcx, (element) => Void);
        let param = add.subst_member_type(tcx, receiver, c.array, Ctx::Ordinary);
        expect!["void (NSObject *)"].assert_eq(&param.display(tcx).to_string());

        let property = c.element.subst_member_type(tcx, receiver, c.array, Ctx::Property);
        expect!["__kindof NSObject *"].assert_eq(&property.display(tcx).to_string());
    });
}

#[test]
fn test_block_parameters_are_substituted() {
    with_objc(|tcx, decls| {
        let c = foundation(tcx, decls);
        let string_ptr = tcx.mk_objc_interface_pointer(c.string);
        let element = c.element;
        let enumerate = ty!(tcx, (BlockPtr[(element, ULong) => Void]) => Void);

        let receiver = specialized(tcx, c.array, &[string_ptr]);
        let member = enumerate.subst_member_type(tcx, receiver, c.array, Ctx::Ordinary);
        expect!["void (void (^)(NSString *, unsigned long))"].assert_eq(&member.display(tcx).to_string());
    });
}

#[test]
fn test_members_of_unrelated_classes_are_untouched() {
    with_objc(|tcx, decls| {
        let c = foundation(tcx, decls);
        let string_ptr = tcx.mk_objc_interface_pointer(c.string);
        let receiver = specialized(tcx, c.array, &[string_ptr]);
        let length = ty!(tcx, () => ULong);
        assert_eq!(length.subst_member_type(tcx, receiver, c.string, Ctx::Ordinary), length);
        assert_eq!(length.subst_member_type(tcx, receiver, c.array, Ctx::Ordinary), length);
    });
}

#[test]
fn test_checked_substitution_with_missing_argument() {
    with_objc(|tcx, decls| {
        let c = foundation(tcx, decls);
        let pair = decls.add_interface(InterfaceDecl::new("Pair"));
        let params = decls.set_type_params(pair, [("K", tcx.objc_id()), ("V", tcx.objc_id())]);
        let value = tcx.mk_objc_type_param(params[1], &[]);
        let string_ptr = tcx.mk_objc_interface_pointer(c.string);

        assert_eq!(
            ty!(tcx, Ptr[value]).try_subst_type_args(tcx, &[string_ptr], Ctx::Ordinary),
            Err(SubstError::TypeArgCountMismatch { index: 1, available: 1 })
        );
        assert_eq!(
            value.try_subst_type_args(tcx, &[string_ptr, string_ptr], Ctx::Ordinary),
            Ok(string_ptr)
        );
    });
}
