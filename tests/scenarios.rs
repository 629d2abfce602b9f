//! End-to-end scenarios: declarations as a front end would build them, and
//! the questions semantic analysis asks about them.

use indoc::indoc;
use pretty_assertions::assert_eq;
use quail::{
    CxxRecordFlags, DestructionKind, FieldDecl, LangOptions, Linkage, QualType, RecordDecl, RecordFlags, TagKind,
    TargetInfo, TyCtxt, Visibility, ty, with_context,
};

fn render<'tcx>(tcx: TyCtxt<'tcx>, types: &[QualType<'tcx>]) -> String {
    types.iter().map(|qt| format!("{}\n", qt.display(tcx))).collect()
}

#[test]
fn test_c_header_declarations() {
    with_context(LangOptions::c11(), TargetInfo::x86_64(), |tcx, decls| {
        // struct node { int value; struct node *next; };
        let node_id = decls.declare_struct("node");
        let node = tcx.mk_record(node_id);
        decls.define_record(node_id, [FieldDecl::new("value", tcx.int()), FieldDecl::new("next", ty!(tcx, Ptr[node]))]);

        // typedef struct node node_t;
        let node_t = tcx.mk_typedef(decls.add_typedef("node_t", node));

        let compare = ty!(tcx, Ptr[(Ptr[Const[node_t]], Ptr[Const[node_t]]) => Int]);
        let signal = ty!(tcx, Ptr[(Int) => Ptr[(Int) => Void]]);
        let names = ty!(tcx, Array[Const[Ptr[Const[Char]]]; 4]);
        let buckets = ty!(tcx, Array[Ptr[node]; 8]);

        assert_eq!(
            render(tcx, &[ty!(tcx, Ptr[node_t]), compare, signal, names, buckets]),
            indoc! {"
                node_t *
                int (*)(const node_t *, const node_t *)
                void (*(*)(int))(int)
                const char *const [4]
                struct node *[8]
            "}
        );

        // Typedefs are sugar: the canonical types agree.
        assert_eq!(ty!(tcx, Ptr[node_t]).canonical(), ty!(tcx, Ptr[node]));
        assert!(node.ty.is_structure_type(tcx));
        assert!(node.ty.is_aggregate_type(tcx));
        assert!(ty!(tcx, Ptr[node_t]).ty.is_scalar_type(tcx));
        assert_eq!(tcx.type_size(node), 128);
        assert_eq!(tcx.record_layout(node_id).field_offsets, &[0, 64]);
    });
}

#[test]
fn test_cxx_class_traits() {
    with_context(LangOptions::cxx17(), TargetInfo::x86_64(), |tcx, decls| {
        // struct Point { int x, y; };
        let point = decls.declare_class(TagKind::Struct, "Point");
        decls.define_record(point, [FieldDecl::new("x", tcx.int()), FieldDecl::new("y", tcx.int())]);
        decls.update_record(point, |d| d.cxx = CxxRecordFlags::plain_old_data());
        let point = tcx.mk_record(point);

        // struct Sample { char tag; double value; };
        let sample = decls.declare_class(TagKind::Struct, "Sample");
        decls.define_record(sample, [FieldDecl::new("tag", tcx.char_ty()), FieldDecl::new("value", tcx.double())]);
        decls.update_record(sample, |d| d.cxx = CxxRecordFlags::plain_old_data());
        let sample_id = sample;
        let sample = tcx.mk_record(sample);

        // class Buffer { int *data; public: ~Buffer(); };
        let buffer = decls.declare_class(TagKind::Class, "Buffer");
        decls.define_record(buffer, [FieldDecl::new("data", ty!(tcx, Ptr[Int]))]);
        decls.update_record(buffer, |d| {
            d.cxx = CxxRecordFlags::HAS_DEFAULT_CTOR | CxxRecordFlags::HAS_NON_TRIVIAL_DTOR | CxxRecordFlags::STANDARD_LAYOUT
        });
        let buffer = tcx.mk_record(buffer);

        assert!(point.is_pod(tcx));
        assert!(point.is_trivially_copyable_type(tcx));
        assert!(point.has_unique_object_representations(tcx));
        assert_eq!(tcx.type_size(point), 64);

        assert!(sample.is_pod(tcx));
        assert!(!sample.has_unique_object_representations(tcx));
        assert_eq!(tcx.record_layout(sample_id).field_offsets, &[0, 64]);
        assert_eq!(tcx.type_size(sample), 128);

        assert!(!buffer.is_pod(tcx));
        assert!(!buffer.is_trivially_copyable_type(tcx));
        assert!(buffer.ty.is_standard_layout_type(tcx));
        assert_eq!(buffer.destruction_kind(tcx), DestructionKind::CxxDestructor);
        assert_eq!(ty!(tcx, Array[buffer; 3]).destruction_kind(tcx), DestructionKind::CxxDestructor);
        assert_eq!(ty!(tcx, Const[point]).destruction_kind(tcx), DestructionKind::None);
    });
}

#[test]
fn test_checked_c_signatures() {
    with_context(LangOptions::c11().with_checked_c(), TargetInfo::x86_64(), |tcx, _| {
        let sum = ty!(tcx, (ArrayPtr[Const[Int]], Int) => Long);
        let legacy = ty!(tcx, (Ptr[Int], Int) => Long);
        let callback = ty!(tcx, CheckedPtr[(Int) => Void]);

        assert_eq!(
            render(tcx, &[sum, legacy, callback]),
            indoc! {"
                long (_Array_ptr<const int>, int)
                long (int *, int)
                _Ptr<void (int)>
            "}
        );

        assert!(sum.ty.is_or_contains_checked_type());
        assert!(!sum.ty.is_or_contains_unchecked_type());
        assert!(!legacy.ty.is_or_contains_checked_type());
        assert!(callback.ty.is_checked_pointer_type());
        assert!(!sum.ty.has_variadic_type());
    });
}

#[test]
fn test_linkage_of_compound_types() {
    with_context(LangOptions::cxx17(), TargetInfo::x86_64(), |tcx, decls| {
        // namespace { struct Impl; }
        let hidden = decls.add_record(
            RecordDecl::new(TagKind::Struct, Some("Impl"))
                .with_flags(RecordFlags::CXX)
                .with_linkage(Linkage::Internal, Visibility::Default),
        );
        // void f() { struct Local {}; }
        let local = decls.add_record(
            RecordDecl::new(TagKind::Struct, Some("Local"))
                .with_flags(RecordFlags::CXX | RecordFlags::IN_FUNCTION)
                .with_linkage(Linkage::NoLinkage, Visibility::Default),
        );
        let hidden = tcx.mk_record(hidden);
        let local = tcx.mk_record(local);

        let handle = ty!(tcx, Ptr[hidden]);
        assert_eq!(handle.ty.linkage(tcx), Linkage::Internal);
        assert!(!handle.ty.has_unnamed_or_local_type(tcx));

        let visitor = ty!(tcx, (Ref[local], Int) => Void);
        assert_eq!(visitor.ty.linkage(tcx), Linkage::NoLinkage);
        assert!(visitor.ty.has_unnamed_or_local_type(tcx));
        assert!(visitor.ty.is_linkage_valid(tcx));

        assert_eq!(ty!(tcx, Ptr[(Int) => Double]).ty.linkage(tcx), Linkage::External);
    });
}
