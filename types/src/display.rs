//! C-like printing of types.
//!
//! Declarators print inside out: the printer carries the text built so far
//! for the declarator (`*`, `(*)[4]`, `(*)(int)`) and each layer wraps it
//! before handing it to the layer below. Sugar prints as written; only
//! `Paren` is transparent, since parentheses are re-derived from the
//! declarator structure.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::context::TyCtxt;
use crate::core::{
    AttrKind, AutoKeyword, CheckedArrayKind, CheckedPointerKind, ElaboratedKeyword, ExceptionSpec,
    ExprRef, FnProto, ProtocolId, QualType, Ty, TyKind,
};
use crate::decl::TagKind;
use crate::qualifiers::Qualifiers;

/// A type together with the context needed to print it.
pub struct TyDisplay<'tcx> {
    tcx: TyCtxt<'tcx>,
    qt: QualType<'tcx>,
}

impl fmt::Display for TyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Printer { tcx: self.tcx }.print(self.qt, String::new()))
    }
}

impl<'tcx> QualType<'tcx> {
    pub fn display(self, tcx: TyCtxt<'tcx>) -> TyDisplay<'tcx> {
        TyDisplay { tcx, qt: self }
    }
}

impl<'tcx> Ty<'tcx> {
    pub fn display(self, tcx: TyCtxt<'tcx>) -> TyDisplay<'tcx> {
        QualType::unqualified(self).display(tcx)
    }
}

fn expr(e: ExprRef) -> String {
    format!("<expr #{}>", e.id)
}

fn merge(qt: QualType<'_>, quals: Qualifiers) -> QualType<'_> {
    QualType::new(qt.ty, qt.quals.union(quals))
}

/// `quals name inner`, skipping empty parts.
fn leaf(quals: Qualifiers, name: &str, inner: &str) -> String {
    let mut out = String::new();
    if !quals.is_empty() {
        let _ = write!(out, "{quals} ");
    }
    out.push_str(name);
    if !inner.is_empty() {
        out.push(' ');
        out.push_str(inner);
    }
    out
}

/// Whether a declarator applied to `pointee` must be parenthesized, as in
/// `int (*)[4]` or `void (*)(int)`.
fn needs_parens(pointee: QualType<'_>) -> bool {
    let inner = pointee.ignore_parens();
    inner.kind().is_array() || inner.kind().is_function()
}

struct Printer<'tcx> {
    tcx: TyCtxt<'tcx>,
}

impl<'tcx> Printer<'tcx> {
    fn print(&self, qt: QualType<'tcx>, inner: String) -> String {
        let quals = qt.quals;
        let decls = self.tcx.decls();
        match *qt.kind() {
            // === Declarators ===
            TyKind::Pointer { pointee, checked: CheckedPointerKind::Unchecked } => {
                self.declarator(pointee, "*", quals, inner)
            }
            TyKind::BlockPointer(pointee) => self.declarator(pointee, "^", quals, inner),
            TyKind::LValueReference(pointee) => self.declarator(pointee, "&", quals, inner),
            TyKind::RValueReference(pointee) => self.declarator(pointee, "&&", quals, inner),
            TyKind::MemberPointer { pointee, class } => {
                let sigil = format!("{}::*", self.print(QualType::unqualified(class), String::new()));
                self.declarator(pointee, &sigil, quals, inner)
            }
            TyKind::ObjCObjectPointer(pointee) => {
                // `id` and `Class` are spelled without the star.
                if matches!(*pointee.kind(), TyKind::ObjCObject { base, .. } if matches!(base.kind(), TyKind::Builtin(_)))
                {
                    self.print(merge(pointee, quals), inner)
                } else {
                    self.declarator(pointee, "*", quals, inner)
                }
            }
            TyKind::ConstantArray { element, size, checked } => {
                self.array(element, quals, inner, checked, format!("[{size}]"))
            }
            TyKind::IncompleteArray { element, checked } => {
                self.array(element, quals, inner, checked, "[]".to_string())
            }
            TyKind::VariableArray { element, size } => {
                let bracket = size.map_or_else(|| "[*]".to_string(), |e| format!("[{}]", expr(e)));
                self.array(element, quals, inner, CheckedArrayKind::Unchecked, bracket)
            }
            TyKind::DependentSizedArray { element, size } => {
                let bracket = size.map_or_else(|| "[]".to_string(), |e| format!("[{}]", expr(e)));
                self.array(element, quals, inner, CheckedArrayKind::Unchecked, bracket)
            }
            TyKind::FunctionNoProto { result } => self.print(result, format!("{inner}()")),
            TyKind::FunctionProto(ref proto) => self.function(proto, inner),

            // === Transparent sugar ===
            TyKind::Paren(next)
            | TyKind::Adjusted { adjusted: next, .. }
            | TyKind::Decayed { decayed: next, .. }
            | TyKind::SubstTemplateTypeParm { replacement: next, .. }
            | TyKind::Auto { deduced: Some(next), .. }
            | TyKind::DeducedTemplateSpecialization { deduced: Some(next), .. } => {
                self.print(merge(next, quals), inner)
            }

            // === Leaves ===
            TyKind::Builtin(kind) => leaf(quals, kind.name(), &inner),
            TyKind::Complex(element) => leaf(quals, &format!("_Complex {}", self.name(element)), &inner),
            TyKind::Pointer { pointee, checked } => {
                let keyword = match checked {
                    CheckedPointerKind::Ptr => "_Ptr",
                    CheckedPointerKind::ArrayPtr => "_Array_ptr",
                    CheckedPointerKind::NtArrayPtr => "_Nt_array_ptr",
                    CheckedPointerKind::Unchecked => "",
                };
                leaf(quals, &format!("{keyword}<{}>", self.name(pointee)), &inner)
            }
            TyKind::Vector { element, count, .. } => {
                let element = self.name(element);
                let name = format!("__attribute__((__vector_size__({count} * sizeof({element})))) {element}");
                leaf(quals, &name, &inner)
            }
            TyKind::ExtVector { element, count } => {
                let name = format!("{} __attribute__((ext_vector_type({count})))", self.name(element));
                leaf(quals, &name, &inner)
            }
            TyKind::DependentSizedExtVector { element, size } => {
                let name = format!("{} __attribute__((ext_vector_type({})))", self.name(element), expr(size));
                leaf(quals, &name, &inner)
            }
            TyKind::DependentAddressSpace { pointee, address_space } => {
                let name = format!("__attribute__((address_space({}))) {}", expr(address_space), self.name(pointee));
                leaf(quals, &name, &inner)
            }
            TyKind::Typedef { decl, .. } => leaf(quals, decls.typedef(decl).name, &inner),
            TyKind::TypeOfExpr { expr: e, .. } => leaf(quals, &format!("typeof ({})", expr(e)), &inner),
            TyKind::TypeOf(underlying) => leaf(quals, &format!("typeof ({})", self.name(underlying)), &inner),
            TyKind::Decltype { expr: e, .. } => leaf(quals, &format!("decltype({})", expr(e)), &inner),
            TyKind::UnaryTransform { base, .. } => {
                leaf(quals, &format!("__underlying_type({})", self.name(base)), &inner)
            }
            TyKind::Record(_) | TyKind::Enum(_) => {
                let name = self.tag_name(qt.ty, !self.tcx.lang().c_plus_plus);
                leaf(quals, &name, &inner)
            }
            TyKind::Elaborated { keyword, named } => {
                let word = match keyword {
                    ElaboratedKeyword::None => None,
                    ElaboratedKeyword::Struct => Some("struct"),
                    ElaboratedKeyword::Class => Some("class"),
                    ElaboratedKeyword::Union => Some("union"),
                    ElaboratedKeyword::Enum => Some("enum"),
                    ElaboratedKeyword::Interface => Some("__interface"),
                    ElaboratedKeyword::Typename => Some("typename"),
                };
                match word {
                    None => self.print(merge(named, quals), inner),
                    Some(word) => {
                        let name = match named.kind() {
                            TyKind::Record(_) | TyKind::Enum(_) => self.tag_name(named.ty, false),
                            _ => self.name(named),
                        };
                        leaf(quals.union(named.quals), &format!("{word} {name}"), &inner)
                    }
                }
            }
            TyKind::Attributed { attr, modified, .. } => {
                let name = match attr {
                    AttrKind::ObjCKindOf => format!("__kindof {}", self.name(modified)),
                    attr => format!("{} {}", self.name(modified), attr_spelling(attr)),
                };
                leaf(quals, &name, &inner)
            }
            TyKind::TemplateTypeParm { depth, index, .. } => {
                leaf(quals, &format!("type-parameter-{depth}-{index}"), &inner)
            }
            TyKind::SubstTemplateTypeParmPack { replaced, .. } => {
                leaf(quals, &self.name(QualType::unqualified(replaced)), &inner)
            }
            TyKind::TemplateSpecialization { template, args, .. } => {
                let name = format!("{}<{}>", decls.template(template).name, self.list(args));
                leaf(quals, &name, &inner)
            }
            TyKind::DependentName { qualifier, name } => {
                leaf(quals, &format!("typename {}::{name}", self.name(qualifier)), &inner)
            }
            TyKind::PackExpansion { pattern, .. } => leaf(quals, &format!("{}...", self.name(pattern)), &inner),
            TyKind::Auto { deduced: None, keyword, .. } => {
                let name = match keyword {
                    AutoKeyword::Auto => "auto",
                    AutoKeyword::DecltypeAuto => "decltype(auto)",
                    AutoKeyword::GnuAutoType => "__auto_type",
                };
                leaf(quals, name, &inner)
            }
            TyKind::DeducedTemplateSpecialization { template, deduced: None } => {
                leaf(quals, decls.template(template).name, &inner)
            }
            TyKind::ObjCTypeParam { decl, protocols } => {
                let name = format!("{}{}", decls.type_param(decl).name, self.protocols(protocols));
                leaf(quals, &name, &inner)
            }
            TyKind::ObjCInterface(id) => leaf(quals, decls.interface(id).name, &inner),
            TyKind::ObjCObject { base, type_args, protocols, kind_of } => {
                let mut name = String::new();
                if kind_of {
                    name.push_str("__kindof ");
                }
                name.push_str(&self.name(base));
                if !type_args.is_empty() {
                    let _ = write!(name, "<{}>", self.list(type_args));
                }
                name.push_str(&self.protocols(protocols));
                leaf(quals, &name, &inner)
            }
            TyKind::Atomic(value) => leaf(quals, &format!("_Atomic({})", self.name(value)), &inner),
            TyKind::Pipe { element, read_only } => {
                let access = if read_only { "read_only" } else { "write_only" };
                leaf(quals, &format!("{access} pipe {}", self.name(element)), &inner)
            }
            TyKind::TypeVariable { depth, index } => leaf(quals, &format!("type-variable-{depth}-{index}"), &inner),
        }
    }

    /// A complete spelling with no declarator.
    fn name(&self, qt: QualType<'tcx>) -> String {
        self.print(qt, String::new())
    }

    fn list(&self, types: &[QualType<'tcx>]) -> String {
        types.iter().map(|&qt| self.name(qt)).collect::<Vec<_>>().join(", ")
    }

    fn protocols(&self, protocols: &[ProtocolId]) -> String {
        if protocols.is_empty() {
            return String::new();
        }
        let decls = self.tcx.decls();
        let names: Vec<&str> = protocols.iter().map(|&p| decls.protocol(p).name).collect();
        format!("<{}>", names.join(", "))
    }

    /// A record or enum name, with its tag keyword when `keyword` is set.
    fn tag_name(&self, ty: Ty<'tcx>, keyword: bool) -> String {
        let decls = self.tcx.decls();
        let (tag, name) = match *ty.kind() {
            TyKind::Record(id) => {
                let decl = decls.record(id);
                let tag = match decl.tag {
                    TagKind::Struct => "struct",
                    TagKind::Class => "class",
                    TagKind::Union => "union",
                    TagKind::Interface => "__interface",
                };
                (tag, decl.name)
            }
            TyKind::Enum(id) => ("enum", decls.enum_decl(id).name),
            _ => return self.name(QualType::unqualified(ty)),
        };
        match (name, keyword) {
            (Some(name), true) => format!("{tag} {name}"),
            (Some(name), false) => name.to_string(),
            (None, _) => format!("(anonymous {tag})"),
        }
    }

    fn declarator(&self, pointee: QualType<'tcx>, sigil: &str, quals: Qualifiers, inner: String) -> String {
        let mut decl = String::from(sigil);
        if !quals.is_empty() {
            let _ = write!(decl, "{quals}");
            if !inner.is_empty() {
                decl.push(' ');
            }
        }
        decl.push_str(&inner);
        if needs_parens(pointee) {
            decl = format!("({decl})");
        }
        self.print(pointee, decl)
    }

    /// Array qualifiers belong to the element.
    fn array(
        &self,
        element: QualType<'tcx>,
        quals: Qualifiers,
        inner: String,
        checked: CheckedArrayKind,
        bracket: String,
    ) -> String {
        let keyword = match checked {
            CheckedArrayKind::Unchecked => "",
            CheckedArrayKind::Checked => "checked",
            CheckedArrayKind::NtChecked => "nt_checked",
        };
        let mut decl = inner;
        if !keyword.is_empty() && !decl.is_empty() {
            decl.push(' ');
        }
        decl.push_str(keyword);
        decl.push_str(&bracket);
        self.print(merge(element, quals), decl)
    }

    fn function(&self, proto: &FnProto<'tcx>, inner: String) -> String {
        let mut decl = inner;
        decl.push('(');
        decl.push_str(&self.list(proto.params));
        if proto.variadic {
            decl.push_str(if proto.params.is_empty() { "..." } else { ", ..." });
        } else if proto.params.is_empty() && !self.tcx.lang().c_plus_plus {
            decl.push_str("void");
        }
        decl.push(')');
        let method_quals = Qualifiers::from_cvr(proto.method_quals);
        if !method_quals.is_empty() {
            let _ = write!(decl, " {method_quals}");
        }
        match proto.exception {
            ExceptionSpec::None => {}
            ExceptionSpec::DynamicNone => decl.push_str(" throw()"),
            ExceptionSpec::Dynamic(list) => {
                let _ = write!(decl, " throw({})", self.list(list));
            }
            ExceptionSpec::BasicNoexcept => decl.push_str(" noexcept"),
            ExceptionSpec::ComputedNoexcept(e) => {
                let _ = write!(decl, " noexcept({})", expr(e));
            }
        }
        self.print(proto.result, decl)
    }
}

fn attr_spelling(attr: AttrKind) -> &'static str {
    match attr {
        AttrKind::TypeNonNull => "_Nonnull",
        AttrKind::TypeNullable => "_Nullable",
        AttrKind::TypeNullUnspecified => "_Null_unspecified",
        AttrKind::ObjCKindOf => "__kindof",
        AttrKind::ObjCOwnership => "__attribute__((objc_ownership))",
        AttrKind::ObjCGc => "__attribute__((objc_gc))",
        AttrKind::ObjCInertUnsafeUnretained => "__unsafe_unretained",
        AttrKind::AddressSpace => "__attribute__((address_space))",
        AttrKind::NoReturn => "__attribute__((noreturn))",
        AttrKind::CDecl => "__attribute__((cdecl))",
        AttrKind::StdCall => "__attribute__((stdcall))",
        AttrKind::FastCall => "__attribute__((fastcall))",
        AttrKind::VectorCall => "__attribute__((vectorcall))",
        AttrKind::Regparm => "__attribute__((regparm))",
        AttrKind::MsAbi => "__attribute__((ms_abi))",
        AttrKind::SysVAbi => "__attribute__((sysv_abi))",
        AttrKind::SwiftCall => "__attribute__((swiftcall))",
        AttrKind::PreserveMost => "__attribute__((preserve_most))",
        AttrKind::PreserveAll => "__attribute__((preserve_all))",
    }
}
