//! Structural predicates.
//!
//! Every predicate looks at the canonical form of a type, so sugar never
//! changes an answer. Declaration-level facts (is this class trivially
//! copyable, is this enum complete) come from the [`DeclStore`] behind the
//! context.
//!
//! Incomplete and dependent types get a fixed answer, usually `false`,
//! rather than a panic: callers may ask before a definition is seen. The
//! exceptions are [`Ty::is_literal_type`], which treats an undeduced `auto`
//! as literal, and the array rules, which look through arrays of unknown
//! bound to their element.
//!
//! - [`classify`]: integral, floating, scalar and friends
//! - [`traits`]: POD, trivial, trivially copyable, standard layout, literal,
//!   destruction
//! - [`unique`]: unique object representations
//! - [`checked`]: bounds-checked pointer and array queries
//! - [`nullability`]: nullability attributes
//! - [`lifetime`]: reference-counting ownership
//! - [`function`]: exception specifications and deduced types
//!
//! [`DeclStore`]: crate::decl::DeclStore
//! [`Ty::is_literal_type`]: crate::Ty::is_literal_type

pub mod checked;
pub mod classify;
pub mod function;
pub mod lifetime;
pub mod nullability;
pub mod traits;
pub mod unique;

pub use classify::ScalarTypeKind;
pub use function::{CanThrow, NoexceptResult};
pub use traits::DestructionKind;
