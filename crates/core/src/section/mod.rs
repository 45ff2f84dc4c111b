//! Conditional "additional information" sections.
//!
//! # Modules
//!
//! - `kind` - Section kinds and the (type, sub-type) resolver
//! - `additional` - Section contents as a tagged union
//! - `reference` - Purchase type reference data and id resolution

pub mod additional;
pub mod kind;
pub mod reference;

#[cfg(test)]
mod resolver_props;

pub use additional::{AdditionalInfo, AdditionalInfoRecord, BillingFields, SiteFields};
pub use kind::{SectionKind, resolve};
pub use reference::{
    PurchaseSubType, PurchaseType, ReferenceLabel, ResolvedTypes, label_for,
    resolve_reference_id,
};
