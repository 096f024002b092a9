pub mod draft;
pub mod entity;
pub mod kind;

pub use draft::{NewDamageReport, NewMissingPerson, NewReport};
pub use entity::{DamageReport, MissingPerson, PersonStatus, Report};
pub use kind::{CollectionBinding, ReportKind, resolve_collection, resolve_collection_by_name};
