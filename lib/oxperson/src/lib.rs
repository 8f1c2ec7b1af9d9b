#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod entity;
mod error;
mod fields;
mod jsonld;
mod person;
mod registry;
pub mod report;
pub mod store;
mod transform;
mod transformed;
mod turtle;
pub mod vocab;

pub use crate::entity::Entity;
pub use crate::error::{
    ConfigError, LookupError, ParseError, RegistryError, StoreError, ValidationError,
};
pub use crate::person::{Person, PersonFields};
pub use crate::registry::{
    ClassDefinition, ClassInfo, Constructor, InstanceReport, Registry, Statistics, Transformer,
    Validator,
};
pub use crate::report::{ConstraintComponent, ValidationReport, ValidationResult};
pub use crate::transform::{TransformOptions, transform};
pub use crate::transformed::{TransformedPerson, TransformedPersonFields};
pub use crate::turtle::{ToTurtle, split_blocks};
