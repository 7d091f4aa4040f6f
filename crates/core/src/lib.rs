pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod substitution;
pub mod taxonomy;

pub use catalog::{assemble_products, CatalogUpload, NomenclatureRow, SalesRow};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError, ValidationError};
pub use substitution::{
    CatalogStatus, EngineSettings, Prediction, SearchHit, SubstitutionEngine, TrainingBatch,
};
pub use taxonomy::{TaxonomyIndex, TaxonomySnapshot, TaxonomyTree};
