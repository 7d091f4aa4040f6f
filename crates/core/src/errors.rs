use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("product id must be a positive integer")]
    InvalidId,
    #[error("product {id} is missing required field `{field}`")]
    MissingField { id: ProductId, field: String },
    #[error("product id {0} appears more than once")]
    DuplicateId(ProductId),
    #[error("product {id} has invalid price {price}")]
    InvalidPrice { id: ProductId, price: f64 },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("catalog validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
    #[error("catalog is not loaded")]
    CatalogNotLoaded,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested resource was not found.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<DomainError> for InterfaceError {
    fn from(value: DomainError) -> Self {
        InterfaceError::from(ApplicationError::Domain(value))
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(DomainError::Validation(error)) => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            ApplicationError::Domain(DomainError::ProductNotFound(_)) => {
                Self::NotFound { message: "Product not found".to_owned(), correlation_id }
            }
            ApplicationError::Domain(DomainError::CatalogNotLoaded) => {
                Self::NotFound { message: "Nomenclature not loaded".to_owned(), correlation_id }
            }
            ApplicationError::Configuration(message) => Self::Internal { message, correlation_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, DomainError, InterfaceError, ValidationError};

    #[test]
    fn validation_error_maps_to_bad_request_with_detail() {
        let interface = ApplicationError::from(DomainError::from(ValidationError::DuplicateId(
            ProductId(42),
        )))
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("42")
        ));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn unknown_product_maps_to_not_found() {
        let interface = ApplicationError::from(DomainError::ProductNotFound(ProductId(9)))
            .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::NotFound { .. }));
        assert_eq!(interface.message(), "Product not found");
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn missing_catalog_maps_to_not_found() {
        let interface = InterfaceError::from(DomainError::CatalogNotLoaded);
        assert_eq!(interface.message(), "Nomenclature not loaded");
        assert_eq!(interface.correlation_id(), "unassigned");
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            ApplicationError::Configuration("invalid temperature".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
