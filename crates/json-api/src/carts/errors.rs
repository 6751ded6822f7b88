//! Errors

use salvo::http::StatusError;
use tracing::error;

use freshmart_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Item is not in the cart"),
        CartsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Product does not exist or is no longer on sale")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be greater than zero")
        }
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("failed to process cart: {source}");

            StatusError::internal_server_error()
        }
    }
}
