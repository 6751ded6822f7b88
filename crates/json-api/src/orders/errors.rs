//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use freshmart_app::domain::orders::OrdersServiceError;

use crate::observability::record_status_rejection;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => {
            StatusError::bad_request().brief("Cart is empty and no items were given")
        }
        OrdersServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be greater than zero")
        }
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Order refers to an unknown product")
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::WorkingHoursViolation(status) => {
            record_status_rejection(status.to_str());

            StatusError::conflict()
                .brief(format!("Orders can only be marked {status} during working hours"))
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Sql(source) => {
            error!("failed to process order: {source}");

            StatusError::internal_server_error()
        }
    }
}
