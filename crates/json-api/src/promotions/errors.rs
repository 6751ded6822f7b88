//! Promotion Errors

use salvo::http::StatusError;
use tracing::error;

use freshmart_app::domain::promotions::PromotionsServiceError;

pub(crate) fn into_status_error(error: PromotionsServiceError) -> StatusError {
    match error {
        PromotionsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo event already exists")
        }
        PromotionsServiceError::InvalidReference
        | PromotionsServiceError::MissingRequiredData
        | PromotionsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promotion payload")
        }
        PromotionsServiceError::InvalidEmail => {
            StatusError::bad_request().brief("Invalid email address")
        }
        PromotionsServiceError::Rejected(reason) => {
            StatusError::unprocessable_entity().brief(reason.to_string())
        }
        PromotionsServiceError::Sql(source) => {
            error!("failed to process promotion: {source}");

            StatusError::internal_server_error()
        }
        PromotionsServiceError::NotFound => StatusError::not_found().brief("Not found"),
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use freshmart_app::domain::promotions::CodeRejection;

    use super::*;

    #[test]
    fn rejected_code_is_unprocessable_with_reason() {
        let error = into_status_error(PromotionsServiceError::Rejected(
            CodeRejection::BelowMinimum { minimum: 2_000 },
        ));

        assert_eq!(error.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.brief, "order amount is below the minimum of 2000");
    }
}
