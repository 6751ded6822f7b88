//! Promo Criteria Requests

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use freshmart_app::domain::promotions::data::criteria::PromoCriteria;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum CriteriaBody {
    /// Orders containing every listed category qualify
    CategorySet { categories: Vec<String> },
}

impl From<CriteriaBody> for PromoCriteria {
    fn from(body: CriteriaBody) -> Self {
        match body {
            CriteriaBody::CategorySet { categories } => PromoCriteria::CategorySet { categories },
        }
    }
}

impl From<PromoCriteria> for CriteriaBody {
    fn from(criteria: PromoCriteria) -> Self {
        match criteria {
            PromoCriteria::CategorySet { categories } => CriteriaBody::CategorySet { categories },
        }
    }
}
