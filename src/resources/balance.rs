//! Account balance.

use serde::{Deserialize, Serialize};

use crate::{client::Service, core::ApiRequest, errors::Result, http::RequestOptions};

/// Current account balance. Amounts are decimal strings in `currency`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Balance {
    #[serde(default)]
    pub record_type: Option<String>,
    pub balance: String,
    #[serde(default)]
    pub credit_limit: Option<String>,
    #[serde(default)]
    pub available_credit: Option<String>,
    #[serde(default)]
    pub pending: Option<String>,
    pub currency: String,
}

pub(crate) fn retrieve_request() -> ApiRequest {
    ApiRequest::get("/balance")
}

#[derive(Clone)]
pub struct BalanceClient {
    service: Service,
}

impl BalanceClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn retrieve(&self) -> Result<Balance> {
        self.service.data(retrieve_request()).await
    }
}
