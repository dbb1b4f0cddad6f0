use crate::config::toml_config::{ApiSettings, AssociationSettings};
use crate::core::{CompanyApi, OutcomeRecord};
use crate::utils::error::{Result, SyncError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const COMPANIES_PATH: [&str; 4] = ["crm", "v3", "objects", "companies"];
const ASSOCIATIONS_PATH: [&str; 3] = ["crm-associations", "v1", "associations"];

#[derive(Debug, Deserialize)]
struct CompanyResource {
    id: String,
}

/// Body of the v1 association call. `from_object_id` is the parent company.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssociationRequest<'a> {
    from_object_id: &'a str,
    to_object_id: &'a str,
    category: &'a str,
    definition_id: u32,
}

pub struct HubSpotClient {
    client: Client,
    base_url: Url,
    association: AssociationSettings,
}

impl HubSpotClient {
    pub fn new(api: &ApiSettings, association: AssociationSettings, access_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", access_token)).map_err(|e| {
            SyncError::ConfigError {
                message: format!("Access token is not a valid header value: {}", e),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = api.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let base_url = Url::parse(&api.base_url).map_err(|e| SyncError::ConfigError {
            message: format!("Invalid API base URL {}: {}", api.base_url, e),
        })?;

        Ok(Self {
            client: builder.build()?,
            base_url,
            association,
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint<I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::ConfigError {
                message: format!("API base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn company_url(&self, company_id: &str) -> Result<Url> {
        let mut segments: Vec<&str> = COMPANIES_PATH.to_vec();
        segments.push(company_id);
        self.endpoint(segments)
    }

    fn associations_url(&self) -> Result<Url> {
        self.endpoint(ASSOCIATIONS_PATH)
    }
}

#[async_trait::async_trait]
impl CompanyApi for HubSpotClient {
    async fn company_exists(&self, company_id: &str) -> bool {
        let url = match self.company_url(company_id) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Error fetching company with id {}: {}", company_id, e);
                return false;
            }
        };
        tracing::debug!("Looking up company: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error fetching company with id {}: {}", company_id, e);
                return false;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                "Error fetching company with id {}. Status code: {}",
                company_id,
                status.as_u16()
            );
            return false;
        }

        match response.json::<CompanyResource>().await {
            Ok(company) if company.id == company_id => true,
            Ok(company) => {
                tracing::error!(
                    "Error fetching company with id {}. Response was for id {}",
                    company_id,
                    company.id
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    "Error fetching company with id {}. Unreadable response: {}",
                    company_id,
                    e
                );
                false
            }
        }
    }

    async fn associate_parent(
        &self,
        company_id: &str,
        parent_company_id: &str,
    ) -> Result<OutcomeRecord> {
        let payload = AssociationRequest {
            from_object_id: parent_company_id,
            to_object_id: company_id,
            category: &self.association.category,
            definition_id: self.association.definition_id,
        };

        let response = self
            .client
            .put(self.associations_url()?)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let body = response.text().await.unwrap_or_default();
            let err = SyncError::AssociationUpdate {
                company_id: company_id.to_string(),
                parent_company_id: parent_company_id.to_string(),
                status: status.as_u16(),
                body,
            };
            tracing::error!("{}", err);
            return Err(err);
        }

        tracing::info!(
            "Associated Parent company {} with {}",
            parent_company_id,
            company_id
        );
        Ok(OutcomeRecord {
            company_id: company_id.to_string(),
            parent_company_id: parent_company_id.to_string(),
        })
    }
}
