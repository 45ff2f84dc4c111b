//! HTTP implementation of [`ProcurementApi`] over `reqwest`.

use procura_core::amortization::AmortizationPeriod;
use procura_core::request::{
    ApprovalAssignment, BasicInfo, Document, LineItem, PendingDocument, PurchaseOrder,
    PurchaseRequest, RequestFilter, RequestSummary,
};
use procura_core::section::{AdditionalInfoRecord, PurchaseSubType, PurchaseType};
use procura_shared::config::BackendConfig;
use procura_shared::types::{
    DocumentId, OrderNumber, PageRequest, PageResponse, RequestNumber,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiResult, ClientError, EmployeeName, ProcurementApi, StatusChange};

/// Procurement backend reached over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpProcurementApi {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedRequest {
    pr_number: RequestNumber,
}

#[derive(Serialize)]
struct IdList<'a, T> {
    ids: &'a [T],
}

#[derive(Serialize)]
struct ItemList<'a> {
    items: &'a [LineItem],
}

impl HttpProcurementApi {
    /// Creates a client for the configured backend.
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid base url: {e}")))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates a client from an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidRequest(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request_url(&self, number: &RequestNumber, tail: &[&str]) -> ApiResult<Url> {
        let mut segments = vec!["purchase-requests", number.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    fn order_url(&self, number: &OrderNumber, tail: &[&str]) -> ApiResult<Url> {
        let mut segments = vec!["purchase-orders", number.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }
}

/// Maps a non-success response to a [`ClientError`].
async fn check(response: Response, what: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        debug!(what, "backend returned not found");
        return Err(ClientError::NotFound(what.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body
    };
    warn!(what, status = %status, "backend call failed");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> ApiResult<T> {
    let response = check(response, what).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(format!("{what}: {e}")))
}

async fn expect_ok(response: Response, what: &str) -> ApiResult<()> {
    check(response, what).await.map(drop)
}

impl ProcurementApi for HttpProcurementApi {
    async fn create_request(&self, basic: &BasicInfo) -> ApiResult<RequestNumber> {
        let url = self.endpoint(&["purchase-requests"])?;
        let response = self.client.post(url).json(basic).send().await?;
        let created: CreatedRequest = decode(response, "purchase request").await?;
        debug!(pr_number = %created.pr_number, "purchase request created");
        Ok(created.pr_number)
    }

    async fn update_request(&self, number: &RequestNumber, basic: &BasicInfo) -> ApiResult<()> {
        let url = self.request_url(number, &[])?;
        let response = self.client.put(url).json(basic).send().await?;
        expect_ok(response, &format!("purchase request {number}")).await
    }

    async fn get_request(&self, number: &RequestNumber) -> ApiResult<PurchaseRequest> {
        let url = self.request_url(number, &[])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("purchase request {number}")).await
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: PageRequest,
    ) -> ApiResult<PageResponse<RequestSummary>> {
        let url = self.endpoint(&["purchase-requests"])?;
        let response = self
            .client
            .get(url)
            .query(&page.query_pairs())
            .query(&filter.query_pairs())
            .send()
            .await?;
        decode(response, "purchase request list").await
    }

    async fn get_additional_info(&self, number: &RequestNumber) -> ApiResult<AdditionalInfoRecord> {
        let url = self.request_url(number, &["additional-info"])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("additional information of {number}")).await
    }

    async fn save_additional_info(&self, number: &RequestNumber, payload: Value) -> ApiResult<()> {
        let url = self.request_url(number, &["additional-info"])?;
        let response = self.client.put(url).json(&payload).send().await?;
        expect_ok(response, &format!("additional information of {number}")).await
    }

    async fn get_items(&self, number: &RequestNumber) -> ApiResult<Vec<LineItem>> {
        let url = self.request_url(number, &["items"])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("items of {number}")).await
    }

    async fn replace_items(&self, number: &RequestNumber, items: &[LineItem]) -> ApiResult<()> {
        let url = self.request_url(number, &["items"])?;
        let response = self.client.put(url).json(&ItemList { items }).send().await?;
        expect_ok(response, &format!("items of {number}")).await
    }

    async fn get_approval(&self, number: &RequestNumber) -> ApiResult<ApprovalAssignment> {
        let url = self.request_url(number, &["approval"])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("approval of {number}")).await
    }

    async fn save_approval(
        &self,
        number: &RequestNumber,
        approval: &ApprovalAssignment,
    ) -> ApiResult<()> {
        let url = self.request_url(number, &["approval"])?;
        let response = self.client.put(url).json(approval).send().await?;
        expect_ok(response, &format!("approval of {number}")).await
    }

    async fn list_documents(&self, number: &RequestNumber) -> ApiResult<Vec<Document>> {
        let url = self.request_url(number, &["documents"])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("documents of {number}")).await
    }

    async fn upload_document(
        &self,
        number: &RequestNumber,
        document: &PendingDocument,
    ) -> ApiResult<Document> {
        let url = self.request_url(number, &["documents", "upload"])?;
        let part = Part::bytes(document.content.to_vec())
            .file_name(document.filename.clone())
            .mime_str(&document.content_type)
            .map_err(|e| ClientError::InvalidRequest(format!("{}: {e}", document.filename)))?;
        let form = Form::new().part("file", part);
        let response = self.client.post(url).multipart(form).send().await?;
        decode(response, &format!("document {}", document.filename)).await
    }

    async fn sync_documents(&self, number: &RequestNumber, ids: &[DocumentId]) -> ApiResult<()> {
        let url = self.request_url(number, &["documents"])?;
        let response = self.client.put(url).json(&IdList { ids }).send().await?;
        expect_ok(response, &format!("documents of {number}")).await
    }

    async fn record_status(&self, number: &RequestNumber, change: &StatusChange) -> ApiResult<()> {
        let url = self.request_url(number, &["status"])?;
        let response = self.client.post(url).json(change).send().await?;
        expect_ok(response, &format!("purchase request {number}")).await
    }

    async fn purchase_types(&self) -> ApiResult<Vec<PurchaseType>> {
        let url = self.endpoint(&["purchase-types"])?;
        let response = self.client.get(url).send().await?;
        decode(response, "purchase types").await
    }

    async fn purchase_sub_types(&self, type_id: i32) -> ApiResult<Vec<PurchaseSubType>> {
        let type_id = type_id.to_string();
        let url = self.endpoint(&["purchase-types", &type_id, "sub-types"])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("sub-types of type {type_id}")).await
    }

    async fn lookup_employees(&self, ids: &[String]) -> ApiResult<Vec<EmployeeName>> {
        let url = self.endpoint(&["employees", "lookup"])?;
        let response = self.client.post(url).json(&IdList { ids }).send().await?;
        decode(response, "employees").await
    }

    async fn get_order(&self, number: &OrderNumber) -> ApiResult<PurchaseOrder> {
        let url = self.order_url(number, &[])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("purchase order {number}")).await
    }

    async fn get_amortization(&self, number: &OrderNumber) -> ApiResult<Vec<AmortizationPeriod>> {
        let url = self.order_url(number, &["amortization"])?;
        let response = self.client.get(url).send().await?;
        decode(response, &format!("amortization of {number}")).await
    }

    async fn cancel_period(&self, number: &OrderNumber, period: u32) -> ApiResult<()> {
        let period = period.to_string();
        let url = self.order_url(number, &["amortization", &period, "cancel"])?;
        let response = self.client.post(url).send().await?;
        expect_ok(response, &format!("period {period} of {number}")).await
    }

    async fn release_period(&self, number: &OrderNumber, period: u32) -> ApiResult<()> {
        let period = period.to_string();
        let url = self.order_url(number, &["amortization", &period, "release"])?;
        let response = self.client.post(url).send().await?;
        expect_ok(response, &format!("period {period} of {number}")).await
    }
}
