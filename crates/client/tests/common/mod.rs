//! In-memory procurement backend that records every call.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use chrono::NaiveDate;
use procura_client::api::{ApiResult, EmployeeName, StatusChange};
use procura_client::{
    ClientError, DecisionService, DraftSequencer, MemoryDraftStore, ProcurementApi,
    ReferenceCache, ReleaseService, ViewComposer,
};
use procura_core::amortization::AmortizationPeriod;
use procura_core::request::{
    ApprovalAssignment, BasicInfo, Document, LineItem, PendingDocument, PurchaseOrder,
    PurchaseRequest, RequestFilter, RequestStatus, RequestSummary,
};
use procura_core::section::{
    AdditionalInfo, AdditionalInfoRecord, BillingFields, PurchaseSubType, PurchaseType,
};
use procura_shared::config::CacheConfig;
use procura_shared::types::{
    DocumentId, EmployeeId, OrderNumber, PageRequest, PageResponse, RequestNumber,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

#[derive(Default)]
struct Backend {
    next_number: u32,
    next_document: i64,
    requests: HashMap<RequestNumber, PurchaseRequest>,
    additional: HashMap<RequestNumber, Value>,
    items: HashMap<RequestNumber, Vec<LineItem>>,
    approvals: HashMap<RequestNumber, ApprovalAssignment>,
    documents: HashMap<RequestNumber, Vec<Document>>,
    statuses: Vec<(RequestNumber, StatusChange)>,
    lookups: Vec<Vec<String>>,
    types: Vec<PurchaseType>,
    sub_types: HashMap<i32, Vec<PurchaseSubType>>,
    employees: Vec<EmployeeName>,
    orders: HashMap<OrderNumber, PurchaseOrder>,
    schedules: HashMap<OrderNumber, Vec<AmortizationPeriod>>,
    period_actions: Vec<(OrderNumber, u32, &'static str)>,
}

/// Recording fake of the procurement backend.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
    delay: Duration,
    backend: Mutex<Backend>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

impl RecordingApi {
    /// Backend with the standard reference data.
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut backend = lock(&api.backend);
            backend.types = vec![
                purchase_type(2, "Hardware", Some("Network")),
                purchase_type(5, "Software", Some("Subscription")),
                purchase_type(6, "Services", None),
                purchase_type(9, "Office", None),
            ];
            backend.sub_types = HashMap::from([
                (2, vec![sub_type(1, 2, "Router"), sub_type(3, 2, "Switch")]),
                (6, vec![sub_type(2, 6, "Maintenance"), sub_type(4, 6, "Consulting")]),
            ]);
            backend.employees = vec![
                EmployeeName {
                    id: EmployeeId::new("E1"),
                    name: "Ayu Lestari".to_string(),
                },
                EmployeeName {
                    id: EmployeeId::new("E2"),
                    name: "Budi Santoso".to_string(),
                },
                EmployeeName {
                    id: EmployeeId::new("E3"),
                    name: "Citra Dewi".to_string(),
                },
                EmployeeName {
                    id: EmployeeId::new("E4"),
                    name: "Dimas Pratama".to_string(),
                },
            ];
        }
        api
    }

    /// Every call sleeps this long after being recorded.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes a method fail with a 500.
    pub fn fail(&self, method: &'static str) {
        lock(&self.failing).insert(method);
    }

    /// Makes a method succeed again.
    pub fn recover(&self, method: &'static str) {
        lock(&self.failing).remove(method);
    }

    /// Methods called, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    /// Calls that change backend data, in order.
    pub fn writes(&self) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    *call,
                    "create_request"
                        | "update_request"
                        | "save_additional_info"
                        | "replace_items"
                        | "save_approval"
                        | "upload_document"
                        | "sync_documents"
                        | "record_status"
                        | "cancel_period"
                        | "release_period"
                )
            })
            .collect()
    }

    /// Number of calls to a method.
    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|call| **call == method).count()
    }

    /// Status changes recorded, in order.
    pub fn statuses(&self) -> Vec<(RequestNumber, StatusChange)> {
        lock(&self.backend).statuses.clone()
    }

    /// Id batches passed to the employee lookup.
    pub fn lookups(&self) -> Vec<Vec<String>> {
        lock(&self.backend).lookups.clone()
    }

    /// Additional-information payload stored for a request.
    pub fn additional_payload(&self, number: &RequestNumber) -> Option<Value> {
        lock(&self.backend).additional.get(number).cloned()
    }

    /// Period actions taken, in order.
    pub fn period_actions(&self) -> Vec<(OrderNumber, u32, &'static str)> {
        lock(&self.backend).period_actions.clone()
    }

    pub fn insert_request(&self, request: PurchaseRequest) {
        lock(&self.backend)
            .requests
            .insert(request.number.clone(), request);
    }

    pub fn insert_items(&self, number: &RequestNumber, items: Vec<LineItem>) {
        lock(&self.backend).items.insert(number.clone(), items);
    }

    pub fn insert_approval(&self, number: &RequestNumber, approval: ApprovalAssignment) {
        lock(&self.backend).approvals.insert(number.clone(), approval);
    }

    pub fn insert_documents(&self, number: &RequestNumber, documents: Vec<Document>) {
        lock(&self.backend)
            .documents
            .insert(number.clone(), documents);
    }

    pub fn insert_additional(&self, number: &RequestNumber, record: Value) {
        lock(&self.backend).additional.insert(number.clone(), record);
    }

    pub fn insert_order(&self, order: PurchaseOrder) {
        lock(&self.backend).orders.insert(order.number.clone(), order);
    }

    pub fn insert_schedule(&self, number: &OrderNumber, schedule: Vec<AmortizationPeriod>) {
        lock(&self.backend).schedules.insert(number.clone(), schedule);
    }

    async fn enter(&self, method: &'static str) -> ApiResult<()> {
        lock(&self.calls).push(method);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if lock(&self.failing).contains(method) {
            return Err(ClientError::Status {
                status: 500,
                message: format!("{method} failed"),
            });
        }
        Ok(())
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        lock(&self.backend)
    }
}

fn not_found(what: impl std::fmt::Display) -> ClientError {
    ClientError::NotFound(what.to_string())
}

impl ProcurementApi for RecordingApi {
    async fn create_request(&self, basic: &BasicInfo) -> ApiResult<RequestNumber> {
        self.enter("create_request").await?;
        let mut backend = self.backend();
        backend.next_number += 1;
        let number = RequestNumber::new(format!("PR-{}", backend.next_number));
        backend.requests.insert(
            number.clone(),
            PurchaseRequest {
                number: number.clone(),
                basic: basic.clone(),
                status: RequestStatus::Draft,
                total_amount: None,
                created_at: None,
            },
        );
        Ok(number)
    }

    async fn update_request(&self, number: &RequestNumber, basic: &BasicInfo) -> ApiResult<()> {
        self.enter("update_request").await?;
        let mut backend = self.backend();
        let request = backend
            .requests
            .get_mut(number)
            .ok_or_else(|| not_found(number))?;
        request.basic = basic.clone();
        Ok(())
    }

    async fn get_request(&self, number: &RequestNumber) -> ApiResult<PurchaseRequest> {
        self.enter("get_request").await?;
        self.backend()
            .requests
            .get(number)
            .cloned()
            .ok_or_else(|| not_found(number))
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: PageRequest,
    ) -> ApiResult<PageResponse<RequestSummary>> {
        self.enter("list_requests").await?;
        let backend = self.backend();
        let mut rows: Vec<RequestSummary> = backend
            .requests
            .values()
            .filter(|r| filter.status.is_none_or(|status| r.status == status))
            .map(|r| RequestSummary {
                number: r.number.clone(),
                name: r.basic.name.clone(),
                requestor: r.basic.requestor.clone(),
                status: r.status,
                total_amount: r.total_amount,
                created_at: r.created_at,
            })
            .collect();
        rows.sort_by(|a, b| a.number.cmp(&b.number));
        let total = rows.len() as u64;
        let start = usize::try_from(page.offset()).unwrap();
        let data = rows
            .into_iter()
            .skip(start)
            .take(page.per_page as usize)
            .collect();
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn get_additional_info(&self, number: &RequestNumber) -> ApiResult<AdditionalInfoRecord> {
        self.enter("get_additional_info").await?;
        let payload = self
            .backend()
            .additional
            .get(number)
            .cloned()
            .ok_or_else(|| not_found(number))?;
        serde_json::from_value(payload).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn save_additional_info(&self, number: &RequestNumber, payload: Value) -> ApiResult<()> {
        self.enter("save_additional_info").await?;
        self.backend().additional.insert(number.clone(), payload);
        Ok(())
    }

    async fn get_items(&self, number: &RequestNumber) -> ApiResult<Vec<LineItem>> {
        self.enter("get_items").await?;
        Ok(self.backend().items.get(number).cloned().unwrap_or_default())
    }

    async fn replace_items(&self, number: &RequestNumber, items: &[LineItem]) -> ApiResult<()> {
        self.enter("replace_items").await?;
        self.backend().items.insert(number.clone(), items.to_vec());
        Ok(())
    }

    async fn get_approval(&self, number: &RequestNumber) -> ApiResult<ApprovalAssignment> {
        self.enter("get_approval").await?;
        Ok(self
            .backend()
            .approvals
            .get(number)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_approval(
        &self,
        number: &RequestNumber,
        approval: &ApprovalAssignment,
    ) -> ApiResult<()> {
        self.enter("save_approval").await?;
        self.backend()
            .approvals
            .insert(number.clone(), approval.clone());
        Ok(())
    }

    async fn list_documents(&self, number: &RequestNumber) -> ApiResult<Vec<Document>> {
        self.enter("list_documents").await?;
        Ok(self
            .backend()
            .documents
            .get(number)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_document(
        &self,
        number: &RequestNumber,
        document: &PendingDocument,
    ) -> ApiResult<Document> {
        self.enter("upload_document").await?;
        let mut backend = self.backend();
        backend.next_document += 1;
        Ok(Document {
            id: DocumentId(backend.next_document),
            filename: document.filename.clone(),
            size: document.content.len() as u64,
            path: format!("/{number}/{}", document.filename),
        })
    }

    async fn sync_documents(&self, number: &RequestNumber, ids: &[DocumentId]) -> ApiResult<()> {
        self.enter("sync_documents").await?;
        let docs = ids
            .iter()
            .map(|id| Document {
                id: *id,
                filename: format!("doc-{id}"),
                size: 0,
                path: format!("/{number}/{id}"),
            })
            .collect();
        self.backend().documents.insert(number.clone(), docs);
        Ok(())
    }

    async fn record_status(&self, number: &RequestNumber, change: &StatusChange) -> ApiResult<()> {
        self.enter("record_status").await?;
        let mut backend = self.backend();
        if let Some(request) = backend.requests.get_mut(number) {
            request.status = change.status;
        }
        backend.statuses.push((number.clone(), change.clone()));
        Ok(())
    }

    async fn purchase_types(&self) -> ApiResult<Vec<PurchaseType>> {
        self.enter("purchase_types").await?;
        Ok(self.backend().types.clone())
    }

    async fn purchase_sub_types(&self, type_id: i32) -> ApiResult<Vec<PurchaseSubType>> {
        self.enter("purchase_sub_types").await?;
        Ok(self
            .backend()
            .sub_types
            .get(&type_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn lookup_employees(&self, ids: &[String]) -> ApiResult<Vec<EmployeeName>> {
        self.enter("lookup_employees").await?;
        let mut backend = self.backend();
        backend.lookups.push(ids.to_vec());
        Ok(backend
            .employees
            .iter()
            .filter(|e| ids.contains(&e.id.normalized()))
            .cloned()
            .collect())
    }

    async fn get_order(&self, number: &OrderNumber) -> ApiResult<PurchaseOrder> {
        self.enter("get_order").await?;
        self.backend()
            .orders
            .get(number)
            .cloned()
            .ok_or_else(|| not_found(number))
    }

    async fn get_amortization(&self, number: &OrderNumber) -> ApiResult<Vec<AmortizationPeriod>> {
        self.enter("get_amortization").await?;
        self.backend()
            .schedules
            .get(number)
            .cloned()
            .ok_or_else(|| not_found(number))
    }

    async fn cancel_period(&self, number: &OrderNumber, period: u32) -> ApiResult<()> {
        self.enter("cancel_period").await?;
        self.backend()
            .period_actions
            .push((number.clone(), period, "cancel"));
        Ok(())
    }

    async fn release_period(&self, number: &OrderNumber, period: u32) -> ApiResult<()> {
        self.enter("release_period").await?;
        self.backend()
            .period_actions
            .push((number.clone(), period, "release"));
        Ok(())
    }
}

pub fn purchase_type(id: i32, name: &str, category: Option<&str>) -> PurchaseType {
    PurchaseType {
        id,
        name: name.to_string(),
        category: category.map(str::to_string),
    }
}

pub fn sub_type(id: i32, type_id: i32, name: &str) -> PurchaseSubType {
    PurchaseSubType {
        id,
        type_id,
        name: name.to_string(),
    }
}

/// Basic information of a request with the given type ids.
pub fn basic(type_id: Option<i32>, sub_type_id: Option<i32>) -> BasicInfo {
    BasicInfo {
        requestor: EmployeeId::new("E1"),
        applicant: EmployeeId::new("E2"),
        company: "PT Sinar Jaya".to_string(),
        type_id,
        sub_type_id,
        name: "Network refresh".to_string(),
        ..BasicInfo::default()
    }
}

pub fn item(name: &str, quantity: i64, unit_price: Decimal) -> LineItem {
    LineItem {
        inventory_id: None,
        name: name.to_string(),
        description: None,
        unit: "pcs".to_string(),
        quantity,
        currency: "IDR".to_string(),
        unit_price,
        amount: None,
    }
}

pub fn full_approval() -> ApprovalAssignment {
    ApprovalAssignment {
        reviewer: Some(EmployeeId::new("E2")),
        approver: Some(EmployeeId::new("E3")),
        confirmer: Some(EmployeeId::new("E4")),
    }
}

pub fn pdf(name: &str) -> PendingDocument {
    PendingDocument::new(name, "application/pdf", Bytes::from_static(b"%PDF-1.7"))
}

pub fn document(id: i64) -> Document {
    Document {
        id: DocumentId(id),
        filename: format!("doc-{id}.pdf"),
        size: 2048,
        path: format!("/docs/{id}.pdf"),
    }
}

pub fn request(number: &str, status: RequestStatus, basic: BasicInfo) -> PurchaseRequest {
    PurchaseRequest {
        number: RequestNumber::new(number),
        basic,
        status,
        total_amount: None,
        created_at: None,
    }
}

pub fn laptops() -> Vec<LineItem> {
    vec![item("Laptop", 2, dec!(15000000)), item("Dock", 2, dec!(2500000))]
}

/// Billing information covering twelve months of 2024.
pub fn billing_2024() -> AdditionalInfo {
    AdditionalInfo::Billing(BillingFields {
        start_period: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_period: NaiveDate::from_ymd_opt(2024, 12, 31),
        period_count: Some(12),
        billing_type: Some("Monthly".to_string()),
    })
}

/// Services wired around one fake backend.
pub struct Harness {
    pub api: Arc<RecordingApi>,
    pub store: Arc<MemoryDraftStore>,
    pub references: Arc<ReferenceCache<RecordingApi>>,
}

impl Harness {
    pub fn new(api: RecordingApi) -> Self {
        let api = Arc::new(api);
        let references = Arc::new(ReferenceCache::new(
            Arc::clone(&api),
            &CacheConfig::default(),
        ));
        Self {
            api,
            store: Arc::new(MemoryDraftStore::new()),
            references,
        }
    }

    pub fn sequencer(&self) -> DraftSequencer<RecordingApi, MemoryDraftStore> {
        DraftSequencer::new(
            Arc::clone(&self.api),
            Arc::clone(&self.store),
            Arc::clone(&self.references),
        )
    }

    pub fn views(&self) -> ViewComposer<RecordingApi> {
        ViewComposer::new(
            Arc::clone(&self.api),
            Arc::clone(&self.references),
        )
    }

    pub fn decisions(&self) -> DecisionService<RecordingApi> {
        DecisionService::new(Arc::clone(&self.api))
    }

    pub fn release(&self) -> ReleaseService<RecordingApi> {
        ReleaseService::new(Arc::clone(&self.api))
    }
}
