//! View composers.
//!
//! Each composer loads a parent record, then its children concurrently. The
//! parent is required; a child that fails to load is logged and shown empty.

use std::sync::Arc;

use procura_core::amortization::{AmortizationPeriod, build_schedule};
use procura_core::request::{
    PurchaseRequest, RequestFilter, RequestStatus, RequestSummary, total_amount,
};
use procura_core::review::ReviewSession;
use procura_core::section::{AdditionalInfo, SectionKind};
use procura_core::workflow::WorkflowService;
use procura_shared::types::{EmployeeId, OrderNumber, PageRequest, PageResponse, RequestNumber};
use tracing::{debug, warn};

use super::error::ViewError;
use super::types::{ApprovalView, EmployeeNames, OrderView, ReceiveView, RequestView};
use crate::api::{ApiResult, ProcurementApi};
use crate::cache::ReferenceCache;

/// Composes screen view models from backend data.
pub struct ViewComposer<A: ProcurementApi> {
    api: Arc<A>,
    references: Arc<ReferenceCache<A>>,
}

impl<A: ProcurementApi> ViewComposer<A> {
    /// Creates a composer.
    #[must_use]
    pub fn new(api: Arc<A>, references: Arc<ReferenceCache<A>>) -> Self {
        Self { api, references }
    }

    /// One page of the request list.
    pub async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: PageRequest,
    ) -> Result<PageResponse<RequestSummary>, ViewError> {
        self.api
            .list_requests(filter, page)
            .await
            .map_err(ViewError::unavailable("purchase request list"))
    }

    /// Request detail.
    pub async fn compose_request(&self, number: &RequestNumber) -> Result<RequestView, ViewError> {
        let request = self
            .api
            .get_request(number)
            .await
            .map_err(ViewError::unavailable(format!("purchase request {number}")))?;
        Ok(self.compose_children(request).await)
    }

    /// Request detail for a reviewer, with the documents still to open.
    pub async fn compose_approval(
        &self,
        number: &RequestNumber,
        session: &ReviewSession,
    ) -> Result<ApprovalView, ViewError> {
        let request = self.compose_request(number).await?;
        let status = request.request.status;
        let unviewed = session
            .unviewed(&request.documents)
            .into_iter()
            .map(|doc| doc.id)
            .collect();

        Ok(ApprovalView {
            view_only: status.is_view_only(),
            next_activity: WorkflowService::next_approval_step(status).map(|(_, label)| label),
            unviewed,
            request,
        })
    }

    /// Request detail for goods receipt.
    pub async fn compose_receive(&self, number: &RequestNumber) -> Result<ReceiveView, ViewError> {
        let request = self.compose_request(number).await?;
        Ok(ReceiveView {
            can_receive: request.request.status == RequestStatus::Confirmed,
            request,
        })
    }

    /// Purchase order detail with its request and amortization schedule.
    ///
    /// The schedule is built locally only when the backend has none for the
    /// order. Any other fetch failure leaves it empty.
    pub async fn compose_order(&self, number: &OrderNumber) -> Result<OrderView, ViewError> {
        let order = self
            .api
            .get_order(number)
            .await
            .map_err(ViewError::unavailable(format!("purchase order {number}")))?;

        let request = match self.compose_request(&order.request_number).await {
            Ok(view) => Some(view),
            Err(err) => {
                warn!(po_number = %number, error = %err, "order request unavailable");
                None
            }
        };

        let billing = request
            .as_ref()
            .and_then(|view| view.additional.as_ref())
            .and_then(AdditionalInfo::billing);
        let schedule = match billing {
            None => Vec::new(),
            Some(billing) => match self.api.get_amortization(number).await {
                Ok(schedule) => schedule,
                Err(err) if !err.is_not_found() => {
                    warn!(po_number = %number, error = %err, "amortization schedule unavailable");
                    Vec::new()
                }
                Err(err) => {
                    debug!(po_number = %number, error = %err, "building amortization locally");
                    let total = order
                        .total_amount
                        .or_else(|| request.as_ref().map(|view| view.total))
                        .unwrap_or_default();
                    build_schedule(billing, total).unwrap_or_else(|err| {
                        warn!(po_number = %number, error = %err, "no amortization schedule");
                        Vec::<AmortizationPeriod>::new()
                    })
                }
            },
        };

        Ok(OrderView {
            order,
            request,
            schedule,
        })
    }

    async fn compose_children(&self, request: PurchaseRequest) -> RequestView {
        let number = &request.number;
        let resolved = self.references.resolve_types(&request.basic).await;
        let section = resolved.section();

        let (items, documents, approval, additional, (type_label, sub_type_label)) = tokio::join!(
            self.api.get_items(number),
            self.api.list_documents(number),
            self.api.get_approval(number),
            self.additional(number, section),
            self.references.type_labels(resolved),
        );
        let items = or_empty(items, number, "items");
        let documents = or_empty(documents, number, "documents");
        let approval = or_empty(approval, number, "approval");

        let mut people = vec![request.basic.requestor.clone(), request.basic.applicant.clone()];
        people.extend(
            approval
                .roles()
                .into_iter()
                .filter_map(|(_, id)| id.cloned()),
        );
        let names = EmployeeNames::new(self.references.employee_names(&people).await);

        let total = request
            .total_amount
            .unwrap_or_else(|| total_amount(&items));

        RequestView {
            items,
            documents,
            approval,
            section,
            additional,
            type_label,
            sub_type_label,
            total,
            names,
            request,
        }
    }

    /// Additional information of a request; `None` hides the section.
    async fn additional(&self, number: &RequestNumber, section: SectionKind) -> Option<AdditionalInfo> {
        if !section.requires_fetch() {
            return None;
        }
        match self.api.get_additional_info(number).await {
            Ok(record) => AdditionalInfo::from_record(section, record),
            Err(err) if err.is_not_found() => {
                debug!(pr_number = %number, %section, "no additional information");
                None
            }
            Err(err) => {
                warn!(pr_number = %number, error = %err, "additional information unavailable");
                None
            }
        }
    }

    /// Display name of one employee, for screens that show a single person.
    pub async fn employee_name(&self, id: &EmployeeId) -> String {
        self.references.employee_name(id).await
    }
}

fn or_empty<T: Default>(result: ApiResult<T>, number: &RequestNumber, what: &str) -> T {
    result.unwrap_or_else(|err| {
        warn!(pr_number = %number, error = %err, what, "request child unavailable");
        T::default()
    })
}
