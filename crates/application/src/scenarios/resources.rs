//! Orders and support messages owned by the registered user.

use apiprobe_domain::payloads::{NewMessage, NewOrder};
use apiprobe_domain::records::{
    Order, OrderReceipt, SupportMessage, TicketReceipt, ValidationError, expect_eq,
};
use apiprobe_domain::{CheckSpec, ResourceKind, ResponseRecord, ScenarioResult, SessionState};

use super::{ScenarioRunner, post_check};
use crate::ports::{Clock, HttpClient, Reporter};

impl<C: HttpClient, R: Reporter, K: Clock> ScenarioRunner<C, R, K> {
    /// Creates an order, lists orders and fetches the created one.
    ///
    /// Listing runs whether or not creation succeeded; fetching needs the id
    /// returned by creation.
    pub(super) async fn orders(&mut self, session: &mut SessionState, result: &mut ScenarioResult) {
        let order = NewOrder::fixture();
        let created = match post_check(result, "Create New Order", "api/orders", &order) {
            Some(spec) => self.expect::<OrderReceipt>(session, result, spec).await,
            None => None,
        };
        if let Some(receipt) = &created {
            self.note(&format!("Order created with ID: {}", receipt.order_id));
            session.record_id(ResourceKind::Order, receipt.order_id.as_str());
        }

        let list = CheckSpec::get("Get User Orders", "api/orders", 200);
        if let Some(orders) = self.expect_list::<Order>(session, result, list).await {
            if orders.is_empty() {
                let error = ValidationError::EmptyCollection { record: Order::NAME };
                self.reject(result, "Get User Orders", &error);
            } else {
                self.note(&format!("Retrieved {} orders", orders.len()));
            }
        }

        let Some(receipt) = created else {
            return;
        };
        let fetch = CheckSpec::get(
            "Get Specific Order",
            format!("api/orders/{}", receipt.order_id),
            200,
        );
        if let Some(fetched) = self.expect::<Order>(session, result, fetch).await {
            let matches = expect_eq("id", &receipt.order_id, &fetched.id)
                .and_then(|()| expect_eq("title", &order.title, &fetched.title));
            match matches {
                Ok(()) => self.note(&format!("Order details: {}", fetched.title)),
                Err(error) => self.reject(result, "Get Specific Order", &error),
            }
        }
    }

    /// Opens a support ticket and lists messages, which must include at
    /// least one entry.
    pub(super) async fn messages(
        &mut self,
        session: &mut SessionState,
        result: &mut ScenarioResult,
    ) {
        let created = match post_check(
            result,
            "Create Support Message",
            "api/messages",
            &NewMessage::fixture(),
        ) {
            Some(spec) => self.expect::<TicketReceipt>(session, result, spec).await,
            None => None,
        };
        if let Some(receipt) = created {
            self.note(&format!("Support ticket created: {}", receipt.ticket_id));
            session.record_id(ResourceKind::Ticket, receipt.ticket_id);
        }

        let list = CheckSpec::get("Get User Messages", "api/messages", 200);
        if let Some(messages) = self.expect_list::<SupportMessage>(session, result, list).await {
            if messages.is_empty() {
                let error = ValidationError::EmptyCollection {
                    record: SupportMessage::NAME,
                };
                self.reject(result, "Get User Messages", &error);
            } else {
                self.note(&format!("Retrieved {} messages", messages.len()));
            }
        }
    }
}
