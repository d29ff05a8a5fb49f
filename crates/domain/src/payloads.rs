//! Request bodies sent by the scenarios.
//!
//! The `fixture` constructors carry the sample data the suite has always
//! posted, so runs against the same backend stay comparable.

use serde::{Deserialize, Serialize};

use crate::session::Credentials;

/// Title of the order created by the orders scenario.
pub const FIXTURE_ORDER_TITLE: &str = "Construction d'un entrepôt";

/// `POST api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Company name.
    pub company: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

impl Registration {
    /// Registration for `credentials` with the fixture profile.
    #[must_use]
    pub fn fixture(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            full_name: "Test User Doxa".to_string(),
            company: "Test Company SARL".to_string(),
            phone: "+243123456789".to_string(),
            address: "Kolwezi, DRC".to_string(),
        }
    }
}

/// `POST api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Business branch.
    pub branch: String,
    /// Requested service.
    pub service_type: String,
    /// Order title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Priority (`low`, `normal`, `high`).
    pub priority: String,
    /// Budget bracket.
    pub budget_range: String,
}

impl NewOrder {
    /// The warehouse construction order.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            branch: "construction".to_string(),
            service_type: "Vente de matériaux".to_string(),
            title: FIXTURE_ORDER_TITLE.to_string(),
            description: "Besoin de matériaux pour construire un entrepôt de 500m²".to_string(),
            priority: "high".to_string(),
            budget_range: "10000-50000".to_string(),
        }
    }
}

/// `POST api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Ticket subject.
    pub subject: String,
    /// Ticket body.
    pub message: String,
    /// Priority.
    pub priority: String,
}

impl NewMessage {
    /// A question about an order's progress.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            subject: "Question sur ma commande".to_string(),
            message: "J'aimerais avoir des informations sur l'état d'avancement de ma commande."
                .to_string(),
            priority: "normal".to_string(),
        }
    }
}

/// Contact block of a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Contact company.
    pub company: String,
}

/// `POST api/quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Business branch.
    pub branch: String,
    /// Requested service.
    pub service_type: String,
    /// Free-text description.
    pub description: String,
    /// Who to get back to.
    pub contact_info: ContactInfo,
    /// Desired timeline (e.g. `1month`).
    pub timeline: String,
}

impl QuoteRequest {
    /// An agricultural supplies quote.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            branch: "agriculture".to_string(),
            service_type: "Vente d'intrants agricoles".to_string(),
            description: "Besoin d'intrants pour une exploitation de 10 hectares".to_string(),
            contact_info: ContactInfo {
                name: "Jean Kabila".to_string(),
                email: "jean.kabila@example.com".to_string(),
                phone: "+243987654321".to_string(),
                company: "Agri Congo SARL".to_string(),
            },
            timeline: "1month".to_string(),
        }
    }
}

/// `POST api/prospects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProspect {
    /// Prospect name.
    pub name: String,
    /// Prospect email.
    pub email: String,
    /// Prospect phone.
    pub phone: String,
    /// Prospect company.
    pub company: String,
    /// Area of interest.
    pub interest: String,
    /// Free-text message.
    pub message: String,
}

impl NewProspect {
    /// A fashion retailer prospect.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            name: "Marie Tshisekedi".to_string(),
            email: "marie.tshisekedi@example.com".to_string(),
            phone: "+243456789123".to_string(),
            company: "Mode Congo".to_string(),
            interest: "Mode & Habillement".to_string(),
            message: "Intéressée par vos services de mode et habillement pour ma boutique."
                .to_string(),
        }
    }
}
