use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::sale::PaymentMethod;

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodResponse {
    #[schema(example = "CREDIT_CARD")]
    pub code: String,
    #[schema(example = "Credit card")]
    pub description: String,
}

impl From<PaymentMethod> for PaymentMethodResponse {
    fn from(method: PaymentMethod) -> Self {
        Self {
            code: method.code().to_string(),
            description: method.description().to_string(),
        }
    }
}

/// GET /api/payment-methods
#[utoipa::path(
    get,
    path = "/api/payment-methods",
    responses(
        (status = 200, description = "Accepted payment methods", body = Vec<PaymentMethodResponse>),
    ),
    tag = "payment-methods"
)]
pub async fn list_payment_methods() -> HttpResponse {
    let body: Vec<PaymentMethodResponse> = PaymentMethod::ALL
        .into_iter()
        .map(PaymentMethodResponse::from)
        .collect();
    HttpResponse::Ok().json(body)
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};

    use super::*;

    #[actix_web::test]
    async fn lists_every_payment_method() {
        let app = test::init_service(
            App::new().route("/api/payment-methods", web::get().to(list_payment_methods)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/payment-methods").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let codes: Vec<&str> = body
            .as_array()
            .expect("array body")
            .iter()
            .map(|m| m["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["CREDIT_CARD", "BANK_SLIP", "PIX"]);
        assert_eq!(body[1]["description"], "Bank slip");
    }
}
