use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{payment_methods, sale_items, sales};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Discount exceeds total: discount 100.00 is greater than items subtotal 59.98")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clothing Store API",
        description = "Sales of a clothing store: sales with their line items and payment methods."
    ),
    paths(
        sales::list_sales,
        sales::get_sale,
        sales::list_sales_by_customer,
        sales::list_sales_by_employee,
        sales::list_sales_by_date_range,
        sales::create_sale,
        sales::update_sale,
        sales::delete_sale,
        sale_items::list_all_sale_items,
        sale_items::list_sale_items,
        sale_items::get_sale_item,
        sale_items::list_sale_items_by_product,
        payment_methods::list_payment_methods,
    ),
    components(schemas(
        sales::SaleRequest,
        sales::SaleItemRequest,
        sales::SaleResponse,
        sale_items::SaleItemResponse,
        payment_methods::PaymentMethodResponse,
        ErrorResponse,
    )),
    tags(
        (name = "sales", description = "Sale management"),
        (name = "sale-items", description = "Read access to sale line items"),
        (name = "payment-methods", description = "Accepted payment methods"),
    )
)]
pub struct ApiDoc;
