use std::sync::Arc;

use axum::{
    Form,
    extract::Extension,
    response::{Html, IntoResponse, Response},
};

use pricestats_products::{NewProduct, parse_entry};

use crate::app::dto::ProductForm;
use crate::app::errors::{ApiError, found};
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::views;

pub async fn create_form(Extension(user): Extension<CurrentUser>) -> Html<String> {
    Html(views::create_page(&user, "", "", None))
}

/// Validate and store a product owned by the caller, then show their stats.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<ProductForm>,
) -> Result<Response, ApiError> {
    let entry = match parse_entry(&form.name, &form.price) {
        Ok(entry) => entry,
        Err(errors) => {
            tracing::debug!(user_id = %user.user_id(), errors = %errors, "product entry rejected");
            let page = views::create_page(&user, &form.name, &form.price, Some(&errors));
            return Ok(Html(page).into_response());
        }
    };

    let product = services
        .products
        .insert(NewProduct {
            name: entry.name,
            price: entry.price,
            owner: Some(user.user_id()),
        })
        .await?;

    tracing::info!(
        user_id = %user.user_id(),
        product_id = %product.id_typed(),
        price = %product.price(),
        "product created"
    );

    Ok(found(&format!("/stats/{}/", user.user_id())))
}
