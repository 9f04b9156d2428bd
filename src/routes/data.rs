//! Data routes
//!
//! Generic list/create endpoints over the typed collection registry:
//!
//! - `GET /api/v1/{collection}?coopId=...` — list documents in a tenant.
//!   `limit`/`skip`/`page` control paging; any other query parameter
//!   becomes an equality condition.
//! - `POST /api/v1/{collection}` — create a document from the JSON body
//!   (which must carry its `coopId`).
//!
//! Every call is tenant-scoped through the accessor; a list request
//! without `coopId` is a 400, not an implicit cross-tenant read.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::domain::{
    Cooperative, DepositAccount, DepositTransaction, LoanContract, LoanPayment, LoanProduct,
    Member, Product, Sale, ShareAccount, StockMovement, User,
};
use crate::routes::{error_response, json_response};
use crate::server::AppState;
use crate::store::{Collection, FetchOptions, Filter, TenantDocument};
use crate::types::GranaryError;

/// Query parameters with paging keys split off from filter conditions.
struct ListParams {
    coop_id: String,
    filter: Filter,
    options: FetchOptions,
}

const RESERVED_PARAMS: &[&str] = &["coopId", "limit", "skip", "page"];
const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

fn parse_query_params(query: &str) -> HashMap<String, String> {
    if query.is_empty() {
        return HashMap::new();
    }

    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn parse_list_params(query: Option<&str>) -> Result<ListParams, String> {
    let params = parse_query_params(query.unwrap_or(""));

    let coop_id = params
        .get("coopId")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| "coopId query parameter is required".to_string())?
        .clone();

    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT);

    let options = if let Some(page) = params.get("page").and_then(|v| v.parse::<i64>().ok()) {
        FetchOptions::page(page, limit)
    } else {
        FetchOptions {
            limit: Some(limit),
            skip: params.get("skip").and_then(|v| v.parse::<i64>().ok()),
            ..Default::default()
        }
    };

    let mut filter = Filter::new();
    for (key, value) in &params {
        if RESERVED_PARAMS.contains(&key.as_str()) {
            continue;
        }
        filter = filter.eq(key.clone(), value.clone());
    }

    Ok(ListParams {
        coop_id,
        filter,
        options,
    })
}

#[derive(Serialize)]
struct ListResponse<T> {
    data: Vec<T>,
    count: u64,
}

async fn list<T: TenantDocument>(
    state: &AppState,
    params: ListParams,
) -> Response<Full<Bytes>> {
    let collection = Collection::<T>::new(Arc::clone(&state.store));

    match collection
        .find(&params.coop_id, params.filter, params.options)
        .await
    {
        Ok(page) => json_response(
            StatusCode::OK,
            &ListResponse {
                data: page.data,
                count: page.count,
            },
        ),
        Err(e) => {
            warn!(collection = T::COLLECTION, error = %e, "list failed");
            let (status, body) = e.into_status_code_and_body();
            error_response(status, &body)
        }
    }
}

async fn create<T: TenantDocument>(state: &AppState, body: &Bytes) -> Response<Full<Bytes>> {
    let doc: T = match serde_json::from_slice(body) {
        Ok(doc) => doc,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid {} document: {}", T::COLLECTION, e),
            );
        }
    };

    let collection = Collection::<T>::new(Arc::clone(&state.store));

    match collection.create(doc).await {
        Ok(created) => json_response(StatusCode::CREATED, &created),
        Err(e) => {
            if !matches!(e, GranaryError::BadRequest(_)) {
                warn!(collection = T::COLLECTION, error = %e, "create failed");
            }
            let (status, body) = e.into_status_code_and_body();
            error_response(status, &body)
        }
    }
}

/// Handle `/api/v1/{collection}` requests for the known collections.
pub async fn handle_data(
    state: Arc<AppState>,
    method: &Method,
    collection: &str,
    query: Option<&str>,
    body: Bytes,
) -> Response<Full<Bytes>> {
    match *method {
        Method::GET => {
            let params = match parse_list_params(query) {
                Ok(params) => params,
                Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
            };

            match collection {
                "cooperatives" => list::<Cooperative>(&state, params).await,
                "members" => list::<Member>(&state, params).await,
                "share_accounts" => list::<ShareAccount>(&state, params).await,
                "deposit_accounts" => list::<DepositAccount>(&state, params).await,
                "deposit_transactions" => list::<DepositTransaction>(&state, params).await,
                "loan_products" => list::<LoanProduct>(&state, params).await,
                "loan_contracts" => list::<LoanContract>(&state, params).await,
                "loan_payments" => list::<LoanPayment>(&state, params).await,
                "products" => list::<Product>(&state, params).await,
                "stock_movements" => list::<StockMovement>(&state, params).await,
                "sales" => list::<Sale>(&state, params).await,
                "users" => list::<User>(&state, params).await,
                _ => error_response(
                    StatusCode::NOT_FOUND,
                    &format!("Unknown collection: {}", collection),
                ),
            }
        }
        Method::POST => match collection {
            "cooperatives" => create::<Cooperative>(&state, &body).await,
            "members" => create::<Member>(&state, &body).await,
            "share_accounts" => create::<ShareAccount>(&state, &body).await,
            "deposit_accounts" => create::<DepositAccount>(&state, &body).await,
            "deposit_transactions" => create::<DepositTransaction>(&state, &body).await,
            "loan_products" => create::<LoanProduct>(&state, &body).await,
            "loan_contracts" => create::<LoanContract>(&state, &body).await,
            "loan_payments" => create::<LoanPayment>(&state, &body).await,
            "products" => create::<Product>(&state, &body).await,
            "stock_movements" => create::<StockMovement>(&state, &body).await,
            "sales" => create::<Sale>(&state, &body).await,
            "users" => create::<User>(&state, &body).await,
            _ => error_response(
                StatusCode::NOT_FOUND,
                &format!("Unknown collection: {}", collection),
            ),
        },
        _ => error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
    }
}
