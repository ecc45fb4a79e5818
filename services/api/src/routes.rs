use crate::infra::AppState;
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDateTime};
use flight_desk::error::AppError;
use flight_desk::workflows::dashboard::{
    DashboardEvent, DashboardSession, DashboardState, DashboardView, MenuEntry, ReviewView,
    TrendChart,
};
use flight_desk::workflows::domain::{
    format_rupees, Airline, City, Notice, Route, TravelClass,
};
use flight_desk::workflows::fares::{predict_fare, sample_trend, trend_title, FareQuery};
use flight_desk::workflows::meals::{
    compose_menu, filter_menu, find_item, MealOrder, MealPreference, MenuError, MenuItem,
    OrderTotal,
};
use flight_desk::workflows::refunds::{RefundRecord, RefundTier, TierCountEntry};
use flight_desk::workflows::reviews::recommendation_for;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub(crate) fn desk_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/fares/predict", post(predict_endpoint))
        .route("/api/v1/fares/trend", get(trend_endpoint))
        .route("/api/v1/refunds/eligibility", post(refund_endpoint))
        .route("/api/v1/refunds/breakdown", get(refund_breakdown_endpoint))
        .route("/api/v1/reviews/:airline", get(reviews_endpoint))
        .route("/api/v1/meals/menu", post(menu_endpoint))
        .route("/api/v1/meals/order", post(order_endpoint))
        .route("/api/v1/dashboard/events", post(dashboard_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct FareRequest {
    pub(crate) origin: City,
    pub(crate) destination: City,
    pub(crate) airline: Airline,
    pub(crate) travel_class: TravelClass,
    pub(crate) days_left: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct FareResponse {
    pub(crate) route: Route,
    pub(crate) query: FareQuery,
    pub(crate) predicted_price: f64,
    pub(crate) formatted_price: String,
    pub(crate) notice: Notice,
}

pub(crate) async fn predict_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FareRequest>,
) -> Result<Json<FareResponse>, AppError> {
    let route = Route::new(payload.origin, payload.destination)?;
    let query = FareQuery::new(payload.airline, payload.travel_class, payload.days_left)?;
    let predicted_price = predict_fare(state.desk.fare_model(), &query)?;
    let formatted_price = format_rupees(predicted_price);
    info!(airline = %query.airline(), price = predicted_price, "fare predicted over http");

    Ok(Json(FareResponse {
        route,
        query,
        predicted_price,
        notice: Notice::success(format!("Estimated Flight Price: {formatted_price}")),
        formatted_price,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrendParams {
    pub(crate) airline: Airline,
    pub(crate) travel_class: TravelClass,
}

pub(crate) async fn trend_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<TrendParams>,
) -> Result<Json<TrendChart>, AppError> {
    let points = sample_trend(state.desk.fare_model(), params.airline, params.travel_class)?;
    Ok(Json(TrendChart::new(
        trend_title(params.airline, params.travel_class),
        points,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RefundRequest {
    Departure {
        departure: NaiveDateTime,
        #[serde(default)]
        now: Option<NaiveDateTime>,
    },
    Hours {
        hours_left: f64,
    },
    Days {
        days_left: f64,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct RefundResponse {
    pub(crate) days_left: f64,
    pub(crate) tier: RefundTier,
    pub(crate) tier_label: &'static str,
    pub(crate) notice: Notice,
}

pub(crate) async fn refund_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RefundRequest>,
) -> Json<RefundResponse> {
    let policy = state.desk.refund_policy();
    let (days_left, tier) = match payload {
        RefundRequest::Departure { departure, now } => {
            let now = now.unwrap_or_else(|| Local::now().naive_local());
            let record = RefundRecord::from_departure(departure, now, policy);
            (record.days_left, record.tier)
        }
        RefundRequest::Hours { hours_left } => {
            let record = RefundRecord::from_hours(hours_left, policy);
            (record.days_left, record.tier)
        }
        RefundRequest::Days { days_left } => (days_left, policy.evaluate(days_left)),
    };

    Json(RefundResponse {
        days_left,
        tier,
        tier_label: tier.label(),
        notice: tier.notice(),
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct RefundBreakdownResponse {
    pub(crate) bookings: usize,
    pub(crate) tiers: Vec<TierCountEntry>,
}

pub(crate) async fn refund_breakdown_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<RefundBreakdownResponse> {
    let ledger = state.desk.refund_ledger();
    Json(RefundBreakdownResponse {
        bookings: ledger.records().len(),
        tiers: ledger.breakdown(),
    })
}

pub(crate) async fn reviews_endpoint(
    Extension(state): Extension<AppState>,
    Path(airline): Path<String>,
) -> Result<Json<ReviewView>, AppError> {
    let airline: Airline = airline.parse()?;
    let summary = recommendation_for(state.desk.reviews(), airline.label())?;
    Ok(Json(ReviewView::from_summary(airline, summary)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct MenuRequest {
    pub(crate) airline: Airline,
    pub(crate) travel_class: TravelClass,
    #[serde(default)]
    pub(crate) preference: MealPreference,
    #[serde(default)]
    pub(crate) include_seasonal: bool,
}

impl MenuRequest {
    fn visible_items(&self, state: &AppState) -> Result<Vec<MenuItem>, MenuError> {
        let composed = compose_menu(
            state.desk.meal_catalog(),
            self.airline,
            self.travel_class,
            self.include_seasonal,
        )?;
        Ok(filter_menu(&composed, self.preference))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MenuResponse {
    pub(crate) airline: Airline,
    pub(crate) travel_class: TravelClass,
    pub(crate) preference: MealPreference,
    pub(crate) entries: Vec<MenuEntry>,
}

pub(crate) async fn menu_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<MenuRequest>,
) -> Result<Json<MenuResponse>, AppError> {
    let entries = payload
        .visible_items(&state)?
        .into_iter()
        .map(|item| MenuEntry::new(item, payload.travel_class, false))
        .collect();

    Ok(Json(MenuResponse {
        airline: payload.airline,
        travel_class: payload.travel_class,
        preference: payload.preference,
        entries,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderRequest {
    #[serde(flatten)]
    pub(crate) menu: MenuRequest,
    /// Toggles applied in order; naming an item twice deselects it.
    #[serde(default)]
    pub(crate) toggles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderResponse {
    pub(crate) items: Vec<MenuItem>,
    pub(crate) total: OrderTotal,
    pub(crate) notice: Notice,
}

pub(crate) async fn order_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let visible = payload.menu.visible_items(&state)?;
    let mut order = MealOrder::new();
    for selector in &payload.toggles {
        order.toggle(find_item(&visible, selector)?);
    }

    let total = order.total();
    Ok(Json(OrderResponse {
        items: order.items().to_vec(),
        total,
        notice: total.notice(),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardRequest {
    #[serde(default)]
    pub(crate) state: DashboardState,
    #[serde(default)]
    pub(crate) events: Vec<DashboardEvent>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    pub(crate) state: DashboardState,
    pub(crate) view: DashboardView,
}

/// Replays client-held widget state plus new events and returns the last view.
pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let mut session = DashboardSession::resume(state.desk.clone(), payload.state)?;
    let mut view = session.render();
    for event in payload.events {
        view = session.apply(event);
    }

    Ok(Json(DashboardResponse {
        state: session.into_state(),
        view,
    }))
}
