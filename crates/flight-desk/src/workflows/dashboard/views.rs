use crate::workflows::domain::{Airline, City, Notice, TravelClass};
use crate::workflows::fares::FareTrendPoint;
use crate::workflows::meals::{MealPreference, MenuItem, OrderTotal};
use crate::workflows::refunds::RefundTier;
use crate::workflows::reviews::{empty_notice, PieSlice, RecommendationSummary};
use serde::Serialize;

/// Everything a surface needs to redraw the dashboard after one event.
///
/// Action sections (`fare`, `refund`, `reviews`) are only populated on the
/// event that triggered them; the sidebar and meal sections render every time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub sidebar: SidebarView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<FareView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund: Option<RefundView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<ReviewView>,
    pub meals: MealView,
    /// Rejections of the event itself, e.g. an out-of-range slider value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarView {
    pub origin: City,
    pub destination: City,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_warning: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareView {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_error: Option<Notice>,
}

impl FareView {
    pub(crate) fn failed(notice: Notice) -> Self {
        Self {
            notice,
            predicted_price: None,
            trend: None,
            trend_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<FareTrendPoint>,
}

impl TrendChart {
    pub fn new(title: String, points: Vec<FareTrendPoint>) -> Self {
        Self {
            title,
            x_label: "Days Left Until Departure",
            y_label: "Predicted Price (\u{20b9})",
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundView {
    pub days_left: u8,
    pub tier: RefundTier,
    pub notice: Notice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub airline: Airline,
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RecommendationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<PieChart>,
}

impl ReviewView {
    /// Wraps an aggregation result; `None` renders the empty-dataset notice.
    pub fn from_summary(airline: Airline, summary: Option<RecommendationSummary>) -> Self {
        match summary {
            Some(summary) => Self {
                airline,
                notice: summary.notice(),
                chart: Some(PieChart {
                    title: summary.chart_title(),
                    slices: summary.breakdown(),
                }),
                summary: Some(summary),
            },
            None => Self::notice_only(airline, empty_notice()),
        }
    }

    pub(crate) fn notice_only(airline: Airline, notice: Notice) -> Self {
        Self {
            airline,
            notice,
            summary: None,
            chart: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: [PieSlice; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealView {
    pub airline: Airline,
    pub travel_class: TravelClass,
    pub preference: MealPreference,
    pub include_seasonal: bool,
    pub entries: Vec<MenuEntry>,
    pub total: OrderTotal,
    pub total_notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_error: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    pub key: String,
    pub label: String,
    pub selected: bool,
    pub item: MenuItem,
}

impl MenuEntry {
    pub fn new(item: MenuItem, travel_class: TravelClass, selected: bool) -> Self {
        Self {
            key: item.key(),
            label: item.label(travel_class),
            selected,
            item,
        }
    }
}
