//! Event-driven dashboard session. Every user interaction is an explicit
//! [`DashboardEvent`]; applying it updates the widget state and yields the
//! next [`DashboardView`].

mod views;

pub use views::{
    DashboardView, FareView, MealView, MenuEntry, PieChart, RefundView, ReviewView, SidebarView,
    TrendChart,
};

use crate::context::DeskContext;
use crate::workflows::domain::{
    format_rupees, Airline, City, Notice, Route, TravelClass, ValidationError,
};
use crate::workflows::fares::{predict_fare, sample_trend, trend_title, FareQuery, MAX_DAYS_LEFT};
use crate::workflows::meals::{
    compose_menu, filter_menu, find_item, MealOrder, MealPreference, MenuError, MenuItem,
    OrderTotal,
};
use crate::workflows::reviews::{recommendation_for, retrieval_notice};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_FARE_DAYS_LEFT: u8 = 30;
pub const MAX_REFUND_DAYS_LEFT: u8 = 10;
pub const DEFAULT_REFUND_DAYS_LEFT: u8 = 3;

const SAME_CITY_SIDEBAR: &str = "Source and destination cannot be the same.";
const SAME_CITY_PREDICTION: &str = "Please choose different cities for departure and arrival.";

/// Current value of every dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardState {
    pub origin: City,
    pub destination: City,
    pub airline: Airline,
    pub travel_class: TravelClass,
    pub fare_days_left: u8,
    pub refund_days_left: u8,
    pub meal_airline: Airline,
    pub meal_class: TravelClass,
    pub meal_preference: MealPreference,
    pub include_seasonal: bool,
    /// Menu keys of the ticked items.
    pub selected_meals: Vec<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            origin: City::Delhi,
            destination: City::Delhi,
            airline: Airline::Indigo,
            travel_class: TravelClass::Economy,
            fare_days_left: DEFAULT_FARE_DAYS_LEFT,
            refund_days_left: DEFAULT_REFUND_DAYS_LEFT,
            meal_airline: Airline::Indigo,
            meal_class: TravelClass::Economy,
            meal_preference: MealPreference::All,
            include_seasonal: false,
            selected_meals: Vec::new(),
        }
    }
}

impl DashboardState {
    fn validate(&self) -> Result<(), ValidationError> {
        checked_days(i64::from(self.fare_days_left), MAX_DAYS_LEFT)?;
        checked_days(i64::from(self.refund_days_left), MAX_REFUND_DAYS_LEFT)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DashboardEvent {
    SelectOrigin { city: City },
    SelectDestination { city: City },
    SelectAirline { airline: Airline },
    SelectTravelClass { travel_class: TravelClass },
    SetFareDaysLeft { days_left: i64 },
    PredictFare,
    SetRefundDaysLeft { days_left: i64 },
    CheckRefund,
    ShowReviews,
    SelectMealAirline { airline: Airline },
    SelectMealClass { travel_class: TravelClass },
    SetMealPreference { preference: MealPreference },
    SetIncludeSeasonal { include: bool },
    ToggleMealItem { item: String },
}

#[derive(Default)]
struct ActionOutput {
    fare: Option<FareView>,
    refund: Option<RefundView>,
    reviews: Option<ReviewView>,
    notices: Vec<Notice>,
}

pub struct DashboardSession {
    context: Arc<DeskContext>,
    state: DashboardState,
}

impl DashboardSession {
    pub fn new(context: Arc<DeskContext>) -> Self {
        Self {
            context,
            state: DashboardState::default(),
        }
    }

    /// Continues from widget values held by a client between requests.
    pub fn resume(
        context: Arc<DeskContext>,
        state: DashboardState,
    ) -> Result<Self, ValidationError> {
        state.validate()?;
        Ok(Self { context, state })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn into_state(self) -> DashboardState {
        self.state
    }

    /// Renders the current state without triggering any action.
    pub fn render(&mut self) -> DashboardView {
        self.view(ActionOutput::default())
    }

    pub fn apply(&mut self, event: DashboardEvent) -> DashboardView {
        debug!(?event, "dashboard event");
        let mut output = ActionOutput::default();

        match event {
            DashboardEvent::SelectOrigin { city } => self.state.origin = city,
            DashboardEvent::SelectDestination { city } => self.state.destination = city,
            DashboardEvent::SelectAirline { airline } => self.state.airline = airline,
            DashboardEvent::SelectTravelClass { travel_class } => {
                self.state.travel_class = travel_class;
            }
            DashboardEvent::SetFareDaysLeft { days_left } => {
                match checked_days(days_left, MAX_DAYS_LEFT) {
                    Ok(days) => self.state.fare_days_left = days,
                    Err(err) => output.notices.push(Notice::error(err.to_string())),
                }
            }
            DashboardEvent::PredictFare => output.fare = Some(self.run_prediction()),
            DashboardEvent::SetRefundDaysLeft { days_left } => {
                match checked_days(days_left, MAX_REFUND_DAYS_LEFT) {
                    Ok(days) => self.state.refund_days_left = days,
                    Err(err) => output.notices.push(Notice::error(err.to_string())),
                }
            }
            DashboardEvent::CheckRefund => output.refund = Some(self.check_refund()),
            DashboardEvent::ShowReviews => output.reviews = Some(self.show_reviews()),
            DashboardEvent::SelectMealAirline { airline } => {
                if self.state.meal_airline != airline {
                    self.state.meal_airline = airline;
                    self.state.selected_meals.clear();
                }
            }
            DashboardEvent::SelectMealClass { travel_class } => {
                if self.state.meal_class != travel_class {
                    self.state.meal_class = travel_class;
                    self.state.selected_meals.clear();
                }
            }
            DashboardEvent::SetMealPreference { preference } => {
                self.state.meal_preference = preference;
            }
            DashboardEvent::SetIncludeSeasonal { include } => {
                self.state.include_seasonal = include;
            }
            DashboardEvent::ToggleMealItem { item } => {
                if let Err(err) = self.toggle_meal(&item) {
                    output.notices.push(Notice::error(err.to_string()));
                }
            }
        }

        self.view(output)
    }

    fn run_prediction(&self) -> FareView {
        if let Err(err) = Route::new(self.state.origin, self.state.destination) {
            debug!(%err, "fare prediction blocked");
            return FareView::failed(Notice::error(SAME_CITY_PREDICTION));
        }

        let query = match FareQuery::new(
            self.state.airline,
            self.state.travel_class,
            i64::from(self.state.fare_days_left),
        ) {
            Ok(query) => query,
            Err(err) => return FareView::failed(Notice::error(err.to_string())),
        };

        let model = self.context.fare_model();
        let price = match predict_fare(model, &query) {
            Ok(price) => price,
            Err(err) => {
                warn!(%err, "fare prediction failed");
                return FareView::failed(Notice::error(format!("Fare prediction failed: {err}")));
            }
        };
        info!(
            origin = %self.state.origin,
            destination = %self.state.destination,
            airline = %query.airline(),
            price,
            "fare estimated"
        );

        let (trend, trend_error) = match sample_trend(model, query.airline(), query.travel_class())
        {
            Ok(points) => (
                Some(TrendChart::new(
                    trend_title(query.airline(), query.travel_class()),
                    points,
                )),
                None,
            ),
            Err(err) => {
                warn!(%err, "fare trend failed");
                (None, Some(Notice::error(format!("Fare trend unavailable: {err}"))))
            }
        };

        FareView {
            notice: Notice::success(format!("Estimated Flight Price: {}", format_rupees(price))),
            predicted_price: Some(price),
            trend,
            trend_error,
        }
    }

    fn check_refund(&self) -> RefundView {
        let days_left = self.state.refund_days_left;
        let tier = self.context.refund_policy().evaluate(f64::from(days_left));
        info!(days_left, tier = tier.label(), "refund eligibility checked");
        RefundView {
            days_left,
            tier,
            notice: tier.notice(),
        }
    }

    fn show_reviews(&self) -> ReviewView {
        let airline = self.state.airline;
        match recommendation_for(self.context.reviews(), airline.label()) {
            Ok(summary) => {
                if let Some(summary) = &summary {
                    info!(%airline, percent = summary.percent, "recommendation rate computed");
                }
                ReviewView::from_summary(airline, summary)
            }
            Err(err) => {
                warn!(%err, "review dataset unavailable");
                ReviewView::notice_only(airline, retrieval_notice(&err))
            }
        }
    }

    fn visible_menu(&self) -> Result<Vec<MenuItem>, MenuError> {
        let composed = compose_menu(
            self.context.meal_catalog(),
            self.state.meal_airline,
            self.state.meal_class,
            self.state.include_seasonal,
        )?;
        Ok(filter_menu(&composed, self.state.meal_preference))
    }

    fn order_for(&self, visible: &[MenuItem]) -> MealOrder {
        let mut order = MealOrder::new();
        for item in visible {
            if self.state.selected_meals.contains(&item.key()) {
                order.toggle(item);
            }
        }
        order
    }

    fn toggle_meal(&mut self, selector: &str) -> Result<bool, MenuError> {
        let visible = self.visible_menu()?;
        let item = find_item(&visible, selector)?;
        let mut order = self.order_for(&visible);
        let selected = order.toggle(item);
        debug!(item = %item.key(), selected, "meal toggled");
        self.state.selected_meals = order.items().iter().map(MenuItem::key).collect();
        Ok(selected)
    }

    fn meal_view(&mut self) -> MealView {
        let (entries, total, menu_error) = match self.visible_menu() {
            Ok(visible) => {
                let order = self.order_for(&visible);
                // Hidden items do not stay ticked.
                self.state.selected_meals = order.items().iter().map(MenuItem::key).collect();
                let entries: Vec<MenuEntry> = visible
                    .into_iter()
                    .map(|item| {
                        let selected = order.contains(&item);
                        MenuEntry::new(item, self.state.meal_class, selected)
                    })
                    .collect();
                (entries, order.total(), None)
            }
            Err(err) => {
                self.state.selected_meals.clear();
                (Vec::new(), OrderTotal::NothingSelected, Some(Notice::error(err.to_string())))
            }
        };

        MealView {
            airline: self.state.meal_airline,
            travel_class: self.state.meal_class,
            preference: self.state.meal_preference,
            include_seasonal: self.state.include_seasonal,
            entries,
            total,
            total_notice: total.notice(),
            menu_error,
        }
    }

    fn view(&mut self, output: ActionOutput) -> DashboardView {
        let route_warning = Route::new(self.state.origin, self.state.destination)
            .err()
            .map(|_| Notice::error(SAME_CITY_SIDEBAR));

        DashboardView {
            sidebar: SidebarView {
                origin: self.state.origin,
                destination: self.state.destination,
                route_warning,
            },
            fare: output.fare,
            refund: output.refund,
            reviews: output.reviews,
            meals: self.meal_view(),
            notices: output.notices,
        }
    }
}

fn checked_days(value: i64, max: u8) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|days| *days <= max)
        .ok_or(ValidationError::DaysLeftOutOfRange {
            min: 0,
            max,
            found: value,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::domain::{NoticeTone, RetrievalError};
    use crate::workflows::fares::{FareFrame, FarePredictor, PredictionError};
    use crate::workflows::meals::MealCatalog;
    use crate::workflows::refunds::RefundTier;
    use crate::workflows::reviews::{empty_notice, ReviewRecord, ReviewSource};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Prices each row at 1000 plus 10 per day left and counts artifact calls.
    #[derive(Default)]
    struct CountingPredictor {
        calls: AtomicUsize,
    }

    impl FarePredictor for CountingPredictor {
        fn predict(&self, frame: &FareFrame) -> Result<Vec<f64>, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(frame
                .rows()
                .map(|(_, _, days)| 1000.0 + 10.0 * f64::from(days))
                .collect())
        }
    }

    struct StaticReviews(Vec<ReviewRecord>);

    impl ReviewSource for StaticReviews {
        fn load(&self) -> Result<Vec<ReviewRecord>, RetrievalError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenReviews;

    impl ReviewSource for BrokenReviews {
        fn load(&self) -> Result<Vec<ReviewRecord>, RetrievalError> {
            Err(RetrievalError::io(
                "review dataset",
                std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            ))
        }
    }

    fn session_with(reviews: Arc<dyn ReviewSource>) -> (DashboardSession, Arc<CountingPredictor>) {
        let predictor = Arc::new(CountingPredictor::default());
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let context = DeskContext::new(predictor.clone(), reviews, catalog);
        (DashboardSession::new(Arc::new(context)), predictor)
    }

    fn session() -> (DashboardSession, Arc<CountingPredictor>) {
        session_with(Arc::new(StaticReviews(Vec::new())))
    }

    #[test]
    fn initial_render_flags_the_default_route() {
        let (mut session, _) = session();
        let view = session.render();

        let warning = view.sidebar.route_warning.expect("Delhi to Delhi is flagged");
        assert_eq!(warning.message, SAME_CITY_SIDEBAR);
        assert!(view.fare.is_none());
        assert_eq!(view.meals.entries.len(), 12);
        assert_eq!(view.meals.total, OrderTotal::NothingSelected);
        assert_eq!(view.meals.total_notice.message, "Select items to view total.");
    }

    #[test]
    fn same_city_prediction_never_reaches_the_artifact() {
        let (mut session, predictor) = session();
        let view = session.apply(DashboardEvent::PredictFare);

        let fare = view.fare.expect("fare section rendered");
        assert_eq!(fare.notice.tone, NoticeTone::Error);
        assert_eq!(fare.notice.message, SAME_CITY_PREDICTION);
        assert!(fare.predicted_price.is_none());
        assert!(fare.trend.is_none());
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn prediction_renders_price_and_trend() {
        let (mut session, predictor) = session();
        session.apply(DashboardEvent::SelectDestination { city: City::Mumbai });
        let view = session.apply(DashboardEvent::PredictFare);

        assert!(view.sidebar.route_warning.is_none());
        let fare = view.fare.expect("fare section rendered");
        assert_eq!(fare.notice.message, "Estimated Flight Price: \u{20b9}1,300.00");
        assert_eq!(fare.predicted_price, Some(1300.0));
        let trend = fare.trend.expect("trend rendered");
        assert_eq!(trend.title, "Predicted Price Trend for Indigo (Economy)");
        assert_eq!(trend.points.len(), 61);
        assert_eq!(trend.points[60].predicted_price, 1600.0);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn action_sections_do_not_persist_across_events() {
        let (mut session, _) = session();
        session.apply(DashboardEvent::SelectOrigin { city: City::Chennai });
        assert!(session.apply(DashboardEvent::PredictFare).fare.is_some());
        assert!(session
            .apply(DashboardEvent::SetIncludeSeasonal { include: true })
            .fare
            .is_none());
    }

    #[test]
    fn out_of_range_days_are_rejected_without_changing_state() {
        let (mut session, _) = session();
        let view = session.apply(DashboardEvent::SetFareDaysLeft { days_left: 61 });
        assert_eq!(view.notices.len(), 1);
        assert_eq!(session.state().fare_days_left, DEFAULT_FARE_DAYS_LEFT);

        let view = session.apply(DashboardEvent::SetRefundDaysLeft { days_left: -1 });
        assert_eq!(view.notices[0].tone, NoticeTone::Error);
        assert_eq!(session.state().refund_days_left, DEFAULT_REFUND_DAYS_LEFT);
    }

    #[test]
    fn refund_check_uses_the_slider_value() {
        let (mut session, _) = session();
        let view = session.apply(DashboardEvent::CheckRefund);
        let refund = view.refund.expect("refund rendered");
        assert_eq!(refund.tier, RefundTier::HalfRefund);
        assert_eq!(refund.notice.message, "You are eligible for a 50% Refund");

        session.apply(DashboardEvent::SetRefundDaysLeft { days_left: 0 });
        let refund = session
            .apply(DashboardEvent::CheckRefund)
            .refund
            .expect("refund rendered");
        assert_eq!(refund.tier, RefundTier::NoRefund);
    }

    #[test]
    fn refund_ignores_same_city_routes() {
        let (mut session, _) = session();
        let view = session.apply(DashboardEvent::CheckRefund);
        assert!(view.sidebar.route_warning.is_some());
        assert_eq!(view.refund.map(|refund| refund.tier), Some(RefundTier::HalfRefund));
    }

    #[test]
    fn reviews_render_summary_empty_and_failure() {
        let reviews = vec![
            ReviewRecord::new("Vistara", "yes"),
            ReviewRecord::new("Vistara", "yes"),
            ReviewRecord::new("Vistara", "yes"),
            ReviewRecord::new("Vistara", "no"),
        ];
        let (mut session, _) = session_with(Arc::new(StaticReviews(reviews)));
        session.apply(DashboardEvent::SelectAirline {
            airline: Airline::Vistara,
        });
        let view = session
            .apply(DashboardEvent::ShowReviews)
            .reviews
            .expect("reviews rendered");
        assert_eq!(view.notice.tone, NoticeTone::Success);
        assert_eq!(
            view.notice.message,
            "75.0% of customers recommend Vistara. Good to go!"
        );
        let chart = view.chart.expect("pie rendered");
        assert_eq!(chart.slices[1].count, 1);

        session.apply(DashboardEvent::SelectAirline {
            airline: Airline::SpiceJet,
        });
        let view = session
            .apply(DashboardEvent::ShowReviews)
            .reviews
            .expect("reviews rendered");
        assert_eq!(view.notice, empty_notice());
        assert!(view.chart.is_none());

        let (mut broken, _) = session_with(Arc::new(BrokenReviews));
        let view = broken
            .apply(DashboardEvent::ShowReviews)
            .reviews
            .expect("reviews rendered");
        assert_eq!(view.notice.tone, NoticeTone::Error);
        assert!(view
            .notice
            .message
            .starts_with("Could not load review data:"));
    }

    #[test]
    fn toggling_meals_updates_the_total() {
        let (mut session, _) = session();
        session.apply(DashboardEvent::ToggleMealItem {
            item: "Veg Puff".to_string(),
        });
        let view = session.apply(DashboardEvent::ToggleMealItem {
            item: "base:Chicken 65".to_string(),
        });
        assert_eq!(view.meals.total, OrderTotal::Total(45 + 95));
        assert_eq!(view.meals.total_notice.message, "Total Meal Cost: \u{20b9}140");
        assert_eq!(
            view.meals
                .entries
                .iter()
                .filter(|entry| entry.selected)
                .count(),
            2
        );

        session.apply(DashboardEvent::ToggleMealItem {
            item: "Veg Puff".to_string(),
        });
        let view = session.apply(DashboardEvent::ToggleMealItem {
            item: "Chicken 65".to_string(),
        });
        assert_eq!(view.meals.total, OrderTotal::NothingSelected);
    }

    #[test]
    fn toggling_an_invisible_item_is_rejected() {
        let (mut session, _) = session();
        let view = session.apply(DashboardEvent::ToggleMealItem {
            item: "Mango Kulfi".to_string(),
        });
        assert_eq!(view.notices[0].message, "'Mango Kulfi' is not on the current menu");
        assert!(session.state().selected_meals.is_empty());
    }

    #[test]
    fn filtering_drops_hidden_selections() {
        let (mut session, _) = session();
        session.apply(DashboardEvent::ToggleMealItem {
            item: "Veg Puff".to_string(),
        });
        session.apply(DashboardEvent::ToggleMealItem {
            item: "Lemon Rice".to_string(),
        });

        let view = session.apply(DashboardEvent::SetMealPreference {
            preference: MealPreference::Veg,
        });
        assert_eq!(view.meals.total, OrderTotal::Total(110));

        let view = session.apply(DashboardEvent::SetMealPreference {
            preference: MealPreference::All,
        });
        assert_eq!(view.meals.total, OrderTotal::Total(110));
        assert_eq!(session.state().selected_meals, vec!["base:Lemon Rice"]);
    }

    #[test]
    fn switching_meal_class_resets_the_order() {
        let (mut session, _) = session();
        session.apply(DashboardEvent::ToggleMealItem {
            item: "Lemon Rice".to_string(),
        });
        let view = session.apply(DashboardEvent::SelectMealClass {
            travel_class: TravelClass::Business,
        });
        assert_eq!(view.meals.entries.len(), 22);
        assert_eq!(view.meals.total, OrderTotal::NothingSelected);
        assert_eq!(
            view.meals.entries[0].label,
            "Vegetable Biryani - \u{20b9}140 (Business)"
        );
    }

    #[test]
    fn airline_without_menu_renders_an_error() {
        let (mut session, _) = session();
        let view = session.apply(DashboardEvent::SelectMealAirline {
            airline: Airline::GoFirst,
        });
        assert!(view.meals.entries.is_empty());
        assert_eq!(
            view.meals.menu_error.map(|notice| notice.message),
            Some("no meal menu is available for GO_FIRST".to_string())
        );
    }

    #[test]
    fn resume_rejects_out_of_range_state() {
        let (session, _) = session();
        let context = session.context.clone();
        let state = DashboardState {
            refund_days_left: 11,
            ..DashboardState::default()
        };
        assert!(matches!(
            DashboardSession::resume(context, state),
            Err(ValidationError::DaysLeftOutOfRange { max: 10, .. })
        ));
    }

    #[test]
    fn events_use_tagged_json() {
        let event: DashboardEvent =
            serde_json::from_str(r#"{"event": "select_origin", "city": "Mumbai"}"#)
                .expect("event parses");
        assert_eq!(event, DashboardEvent::SelectOrigin { city: City::Mumbai });

        let event: DashboardEvent =
            serde_json::from_str(r#"{"event": "predict_fare"}"#).expect("event parses");
        assert_eq!(event, DashboardEvent::PredictFare);
    }
}
