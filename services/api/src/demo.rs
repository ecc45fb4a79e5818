use crate::infra::{load_desk, parse_departure};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use flight_desk::context::DeskContext;
use flight_desk::error::AppError;
use flight_desk::workflows::dashboard::{
    DashboardEvent, DashboardSession, DashboardView, MealView, ReviewView,
};
use flight_desk::workflows::domain::{format_rupees, Airline, City, Notice, Route, TravelClass};
use flight_desk::workflows::fares::{predict_fare, sample_trend, trend_title, FareQuery};
use flight_desk::workflows::meals::{
    compose_menu, filter_menu, find_item, MealOrder, MealPreference,
};
use flight_desk::workflows::refunds::RefundRecord;
use flight_desk::workflows::reviews::recommendation_for;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Departure city
    #[arg(long)]
    pub(crate) from: City,
    /// Arrival city
    #[arg(long)]
    pub(crate) to: City,
    #[arg(long, default_value = "Indigo")]
    pub(crate) airline: Airline,
    #[arg(long = "class", default_value = "Economy")]
    pub(crate) travel_class: TravelClass,
    /// Days left until departure (0-60)
    #[arg(long, default_value_t = 30)]
    pub(crate) days_left: i64,
    /// Also print the predicted fare for every day from 0 to 60
    #[arg(long)]
    pub(crate) trend: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RefundArgs {
    /// Days left before departure
    #[arg(long, conflicts_with_all = ["hours_left", "departure"])]
    pub(crate) days_left: Option<f64>,
    /// Hours left before departure
    #[arg(long, conflicts_with = "departure")]
    pub(crate) hours_left: Option<f64>,
    /// Scheduled departure (YYYY-MM-DD HH:MM)
    #[arg(long, value_parser = parse_departure)]
    pub(crate) departure: Option<NaiveDateTime>,
    /// Reference time for --departure (defaults to now)
    #[arg(long, value_parser = parse_departure, requires = "departure")]
    pub(crate) now: Option<NaiveDateTime>,
    /// Print the tier breakdown of the refund dataset
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewsArgs {
    pub(crate) airline: Airline,
}

#[derive(Args, Debug)]
pub(crate) struct MealsArgs {
    #[arg(long, default_value = "Indigo")]
    pub(crate) airline: Airline,
    #[arg(long = "class", default_value = "Economy")]
    pub(crate) travel_class: TravelClass,
    /// All, Veg, Non-Veg, or Snacks Only
    #[arg(long, default_value = "All")]
    pub(crate) preference: MealPreference,
    /// Include the seasonal menu
    #[arg(long)]
    pub(crate) seasonal: bool,
    /// Item name or menu key to add to the order (repeatable)
    #[arg(long)]
    pub(crate) select: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    #[arg(long, default_value = "Mumbai")]
    pub(crate) to: City,
    #[arg(long, default_value = "Vistara")]
    pub(crate) airline: Airline,
    /// Skip the meal ordering part of the walkthrough
    #[arg(long)]
    pub(crate) skip_meals: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let route = Route::new(args.from, args.to)?;
    let query = FareQuery::new(args.airline, args.travel_class, args.days_left)?;
    let desk = load_desk()?;

    let price = predict_fare(desk.fare_model(), &query)?;
    println!(
        "{} -> {} | {} {} | {} days left",
        route.origin(),
        route.destination(),
        query.airline(),
        query.travel_class(),
        query.days_left()
    );
    println!("Estimated Flight Price: {}", format_rupees(price));

    if args.trend {
        let points = sample_trend(desk.fare_model(), query.airline(), query.travel_class())?;
        println!("\n{}", trend_title(query.airline(), query.travel_class()));
        for point in points {
            println!(
                "  {:>2} days | {}",
                point.days_left,
                format_rupees(point.predicted_price)
            );
        }
    }

    Ok(())
}

pub(crate) fn run_refund(args: RefundArgs) -> Result<(), AppError> {
    let desk = load_desk()?;
    let policy = desk.refund_policy();

    let (days_left, tier) = match (args.departure, args.hours_left, args.days_left) {
        (Some(departure), _, _) => {
            let now = args.now.unwrap_or_else(|| Local::now().naive_local());
            let record = RefundRecord::from_departure(departure, now, policy);
            (record.days_left, record.tier)
        }
        (None, Some(hours), _) => {
            let record = RefundRecord::from_hours(hours, policy);
            (record.days_left, record.tier)
        }
        (None, None, days) => {
            let days = days.unwrap_or(3.0);
            (days, policy.evaluate(days))
        }
    };

    println!("Days left before departure: {days_left:.2}");
    print_notice(&tier.notice());

    if args.breakdown {
        let ledger = desk.refund_ledger();
        println!("\nRefund dataset ({} bookings)", ledger.records().len());
        for entry in ledger.breakdown() {
            println!("  - {}: {}", entry.tier_label, entry.count);
        }
    }

    Ok(())
}

pub(crate) fn run_reviews(args: ReviewsArgs) -> Result<(), AppError> {
    let desk = load_desk()?;
    let summary = recommendation_for(desk.reviews(), args.airline.label())?;
    print_reviews(&ReviewView::from_summary(args.airline, summary));
    Ok(())
}

pub(crate) fn run_meals(args: MealsArgs) -> Result<(), AppError> {
    let desk = load_desk()?;
    let composed = compose_menu(
        desk.meal_catalog(),
        args.airline,
        args.travel_class,
        args.seasonal,
    )?;
    let visible = filter_menu(&composed, args.preference);

    let mut order = MealOrder::new();
    for selector in &args.select {
        order.toggle(find_item(&visible, selector)?);
    }

    println!(
        "{} menu ({}, {})",
        args.airline, args.travel_class, args.preference
    );
    for item in &visible {
        let mark = if order.contains(item) { "x" } else { " " };
        println!("  [{mark}] {}", item.label(args.travel_class));
    }
    print_notice(&order.total().notice());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let desk = load_desk()?;
    println!("Flight desk demo");
    let report = demo_session(desk, &args);
    for (step, view) in report {
        println!("\n> {step}");
        print_view(&view);
    }
    Ok(())
}

fn demo_session(desk: Arc<DeskContext>, args: &DemoArgs) -> Vec<(String, DashboardView)> {
    let mut session = DashboardSession::new(desk);
    let mut steps = vec![("Open dashboard".to_string(), session.render())];

    let mut events = vec![
        DashboardEvent::PredictFare,
        DashboardEvent::SelectDestination { city: args.to },
        DashboardEvent::SelectAirline {
            airline: args.airline,
        },
        DashboardEvent::PredictFare,
        DashboardEvent::CheckRefund,
        DashboardEvent::ShowReviews,
    ];
    if !args.skip_meals {
        events.extend([
            DashboardEvent::SetIncludeSeasonal { include: true },
            DashboardEvent::ToggleMealItem {
                item: "Lemon Rice".to_string(),
            },
            DashboardEvent::ToggleMealItem {
                item: "Mango Kulfi".to_string(),
            },
        ]);
    }

    for event in events {
        let label = format!("{event:?}");
        steps.push((label, session.apply(event)));
    }
    steps
}

fn print_view(view: &DashboardView) {
    if let Some(warning) = &view.sidebar.route_warning {
        print_notice(warning);
    }
    for notice in &view.notices {
        print_notice(notice);
    }
    if let Some(fare) = &view.fare {
        print_notice(&fare.notice);
        if let Some(trend) = &fare.trend {
            let cheapest = trend
                .points
                .iter()
                .min_by(|a, b| a.predicted_price.total_cmp(&b.predicted_price));
            if let Some(point) = cheapest {
                println!(
                    "  {}: cheapest at {} days left ({})",
                    trend.title,
                    point.days_left,
                    format_rupees(point.predicted_price)
                );
            }
        }
        if let Some(notice) = &fare.trend_error {
            print_notice(notice);
        }
    }
    if let Some(refund) = &view.refund {
        println!("  Refund check at {} days left", refund.days_left);
        print_notice(&refund.notice);
    }
    if let Some(reviews) = &view.reviews {
        print_reviews(reviews);
    }
    print_meals(&view.meals);
}

fn print_reviews(view: &ReviewView) {
    print_notice(&view.notice);
    if let Some(chart) = &view.chart {
        println!("  {}", chart.title);
        for slice in &chart.slices {
            println!("    - {}: {} ({:.1}%)", slice.label, slice.count, slice.percent);
        }
    }
}

fn print_meals(view: &MealView) {
    if let Some(error) = &view.menu_error {
        print_notice(error);
        return;
    }
    let selected: Vec<&str> = view
        .entries
        .iter()
        .filter(|entry| entry.selected)
        .map(|entry| entry.label.as_str())
        .collect();
    println!(
        "  Meals: {} items on the {} {} menu, {} selected",
        view.entries.len(),
        view.airline,
        view.travel_class,
        selected.len()
    );
    for label in selected {
        println!("    [x] {label}");
    }
    print_notice(&view.total_notice);
}

fn print_notice(notice: &Notice) {
    println!("  [{}] {}", notice.tone.label(), notice.message);
}
