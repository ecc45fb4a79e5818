use crate::demo::{
    run_demo, run_meals, run_predict, run_refund, run_reviews, DemoArgs, MealsArgs, PredictArgs,
    RefundArgs, ReviewsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use flight_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Flight Desk",
    about = "Predict fares, check refunds, read airline reviews, and plan in-flight meals",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate a fare and optionally print the 0-60 day trend
    Predict(PredictArgs),
    /// Check refund eligibility for a cancellation
    Refund(RefundArgs),
    /// Show the customer recommendation rate for an airline
    Reviews(ReviewsArgs),
    /// Browse an in-flight menu and total a meal order
    Meals(MealsArgs),
    /// Walk through a scripted dashboard session
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Refund(args) => run_refund(args),
        Command::Reviews(args) => run_reviews(args),
        Command::Meals(args) => run_meals(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_desk::workflows::domain::{Airline, City, TravelClass};
    use flight_desk::workflows::meals::MealPreference;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["flight-desk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn predict_parses_domain_values() {
        let cli = Cli::try_parse_from([
            "flight-desk-api",
            "predict",
            "--from",
            "delhi",
            "--to",
            "Mumbai",
            "--airline",
            "Air India",
            "--class",
            "business",
            "--days-left",
            "12",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.from, City::Delhi);
                assert_eq!(args.to, City::Mumbai);
                assert_eq!(args.airline, Airline::AirIndia);
                assert_eq!(args.travel_class, TravelClass::Business);
                assert_eq!(args.days_left, 12);
                assert!(!args.trend);
            }
            other => panic!("expected predict, got {other:?}"),
        }
    }

    #[test]
    fn meals_defaults_match_the_dashboard() {
        let cli = Cli::try_parse_from(["flight-desk-api", "meals", "--select", "Veg Puff"])
            .expect("parses");
        match cli.command {
            Some(Command::Meals(args)) => {
                assert_eq!(args.airline, Airline::Indigo);
                assert_eq!(args.travel_class, TravelClass::Economy);
                assert_eq!(args.preference, MealPreference::All);
                assert_eq!(args.select, vec!["Veg Puff".to_string()]);
            }
            other => panic!("expected meals, got {other:?}"),
        }
    }

    #[test]
    fn unknown_airlines_are_rejected() {
        assert!(Cli::try_parse_from(["flight-desk-api", "reviews", "Akasa"]).is_err());
    }
}
