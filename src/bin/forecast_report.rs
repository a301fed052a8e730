use std::sync::Arc;

use health_forecast_lib::core::session::UploadedData;
use health_forecast_lib::fetcher::service::HttpForecastService;
use health_forecast_lib::{
    DiseaseSelection, GenerateParams, Orchestrator, Registry, ServiceConfig, SessionSeed,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: forecast_report <dataset file> <barangay> [horizon months] [disease_column ...]";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let horizon = match args.get(2).map(|h| h.parse::<u32>()) {
        Some(Ok(h)) => h,
        Some(Err(_)) => {
            eprintln!("Horizon must be a whole number of months.\n{}", USAGE);
            std::process::exit(2);
        }
        None => 3,
    };
    let diseases: Vec<String> = args.iter().skip(3).cloned().collect();

    let config = match ServiceConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let seed = SessionSeed {
        uploaded_data: Some(UploadedData {
            locality: Some(args[1].clone()),
            file_name: Some(args[0].clone()),
        }),
        disease_columns: diseases.clone(),
    };

    let service = Arc::new(HttpForecastService::new(&config));
    let orchestrator = Orchestrator::new(service, seed).with_max_horizon(config.max_horizon_months);

    println!("Requesting {}-month forecast for {} from {}", horizon, args[1], config.forecast_url());

    let generation = match orchestrator.generate(GenerateParams { diseases, horizon_months: horizon }).await {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Forecast failed: {}", e);
            std::process::exit(1);
        }
    };

    let Some(view) = orchestrator.current_view(&DiseaseSelection::All) else {
        eprintln!("Forecast returned no data.");
        std::process::exit(1);
    };

    println!("\n{:<10} | {:>10} | {:>10}", "Period", "Actual", "Predicted");
    println!("{}", "-".repeat(36));
    for point in &view.chart {
        let fmt = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        println!("{:<10} | {:>10} | {:>10}", point.period, fmt(point.actual), fmt(point.predicted));
    }

    if let Some(summary) = &view.summary {
        println!("\n{}", summary.disease_label);
        println!("  Next period:  {}", summary.next_period_value);
        println!("  Trend:        {} ({})", summary.trend_direction.as_str(), summary.trend_percent);
        println!("  Confidence:   {}%", summary.confidence);
    }
    println!(
        "  History:      total {} / avg {} / peak {}",
        view.history.total, view.history.average, view.history.peak
    );

    println!("\nPer disease:");
    for disease in orchestrator.available_diseases() {
        if let Some(view) = orchestrator.current_view(&DiseaseSelection::Disease(disease.clone())) {
            if let Some(s) = view.summary {
                println!("  {:<28} next {:>6}  {:<10} {:>9}", Registry::label(&disease), s.next_period_value, s.trend_direction.as_str(), s.trend_percent);
            }
        }
    }

    println!("\nInsights:");
    for insight in &generation.insights {
        println!("  [{:?}] {}", insight.severity, insight.text);
    }

    let stats = orchestrator.ledger_stats();
    println!(
        "\nRecorded {} history entries (avg confidence {}%, {} increasing, {} decreasing).",
        stats.total, stats.average_confidence, stats.increasing, stats.decreasing
    );
}
