use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use household_emissions::activity::{
    DistanceUnit, ElectricityActivity, EnergyUnit, FlightActivity, FlightLeg,
    FuelCombustionActivity, VehicleActivity,
};
use household_emissions::calculator::EmissionsEngine;
use household_emissions::config::{Config, ConfigOverrides};
use household_emissions::output::csv::{history_to_csv, result_to_csv};
use household_emissions::output::json::render_json;
use household_emissions::output::table::{render_history_table, render_result_table};
use household_emissions::provider;
use household_emissions::records::store::RecordStore;
use household_emissions::records::{EmissionRecord, DEFAULT_HISTORY_LIMIT};
use household_emissions::server::run_server;
use household_emissions::types::{
    CalculationRequest, CalculationResult, DietType, HouseholdProfile, ShoppingFrequency,
};
use household_emissions::validation::validate_request;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "household-emissions",
    about = "Annual household CO2e estimates"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Price everything from local factors without calling the estimate service.
    #[arg(long)]
    offline: bool,
    #[arg(long)]
    db: Option<String>,
    #[arg(long = "provider-url")]
    provider_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
struct ActivityArgs {
    #[arg(long = "household-size")]
    household_size: Option<u32>,
    #[arg(long)]
    diet: Option<DietType>,
    #[arg(long)]
    shopping: Option<ShoppingFrequency>,
    #[arg(long)]
    electricity: Option<f64>,
    #[arg(long = "electricity-unit", default_value = "kwh")]
    electricity_unit: EnergyUnit,
    #[arg(long, default_value = "US")]
    country: String,
    #[arg(long = "vehicle-distance")]
    vehicle_distance: Option<f64>,
    #[arg(long = "distance-unit", default_value = "km")]
    distance_unit: DistanceUnit,
    #[arg(long = "vehicle-model", default_value = "generic")]
    vehicle_model: String,
    #[arg(long = "fuel-type")]
    fuel_type: Option<String>,
    #[arg(long = "fuel-unit", default_value = "btu")]
    fuel_unit: String,
    #[arg(long = "fuel-value")]
    fuel_value: Option<f64>,
    /// Flight leg as FROM-TO airport codes, repeatable.
    #[arg(long = "flight", value_name = "FROM-TO")]
    flights: Vec<String>,
    #[arg(long, default_value_t = 1)]
    passengers: u32,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Calculate {
        /// JSON request file, or `-` for stdin. Overrides the activity flags.
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        no_save: bool,
        #[command(flatten)]
        activities: ActivityArgs,
    },
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
    Show {
        id: i64,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        offline: cli.offline,
        db_path: cli.db.clone(),
        provider_url: cli.provider_url.clone(),
    });

    match &cli.command {
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            let engine = build_engine(&config)?;
            run_server(engine, config.resolved_db_path(), addr).await
        }
        Commands::Calculate {
            input,
            no_save,
            activities,
        } => {
            let request = match input {
                Some(path) => read_request(path)?,
                None => request_from_args(activities)?,
            };
            validate_request(&request)?;
            let engine = build_engine(&config)?;
            let result = engine.calculate(&request).await;
            print_result(&result, cli.output)?;
            if !*no_save {
                let store = RecordStore::open(&config.resolved_db_path())?;
                let record = store.insert(&request, &result)?;
                info!("saved as record {}", record.id);
            }
            Ok(())
        }
        Commands::History { limit } => {
            let store = RecordStore::open(&config.resolved_db_path())?;
            let records = store.latest((*limit).max(1))?;
            print_history(&records, cli.output)
        }
        Commands::Show { id } => {
            let store = RecordStore::open(&config.resolved_db_path())?;
            let Some(record) = store.get(*id)? else {
                bail!("record {id} not found");
            };
            match cli.output {
                OutputFormat::Json => println!("{}", render_json(&record)?),
                OutputFormat::Table => {
                    println!("{}", render_history_table(std::slice::from_ref(&record)));
                    println!("{}", render_result_table(&record_result(&record)));
                }
                OutputFormat::Csv => println!("{}", result_to_csv(&record_result(&record))?),
            }
            Ok(())
        }
    }
}

fn build_engine(config: &Config) -> Result<EmissionsEngine> {
    let provider = provider::from_config(&config.provider)?;
    Ok(EmissionsEngine::new(provider, config.factors.clone()))
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<CalculationRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed reading request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed reading request: {}", path.display()))?
    };
    serde_json::from_str(&raw).context("failed parsing calculation request JSON")
}

fn request_from_args(args: &ActivityArgs) -> Result<CalculationRequest> {
    let household_size = args
        .household_size
        .ok_or_else(|| anyhow!("--household-size is required without --input"))?;
    let diet_type = args
        .diet
        .ok_or_else(|| anyhow!("--diet is required without --input"))?;
    let shopping_frequency = args
        .shopping
        .ok_or_else(|| anyhow!("--shopping is required without --input"))?;

    let mut request = CalculationRequest::new(HouseholdProfile {
        household_size,
        diet_type,
        shopping_frequency,
    });
    if let Some(value) = args.electricity {
        request = request.with_electricity(ElectricityActivity {
            electricity_unit: args.electricity_unit,
            electricity_value: value,
            country: args.country.trim().to_ascii_uppercase(),
            state: None,
        });
    }
    if let Some(distance) = args.vehicle_distance {
        request = request.with_vehicle(VehicleActivity {
            distance_unit: args.distance_unit,
            distance_value: distance,
            vehicle_model_id: args.vehicle_model.clone(),
        });
    }
    match (&args.fuel_type, args.fuel_value) {
        (Some(fuel_type), Some(value)) => {
            request = request.with_fuel_combustion(FuelCombustionActivity {
                fuel_source_type: fuel_type.clone(),
                fuel_source_unit: args.fuel_unit.clone(),
                fuel_source_value: value,
            });
        }
        (None, None) => {}
        _ => bail!("--fuel-type and --fuel-value must be given together"),
    }
    if !args.flights.is_empty() {
        let legs = args
            .flights
            .iter()
            .map(String::as_str)
            .map(parse_leg)
            .collect::<Result<Vec<_>>>()?;
        request = request.with_flights(FlightActivity {
            passengers: args.passengers,
            legs,
            distance_unit: None,
        });
    }
    Ok(request)
}

fn parse_leg(raw: &str) -> Result<FlightLeg> {
    let (from, to) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("flight leg must look like FROM-TO, got {raw}"))?;
    Ok(FlightLeg {
        departure_airport: from.trim().to_ascii_uppercase(),
        destination_airport: to.trim().to_ascii_uppercase(),
        cabin_class: None,
    })
}

fn record_result(record: &EmissionRecord) -> CalculationResult {
    CalculationResult {
        total_emissions_kg: record.total_emissions_kg,
        breakdown: record.breakdown,
    }
}

fn print_result(result: &CalculationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_result_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", result_to_csv(result)?),
    }
    Ok(())
}

fn print_history(records: &[EmissionRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_history_table(records)),
        OutputFormat::Json => println!("{}", render_json(records)?),
        OutputFormat::Csv => println!("{}", history_to_csv(records)?),
    }
    Ok(())
}
