use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use autometer_gateway::config::{LogFormat, ObservabilityConfig};
use autometer_gateway::observability::init_logging;
use autometer_sdk::{ApiClient, ApiError, ApiResponse, ClientConfig, Environment};

#[derive(Parser)]
#[command(name = "autometer-cli")]
#[command(about = "Command-line access to the autometer backend API", long_about = None)]
struct Cli {
    /// Backend origin used in development.
    #[arg(short, long, default_value = "http://localhost:8080")]
    backend: String,

    /// Origin serving the gateway, used in production.
    #[arg(short, long, default_value = "http://localhost:3000")]
    site: String,

    /// `development` or `production`. Defaults to the build profile.
    #[arg(short, long)]
    env: Option<Environment>,

    /// Request timeout in seconds.
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Log level for request diagnostics.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Driver records
    #[command(subcommand)]
    Drivers(DriverCommand),
    /// Vehicles and assignments
    #[command(subcommand)]
    Vehicles(VehicleCommand),
    /// Fare rate
    #[command(subcommand)]
    Fare(FareCommand),
    /// Autometer ride data
    #[command(subcommand)]
    Rides(RideCommand),
    /// SOS alerts
    #[command(subcommand)]
    Sos(SosCommand),
}

#[derive(Subcommand)]
enum DriverCommand {
    List,
    Get { id: String },
    /// Create a driver from a JSON document
    Create { json: String },
    Update { id: String, json: String },
    Delete { id: String },
    Search(DriverSearch),
    /// Check whether a phone number is still free
    ValidatePhone {
        phone: String,
        #[arg(long)]
        exclude: Option<String>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DriverSearch {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    license: Option<String>,
    #[arg(long)]
    vehicle: Option<String>,
}

#[derive(Subcommand)]
enum VehicleCommand {
    List,
    Get { id: String },
    /// Assign a vehicle (JSON document) to a driver
    Assign { driver_id: String, json: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum FareCommand {
    Get,
    Set { rate: f64 },
}

#[derive(Subcommand)]
enum RideCommand {
    Recent,
    Driver { driver_id: String },
    /// Submit ride data from a JSON document
    Submit { json: String },
}

#[derive(Subcommand)]
enum SosCommand {
    /// Raise an alert from a JSON document
    Send { json: String },
    List {
        #[arg(long)]
        active: bool,
    },
    Ack { id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        log_format: LogFormat::Text,
    })?;

    let config = ClientConfig::new(cli.env.unwrap_or_else(Environment::from_build), cli.backend.as_str())
        .with_site_origin(cli.site.as_str())
        .with_timeout(Duration::from_secs(cli.timeout));
    let api = ApiClient::new(&config)?;

    let result = match cli.command {
        Commands::Drivers(command) => drivers(&api, command).await?,
        Commands::Vehicles(command) => vehicles(&api, command).await?,
        Commands::Fare(command) => fare(&api, command).await?,
        Commands::Rides(command) => rides(&api, command).await?,
        Commands::Sos(command) => sos(&api, command).await?,
    };

    if print_result(result)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

type CallResult = Result<ApiResponse, ApiError>;

async fn drivers(api: &ApiClient, command: DriverCommand) -> Result<CallResult, serde_json::Error> {
    let service = api.drivers();
    Ok(match command {
        DriverCommand::List => service.get_all_drivers().await,
        DriverCommand::Get { id } => service.get_driver_by_id(&id).await,
        DriverCommand::Create { json } => service.create_driver(&parse_json(&json)?).await,
        DriverCommand::Update { id, json } => service.update_driver(&id, &parse_json(&json)?).await,
        DriverCommand::Delete { id } => service.delete_driver(&id).await,
        DriverCommand::Search(search) => match search {
            DriverSearch { name: Some(name), .. } => service.search_drivers_by_name(&name).await,
            DriverSearch { phone: Some(phone), .. } => service.search_drivers_by_phone(&phone).await,
            DriverSearch { license: Some(license), .. } => service.search_drivers_by_license(&license).await,
            DriverSearch { vehicle, .. } => {
                service.search_drivers_by_vehicle(&vehicle.unwrap_or_default()).await
            }
        },
        DriverCommand::ValidatePhone { phone, exclude } => {
            service.validate_phone_number(&phone, exclude.as_deref()).await
        }
    })
}

async fn vehicles(api: &ApiClient, command: VehicleCommand) -> Result<CallResult, serde_json::Error> {
    let service = api.vehicles();
    Ok(match command {
        VehicleCommand::List => service.get_all_vehicles().await,
        VehicleCommand::Get { id } => service.get_vehicle_by_id(&id).await,
        VehicleCommand::Assign { driver_id, json } => {
            service.assign_vehicle_to_driver(&driver_id, &parse_json(&json)?).await
        }
        VehicleCommand::Delete { id } => service.delete_vehicle(&id).await,
    })
}

async fn fare(api: &ApiClient, command: FareCommand) -> Result<CallResult, serde_json::Error> {
    let service = api.fare_rates();
    Ok(match command {
        FareCommand::Get => service.get_current_rate().await,
        FareCommand::Set { rate } => service.update_rate(rate).await,
    })
}

async fn rides(api: &ApiClient, command: RideCommand) -> Result<CallResult, serde_json::Error> {
    let service = api.ride_fares();
    Ok(match command {
        RideCommand::Recent => service.get_recent_rides().await,
        RideCommand::Driver { driver_id } => service.get_rides_by_driver(&driver_id).await,
        RideCommand::Submit { json } => service.submit_ride_data(&parse_json(&json)?).await,
    })
}

async fn sos(api: &ApiClient, command: SosCommand) -> Result<CallResult, serde_json::Error> {
    let service = api.sos();
    Ok(match command {
        SosCommand::Send { json } => service.send_sos_alert(&parse_json(&json)?).await,
        SosCommand::List { active: true } => service.get_active_alerts().await,
        SosCommand::List { active: false } => service.get_all_alerts().await,
        SosCommand::Ack { id } => service.acknowledge_alert(&id).await,
    })
}

fn parse_json(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Print the outcome of a call. Returns whether the call succeeded.
fn print_result(result: CallResult) -> Result<bool, serde_json::Error> {
    match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response.data)?);
            Ok(true)
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e.message());
            if let ApiError::Status { data, .. } = &e {
                eprintln!("Response: {}", serde_json::to_string_pretty(data)?);
            }
            if e.is_connection_refused() {
                eprintln!("Connection refused - is the backend server running?");
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn driver_search_takes_exactly_one_field() {
        assert!(Cli::try_parse_from(["autometer-cli", "drivers", "search", "--phone", "5550100"]).is_ok());
        assert!(Cli::try_parse_from(["autometer-cli", "drivers", "search"]).is_err());
        assert!(
            Cli::try_parse_from(["autometer-cli", "drivers", "search", "--name", "Asha", "--phone", "5550100"])
                .is_err()
        );
    }

    #[test]
    fn environment_flag_is_parsed() {
        let cli = Cli::try_parse_from(["autometer-cli", "--env", "prod", "fare", "get"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Production));
        assert!(Cli::try_parse_from(["autometer-cli", "--env", "staging", "fare", "get"]).is_err());
    }

    #[test]
    fn failed_calls_report_failure() {
        assert!(!print_result(Err(ApiError::InvalidUrl("not a url".into()))).unwrap());
    }
}
