mod cli;

use clap::Parser;
use serde::Serialize;
use shared::{PlantFilters, PlantSearchParams, TreeSearchParams};

use cli::{Cli, Commands, Kind};
use plantx_client::plant::normalize::yn_to_bool;
use plantx_client::storage::ImageFile;
use plantx_client::{ApiConfig, ApiError, PlantX};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] plantx_client::ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ApiConfig::from_yaml_file(path)?.apply_env(|key| std::env::var(key).ok())?,
        None => ApiConfig::load()?,
    };
    let plantx = PlantX::new(config)?;

    match cli.command {
        Commands::Plants {
            query,
            page,
            page_size,
            edible,
            threatened,
            sun,
        } => {
            let params = PlantSearchParams {
                search: query,
                page,
                page_size,
                filters: PlantFilters {
                    edible: edible.as_deref().and_then(yn_to_bool),
                    threatened: threatened.as_deref().and_then(yn_to_bool),
                    sun,
                    ..PlantFilters::default()
                },
            };
            print_json(&plantx.plants.search(&params).await?)?;
        }
        Commands::Plant { id, kind } => {
            let detail = match kind {
                Kind::General => plantx.plants.get_by_id(id).await?,
                Kind::Threatened => plantx.plants.get_threatened_by_id(id).await?,
            };
            print_json(&detail)?;
        }
        Commands::Diseases {
            query,
            page,
            page_size,
        } => {
            let q = query.unwrap_or_default();
            print_json(&plantx.diseases.search(&q, page, page_size).await?)?;
        }
        Commands::Disease { id } => {
            print_json(&plantx.diseases.get_by_id(id).await?)?;
        }
        Commands::Identify { image, count } => {
            let file = ImageFile::from_path(&image).map_err(ApiError::from)?;
            print_json(&plantx.uploads.identify_plant(&file, count).await?)?;
        }
        Commands::Diagnose { image, count } => {
            let file = ImageFile::from_path(&image).map_err(ApiError::from)?;
            print_json(&plantx.uploads.identify_disease(&file, count).await?)?;
        }
        Commands::Recommend { lat, lon } => {
            let recommendation = plantx.recommendations.get_recommendations(lat, lon).await?;
            let cards = plantx
                .recommendations
                .recommended_cards(&recommendation)
                .await;
            print_json(&cards)?;
        }
        Commands::ClimateMap { year } => {
            print_json(&plantx.climate.year_map_data(year).await?)?;
        }
        Commands::ClimateState { state } => {
            print_json(&plantx.climate.state_timeseries(&state).await?)?;
        }
        Commands::Trees {
            lat,
            lon,
            radius,
            search,
        } => {
            let params = TreeSearchParams {
                lat,
                lon,
                radius,
                search,
            };
            print_json(&plantx.trees.search(&params).await?)?;
        }
        Commands::Tree { com_id } => {
            print_json(&plantx.trees.get_by_id(&com_id).await?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = run(Cli::parse()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
