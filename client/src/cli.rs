use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plantx")]
#[command(about = "Plant'X API client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML config file (overrides PLANTX_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    General,
    Threatened,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search plants; `#12 14` or `t#3` look plants up by id
    Plants {
        /// Search text
        query: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "12")]
        page_size: u32,

        /// Only edible plants (yes/no)
        #[arg(long)]
        edible: Option<String>,

        /// Only threatened plants (yes/no)
        #[arg(long)]
        threatened: Option<String>,

        /// Sun exposure, may be repeated
        #[arg(long)]
        sun: Vec<String>,
    },

    /// Show one plant
    Plant {
        id: i64,

        #[arg(short, long, value_enum, default_value = "general")]
        kind: Kind,
    },

    /// Search diseases
    Diseases {
        query: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "8")]
        page_size: u32,
    },

    /// Show one disease
    Disease { id: i64 },

    /// Upload a plant photo and list candidate plants
    Identify {
        image: PathBuf,

        #[arg(short = 'n', long, default_value = "8")]
        count: u32,
    },

    /// Upload a leaf photo and list matching diseases
    Diagnose {
        image: PathBuf,

        #[arg(short = 'n', long, default_value = "8")]
        count: u32,
    },

    /// Plants recommended for a location
    Recommend {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Threatened Plant Index per state for a year
    ClimateMap {
        #[arg(default_value = "2022")]
        year: i32,
    },

    /// Threatened Plant Index history of one state
    ClimateState { state: String },

    /// Trees near a location
    Trees {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Radius in metres
        #[arg(short, long, default_value = "100")]
        radius: f64,

        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one tree
    Tree { com_id: String },
}
