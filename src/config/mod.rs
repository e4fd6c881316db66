pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::domain::model::PeriodType;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "shoseki-ranking")]
    #[command(about = "Scrape Shoseki manga rankings and estimate sales")]
    pub struct CliConfig {
        /// Limit the number of rankings to scrape
        #[arg(long, default_value = "500")]
        pub limit: u32,

        /// Use monthly rankings instead of weekly
        #[arg(long)]
        pub monthly: bool,

        /// Output file; defaults to shoseki_<period>_ranking.json
        #[arg(short, long)]
        pub output: Option<String>,

        /// Path to TOML settings file
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        pub fn period(&self) -> PeriodType {
            PeriodType::from_monthly_flag(self.monthly)
        }

        pub fn output_file(&self) -> String {
            self.output
                .clone()
                .unwrap_or_else(|| self.period().default_output_file().to_string())
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_positive_number("limit", self.limit as usize, 1)?;
            validation::validate_path("output", &self.output_file())?;
            if let Some(config) = &self.config {
                validation::validate_path("config", config)?;
            }
            Ok(())
        }
    }

}
