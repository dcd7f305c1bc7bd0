use std::path::PathBuf;

use clap::Parser;

use crate::config::Backend;

#[derive(Parser, Debug)]
#[command(
    name = "rpm-license-updater",
    about = "Update the License column of a package CSV from dnf repository metadata",
    version
)]
pub struct Cli {
    /// Input CSV with `UBI?`, `package` and `License` columns
    #[arg(required_unless_present = "lookup")]
    pub input: Option<PathBuf>,

    /// Write the updated CSV here instead of printing a preview
    #[arg(short, long, visible_alias = "output_csv", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Look up a single package and print its license
    #[arg(long, value_name = "PACKAGE", conflicts_with = "output")]
    pub lookup: Option<String>,

    /// Repository query backend [default: from config, else repoquery]
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Config file [default: ./.rpm-license-updater/config.toml, fallback ~/.config/rpm-license-updater/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format for the console preview
    #[arg(long, default_value = "table", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Log every row as it is processed
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
}
