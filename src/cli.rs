use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use plotsight::analyser::logic::classify::is_numeric_dtype;
use plotsight::analyser::logic::{self, AnalysisRequest, AnalysisResult, ArtifactMap};
use plotsight::config::{
    AnalysisConfig, get_config_path, load_app_config, load_config_from, save_app_config,
};
use plotsight::utils::{sanitize_file_stem, standard_paths};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "plotsight", about = "Charts and automatic insights for tabular data")]
pub struct Cli {
    /// Log to the console only, without the rolling log files
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the columns of a file and how they would be classified
    Columns {
        /// Path to the dataset (CSV, Parquet, JSON)
        file: PathBuf,
    },
    /// Render charts and discover insights for a column selection
    Analyze {
        /// Path to the dataset (CSV, Parquet, JSON)
        file: PathBuf,

        /// Columns to chart, comma separated. Defaults to every column.
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Requested plot kinds: heatmap, pairplot, distribution, count
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "heatmap,pairplot,distribution,count"
        )]
        plots: Vec<String>,

        /// Palette: dark or light. Anything else falls back to dark.
        #[arg(short, long)]
        theme: Option<String>,

        /// Directory the PNG files are written to
        #[arg(short, long, default_value = "plotsight-out")]
        out: PathBuf,

        /// Print the result payload as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Path to a JSON analysis config. Defaults to the user config.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the effective analysis config and where it lives
    Config {
        /// Write the default config to the user config path
        #[arg(long)]
        init: bool,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Columns { file } => handle_columns(&file),
        Commands::Analyze {
            file,
            columns,
            plots,
            theme,
            out,
            json,
            config,
        } => {
            let config = match config {
                Some(path) => load_config_from(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => load_app_config(),
            };
            handle_analyze(&file, columns, &plots, theme.as_deref(), &out, json, &config)
        }
        Commands::Config { init } => handle_config(init),
    }
}

fn handle_config(init: bool) -> Result<()> {
    let path = get_config_path();
    if init {
        save_app_config(&AnalysisConfig::default())?;
        println!("Wrote default config to {}", path.display());
    }
    let config = load_app_config();
    println!("Config path: {}", path.display());
    println!("Log directory: {}", standard_paths().logs_dir.display());
    println!("Clustering available: {}", config.clustering_available());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn handle_columns(file: &Path) -> Result<()> {
    let df = logic::load_df(file).context("Failed to load dataset")?;
    println!("{} rows, {} columns", df.height(), df.width());
    for column in df.get_columns() {
        let kind = if is_numeric_dtype(column.dtype()) {
            "numeric"
        } else {
            "categorical"
        };
        println!("  {:<30} {:<12} ({})", column.name(), kind, column.dtype());
    }
    Ok(())
}

fn handle_analyze(
    file: &Path,
    columns: Vec<String>,
    plots: &[String],
    theme: Option<&str>,
    out: &Path,
    json: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    let df = logic::load_df(file).context("Failed to load dataset")?;
    let columns = if columns.is_empty() {
        df.get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    } else {
        columns
    };

    let plot_tokens: Vec<&str> = plots.iter().map(String::as_str).collect();
    let request = AnalysisRequest::from_tokens(columns, &plot_tokens, theme);
    let result = logic::run_analysis(&df, &request, config)?;

    write_artifacts(&out.join("requested"), &result.requested_artifacts)?;
    write_artifacts(&out.join("auxiliary"), &result.auxiliary_artifacts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.to_payload())?);
    } else {
        print_summary(&request, &result, out);
    }
    Ok(())
}

fn write_artifacts(dir: &Path, artifacts: &ArtifactMap) -> Result<()> {
    if artifacts.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut used = HashSet::new();
    for (key, artifact) in artifacts {
        let path = dir.join(format!("{}.png", unique_stem(&mut used, key)));
        std::fs::write(&path, &artifact.png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Sanitized stem for `key`, suffixed `_2`, `_3`, ... when an earlier key
/// already sanitized to the same name.
fn unique_stem(used: &mut HashSet<String>, key: &str) -> String {
    let base = sanitize_file_stem(key);
    let mut stem = base.clone();
    let mut n = 2;
    while !used.insert(stem.clone()) {
        stem = format!("{base}_{n}");
        n += 1;
    }
    stem
}

fn print_summary(request: &AnalysisRequest, result: &AnalysisResult, out: &Path) {
    let kinds: Vec<&str> = request.plot_kinds.iter().map(|k| k.as_str()).collect();
    println!("Theme: {}, requested plots: {}", request.theme, kinds.join(", "));
    println!(
        "Wrote {} requested and {} auxiliary charts to {}",
        result.requested_artifacts.len(),
        result.auxiliary_artifacts.len(),
        out.display()
    );
    println!("  {}", result.artifact_keys().join(", "));

    if result.insights.is_empty() {
        println!("No insights found.");
        return;
    }
    println!("Insights:");
    for insight in &result.insights {
        match &insight.support {
            Some(key) => println!("  - {} [{key}]", insight.text),
            None => println!("  - {}", insight.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_plots_are_comma_separated() -> Result<()> {
        let cli = Cli::try_parse_from([
            "plotsight",
            "analyze",
            "data.csv",
            "--columns",
            "a,b",
            "--plots",
            "heatmap,count",
        ])?;
        let Commands::Analyze { columns, plots, .. } = cli.command else {
            anyhow::bail!("expected the analyze command");
        };
        assert_eq!(columns, vec!["a", "b"]);
        assert_eq!(plots, vec!["heatmap", "count"]);
        Ok(())
    }

    #[test]
    fn test_analyze_writes_pngs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let data = dir.path().join("data.csv");
        std::fs::write(&data, "a,b,label\n1,2,x\n2,4.1,y\n3,5.9,x\n4,8.2,z\n")?;
        let out = dir.path().join("out");

        handle_analyze(
            &data,
            vec!["a".to_owned(), "label".to_owned()],
            &["distribution".to_owned()],
            Some("light"),
            &out,
            false,
            &AnalysisConfig::default().without_clustering(),
        )?;

        assert!(out.join("requested").join("plot_a.png").exists());
        assert!(out.join("auxiliary").join("plot_label.png").exists());
        Ok(())
    }

    #[test]
    fn test_colliding_keys_get_distinct_files() -> Result<()> {
        use plotsight::analyser::logic::{ArtifactKey, VisualArtifact};
        use plotsight::theme::ThemeSelector;

        let dir = tempfile::tempdir()?;
        let mut artifacts = ArtifactMap::new();
        for column in ["a b", "a_b", "a/b"] {
            let key = ArtifactKey::Column(column.to_owned());
            artifacts.insert(
                key.to_string(),
                VisualArtifact::new(key, column.as_bytes().to_vec(), ThemeSelector::default()),
            );
        }

        write_artifacts(dir.path(), &artifacts)?;

        let mut names: Vec<String> = std::fs::read_dir(dir.path())?
            .map(|entry| -> Result<String> {
                Ok(entry?.file_name().to_string_lossy().into_owned())
            })
            .collect::<Result<_>>()?;
        names.sort();
        assert_eq!(names, vec!["plot_a_b.png", "plot_a_b_2.png", "plot_a_b_3.png"]);
        let first = std::fs::read(dir.path().join("plot_a_b.png"))?;
        assert_eq!(first, b"a b");
        Ok(())
    }
}
