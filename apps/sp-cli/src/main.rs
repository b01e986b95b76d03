use clap::{Parser, Subcommand};
use sp_app::{AppError, AppResult, Pipeline, PipelineConfig, dispatch_json};
use sp_core::constants;
use sp_field::{Template, TemplateLayout};
use sp_model::{FlightCondition, ModelVariant};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(about = "Surface pressure prediction from flight conditions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a surface pressure field and write it into the template
    Predict {
        /// Path to the pipeline YAML file
        config: PathBuf,
        /// Model variant: multi-fidelity or single-fidelity
        #[arg(long, default_value = "multi-fidelity")]
        variant: String,
        /// Mach number
        #[arg(long)]
        mach: f64,
        /// Angle of attack in degrees
        #[arg(long, allow_hyphen_values = true)]
        alpha: f64,
        /// Sideslip angle in degrees
        #[arg(long, allow_hyphen_values = true)]
        beta: f64,
        /// Print the predicted pressure coefficients to stdout
        #[arg(long)]
        print_field: bool,
    },
    /// Serve JSON compute requests, one per line on stdin
    Serve {
        /// Path to the pipeline YAML file
        config: PathBuf,
    },
    /// Load every artifact and validate the template
    Check {
        /// Path to the pipeline YAML file
        config: PathBuf,
    },
    /// Parse a template file and report its layout
    InspectTemplate {
        /// Path to the template data file
        template: PathBuf,
        /// Lines before the data block
        #[arg(long, default_value_t = sp_field::layout::DEFAULT_HEADER_LINES)]
        header_lines: usize,
        /// Rows in the data block
        #[arg(long, default_value_t = sp_field::layout::DEFAULT_DATA_ROWS)]
        data_rows: usize,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            config,
            variant,
            mach,
            alpha,
            beta,
            print_field,
        } => cmd_predict(&config, &variant, mach, alpha, beta, print_field),
        Commands::Serve { config } => cmd_serve(&config),
        Commands::Check { config } => cmd_check(&config),
        Commands::InspectTemplate {
            template,
            header_lines,
            data_rows,
        } => cmd_inspect_template(&template, header_lines, data_rows),
    }
}

fn cmd_predict(
    config: &Path,
    variant: &str,
    mach: f64,
    alpha: f64,
    beta: f64,
    print_field: bool,
) -> AppResult<()> {
    let variant = ModelVariant::parse(variant)?;
    let pipeline = Pipeline::load(config)?;
    let prediction = pipeline.predict_and_write(variant, FlightCondition::new(mach, alpha, beta))?;

    if print_field {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for v in prediction.pressure_field.values() {
            writeln!(out, "{v:?}")?;
        }
    }

    if let Some((lo, hi)) = prediction.pressure_field.range() {
        let q_inf = constants::dynamic_pressure_pa();
        println!(
            "✓ {} prediction: {} points, pressure range {:.1} .. {:.1} Pa",
            variant,
            prediction.pressure_field.len(),
            lo * q_inf,
            hi * q_inf
        );
    }
    println!("✓ Wrote {}", prediction.output_path.display());
    Ok(())
}

fn cmd_serve(config: &Path) -> AppResult<()> {
    let pipeline = Pipeline::load(config)?;
    tracing::info!("ready for compute requests on stdin");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch_json(&pipeline, &line);
        let json = serde_json::to_string(&response)
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        writeln!(out, "{json}")?;
        out.flush()?;
    }
    Ok(())
}

fn cmd_check(config: &Path) -> AppResult<()> {
    println!("Checking pipeline: {}", config.display());
    let cfg = PipelineConfig::load(config)?;
    let pipeline = Pipeline::from_config(&cfg)?;
    let predictor = pipeline.predictor();

    println!("  field size:     {} points", pipeline.field_dim());
    println!("  domain policy:  {:?}", predictor.policy());
    for variant in ModelVariant::ALL {
        let model = predictor.model(variant);
        let output = if model.decoder().is_latent() {
            "latent (POD)"
        } else {
            "full field"
        };
        println!(
            "  {:<16} {} [{}] -> {}",
            variant.as_str(),
            model.name(),
            output,
            pipeline.output_path(variant).display()
        );
    }
    println!(
        "  template:       {} ({} header lines, {} data rows)",
        cfg.template.path.display(),
        cfg.template.layout.header_lines,
        cfg.template.layout.data_rows
    );
    println!(
        "  q_inf:          {:.3} Pa",
        constants::dynamic_pressure_pa()
    );
    println!("✓ Pipeline is valid");
    Ok(())
}

fn cmd_inspect_template(path: &Path, header_lines: usize, data_rows: usize) -> AppResult<()> {
    let layout = TemplateLayout::with_sizes(header_lines, data_rows);
    let template = Template::load(path, &layout)?;

    println!("Template: {}", path.display());
    println!("  sha256:        {}", template.sha256());
    println!("  header lines:  {}", template.header().lines().count());
    println!("  data rows:     {}", template.row_count());
    println!("  footer lines:  {}", template.footer().lines().count());
    if let Some(pressure) = template.column(&layout.pressure_column)
        && let Some((lo, hi)) = sp_core::min_max(&pressure)
    {
        println!("  {} range: {lo} .. {hi}", layout.pressure_column);
    }
    Ok(())
}
