//! Xray report converter command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use xray_report::cli::{convert, output};
use xray_report::config::{
    DEFAULT_CSV_INPUT, DEFAULT_CSV_OUTPUT, DEFAULT_CSV_SUITE_NAME, DEFAULT_NEWMAN_INPUT,
    DEFAULT_NEWMAN_OUTPUT,
};
use xray_report::{ConvertConfig, TransformOptions};

/// Xray report converter
#[derive(Parser)]
#[command(name = "xray-report")]
#[command(author, version, about = "Convert test reports into Xray-compatible JUnit XML", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV run report
    Csv {
        /// CSV report to read
        #[arg(short, long, default_value = DEFAULT_CSV_INPUT)]
        input: PathBuf,

        /// XML report to write
        #[arg(short, long, default_value = DEFAULT_CSV_OUTPUT)]
        output: PathBuf,

        /// Name of the emitted test suite
        #[arg(long, default_value = DEFAULT_CSV_SUITE_NAME)]
        suite_name: String,

        #[command(flatten)]
        layout: Layout,
    },

    /// Normalize a Newman JUnit report
    Newman {
        /// Newman report to read
        #[arg(short, long, default_value = DEFAULT_NEWMAN_INPUT)]
        input: PathBuf,

        /// XML report to write
        #[arg(short, long, default_value = DEFAULT_NEWMAN_OUTPUT)]
        output: PathBuf,

        /// Do not copy the root name into a root classname attribute
        #[arg(long)]
        no_root_classname: bool,

        /// Keep test case classnames verbatim
        #[arg(long)]
        no_format_classname: bool,

        #[command(flatten)]
        layout: Layout,
    },
}

#[derive(Args)]
struct Layout {
    /// Spaces per indentation level (default: 2 for csv, 4 for newman)
    #[arg(long)]
    indent: Option<usize>,
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match cli.command {
        Commands::Csv {
            input,
            output,
            suite_name,
            layout,
        } => {
            let config = ConvertConfig::csv()
                .with_input(input)
                .with_output(output)
                .with_suite_name(suite_name);
            apply_layout(config, layout)
        }

        Commands::Newman {
            input,
            output,
            no_root_classname,
            no_format_classname,
            layout,
        } => {
            let config = ConvertConfig::newman()
                .with_input(input)
                .with_output(output)
                .with_options(TransformOptions {
                    include_root_classname: !no_root_classname,
                    format_classname: !no_format_classname,
                });
            apply_layout(config, layout)
        }
    };

    if let Err(e) = convert::run(config) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn apply_layout(config: ConvertConfig, layout: Layout) -> ConvertConfig {
    match layout.indent {
        Some(indent) => config.with_indent(indent),
        None => config,
    }
}
