//! filterline 命令行工具
//! 按配置文件或临时输入逐行过滤日志文件
//!
//! 运行命令：
//! cargo run --features cli -- config app.log
//! RUST_LOG=debug cargo run --features cli -- string ERROR app.log

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use filterline::{
    CompiledRuleSet, ConfigPathManager, CoreError, CustomConfigBuilder, FileRunner, FilterConfig, FlResult,
    InputFilter, RuleLoader,
};

/// 从标准输入读取、写到标准输出的输入路径
const STDIO_PATH: &str = "-";

#[derive(Parser)]
#[command(name = "filterline")]
#[command(author, version, about = "Filter log lines by string, regex or rule config", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter with the rule config file
    Config {
        #[command(flatten)]
        source: ConfigArgs,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Keep lines containing a string
    String {
        /// String to search for (taken literally)
        pattern: String,
        /// Keep lines NOT containing the string instead
        #[arg(short = 'v', long = "not")]
        invert: bool,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Keep lines matching a regex
    Regex {
        /// Regular expression
        pattern: String,
        /// Keep lines NOT matching the regex instead
        #[arg(short = 'v', long = "not")]
        invert: bool,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Load and compile the rule config without filtering
    Check {
        #[command(flatten)]
        source: ConfigArgs,
        /// Print the parsed config as JSON
        #[arg(long)]
        dump: bool,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Project root searched for .vscode/filterline.{eoml,txt,json}
    #[arg(short, long, default_value = ".", conflicts_with = "config")]
    root: PathBuf,
    /// Explicit config file (.json is decoded as JSON, anything else as markup)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn builder(&self) -> CustomConfigBuilder {
        match &self.config {
            Some(path) => CustomConfigBuilder::new().config_file(path),
            None => CustomConfigBuilder::new().project_root(&self.root),
        }
    }
}

#[derive(Args)]
struct TargetArgs {
    /// File to filter, `-` for stdin to stdout
    input: PathBuf,
    /// Output file (default: <input><marker><ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Marker inserted into the derived output name
    #[arg(long, default_value = ".filterline")]
    marker: String,
    /// Print the run report as JSON instead of the output path
    #[arg(long)]
    json: bool,
}

impl TargetArgs {
    fn apply(&self, builder: CustomConfigBuilder) -> FilterConfig {
        let builder = builder.marker(&self.marker);
        match &self.output {
            Some(path) => builder.output_path(path),
            None => builder,
        }
        .build()
    }
}

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("filterline: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> FlResult<()> {
    match command {
        Commands::Config { source, target } => {
            let config = target.apply(source.builder());
            let rule_set = RuleLoader::new().load(&config)?;
            filter(&config, &target, &rule_set)
        }
        Commands::String { pattern, invert, target } => {
            let input = if invert {
                InputFilter::not_contains(pattern)?
            } else {
                InputFilter::contains(pattern)?
            };
            let config = target.apply(CustomConfigBuilder::new());
            filter(&config, &target, &input.compile()?)
        }
        Commands::Regex { pattern, invert, target } => {
            let input = if invert {
                InputFilter::not_matches(pattern)?
            } else {
                InputFilter::matches(pattern)?
            };
            let config = target.apply(CustomConfigBuilder::new());
            filter(&config, &target, &input.compile()?)
        }
        Commands::Check { source, dump } => {
            let config = source.builder().build();
            let loader = RuleLoader::new();
            let path = ConfigPathManager.locate(&config)?;
            if dump {
                let record = loader.load_record(&path)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&record).map_err(CoreError::from)?
                );
            }
            let rule_set = loader.load_path(&path)?;
            println!("{}: type={}, rules={}", path.display(), rule_set.kind(), rule_set.rule_count());
            Ok(())
        }
    }
}

fn filter(config: &FilterConfig, target: &TargetArgs, rule_set: &CompiledRuleSet) -> FlResult<()> {
    let runner = FileRunner::from_config(config);
    let input = target.input.as_path();
    if input == Path::new(STDIO_PATH) {
        let stdout = io::stdout();
        runner.run_stream(io::stdin().lock(), BufWriter::new(stdout.lock()), rule_set)?;
        return Ok(());
    }
    let report = runner.run(input, rule_set)?;
    if target.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(CoreError::from)?);
    } else {
        println!("{}", report.output.display());
    }
    Ok(())
}
