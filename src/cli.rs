use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use reqconv::config::{ConfigLoader, OutputFormat};
use reqconv::parser::{CurlParser, HttpFileParser};
use reqconv::utils::RequestFormatter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出格式，未指定时读取 reqconv.toml
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// 关闭彩色输出
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 解析 curl 命令
    ///
    /// 传入一个完整的命令字符串，或直接在 `--` 之后书写 curl 参数；`-` 表示从标准输入读取
    Curl {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// 解析 .http / .rest 文件
    Http { path: PathBuf },
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = ConfigLoader::load_or_default();
    let color = settings.color && !cli.no_color;
    colored::control::set_override(color);

    let mut formatter = RequestFormatter::from_settings(&settings).with_color(color);
    if let Some(format) = cli.output {
        formatter = formatter.with_format(format);
    }

    match cli.command {
        Commands::Curl { args } => {
            let request = match args.as_slice() {
                [single] if single == "-" => {
                    let mut input = String::new();
                    std::io::stdin()
                        .read_to_string(&mut input)
                        .context("Failed to read curl command from stdin")?;
                    CurlParser::parse(&input)
                }
                [single] => CurlParser::parse(single),
                tokens => CurlParser::parse_tokens(tokens),
            };
            if request.url.is_empty() {
                eprintln!("{}", "Warning: no URL found in curl command".yellow());
            }
            println!("{}", formatter.format_one(&request)?);
        }
        Commands::Http { path } => {
            let parsed = HttpFileParser::parse_file(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if parsed.is_empty() {
                eprintln!(
                    "{}",
                    format!("No requests found in {}", path.display()).yellow()
                );
                return Ok(());
            }
            println!("{}", formatter.format_many(&parsed.requests)?);
        }
    }

    Ok(())
}
