use clap::{Parser, Subcommand};
use epubshelf::{
    PackOptions, RenameOptions, Renamer, ShelfConfig, pack, prompt_prefix,
    config::DEFAULT_CONFIG_PATH,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// 📚 epubshelf - EPUB重命名与批量打包工具
#[derive(Parser)]
#[command(name = "epubshelf")]
#[command(about = "按元数据重命名EPUB文件，并批量整理子目录文件")]
#[command(version)]
struct Args {
    /// 详细输出模式
    #[arg(short, long, global = true, help = "输出调试日志")]
    verbose: bool,

    /// 配置文件路径
    #[arg(long, global = true, help = "YAML配置文件路径（默认读取工作目录下的epubshelf.yaml）")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 按标题和作者递归重命名EPUB文件
    Rename {
        /// 工作目录
        #[arg(long, default_value = ".", help = "要递归处理的目录")]
        dir: PathBuf,

        /// 试运行
        #[arg(long, help = "只显示新文件名，不修改文件")]
        dry_run: bool,
    },

    /// 把子目录中的文件加上前缀移到工作目录，并生成前缀.zip
    Pack {
        /// 文件名前缀，省略时交互输入
        prefix: Option<String>,

        /// 工作目录
        #[arg(long, default_value = ".", help = "要处理的目录")]
        dir: PathBuf,
    },

    /// 生成默认配置文件
    InitConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH, help = "配置文件输出路径")]
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Rename { dir, dry_run } => run_rename(dir, dry_run, args.config),
        Command::Pack { prefix, dir } => run_pack(dir, prefix, args.config),
        Command::InitConfig { path } => match ShelfConfig::generate_default_config(&path) {
            Ok(()) => {
                println!("✅ 已生成配置文件: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ 错误: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_rename(dir: PathBuf, dry_run: bool, config_path: Option<PathBuf>) -> ExitCode {
    let config = match ShelfConfig::load(config_path.as_deref(), &dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = RenameOptions::from_config(&config.rename).with_dry_run(dry_run);
    match Renamer::new(&dir, options).run() {
        Ok(report) => {
            tracing::info!(
                scanned = report.scanned,
                renamed = report.renamed.len(),
                skipped = report.skipped.len(),
                failed = report.failed.len(),
                "重命名完成"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_pack(dir: PathBuf, prefix: Option<String>, config_path: Option<PathBuf>) -> ExitCode {
    let config = match ShelfConfig::load(config_path.as_deref(), &dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let prefix = match prefix {
        Some(prefix) => prefix,
        None => match prompt_prefix(&mut io::stdin().lock(), &mut io::stdout()) {
            Ok(prefix) => prefix,
            Err(e) => {
                eprintln!("❌ 错误: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match pack(&dir, &prefix, &PackOptions::from_config(&config.pack)) {
        Ok(report) => {
            println!(
                "🎉 已处理 {} 个目录、{} 个文件，生成 {}",
                report.directories.len(),
                report.moved.len(),
                report.archive.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            ExitCode::FAILURE
        }
    }
}
