//! 文件过滤执行器
//! 流程：校验输入 → 推导输出路径 → 写入同目录临时文件 → 成功后改名发布
//! 失败或取消时临时文件随 drop 删除，输入文件与已有输出保持原样
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use filterline_engine::{CancelFlag, CompiledRuleSet, LineEngine, LineStreamer, StreamStats};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::config::{FilterConfig, OutputOptions};
use crate::error::{FilterLineError, FlResult};

/// 单次文件过滤结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// 输出覆盖了输入文件本身
    pub overwrite: bool,
    pub stats: StreamStats,
    pub elapsed: Duration,
}

/// 输出路径规划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub path: PathBuf,
    pub overwrite: bool,
}

impl OutputPlan {
    /// 推导输出路径
    /// 尾缀 = 标记 + 输入扩展名；输入路径已含尾缀时覆盖输入，否则输出到 输入路径 + 尾缀
    pub fn for_input(input: &Path, options: &OutputOptions) -> Self {
        if let Some(path) = &options.output_path {
            return Self {
                overwrite: path == input,
                path: path.clone(),
            };
        }

        let ext = input
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let tail = format!("{}{}", options.marker, ext);

        if input.to_string_lossy().contains(&tail) {
            return Self {
                path: input.to_path_buf(),
                overwrite: true,
            };
        }

        let mut path = OsString::from(input.as_os_str());
        path.push(&tail);
        Self {
            path: PathBuf::from(path),
            overwrite: false,
        }
    }
}

/// 文件过滤执行器
#[derive(Debug, Clone, Default)]
pub struct FileRunner {
    options: OutputOptions,
    cancel: Option<CancelFlag>,
}

impl FileRunner {
    pub fn new(options: OutputOptions) -> Self {
        Self { options, cancel: None }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.output.clone())
    }

    /// 绑定取消标记
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn streamer(&self) -> LineStreamer {
        match &self.cancel {
            Some(cancel) => LineStreamer::new().with_cancel(cancel.clone()),
            None => LineStreamer::new(),
        }
    }

    /// 过滤单个文件
    pub fn run(&self, input: &Path, rule_set: &CompiledRuleSet) -> FlResult<RunReport> {
        let start = Instant::now();
        ensure_regular_file(input)?;
        let plan = OutputPlan::for_input(input, &self.options);
        log::debug!(
            "Filter {} -> {} (overwrite={})",
            input.display(),
            plan.path.display(),
            plan.overwrite
        );

        let reader = BufReader::new(File::open(input)?);
        let tmp = create_temp_beside(&plan.path)?;
        let mut writer = BufWriter::new(tmp);

        let mut engine = LineEngine::new(rule_set);
        let stats = self.streamer().run_engine(reader, &mut writer, &mut engine)?;

        let tmp = writer.into_inner().map_err(|e| e.into_error())?;
        publish(tmp, input, &plan.path)?;

        let report = RunReport {
            input: input.to_path_buf(),
            output: plan.path,
            overwrite: plan.overwrite,
            stats,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Filtered {}: {} of {} lines kept -> {} ({:?})",
            report.input.display(),
            report.stats.lines_kept,
            report.stats.lines_read,
            report.output.display(),
            report.elapsed
        );
        Ok(report)
    }

    /// 过滤任意读写流（标准输入输出等），不做发布
    pub fn run_stream<R, W>(&self, reader: R, writer: W, rule_set: &CompiledRuleSet) -> FlResult<StreamStats>
    where
        R: BufRead,
        W: Write,
    {
        let mut engine = LineEngine::new(rule_set);
        Ok(self.streamer().run_engine(reader, writer, &mut engine)?)
    }

    /// 异步过滤单个文件（async-io 特性），语义与 run 一致
    #[cfg(feature = "async-io")]
    pub async fn run_async(&self, input: &Path, rule_set: &CompiledRuleSet) -> FlResult<RunReport> {
        let start = Instant::now();
        let meta = tokio::fs::metadata(input).await?;
        if !meta.is_file() {
            return Err(not_a_file(input));
        }
        let plan = OutputPlan::for_input(input, &self.options);

        let reader = tokio::io::BufReader::new(tokio::fs::File::open(input).await?);
        let tmp = create_temp_beside(&plan.path)?;
        let mut writer = tokio::io::BufWriter::new(tokio::fs::File::from_std(tmp.reopen()?));

        let mut engine = LineEngine::new(rule_set);
        let stats = self.streamer().run_engine_async(reader, &mut writer, &mut engine).await?;
        // 确保全部写入落盘后再发布
        writer.into_inner().sync_all().await?;
        publish(tmp, input, &plan.path)?;

        Ok(RunReport {
            input: input.to_path_buf(),
            output: plan.path,
            overwrite: plan.overwrite,
            stats,
            elapsed: start.elapsed(),
        })
    }
}

fn not_a_file(input: &Path) -> FilterLineError {
    FilterLineError::InvalidInput(format!("Can only filter file: {}", input.display()))
}

/// 只接受普通文件
fn ensure_regular_file(input: &Path) -> FlResult<()> {
    if fs::metadata(input)?.is_file() {
        Ok(())
    } else {
        Err(not_a_file(input))
    }
}

/// 在输出目录创建临时文件，保证改名发布不跨文件系统
fn create_temp_beside(output: &Path) -> FlResult<NamedTempFile> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Ok(NamedTempFile::new_in(dir)?)
}

/// 沿用输入文件权限后改名发布
fn publish(tmp: NamedTempFile, input: &Path, output: &Path) -> FlResult<()> {
    fs::set_permissions(tmp.path(), fs::metadata(input)?.permissions())?;
    tmp.persist(output)?;
    Ok(())
}
