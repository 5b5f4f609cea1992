//! 同步流式驱动
//! 逐行读取 → 交给过滤闭包 → 写出保留行，不整体缓冲输入
use std::io::{self, BufRead, Write};

use serde::Serialize;

use super::cancel::CancelFlag;
use crate::engine::LineEngine;
use crate::error::{CoreError, CoreResult};

/// 单行读缓冲初始容量
pub(crate) const LINE_BUFFER_CAPACITY: usize = 8 * 1024;

/// 单次过滤的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    /// 读取的行数（含最后不带换行的残行）
    pub lines_read: u64,
    /// 写出的行数
    pub lines_kept: u64,
}

/// 流式驱动
/// 职责：跨读块重组行、剥离行尾（\n 或 \r\n）、按序调用过滤闭包、写出结果
#[derive(Debug, Clone, Default)]
pub struct LineStreamer {
    cancel: Option<CancelFlag>,
}

impl LineStreamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 绑定取消标记，每行处理前检查
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// 执行过滤
    /// 参数：
    /// - reader: 输入流
    /// - writer: 输出流（每个保留行后追加 `\n`）
    /// - evaluate: 过滤闭包，返回 None 表示丢弃该行
    /// 返回：统计信息 | 首个错误（取消、读写失败、非UTF-8输入、闭包错误）
    pub fn run<R, W, F>(&self, mut reader: R, mut writer: W, mut evaluate: F) -> CoreResult<StreamStats>
    where
        R: BufRead,
        W: Write,
        F: FnMut(&str) -> CoreResult<Option<String>>,
    {
        let mut buf = Vec::with_capacity(LINE_BUFFER_CAPACITY);
        let mut stats = StreamStats::default();

        loop {
            self.check_cancelled(&stats)?;

            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines_read += 1;

            let line = decode_line(&buf, stats.lines_read)?;
            if let Some(output) = evaluate(line)? {
                writer.write_all(output.as_bytes())?;
                writer.write_all(b"\n")?;
                stats.lines_kept += 1;
            }
        }

        writer.flush()?;
        log::debug!("Stream finished: read={}, kept={}", stats.lines_read, stats.lines_kept);
        Ok(stats)
    }

    /// 用规则引擎会话执行过滤
    pub fn run_engine<R, W>(&self, reader: R, writer: W, engine: &mut LineEngine<'_>) -> CoreResult<StreamStats>
    where
        R: BufRead,
        W: Write,
    {
        self.run(reader, writer, |line| Ok(engine.evaluate(line)))
    }

    #[inline(always)]
    pub(crate) fn check_cancelled(&self, stats: &StreamStats) -> CoreResult<()> {
        match &self.cancel {
            Some(cancel) if cancel.is_cancelled() => {
                log::info!("Filter cancelled after {} lines", stats.lines_read);
                Err(CoreError::Cancelled { lines_read: stats.lines_read })
            }
            _ => Ok(()),
        }
    }
}

/// 剥离行尾并按 UTF-8 解码
pub(crate) fn decode_line(buf: &[u8], line_no: u64) -> CoreResult<&str> {
    let bytes = buf.strip_suffix(b"\n").unwrap_or(buf);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    std::str::from_utf8(bytes).map_err(|e| {
        CoreError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line {} is not valid UTF-8: {}", line_no, e),
        ))
    })
}
