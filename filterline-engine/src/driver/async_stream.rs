//! 异步流式驱动（async-io 特性）
//! 与同步版本语义一致：行重组、行尾剥离、取消检查、写出保留行
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::stream::{decode_line, LineStreamer, StreamStats, LINE_BUFFER_CAPACITY};
use crate::engine::LineEngine;
use crate::error::CoreResult;

impl LineStreamer {
    /// 异步执行过滤
    pub async fn run_async<R, W, F>(&self, mut reader: R, mut writer: W, mut evaluate: F) -> CoreResult<StreamStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: FnMut(&str) -> CoreResult<Option<String>>,
    {
        let mut buf = Vec::with_capacity(LINE_BUFFER_CAPACITY);
        let mut stats = StreamStats::default();

        loop {
            self.check_cancelled(&stats)?;

            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            stats.lines_read += 1;

            let line = decode_line(&buf, stats.lines_read)?;
            if let Some(output) = evaluate(line)? {
                writer.write_all(output.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                stats.lines_kept += 1;
            }
        }

        writer.flush().await?;
        log::debug!("Async stream finished: read={}, kept={}", stats.lines_read, stats.lines_kept);
        Ok(stats)
    }

    pub async fn run_engine_async<R, W>(
        &self,
        reader: R,
        writer: W,
        engine: &mut LineEngine<'_>,
    ) -> CoreResult<StreamStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.run_async(reader, writer, |line| Ok(engine.evaluate(line))).await
    }
}
