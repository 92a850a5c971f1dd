use anyhow::{Context, Result};
use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::rc::Rc;
use zstd::stream::read::Decoder;

/// True for paths ending in `.zst` (the packaging of the monthly comment dumps).
pub fn is_zstd_path(path: &Path) -> bool {
    path.extension().map_or(false, |e| e.eq_ignore_ascii_case("zst"))
}

/// A `Read` wrapper that counts bytes pulled from the file (compressed bytes
/// for `.zst` input), so progress tracks position in the file on disk.
struct CountingReader<R: Read> {
    inner: R,
    counter: Rc<Cell<u64>>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.set(self.counter.get() + n as u64);
        Ok(n)
    }
}

/// Streaming NDJSON reader over plain or zstd-compressed input.
/// Lines are handed out as raw bytes so that a line with broken UTF-8 fails as a
/// record-level decode error instead of aborting the read.
pub struct NdjsonReader {
    rdr: Box<dyn BufRead>,
    consumed: Rc<Cell<u64>>,
    line_no: u64,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let consumed = Rc::new(Cell::new(0));
        let counted = CountingReader { inner: f, counter: consumed.clone() };
        let cap = buf_bytes.max(8 * 1024);

        let rdr: Box<dyn BufRead> = if is_zstd_path(path) {
            let mut decoder = Decoder::new(counted)
                .with_context(|| format!("zstd decoder for {}", path.display()))?;
            // Large-window frames are common in the monthly dumps.
            decoder.window_log_max(31)?;
            Box::new(BufReader::with_capacity(cap, decoder))
        } else {
            Box::new(BufReader::with_capacity(cap, counted))
        };
        Ok(Self { rdr, consumed, line_no: 0 })
    }

    /// Read the next line into `buf`, stripping a trailing `\r?\n`.
    /// Returns the number of bytes read including the terminator (0 on EOF).
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf)?;
        if n == 0 {
            return Ok(0);
        }
        self.line_no += 1;
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") { buf.pop(); }
        }
        Ok(n)
    }

    /// 1-based number of the line most recently returned.
    pub fn line_number(&self) -> u64 { self.line_no }

    /// Bytes consumed from the underlying file so far.
    pub fn bytes_consumed(&self) -> u64 { self.consumed.get() }
}
