//! Process setup: `.env` loading and the tracing subscriber.

use std::io::{self, Write};

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
pub fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Writer that drops ANSI CSI sequences (`ESC [ ... final`) so file logs are plain text.
pub struct StripAnsiWriter<W> {
    inner: W,
    /// Pending escape prefix: ESC, or ESC [ plus parameter bytes.
    pending: Vec<u8>,
}

/// Longest parameter run kept before the prefix is flushed as ordinary text.
const MAX_PENDING: usize = 64;

impl<W: Write> StripAnsiWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(16),
        }
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn is_parameter(b: u8) -> bool {
        matches!(b, b'0'..=b'9' | b';' | b'?' | b':')
    }

    fn is_final(b: u8) -> bool {
        (0x40..=0x7e).contains(&b)
    }
}

impl<W: Write> Write for StripAnsiWriter<W> {
    fn write(&mut self, mut buf: &[u8]) -> io::Result<usize> {
        let len = buf.len();
        while let Some((&b, rest)) = buf.split_first() {
            match self.pending.len() {
                0 => match buf.iter().position(|&c| c == 0x1b) {
                    Some(i) => {
                        self.inner.write_all(&buf[..i])?;
                        self.pending.push(0x1b);
                        buf = &buf[i + 1..];
                    }
                    None => {
                        self.inner.write_all(buf)?;
                        break;
                    }
                },
                1 => {
                    buf = rest;
                    if b == b'[' {
                        self.pending.push(b);
                    } else {
                        self.pending.push(b);
                        self.inner.write_all(&self.pending)?;
                        self.pending.clear();
                    }
                }
                _ => {
                    buf = rest;
                    if Self::is_parameter(b) {
                        self.pending.push(b);
                        if self.pending.len() > MAX_PENDING {
                            self.inner.write_all(&self.pending)?;
                            self.pending.clear();
                        }
                    } else if Self::is_final(b) {
                        self.pending.clear();
                    } else {
                        self.pending.push(b);
                        self.inner.write_all(&self.pending)?;
                        self.pending.clear();
                    }
                }
            }
        }
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.inner.write_all(&self.pending)?;
            self.pending.clear();
        }
        self.inner.flush()
    }
}

/// Initializes tracing: always to stdout; if env `LOG_FILE` is set, also to that file (append).
/// File output is plain text (ANSI stripped).
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,resumeflow=debug,resumeflow_server=debug")
    });

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(filter.clone());

    let registry = tracing_subscriber::registry().with(stdout_layer);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let plain_writer = std::sync::Mutex::new(StripAnsiWriter::new(file));
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(plain_writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter);
        registry.with(file_layer).init();
        tracing::info!(path = %path, "logging to file");
    } else {
        registry.init();
    }
    Ok(())
}
