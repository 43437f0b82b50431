use anyhow::{anyhow, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

pub const LOG_FILE_PREFIX: &str = "checkin-station.log";

pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Plain subscriber for the window before the config, and so the log
/// directory, is known. Install it with `tracing::subscriber::set_default`.
pub fn startup_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt().with_env_filter(filter).with_writer(writer).finish()
}

/// Installs the global subscriber. The returned guard flushes the rolling
/// file writer and must live as long as the process logs.
pub fn init(json: bool, log_dir: Option<&str>) -> Result<Option<WorkerGuard>> {
    let stdout: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout)
        .with(file)
        .with(default_filter())
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use checkin_infrastructure::AppConfig;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_config_warning_reaches_the_startup_subscriber() {
        let captured = Captured::default();
        let writer = {
            let captured = captured.clone();
            move || captured.clone()
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.toml");

        let guard = tracing::subscriber::set_default(startup_subscriber(
            EnvFilter::new("warn"),
            writer,
        ));
        let config = AppConfig::load_from(&missing.to_string_lossy()).await;
        drop(guard);

        assert!(config.is_ok());
        let text = String::from_utf8(captured.0.lock().unwrap().clone()).expect("utf8");
        assert!(text.contains("not found, using defaults"));
    }
}
