use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use error::GazeError;
use events::TargetWindow;
use mappings::KeyNames;
use services::window_geometry::WindowGeometry;
use services::{
    create_actuator,
    create_gaze_source,
    create_termination_watcher,
    create_window_geometry,
    DwellTracker,
    GazeConnection,
    GazePipeline,
    Mode,
    ModeController,
    RecordSink,
    SampleThrottler,
    ShutdownReason,
    ShutdownSignal,
};

#[derive(Parser, Debug)]
#[command(name = "gaze-dwell")]
#[command(about = "Управление курсором и клавишами задержкой взгляда")]
#[command(group(ArgGroup::new("mode").args(["stop_on_dwell", "move_on_dwell", "logging"])))]
struct Args {
    /// Завершить работу, когда задержка взгляда превысит порог
    #[arg(short = 'd')]
    stop_on_dwell: bool,

    /// Удерживать клавишу движения вперёд, пока задержка превышает порог
    #[arg(short = 'm')]
    move_on_dwell: bool,

    /// Только журналировать задержки, без управления курсором
    #[arg(short = 'l')]
    logging: bool,

    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "gaze-dwell.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    let mode = Mode::from_flags(args.stop_on_dwell, args.move_on_dwell, args.logging);
    info!("Запуск Gaze Dwell v{} (режим: {})", env!("CARGO_PKG_VERSION"), mode);
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        // Проверка прав доступа
        utils::permissions::check_permissions(mode)?;
    }

    // Соединение с источником взгляда открывается первым и освобождается последним
    let mut connection = GazeConnection::new(create_gaze_source(&config, args.dry_run)?);

    let window = create_window_geometry(args.dry_run);
    let target = match resolve_target(window.as_ref(), &config) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("No {} window found. ({})", config.window.title, e);
            connection.release();
            std::process::exit(1);
        }
    };
    info!("Целевое окно: {}", target);

    // Инициализация компонентов
    let actuator = create_actuator(mode, args.dry_run)?;
    let forward_key = KeyNames::resolve(&config.input.forward_key).ok_or_else(|| {
        GazeError::Internal(format!("Неизвестная клавиша: {}", config.input.forward_key))
    })?;
    let controller = ModeController::new(mode, forward_key, actuator.clone());
    let tracker = DwellTracker::new(target, window, actuator, controller, config.dwell_threshold());
    let watcher = create_termination_watcher(&config, mode, args.dry_run)?;
    let shutdown = Arc::new(ShutdownSignal::new());

    info!("Все компоненты инициализированы");

    let samples = connection.subscribe().await?;
    let throttler = SampleThrottler::new(config.throttle_interval(), Instant::now());
    let pipeline = GazePipeline::new(tracker, throttler, shutdown.clone(), RecordSink::stdout());

    // Запуск сервисов
    let pipeline_handle = tokio::spawn(pipeline.run(samples));
    let watcher_handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = watcher.run(shutdown).await {
                error!("Ошибка в TerminationWatcher: {}", e);
            }
        })
    };

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    let reason = tokio::select! {
        reason = shutdown.wait() => reason,
        _ = wait_for_interrupt() => {
            shutdown.trigger(ShutdownReason::Interrupt);
            shutdown.reason().unwrap_or(ShutdownReason::Interrupt)
        }
    };

    info!("Завершение работы ({})...", reason);

    // Конвейер сам отпускает удерживаемую клавишу; ждём его с таймаутом
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, pipeline_handle).await {
        Ok(Ok(Ok(()))) => info!("GazePipeline завершил работу корректно"),
        Ok(Ok(Err(e))) => error!("Ошибка в GazePipeline: {}", e),
        Ok(Err(e)) => error!("Задача GazePipeline аварийно завершилась: {}", e),
        Err(_) => warn!("Таймаут при завершении GazePipeline"),
    }

    watcher_handle.abort();
    let _ = watcher_handle.await;

    info!("Gaze Dwell завершил работу");

    // Последнее внешне наблюдаемое действие перед выходом
    connection.release();
    Ok(())
}

/// Найти целевое окно и снять его прямоугольник один раз
fn resolve_target(window: &dyn WindowGeometry, config: &Config) -> error::Result<TargetWindow> {
    let title = &config.window.title;
    let handle = window
        .find_window(config.window.class.as_deref(), title)?
        .ok_or_else(|| GazeError::WindowNotFound(title.clone()))?;
    let rect = window.window_rect(handle)?;
    Ok(TargetWindow::new(handle, rect))
}

async fn wait_for_interrupt() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // stdout занят выходными записями, логи идут в stderr
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "compact" => registry.with(fmt_layer.compact()).init(),
        _ => registry.with(fmt_layer).init(),
    }

    Ok(())
}
