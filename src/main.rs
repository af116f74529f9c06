use std::sync::Arc;
use tokio::sync::mpsc;

use perfdeck::log_collector::{ensure_logs_dir_exists, get_logs_path};
use perfdeck::ui::app::AppUI;
use perfdeck::ui::controller::{RecordController, RecordEvent, EVENT_CHANNEL_CAPACITY};
use perfdeck::{LogCollector, LogLine};

#[tokio::main]
async fn main() -> perfdeck::Result<()> {
    // =========================================================================
    // LOG COLLECTOR - DECOUPLED FROM UI
    // =========================================================================
    let log_dir = match get_logs_path() {
        Ok(dir) => {
            ensure_logs_dir_exists(&dir)?;
            dir
        }
        Err(e) => {
            eprintln!("[Main] ERROR: Failed to resolve logs path: {}", e);
            return Err(format!("Failed to determine logs directory: {}", e).into());
        }
    };
    let (log_ui_tx, mut log_ui_rx) = mpsc::channel::<LogLine>(1024);
    let log_collector = match LogCollector::new(log_dir, log_ui_tx) {
        Ok(collector) => Arc::new(collector),
        Err(e) => {
            eprintln!("[Main] WARNING: LogCollector initialization failed: {}", e);
            return Err(format!("LogCollector initialization failed: {}", e).into());
        }
    };

    // Wire LogCollector as the global logger so log::* macros reach disk
    let max_level = log::LevelFilter::Info;
    if let Err(e) = log::set_boxed_logger(Box::new((*log_collector).clone()))
        .map(|()| log::set_max_level(max_level))
    {
        eprintln!("[Main] WARNING: Failed to set global logger: {}", e);
    }

    log::info!("perfdeck logging initialized");

    // =========================================================================
    // CONTROLLER AND CHANNELS SETUP
    // =========================================================================
    let (record_tx, record_rx) = mpsc::channel::<RecordEvent>(EVENT_CHANNEL_CAPACITY);
    let (cancel_tx, _cancel_rx) = tokio::sync::watch::channel(false);

    // Drain the log UI channel into the record event stream so the
    // collapsible log view stays current without a second poll loop.
    let record_tx_clone = record_tx.clone();
    tokio::spawn(async move {
        while let Some(log_line) = log_ui_rx.recv().await {
            let _ = record_tx_clone
                .send(RecordEvent::Log(format!(
                    "{} {}",
                    log_line.timestamp, log_line.message
                )))
                .await;
        }
    });

    let controller = Arc::new(RecordController::new(
        record_tx,
        cancel_tx,
        Some(log_collector.clone()),
    )?);

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let app_ui = AppUI::new(controller, Some(record_rx));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "perfdeck",
        options,
        Box::new(move |_cc| Box::new(app_ui)),
    );

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    // Wait for the log collector to flush pending messages before exit
    if let Err(e) = log_collector.wait_for_empty().await {
        eprintln!("[Main] WARNING: Failed to flush log collector: {}", e);
    }

    result.map_err(|e| e.into())
}
