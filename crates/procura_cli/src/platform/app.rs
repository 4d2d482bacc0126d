use std::io;
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, LogDestination};
use procura_core::{update, AppState, Msg, SessionState};
use procura_engine::EngineHandle;

use super::cli::{api_settings, Cli};
use super::config::{load_config, save_config};
use super::effects::{EffectRunner, ExportTarget};
use super::render::Renderer;

const TICK: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let destination = if cli.verbose {
        LogDestination::Both(cli.log_file.clone())
    } else {
        LogDestination::File(cli.log_file.clone())
    };
    engine_logging::initialize(destination, cli.log_level());

    let config = cli.apply_overrides(load_config(&cli.config));
    if cli.init_config {
        let path = save_config(&cli.config, &config)?;
        println!("Wrote config to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let engine = EngineHandle::new(api_settings(&config)).context("starting engine")?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(
        engine,
        ExportTarget {
            dir: config.output_dir.clone(),
            vendor: config.vendor.clone(),
            ship_to: config.ship_to.clone(),
        },
        msg_tx.clone(),
    );

    engine_info!("Procurement run starting against {}", config.base_url);
    println!("Submitting to {} ...", config.base_url);

    let mut renderer = Renderer::new(io::stdout().lock());
    let mut state = AppState::new();
    msg_tx
        .send(Msg::StartClicked(cli.procurement_request()))
        .context("queueing start message")?;

    let auto_export = !cli.no_export;
    let mut export_requested = false;
    loop {
        let msg = match msg_rx.recv_timeout(TICK) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => Msg::Tick,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        // Ctrl-C before the service answered: nothing to close, just leave.
        if msg == Msg::StopClicked && state.session() == SessionState::Submitting {
            println!("Interrupted before the request was accepted");
            break;
        }

        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            renderer.render(&state.view()).context("writing output")?;
        }

        if state.session() != SessionState::Ended {
            continue;
        }
        let view = state.view();
        if auto_export && view.export_enabled && !export_requested {
            export_requested = true;
            let (next, effects) = update(state, Msg::ExportClicked);
            state = next;
            runner.enqueue(effects);
            continue;
        }
        if !export_requested || view.last_export.is_some() {
            break;
        }
    }

    let view = state.view();
    renderer.finish(&view).context("writing output")?;
    engine_info!(
        "Procurement run finished request_id={:?} status={}",
        view.request_id,
        view.status_label
    );

    if view.request_id.is_none() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
