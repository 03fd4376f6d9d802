// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redactwerk — interactive mosaic redaction, headless host.
//
// Entry point. Initialises logging and services, decodes the input image,
// replays an edit script against a fresh session, renders the final output
// off-thread, and encodes it to disk.
//
//     redact-app <input-image> <edit-script.json> <output-image>

mod codec;
mod script;
mod services;

use std::path::Path;
use std::process::ExitCode;

use redact_core::Result;
use redact_core::human_errors::humanize_error;
use redact_engine::{FrameBuffer, ImageSession};
use redact_render::{RenderWorker, lock_session, share};
use tracing::{error, info};

use script::EditScript;
use services::app_services::AppServices;

const USAGE: &str = "usage: redact-app <input-image> <edit-script.json> <output-image>";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Redactwerk starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, script, output] = args.as_slice() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(Path::new(input), Path::new(script), Path::new(output)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "redaction failed");
            let human = humanize_error(&e);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(input: &Path, script_path: &Path, output: &Path) -> Result<()> {
    let services = AppServices::init()?;
    info!(data_dir = %services.data_dir().display(), "services ready");
    let config = services.config();
    let codec = services.codec().await?;

    let image = codec.open(input)?;
    let script = EditScript::load(script_path)?;

    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let session = share(ImageSession::new(name, image, config.clone())?);
    let worker = RenderWorker::new(session.clone(), config.apply_policy);

    let mut preview = FrameBuffer::new();
    let report = script::replay(&script, &worker, &mut preview).await?;

    // Render once more unless the script's last apply already matches the
    // final region list.
    let current = {
        let guard = lock_session(&session)?;
        guard
            .final_image()
            .filter(|_| guard.is_final_current())
            .cloned()
    };
    let final_image = match current {
        Some(image) => image,
        None => script::render(&worker).await?,
    };

    codec.save(final_image.pixels(), output)?;

    let summary = lock_session(&session)?.summary();
    info!(
        output = %output.display(),
        regions = summary.region_count,
        steps = report.steps,
        committed = report.committed,
        discarded = report.discarded,
        frames = report.frames,
        digest = final_image.digest(),
        "redacted image written"
    );
    Ok(())
}
