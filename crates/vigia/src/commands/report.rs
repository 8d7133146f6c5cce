//! `vigia report`: register a motion event through the write path.

use vigia_core::{Monitor, RegisterReceipt};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    monitor: &Monitor,
    description: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let receipt = monitor.register_motion(description).await?;
    let out = output::render_single(&global.output, &receipt, detail, |r| r.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(receipt: &RegisterReceipt) -> String {
    match receipt.message {
        Some(ref message) => format!("✓ Registered event {} ({message})", receipt.id),
        None => format!("✓ Registered event {}", receipt.id),
    }
}
