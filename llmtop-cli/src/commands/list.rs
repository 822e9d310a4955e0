use llmtop_core::config::MonitorConfig;
use llmtop_core::model::{format_bytes, format_modified_at, ResourceUsage};
use llmtop_core::retry::guarded_fetch;
use llmtop_core::source::{SourceKind, SourcePayload};

use crate::backend::LiveDataSource;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Print the current model listing and host usage once, then return.
pub async fn run_list(config: &MonitorConfig) -> Result<(), String> {
    let source = LiveDataSource::new(&config.backend)?;
    let resolver = config.descriptor_resolver();
    let policy = config.retry_policy();

    let entities = match guarded_fetch(&source, &SourceKind::Models, &policy).await {
        Ok(SourcePayload::Listing(entities)) => entities,
        Ok(_) => Vec::new(),
        Err(e) => return Err(format!("could not fetch models from {}: {}", config.backend.url, e)),
    };

    println!("llmtop - Ollama models");
    println!("{}", "=".repeat(40));

    if entities.is_empty() {
        println!("\nNo models are currently running.");
    } else {
        println!("\nRunning models ({}):\n", entities.len());
        for (i, descriptor) in resolver.resolve_all(&entities).iter().enumerate() {
            println!("{:2}. {}{}{}", i + 1, BOLD, descriptor.id, RESET);
            println!(
                "    {} {} {} ({})",
                descriptor.family, descriptor.parameter_scale, descriptor.quantization,
                descriptor.format
            );
            println!("    Size: {}", format_bytes(descriptor.size_bytes));
            if !descriptor.digest.is_empty() {
                println!("    Digest: {}{}{}", DIM, descriptor.digest, RESET);
            }
            println!("    Modified: {}", format_modified_at(&descriptor.modified_at));
        }
    }

    let usage = match guarded_fetch(&source, &SourceKind::System, &policy).await {
        Ok(SourcePayload::Usage(usage)) => usage,
        _ => ResourceUsage::default(),
    };

    println!("\nSystem usage:");
    print_gauge("CPU", usage.cpu_percent);
    print_gauge("RAM", usage.ram_percent);
    print_gauge("GPU", usage.gpu_percent);
    println!("  VRAM: {}", format_bytes(usage.vram_used_bytes));

    Ok(())
}

fn print_gauge(label: &str, pct: f32) {
    println!("  {:4} {}{:5.1}%{}", label, gauge_color(pct), pct, RESET);
}

fn gauge_color(pct: f32) -> &'static str {
    if pct < 50.0 {
        "\x1b[32m"
    } else if pct < 80.0 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    }
}
