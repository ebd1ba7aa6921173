//! Print every attached output with its current mode and DPI scale range.
//!
//! Pass a simulated layout JSON as the first argument to run without a real
//! display stack.

use adjust_display::{DisplayPlatform, DisplayRegistry, SimulatedPlatform};

fn main() {
    tracing_subscriber::fmt::init();

    let platform: Box<dyn DisplayPlatform> = match std::env::args().nth(1) {
        Some(path) => match SimulatedPlatform::from_file(&path) {
            Ok(platform) => Box::new(platform),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => match adjust_display::native_platform() {
            Ok(platform) => platform,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    };

    match DisplayRegistry::build(&platform) {
        Ok(registry) => {
            println!("Found {} attached output(s)", registry.len());
            if let Some(primary) = registry.primary_or_first() {
                println!("Primary: #{} {}", primary.number, primary.device.name);
            }
            for output in registry.outputs() {
                let mode = output
                    .current_mode()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "<no modes>".to_string());
                let scale = output
                    .scale_info
                    .map(|s| format!("{}% ({}%..{}%)", s.current, s.minimum, s.maximum))
                    .unwrap_or_else(|| "<unknown>".to_string());
                println!(
                    "#{}: {} [{}] primary={} modes={} current={} scale={}",
                    output.label(),
                    output.device.name,
                    output.display_name(),
                    output.is_primary(),
                    output.catalog.len(),
                    mode,
                    scale
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
