//! photq Demo Suite
//!
//! Demonstrations of topologically protected photonic encodings:
//!
//! - **Edge-state qubit**: disordered SSH chain, IPR and the protected pair
//! - **Logical measurement**: repeated Z/X measurements of an embedded qubit
//! - **Holographic qudit**: DFT encoding with a Kerr-like phase gate
//! - **Noise**: Lindblad evolution under damping and dephasing
//! - **Chern insulator**: Berry curvature map and mass sweep
//!
//! The pipelines in [`pipelines`] return plain numbers; the helpers below
//! render them for the terminal.

pub mod pipelines;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for long-running demo stages.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Format a slice of numbers with fixed precision.
pub fn format_values(values: &[f64], precision: usize) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.precision$}")).collect();
    format!("[{}]", parts.join(", "))
}

/// Render a probability distribution as a horizontal bar chart.
pub fn print_distribution(probs: &[f64]) {
    let peak = probs.iter().copied().fold(0.0, f64::max);
    for (j, p) in probs.iter().enumerate() {
        let width = if peak > 0.0 {
            (p / peak * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "  {:>3} {} {:.4}",
            j,
            style("█".repeat(width)).magenta(),
            p
        );
    }
}
