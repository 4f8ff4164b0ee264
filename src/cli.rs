//! Console output helpers for Cella binaries, including the elapsed-time
//! and peak-memory summary printed on exit.

use std::time::{Duration, Instant};

use colored::Colorize;

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "Cella".bold().cyan(), subtitle.dimmed());
    eprintln!("{}", "(c) 2026 Michael Stromberg".dimmed());
    eprintln!();
}

pub fn section(title: &str) {
    let bar = "─".repeat(50);
    eprintln!("{} {}", title.bold().blue(), bar.dimmed());
}

pub fn kv(key: &str, value: &str) {
    eprintln!("  {:<20} {}", key.dimmed(), value);
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "✓".green().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg.yellow());
}

pub fn print_summary(start: Instant) {
    let peak = peak_memory_bytes()
        .map(format_bytes)
        .unwrap_or_else(|| "N/A".to_string());
    eprintln!();
    eprintln!(
        "{}  {}\n{}  {}",
        "Time".dimmed(),
        format_elapsed(start.elapsed()).bold(),
        "Peak memory".dimmed(),
        peak.bold(),
    );
    eprintln!();
}

/// Formats a duration as HH:MM:SS.d (tenths of a second).
fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    let tenths = d.subsec_millis() / 100;
    format!(
        "{:02}:{:02}:{:02}.{tenths}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    )
}

/// Peak resident set size in bytes, when the platform exposes it.
#[cfg(any(target_os = "linux", target_os = "macos"))]
fn peak_memory_bytes() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::uninit();
    // SAFETY: the pointer is valid and properly aligned for the duration of
    // the call; `getrusage` fully initializes the struct when it returns 0.
    let usage = unsafe {
        if libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) != 0 {
            return None;
        }
        usage.assume_init()
    };
    // ru_maxrss is kilobytes on Linux, bytes on macOS
    let max_rss = usage.ru_maxrss as u64;
    Some(if cfg!(target_os = "macos") {
        max_rss
    } else {
        max_rss * 1024
    })
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn peak_memory_bytes() -> Option<u64> {
    None
}

/// Formats a byte count with the largest fitting binary unit.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1 << 30, "GB"), (1 << 20, "MB"), (1 << 10, "KB")];
    for (scale, unit) in UNITS {
        if bytes >= scale {
            return format!("{:.1} {unit}", bytes as f64 / scale as f64);
        }
    }
    format!("{bytes} B")
}
