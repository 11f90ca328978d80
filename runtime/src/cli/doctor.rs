// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Environment readiness check.

use crate::renderer::chromium::find_chromium;
use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Check Chromium availability, output directory, and available memory.
pub async fn run() -> Result<()> {
    println!("Planscrape Doctor");
    println!("=================");
    println!();

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Set PLANSCRAPE_CHROMIUM_PATH or install Chrome (needed by `planscrape warrant`)."
        ),
    }

    let cwd = std::env::current_dir()?;
    if is_writable(&cwd) {
        println!("[OK] Output directory {} is writable", cwd.display());
    } else {
        println!("[!!] Output directory {} is not writable", cwd.display());
    }

    match get_available_memory_mb() {
        Some(mb) if mb >= 256 => println!("[OK] Available memory: {mb}MB (>= 256MB required)"),
        Some(mb) => println!("[!!] Available memory: {mb}MB (< 256MB, Chromium may fail)"),
        None => println!("[??] Could not determine available memory"),
    }

    println!();
    if chromium_path.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY for `planscrape warrant`");
        println!("  `planscrape control` does not need a browser.");
    }

    Ok(())
}

fn is_writable(dir: &Path) -> bool {
    tempfile::tempfile_in(dir).is_ok()
}

/// Get available memory in MB (platform-specific).
fn get_available_memory_mb() -> Option<u64> {
    #[cfg(target_os = "macos")]
    {
        let output = Command::new("sysctl")
            .args(["-n", "hw.memsize"])
            .output()
            .ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        let bytes: u64 = s.trim().parse().ok()?;
        Some(bytes / 1_048_576)
    }
    #[cfg(target_os = "linux")]
    {
        let output = Command::new("free").args(["-m"]).output().ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        s.lines()
            .find(|line| line.starts_with("Mem:"))
            .and_then(|line| line.split_whitespace().nth(6))
            .and_then(|avail| avail.parse().ok())
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
