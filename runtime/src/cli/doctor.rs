//! Environment readiness check.

use anyhow::Result;

use crate::config::Config;
use crate::renderer::chromium::find_chromium;

/// Check Chromium availability and which pipelines have credentials.
pub async fn run() -> Result<()> {
    let config = Config::load();

    println!("Paperflow Doctor");
    println!("================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium = find_chromium(config.chromium_path.as_ref());
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!("[!!] Chromium NOT found. Set PAPERFLOW_CHROMIUM_PATH or install Chrome."),
    }

    let checks = [
        ("Supabase (crawl, answer, pending)", config.supabase().err()),
        ("Completion API (answer)", config.completion().err()),
        ("Telegram (siteshot upload)", config.telegram().err()),
        ("Cloudflare KV (siteshot index, kv)", config.kv().err()),
    ];
    for (name, err) in &checks {
        match err {
            None => println!("[OK] {name}"),
            Some(e) => println!("[!!] {name}: {e}"),
        }
    }

    match config.exam_cookie {
        Some(_) => println!("[OK] Exam site cookie set"),
        None => println!("[??] FENBI_COOKIE not set; crawls run as an anonymous visitor"),
    }

    println!();
    if chromium.is_some() && checks.iter().all(|(_, e)| e.is_none()) {
        println!("Status: READY");
    } else {
        println!("Status: PARTIAL");
        println!("  Commands whose checks failed above will refuse to start.");
    }

    Ok(())
}
