//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` locally so the ripple page can be opened in a
//! browser.
//!
//! `RIPPLE_PORT` picks the port (default 8000).

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::{env, thread, time::Duration};

const DEFAULT_PORT: u16 = 8000;

fn port_from_env() -> u16 {
    match env::var("RIPPLE_PORT") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            eprintln!("ignoring invalid RIPPLE_PORT {raw:?}, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}

fn build_pkg() -> io::Result<ExitStatus> {
    Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
}

fn main() -> io::Result<()> {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return Ok(());
    }

    println!("Building WASM pkg …");
    match build_pkg() {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the page may load a stale bundle.");
        }
    }

    // The page fetches its shaders and background relative to itself, so the
    // whole of `static/` has to be served, not just the bundle.
    let port = port_from_env();
    println!("Serving ripple demo at http://127.0.0.1:{port} …");
    let port_arg = port.to_string();
    let mut server = Command::new("python3")
        .args(["-m", "http.server", port_arg.as_str(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()?;

    // Keep process alive until the server goes away.
    loop {
        if let Some(status) = server.try_wait()? {
            eprintln!("http server exited with {status}");
            return Ok(());
        }
        thread::sleep(Duration::from_secs(1));
    }
}
