//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` on a local port.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::PathBuf;
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::Parser;
    use log::{info, warn};

    #[derive(Debug, Parser)]
    #[command(about = "Build and serve the ink bloom demo")]
    struct Args {
        /// Port for the local HTTP server.
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Directory holding index.html; the package lands in its `pkg/`.
        #[arg(long, default_value = "static")]
        site: PathBuf,

        /// Serve whatever is already in `pkg/` without rebuilding.
        #[arg(long)]
        skip_build: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        if args.skip_build {
            info!("skipping wasm build");
        } else {
            build_package(&args.site)?;
        }

        info!("serving {} at http://127.0.0.1:{}", args.site.display(), args.port);
        let status = Command::new("python3")
            .args(["-m", "http.server", &args.port.to_string(), "--directory"])
            .arg(&args.site)
            .stdout(Stdio::null())
            .status()
            .context("failed to start python3 http.server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }

    fn build_package(site: &std::path::Path) -> Result<()> {
        info!("building WASM package");
        let out_dir = site.join("pkg");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(&out_dir)
            .status();
        match status {
            Ok(st) if st.success() => Ok(()),
            Ok(st) => bail!("wasm-pack finished with {st}"),
            Err(err) => {
                warn!("wasm-pack not found ({err}); the site may serve a stale package");
                Ok(())
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
