use std::path::PathBuf;

use anyhow::Context as _;
use bookbrowse_application::Session;
use bookbrowse_catalog::Catalog;
use bookbrowse_ui::Ui;
use directories::ProjectDirs;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let path = catalog_path().context("locate catalog payload")?;
    // Malformed or missing catalog data is fatal; nothing can be browsed
    // without it.
    let catalog = Catalog::load(&path)?;
    let session = Session::new(catalog);

    let mut ui = Ui::new(session);
    ui.run()
}

fn catalog_path() -> anyhow::Result<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(arg));
    }

    let local = PathBuf::from("catalog.json");
    if local.is_file() {
        return Ok(local);
    }

    let project_dirs =
        ProjectDirs::from("dev", "bookbrowse", "bookbrowse").context("resolve project dirs")?;
    let fallback = project_dirs.data_dir().join("catalog.json");
    if fallback.is_file() {
        return Ok(fallback);
    }

    anyhow::bail!(
        "no catalog payload found: pass a path, or place catalog.json in the \
         working directory or {}",
        project_dirs.data_dir().display()
    )
}
