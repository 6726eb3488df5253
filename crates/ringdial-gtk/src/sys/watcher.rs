use crate::events::AppEvent;
use async_channel::Sender;
use notify::event::EventKind;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ringdial::config::get_config_path;
use std::io;
use std::path::{Path, PathBuf};

/// Directory to watch and the file inside it, in the form notify reports.
///
/// A bare file name lives in the working directory; the directory is created
/// if needed so it can be watched before the file exists.
pub fn resolve_watch_target(config_path: &Path) -> io::Result<(PathBuf, PathBuf)> {
    let absolute = std::path::absolute(config_path)?;
    let file_name = absolute
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "config path has no file name"))?
        .to_owned();
    let dir = match absolute.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };

    fs_err::create_dir_all(&dir)?;
    let dir = fs_err::canonicalize(&dir)?;
    let file = dir.join(file_name);
    Ok((dir, file))
}

fn touches(event: &notify::Event, file: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == file)
}

/// Sends [`AppEvent::ConfigReload`] whenever the config file changes.
pub async fn run_async_watcher(tx: Sender<AppEvent>, config_path: Option<PathBuf>) {
    let requested = match config_path.map_or_else(get_config_path, Ok) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let (dir, file) = match resolve_watch_target(&requested) {
        Ok(target) => target,
        Err(e) => {
            log::error!("Cannot watch {}: {}", requested.display(), e);
            return;
        }
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    );
    let mut watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };
    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", dir.display(), e);
        return;
    }
    log::debug!("Watching {}", file.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches(&event, &file) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
