use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
#[cfg(test)]
use std::sync::mpsc::Sender;

use super::{TextureError, TextureImage};

/// Progress of a background texture load.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadState {
    Pending,
    /// The image was handed out by [`TextureLoader::poll`].
    Ready,
    Failed,
}

/// Decodes one image on a worker thread and hands it to the render thread.
///
/// The render thread calls [`poll`](Self::poll) once per frame; it never blocks.
#[derive(Debug)]
pub struct TextureLoader {
    path: PathBuf,
    rx: Receiver<Result<TextureImage, TextureError>>,
    state: LoadState,
}

impl TextureLoader {
    /// Starts loading `path` in the background.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();

        let worker_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                let result = TextureImage::load(&worker_path);
                // The receiver may be gone if the renderer shut down first.
                let _ = tx.send(result);
            });

        // On spawn failure the sender is dropped with the closure and the first
        // poll reports the load as failed.
        if let Err(e) = spawned {
            log::error!("failed to spawn texture loader thread: {e}");
        } else {
            log::debug!("loading texture `{}`", path.display());
        }

        Self {
            path,
            rx,
            state: LoadState::Pending,
        }
    }

    /// Loader with no worker; results arrive through the returned sender.
    #[cfg(test)]
    pub(crate) fn pending() -> (Self, Sender<Result<TextureImage, TextureError>>) {
        let (tx, rx) = mpsc::channel();
        let loader = Self {
            path: PathBuf::from("<pending>"),
            rx,
            state: LoadState::Pending,
        };
        (loader, tx)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns the decoded image exactly once, when it becomes available.
    ///
    /// Load errors are logged and move the loader to [`LoadState::Failed`].
    pub fn poll(&mut self) -> Option<TextureImage> {
        if self.state != LoadState::Pending {
            return None;
        }

        match self.rx.try_recv() {
            Ok(Ok(image)) => {
                log::info!(
                    "texture `{}` loaded ({}x{})",
                    self.path.display(),
                    image.width(),
                    image.height()
                );
                self.state = LoadState::Ready;
                Some(image)
            }
            Ok(Err(e)) => {
                log::warn!("{:#}; textured cube keeps its placeholder", anyhow::Error::from(e));
                self.state = LoadState::Failed;
                None
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("texture loader for `{}` exited without a result", self.path.display());
                self.state = LoadState::Failed;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn poll_until_settled(loader: &mut TextureLoader) -> Option<TextureImage> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(img) = loader.poll() {
                return Some(img);
            }
            if loader.state() != LoadState::Pending {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("texture loader did not settle");
    }

    #[test]
    fn background_load_delivers_image_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tex.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut loader = TextureLoader::spawn(&path);
        let img = poll_until_settled(&mut loader).expect("image");
        assert_eq!((img.width(), img.height()), (4, 4));
        assert_eq!(loader.state(), LoadState::Ready);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn missing_file_fails_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = TextureLoader::spawn(dir.path().join("missing.png"));
        assert!(poll_until_settled(&mut loader).is_none());
        assert_eq!(loader.state(), LoadState::Failed);
    }

    #[test]
    fn poll_returns_immediately_while_pending() {
        let (mut loader, _tx) = TextureLoader::pending();
        let start = Instant::now();
        for _ in 0..100 {
            assert!(loader.poll().is_none());
        }
        assert_eq!(loader.state(), LoadState::Pending);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn result_sent_later_is_handed_out_once() {
        let (mut loader, tx) = TextureLoader::pending();
        assert!(loader.poll().is_none());

        let img = TextureImage::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        tx.send(Ok(img.clone())).unwrap();
        assert_eq!(loader.poll(), Some(img));
        assert_eq!(loader.state(), LoadState::Ready);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn dropped_worker_marks_load_failed() {
        let (mut loader, tx) = TextureLoader::pending();
        drop(tx);
        assert!(loader.poll().is_none());
        assert_eq!(loader.state(), LoadState::Failed);
    }
}
