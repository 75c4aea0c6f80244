//! Background compositing
//!
//! Compositing is the one expensive step in the editor, so a UI can hand it
//! to a [`RenderWorker`]. Requests carry their inputs by value (a shared
//! raster and a cloned annotation list), so the session is free to keep
//! editing while a render is in flight. Requests that queue up while the
//! worker is busy are coalesced: only the newest one is rendered.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use image::RgbaImage;

use super::image::composite;
use super::text::FontBook;
use crate::domain::{Annotation, Screenshot};
use crate::error::RenderError;

/// Snapshot of the inputs for one render
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub generation: u64,
    pub image: Arc<RgbaImage>,
    pub annotations: Vec<Annotation>,
}

/// Result of a render, tagged with the generation it was requested as
#[derive(Debug)]
pub struct RenderOutput {
    pub generation: u64,
    pub result: Result<RgbaImage, RenderError>,
}

pub struct RenderWorker {
    requests: Option<Sender<RenderRequest>>,
    results: Receiver<RenderOutput>,
    handle: Option<JoinHandle<()>>,
    next_generation: u64,
}

impl RenderWorker {
    /// Start the worker thread
    pub fn spawn(fonts: Arc<FontBook>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<RenderRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let handle = std::thread::Builder::new()
            .name("snapmark-render".into())
            .spawn(move || run(request_rx, result_tx, fonts))?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
            next_generation: 0,
        })
    }

    /// Queue a render; returns the generation number of the request
    pub fn submit(
        &mut self,
        image: Arc<RgbaImage>,
        annotations: Vec<Annotation>,
    ) -> Result<u64, RenderError> {
        self.next_generation += 1;
        let generation = self.next_generation;
        let request = RenderRequest {
            generation,
            image,
            annotations,
        };
        self.requests
            .as_ref()
            .ok_or(RenderError::WorkerGone)?
            .send(request)
            .map_err(|_| RenderError::WorkerGone)?;
        Ok(generation)
    }

    /// Queue a render of the screenshot's current state
    pub fn submit_screenshot(&mut self, shot: &Screenshot) -> Result<u64, RenderError> {
        self.submit(Arc::clone(&shot.image), shot.annotations.clone())
    }

    /// Non-blocking poll for a finished render; `Ok(None)` when nothing is ready yet
    pub fn try_recv(&self) -> Result<Option<RenderOutput>, RenderError> {
        match self.results.try_recv() {
            Ok(output) => Ok(Some(output)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RenderError::WorkerGone),
        }
    }

    /// Block until the next finished render
    pub fn recv(&self) -> Result<RenderOutput, RenderError> {
        self.results.recv().map_err(|_| RenderError::WorkerGone)
    }

    /// Channel of finished renders, for use in a select loop
    pub fn results(&self) -> &Receiver<RenderOutput> {
        &self.results
    }

    /// Generation of the most recent request
    pub fn latest_generation(&self) -> u64 {
        self.next_generation
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("Render worker panicked");
        }
    }
}

fn run(requests: Receiver<RenderRequest>, results: Sender<RenderOutput>, fonts: Arc<FontBook>) {
    while let Ok(mut request) = requests.recv() {
        // Skip to the newest pending request
        while let Ok(newer) = requests.try_recv() {
            log::debug!(
                "Dropping stale render {} in favour of {}",
                request.generation,
                newer.generation
            );
            request = newer;
        }

        let result = composite(&request.image, &request.annotations, &fonts);
        if let Err(err) = &result {
            log::warn!("Render {} failed: {}", request.generation, err);
        }
        let output = RenderOutput {
            generation: request.generation,
            result,
        };
        if results.send(output).is_err() {
            break;
        }
    }
    log::debug!("Render worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::domain::{AnnotationId, Rect, RectangleAnnotation, StrokeStyle};

    #[test]
    fn test_worker_renders_requests() {
        let mut worker = RenderWorker::spawn(Arc::new(FontBook::new())).unwrap();
        let image = Arc::new(RgbaImage::from_pixel(16, 16, image::Rgba([255, 255, 255, 255])));
        let annotations = vec![Annotation::Rectangle(RectangleAnnotation {
            id: AnnotationId::next(),
            rect: Rect::new(2.0, 2.0, 6.0, 6.0),
            style: StrokeStyle {
                color: Color::BLACK,
                line_width: 1.0,
            },
            is_filled: true,
        })];

        let generation = worker.submit(Arc::clone(&image), annotations.clone()).unwrap();
        let output = worker.recv().unwrap();
        assert_eq!(output.generation, generation);
        let rendered = output.result.unwrap();
        assert_eq!(rendered, composite(&image, &annotations, &FontBook::new()).unwrap());
    }

    #[test]
    fn test_latest_request_is_always_rendered() {
        let mut worker = RenderWorker::spawn(Arc::new(FontBook::new())).unwrap();
        let image = Arc::new(RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255])));
        for _ in 0..5 {
            worker.submit(Arc::clone(&image), Vec::new()).unwrap();
        }
        let latest = worker.latest_generation();

        let mut seen = Vec::new();
        loop {
            let output = worker.recv().unwrap();
            seen.push(output.generation);
            if output.generation == latest {
                break;
            }
        }
        // Generations come back in increasing order, possibly with gaps
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_failed_render_is_reported() {
        let mut worker = RenderWorker::spawn(Arc::new(FontBook::new())).unwrap();
        worker.submit(Arc::new(RgbaImage::new(0, 0)), Vec::new()).unwrap();
        let output = worker.recv().unwrap();
        assert!(matches!(output.result, Err(RenderError::EmptyImage { .. })));
    }

    #[test]
    fn test_try_recv_distinguishes_empty_from_gone() {
        let worker = RenderWorker::spawn(Arc::new(FontBook::new())).unwrap();
        assert!(matches!(worker.try_recv(), Ok(None)));

        let (result_tx, results) = crossbeam_channel::unbounded::<RenderOutput>();
        drop(result_tx);
        let dead = RenderWorker {
            requests: None,
            results,
            handle: None,
            next_generation: 0,
        };
        assert!(matches!(dead.try_recv(), Err(RenderError::WorkerGone)));
    }
}
