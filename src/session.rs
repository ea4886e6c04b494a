// THEORY:
// The `session` module turns the single-owner rule for advisors into a
// structural guarantee. Each live video stream gets a `StreamSession`: a
// dedicated task that owns a private `FramingAdvisor` and drains frames from an
// mpsc channel in arrival order, replying per frame over a oneshot. Two streams
// can never share a background model because no handle can reach another
// session's advisor; frames can never reorder because one channel feeds one
// task.
//
// Still photos have no such ordering constraint (every check is independent),
// so batches of them fan out across blocking workers instead.

use crate::capture::{self, PhotoCheck};
use crate::config::AdvisorConfig;
use crate::core_modules::framing::{BoundingBox, FramingRules};
use crate::error::AdvisorError;
use crate::pipeline::{FrameVerdict, FramingAdvisor};
use futures::stream::StreamExt;
use image::RgbImage;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

const SESSION_QUEUE_DEPTH: usize = 8;

enum SessionMessage {
    Frame(
        RgbImage,
        oneshot::Sender<Result<FrameVerdict, AdvisorError>>,
    ),
    Shutdown,
}

/// A handle to one live stream's framing advisor, running on its own task.
pub struct StreamSession {
    sender: mpsc::Sender<SessionMessage>,
}

impl StreamSession {
    /// Opens a session with a freshly constructed advisor. Configuration
    /// errors surface here, before the task spawns.
    pub fn open(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let mut advisor = FramingAdvisor::new(config)?;
        let (sender, mut receiver) = mpsc::channel::<SessionMessage>(SESSION_QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    SessionMessage::Frame(frame, reply) => {
                        let _ = reply.send(advisor.process(&frame));
                    }
                    SessionMessage::Shutdown => break,
                }
            }
            debug!("framing session ended");
        });

        Ok(Self { sender })
    }

    /// Submits the next frame of this stream and waits for its verdict.
    /// Frames are processed strictly in submission order.
    pub async fn process(&self, frame: RgbImage) -> Result<FrameVerdict, AdvisorError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(SessionMessage::Frame(frame, reply_sender))
            .await
            .map_err(|_| AdvisorError::SessionClosed)?;
        reply_receiver.await.map_err(|_| AdvisorError::SessionClosed)?
    }

    /// Asks the session task to stop after draining queued frames.
    pub async fn close(&self) {
        let _ = self.sender.send(SessionMessage::Shutdown).await;
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        let _ = self.sender.try_send(SessionMessage::Shutdown);
    }
}

/// Checks a batch of independent still photos, fanning out across blocking
/// workers sized to the machine. Results come back in input order.
pub async fn check_photos_parallel(
    photos: Vec<(RgbImage, Option<BoundingBox>)>,
    rules: FramingRules,
) -> Vec<Result<PhotoCheck, AdvisorError>> {
    let workers = num_cpus::get().max(1);
    futures::stream::iter(photos)
        .map(|(photo, subject)| {
            tokio::task::spawn_blocking(move || capture::check_photo(&photo, subject, &rules))
        })
        .buffered(workers)
        .map(|joined| match joined {
            Ok(result) => result,
            Err(_) => Err(AdvisorError::WorkerFailed),
        })
        .collect()
        .await
}
