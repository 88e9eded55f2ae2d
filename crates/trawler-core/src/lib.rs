//! Phish report lifecycle: intake, the moderator message, and review
//! transitions fanned back out to every message that shows a report.

pub mod coordinator;
pub mod error;
pub mod moderation;
pub mod normalize;
pub mod outbound;
pub mod render;
pub mod review;
pub mod surface;

#[cfg(test)]
mod testing;

pub use coordinator::{Acknowledgement, ReportRequest, SubmissionCoordinator};
pub use error::{TrawlerError, ValidationError};
pub use moderation::{ModerationOutcome, ModerationProcessor, RejectMode, ReviewRequest};
pub use outbound::OutboundQueue;
pub use review::{ReviewMessageSync, ReviewSync};
pub use surface::{ChatSurface, InteractionResponder, SurfaceError};
