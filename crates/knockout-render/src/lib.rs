#![forbid(unsafe_code)]

//! Deferred-plotting knockout engine.
//!
//! Knockout rendering is an optimisation aimed at unaccelerated redraw:
//! it avoids painting the same pixels more than once. A session records
//! every plot call instead of executing it, tracks which regions earlier
//! opaque paint still owns, and on flush replays the stream with fully
//! covered paint dropped and partially covered paint trimmed to its
//! surviving fragments.
//!
//! Plotting a small opaque box over a large one:
//!
//! ```text
//!   +-----------------+             +-----------------+
//!   |#################|             |#################|
//!   |####+-------+####|             +----+-------+----+
//!   |####|:::::::|####|   becomes   |####|:::::::|####|
//!   |####+-------+####|             +----+-------+----+
//!   |#################|             |#################|
//!   +-----------------+             +-----------------+
//! ```
//!
//! where the large box is replayed as four edge bands instead of a full
//! rectangle underneath the small one.
//!
//! # Usage
//!
//! ```
//! use knockout_core::{Colour, Rect};
//! use knockout_render::capture::CapturePlotter;
//! use knockout_render::plotter::Plotter;
//! use knockout_render::session::KnockoutPlotter;
//!
//! let mut session: KnockoutPlotter<CapturePlotter> = KnockoutPlotter::new(CapturePlotter::new());
//! session.clip(&Rect::from_size(200, 200)).unwrap();
//! session.fill(Colour::WHITE, &Rect::new(0, 0, 100, 100)).unwrap();
//! session.fill(Colour::BLACK, &Rect::new(0, 0, 100, 100)).unwrap();
//! let (capture, res) = session.finish();
//! res.unwrap();
//! // The white fill was completely covered and never reaches the backend.
//! assert_eq!(capture.fills().len(), 1);
//! ```

pub mod arena;
pub mod capture;
pub mod entry;
pub mod occlusion;
pub mod plotter;
pub mod session;

pub use occlusion::{BoxId, OcclusionTracker};
pub use plotter::Plotter;
pub use session::{KnockoutConfig, KnockoutPlotter};
