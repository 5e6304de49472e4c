//! Shape-relationship engine for a whiteboard canvas.
//!
//! The engine runs against a live scene graph that it does not own. Notes and
//! other node-like shapes are connected by connector entities (arrows, lines)
//! whose endpoints may be bound to a shape. Every computation takes a fresh
//! snapshot of the host's entities through [`scene::SceneAccessor`], derives
//! what it needs, and writes results back as a single batch.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] facade: mode flags, tick, commands |
//! | [`scheduler`] | 60 Hz poll loop multiplexed with incoming commands |
//! | [`replay`] | Scripted runs of the poll loop against an in-memory scene |
//! | [`scene`] | Host accessor trait and batched patch types |
//! | [`doc`] | Entity types and the in-memory [`doc::DocStore`] host |
//! | [`graph`] | Binding graph derivation and reachability traversal |
//! | [`radial`] | Gesture state machine rotating related shapes around a pivot |
//! | [`beautify`] | Fan-out of overlapping connector curves |
//! | [`cap`] | Decorative cap spliced into rendered connector paths |
//! | [`path`] | Rendered SVG paths and arc-length lookup on `kurbo` |
//! | [`geom`] | Compass angles and rotation about a pivot |
//! | [`input`] | Gesture samples and mode flags |
//! | [`config`] | Tunables loaded from the environment |
//! | [`consts`] | Shared numeric constants |

pub mod beautify;
pub mod cap;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod graph;
pub mod input;
pub mod path;
pub mod radial;
pub mod replay;
pub mod scene;
pub mod scheduler;
