#![warn(missing_docs)]

//! botforge: parametric robot configurator.
//!
//! A [`Configuration`] picks one style per body region, a color and a set of
//! accessories. The [`Assembler`] turns it into a tree of primitive shapes
//! ([`botforge_ir::SceneNode`]) mounted on a fixed skeleton, and the
//! [`render`] adapter flattens that tree into world-space draw calls.
//! A [`Workbench`] ties it together with blink and expression timers for
//! the live head.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use botforge::{Region, Workbench};
//!
//! let mut bench = Workbench::default();
//! bench.state_mut().cycle_style(Region::Head);
//! bench.state_mut().set_color("#ff8800").unwrap();
//!
//! let robot = bench.frame(Duration::from_millis(16));
//! assert_eq!(robot.children.len(), 7);
//! let calls = botforge::render::flatten(&robot);
//! assert!(!calls.is_empty());
//! ```

pub mod accessories;
pub mod assembler;
pub mod catalog;
pub mod color;
pub mod config;
pub mod host;
pub mod idle;
pub mod palette;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod share;
pub mod skeleton;
pub mod store;
pub mod workbench;

use thiserror::Error;

pub use accessories::{AccessoryKind, AccessorySet, BodyAccessory, HatStyle};
pub use assembler::Assembler;
pub use catalog::{Catalog, CatalogError, PartVariant, Region};
pub use color::{ColorError, Rgb};
pub use config::{ConfigState, Configuration, RawConfiguration};
pub use host::{ConfigSummary, HostListener};
pub use idle::{Expression, IdleAnimation, IdleAnimationState, IdleListener, IdleTimings};
pub use palette::{Finish, Palette};
pub use render::{DrawCall, Renderer};
pub use scheduler::{Scheduler, TimerHandle};
pub use settings::{Settings, SettingsError};
pub use share::ShareError;
pub use store::{ConfigStore, JsonFileStore, MemoryStore, StoreError};
pub use workbench::Workbench;

/// Any botforge error.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad color string.
    #[error(transparent)]
    Color(#[from] ColorError),
    /// Bad share token.
    #[error(transparent)]
    Share(#[from] ShareError),
    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Bad settings file.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Invalid custom catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
