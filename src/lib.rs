//! cbp_rs
//!
//! A small Rust library for comparing primate cerebellum and cerebrum
//! measurements as scatter plots. Pairs with the `cbp` CLI.
//!
//! ### Features
//! - Load a species measurement table from CSV, with header clean-up
//! - Resolve requested column positions into every pair worth plotting
//! - Render simple or natural-log scatter figures as SVG/PNG, colored by family
//! - Save figures into numbered slots with an append-only details log
//! - Quick dataset counts and per-column statistics
//!
//! ### Example
//! ```no_run
//! use cbp_rs::{ColorMap, FigureSpec, PairRequest, PlotKind, resolve_pairs};
//! use cbp_rs::storage::{LoadOptions, load_dataset};
//!
//! let ds = load_dataset("all_species_values.csv", &LoadOptions::default())?;
//! let request = PairRequest::Indices(vec![4, 3, 1]);
//! let res = resolve_pairs(&request, &ds.schema(), &[4, 3, 1])?;
//! let spec = FigureSpec::new(res.pairs, PlotKind::Logged, ColorMap::original());
//! cbp_rs::viz::render_figure(&ds, &spec, "logged.png")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod layout;
pub mod models;
pub mod pairs;
pub mod prompt;
pub mod save;
pub mod stats;
pub mod storage;
pub mod style;
pub mod viz;

pub use config::Config;
pub use layout::Layout;
pub use models::{Dataset, PlotKind, VariablePair};
pub use pairs::{PairRequest, Resolution, resolve_pairs};
pub use style::ColorMap;
pub use viz::{FigureSpec, Highlight};
