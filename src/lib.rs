//! clean_energy
//!
//! Selection and aggregation pipeline behind a clean-energy dashboard: a
//! country/year panel of energy production statistics goes in, chart-ready
//! tables and series come out. Pairs with the `cedash` CLI.
//!
//! ### Features
//! - Align panel country names with the world map's `ADMIN` spelling
//! - Resolve map clicks into a country selection (malformed clicks select nothing)
//! - Filter by country, by region and year, or by year
//! - Top-N leaderboards, per-region means, per-region and per-year totals
//! - Year series with a "latest value" marker, and overlaid energy-mix series
//!
//! ### Example
//! ```no_run
//! use clean_energy::{render, storage, ClickEvent, Context, SelectionState};
//!
//! let rows = storage::load_panel_csv("panel.csv")?;
//! let ctx = Context::from_normalized(rows);
//! let state = SelectionState {
//!     click: Some(ClickEvent::clicked("Norway")),
//!     ..Default::default()
//! };
//! let view = render(&ctx, &state);
//! println!("{}", view.country.message());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod selection;
pub mod series;
pub mod storage;
pub mod view;

pub use error::{Error, Result};
pub use models::{CountryKey, EnergyType, Metric, PanelRow, Selection};
pub use normalize::{NameMap, normalize};
pub use selection::{ClickEvent, resolve};
pub use view::{Context, SelectionState, ViewModel, render};
