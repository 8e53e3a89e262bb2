mod collections;
mod export;

pub use collections::{CollectionGames, attach_games, write_collection_games};
pub use export::{REPORT_HEADERS, export_csv, render_report, write_report};
