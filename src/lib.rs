pub mod cli;
pub mod commit;
pub mod error;
pub mod model;
pub mod readme;
pub mod render;
pub mod series;
pub mod update;
pub mod util;
