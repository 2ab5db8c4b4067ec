pub mod pointer;
pub mod terminal;

pub use pointer::{Point, PointerListeners, Rect};
pub use terminal::Terminal;
