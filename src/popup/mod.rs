pub mod geometry;
pub mod presenter;
pub mod window;

pub use geometry::{Point, Rect};
pub use presenter::{PopupFactory, PopupPresenter, PopupSurface};
