//! Shared — cross-cutting куски, которыми пользуются grab и launch:
//! - Viewpoint (камера controlling agent'а, attach-parent gun'а)
//! - Clock (время fixed шага для cooldown'ов)

pub mod clock;
pub mod viewpoint;

pub use clock::*;
pub use viewpoint::*;
