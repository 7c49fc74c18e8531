pub mod assets;
pub mod export;
pub mod health;
pub mod intake;
pub mod map;
pub mod page;
pub mod preview;
pub mod reset;
pub mod session;
pub mod theme;
