pub mod gui;
pub mod logging;
pub mod pad;
pub mod settings;
