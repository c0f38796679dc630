pub mod asoundrc;
pub mod durable;
pub mod settings;
