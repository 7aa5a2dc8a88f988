pub mod logging;
pub mod mentions;
pub mod response;
