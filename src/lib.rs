pub mod calc_engine;
pub mod shell;
