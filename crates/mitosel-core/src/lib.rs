pub mod consts;
pub mod dedup;
pub mod error;
pub mod io;
pub mod peak;
pub mod pipeline;
pub mod projection;
pub mod roi;
pub mod segment;
pub mod temporal;
pub mod volume;
