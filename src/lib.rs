// Library for tests to access modules

pub mod config;
pub mod datasite;
pub mod models;
pub mod privacy;
pub mod run;
pub mod sampler;
pub mod sink;
