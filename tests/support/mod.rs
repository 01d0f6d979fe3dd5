#![allow(dead_code)]

pub mod sampson_env;
pub mod wav;
