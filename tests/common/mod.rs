#![allow(dead_code)] // Each test binary uses a different slice of these

pub mod fakes;
