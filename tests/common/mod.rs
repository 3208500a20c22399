#![allow(dead_code)]

pub mod history;
