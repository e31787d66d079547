mod board;
mod common;
