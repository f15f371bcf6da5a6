//! Transport layers exposing the association manager

pub mod unix_socket;
